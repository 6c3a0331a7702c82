//! Athlete identity and the status/points lifecycle.

use std::fmt;

use crate::engine::{InputError, Rejection};

/// Start number worn by an athlete. Always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AthleteNumber(u32);

impl AthleteNumber {
    /// Validates a raw start number.
    pub fn new(number: u32) -> Result<Self, InputError> {
        if number == 0 {
            return Err(InputError::AthleteNumberNotPositive);
        }
        Ok(Self(number))
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for AthleteNumber {
    type Error = InputError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map_err(|_| InputError::AthleteNumberNotPositive)
            .and_then(Self::new)
    }
}

impl fmt::Display for AthleteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Scoring eligibility of an athlete.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AthleteStatus {
    #[default]
    Normal,
    /// Out of contention; points parked in `saved_points`.
    Lapped,
    /// Excluded; points parked in `saved_points` for a possible reinstatement.
    Disqualified,
}

impl AthleteStatus {
    /// Leaderboard bucket: Normal before Lapped before Disqualified.
    pub const fn rank_bucket(self) -> u8 {
        match self {
            AthleteStatus::Normal => 0,
            AthleteStatus::Lapped => 1,
            AthleteStatus::Disqualified => 2,
        }
    }
}

/// Point and status ledger for one athlete.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Athlete {
    pub number: AthleteNumber,
    /// Currently countable points.
    pub points: u32,
    pub status: AthleteStatus,
    /// Total restored when the athlete returns to [`AthleteStatus::Normal`].
    pub saved_points: u32,
}

impl Athlete {
    pub fn new(number: AthleteNumber) -> Self {
        Self {
            number,
            points: 0,
            status: AthleteStatus::Normal,
            saved_points: 0,
        }
    }

    /// Moves the athlete to `target`, following the status state machine.
    ///
    /// Returning to `Normal` unlaps or reinstates depending on the current
    /// status. Any other pair of states is rejected without changes.
    pub fn transition_to(&mut self, target: AthleteStatus) -> Result<(), Rejection> {
        use AthleteStatus::*;
        match (self.status, target) {
            (Normal, Lapped) => {
                self.saved_points = self.points;
                self.points = 0;
            }
            (Normal, Disqualified) => {
                self.saved_points = self.points;
                self.points = 0;
            }
            // saved_points already holds the pre-lap total and is kept as-is
            (Lapped, Disqualified) => {
                self.points = 0;
            }
            (Lapped, Normal) | (Disqualified, Normal) => {
                self.points = self.saved_points;
                self.saved_points = 0;
            }
            (from, to) => {
                return Err(Rejection::InvalidStatusTransition {
                    athlete: self.number,
                    from,
                    to,
                });
            }
        }

        self.status = target;
        Ok(())
    }

    /// Adds checkpoint points to the running total.
    pub fn award(&mut self, points: u8) {
        self.points = self.points.saturating_add(u32::from(points));
    }

    /// Removes previously awarded checkpoint points, flooring at zero.
    pub fn revoke(&mut self, points: u8) {
        self.points = self.points.saturating_sub(u32::from(points));
    }

    /// Free-form correction: `points := max(0, points + delta)`.
    pub fn adjust(&mut self, delta: i64) {
        let adjusted = i64::from(self.points).saturating_add(delta);
        self.points = u32::try_from(adjusted.max(0)).unwrap_or(u32::MAX);
    }

    pub fn is_disqualified(&self) -> bool {
        self.status == AthleteStatus::Disqualified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn athlete_with(points: u32) -> Athlete {
        let mut athlete = Athlete::new(AthleteNumber::new(7).unwrap());
        athlete.points = points;
        athlete
    }

    #[test]
    fn rejects_zero_and_negative_numbers() {
        assert_eq!(
            AthleteNumber::new(0),
            Err(InputError::AthleteNumberNotPositive)
        );
        assert!(AthleteNumber::try_from(-4_i64).is_err());
        assert_eq!(AthleteNumber::try_from(12_i64).unwrap().get(), 12);
        assert_eq!(AthleteNumber::new(12).unwrap().to_string(), "#12");
    }

    #[test]
    fn lap_then_unlap_restores_points() {
        let mut athlete = athlete_with(9);

        athlete.transition_to(AthleteStatus::Lapped).unwrap();
        assert_eq!(athlete.points, 0);
        assert_eq!(athlete.saved_points, 9);

        athlete.transition_to(AthleteStatus::Normal).unwrap();
        assert_eq!(athlete.points, 9);
        assert_eq!(athlete.saved_points, 0);
        assert_eq!(athlete.status, AthleteStatus::Normal);
    }

    #[test]
    fn disqualify_then_reinstate_restores_points() {
        let mut athlete = athlete_with(4);

        athlete.transition_to(AthleteStatus::Disqualified).unwrap();
        assert_eq!(athlete.points, 0);
        assert_eq!(athlete.saved_points, 4);

        athlete.transition_to(AthleteStatus::Normal).unwrap();
        assert_eq!(athlete.points, 4);
        assert_eq!(athlete.saved_points, 0);
    }

    #[test]
    fn disqualifying_lapped_athlete_keeps_pre_lap_total() {
        let mut athlete = athlete_with(6);
        athlete.transition_to(AthleteStatus::Lapped).unwrap();
        // Points scored while lapped are not parked.
        athlete.award(2);

        athlete.transition_to(AthleteStatus::Disqualified).unwrap();
        assert_eq!(athlete.points, 0);
        assert_eq!(athlete.saved_points, 6);

        athlete.transition_to(AthleteStatus::Normal).unwrap();
        assert_eq!(athlete.points, 6);
    }

    #[test]
    fn rejects_transitions_outside_the_state_machine() {
        let mut athlete = athlete_with(3);

        let err = athlete.transition_to(AthleteStatus::Normal).unwrap_err();
        assert!(matches!(
            err,
            Rejection::InvalidStatusTransition {
                from: AthleteStatus::Normal,
                to: AthleteStatus::Normal,
                ..
            }
        ));

        athlete.transition_to(AthleteStatus::Disqualified).unwrap();
        let before = athlete.clone();
        assert!(athlete.transition_to(AthleteStatus::Lapped).is_err());
        assert!(athlete.transition_to(AthleteStatus::Disqualified).is_err());
        assert_eq!(athlete, before);
    }

    #[test]
    fn adjust_clamps_at_zero() {
        let mut athlete = athlete_with(5);
        athlete.adjust(-2);
        assert_eq!(athlete.points, 3);
        athlete.adjust(-10);
        assert_eq!(athlete.points, 0);
        athlete.adjust(4);
        assert_eq!(athlete.points, 4);
    }
}
