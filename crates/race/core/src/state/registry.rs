use std::collections::BTreeMap;

use super::{Athlete, AthleteNumber, AthleteStatus};

/// Every athlete seen during the race, keyed by start number.
///
/// Athletes are registered on first reference and never removed while the
/// race is active. Iteration is in start-number order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AthleteRegistry {
    athletes: BTreeMap<AthleteNumber, Athlete>,
}

impl AthleteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, number: AthleteNumber) -> Option<&Athlete> {
        self.athletes.get(&number)
    }

    pub fn get_mut(&mut self, number: AthleteNumber) -> Option<&mut Athlete> {
        self.athletes.get_mut(&number)
    }

    /// Returns the athlete, registering a fresh Normal entry if unseen.
    pub fn get_or_register(&mut self, number: AthleteNumber) -> &mut Athlete {
        self.athletes
            .entry(number)
            .or_insert_with(|| Athlete::new(number))
    }

    /// Replaces the stored record for `athlete.number`.
    pub fn upsert(&mut self, athlete: Athlete) {
        self.athletes.insert(athlete.number, athlete);
    }

    /// Status of an athlete; unseen athletes count as Normal.
    pub fn status_of(&self, number: AthleteNumber) -> AthleteStatus {
        self.get(number)
            .map(|athlete| athlete.status)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Athlete> {
        self.athletes.values()
    }

    pub fn len(&self) -> usize {
        self.athletes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.athletes.is_empty()
    }
}
