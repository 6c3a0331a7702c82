use crate::engine::{InputError, Rejection};

/// How often a scoring checkpoint is held.
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
pub enum PointsFrequency {
    /// A checkpoint at the end of every lap.
    #[default]
    EveryLap,
    /// A checkpoint at the end of every second lap.
    EveryTwoLaps,
}

impl PointsFrequency {
    /// Number of laps consumed by one completed checkpoint.
    pub const fn laps_per_checkpoint(self) -> u32 {
        match self {
            PointsFrequency::EveryLap => 1,
            PointsFrequency::EveryTwoLaps => 2,
        }
    }
}

/// Race configuration constants and the parameters chosen before the start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaceConfig {
    /// Total laps skated in the race.
    pub total_laps: u32,
    pub points_frequency: PointsFrequency,
}

impl RaceConfig {
    // ===== compile-time constants used as type parameters =====
    /// Largest pool is `{3, 2, 1}`, so at most three athletes score per checkpoint.
    pub const MAX_ASSIGNMENTS_PER_CHECKPOINT: usize = 3;
    /// Point value reserved for the checkpoint that coincides with the finish.
    pub const TOP_POINT_VALUE: u8 = 3;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TOTAL_LAPS: u32 = 16;

    pub fn new(total_laps: u32, points_frequency: PointsFrequency) -> Self {
        Self {
            total_laps,
            points_frequency,
        }
    }

    /// Checks the configuration before it is accepted by the engine.
    ///
    /// With [`PointsFrequency::EveryTwoLaps`] the lap count must be even,
    /// otherwise the countdown would skip the final checkpoint and never
    /// reach zero.
    pub fn validate(&self) -> Result<(), Rejection> {
        if self.total_laps == 0 {
            return Err(Rejection::InvalidInput(InputError::NoLaps));
        }

        if self.total_laps % self.points_frequency.laps_per_checkpoint() != 0 {
            return Err(Rejection::InvalidInput(InputError::UnevenLapCount {
                total_laps: self.total_laps,
            }));
        }

        Ok(())
    }

    /// Number of checkpoints held over the whole race.
    pub fn checkpoint_count(&self) -> u32 {
        self.total_laps / self.points_frequency.laps_per_checkpoint()
    }

    /// Whether the checkpoint opened with `laps_remaining` laps to go is the last one.
    pub fn is_final_checkpoint(&self, laps_remaining: u32) -> bool {
        laps_remaining == self.points_frequency.laps_per_checkpoint()
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOTAL_LAPS, PointsFrequency::default())
    }
}
