use crate::config::{PointsFrequency, RaceConfig};

/// Race-level lifecycle flags and the lap countdown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaceProgress {
    pub started: bool,
    /// Terminal: once set, every mutating operation is rejected.
    pub ended: bool,
    pub laps_remaining: u32,
}

impl RaceProgress {
    pub fn phase(&self) -> RacePhase {
        if self.ended {
            RacePhase::Ended
        } else if !self.started {
            RacePhase::NotStarted
        } else if self.laps_remaining == 0 {
            RacePhase::Finishable
        } else {
            RacePhase::Running
        }
    }
}

/// Coarse lifecycle stage derived from [`RaceProgress`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RacePhase {
    NotStarted,
    Running,
    /// All laps are scored; waiting for the organizer to end the race.
    Finishable,
    Ended,
}

/// Read-only overview of where the race stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressSummary {
    pub phase: RacePhase,
    pub total_laps: u32,
    pub points_frequency: PointsFrequency,
    pub laps_remaining: u32,
    pub checkpoint: u32,
    pub can_undo: bool,
}

impl ProgressSummary {
    pub(crate) fn new(
        config: &RaceConfig,
        progress: &RaceProgress,
        checkpoint: u32,
        can_undo: bool,
    ) -> Self {
        Self {
            phase: progress.phase(),
            total_laps: config.total_laps,
            points_frequency: config.points_frequency,
            laps_remaining: progress.laps_remaining,
            checkpoint,
            can_undo,
        }
    }
}
