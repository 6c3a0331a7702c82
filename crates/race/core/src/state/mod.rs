//! Authoritative race state representation.
//!
//! This module owns the data structures that describe athletes, the open
//! checkpoint, the checkpoint history, and the lap countdown. Runtime layers
//! clone or query this state but mutate it exclusively through the engine.
mod athlete;
mod checkpoint;
mod history;
mod progress;
mod registry;

pub use athlete::{Athlete, AthleteNumber, AthleteStatus};
pub use checkpoint::{Assignment, Assignments, CheckpointState, CheckpointSummary, PointPool};
pub use history::{CheckpointHistory, CheckpointHistoryEntry};
pub use progress::{ProgressSummary, RacePhase, RaceProgress};
pub use registry::AthleteRegistry;

use crate::config::RaceConfig;
use crate::leaderboard::{self, Standing};

/// Canonical snapshot of one race.
///
/// Everything the scoring rules read or write lives here, so a clone is a
/// consistent view and a serialized copy is enough to resume the race.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaceState {
    /// Fixed once the race starts.
    pub config: RaceConfig,
    pub progress: RaceProgress,
    pub athletes: AthleteRegistry,
    pub checkpoint: CheckpointState,
    pub history: CheckpointHistory,
}

impl RaceState {
    /// Creates a race that has not started yet.
    pub fn new(config: RaceConfig) -> Self {
        Self {
            config,
            progress: RaceProgress {
                laps_remaining: config.total_laps,
                ..RaceProgress::default()
            },
            ..Self::default()
        }
    }

    /// True iff there is a checkpoint to retract and the race is still open.
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty() && !self.progress.ended
    }

    /// Current standings, best first.
    pub fn leaderboard(&self) -> Vec<Standing> {
        leaderboard::rank(&self.athletes, &self.history)
    }

    pub fn checkpoint_summary(&self) -> CheckpointSummary {
        CheckpointSummary {
            number: self.checkpoint.number,
            available: self.checkpoint.available,
            assigned: self.checkpoint.assigned.clone(),
            is_final: self.checkpoint.pool() == PointPool::FINAL,
        }
    }

    pub fn progress_summary(&self) -> ProgressSummary {
        ProgressSummary::new(
            &self.config,
            &self.progress,
            self.checkpoint.number,
            self.can_undo(),
        )
    }

    /// SHA-256 over the bincode encoding of the state.
    ///
    /// Used by persistence layers to detect snapshots that were altered or
    /// truncated on disk.
    #[cfg(feature = "serde")]
    pub fn state_root(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        // bincode is deterministic for this state: maps are BTreeMaps
        if let Ok(bytes) = bincode::serialize(self) {
            hasher.update(&bytes);
        }
        hasher.finalize().into()
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use crate::config::PointsFrequency;

    #[test]
    fn state_root_tracks_content() {
        let state = RaceState::new(RaceConfig::new(4, PointsFrequency::EveryLap));
        let same = state.clone();
        assert_eq!(hex::encode(state.state_root()), hex::encode(same.state_root()));

        let mut changed = state.clone();
        changed.progress.laps_remaining = 3;
        assert_ne!(state.state_root(), changed.state_root());
        assert_eq!(hex::encode(state.state_root()).len(), 64);
    }
}
