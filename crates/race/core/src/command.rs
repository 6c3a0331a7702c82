//! Explicit command interface for driving a race.
//!
//! Front ends translate operator input into a [`RaceCommand`] and hand it to
//! [`crate::RaceEngine::execute`]. Commands are plain data so hosts can queue,
//! log, or persist them.

use crate::config::RaceConfig;
use crate::engine::{AssignOutcome, StatusChange, UndoOutcome};
use crate::state::{AthleteNumber, AthleteStatus, PointPool};

/// Mutating operations accepted by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RaceCommand {
    Configure { config: RaceConfig },
    StartRace,
    AssignPoints { athlete: AthleteNumber, points: u8 },
    SetStatus { athlete: AthleteNumber, status: AthleteStatus },
    ModifyPoints { athlete: AthleteNumber, delta: i64 },
    UndoLastCheckpoint,
    EndRace,
}

impl RaceCommand {
    pub fn name(&self) -> &str {
        self.as_ref()
    }
}

/// Result of a successfully applied [`RaceCommand`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandOutcome {
    Configured(RaceConfig),
    Started { checkpoint: u32, available: PointPool },
    Assigned(AssignOutcome),
    StatusChanged(StatusChange),
    PointsModified { athlete: AthleteNumber, points: u32 },
    Undone(UndoOutcome),
    Ended,
}
