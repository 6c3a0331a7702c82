//! Deterministic scoring rules for a points race.
//!
//! `race-core` defines the canonical race model (athletes, checkpoints,
//! history) and exposes pure APIs that can be reused by the runtime and by
//! offline tools. All state mutation flows through [`engine::RaceEngine`];
//! standings are derived on demand by [`leaderboard::rank`].
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod state;

pub use command::{CommandOutcome, RaceCommand};
pub use config::{PointsFrequency, RaceConfig};
pub use engine::{
    AssignOutcome, CheckpointCompletion, InputError, RaceEngine, Rejection, StatusChange,
    UndoOutcome,
};
pub use error::{ErrorSeverity, RaceError};
pub use leaderboard::Standing;
pub use state::{
    Assignment, Assignments, Athlete, AthleteNumber, AthleteRegistry, AthleteStatus,
    CheckpointHistory, CheckpointHistoryEntry, CheckpointState, CheckpointSummary, PointPool,
    ProgressSummary, RacePhase, RaceProgress, RaceState,
};
