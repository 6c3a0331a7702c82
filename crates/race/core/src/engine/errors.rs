//! Rejections surfaced by the race engine.

use crate::error::{ErrorSeverity, RaceError};
use crate::state::{AthleteNumber, AthleteStatus};

/// Malformed input caught at the engine boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputError {
    #[error("athlete number must be positive")]
    AthleteNumberNotPositive,

    #[error("total laps must be at least 1")]
    NoLaps,

    #[error("total laps ({total_laps}) must be even when points are awarded every two laps")]
    UnevenLapCount { total_laps: u32 },
}

/// Reasons an operation was refused.
///
/// A rejected operation never mutates the race state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    #[error("race has not started")]
    RaceNotStarted,

    #[error("race has already started")]
    RaceAlreadyStarted,

    #[error("race has ended")]
    RaceEnded,

    #[error("{points} points are not available at checkpoint {checkpoint}")]
    PointsNotAvailable { points: u8, checkpoint: u32 },

    #[error("athlete {athlete} already scored at checkpoint {checkpoint}")]
    DuplicateAssignment {
        athlete: AthleteNumber,
        checkpoint: u32,
    },

    #[error("athlete {athlete} is disqualified")]
    AthleteDisqualified { athlete: AthleteNumber },

    #[error("no checkpoint to undo")]
    NothingToUndo,

    #[error("athlete {athlete} cannot go from {from} to {to}")]
    InvalidStatusTransition {
        athlete: AthleteNumber,
        from: AthleteStatus,
        to: AthleteStatus,
    },

    #[error("invalid input: {0}")]
    InvalidInput(InputError),
}

impl RaceError for Rejection {
    fn severity(&self) -> ErrorSeverity {
        use Rejection::*;
        match self {
            RaceNotStarted | RaceAlreadyStarted | RaceEnded => ErrorSeverity::Recoverable,
            PointsNotAvailable { .. } | DuplicateAssignment { .. } => ErrorSeverity::Recoverable,
            AthleteDisqualified { .. } | NothingToUndo => ErrorSeverity::Recoverable,
            InvalidStatusTransition { .. } | InvalidInput(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use Rejection::*;
        match self {
            RaceNotStarted => "RACE_NOT_STARTED",
            RaceAlreadyStarted => "RACE_ALREADY_STARTED",
            RaceEnded => "RACE_ENDED",
            PointsNotAvailable { .. } => "POINTS_NOT_AVAILABLE",
            DuplicateAssignment { .. } => "DUPLICATE_ASSIGNMENT",
            AthleteDisqualified { .. } => "ATHLETE_DISQUALIFIED",
            NothingToUndo => "NOTHING_TO_UNDO",
            InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            InvalidInput(_) => "INVALID_INPUT",
        }
    }
}

impl From<InputError> for Rejection {
    fn from(error: InputError) -> Self {
        Rejection::InvalidInput(error)
    }
}
