//! Unified error types surfaced by the runtime API.
//!
//! Wraps scoring rejections, repository failures, and worker coordination
//! failures so front ends can report them with consistent context.

use race_core::{ErrorSeverity, RaceError, Rejection};
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The engine refused the command; the race is unchanged.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("race worker command channel closed")]
    CommandChannelClosed,

    #[error("race worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("race worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("failed to render report")]
    Report(#[source] serde_json::Error),
}

impl RuntimeError {
    /// The engine rejection behind this error, if any.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            RuntimeError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

impl RaceError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Rejected(rejection) => rejection.severity(),
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Rejected(rejection) => rejection.error_code(),
            RuntimeError::Repository(_) => "REPOSITORY",
            RuntimeError::CommandChannelClosed => "COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "REPLY_CHANNEL_CLOSED",
            RuntimeError::WorkerJoin(_) => "WORKER_JOIN",
            RuntimeError::Report(_) => "REPORT",
        }
    }
}
