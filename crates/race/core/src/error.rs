//! Common error infrastructure for race-core.
//!
//! Rejections raised by the engine are defined next to it in
//! [`crate::engine`]; this module holds the shared classification used by
//! hosts to decide how to surface them.
//!
//! # Design Principles
//!
//! - **Type Safety**: every rejection is a typed variant, never a bare string
//! - **No Partial Effects**: a rejected operation leaves the race untouched
//! - **Severity Classification**: hosts pick a presentation per severity

/// Severity level of an error, used for categorization and logging.
///
/// - **Recoverable**: the request is valid in general but not right now
///   (race already ended, point value already handed out)
/// - **Validation**: the request itself is malformed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The race state does not allow the request at this moment.
    ///
    /// Examples: duplicate assignment, nothing to undo
    Recoverable,

    /// Invalid input, should not be retried without changes.
    ///
    /// Examples: athlete number 0, odd lap count for two-lap checkpoints
    Validation,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all race-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait RaceError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// This is useful for error categorization, event payloads, and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
