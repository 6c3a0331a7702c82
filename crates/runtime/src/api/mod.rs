//! Public runtime API surface.
//!
//! Gathers the types exposed to front ends so the worker and repository
//! layers can stay internal.

pub mod errors;
pub mod handle;

pub use errors::{Result, RuntimeError};
pub use handle::RaceHandle;
