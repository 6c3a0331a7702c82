//! Repository layer for race snapshots
//!
//! Repositories persist the race state so an interrupted session can be
//! resumed: the worker saves a [`RaceSnapshot`] after every mutating command
//! and the builder loads the latest one at startup.

mod error;
mod file;
mod memory;
mod snapshot;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileSnapshotRepository;
pub use memory::InMemorySnapshotRepository;
pub use snapshot::{RaceSnapshot, SnapshotFormat};
pub use traits::SnapshotRepository;
