//! Repository contract for saving and loading the race.

use super::{RaceSnapshot, Result};

/// Persistence gateway for the race state.
///
/// Holds at most one snapshot: each save replaces the previous one.
pub trait SnapshotRepository: Send + Sync {
    /// Persist a snapshot, replacing any previous one.
    fn save(&self, snapshot: &RaceSnapshot) -> Result<()>;

    /// Load the latest snapshot, if any.
    fn load(&self) -> Result<Option<RaceSnapshot>>;

    /// Remove the stored snapshot.
    fn clear(&self) -> Result<()>;

    /// Check if a snapshot exists
    fn exists(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }
}
