//! In-memory SnapshotRepository implementation for tests and local runs.

use std::sync::RwLock;

use crate::repository::{RaceSnapshot, RepositoryError, Result, SnapshotRepository};

/// Keeps the latest snapshot in memory.
#[derive(Default)]
pub struct InMemorySnapshotRepository {
    snapshot: RwLock<Option<RaceSnapshot>>,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository that already holds `snapshot`.
    pub fn with_snapshot(snapshot: RaceSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
        }
    }
}

impl SnapshotRepository for InMemorySnapshotRepository {
    fn save(&self, snapshot: &RaceSnapshot) -> Result<()> {
        let mut slot = self
            .snapshot
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = Some(snapshot.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<RaceSnapshot>> {
        let slot = self
            .snapshot
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        match slot.as_ref() {
            Some(snapshot) => {
                snapshot.verify()?;
                Ok(Some(snapshot.clone()))
            }
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .snapshot
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = None;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.snapshot
            .read()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use race_core::RaceState;

    #[test]
    fn stores_and_clears() {
        let repo = InMemorySnapshotRepository::new();
        assert!(!repo.exists());

        let snapshot = RaceSnapshot::capture("mem", &RaceState::default());
        repo.save(&snapshot).unwrap();
        assert_eq!(repo.load().unwrap(), Some(snapshot));

        repo.clear().unwrap();
        assert!(repo.load().unwrap().is_none());
    }
}
