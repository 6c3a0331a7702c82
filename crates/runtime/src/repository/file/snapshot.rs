//! File-backed snapshot repository.

use std::fs;
use std::path::{Path, PathBuf};

use crate::repository::{RaceSnapshot, RepositoryError, Result, SnapshotFormat, SnapshotRepository};

/// Stores the latest race snapshot as `snapshot.bin` or `snapshot.json`.
///
/// Writes go through a temp file followed by a rename, so a crash mid-save
/// leaves the previous snapshot intact.
pub struct FileSnapshotRepository {
    base_dir: PathBuf,
    format: SnapshotFormat,
}

impl FileSnapshotRepository {
    /// Create a repository rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl AsRef<Path>, format: SnapshotFormat) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir, format })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn format(&self) -> SnapshotFormat {
        self.format
    }

    /// Path of the snapshot file for the configured format.
    pub fn snapshot_path(&self) -> PathBuf {
        self.base_dir
            .join(format!("snapshot.{}", self.format.extension()))
    }
}

impl SnapshotRepository for FileSnapshotRepository {
    fn save(&self, snapshot: &RaceSnapshot) -> Result<()> {
        let path = self.snapshot_path();
        let temp_path = path.with_extension(format!("{}.tmp", self.format.extension()));

        let bytes = self.format.encode(snapshot)?;
        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!(
            "Saved snapshot for session {} to {}",
            snapshot.session_id,
            path.display()
        );

        Ok(())
    }

    fn load(&self) -> Result<Option<RaceSnapshot>> {
        let path = self.snapshot_path();

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let snapshot = self.format.decode(&bytes)?;
        snapshot.verify()?;

        tracing::debug!(
            "Loaded snapshot for session {} from {}",
            snapshot.session_id,
            path.display()
        );

        Ok(Some(snapshot))
    }

    fn clear(&self) -> Result<()> {
        let path = self.snapshot_path();
        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!("Removed snapshot {}", path.display());
        }
        Ok(())
    }

    fn exists(&self) -> bool {
        self.snapshot_path().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use race_core::{AthleteNumber, PointsFrequency, RaceConfig, RaceEngine, RaceState};
    use tempfile::TempDir;

    fn running_state() -> RaceState {
        let mut state = RaceState::new(RaceConfig::new(4, PointsFrequency::EveryLap));
        let mut engine = RaceEngine::new(&mut state);
        engine.start_race().unwrap();
        engine
            .assign_points(AthleteNumber::new(7).unwrap(), 2)
            .unwrap();
        state
    }

    #[test]
    fn save_then_load_returns_same_state() {
        let dir = TempDir::new().unwrap();
        for format in [SnapshotFormat::Binary, SnapshotFormat::Json] {
            let repo = FileSnapshotRepository::new(dir.path().join(format.as_ref()), format).unwrap();
            assert!(repo.load().unwrap().is_none());

            let snapshot = RaceSnapshot::capture("session", &running_state());
            repo.save(&snapshot).unwrap();

            assert!(repo.exists());
            assert_eq!(repo.load().unwrap(), Some(snapshot));
        }
    }

    #[test]
    fn later_save_replaces_earlier() {
        let dir = TempDir::new().unwrap();
        let repo = FileSnapshotRepository::new(dir.path(), SnapshotFormat::Binary).unwrap();

        repo.save(&RaceSnapshot::capture("a", &RaceState::default()))
            .unwrap();
        let latest = RaceSnapshot::capture("a", &running_state());
        repo.save(&latest).unwrap();

        assert_eq!(repo.load().unwrap().unwrap().state, latest.state);
    }

    #[test]
    fn clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let repo = FileSnapshotRepository::new(dir.path(), SnapshotFormat::Json).unwrap();
        repo.save(&RaceSnapshot::capture("a", &running_state()))
            .unwrap();

        repo.clear().unwrap();
        assert!(!repo.exists());
        assert!(repo.load().unwrap().is_none());
        // Clearing twice is fine.
        repo.clear().unwrap();
    }

    #[test]
    fn garbage_on_disk_is_reported() {
        let dir = TempDir::new().unwrap();
        let repo = FileSnapshotRepository::new(dir.path(), SnapshotFormat::Json).unwrap();
        fs::write(repo.snapshot_path(), b"{not json").unwrap();

        assert!(matches!(repo.load(), Err(RepositoryError::Json(_))));
    }
}
