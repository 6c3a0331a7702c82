//! Operator configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

use race_core::{PointsFrequency, RaceConfig};
use race_runtime::SnapshotFormat;

/// Settings for one CLI session.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Names the snapshot and log directories; reusing it resumes the race.
    pub session_id: String,
    pub save_dir: PathBuf,
    pub log_dir: PathBuf,
    pub enable_persistence: bool,
    pub snapshot_format: SnapshotFormat,
    /// Offered by `config` when arguments are omitted.
    pub race_defaults: RaceConfig,
    pub command_buffer: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        let dirs = directories::ProjectDirs::from("", "", "points-race");
        Self {
            session_id: "default".to_owned(),
            save_dir: dirs
                .as_ref()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("./save_data")),
            log_dir: dirs
                .as_ref()
                .map(|dirs| dirs.cache_dir().join("logs"))
                .unwrap_or_else(|| PathBuf::from("/tmp/points-race/logs")),
            enable_persistence: true,
            snapshot_format: SnapshotFormat::default(),
            race_defaults: RaceConfig::default(),
            command_buffer: 32,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `RACE_SESSION_ID` - Session identifier (default: `default`)
    /// - `RACE_SAVE_DIR` - Directory for snapshots (default: platform data dir)
    /// - `RACE_LOG_DIR` - Directory for logs (default: platform cache dir)
    /// - `RACE_PERSISTENCE` - Save after every command (default: true)
    /// - `RACE_SNAPSHOT_FORMAT` - `binary` or `json` (default: binary)
    /// - `RACE_TOTAL_LAPS` - Default lap count for `config`
    /// - `RACE_POINTS_FREQUENCY` - `every_lap` or `every_two_laps`
    /// - `RACE_COMMAND_BUFFER` - Worker queue size (default: 32)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(session_id) = env::var("RACE_SESSION_ID")
            .ok()
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty())
        {
            config.session_id = session_id;
        }
        if let Ok(dir) = env::var("RACE_SAVE_DIR") {
            config.save_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("RACE_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(enable) = read_env::<bool>("RACE_PERSISTENCE") {
            config.enable_persistence = enable;
        }
        if let Some(format) = read_env::<SnapshotFormat>("RACE_SNAPSHOT_FORMAT") {
            config.snapshot_format = format;
        }
        if let Some(laps) = read_env::<u32>("RACE_TOTAL_LAPS") {
            config.race_defaults.total_laps = laps;
        }
        if let Some(frequency) = read_env::<PointsFrequency>("RACE_POINTS_FREQUENCY") {
            config.race_defaults.points_frequency = frequency;
        }
        if let Some(capacity) = read_env::<usize>("RACE_COMMAND_BUFFER") {
            config.command_buffer = capacity.max(1);
        }

        config
    }

    /// Directory holding this session's snapshot.
    pub fn session_save_dir(&self) -> PathBuf {
        self.save_dir.join(&self.session_id)
    }

    pub fn session_log_dir(&self) -> PathBuf {
        self.log_dir.join(&self.session_id)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}
