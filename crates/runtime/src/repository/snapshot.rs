//! Serializable race snapshot with integrity metadata.

use chrono::{DateTime, Utc};
use race_core::RaceState;
use serde::{Deserialize, Serialize};

use super::{RepositoryError, Result};

/// On-disk encoding of a snapshot.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SnapshotFormat {
    /// Compact bincode encoding.
    #[default]
    Binary,
    /// Human-readable JSON.
    Json,
}

impl SnapshotFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SnapshotFormat::Binary => "bin",
            SnapshotFormat::Json => "json",
        }
    }

    pub fn encode(self, snapshot: &RaceSnapshot) -> Result<Vec<u8>> {
        match self {
            SnapshotFormat::Binary => bincode::serialize(snapshot)
                .map_err(|e| RepositoryError::Serialization(e.to_string())),
            SnapshotFormat::Json => serde_json::to_vec_pretty(snapshot)
                .map_err(|e| RepositoryError::Json(e.to_string())),
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<RaceSnapshot> {
        match self {
            SnapshotFormat::Binary => bincode::deserialize(bytes)
                .map_err(|e| RepositoryError::Serialization(e.to_string())),
            SnapshotFormat::Json => {
                serde_json::from_slice(bytes).map_err(|e| RepositoryError::Json(e.to_string()))
            }
        }
    }
}

/// Complete race state plus the metadata needed to trust it on reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub version: u32,
    pub session_id: String,
    pub saved_at: DateTime<Utc>,
    /// Hex SHA-256 of the bincode-encoded state.
    pub state_hash: String,
    pub state: RaceState,
}

impl RaceSnapshot {
    pub const VERSION: u32 = 1;

    /// Captures `state` for `session_id` at the current time.
    pub fn capture(session_id: impl Into<String>, state: &RaceState) -> Self {
        Self {
            version: Self::VERSION,
            session_id: session_id.into(),
            saved_at: Utc::now(),
            state_hash: hex::encode(state.state_root()),
            state: state.clone(),
        }
    }

    /// Checks the version and that the state still matches its hash.
    pub fn verify(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(RepositoryError::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }

        let actual = hex::encode(self.state.state_root());
        if actual != self.state_hash {
            return Err(RepositoryError::CorruptedData(format!(
                "state hash mismatch for session {}: expected {}, found {}",
                self.session_id, self.state_hash, actual
            )));
        }

        Ok(())
    }

    pub fn into_state(self) -> RaceState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use race_core::{PointsFrequency, RaceConfig};

    fn sample_state() -> RaceState {
        RaceState::new(RaceConfig::new(6, PointsFrequency::EveryTwoLaps))
    }

    #[test]
    fn captured_snapshot_verifies() {
        let snapshot = RaceSnapshot::capture("s1", &sample_state());
        assert_eq!(snapshot.version, RaceSnapshot::VERSION);
        assert_eq!(snapshot.state_hash.len(), 64);
        snapshot.verify().unwrap();
    }

    #[test]
    fn detects_tampered_state() {
        let mut snapshot = RaceSnapshot::capture("s1", &sample_state());
        snapshot.state.progress.laps_remaining = 1;
        assert!(matches!(
            snapshot.verify(),
            Err(RepositoryError::CorruptedData(_))
        ));
    }

    #[test]
    fn rejects_unknown_version() {
        let mut snapshot = RaceSnapshot::capture("s1", &sample_state());
        snapshot.version = 99;
        assert!(matches!(
            snapshot.verify(),
            Err(RepositoryError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn both_formats_decode_what_they_encode() {
        let snapshot = RaceSnapshot::capture("s1", &sample_state());
        for format in [SnapshotFormat::Binary, SnapshotFormat::Json] {
            let bytes = format.encode(&snapshot).unwrap();
            assert_eq!(format.decode(&bytes).unwrap(), snapshot);
        }
        assert_eq!("JSON".parse::<SnapshotFormat>().unwrap(), SnapshotFormat::Json);
    }
}
