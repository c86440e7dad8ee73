//! Snapshot store configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where the binary keeps the game state
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON snapshot file
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

impl StoreConfig {
    /// Validate store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.snapshot_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptySnapshotPath);
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data/game.json")
}
