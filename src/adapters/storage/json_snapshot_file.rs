//! JSON snapshot file.
//!
//! Persists a `GameSnapshot` as one pretty-printed JSON document. The file
//! is written to a sibling temp path and renamed into place.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::adapters::memory::GameSnapshot;

/// Errors from reading or writing a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to serialize snapshot: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize snapshot: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// A `GameSnapshot` stored on disk as JSON.
#[derive(Debug, Clone)]
pub struct JsonSnapshotFile {
    path: PathBuf,
}

impl JsonSnapshotFile {
    /// # Example
    /// ```ignore
    /// let file = JsonSnapshotFile::new("./data/game.json");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read the snapshot.
    ///
    /// # Errors
    ///
    /// `NotFound` if the file does not exist.
    pub async fn load(&self) -> Result<GameSnapshot, SnapshotError> {
        if !fs::try_exists(&self.path)
            .await
            .map_err(|e| SnapshotError::IoError(e.to_string()))?
        {
            return Err(SnapshotError::NotFound(self.path.clone()));
        }

        let json = fs::read_to_string(&self.path)
            .await
            .map_err(|e| SnapshotError::IoError(e.to_string()))?;

        serde_json::from_str(&json).map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))
    }

    /// Read the snapshot, or an empty one if the file does not exist yet.
    pub async fn load_or_default(&self) -> Result<GameSnapshot, SnapshotError> {
        match self.load().await {
            Err(SnapshotError::NotFound(_)) => Ok(GameSnapshot::default()),
            other => other,
        }
    }

    /// Write the snapshot, creating parent directories as needed.
    pub async fn save(&self, snapshot: &GameSnapshot) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SnapshotError::IoError(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))?;

        let temp = self.temp_path();
        fs::write(&temp, json)
            .await
            .map_err(|e| SnapshotError::IoError(e.to_string()))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| SnapshotError::IoError(e.to_string()))?;

        Ok(())
    }
}
