//! Storage Adapters
//!
//! Durable persistence for the game state between runs.
//!
//! ## Available Adapters
//!
//! - **JsonSnapshotFile** - Stores a `GameSnapshot` as a pretty JSON file
//!
//! ## Usage
//!
//! ```ignore
//! let file = JsonSnapshotFile::new("./data/game.json");
//! let store = InMemoryGameStore::from_snapshot(file.load_or_default().await?);
//! // ... run handlers ...
//! file.save(&store.snapshot().await).await?;
//! ```

mod json_snapshot_file;

pub use json_snapshot_file::{JsonSnapshotFile, SnapshotError};
