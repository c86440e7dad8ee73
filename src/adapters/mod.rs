//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-memory game store implementing every repository port
//! - `storage` - JSON snapshot file for persistence between runs
//! - `events` - In-memory event bus

pub mod events;
pub mod memory;
pub mod storage;

pub use events::InMemoryEventBus;
pub use memory::{GameSnapshot, InMemoryGameStore};
pub use storage::{JsonSnapshotFile, SnapshotError};
