//! In-memory adapters.
//!
//! - `InMemoryGameStore` - Implements every repository port over one shared snapshot
//! - `GameSnapshot` - Serializable image of the whole game state

mod game_store;
mod snapshot;

pub use game_store::InMemoryGameStore;
pub use snapshot::GameSnapshot;
