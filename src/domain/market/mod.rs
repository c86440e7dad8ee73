//! Market module - capacity-limited markets and their connectivity graph.

mod entity;
mod graph;

pub use entity::Market;
pub use graph::MarketGraph;
