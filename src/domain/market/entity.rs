//! Market entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MarketName, ValidationError};

/// A capacity-limited market that bids compete in.
///
/// # Invariants
///
/// - `min_capacity >= 0` and never changes
/// - `capacity >= min_capacity`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub name: MarketName,

    /// Current payout ceiling, rewritten once per cycle.
    pub capacity: f64,

    /// Floor below which capacity never depletes.
    pub min_capacity: f64,

    /// Undirected neighbours in the market graph.
    pub link1: Option<MarketName>,
    pub link2: Option<MarketName>,
}

impl Market {
    /// Creates an unlinked market.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if either capacity is negative or
    /// `capacity < min_capacity`.
    pub fn new(name: MarketName, capacity: f64, min_capacity: f64) -> Result<Self, ValidationError> {
        let min_capacity = ValidationError::check_non_negative("min_capacity", min_capacity)?;
        let capacity = ValidationError::check_non_negative("capacity", capacity)?;
        if capacity < min_capacity {
            return Err(ValidationError::invalid_format(
                "capacity",
                format!("capacity {} is below min_capacity {}", capacity, min_capacity),
            ));
        }
        Ok(Self {
            name,
            capacity,
            min_capacity,
            link1: None,
            link2: None,
        })
    }

    /// Builder: link this market to up to two neighbours.
    pub fn with_links(mut self, link1: Option<MarketName>, link2: Option<MarketName>) -> Self {
        self.link1 = link1;
        self.link2 = link2;
        self
    }

    /// Iterates over the neighbours this market declares.
    pub fn links(&self) -> impl Iterator<Item = &MarketName> {
        self.link1.iter().chain(self.link2.iter())
    }
}
