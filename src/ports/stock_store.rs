//! Stock price store port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::stock::StockPoint;

/// Port for the synthetic price series.
#[async_trait]
pub trait StockStore: Send + Sync {
    /// Append a batch of points.
    async fn append(&self, points: &[StockPoint]) -> Result<(), DomainError>;

    /// Full history of every ticket, in insertion order.
    async fn history(&self) -> Result<Vec<StockPoint>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn StockStore) {}
    }
}
