//! Market repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MarketName};
use crate::domain::market::Market;

/// Repository port for the market table.
#[async_trait]
pub trait MarketRepository: Send + Sync {
    /// The full market table.
    async fn list(&self) -> Result<Vec<Market>, DomainError>;

    /// Overwrite a market's capacity.
    ///
    /// # Errors
    ///
    /// - `MarketNotFound` if the market doesn't exist
    /// - `ValidationFailed` if the capacity is below the market's floor
    async fn update_capacity(&self, name: &MarketName, capacity: f64) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn MarketRepository) {}
    }
}
