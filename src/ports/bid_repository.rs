//! Bid repository port.
//!
//! Every mutation is keyed by bid id so a replayed cycle-finish can apply
//! them again without touching bids that already moved on.

use async_trait::async_trait;

use crate::domain::bid::{BidStatus, InvestmentBid};
use crate::domain::foundation::{BidId, DomainError, ParticipantId, Timestamp};

/// Repository port for investment bids.
#[async_trait]
pub trait BidRepository: Send + Sync {
    /// Persist a new bid.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, bid: &InvestmentBid) -> Result<(), DomainError>;

    /// Find a bid by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &BidId) -> Result<Option<InvestmentBid>, DomainError>;

    /// All bids of a cycle, optionally narrowed to one participant.
    ///
    /// Returns bids in creation order.
    async fn list_by_cycle(
        &self,
        cycle: u32,
        participant: Option<&ParticipantId>,
    ) -> Result<Vec<InvestmentBid>, DomainError>;

    /// Record a review decision.
    ///
    /// # Errors
    ///
    /// - `BidNotFound` if the bid doesn't exist
    async fn update_status(
        &self,
        id: &BidId,
        status: BidStatus,
        approved_at: Option<Timestamp>,
    ) -> Result<(), DomainError>;

    /// Write the settled income. One-time write.
    ///
    /// # Errors
    ///
    /// - `BidNotFound` if the bid doesn't exist
    /// - `BidAlreadyPriced` if income is already set
    async fn update_income(&self, id: &BidId, income: f64) -> Result<(), DomainError>;

    /// Change the administrative multiplier.
    ///
    /// # Errors
    ///
    /// - `BidNotFound` if the bid doesn't exist
    /// - `BidAlreadyPriced` if income is already set
    async fn update_multiplier(&self, id: &BidId, multiplier: f64) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bid_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn BidRepository) {}
    }
}
