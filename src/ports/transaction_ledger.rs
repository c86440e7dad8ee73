//! Transaction ledger port.
//!
//! Append-only. Balances are always derived from the entries, never stored.

use async_trait::async_trait;

use crate::domain::foundation::{BidId, DomainError, ParticipantId};
use crate::domain::ledger::Transaction;

/// Port for the append-only transaction ledger.
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    /// Append one entry.
    async fn append(&self, transaction: &Transaction) -> Result<(), DomainError>;

    /// Every entry where the participant is sender or receiver.
    async fn list_by_participant(
        &self,
        participant: &ParticipantId,
    ) -> Result<Vec<Transaction>, DomainError>;

    /// The settlement entry posted for a bid, if any.
    async fn find_by_bid(&self, bid_id: &BidId) -> Result<Option<Transaction>, DomainError>;
}
