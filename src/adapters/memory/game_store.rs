//! In-memory game store.
//!
//! One `GameSnapshot` behind a tokio `RwLock` implements every repository
//! port. Clones share the same state, so a single store can be handed to
//! each handler as a different port.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::bid::{BidStatus, InvestmentBid};
use crate::domain::cycle::CycleRecord;
use crate::domain::foundation::{
    BidId, DomainError, ErrorCode, MarketName, ParticipantId, Timestamp,
};
use crate::domain::ledger::Transaction;
use crate::domain::market::Market;
use crate::domain::participant::Participant;
use crate::domain::stock::StockPoint;
use crate::ports::{
    BidRepository, CycleCounter, MarketRepository, ParticipantDirectory, StockStore,
    TransactionLedger,
};

use super::GameSnapshot;

/// Shared in-memory state implementing all repository ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGameStore {
    state: Arc<RwLock<GameSnapshot>>,
}

impl InMemoryGameStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a snapshot.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Self {
        Self {
            state: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> GameSnapshot {
        self.state.read().await.clone()
    }

    /// Replace the whole state.
    pub async fn restore(&self, snapshot: GameSnapshot) {
        *self.state.write().await = snapshot;
    }
}

fn bid_not_found(id: &BidId) -> DomainError {
    DomainError::new(ErrorCode::BidNotFound, format!("Bid not found: {}", id))
        .with_detail("bid_id", id.to_string())
}

fn bid_mut<'a>(bids: &'a mut [InvestmentBid], id: &BidId) -> Result<&'a mut InvestmentBid, DomainError> {
    bids.iter_mut()
        .find(|b| &b.id == id)
        .ok_or_else(|| bid_not_found(id))
}

fn ensure_unpriced(bid: &InvestmentBid) -> Result<(), DomainError> {
    if bid.is_priced() {
        return Err(DomainError::new(
            ErrorCode::BidAlreadyPriced,
            format!("Bid {} has already been priced", bid.id),
        ));
    }
    Ok(())
}

#[async_trait]
impl BidRepository for InMemoryGameStore {
    async fn create(&self, bid: &InvestmentBid) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.bids.iter().any(|b| b.id == bid.id) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Bid {} already exists", bid.id),
            ));
        }
        state.bids.push(bid.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &BidId) -> Result<Option<InvestmentBid>, DomainError> {
        let state = self.state.read().await;
        Ok(state.bids.iter().find(|b| &b.id == id).cloned())
    }

    async fn list_by_cycle(
        &self,
        cycle: u32,
        participant: Option<&ParticipantId>,
    ) -> Result<Vec<InvestmentBid>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .bids
            .iter()
            .filter(|b| b.cycle == cycle)
            .filter(|b| participant.map_or(true, |p| &b.participant == p))
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: &BidId,
        status: BidStatus,
        approved_at: Option<Timestamp>,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let bid = bid_mut(&mut state.bids, id)?;
        bid.status = status;
        bid.approved_at = approved_at;
        Ok(())
    }

    async fn update_income(&self, id: &BidId, income: f64) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let bid = bid_mut(&mut state.bids, id)?;
        ensure_unpriced(bid)?;
        bid.income = Some(income);
        Ok(())
    }

    async fn update_multiplier(&self, id: &BidId, multiplier: f64) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let bid = bid_mut(&mut state.bids, id)?;
        ensure_unpriced(bid)?;
        bid.multiplier = multiplier;
        Ok(())
    }
}

#[async_trait]
impl MarketRepository for InMemoryGameStore {
    async fn list(&self) -> Result<Vec<Market>, DomainError> {
        Ok(self.state.read().await.markets.clone())
    }

    async fn update_capacity(&self, name: &MarketName, capacity: f64) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let market = state
            .markets
            .iter_mut()
            .find(|m| &m.name == name)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::MarketNotFound, format!("Market not found: {}", name))
                    .with_detail("market", name.to_string())
            })?;
        if !capacity.is_finite() || capacity < market.min_capacity {
            return Err(DomainError::validation(
                "capacity",
                format!(
                    "Capacity {} is below the floor {} of market {}",
                    capacity, market.min_capacity, name
                ),
            ));
        }
        market.capacity = capacity;
        Ok(())
    }
}

#[async_trait]
impl TransactionLedger for InMemoryGameStore {
    async fn append(&self, transaction: &Transaction) -> Result<(), DomainError> {
        self.state.write().await.transactions.push(transaction.clone());
        Ok(())
    }

    async fn list_by_participant(
        &self,
        participant: &ParticipantId,
    ) -> Result<Vec<Transaction>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .transactions
            .iter()
            .filter(|tx| tx.involves(participant))
            .cloned()
            .collect())
    }

    async fn find_by_bid(&self, bid_id: &BidId) -> Result<Option<Transaction>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .transactions
            .iter()
            .find(|tx| tx.bid_id.as_ref() == Some(bid_id))
            .cloned())
    }
}

#[async_trait]
impl StockStore for InMemoryGameStore {
    async fn append(&self, points: &[StockPoint]) -> Result<(), DomainError> {
        self.state.write().await.stocks.extend_from_slice(points);
        Ok(())
    }

    async fn history(&self) -> Result<Vec<StockPoint>, DomainError> {
        Ok(self.state.read().await.stocks.clone())
    }
}

#[async_trait]
impl CycleCounter for InMemoryGameStore {
    async fn latest(&self) -> Result<Option<CycleRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state.cycles.iter().max_by_key(|c| c.cycle).copied())
    }

    async fn append_next(&self, record: &CycleRecord) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let expected = state
            .cycles
            .iter()
            .map(|c| c.cycle)
            .max()
            .map_or(1, |latest| latest.saturating_add(1));
        if record.cycle != expected {
            return Err(DomainError::validation(
                "cycle",
                format!("Expected cycle {}, got {}", expected, record.cycle),
            ));
        }
        state.cycles.push(*record);
        Ok(())
    }
}

#[async_trait]
impl ParticipantDirectory for InMemoryGameStore {
    async fn list(&self) -> Result<Vec<Participant>, DomainError> {
        let mut participants = self.state.read().await.participants.clone();
        participants.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(participants)
    }

    async fn find(&self, id: &ParticipantId) -> Result<Option<Participant>, DomainError> {
        let state = self.state.read().await;
        Ok(state.participants.iter().find(|p| &p.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Account, Ticket};

    fn arasaka() -> ParticipantId {
        ParticipantId::new("arasaka").unwrap()
    }

    fn watson() -> MarketName {
        MarketName::new("Watson").unwrap()
    }

    fn seeded() -> InMemoryGameStore {
        InMemoryGameStore::from_snapshot(GameSnapshot {
            participants: vec![Participant::new(
                arasaka(),
                "Arasaka",
                Ticket::new("ARSK").unwrap(),
                Some(watson()),
            )],
            markets: vec![Market::new(watson(), 50_000.0, 10_000.0).unwrap()],
            ..GameSnapshot::default()
        })
    }

    fn bid(cycle: u32) -> InvestmentBid {
        InvestmentBid::submit(arasaka(), watson(), 100.0, cycle, Timestamp::now()).unwrap()
    }

    #[tokio::test]
    async fn created_bids_are_listed_by_cycle() {
        let store = seeded();
        store.create(&bid(1)).await.unwrap();
        store.create(&bid(2)).await.unwrap();

        assert_eq!(store.list_by_cycle(1, None).await.unwrap().len(), 1);
        assert_eq!(store.list_by_cycle(2, Some(&arasaka())).await.unwrap().len(), 1);

        let other = ParticipantId::new("militech").unwrap();
        assert!(store.list_by_cycle(1, Some(&other)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_bid_is_rejected() {
        let store = seeded();
        let b = bid(1);
        store.create(&b).await.unwrap();
        assert!(store.create(&b).await.is_err());
    }

    #[tokio::test]
    async fn income_is_written_once() {
        let store = seeded();
        let b = bid(1);
        store.create(&b).await.unwrap();

        store.update_income(&b.id, 12.5).await.unwrap();
        let err = store.update_income(&b.id, 99.0).await.unwrap_err();

        assert!(err.is(ErrorCode::BidAlreadyPriced));
        let stored = store.find_by_id(&b.id).await.unwrap().unwrap();
        assert_eq!(stored.income, Some(12.5));
    }

    #[tokio::test]
    async fn multiplier_is_frozen_after_pricing() {
        let store = seeded();
        let b = bid(1);
        store.create(&b).await.unwrap();

        store.update_multiplier(&b.id, 2.0).await.unwrap();
        store.update_income(&b.id, 1.0).await.unwrap();

        let err = store.update_multiplier(&b.id, 3.0).await.unwrap_err();
        assert!(err.is(ErrorCode::BidAlreadyPriced));
    }

    #[tokio::test]
    async fn updating_unknown_bid_fails() {
        let store = seeded();
        let err = store
            .update_status(&BidId::new(), BidStatus::Approved, Some(Timestamp::now()))
            .await
            .unwrap_err();
        assert!(err.is(ErrorCode::BidNotFound));
    }

    #[tokio::test]
    async fn capacity_update_respects_floor() {
        let store = seeded();

        store.update_capacity(&watson(), 75_000.0).await.unwrap();
        assert!(store.update_capacity(&watson(), 5_000.0).await.is_err());

        let markets = MarketRepository::list(&store).await.unwrap();
        assert_eq!(markets[0].capacity, 75_000.0);
    }

    #[tokio::test]
    async fn capacity_update_for_unknown_market_fails() {
        let store = seeded();
        let err = store
            .update_capacity(&MarketName::new("Atlantis").unwrap(), 20_000.0)
            .await
            .unwrap_err();
        assert!(err.is(ErrorCode::MarketNotFound));
    }

    #[tokio::test]
    async fn ledger_finds_settlement_by_bid() {
        let store = seeded();
        let bid_id = BidId::new();
        let tx = Transaction::settlement(bid_id, arasaka(), watson(), 5.0, 1, Timestamp::now());
        TransactionLedger::append(&store, &tx).await.unwrap();

        assert_eq!(store.find_by_bid(&bid_id).await.unwrap(), Some(tx));
        assert_eq!(store.find_by_bid(&BidId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ledger_lists_only_participant_entries() {
        let store = seeded();
        let mine = Transaction::transfer(
            Account::Treasury,
            Account::Participant(arasaka()),
            100.0,
            0,
            Timestamp::now(),
        )
        .unwrap();
        let theirs =
            Transaction::transfer(Account::Treasury, Account::Market(watson()), 100.0, 0, Timestamp::now())
                .unwrap();
        TransactionLedger::append(&store, &mine).await.unwrap();
        TransactionLedger::append(&store, &theirs).await.unwrap();

        assert_eq!(store.list_by_participant(&arasaka()).await.unwrap(), vec![mine]);
    }

    #[tokio::test]
    async fn cycle_counter_only_advances_by_one() {
        let store = seeded();
        assert_eq!(store.latest().await.unwrap(), None);

        let first = CycleRecord::first(10.0, Timestamp::now()).unwrap();
        store.append_next(&first).await.unwrap();

        let skipped = CycleRecord {
            cycle: 3,
            ..first
        };
        assert!(store.append_next(&skipped).await.is_err());

        let second = first.next(20.0, Timestamp::now()).unwrap();
        store.append_next(&second).await.unwrap();
        assert_eq!(store.latest().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = seeded();
        let clone = store.clone();
        store.create(&bid(1)).await.unwrap();

        assert_eq!(clone.snapshot().await.bids.len(), 1);
    }
}
