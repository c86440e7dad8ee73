//! PostTransferHandler - Command handler for manual ledger postings.
//!
//! Used by the operator for endowments, penalties and corrections. Any pair
//! of accounts is allowed as long as both exist.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::foundation::{
    domain_event, Account, CycleContext, DomainError, EventId, MarketName, ParticipantId,
    SerializableDomainEvent, Timestamp,
};
use crate::domain::ledger::Transaction;
use crate::ports::{
    CycleCounter, EventPublisher, MarketRepository, ParticipantDirectory, TransactionLedger,
};

/// Command to move capital between two accounts.
#[derive(Debug, Clone)]
pub struct PostTransferCommand {
    pub from: Account,
    pub to: Account,
    pub amount: f64,
}

/// Result of a posted transfer.
#[derive(Debug, Clone)]
pub struct PostTransferResult {
    pub transaction: Transaction,
    pub event: TransferPostedEvent,
}

/// Event published after a manual posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferPostedEvent {
    pub event_id: EventId,
    pub from: Account,
    pub to: Account,
    pub amount: f64,
    pub cycle: u32,
    pub posted_at: Timestamp,
}

domain_event!(
    TransferPostedEvent,
    event_type = "ledger.transfer_posted",
    aggregate_id = from,
    aggregate_type = "Account",
    occurred_at = posted_at,
    event_id = event_id
);

/// Error type for manual postings.
#[derive(Debug, Clone, Error)]
pub enum PostTransferError {
    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    #[error("Market not found: {0}")]
    MarketNotFound(MarketName),

    #[error("{0}")]
    Domain(DomainError),
}

impl From<DomainError> for PostTransferError {
    fn from(err: DomainError) -> Self {
        PostTransferError::Domain(err)
    }
}

/// Handler for manual postings.
///
/// Postings made before the first cycle is recorded are booked on cycle 0.
pub struct PostTransferHandler {
    ledger: Arc<dyn TransactionLedger>,
    participants: Arc<dyn ParticipantDirectory>,
    markets: Arc<dyn MarketRepository>,
    cycles: Arc<dyn CycleCounter>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl PostTransferHandler {
    pub fn new(
        ledger: Arc<dyn TransactionLedger>,
        participants: Arc<dyn ParticipantDirectory>,
        markets: Arc<dyn MarketRepository>,
        cycles: Arc<dyn CycleCounter>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            ledger,
            participants,
            markets,
            cycles,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: PostTransferCommand,
        ctx: CycleContext,
    ) -> Result<PostTransferResult, PostTransferError> {
        self.ensure_exists(&cmd.from).await?;
        self.ensure_exists(&cmd.to).await?;

        let cycle = self.cycles.latest().await?.map_or(0, |record| record.cycle);
        let transaction =
            Transaction::transfer(cmd.from.clone(), cmd.to.clone(), cmd.amount, cycle, ctx.now)?;
        self.ledger.append(&transaction).await?;

        info!(
            from = %cmd.from,
            to = %cmd.to,
            amount = cmd.amount,
            cycle = cycle,
            actor = %ctx.actor,
            "Transfer posted"
        );

        let event = TransferPostedEvent {
            event_id: EventId::new(),
            from: cmd.from,
            to: cmd.to,
            amount: cmd.amount,
            cycle,
            posted_at: ctx.now,
        };
        let envelope = event
            .to_envelope()?
            .with_correlation_id(ctx.correlation_id())
            .with_actor(ctx.actor.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(PostTransferResult { transaction, event })
    }

    async fn ensure_exists(&self, account: &Account) -> Result<(), PostTransferError> {
        match account {
            Account::Treasury => Ok(()),
            Account::Participant(id) => match self.participants.find(id).await? {
                Some(_) => Ok(()),
                None => Err(PostTransferError::ParticipantNotFound(id.clone())),
            },
            Account::Market(name) => {
                let markets = self.markets.list().await?;
                if markets.iter().any(|m| &m.name == name) {
                    Ok(())
                } else {
                    Err(PostTransferError::MarketNotFound(name.clone()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{GameSnapshot, InMemoryEventBus, InMemoryGameStore};
    use crate::domain::cycle::CycleRecord;
    use crate::domain::foundation::{ErrorCode, Ticket};
    use crate::domain::market::Market;
    use crate::domain::participant::Participant;

    fn arasaka() -> ParticipantId {
        ParticipantId::new("arasaka").unwrap()
    }

    fn watson() -> MarketName {
        MarketName::new("Watson").unwrap()
    }

    fn snapshot(cycles: Vec<CycleRecord>) -> GameSnapshot {
        GameSnapshot {
            participants: vec![Participant::new(
                arasaka(),
                "Arasaka",
                Ticket::new("ARSK").unwrap(),
                Some(watson()),
            )],
            markets: vec![Market::new(watson(), 1_000.0, 100.0).unwrap()],
            cycles,
            ..GameSnapshot::default()
        }
    }

    fn handler(store: &InMemoryGameStore, bus: &Arc<InMemoryEventBus>) -> PostTransferHandler {
        PostTransferHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            bus.clone(),
        )
    }

    fn endowment(amount: f64) -> PostTransferCommand {
        PostTransferCommand {
            from: Account::Treasury,
            to: Account::Participant(arasaka()),
            amount,
        }
    }

    // ────────────────────────────────────────────────────────────────
    // Success
    // ────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn endowment_is_booked_on_current_cycle() {
        let store = InMemoryGameStore::from_snapshot(snapshot(vec![
            CycleRecord::first(10.0, Timestamp::now()).unwrap(),
        ]));
        let bus = Arc::new(InMemoryEventBus::new());

        let result = handler(&store, &bus)
            .handle(endowment(2_500.0), CycleContext::operator())
            .await
            .unwrap();

        assert_eq!(result.transaction.cycle, 1);
        let history = store.list_by_participant(&arasaka()).await.unwrap();
        assert_eq!(history, vec![result.transaction]);
        assert!(bus.has_event("ledger.transfer_posted"));
    }

    #[tokio::test]
    async fn posting_before_first_cycle_uses_cycle_zero() {
        let store = InMemoryGameStore::from_snapshot(snapshot(vec![]));
        let bus = Arc::new(InMemoryEventBus::new());

        let result = handler(&store, &bus)
            .handle(endowment(100.0), CycleContext::operator())
            .await
            .unwrap();

        assert_eq!(result.transaction.cycle, 0);
    }

    #[tokio::test]
    async fn market_to_participant_is_allowed() {
        let store = InMemoryGameStore::from_snapshot(snapshot(vec![]));
        let bus = Arc::new(InMemoryEventBus::new());

        let result = handler(&store, &bus)
            .handle(
                PostTransferCommand {
                    from: Account::Market(watson()),
                    to: Account::Participant(arasaka()),
                    amount: 42.0,
                },
                CycleContext::operator(),
            )
            .await;

        assert!(result.is_ok());
    }

    // ────────────────────────────────────────────────────────────────
    // Failures
    // ────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn unknown_participant_is_refused() {
        let store = InMemoryGameStore::from_snapshot(snapshot(vec![]));
        let bus = Arc::new(InMemoryEventBus::new());

        let result = handler(&store, &bus)
            .handle(
                PostTransferCommand {
                    from: Account::Treasury,
                    to: Account::Participant(ParticipantId::new("kang-tao").unwrap()),
                    amount: 10.0,
                },
                CycleContext::operator(),
            )
            .await;

        assert!(matches!(result, Err(PostTransferError::ParticipantNotFound(_))));
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn unknown_market_is_refused() {
        let store = InMemoryGameStore::from_snapshot(snapshot(vec![]));
        let bus = Arc::new(InMemoryEventBus::new());

        let result = handler(&store, &bus)
            .handle(
                PostTransferCommand {
                    from: Account::Market(MarketName::new("Badlands").unwrap()),
                    to: Account::Treasury,
                    amount: 10.0,
                },
                CycleContext::operator(),
            )
            .await;

        assert!(matches!(result, Err(PostTransferError::MarketNotFound(_))));
    }

    #[tokio::test]
    async fn non_positive_amount_is_a_validation_error() {
        let store = InMemoryGameStore::from_snapshot(snapshot(vec![]));
        let bus = Arc::new(InMemoryEventBus::new());

        let result = handler(&store, &bus)
            .handle(endowment(0.0), CycleContext::operator())
            .await;

        match result {
            Err(PostTransferError::Domain(err)) => assert!(err.is(ErrorCode::ValidationFailed)),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(store.list_by_participant(&arasaka()).await.unwrap().is_empty());
    }
}
