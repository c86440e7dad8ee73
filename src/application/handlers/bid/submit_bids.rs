//! SubmitBidsHandler - Command handler for a participant's bid batch.
//!
//! Each requested market is checked on its own:
//!
//! 1. Zero amounts are ignored
//! 2. The market must be unlocked for the participant this cycle
//! 3. A market with an unpriced pending or approved bid this cycle is frozen
//! 4. Walking markets in name order, every remaining request is added to a
//!    running total; once that total exceeds the available balance the
//!    request is rejected, and so is every later one it still overshoots
//!
//! Rejected markets are reported back; accepted ones become pending bids.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::bid::{green_markets, InvestmentBid};
use crate::domain::foundation::{
    domain_event, BidId, CycleContext, DomainError, EventId, MarketName,
    ParticipantId, SerializableDomainEvent, Timestamp,
};
use crate::domain::ledger::{frozen_amount, Balance};
use crate::domain::market::MarketGraph;
use crate::ports::{
    BidRepository, CycleCounter, EventPublisher, MarketRepository, ParticipantDirectory,
    TransactionLedger,
};

/// Command to submit bids across several markets at once.
#[derive(Debug, Clone)]
pub struct SubmitBidsCommand {
    pub participant: ParticipantId,
    /// Requested amount per market.
    pub amounts: BTreeMap<MarketName, f64>,
}

/// Why a requested market was not turned into a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Negative or non-finite amount.
    InvalidAmount,
    /// Not the home market and not next to a green market.
    NotUnlocked,
    /// Already holds an unpriced pending or approved bid this cycle.
    Frozen,
    /// Would push the batch over the available balance.
    InsufficientBalance,
}

/// A market left out of the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedMarket {
    pub market: MarketName,
    pub amount: f64,
    pub reason: RejectionReason,
}

/// Result of a bid submission.
#[derive(Debug, Clone)]
pub struct SubmitBidsResult {
    /// New pending bids, in market name order.
    pub accepted: Vec<InvestmentBid>,
    pub rejected: Vec<RejectedMarket>,
    /// Balance available before this batch.
    pub available_before: f64,
    pub event: BidsSubmittedEvent,
}

/// Event published after a submission, even when every market was rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidsSubmittedEvent {
    pub event_id: EventId,
    pub participant: ParticipantId,
    pub cycle: u32,
    pub accepted: Vec<BidId>,
    pub rejected: Vec<RejectedMarket>,
    pub submitted_at: Timestamp,
}

domain_event!(
    BidsSubmittedEvent,
    event_type = "bids.submitted",
    aggregate_id = participant,
    aggregate_type = "Participant",
    occurred_at = submitted_at,
    event_id = event_id
);

/// Error type for bid submission.
#[derive(Debug, Clone, Error)]
pub enum SubmitBidsError {
    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    #[error("The game has not started yet")]
    GameNotStarted,

    #[error("{0}")]
    Domain(DomainError),
}

impl From<DomainError> for SubmitBidsError {
    fn from(err: DomainError) -> Self {
        SubmitBidsError::Domain(err)
    }
}

/// Handler for participant bid submissions.
pub struct SubmitBidsHandler {
    bids: Arc<dyn BidRepository>,
    markets: Arc<dyn MarketRepository>,
    ledger: Arc<dyn TransactionLedger>,
    cycles: Arc<dyn CycleCounter>,
    participants: Arc<dyn ParticipantDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SubmitBidsHandler {
    pub fn new(
        bids: Arc<dyn BidRepository>,
        markets: Arc<dyn MarketRepository>,
        ledger: Arc<dyn TransactionLedger>,
        cycles: Arc<dyn CycleCounter>,
        participants: Arc<dyn ParticipantDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            bids,
            markets,
            ledger,
            cycles,
            participants,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitBidsCommand,
        ctx: CycleContext,
    ) -> Result<SubmitBidsResult, SubmitBidsError> {
        // 1. Resolve participant and cycle
        let participant = self
            .participants
            .find(&cmd.participant)
            .await?
            .ok_or_else(|| SubmitBidsError::ParticipantNotFound(cmd.participant.clone()))?;
        let cycle = self
            .cycles
            .latest()
            .await?
            .ok_or(SubmitBidsError::GameNotStarted)?
            .cycle;

        // 2. Unlocked markets from last cycle's green positions
        let markets = self.markets.list().await?;
        let previous = match cycle.checked_sub(1) {
            Some(prev) => self.bids.list_by_cycle(prev, Some(&participant.id)).await?,
            None => Vec::new(),
        };
        let green = green_markets(&previous, &participant.id);
        let unlocked =
            MarketGraph::new(&markets).unlocked_for(participant.home_market.as_ref(), &green);

        // 3. Available balance and frozen markets
        let current = self.bids.list_by_cycle(cycle, Some(&participant.id)).await?;
        let transactions = self.ledger.list_by_participant(&participant.id).await?;
        let balance = Balance::derive(&transactions, &participant.id, cycle);
        let available = balance.available(frozen_amount(&current, &participant.id, cycle));

        // 4. Walk requested markets in name order
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        let mut running_total = 0.0;
        for (market, amount) in cmd.amounts {
            if amount == 0.0 {
                continue;
            }
            let reason = if !amount.is_finite() || amount < 0.0 {
                Some(RejectionReason::InvalidAmount)
            } else if !unlocked.contains(&market) {
                Some(RejectionReason::NotUnlocked)
            } else if current.iter().any(|b| b.market == market && b.is_active()) {
                Some(RejectionReason::Frozen)
            } else {
                // Every unlocked, unfrozen request counts, accepted or not
                running_total += amount;
                (running_total > available).then_some(RejectionReason::InsufficientBalance)
            };

            if let Some(reason) = reason {
                warn!(
                    participant = %participant.id,
                    market = %market,
                    amount,
                    ?reason,
                    "Bid rejected at submission"
                );
                rejected.push(RejectedMarket {
                    market,
                    amount,
                    reason,
                });
                continue;
            }

            let bid = InvestmentBid::submit(participant.id.clone(), market, amount, cycle, ctx.now)
                .map_err(DomainError::from)?;
            self.bids.create(&bid).await?;
            accepted.push(bid);
        }

        info!(
            participant = %participant.id,
            cycle,
            accepted = accepted.len(),
            rejected = rejected.len(),
            requested = running_total,
            "Bids submitted"
        );

        // 5. Publish event
        let event = BidsSubmittedEvent {
            event_id: EventId::new(),
            participant: participant.id.clone(),
            cycle,
            accepted: accepted.iter().map(|b| b.id).collect(),
            rejected: rejected.clone(),
            submitted_at: ctx.now,
        };
        let envelope = event
            .to_envelope()?
            .with_correlation_id(ctx.correlation_id())
            .with_actor(ctx.actor.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(SubmitBidsResult {
            accepted,
            rejected,
            available_before: available,
            event,
        })
    }
}
