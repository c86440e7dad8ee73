//! SetMultiplierHandler - Command handler for administrative multipliers.
//!
//! Applies to every still-unpriced bid the participant holds in the market
//! during the current cycle. Priced bids are left as they are.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::foundation::{
    domain_event, BidId, CycleContext, DomainError, EventId, MarketName, ParticipantId,
    SerializableDomainEvent, Timestamp,
};
use crate::ports::{BidRepository, CycleCounter, EventPublisher};

/// Command to scale a participant's funding in one market.
#[derive(Debug, Clone)]
pub struct SetMultiplierCommand {
    pub participant: ParticipantId,
    pub market: MarketName,
    pub multiplier: f64,
}

/// Result of a multiplier change.
#[derive(Debug, Clone)]
pub struct SetMultiplierResult {
    pub updated: Vec<BidId>,
    pub event: MultiplierChangedEvent,
}

/// Event published when multipliers were changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiplierChangedEvent {
    pub event_id: EventId,
    pub participant: ParticipantId,
    pub market: MarketName,
    pub cycle: u32,
    pub multiplier: f64,
    pub bid_ids: Vec<BidId>,
    pub changed_at: Timestamp,
}

domain_event!(
    MultiplierChangedEvent,
    event_type = "bid.multiplier_changed",
    aggregate_id = participant,
    aggregate_type = "Participant",
    occurred_at = changed_at,
    event_id = event_id
);

/// Error type for multiplier changes.
#[derive(Debug, Clone, Error)]
pub enum SetMultiplierError {
    #[error("Invalid multiplier {0}: must be finite and non-negative")]
    InvalidMultiplier(f64),

    #[error("No unpriced bids for {participant} in {market}")]
    NoOpenBids {
        participant: ParticipantId,
        market: MarketName,
    },

    #[error("The game has not started yet")]
    GameNotStarted,

    #[error("{0}")]
    Domain(DomainError),
}

impl From<DomainError> for SetMultiplierError {
    fn from(err: DomainError) -> Self {
        SetMultiplierError::Domain(err)
    }
}

/// Handler for multiplier changes.
pub struct SetMultiplierHandler {
    bids: Arc<dyn BidRepository>,
    cycles: Arc<dyn CycleCounter>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SetMultiplierHandler {
    pub fn new(
        bids: Arc<dyn BidRepository>,
        cycles: Arc<dyn CycleCounter>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            bids,
            cycles,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: SetMultiplierCommand,
        ctx: CycleContext,
    ) -> Result<SetMultiplierResult, SetMultiplierError> {
        if !cmd.multiplier.is_finite() || cmd.multiplier < 0.0 {
            return Err(SetMultiplierError::InvalidMultiplier(cmd.multiplier));
        }

        let cycle = self
            .cycles
            .latest()
            .await?
            .ok_or(SetMultiplierError::GameNotStarted)?
            .cycle;

        let mut open: Vec<_> = self
            .bids
            .list_by_cycle(cycle, Some(&cmd.participant))
            .await?
            .into_iter()
            .filter(|b| b.market == cmd.market && !b.is_priced())
            .collect();

        if open.is_empty() {
            return Err(SetMultiplierError::NoOpenBids {
                participant: cmd.participant,
                market: cmd.market,
            });
        }

        let mut updated = Vec::with_capacity(open.len());
        for bid in &mut open {
            bid.set_multiplier(cmd.multiplier)?;
            self.bids.update_multiplier(&bid.id, bid.multiplier).await?;
            updated.push(bid.id);
        }

        info!(
            participant = %cmd.participant,
            market = %cmd.market,
            multiplier = cmd.multiplier,
            bids = updated.len(),
            "Multiplier changed"
        );

        let event = MultiplierChangedEvent {
            event_id: EventId::new(),
            participant: cmd.participant,
            market: cmd.market,
            cycle,
            multiplier: cmd.multiplier,
            bid_ids: updated.clone(),
            changed_at: ctx.now,
        };
        let envelope = event
            .to_envelope()?
            .with_correlation_id(ctx.correlation_id())
            .with_actor(ctx.actor.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(SetMultiplierResult { updated, event })
    }
}
