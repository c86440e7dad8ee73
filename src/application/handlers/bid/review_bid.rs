//! ReviewBidHandler - Command handler for accepting or rejecting a bid.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::bid::{BidStatus, InvestmentBid};
use crate::domain::foundation::{
    domain_event, BidId, CycleContext, DomainError, ErrorCode, EventId, MarketName,
    ParticipantId, SerializableDomainEvent, Timestamp,
};
use crate::ports::{BidRepository, EventPublisher};

/// Operator's verdict on a pending bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

/// Command to review a pending bid.
#[derive(Debug, Clone)]
pub struct ReviewBidCommand {
    pub bid_id: BidId,
    pub decision: ReviewDecision,
}

/// Result of a review.
#[derive(Debug, Clone)]
pub struct ReviewBidResult {
    pub bid: InvestmentBid,
    pub event: BidReviewedEvent,
}

/// Event published when a bid leaves the pending state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidReviewedEvent {
    pub event_id: EventId,
    pub bid_id: BidId,
    pub participant: ParticipantId,
    pub market: MarketName,
    pub status: BidStatus,
    pub reviewed_at: Timestamp,
}

domain_event!(
    BidReviewedEvent,
    event_type = "bid.reviewed",
    aggregate_id = bid_id,
    aggregate_type = "Bid",
    occurred_at = reviewed_at,
    event_id = event_id
);

/// Error type for bid review.
#[derive(Debug, Clone, Error)]
pub enum ReviewBidError {
    #[error("Bid not found: {0}")]
    NotFound(BidId),

    #[error("Bid {0} has already been reviewed")]
    AlreadyReviewed(BidId),

    #[error("{0}")]
    Domain(DomainError),
}

impl From<DomainError> for ReviewBidError {
    fn from(err: DomainError) -> Self {
        ReviewBidError::Domain(err)
    }
}

/// Handler for bid reviews.
///
/// Approval stamps the context's instant; funding accrues from there.
pub struct ReviewBidHandler {
    bids: Arc<dyn BidRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ReviewBidHandler {
    pub fn new(bids: Arc<dyn BidRepository>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            bids,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReviewBidCommand,
        ctx: CycleContext,
    ) -> Result<ReviewBidResult, ReviewBidError> {
        let mut bid = self
            .bids
            .find_by_id(&cmd.bid_id)
            .await?
            .ok_or(ReviewBidError::NotFound(cmd.bid_id))?;

        let transition = match cmd.decision {
            ReviewDecision::Approve => bid.approve(ctx.now),
            ReviewDecision::Reject => bid.reject(),
        };
        transition.map_err(|err| match err.code {
            ErrorCode::InvalidStateTransition => ReviewBidError::AlreadyReviewed(cmd.bid_id),
            _ => ReviewBidError::Domain(err),
        })?;

        self.bids
            .update_status(&bid.id, bid.status, bid.approved_at)
            .await?;

        info!(
            bid_id = %bid.id,
            participant = %bid.participant,
            market = %bid.market,
            status = %bid.status,
            "Bid reviewed"
        );

        let event = BidReviewedEvent {
            event_id: EventId::new(),
            bid_id: bid.id,
            participant: bid.participant.clone(),
            market: bid.market.clone(),
            status: bid.status,
            reviewed_at: ctx.now,
        };
        let envelope = event
            .to_envelope()?
            .with_correlation_id(ctx.correlation_id())
            .with_actor(ctx.actor.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(ReviewBidResult { bid, event })
    }
}
