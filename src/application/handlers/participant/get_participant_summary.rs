//! GetParticipantSummaryHandler - Query handler for a participant's position.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::bid::{green_markets, InvestmentBid};
use crate::domain::foundation::{Actor, CycleContext, DomainError, MarketName, ParticipantId};
use crate::domain::ledger::{frozen_amount, Balance};
use crate::domain::market::MarketGraph;
use crate::domain::participant::Participant;
use crate::ports::{
    BidRepository, CycleCounter, MarketRepository, ParticipantDirectory, TransactionLedger,
};

/// Query for one participant's summary.
#[derive(Debug, Clone)]
pub struct GetParticipantSummaryQuery {
    pub participant: ParticipantId,
}

/// Read model of a participant at the current cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub participant: Participant,
    pub cycle: u32,
    pub balance: f64,
    pub previous_cycle_net: f64,
    pub frozen: f64,
    pub available: f64,
    pub unlocked_markets: BTreeSet<MarketName>,
    pub current_bids: Vec<InvestmentBid>,
    pub previous_bids: Vec<InvestmentBid>,
}

/// Error type for the summary query.
#[derive(Debug, Clone, Error)]
pub enum GetParticipantSummaryError {
    #[error("Participant not found: {0}")]
    NotFound(ParticipantId),

    #[error("Not allowed to view participant {0}")]
    Forbidden(ParticipantId),

    #[error("The game has not started yet")]
    GameNotStarted,

    #[error("{0}")]
    Domain(DomainError),
}

impl From<DomainError> for GetParticipantSummaryError {
    fn from(err: DomainError) -> Self {
        GetParticipantSummaryError::Domain(err)
    }
}

/// Handler for participant summaries.
pub struct GetParticipantSummaryHandler {
    participants: Arc<dyn ParticipantDirectory>,
    bids: Arc<dyn BidRepository>,
    markets: Arc<dyn MarketRepository>,
    ledger: Arc<dyn TransactionLedger>,
    cycles: Arc<dyn CycleCounter>,
}

impl GetParticipantSummaryHandler {
    pub fn new(
        participants: Arc<dyn ParticipantDirectory>,
        bids: Arc<dyn BidRepository>,
        markets: Arc<dyn MarketRepository>,
        ledger: Arc<dyn TransactionLedger>,
        cycles: Arc<dyn CycleCounter>,
    ) -> Self {
        Self {
            participants,
            bids,
            markets,
            ledger,
            cycles,
        }
    }

    pub async fn handle(
        &self,
        query: GetParticipantSummaryQuery,
        ctx: &CycleContext,
    ) -> Result<ParticipantSummary, GetParticipantSummaryError> {
        // Participants may only look at themselves
        if let Actor::Participant(caller) = &ctx.actor {
            if caller != &query.participant {
                return Err(GetParticipantSummaryError::Forbidden(query.participant));
            }
        }

        let participant = self
            .participants
            .find(&query.participant)
            .await?
            .ok_or_else(|| GetParticipantSummaryError::NotFound(query.participant.clone()))?;

        let record = self
            .cycles
            .latest()
            .await?
            .ok_or(GetParticipantSummaryError::GameNotStarted)?;

        let current_bids = self
            .bids
            .list_by_cycle(record.cycle, Some(&participant.id))
            .await?;
        let previous_bids = match record.previous_cycle() {
            Some(previous) => {
                self.bids
                    .list_by_cycle(previous, Some(&participant.id))
                    .await?
            }
            None => Vec::new(),
        };

        let transactions = self.ledger.list_by_participant(&participant.id).await?;
        let balance = Balance::derive(&transactions, &participant.id, record.cycle);
        let frozen = frozen_amount(&current_bids, &participant.id, record.cycle);

        let markets = self.markets.list().await?;
        let green = green_markets(&previous_bids, &participant.id);
        let unlocked_markets =
            MarketGraph::new(&markets).unlocked_for(participant.home_market.as_ref(), &green);

        Ok(ParticipantSummary {
            cycle: record.cycle,
            balance: balance.total,
            previous_cycle_net: balance.previous_cycle_net,
            frozen,
            available: balance.available(frozen),
            unlocked_markets,
            current_bids,
            previous_bids,
            participant,
        })
    }
}
