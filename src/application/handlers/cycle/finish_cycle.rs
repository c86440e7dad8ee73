//! FinishCycleHandler - Command handler that closes the current cycle.
//!
//! Runs, in order:
//!
//! 1. Green carry-forward into the current cycle
//! 2. Aggregation of approved, unpriced bids with the cycle's fund speed
//! 3. Market capacity writes
//! 4. Income assignment per bid
//! 5. Ledger reconciliation: one settlement transaction per priced bid
//! 6. Stock synthesis for the cycle
//! 7. Appending the next cycle record
//!
//! # Replay
//!
//! Re-running after a failure is safe from step 4 onward. Priced bids are
//! never re-priced, settlement transactions are only posted for priced bids
//! without one, and stock rows are only synthesized while the cycle has none.
//! A failure between steps 3 and 4 leaves capacities already rewritten; a
//! replay then allocates against the new capacities.

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::bid::{plan_green_carry, InvestmentBid};
use crate::domain::cycle::CycleRecord;
use crate::domain::foundation::{
    domain_event, CycleContext, DomainError, ErrorCode, EventId, MarketName,
    SerializableDomainEvent, Timestamp,
};
use crate::domain::ledger::Transaction;
use crate::domain::market::Market;
use crate::domain::settlement::{Aggregation, CycleAggregator, CycleSettlement};
use crate::domain::stock::{ticket_incomes, StockPoint, StockSynthesizer};
use crate::ports::{
    BidRepository, CycleCounter, EventPublisher, MarketRepository, ParticipantDirectory,
    StockStore, TransactionLedger,
};

/// Command to finish the current cycle.
#[derive(Debug, Clone, Default)]
pub struct FinishCycleCommand {
    /// Fund speed for the next cycle; the current one is kept when `None`.
    pub next_fund_speed: Option<f64>,
}

/// Tunables of the cycle finish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinishCycleSettings {
    /// Amount of each carried green bid.
    pub green_carry_amount: f64,
    pub synthesizer: StockSynthesizer,
}

impl Default for FinishCycleSettings {
    fn default() -> Self {
        Self {
            green_carry_amount: 1.0,
            synthesizer: StockSynthesizer::default(),
        }
    }
}

/// Result of a finished cycle.
#[derive(Debug, Clone)]
pub struct FinishCycleResult {
    pub finished: CycleRecord,
    pub next: CycleRecord,
    /// Green bids created by this run.
    pub carried: Vec<InvestmentBid>,
    /// `None` when no bid was eligible for pricing.
    pub settlement: Option<CycleSettlement>,
    /// Settlement transactions posted by this run.
    pub transactions: Vec<Transaction>,
    /// Stock points appended by this run.
    pub stock_points: Vec<StockPoint>,
    pub event: CycleFinishedEvent,
}

/// Event published once the next cycle record is appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleFinishedEvent {
    pub event_id: EventId,
    pub cycle: u32,
    pub next_cycle: u32,
    pub fund_speed: f64,
    pub next_fund_speed: f64,
    pub carried_bids: usize,
    pub priced_bids: usize,
    pub transactions_posted: usize,
    pub stock_points: usize,
    pub finished_at: Timestamp,
}

domain_event!(
    CycleFinishedEvent,
    event_type = "cycle.finished",
    aggregate_id = cycle,
    aggregate_type = "Cycle",
    occurred_at = finished_at,
    event_id = event_id
);

/// Error type for finishing a cycle.
#[derive(Debug, Clone, Error)]
pub enum FinishCycleError {
    #[error("The game has not started yet")]
    GameNotStarted,

    #[error("Inconsistent market configuration: {0}")]
    InconsistentConfiguration(String),

    #[error("{0}")]
    Domain(DomainError),
}

impl From<DomainError> for FinishCycleError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InconsistentConfiguration => {
                FinishCycleError::InconsistentConfiguration(err.message)
            }
            _ => FinishCycleError::Domain(err),
        }
    }
}

/// Handler for the cycle finish.
pub struct FinishCycleHandler {
    bids: Arc<dyn BidRepository>,
    markets: Arc<dyn MarketRepository>,
    ledger: Arc<dyn TransactionLedger>,
    stocks: Arc<dyn StockStore>,
    cycles: Arc<dyn CycleCounter>,
    participants: Arc<dyn ParticipantDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
    settings: FinishCycleSettings,
    rng: Mutex<StdRng>,
}

impl FinishCycleHandler {
    pub fn new(
        bids: Arc<dyn BidRepository>,
        markets: Arc<dyn MarketRepository>,
        ledger: Arc<dyn TransactionLedger>,
        stocks: Arc<dyn StockStore>,
        cycles: Arc<dyn CycleCounter>,
        participants: Arc<dyn ParticipantDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            bids,
            markets,
            ledger,
            stocks,
            cycles,
            participants,
            event_publisher,
            settings: FinishCycleSettings::default(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Builder: override the default settings.
    pub fn with_settings(mut self, settings: FinishCycleSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builder: seed the stock noise for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub async fn handle(
        &self,
        cmd: FinishCycleCommand,
        ctx: CycleContext,
    ) -> Result<FinishCycleResult, FinishCycleError> {
        let current = self
            .cycles
            .latest()
            .await?
            .ok_or(FinishCycleError::GameNotStarted)?;
        let next_speed = cmd.next_fund_speed.unwrap_or(current.fund_speed);
        let next = current.next(next_speed, ctx.now)?;

        info!(
            cycle = current.cycle,
            fund_speed = current.fund_speed,
            next_fund_speed = next.fund_speed,
            "Finishing cycle"
        );

        let markets = self.markets.list().await?;
        let mut bids = self.bids.list_by_cycle(current.cycle, None).await?;

        // 1. Green carry
        let carried = self.carry_green_positions(&current, &bids, &markets).await?;
        bids.extend(carried.iter().cloned());

        // 2-4. Aggregate, write capacities, price bids
        let aggregation =
            CycleAggregator::aggregate(&bids, &markets, current.fund_speed, ctx.now)?;
        let settlement = match aggregation {
            Aggregation::NoEligibleBids => {
                info!(cycle = current.cycle, "No eligible bids to price");
                None
            }
            Aggregation::Settled(settlement) => {
                for (market, capacity) in &settlement.capacities {
                    debug!(market = %market, capacity = capacity, "Market capacity updated");
                    self.markets.update_capacity(market, *capacity).await?;
                }
                for income in &settlement.incomes {
                    self.bids.update_income(&income.bid_id, income.income).await?;
                }
                Some(settlement)
            }
        };

        // 5. Reconcile the ledger against every priced bid of the cycle
        let priced: Vec<InvestmentBid> = self
            .bids
            .list_by_cycle(current.cycle, None)
            .await?
            .into_iter()
            .filter(InvestmentBid::is_priced)
            .collect();
        let transactions = self.reconcile_ledger(&priced, current.cycle, ctx.now).await?;

        // 6. Stock synthesis
        let stock_points = self.synthesize_stock(&priced, current.cycle).await?;

        // 7. Advance
        self.cycles.append_next(&next).await?;

        info!(
            cycle = current.cycle,
            next_cycle = next.cycle,
            carried = carried.len(),
            priced = priced.len(),
            transactions = transactions.len(),
            stock_points = stock_points.len(),
            "Cycle finished"
        );

        let event = CycleFinishedEvent {
            event_id: EventId::new(),
            cycle: current.cycle,
            next_cycle: next.cycle,
            fund_speed: current.fund_speed,
            next_fund_speed: next.fund_speed,
            carried_bids: carried.len(),
            priced_bids: priced.len(),
            transactions_posted: transactions.len(),
            stock_points: stock_points.len(),
            finished_at: ctx.now,
        };
        let envelope = event
            .to_envelope()?
            .with_correlation_id(ctx.correlation_id())
            .with_actor(ctx.actor.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(FinishCycleResult {
            finished: current,
            next,
            carried,
            settlement,
            transactions,
            stock_points,
            event,
        })
    }

    async fn carry_green_positions(
        &self,
        current: &CycleRecord,
        bids: &[InvestmentBid],
        markets: &[Market],
    ) -> Result<Vec<InvestmentBid>, FinishCycleError> {
        let Some(previous_cycle) = current.previous_cycle() else {
            return Ok(Vec::new());
        };
        let previous = self.bids.list_by_cycle(previous_cycle, None).await?;
        let known: BTreeSet<&MarketName> = markets.iter().map(|m| &m.name).collect();

        let plan = plan_green_carry(&previous, bids);
        // Nothing is created unless every position's market still exists
        if let Some(position) = plan.iter().find(|p| !known.contains(&p.market)) {
            return Err(DomainError::new(
                ErrorCode::InconsistentConfiguration,
                format!(
                    "Green position of '{}' references unknown market '{}'",
                    position.participant, position.market
                ),
            )
            .with_detail("market", position.market.to_string())
            .into());
        }

        let mut carried = Vec::new();
        for position in plan {
            let bid = InvestmentBid::green_carry(
                position.participant,
                position.market,
                self.settings.green_carry_amount,
                current.cycle,
                current.started_at,
            )
            .map_err(DomainError::from)?;
            self.bids.create(&bid).await?;
            debug!(
                bid_id = %bid.id,
                participant = %bid.participant,
                market = %bid.market,
                "Green position carried"
            );
            carried.push(bid);
        }
        Ok(carried)
    }

    async fn reconcile_ledger(
        &self,
        priced: &[InvestmentBid],
        cycle: u32,
        now: Timestamp,
    ) -> Result<Vec<Transaction>, FinishCycleError> {
        let mut posted = Vec::new();
        let mut already_settled = 0usize;
        for bid in priced {
            let Some(income) = bid.income else { continue };
            if self.ledger.find_by_bid(&bid.id).await?.is_some() {
                already_settled += 1;
                continue;
            }
            let transaction = Transaction::settlement(
                bid.id,
                bid.participant.clone(),
                bid.market.clone(),
                income,
                cycle,
                now,
            );
            self.ledger.append(&transaction).await?;
            posted.push(transaction);
        }
        if already_settled > 0 {
            warn!(
                cycle = cycle,
                already_settled = already_settled,
                "Skipped bids that already have a settlement transaction"
            );
        }
        Ok(posted)
    }

    async fn synthesize_stock(
        &self,
        priced: &[InvestmentBid],
        cycle: u32,
    ) -> Result<Vec<StockPoint>, FinishCycleError> {
        let history = self.stocks.history().await?;
        if history.iter().any(|point| point.belongs_to_cycle(cycle)) {
            warn!(cycle = cycle, "Stock already synthesized for cycle, skipping");
            return Ok(Vec::new());
        }

        let participants = self.participants.list().await?;
        let incomes = ticket_incomes(priced, &participants);
        let points = {
            let mut rng = self.rng.lock().await;
            self.settings
                .synthesizer
                .synthesize(&incomes, &history, cycle, &mut *rng)
        };
        self.stocks.append(&points).await?;
        Ok(points)
    }
}
