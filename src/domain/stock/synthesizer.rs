//! Stock Synthesizer - turns realized income into a short price path.
//!
//! Each ticket gets five points inside the cycle. A point's price is the
//! ticket's last known price plus `5 * (income / scale * w_k + z_k)`, where
//! `w_k` are random weights summing to one and `z_k` is standard normal
//! noise.

use std::collections::BTreeMap;

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::domain::bid::InvestmentBid;
use crate::domain::foundation::{ParticipantId, Ticket};
use crate::domain::participant::Participant;

/// Fractional positions of the synthesized points within a cycle.
pub const STOCK_OFFSETS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

/// Income that moves a price by one noise unit.
pub const DEFAULT_INCOME_SCALE: f64 = 5_000_000.0;

const STEP_SCALE: f64 = 5.0;

/// One point of a ticket's price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPoint {
    /// Cycle number plus the offset inside the cycle.
    pub cycle: f64,
    pub ticket: Ticket,
    pub price: f64,
}

impl StockPoint {
    /// Returns true if this point was synthesized for `cycle`.
    pub fn belongs_to_cycle(&self, cycle: u32) -> bool {
        let base = f64::from(cycle);
        STOCK_OFFSETS
            .iter()
            .any(|offset| (self.cycle - (base + offset)).abs() < 1e-9)
    }
}

/// Random-walk-with-drift price generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockSynthesizer {
    income_scale: f64,
    initial_price: f64,
}

impl Default for StockSynthesizer {
    fn default() -> Self {
        Self {
            income_scale: DEFAULT_INCOME_SCALE,
            initial_price: 100.0,
        }
    }
}

impl StockSynthesizer {
    pub fn new(income_scale: f64, initial_price: f64) -> Self {
        Self {
            income_scale,
            initial_price,
        }
    }

    /// Generates five points per ticket in `incomes`.
    ///
    /// Output is ordered by ticket, then by offset. Without a seeded `rng`
    /// the result is not reproducible.
    pub fn synthesize<R: Rng>(
        &self,
        incomes: &BTreeMap<Ticket, f64>,
        history: &[StockPoint],
        cycle: u32,
        rng: &mut R,
    ) -> Vec<StockPoint> {
        let last_prices = last_prices(history);
        let base = f64::from(cycle);

        let mut points = Vec::with_capacity(incomes.len() * STOCK_OFFSETS.len());
        for (ticket, income) in incomes {
            let last_price = last_prices
                .get(ticket)
                .copied()
                .unwrap_or(self.initial_price);
            let weights = random_weights(rng);
            let income_rel = income / self.income_scale;

            for (offset, weight) in STOCK_OFFSETS.iter().zip(weights) {
                let noise: f64 = rng.sample(StandardNormal);
                points.push(StockPoint {
                    cycle: base + offset,
                    ticket: ticket.clone(),
                    price: last_price + STEP_SCALE * (income_rel * weight + noise),
                });
            }
        }
        points
    }
}

/// Price of each ticket's latest point.
///
/// Ties on cycle keep the later entry in `history`.
fn last_prices(history: &[StockPoint]) -> BTreeMap<&Ticket, f64> {
    let mut latest: BTreeMap<&Ticket, (f64, f64)> = BTreeMap::new();
    for point in history {
        let entry = latest
            .entry(&point.ticket)
            .or_insert((point.cycle, point.price));
        if point.cycle >= entry.0 {
            *entry = (point.cycle, point.price);
        }
    }
    latest
        .into_iter()
        .map(|(ticket, (_, price))| (ticket, price))
        .collect()
}

/// Five non-negative weights summing to one.
fn random_weights<R: Rng>(rng: &mut R) -> [f64; 5] {
    let mut cuts = [0.0f64; 6];
    for cut in cuts.iter_mut().skip(1).take(4) {
        *cut = rng.gen::<f64>();
    }
    cuts[1..5].sort_by(f64::total_cmp);
    cuts[5] = 1.0;

    let mut weights = [0.0; 5];
    for (k, weight) in weights.iter_mut().enumerate() {
        *weight = cuts[k + 1] - cuts[k];
    }
    weights
}

/// Sums realized income per ticket.
///
/// With no priced bids at all every participant's ticket gets zero income;
/// otherwise only tickets owning at least one priced bid appear. Bids from
/// participants missing from the directory are ignored.
pub fn ticket_incomes(
    priced: &[InvestmentBid],
    participants: &[Participant],
) -> BTreeMap<Ticket, f64> {
    if priced.is_empty() {
        return participants
            .iter()
            .map(|p| (p.ticket.clone(), 0.0))
            .collect();
    }

    let tickets: BTreeMap<&ParticipantId, &Ticket> =
        participants.iter().map(|p| (&p.id, &p.ticket)).collect();

    let mut incomes = BTreeMap::new();
    for bid in priced {
        let (Some(income), Some(ticket)) = (bid.income, tickets.get(&bid.participant)) else {
            continue;
        };
        *incomes.entry((*ticket).clone()).or_insert(0.0) += income;
    }
    incomes
}
