//! Cycle Aggregator - prices every eligible bid of a cycle.
//!
//! Selects approved, unpriced bids, computes their time-accrued funding,
//! groups them by market and runs the `MarketAllocator` per market.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::bid::InvestmentBid;
use crate::domain::foundation::{
    BidId, DomainError, ErrorCode, MarketName, ParticipantId, Timestamp,
};
use crate::domain::market::Market;

use super::MarketAllocator;

/// Income settled for one bid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidIncome {
    pub bid_id: BidId,
    pub participant: ParticipantId,
    pub market: MarketName,
    pub funded_amount: f64,
    pub income: f64,
}

/// Full result set of one cycle's allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSettlement {
    pub incomes: Vec<BidIncome>,
    pub capacities: BTreeMap<MarketName, f64>,
}

/// Outcome of aggregating a cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// Nothing approved and unpriced; a legitimate no-op.
    NoEligibleBids,
    Settled(CycleSettlement),
}

impl Aggregation {
    pub fn is_noop(&self) -> bool {
        matches!(self, Aggregation::NoEligibleBids)
    }

    pub fn settlement(&self) -> Option<&CycleSettlement> {
        match self {
            Aggregation::NoEligibleBids => None,
            Aggregation::Settled(settlement) => Some(settlement),
        }
    }
}

/// Stateless aggregator over a cycle snapshot.
pub struct CycleAggregator;

impl CycleAggregator {
    /// Prices all eligible bids against the market table.
    ///
    /// Markets are processed in order of first appearance among the
    /// eligible bids; incomes keep bid order within each market.
    ///
    /// # Errors
    ///
    /// `InconsistentConfiguration` when an eligible bid references a market
    /// missing from `markets`. Nothing is partially returned.
    pub fn aggregate(
        bids: &[InvestmentBid],
        markets: &[Market],
        fund_speed: f64,
        now: Timestamp,
    ) -> Result<Aggregation, DomainError> {
        let eligible: Vec<&InvestmentBid> =
            bids.iter().filter(|b| b.is_eligible_for_pricing()).collect();
        if eligible.is_empty() {
            return Ok(Aggregation::NoEligibleBids);
        }

        let table: HashMap<&MarketName, &Market> = markets.iter().map(|m| (&m.name, m)).collect();

        let mut order: Vec<&MarketName> = Vec::new();
        let mut groups: HashMap<&MarketName, Vec<&InvestmentBid>> = HashMap::new();
        for bid in eligible {
            let group = groups.entry(&bid.market).or_insert_with(|| {
                order.push(&bid.market);
                Vec::new()
            });
            group.push(bid);
        }

        let mut incomes = Vec::new();
        let mut capacities = BTreeMap::new();
        for market_name in order {
            let market = table.get(market_name).ok_or_else(|| {
                DomainError::new(
                    ErrorCode::InconsistentConfiguration,
                    format!("Bid references unknown market '{}'", market_name),
                )
                .with_detail("market", market_name.to_string())
            })?;

            let group = &groups[market_name];
            let funded: Vec<f64> = group
                .iter()
                .map(|bid| bid.funded_amount(fund_speed, now))
                .collect();

            let allocation =
                MarketAllocator::allocate(&funded, market.capacity, market.min_capacity);

            for ((bid, funded_amount), income) in
                group.iter().zip(&funded).zip(allocation.incomes)
            {
                incomes.push(BidIncome {
                    bid_id: bid.id,
                    participant: bid.participant.clone(),
                    market: bid.market.clone(),
                    funded_amount: *funded_amount,
                    income,
                });
            }
            capacities.insert(market_name.clone(), allocation.new_capacity);
        }

        Ok(Aggregation::Settled(CycleSettlement {
            incomes,
            capacities,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000)
    }

    fn market(name: &str, capacity: f64) -> Market {
        Market::new(MarketName::new(name).unwrap(), capacity, 10_000.0).unwrap()
    }

    fn approved(participant: &str, market: &str, amount: f64) -> InvestmentBid {
        let mut bid = InvestmentBid::submit(
            ParticipantId::new(participant).unwrap(),
            MarketName::new(market).unwrap(),
            amount,
            1,
            t0(),
        )
        .unwrap();
        bid.approve(t0()).unwrap();
        bid
    }

    #[test]
    fn no_bids_is_a_noop() {
        let result = CycleAggregator::aggregate(&[], &[market("Watson", 50_000.0)], 10.0, t0());
        assert_eq!(result.unwrap(), Aggregation::NoEligibleBids);
    }

    #[test]
    fn pending_and_priced_bids_are_not_eligible() {
        let pending = InvestmentBid::submit(
            ParticipantId::new("arasaka").unwrap(),
            MarketName::new("Watson").unwrap(),
            100.0,
            1,
            t0(),
        )
        .unwrap();
        let mut priced = approved("militech", "Watson", 100.0);
        priced.assign_income(3.0).unwrap();

        let result =
            CycleAggregator::aggregate(&[pending, priced], &[market("Watson", 50_000.0)], 10.0, t0());
        assert!(result.unwrap().is_noop());
    }

    #[test]
    fn groups_bids_by_market() {
        let bids = vec![
            approved("arasaka", "Watson", 100.0),
            approved("militech", "Pacifica", 200.0),
            approved("kang-tao", "Watson", 300.0),
        ];
        let markets = vec![market("Watson", 1_000_000.0), market("Pacifica", 1_000_000.0)];

        let result =
            CycleAggregator::aggregate(&bids, &markets, 1_000.0, t0().plus_minutes(60)).unwrap();
        let settlement = result.settlement().unwrap();

        assert_eq!(settlement.incomes.len(), 3);
        assert_eq!(settlement.capacities.len(), 2);

        let order: Vec<&str> = settlement.incomes.iter().map(|i| i.market.as_str()).collect();
        assert_eq!(order, vec!["Watson", "Watson", "Pacifica"]);

        // Sole bidder in Pacifica earns roughly its stake
        let pacifica = &settlement.incomes[2];
        assert_eq!(pacifica.participant.as_str(), "militech");
        assert!((pacifica.income - 200.0).abs() < 1.0);
    }

    #[test]
    fn incomes_are_attributed_to_their_bids() {
        let bids = vec![
            approved("arasaka", "Watson", 100.0),
            approved("militech", "Watson", 300.0),
        ];
        let result = CycleAggregator::aggregate(
            &bids,
            &[market("Watson", 1_000_000.0)],
            1_000.0,
            t0().plus_minutes(60),
        )
        .unwrap();
        let settlement = result.settlement().unwrap();

        assert_eq!(settlement.incomes[0].bid_id, bids[0].id);
        assert!((settlement.incomes[0].income + 50.0).abs() < 1e-9);
        assert_eq!(settlement.incomes[1].bid_id, bids[1].id);
        assert!((settlement.incomes[1].income - 150.0).abs() < 1e-9);
    }

    #[test]
    fn funding_accrues_from_approval_time() {
        let bids = vec![approved("arasaka", "Watson", 1_000.0)];
        let result = CycleAggregator::aggregate(
            &bids,
            &[market("Watson", 1_000_000.0)],
            10.0,
            t0().plus_minutes(6),
        )
        .unwrap();

        assert_eq!(result.settlement().unwrap().incomes[0].funded_amount, 60.0);
    }

    #[test]
    fn unknown_market_aborts_the_cycle() {
        let bids = vec![
            approved("arasaka", "Watson", 100.0),
            approved("militech", "Atlantis", 100.0),
        ];
        let err = CycleAggregator::aggregate(&bids, &[market("Watson", 50_000.0)], 10.0, t0())
            .unwrap_err();

        assert!(err.is(ErrorCode::InconsistentConfiguration));
        assert_eq!(err.details.get("market"), Some(&"Atlantis".to_string()));
    }
}
