//! Market Allocator - divides one market's payout capacity among bids.
//!
//! For funded amounts `x` with shares `p_i = x_i / Σx`:
//!
//! ```text
//! y_i      = (1 - Σ p_j²) / (1 - p_i) * x_i
//! income_i = min(y_i - x_i, capacity)
//! capacity' = max(capacity + Σx / 2 - max(income), min_capacity)
//! ```
//!
//! Half of the committed capital (the jackpot) flows back into the market
//! while the single largest payout drains it.

use serde::{Deserialize, Serialize};

/// Perturbation applied to a share of exactly one.
pub const SOLE_SHARE_EPSILON: f64 = 1e-12;

/// Outcome of one market's allocation, aligned with the input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub incomes: Vec<f64>,
    pub new_capacity: f64,
}

impl Allocation {
    /// Half of the capital committed to the market this cycle.
    pub fn jackpot(funded: &[f64]) -> f64 {
        funded.iter().sum::<f64>() / 2.0
    }
}

/// Stateless allocator for a single market.
pub struct MarketAllocator;

impl MarketAllocator {
    /// Allocates incomes and computes the market's next capacity.
    ///
    /// Callers filter out empty groups. Entries are expected to be `>= 0`.
    ///
    /// # Edge Cases
    /// - Sole bidder: its share of 1 is nudged by `SOLE_SHARE_EPSILON`, so
    ///   income stays finite (roughly `min(x, capacity)`).
    /// - All-zero funding: every income is zero and capacity is kept
    ///   (still floored at `min_capacity`).
    pub fn allocate(funded: &[f64], capacity: f64, min_capacity: f64) -> Allocation {
        let total: f64 = funded.iter().sum();

        if funded.is_empty() || total <= 0.0 {
            return Allocation {
                incomes: vec![0.0; funded.len()],
                new_capacity: capacity.max(min_capacity),
            };
        }

        let shares: Vec<f64> = funded
            .iter()
            .map(|x| x / total)
            .map(|p| if p == 1.0 { p - SOLE_SHARE_EPSILON } else { p })
            .collect();
        let concentration = 1.0 - shares.iter().map(|p| p * p).sum::<f64>();

        let incomes: Vec<f64> = funded
            .iter()
            .zip(&shares)
            .map(|(x, p)| {
                let payout = concentration / (1.0 - p) * x;
                (payout - x).min(capacity)
            })
            .collect();

        let max_income = incomes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let new_capacity = (capacity + Allocation::jackpot(funded) - max_income).max(min_capacity);

        Allocation {
            incomes,
            new_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CAPACITY: f64 = 1_000_000.0;
    const MIN_CAPACITY: f64 = 10_000.0;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn equal_stakes_break_even() {
        let result = MarketAllocator::allocate(&[250.0; 4], CAPACITY, MIN_CAPACITY);
        for income in &result.incomes {
            assert!(approx(*income, 0.0), "income {} should be ~0", income);
        }
        assert!(approx(result.new_capacity, CAPACITY + 500.0));
    }

    #[test]
    fn sole_bidder_income_is_finite_and_near_stake() {
        let result = MarketAllocator::allocate(&[400.0], CAPACITY, MIN_CAPACITY);
        let income = result.incomes[0];

        assert!(income.is_finite());
        assert!((income - 400.0).abs() < 1.0, "income {} should be ~400", income);
    }

    #[test]
    fn sole_bidder_income_is_capped_by_capacity() {
        let result = MarketAllocator::allocate(&[50_000.0], 20_000.0, MIN_CAPACITY);
        assert_eq!(result.incomes[0], 20_000.0);
        // 20_000 + 25_000 - 20_000
        assert!(approx(result.new_capacity, 25_000.0));
    }

    #[test]
    fn larger_share_earns_higher_return() {
        let result = MarketAllocator::allocate(&[100.0, 300.0], CAPACITY, MIN_CAPACITY);
        let small = result.incomes[0];
        let large = result.incomes[1];

        // H = 1 - (0.25² + 0.75²) = 0.375
        assert!(approx(small, 0.375 / 0.75 * 100.0 - 100.0));
        assert!(approx(large, 0.375 / 0.25 * 300.0 - 300.0));
        assert!(large / 300.0 > small / 100.0);
    }

    #[test]
    fn capacity_is_replenished_by_jackpot_minus_top_payout() {
        let result = MarketAllocator::allocate(&[100.0, 300.0], CAPACITY, MIN_CAPACITY);
        // jackpot 200, top payout 150
        assert!(approx(result.new_capacity, CAPACITY + 200.0 - 150.0));
    }

    #[test]
    fn capacity_never_drops_below_floor() {
        let result = MarketAllocator::allocate(&[1_000.0, 9_000_000.0], 12_000.0, MIN_CAPACITY);
        assert!(result.new_capacity >= MIN_CAPACITY);
    }

    #[test]
    fn zero_funding_pays_nothing_and_keeps_capacity() {
        let result = MarketAllocator::allocate(&[0.0, 0.0], 30_000.0, MIN_CAPACITY);
        assert_eq!(result.incomes, vec![0.0, 0.0]);
        assert_eq!(result.new_capacity, 30_000.0);
    }

    #[test]
    fn zero_stake_beside_positive_stake_earns_nothing() {
        let result = MarketAllocator::allocate(&[0.0, 500.0], CAPACITY, MIN_CAPACITY);
        assert_eq!(result.incomes[0], 0.0);
        assert!(result.incomes[1].is_finite());
    }

    #[test]
    fn jackpot_is_half_of_total() {
        assert_eq!(Allocation::jackpot(&[100.0, 300.0]), 200.0);
    }

    proptest! {
        #[test]
        fn new_capacity_respects_floor(
            funded in prop::collection::vec(0.0f64..1e7, 1..12),
            floor in 0.0f64..1e6,
            headroom in 0.0f64..1e7,
        ) {
            let result = MarketAllocator::allocate(&funded, floor + headroom, floor);
            prop_assert!(result.new_capacity >= floor);
        }

        #[test]
        fn incomes_are_finite_and_capped(
            funded in prop::collection::vec(0.0f64..1e7, 1..12),
            capacity in 1e4f64..1e7,
        ) {
            let result = MarketAllocator::allocate(&funded, capacity, 1e4);
            prop_assert_eq!(result.incomes.len(), funded.len());
            for income in &result.incomes {
                prop_assert!(income.is_finite());
                prop_assert!(*income <= capacity);
            }
        }

        #[test]
        fn equal_entries_get_equal_incomes(stake in 1.0f64..1e6, n in 2usize..10) {
            let result = MarketAllocator::allocate(&vec![stake; n], 1e6, 1e4);
            let first = result.incomes[0];
            for income in &result.incomes {
                prop_assert!((income - first).abs() <= 1e-9 * stake);
            }
        }

        #[test]
        fn allocation_is_order_independent(
            funded in prop::collection::vec(1.0f64..1e6, 2..8),
        ) {
            let forward = MarketAllocator::allocate(&funded, 1e6, 1e4);
            let reversed_input: Vec<f64> = funded.iter().rev().copied().collect();
            let backward = MarketAllocator::allocate(&reversed_input, 1e6, 1e4);

            for (a, b) in forward.incomes.iter().zip(backward.incomes.iter().rev()) {
                prop_assert!((a - b).abs() <= 1e-6 * a.abs().max(1.0));
            }
            prop_assert!(
                (forward.new_capacity - backward.new_capacity).abs()
                    <= 1e-6 * forward.new_capacity.abs().max(1.0)
            );
        }
    }
}
