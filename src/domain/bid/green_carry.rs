//! Green carry-forward planning.
//!
//! A participant that earned strictly positive income in a market last
//! cycle keeps a minimal position there, unless they already placed any bid
//! in that market this cycle.

use std::collections::BTreeSet;

use crate::domain::foundation::{MarketName, ParticipantId};

use super::InvestmentBid;

/// A (participant, market) pair that needs a carried bid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GreenPosition {
    pub participant: ParticipantId,
    pub market: MarketName,
}

/// Returns the green positions of `previous` with no counterpart in `current`.
///
/// Each pair appears once, in (participant, market) order, no matter how
/// many profitable bids backed it.
pub fn plan_green_carry(
    previous: &[InvestmentBid],
    current: &[InvestmentBid],
) -> Vec<GreenPosition> {
    let tracked: BTreeSet<(&ParticipantId, &MarketName)> = current
        .iter()
        .map(|bid| (&bid.participant, &bid.market))
        .collect();

    previous
        .iter()
        .filter(|bid| bid.income.is_some_and(|income| income > 0.0))
        .filter(|bid| !tracked.contains(&(&bid.participant, &bid.market)))
        .map(|bid| GreenPosition {
            participant: bid.participant.clone(),
            market: bid.market.clone(),
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Markets where the participant earned strictly positive income.
pub fn green_markets(previous: &[InvestmentBid], participant: &ParticipantId) -> BTreeSet<MarketName> {
    previous
        .iter()
        .filter(|bid| &bid.participant == participant)
        .filter(|bid| bid.income.is_some_and(|income| income > 0.0))
        .map(|bid| bid.market.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    fn priced(participant: &str, market: &str, income: f64) -> InvestmentBid {
        let now = Timestamp::from_unix_secs(1_700_000_000);
        let mut bid = InvestmentBid::submit(
            ParticipantId::new(participant).unwrap(),
            MarketName::new(market).unwrap(),
            100.0,
            1,
            now,
        )
        .unwrap();
        bid.approve(now).unwrap();
        bid.assign_income(income).unwrap();
        bid
    }

    fn pending(participant: &str, market: &str) -> InvestmentBid {
        InvestmentBid::submit(
            ParticipantId::new(participant).unwrap(),
            MarketName::new(market).unwrap(),
            100.0,
            2,
            Timestamp::from_unix_secs(1_700_000_000),
        )
        .unwrap()
    }

    #[test]
    fn carries_profitable_untracked_position() {
        let previous = vec![priced("arasaka", "Watson", 10.0)];
        let plan = plan_green_carry(&previous, &[]);

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].participant.as_str(), "arasaka");
        assert_eq!(plan[0].market.as_str(), "Watson");
    }

    #[test]
    fn ignores_zero_and_negative_income() {
        let previous = vec![
            priced("arasaka", "Watson", 0.0),
            priced("arasaka", "Pacifica", -3.0),
        ];
        assert!(plan_green_carry(&previous, &[]).is_empty());
    }

    #[test]
    fn skips_pairs_already_bid_this_cycle() {
        let previous = vec![priced("arasaka", "Watson", 10.0)];
        let current = vec![pending("arasaka", "Watson")];
        assert!(plan_green_carry(&previous, &current).is_empty());
    }

    #[test]
    fn a_rejected_bid_still_counts_as_tracked() {
        let previous = vec![priced("arasaka", "Watson", 10.0)];
        let mut rejected = pending("arasaka", "Watson");
        rejected.reject().unwrap();
        assert!(plan_green_carry(&previous, &[rejected]).is_empty());
    }

    #[test]
    fn other_participants_bids_do_not_block_carry() {
        let previous = vec![priced("arasaka", "Watson", 10.0)];
        let current = vec![pending("militech", "Watson")];
        assert_eq!(plan_green_carry(&previous, &current).len(), 1);
    }

    #[test]
    fn duplicate_green_bids_yield_one_position() {
        let previous = vec![
            priced("arasaka", "Watson", 10.0),
            priced("arasaka", "Watson", 5.0),
        ];
        assert_eq!(plan_green_carry(&previous, &[]).len(), 1);
    }

    #[test]
    fn green_markets_are_per_participant() {
        let previous = vec![
            priced("arasaka", "Watson", 10.0),
            priced("arasaka", "Pacifica", -1.0),
            priced("militech", "Heywood", 7.0),
        ];
        let green = green_markets(&previous, &ParticipantId::new("arasaka").unwrap());
        assert_eq!(green, BTreeSet::from([MarketName::new("Watson").unwrap()]));
    }
}
