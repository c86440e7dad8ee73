//! Append-only ledger entries.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    Account, BidId, DomainError, MarketName, ParticipantId, Timestamp,
};

/// One immutable movement of capital between two accounts.
///
/// Settlement entries carry the bid they settle so a replayed cycle can tell
/// which bids already have their transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: Account,
    pub to: Account,
    pub amount: f64,
    pub cycle: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid_id: Option<BidId>,
    pub recorded_at: Timestamp,
}

impl Transaction {
    /// Settles a priced bid.
    ///
    /// Gains flow market to participant, losses participant to market; the
    /// amount is always the magnitude of the income.
    pub fn settlement(
        bid_id: BidId,
        participant: ParticipantId,
        market: MarketName,
        income: f64,
        cycle: u32,
        recorded_at: Timestamp,
    ) -> Self {
        let (from, to) = if income >= 0.0 {
            (Account::Market(market), Account::Participant(participant))
        } else {
            (Account::Participant(participant), Account::Market(market))
        };
        Self {
            from,
            to,
            amount: income.abs(),
            cycle,
            bid_id: Some(bid_id),
            recorded_at,
        }
    }

    /// Manual posting between any two accounts.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` when the amount is not strictly positive and
    /// finite, or when both sides are the same account.
    pub fn transfer(
        from: Account,
        to: Account,
        amount: f64,
        cycle: u32,
        recorded_at: Timestamp,
    ) -> Result<Self, DomainError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DomainError::validation(
                "amount",
                format!("Transfer amount must be positive, got {}", amount),
            ));
        }
        if from == to {
            return Err(DomainError::validation(
                "to",
                "Transfer source and destination must differ",
            ));
        }
        Ok(Self {
            from,
            to,
            amount,
            cycle,
            bid_id: None,
            recorded_at,
        })
    }

    /// Signed effect of this entry on the participant's balance.
    pub fn net_for(&self, participant: &ParticipantId) -> f64 {
        let mut net = 0.0;
        if self.to.is_participant(participant) {
            net += self.amount;
        }
        if self.from.is_participant(participant) {
            net -= self.amount;
        }
        net
    }

    /// Returns true if the participant is on either side.
    pub fn involves(&self, participant: &ParticipantId) -> bool {
        self.from.is_participant(participant) || self.to.is_participant(participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arasaka() -> ParticipantId {
        ParticipantId::new("arasaka").unwrap()
    }

    fn watson() -> MarketName {
        MarketName::new("Watson").unwrap()
    }

    #[test]
    fn positive_income_flows_from_market_to_participant() {
        let tx = Transaction::settlement(BidId::new(), arasaka(), watson(), 120.0, 2, Timestamp::now());
        assert_eq!(tx.from, Account::Market(watson()));
        assert_eq!(tx.to, Account::Participant(arasaka()));
        assert_eq!(tx.amount, 120.0);
        assert_eq!(tx.net_for(&arasaka()), 120.0);
    }

    #[test]
    fn negative_income_flows_from_participant_to_market() {
        let tx = Transaction::settlement(BidId::new(), arasaka(), watson(), -45.5, 2, Timestamp::now());
        assert_eq!(tx.from, Account::Participant(arasaka()));
        assert_eq!(tx.to, Account::Market(watson()));
        assert_eq!(tx.amount, 45.5);
        assert_eq!(tx.net_for(&arasaka()), -45.5);
    }

    #[test]
    fn zero_income_is_still_recorded() {
        let tx = Transaction::settlement(BidId::new(), arasaka(), watson(), 0.0, 2, Timestamp::now());
        assert_eq!(tx.to, Account::Participant(arasaka()));
        assert_eq!(tx.amount, 0.0);
    }

    #[test]
    fn settlement_remembers_its_bid() {
        let bid_id = BidId::new();
        let tx = Transaction::settlement(bid_id, arasaka(), watson(), 1.0, 2, Timestamp::now());
        assert_eq!(tx.bid_id, Some(bid_id));
    }

    #[test]
    fn transfer_requires_positive_amount() {
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = Transaction::transfer(
                Account::Treasury,
                Account::Participant(arasaka()),
                amount,
                1,
                Timestamp::now(),
            );
            assert!(result.is_err(), "amount {} should be rejected", amount);
        }
    }

    #[test]
    fn transfer_to_self_is_rejected() {
        let result = Transaction::transfer(
            Account::Participant(arasaka()),
            Account::Participant(arasaka()),
            10.0,
            1,
            Timestamp::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn unrelated_entries_do_not_touch_participant() {
        let tx = Transaction::transfer(
            Account::Treasury,
            Account::Market(watson()),
            10.0,
            1,
            Timestamp::now(),
        )
        .unwrap();
        assert!(!tx.involves(&arasaka()));
        assert_eq!(tx.net_for(&arasaka()), 0.0);
    }
}
