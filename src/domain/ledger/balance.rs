//! Derived balances.
//!
//! Balances are never stored. They are recomputed from the append-only
//! ledger on every read.

use serde::{Deserialize, Serialize};

use crate::domain::bid::InvestmentBid;
use crate::domain::foundation::ParticipantId;

use super::Transaction;

/// A participant's position derived from the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Balance {
    /// Inbound minus outbound over all cycles.
    pub total: f64,
    /// Net change recorded in the cycle before the current one.
    pub previous_cycle_net: f64,
}

impl Balance {
    /// Folds the participant's transactions into a balance.
    ///
    /// Entries not involving the participant are ignored, so the full
    /// ledger may be passed.
    pub fn derive(
        transactions: &[Transaction],
        participant: &ParticipantId,
        current_cycle: u32,
    ) -> Self {
        let previous = current_cycle.checked_sub(1);
        transactions
            .iter()
            .fold(Balance::default(), |mut balance, tx| {
                let net = tx.net_for(participant);
                balance.total += net;
                if Some(tx.cycle) == previous {
                    balance.previous_cycle_net += net;
                }
                balance
            })
    }

    /// Balance left once funds tied up in active bids are set aside.
    pub fn available(&self, frozen: f64) -> f64 {
        self.total - frozen
    }
}

/// Capital tied up by the participant's active bids in `cycle`.
///
/// Pending bids and approved bids awaiting settlement both count.
pub fn frozen_amount(bids: &[InvestmentBid], participant: &ParticipantId, cycle: u32) -> f64 {
    bids.iter()
        .filter(|b| &b.participant == participant && b.cycle == cycle && b.is_active())
        .map(|b| b.amount)
        .sum()
}
