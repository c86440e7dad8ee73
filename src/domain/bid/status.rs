//! Bid review status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Administrative review status of an investment bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    /// Submitted by a participant, awaiting review.
    #[default]
    Pending,

    /// Accepted; capital starts accruing from the approval instant.
    Approved,

    /// Declined. Terminal.
    Rejected,
}

impl BidStatus {
    /// Returns true while the bid still ties up the participant's balance.
    pub fn holds_funds(&self) -> bool {
        matches!(self, BidStatus::Pending | BidStatus::Approved)
    }
}

impl StateMachine for BidStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            BidStatus::Pending => vec![BidStatus::Approved, BidStatus::Rejected],
            BidStatus::Approved | BidStatus::Rejected => vec![],
        }
    }
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BidStatus::Pending => "PENDING",
            BidStatus::Approved => "ACCEPTED",
            BidStatus::Rejected => "REJECTED",
        };
        write!(f, "{}", s)
    }
}
