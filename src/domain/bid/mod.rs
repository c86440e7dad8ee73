//! Bid module - investment bid lifecycle.
//!
//! `Pending -> Approved | Rejected`. Approved bids accrue funding until
//! settlement assigns their income, which freezes them for the cycle.

mod aggregate;
mod green_carry;
mod status;

pub use aggregate::InvestmentBid;
pub use green_carry::{green_markets, plan_green_carry, GreenPosition};
pub use status::BidStatus;
