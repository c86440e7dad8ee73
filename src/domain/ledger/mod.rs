//! Ledger module - append-only transactions and derived balances.

mod balance;
mod transaction;

pub use balance::{frozen_amount, Balance};
pub use transaction::Transaction;
