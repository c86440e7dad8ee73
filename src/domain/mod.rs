//! Domain layer containing the game's business logic and types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, accounts, errors, events)
//! - `bid` - Investment bid lifecycle and green carry-forward planning
//! - `market` - Capacity-limited markets and their connectivity graph
//! - `settlement` - Pure allocation math and cycle aggregation
//! - `ledger` - Append-only transactions and derived balances
//! - `stock` - Synthetic price series per participant ticket
//! - `cycle` - The global game tick
//! - `participant` - Players and their home markets

pub mod bid;
pub mod cycle;
pub mod foundation;
pub mod ledger;
pub mod market;
pub mod participant;
pub mod settlement;
pub mod stock;
