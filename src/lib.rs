//! Capital Game - Cycle-Based Capital Allocation Engine
//!
//! Participants commit capital to capacity-limited markets. Once per cycle
//! the operator finishes the cycle: approved bids are funded over time,
//! priced against each other per market, settled into an append-only
//! ledger, and turned into a synthetic stock price series per participant.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
