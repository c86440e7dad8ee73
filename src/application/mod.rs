//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (bids, transfers, cycle finish) write; the participant
//! summary is the read side.

pub mod handlers;

pub use handlers::{
    // Bid handlers
    ReviewBidCommand, ReviewBidHandler, ReviewDecision,
    SetMultiplierCommand, SetMultiplierHandler,
    SubmitBidsCommand, SubmitBidsHandler, SubmitBidsResult,
    // Cycle handlers
    FinishCycleCommand, FinishCycleHandler, FinishCycleResult, FinishCycleSettings,
    // Ledger handlers
    PostTransferCommand, PostTransferHandler,
    // Queries
    GetParticipantSummaryHandler, GetParticipantSummaryQuery, ParticipantSummary,
};
