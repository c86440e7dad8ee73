//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod bid;
pub mod cycle;
pub mod ledger;
pub mod participant;

pub use bid::{
    BidReviewedEvent, BidsSubmittedEvent, MultiplierChangedEvent, RejectedMarket,
    RejectionReason, ReviewBidCommand, ReviewBidError, ReviewBidHandler, ReviewBidResult,
    ReviewDecision, SetMultiplierCommand, SetMultiplierError, SetMultiplierHandler,
    SetMultiplierResult, SubmitBidsCommand, SubmitBidsError, SubmitBidsHandler,
    SubmitBidsResult,
};
pub use cycle::{
    CycleFinishedEvent, FinishCycleCommand, FinishCycleError, FinishCycleHandler,
    FinishCycleResult, FinishCycleSettings,
};
pub use ledger::{
    PostTransferCommand, PostTransferError, PostTransferHandler, PostTransferResult,
    TransferPostedEvent,
};
pub use participant::{
    GetParticipantSummaryError, GetParticipantSummaryHandler, GetParticipantSummaryQuery,
    ParticipantSummary,
};
