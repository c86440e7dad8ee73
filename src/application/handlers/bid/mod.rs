//! Bid command handlers.

mod review_bid;
mod set_multiplier;
mod submit_bids;

pub use review_bid::{
    BidReviewedEvent, ReviewBidCommand, ReviewBidError, ReviewBidHandler, ReviewBidResult,
    ReviewDecision,
};
pub use set_multiplier::{
    MultiplierChangedEvent, SetMultiplierCommand, SetMultiplierError, SetMultiplierHandler,
    SetMultiplierResult,
};
pub use submit_bids::{
    BidsSubmittedEvent, RejectedMarket, RejectionReason, SubmitBidsCommand, SubmitBidsError,
    SubmitBidsHandler, SubmitBidsResult,
};
