//! Ledger command handlers.

mod post_transfer;

pub use post_transfer::{
    PostTransferCommand, PostTransferError, PostTransferHandler, PostTransferResult,
    TransferPostedEvent,
};
