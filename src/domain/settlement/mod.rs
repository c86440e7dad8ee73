//! Settlement Module - pure allocation and aggregation services.
//!
//! # Components
//!
//! - `MarketAllocator` - Splits one market's capacity among competing bids
//! - `CycleAggregator` - Prices every eligible bid of a cycle, market by market
//!
//! Both are stateless and perform no I/O; the cycle handler feeds them a
//! snapshot and persists what they return.

mod aggregator;
mod allocator;

pub use aggregator::{Aggregation, BidIncome, CycleAggregator, CycleSettlement};
pub use allocator::{Allocation, MarketAllocator, SOLE_SHARE_EPSILON};
