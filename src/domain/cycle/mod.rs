//! Cycle module - the global game tick.

mod record;

pub use record::CycleRecord;
