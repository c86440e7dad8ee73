//! Stock module - synthetic per-participant price series.

mod synthesizer;

pub use synthesizer::{
    ticket_incomes, StockPoint, StockSynthesizer, DEFAULT_INCOME_SCALE, STOCK_OFFSETS,
};
