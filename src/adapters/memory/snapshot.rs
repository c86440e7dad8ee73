//! Serializable image of the whole game state.

use serde::{Deserialize, Serialize};

use crate::domain::bid::InvestmentBid;
use crate::domain::cycle::CycleRecord;
use crate::domain::ledger::Transaction;
use crate::domain::market::Market;
use crate::domain::participant::Participant;
use crate::domain::stock::StockPoint;

/// Everything the game persists, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSnapshot {
    pub participants: Vec<Participant>,
    pub markets: Vec<Market>,
    pub bids: Vec<InvestmentBid>,
    pub transactions: Vec<Transaction>,
    pub stocks: Vec<StockPoint>,
    pub cycles: Vec<CycleRecord>,
}
