//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the game core and storage. Adapters implement these ports.
//!
//! ## Repository Ports
//!
//! - `BidRepository` - Investment bids, keyed by bid id
//! - `MarketRepository` - Market table and capacity updates
//! - `TransactionLedger` - Append-only ledger
//! - `StockStore` - Synthetic price history
//! - `CycleCounter` - Append-only cycle records
//! - `ParticipantDirectory` - Registered participants (read-only)
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events

mod bid_repository;
mod cycle_counter;
mod event_publisher;
mod market_repository;
mod participant_directory;
mod stock_store;
mod transaction_ledger;

pub use bid_repository::BidRepository;
pub use cycle_counter::CycleCounter;
pub use event_publisher::EventPublisher;
pub use market_repository::MarketRepository;
pub use participant_directory::ParticipantDirectory;
pub use stock_store::StockStore;
pub use transaction_ledger::TransactionLedger;
