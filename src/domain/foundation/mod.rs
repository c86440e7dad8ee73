//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the command context, events and
//! error types that form the vocabulary of the capital game.

mod account;
mod context;
mod errors;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use account::Account;
pub use context::{Actor, CycleContext};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{BidId, MarketName, ParticipantId, Ticket};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
