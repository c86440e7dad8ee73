//! Command context carried explicitly through every handler call.
//!
//! There is no ambient game state: who is acting, the correlation id for
//! tracing, and the instant used for time-based accrual all travel in one
//! value. Tests pin `now` to make accrual deterministic.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Account, ParticipantId, Timestamp};

/// Who issued a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// Game operator (bid review, multipliers, cycle finish).
    Operator,
    Participant(ParticipantId),
}

impl Actor {
    pub fn is_operator(&self) -> bool {
        matches!(self, Actor::Operator)
    }

    /// Returns the ledger account representing this actor.
    pub fn account(&self) -> Account {
        match self {
            Actor::Operator => Account::Treasury,
            Actor::Participant(id) => Account::Participant(id.clone()),
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::Operator => write!(f, "operator"),
            Actor::Participant(id) => write!(f, "{}", id),
        }
    }
}

/// Request-scoped context for command and query handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleContext {
    pub actor: Actor,

    /// Instant used for every time-dependent computation of this command.
    pub now: Timestamp,

    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl CycleContext {
    /// Creates a context for the operator at the current instant.
    pub fn operator() -> Self {
        Self::new(Actor::Operator, Timestamp::now())
    }

    /// Creates a context for a participant at the current instant.
    pub fn participant(id: ParticipantId) -> Self {
        Self::new(Actor::Participant(id), Timestamp::now())
    }

    pub fn new(actor: Actor, now: Timestamp) -> Self {
        Self {
            actor,
            now,
            correlation_id: None,
        }
    }

    /// Builder: pin the instant used for accrual.
    pub fn at(mut self, now: Timestamp) -> Self {
        self.now = now;
        self
    }

    /// Builder: add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}
