//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for an investment bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BidId(Uuid);

impl BidId {
    /// Creates a new random BidId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a BidId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BidId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BidId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Participant (corporation) identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Creates a new ParticipantId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("participant_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a market; markets are keyed by name everywhere in the game.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketName(String);

impl MarketName {
    /// Creates a new MarketName, returning error if empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("market"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Exchange ticket under which a participant's synthetic stock trades.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(String);

impl Ticket {
    /// Creates a new Ticket, returning error if empty.
    pub fn new(ticket: impl Into<String>) -> Result<Self, ValidationError> {
        let ticket = ticket.into();
        if ticket.trim().is_empty() {
            return Err(ValidationError::empty_field("ticket"));
        }
        Ok(Self(ticket))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bid_id_generates_unique_values() {
        assert_ne!(BidId::new(), BidId::new());
    }

    #[test]
    fn bid_id_parses_from_display() {
        let id = BidId::new();
        let parsed: BidId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn participant_id_rejects_blank() {
        assert!(ParticipantId::new("").is_err());
        assert!(ParticipantId::new("   ").is_err());
        assert_eq!(ParticipantId::new("arasaka").unwrap().as_str(), "arasaka");
    }

    #[test]
    fn market_name_rejects_empty() {
        let err = MarketName::new("").unwrap_err();
        assert_eq!(err.to_string(), "Field 'market' cannot be empty");
    }

    #[test]
    fn ticket_serializes_transparently() {
        let ticket = Ticket::new("ARSK").unwrap();
        assert_eq!(serde_json::to_string(&ticket).unwrap(), r#""ARSK""#);
    }
}
