//! Ledger account endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{MarketName, ParticipantId};

/// One side of a ledger transaction.
///
/// Market and participant namespaces are kept apart so a corporation can
/// never collide with a market of the same name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Account {
    Participant(ParticipantId),
    Market(MarketName),
    /// The game operator; source of endowments and manual corrections.
    Treasury,
}

impl Account {
    /// Returns true if this account belongs to the given participant.
    pub fn is_participant(&self, participant: &ParticipantId) -> bool {
        matches!(self, Account::Participant(p) if p == participant)
    }
}

impl From<ParticipantId> for Account {
    fn from(id: ParticipantId) -> Self {
        Account::Participant(id)
    }
}

impl From<MarketName> for Account {
    fn from(name: MarketName) -> Self {
        Account::Market(name)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Account::Participant(id) => write!(f, "participant:{}", id),
            Account::Market(name) => write!(f, "market:{}", name),
            Account::Treasury => write!(f, "treasury"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_and_market_with_same_name_differ() {
        let p = Account::from(ParticipantId::new("Militech").unwrap());
        let m = Account::from(MarketName::new("Militech").unwrap());
        assert_ne!(p, m);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let account = Account::Market(MarketName::new("Pacifica").unwrap());
        let json = serde_json::to_string(&account).unwrap();
        assert_eq!(json, r#"{"kind":"market","id":"Pacifica"}"#);

        let treasury = serde_json::to_string(&Account::Treasury).unwrap();
        assert_eq!(treasury, r#"{"kind":"treasury"}"#);
    }
}
