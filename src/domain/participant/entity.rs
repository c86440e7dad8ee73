use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MarketName, ParticipantId, Ticket};

/// A player with a public stock ticket and an optional home market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub ticket: Ticket,
    /// Always unlocked, regardless of last cycle's results.
    #[serde(default)]
    pub home_market: Option<MarketName>,
}

impl Participant {
    pub fn new(
        id: ParticipantId,
        name: impl Into<String>,
        ticket: Ticket,
        home_market: Option<MarketName>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            ticket,
            home_market,
        }
    }
}
