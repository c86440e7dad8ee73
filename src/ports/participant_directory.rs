//! Participant directory port (read side).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ParticipantId};
use crate::domain::participant::Participant;

/// Read-only access to registered participants.
#[async_trait]
pub trait ParticipantDirectory: Send + Sync {
    /// Every participant, ordered by id.
    async fn list(&self) -> Result<Vec<Participant>, DomainError>;

    /// Returns `None` if not found.
    async fn find(&self, id: &ParticipantId) -> Result<Option<Participant>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_directory_is_object_safe() {
        fn _accepts_dyn(_directory: &dyn ParticipantDirectory) {}
    }
}
