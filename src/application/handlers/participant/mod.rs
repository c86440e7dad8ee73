//! Participant query handlers.

mod get_participant_summary;

pub use get_participant_summary::{
    GetParticipantSummaryError, GetParticipantSummaryHandler, GetParticipantSummaryQuery,
    ParticipantSummary,
};
