use std::fmt::Display;

use crate::db_types::{DebateEntry, DebateStatusType};

/// Why a submission was turned away. These are expected outcomes of normal use, not faults, so
/// they are returned as values rather than errors and never leave a partial write behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// The content was empty (or whitespace only).
    EmptyContent,
    /// The submitting user is neither participant of the debate.
    NotAParticipant,
    /// The user's position already has an entry at the current stage.
    NotYourTurn,
    /// All four stages are complete; the debate accepts no further entries.
    DebateFinished,
}

impl Display for SubmitRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitRejection::EmptyContent => write!(f, "entry content is empty"),
            SubmitRejection::NotAParticipant => write!(f, "user is not a participant of this debate"),
            SubmitRejection::NotYourTurn => write!(f, "it is not this user's turn"),
            SubmitRejection::DebateFinished => write!(f, "the debate is finished"),
        }
    }
}

/// A successfully written entry, along with where the write left the debate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedEntry {
    pub entry: DebateEntry,
    /// The debate status after the write (the submission may have completed the stage).
    pub new_status: DebateStatusType,
    /// True if this entry filled the second slot of its stage.
    pub stage_completed: bool,
}

/// Result of [`DebateGatewayDatabase::submit_entry`](crate::traits::DebateGatewayDatabase::submit_entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(AcceptedEntry),
    Rejected(SubmitRejection),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }

    pub fn accepted(self) -> Option<AcceptedEntry> {
        match self {
            SubmitOutcome::Accepted(accepted) => Some(accepted),
            SubmitOutcome::Rejected(_) => None,
        }
    }
}
