use ade_common::UserId;
use serde::{Deserialize, Serialize};

use crate::db_types::Debate;

/// A successful pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub debate: Debate,
    pub opponent: UserId,
    pub topic_name: String,
    /// False when this search adopted a debate the opponent's concurrent search already created.
    pub newly_created: bool,
}

/// Result of a single bounded search attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Matched(MatchResult),
    /// No opposing stance was found on any of the searcher's topics. Transient: retry on the
    /// next scheduled attempt.
    NoMatch,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }

    pub fn matched(self) -> Option<MatchResult> {
        match self {
            MatchOutcome::Matched(result) => Some(result),
            MatchOutcome::NoMatch => None,
        }
    }
}
