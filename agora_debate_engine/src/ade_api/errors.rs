use ade_common::UserId;
use thiserror::Error;

use crate::traits::{DebateApiError, StanceApiError};

#[derive(Debug, Clone, Error)]
pub enum MatchmakerError {
    /// The searching user holds no non-neutral stance. There is nothing to retry; the caller
    /// should stop its search loop rather than poll again.
    #[error("User {0} has no matchable stances")]
    NoStancesAvailable(UserId),
    #[error("{0}")]
    StanceError(#[from] StanceApiError),
    #[error("{0}")]
    DebateError(#[from] DebateApiError),
}

impl MatchmakerError {
    /// True for errors worth retrying on the next scheduled attempt.
    pub fn is_transient(&self) -> bool {
        !matches!(self, MatchmakerError::NoStancesAvailable(_))
    }
}
