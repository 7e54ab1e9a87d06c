use std::future::Future;

use ade_common::{DebateId, UserId};
use thiserror::Error;

use crate::db_types::{Debate, DebateEntry, DebateStage, DebateStatusType};

#[derive(Debug, Clone, Error)]
pub enum DebateApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The requested debate {0} does not exist")]
    DebateNotFound(DebateId),
    #[error("A debate needs two distinct participants")]
    ParticipantsNotDistinct,
    #[error("Refusing to move debate {debate_id} backwards from {from} to {to}")]
    StatusRegression { debate_id: DebateId, from: DebateStatusType, to: DebateStatusType },
}

impl From<sqlx::Error> for DebateApiError {
    fn from(e: sqlx::Error) -> Self {
        DebateApiError::DatabaseError(e.to_string())
    }
}

/// The `DebateManagement` trait provides the read side of debate storage: the debate record, the
/// per-user listing, and the ordered entry sequences the stage state machine is computed from.
///
/// The [`DebateGatewayDatabase`](crate::traits::DebateGatewayDatabase) trait handles the actual
/// machinery of creating debates and writing entries; `DebateManagement` only queries.
pub trait DebateManagement {
    /// Fetches the debate with the given id. If no debate exists, `None` is returned.
    fn fetch_debate(&self, id: DebateId) -> impl Future<Output = Result<Option<Debate>, DebateApiError>> + Send;

    /// Fetches every debate the given user participates in (either side), oldest first.
    fn fetch_debates_for_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<Debate>, DebateApiError>> + Send;

    /// Fetches all entries for a debate in submission order (`created_at ASC, id ASC`).
    fn fetch_entries_for_debate(
        &self,
        id: DebateId,
    ) -> impl Future<Output = Result<Vec<DebateEntry>, DebateApiError>> + Send;

    /// Fetches the entries for one stage of a debate, in submission order. At most two rows.
    fn fetch_entries_for_stage(
        &self,
        id: DebateId,
        stage: DebateStage,
    ) -> impl Future<Output = Result<Vec<DebateEntry>, DebateApiError>> + Send;
}
