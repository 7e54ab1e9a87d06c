use std::future::Future;

use ade_common::DebateId;

use crate::{
    db_types::{Debate, DebateStage, NewDebate, NewDebateEntry},
    traits::{DebateApiError, DebateManagement, SubmitOutcome},
};

/// This trait defines the highest level of behaviour for backends supporting the debate engine.
///
/// This behaviour includes:
/// * Creating debates, idempotently when a pairing key is supplied.
/// * The transactional entry-submission path: validate the turn, write the entry, and advance the
///   debate status, all without interleaving with a concurrent writer.
/// * The redundant-safe stage-advance check.
pub trait DebateGatewayDatabase: Clone + DebateManagement {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Creates a new debate. When the [`NewDebate`] carries a `match_key` and a debate with that
    /// key already exists, no new row is written and the existing debate is returned instead.
    ///
    /// Returns the debate and `true` if it was inserted, or `false` if it already existed.
    fn create_debate(&self, debate: NewDebate) -> impl Future<Output = Result<(Debate, bool), DebateApiError>> + Send;

    /// Submits an entry for the debate's current stage, in a single atomic transaction:
    /// the debate and its entries are re-read, the submitting user's turn is validated against
    /// them, the entry is written for the derived `(stage, position)` slot, and the status is
    /// advanced if the write completed the stage.
    ///
    /// Logical rejections (wrong turn, empty content, finished debate, outsider) are returned as
    /// [`SubmitOutcome::Rejected`] with no side effects. Only store failures are errors.
    fn submit_entry(&self, entry: NewDebateEntry) -> impl Future<Output = Result<SubmitOutcome, DebateApiError>> + Send;

    /// Re-checks whether the given stage is complete, and if so writes the follow-on status onto
    /// the debate record. Safe to call redundantly: if the debate has already advanced past the
    /// stage, nothing is written.
    ///
    /// Returns `true` iff the status moved.
    fn advance_if_complete(
        &self,
        debate_id: DebateId,
        stage: DebateStage,
    ) -> impl Future<Output = Result<bool, DebateApiError>> + Send;

    /// Closes the database connection.
    fn close(&mut self) -> impl Future<Output = Result<(), DebateApiError>> + Send {
        async { Ok(()) }
    }
}
