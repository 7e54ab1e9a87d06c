use std::fmt::Debug;

use ade_common::{DebateId, UserId};
use log::*;

use crate::{
    ade_api::debate_objects::{DebateProgress, DebateWithEntries},
    db_types::{DebateEntry, DebateStage, NewDebateEntry, Position},
    events::{DebateFinishedEvent, EventProducers},
    traits::{DebateApiError, DebateGatewayDatabase, SubmitOutcome},
};

/// `DebateFlowApi` is the primary API for driving a debate through its four stages in response to
/// participant submissions.
pub struct DebateFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for DebateFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DebateFlowApi")
    }
}

impl<B> DebateFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> DebateFlowApi<B>
where B: DebateGatewayDatabase
{
    /// Submits `content` for the debate's current stage on behalf of `user_id`.
    ///
    /// The slot the entry lands in is derived by the backend inside a single transaction, so the
    /// caller never states a stage or position and two concurrent submissions cannot collide.
    /// Expected rejections (empty content, wrong turn, outsider, finished debate) come back as
    /// [`SubmitOutcome::Rejected`] with nothing written; only store failures are errors.
    pub async fn submit_entry(
        &self,
        debate_id: DebateId,
        user_id: &UserId,
        content: &str,
    ) -> Result<SubmitOutcome, DebateApiError> {
        let entry = NewDebateEntry::new(debate_id, user_id.clone(), content);
        let outcome = self.db.submit_entry(entry).await?;
        match &outcome {
            SubmitOutcome::Accepted(accepted) => {
                debug!(
                    "🎤 {user_id} filled the {}/{} slot of debate {debate_id}; status is now {}",
                    accepted.entry.stage, accepted.entry.position, accepted.new_status
                );
                if accepted.new_status.is_terminal() {
                    self.call_debate_finished_hook(debate_id).await;
                }
            },
            SubmitOutcome::Rejected(reason) => {
                debug!("🎤 Submission by {user_id} on debate {debate_id} rejected: {reason}");
            },
        }
        Ok(outcome)
    }

    /// Re-checks the stage and advances the debate status if it is complete. Idempotent: once the
    /// debate has moved past `stage`, further calls return `false` without writing.
    pub async fn advance_if_complete(&self, debate_id: DebateId, stage: DebateStage) -> Result<bool, DebateApiError> {
        let advanced = self.db.advance_if_complete(debate_id, stage).await?;
        if advanced {
            debug!("🎤 Debate {debate_id} advanced past {stage}");
        }
        Ok(advanced)
    }

    /// True iff entries exist for both positions at the given stage.
    pub async fn is_stage_complete(&self, debate_id: DebateId, stage: DebateStage) -> Result<bool, DebateApiError> {
        let entries = self.db.fetch_entries_for_stage(debate_id, stage).await?;
        let favor = entries.iter().any(|e| e.position == Position::Favor);
        let against = entries.iter().any(|e| e.position == Position::Against);
        Ok(favor && against)
    }

    /// True iff the user may submit the next entry for the debate's current stage.
    pub async fn is_users_turn(&self, debate_id: DebateId, user_id: &UserId) -> Result<bool, DebateApiError> {
        let debate = self.db.fetch_debate(debate_id).await?.ok_or(DebateApiError::DebateNotFound(debate_id))?;
        let progress = DebateProgress::new(self.db.fetch_entries_for_debate(debate_id).await?);
        Ok(progress.is_users_turn(&debate, user_id))
    }

    /// The opposing participant's entry from the stage preceding `stage`, from the given user's
    /// point of view. `None` for the intro stage, for non-participants, and while the opposing
    /// slot is still empty.
    pub async fn entry_to_refute(
        &self,
        debate_id: DebateId,
        user_id: &UserId,
        stage: DebateStage,
    ) -> Result<Option<DebateEntry>, DebateApiError> {
        let debate = self.db.fetch_debate(debate_id).await?.ok_or(DebateApiError::DebateNotFound(debate_id))?;
        let Some(position) = debate.position_of(user_id) else {
            return Ok(None);
        };
        let progress = DebateProgress::new(self.db.fetch_entries_for_debate(debate_id).await?);
        Ok(progress.entry_to_refute(stage, position).cloned())
    }

    /// The debate and its entries in submission order, for display.
    pub async fn debate_with_entries(&self, debate_id: DebateId) -> Result<Option<DebateWithEntries>, DebateApiError> {
        let Some(debate) = self.db.fetch_debate(debate_id).await? else {
            return Ok(None);
        };
        let entries = self.db.fetch_entries_for_debate(debate_id).await?;
        Ok(Some(DebateWithEntries { debate, entries }))
    }

    async fn call_debate_finished_hook(&self, debate_id: DebateId) {
        if self.producers.debate_finished_producer.is_empty() {
            return;
        }
        match self.db.fetch_debate(debate_id).await {
            Ok(Some(debate)) => {
                for producer in &self.producers.debate_finished_producer {
                    debug!("🎤 Notifying debate-finished subscribers");
                    producer.publish_event(DebateFinishedEvent::new(debate.clone())).await;
                }
            },
            Ok(None) => warn!("🎤 Debate {debate_id} vanished before its finished event could be raised"),
            Err(e) => warn!("🎤 Could not load debate {debate_id} for its finished event: {e}"),
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}
