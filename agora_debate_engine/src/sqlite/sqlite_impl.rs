use std::fmt::Debug;

use ade_common::{DebateId, UserId};
use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, debates, entries, new_pool, stances, topics};
use crate::{
    ade_api::debate_objects::DebateProgress,
    db_types::{
        Debate,
        DebateEntry,
        DebateStage,
        DebateStatusType,
        NewDebate,
        NewDebateEntry,
        NewStance,
        Position,
        Stance,
        StanceValue,
        Topic,
    },
    traits::{
        AcceptedEntry,
        DebateApiError,
        DebateGatewayDatabase,
        DebateManagement,
        StanceApiError,
        StanceManagement,
        SubmitOutcome,
        SubmitRejection,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connects to the database named by `AGORA_DATABASE_URL`, or the default store.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl StanceManagement for SqliteDatabase {
    async fn fetch_stance(&self, user_id: &UserId, topic_name: &str) -> Result<Option<Stance>, StanceApiError> {
        let mut conn = self.pool.acquire().await?;
        let stance = stances::fetch_stance(user_id, topic_name, &mut conn).await?;
        Ok(stance)
    }

    async fn fetch_stances_for_user(&self, user_id: &UserId) -> Result<Vec<Stance>, StanceApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = stances::fetch_stances_for_user(user_id, &mut conn).await?;
        Ok(result)
    }

    async fn fetch_stances_on_topic(&self, topic_name: &str) -> Result<Vec<Stance>, StanceApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = stances::fetch_stances_on_topic(topic_name, &mut conn).await?;
        Ok(result)
    }

    async fn fetch_opposing_stances(
        &self,
        topic_name: &str,
        value: StanceValue,
        exclude: &UserId,
    ) -> Result<Vec<Stance>, StanceApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = stances::fetch_opposing_stances(topic_name, value, exclude, &mut conn).await?;
        Ok(result)
    }

    async fn upsert_stance(&self, stance: NewStance) -> Result<Stance, StanceApiError> {
        let mut conn = self.pool.acquire().await?;
        stances::upsert_stance(stance, &mut conn).await
    }

    async fn fetch_topic(&self, name: &str) -> Result<Option<Topic>, StanceApiError> {
        let mut conn = self.pool.acquire().await?;
        let topic = topics::fetch_topic(name, &mut conn).await?;
        Ok(topic)
    }

    async fn seed_topics(&self, seed: &[Topic]) -> Result<(), StanceApiError> {
        let mut tx = self.pool.begin().await?;
        topics::seed_topics(seed, &mut tx).await?;
        tx.commit().await?;
        Ok(())
    }
}

impl DebateManagement for SqliteDatabase {
    async fn fetch_debate(&self, id: DebateId) -> Result<Option<Debate>, DebateApiError> {
        let mut conn = self.pool.acquire().await?;
        let debate = debates::fetch_debate(id, &mut conn).await?;
        Ok(debate)
    }

    async fn fetch_debates_for_user(&self, user_id: &UserId) -> Result<Vec<Debate>, DebateApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = debates::fetch_debates_for_user(user_id, &mut conn).await?;
        Ok(result)
    }

    async fn fetch_entries_for_debate(&self, id: DebateId) -> Result<Vec<DebateEntry>, DebateApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = entries::fetch_for_debate(id, &mut conn).await?;
        Ok(result)
    }

    async fn fetch_entries_for_stage(&self, id: DebateId, stage: DebateStage) -> Result<Vec<DebateEntry>, DebateApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = entries::fetch_for_stage(id, stage, &mut conn).await?;
        Ok(result)
    }
}

impl DebateGatewayDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn create_debate(&self, debate: NewDebate) -> Result<(Debate, bool), DebateApiError> {
        // No explicit transaction here: the uniqueness of the pairing key is what makes
        // concurrent creates converge, and each statement retries on a busy writer.
        let mut conn = self.pool.acquire().await?;
        let (debate, created) = debates::idempotent_insert(debate, &mut conn).await?;
        Ok((debate, created))
    }

    /// The whole submission runs in one transaction: the debate and its entries are re-read, the
    /// turn is validated against them, the entry is written and the status advanced. A concurrent
    /// submission sees either none or all of it.
    async fn submit_entry(&self, entry: NewDebateEntry) -> Result<SubmitOutcome, DebateApiError> {
        if entry.content.trim().is_empty() {
            return Ok(SubmitOutcome::Rejected(SubmitRejection::EmptyContent));
        }
        let mut tx = self.pool.begin().await?;
        let debate =
            debates::fetch_debate(entry.debate_id, &mut tx).await?.ok_or(DebateApiError::DebateNotFound(entry.debate_id))?;
        if debate.status.is_terminal() {
            return Ok(SubmitOutcome::Rejected(SubmitRejection::DebateFinished));
        }
        let Some(position) = debate.position_of(&entry.user_id) else {
            return Ok(SubmitOutcome::Rejected(SubmitRejection::NotAParticipant));
        };
        let progress = DebateProgress::new(entries::fetch_for_debate(entry.debate_id, &mut tx).await?);
        let Some(stage) = progress.current_stage() else {
            return Ok(SubmitOutcome::Rejected(SubmitRejection::DebateFinished));
        };
        if progress.entry_for(stage, position).is_some() {
            return Ok(SubmitOutcome::Rejected(SubmitRejection::NotYourTurn));
        }
        let saved = entries::insert_entry(entry.debate_id, &entry.user_id, stage, position, &entry.content, &mut tx).await?;
        debug!("🗃️ Entry {} saved in the {stage}/{position} slot of debate {}", saved.id, entry.debate_id);
        let stage_completed = {
            let stage_entries = entries::fetch_for_stage(entry.debate_id, stage, &mut tx).await?;
            stage_entries.iter().any(|e| e.position == Position::Favor)
                && stage_entries.iter().any(|e| e.position == Position::Against)
        };
        let target = if stage_completed {
            DebateStatusType::after_stage(stage)
        } else {
            // the first accepted entry moves a pending debate into play
            DebateStatusType::from(stage)
        };
        let debate = if target.ordinal() > debate.status.ordinal() {
            debates::update_status(entry.debate_id, target, &mut tx).await?
        } else {
            debate
        };
        tx.commit().await?;
        Ok(SubmitOutcome::Accepted(AcceptedEntry { entry: saved, new_status: debate.status, stage_completed }))
    }

    async fn advance_if_complete(&self, debate_id: DebateId, stage: DebateStage) -> Result<bool, DebateApiError> {
        let mut tx = self.pool.begin().await?;
        let debate = debates::fetch_debate(debate_id, &mut tx).await?.ok_or(DebateApiError::DebateNotFound(debate_id))?;
        let stage_entries = entries::fetch_for_stage(debate_id, stage, &mut tx).await?;
        let complete = stage_entries.iter().any(|e| e.position == Position::Favor)
            && stage_entries.iter().any(|e| e.position == Position::Against);
        if !complete {
            return Ok(false);
        }
        let target = DebateStatusType::after_stage(stage);
        if debate.status.ordinal() >= target.ordinal() {
            // already advanced; redundant calls are no-ops
            return Ok(false);
        }
        debates::update_status(debate_id, target, &mut tx).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn close(&mut self) -> Result<(), DebateApiError> {
        self.pool.close().await;
        Ok(())
    }
}
