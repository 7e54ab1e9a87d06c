use std::future::Future;

use ade_common::UserId;
use thiserror::Error;

use crate::db_types::{NewStance, Stance, StanceValue, Topic};

#[derive(Debug, Clone, Error)]
pub enum StanceApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for StanceApiError {
    fn from(e: sqlx::Error) -> Self {
        StanceApiError::DatabaseError(e.to_string())
    }
}

/// The `StanceManagement` trait defines behaviour for managing stances and the topic reference
/// data they point at.
///
/// The matchmaker is the main consumer: it iterates the searcher's stances and queries for
/// opposing stances per topic. The outer surface also uses it to record what a user believes.
pub trait StanceManagement {
    /// Fetches the stance the given user holds on the given topic, if any.
    fn fetch_stance(
        &self,
        user_id: &UserId,
        topic_name: &str,
    ) -> impl Future<Output = Result<Option<Stance>, StanceApiError>> + Send;

    /// Fetches all stances declared by the given user, ordered by topic name. This ordering is
    /// what makes the matchmaker's stance iteration deterministic.
    fn fetch_stances_for_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<Stance>, StanceApiError>> + Send;

    /// Fetches every stance declared on the given topic, longest-standing first
    /// (`updated_at ASC, id ASC`).
    fn fetch_stances_on_topic(
        &self,
        topic_name: &str,
    ) -> impl Future<Output = Result<Vec<Stance>, StanceApiError>> + Send;

    /// Fetches stances on the given topic holding exactly `value`, excluding the given user.
    /// Ordered longest-standing first (`updated_at ASC, id ASC`), so the candidate that has been
    /// waiting the longest is matched first.
    fn fetch_opposing_stances(
        &self,
        topic_name: &str,
        value: StanceValue,
        exclude: &UserId,
    ) -> impl Future<Output = Result<Vec<Stance>, StanceApiError>> + Send;

    /// Inserts or replaces the user's stance on a topic. A stance is unique per
    /// `(user_id, topic_name)`; re-declaring updates the value and bumps `updated_at`.
    fn upsert_stance(&self, stance: NewStance) -> impl Future<Output = Result<Stance, StanceApiError>> + Send;

    /// Fetches a topic by name.
    fn fetch_topic(&self, name: &str) -> impl Future<Output = Result<Option<Topic>, StanceApiError>> + Send;

    /// Seeds the topic reference data. Idempotent: topics that already exist are left untouched.
    fn seed_topics(&self, topics: &[Topic]) -> impl Future<Output = Result<(), StanceApiError>> + Send;
}
