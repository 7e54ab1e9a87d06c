use ade_common::UserId;
use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewStance, Stance, StanceValue},
    traits::StanceApiError,
};

/// Inserts or replaces the user's stance on a topic. A stance is unique per
/// `(user_id, topic_name)`; re-declaring overwrites the value and bumps `updated_at`, which also
/// sends the user to the back of the matchmaking queue for that topic.
pub async fn upsert_stance(stance: NewStance, conn: &mut SqliteConnection) -> Result<Stance, StanceApiError> {
    let saved: Stance = sqlx::query_as(
        r#"
            INSERT INTO stances (user_id, topic_name, value, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (user_id, topic_name)
            DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            RETURNING *;
        "#,
    )
    .bind(stance.user_id)
    .bind(stance.topic_name)
    .bind(stance.value)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    debug!("🗃️ {} now holds {} on '{}'", saved.user_id, saved.value, saved.topic_name);
    Ok(saved)
}

pub async fn fetch_stance(
    user_id: &UserId,
    topic_name: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Stance>, sqlx::Error> {
    let stance = sqlx::query_as("SELECT * FROM stances WHERE user_id = $1 AND topic_name = $2")
        .bind(user_id)
        .bind(topic_name)
        .fetch_optional(conn)
        .await?;
    Ok(stance)
}

/// All of a user's stances, ordered by topic name so iteration order is deterministic.
pub async fn fetch_stances_for_user(user_id: &UserId, conn: &mut SqliteConnection) -> Result<Vec<Stance>, sqlx::Error> {
    let stances = sqlx::query_as("SELECT * FROM stances WHERE user_id = $1 ORDER BY topic_name ASC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(stances)
}

/// Every stance on a topic, longest-standing first.
pub async fn fetch_stances_on_topic(
    topic_name: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<Stance>, sqlx::Error> {
    let stances = sqlx::query_as("SELECT * FROM stances WHERE topic_name = $1 ORDER BY updated_at ASC, id ASC")
        .bind(topic_name)
        .fetch_all(conn)
        .await?;
    Ok(stances)
}

/// The matchmaking candidate query: stances on `topic_name` holding exactly `value`, excluding
/// the searcher. Longest-standing first, so the candidate who has waited longest is picked first.
pub async fn fetch_opposing_stances(
    topic_name: &str,
    value: StanceValue,
    exclude: &UserId,
    conn: &mut SqliteConnection,
) -> Result<Vec<Stance>, sqlx::Error> {
    let stances = sqlx::query_as(
        r#"
            SELECT * FROM stances
            WHERE topic_name = $1 AND value = $2 AND user_id <> $3
            ORDER BY updated_at ASC, id ASC
        "#,
    )
    .bind(topic_name)
    .bind(value)
    .bind(exclude)
    .fetch_all(conn)
    .await?;
    Ok(stances)
}
