use ade_common::{DebateId, UserId};
use chrono::Utc;
use sqlx::SqliteConnection;

use crate::{
    db_types::{DebateEntry, DebateStage, Position},
    traits::DebateApiError,
};

/// Inserts an entry for an already-validated `(stage, position)` slot. This is not atomic on its
/// own; the gateway embeds it in the submission transaction together with the turn validation and
/// the status advance.
pub async fn insert_entry(
    debate_id: DebateId,
    user_id: &UserId,
    stage: DebateStage,
    position: Position,
    content: &str,
    conn: &mut SqliteConnection,
) -> Result<DebateEntry, DebateApiError> {
    let entry = sqlx::query_as(
        r#"
            INSERT INTO debate_entries (debate_id, user_id, stage, position, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(debate_id)
    .bind(user_id)
    .bind(stage)
    .bind(position)
    .bind(content)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    Ok(entry)
}

/// All entries for a debate in submission order.
pub async fn fetch_for_debate(debate_id: DebateId, conn: &mut SqliteConnection) -> Result<Vec<DebateEntry>, sqlx::Error> {
    let entries = sqlx::query_as("SELECT * FROM debate_entries WHERE debate_id = $1 ORDER BY created_at ASC, id ASC")
        .bind(debate_id)
        .fetch_all(conn)
        .await?;
    Ok(entries)
}

/// The entries for one stage of a debate, in submission order. At most two rows.
pub async fn fetch_for_stage(
    debate_id: DebateId,
    stage: DebateStage,
    conn: &mut SqliteConnection,
) -> Result<Vec<DebateEntry>, sqlx::Error> {
    let entries = sqlx::query_as(
        r#"
            SELECT * FROM debate_entries
            WHERE debate_id = $1 AND stage = $2
            ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(debate_id)
    .bind(stage)
    .fetch_all(conn)
    .await?;
    Ok(entries)
}
