use ade_common::{DebateId, UserId};
use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Debate, DebateStatusType, NewDebate},
    traits::DebateApiError,
};

/// Inserts the debate into the database, returning `false` in the second parameter if a debate
/// with the same pairing key already exists.
///
/// The fast path checks for an existing row first; the `ON CONFLICT DO NOTHING` on the insert
/// closes the window in which the opponent's concurrent search slips in between the check and
/// the write. Either way, both searchers end up holding the same row.
pub async fn idempotent_insert(debate: NewDebate, conn: &mut SqliteConnection) -> Result<(Debate, bool), DebateApiError> {
    if debate.participant_favor == debate.participant_contra {
        return Err(DebateApiError::ParticipantsNotDistinct);
    }
    let Some(key) = debate.match_key.clone() else {
        let inserted = insert_debate(debate, conn).await?.ok_or_else(|| {
            DebateApiError::DatabaseError("insert without pairing key returned no row".to_string())
        })?;
        debug!("🗃️ Debate {} inserted", inserted.id);
        return Ok((inserted, true));
    };
    if let Some(existing) = fetch_debate_by_match_key(&key, conn).await? {
        return Ok((existing, false));
    }
    match insert_debate(debate, conn).await? {
        Some(inserted) => {
            debug!("🗃️ Debate {} inserted for pairing key {key}", inserted.id);
            Ok((inserted, true))
        },
        // lost the insert race to the opponent's search
        None => {
            let existing = fetch_debate_by_match_key(&key, conn).await?.ok_or_else(|| {
                DebateApiError::DatabaseError(format!("debate with pairing key {key} vanished mid-insert"))
            })?;
            Ok((existing, false))
        },
    }
}

async fn insert_debate(debate: NewDebate, conn: &mut SqliteConnection) -> Result<Option<Debate>, DebateApiError> {
    let inserted = sqlx::query_as(
        r#"
            INSERT INTO debates (
                title,
                description,
                author_user_id,
                participant_favor,
                participant_contra,
                status,
                category,
                match_key,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ON CONFLICT (match_key) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(debate.title)
    .bind(debate.description)
    .bind(debate.author_user_id)
    .bind(debate.participant_favor)
    .bind(debate.participant_contra)
    .bind(DebateStatusType::Pending)
    .bind(debate.category)
    .bind(debate.match_key)
    .bind(debate.created_at)
    .fetch_optional(conn)
    .await?;
    Ok(inserted)
}

pub async fn fetch_debate(id: DebateId, conn: &mut SqliteConnection) -> Result<Option<Debate>, sqlx::Error> {
    let debate = sqlx::query_as("SELECT * FROM debates WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(debate)
}

pub async fn fetch_debate_by_match_key(key: &str, conn: &mut SqliteConnection) -> Result<Option<Debate>, sqlx::Error> {
    let debate = sqlx::query_as("SELECT * FROM debates WHERE match_key = $1").bind(key).fetch_optional(conn).await?;
    Ok(debate)
}

/// Every debate the user participates in, on either side, oldest first.
pub async fn fetch_debates_for_user(user_id: &UserId, conn: &mut SqliteConnection) -> Result<Vec<Debate>, sqlx::Error> {
    let debates = sqlx::query_as(
        r#"
            SELECT * FROM debates
            WHERE participant_favor = $1 OR participant_contra = $1
            ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(debates)
}

/// Writes a new status onto the debate record. The status order is forward-only; a regression is
/// refused with [`DebateApiError::StatusRegression`] and a same-status write is a no-op.
pub async fn update_status(
    id: DebateId,
    new_status: DebateStatusType,
    conn: &mut SqliteConnection,
) -> Result<Debate, DebateApiError> {
    let debate = fetch_debate(id, &mut *conn).await?.ok_or(DebateApiError::DebateNotFound(id))?;
    if new_status == debate.status {
        return Ok(debate);
    }
    if new_status.ordinal() < debate.status.ordinal() {
        return Err(DebateApiError::StatusRegression { debate_id: id, from: debate.status, to: new_status });
    }
    let updated: Debate = sqlx::query_as("UPDATE debates SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(new_status)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;
    debug!("🗃️ Debate {id} moved from {} to {}", debate.status, updated.status);
    Ok(updated)
}
