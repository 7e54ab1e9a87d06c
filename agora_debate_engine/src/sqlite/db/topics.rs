use sqlx::SqliteConnection;

use crate::{db_types::Topic, traits::StanceApiError};

/// Seeds the topic reference data. Topics that already exist are left untouched, so seeding is
/// idempotent across restarts.
pub async fn seed_topics(topics: &[Topic], conn: &mut SqliteConnection) -> Result<(), StanceApiError> {
    for topic in topics {
        sqlx::query(
            r#"
            INSERT INTO topics (name, description) VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING;
        "#,
        )
        .bind(&topic.name)
        .bind(&topic.description)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn fetch_topic(name: &str, conn: &mut SqliteConnection) -> Result<Option<Topic>, sqlx::Error> {
    let topic = sqlx::query_as("SELECT * FROM topics WHERE name = $1").bind(name).fetch_optional(conn).await?;
    Ok(topic)
}
