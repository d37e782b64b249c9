//! Append-only log of processed messages.

use sqlx::SqlitePool;

use crate::models::{InteractionLog, NewInteractionLog};
use crate::Result;

/// Append a log entry. Returns its id.
pub async fn insert_log(pool: &SqlitePool, log: &NewInteractionLog) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO chatbot_logs (
            user_id, contact_phone, incoming_message, response_sent,
            menu_key, trigger_matched, was_fallback
        )
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&log.user_id)
    .bind(&log.contact_phone)
    .bind(&log.incoming_message)
    .bind(&log.response_sent)
    .bind(&log.menu_key)
    .bind(&log.trigger_matched)
    .bind(log.was_fallback)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Most recent log entries of a contact, newest first.
pub async fn list_logs_for_contact(
    pool: &SqlitePool,
    user_id: &str,
    phone: &str,
    limit: i64,
) -> Result<Vec<InteractionLog>> {
    let rows = sqlx::query_as::<_, InteractionLog>(
        r#"
        SELECT id, user_id, contact_phone, incoming_message, response_sent,
               menu_key, trigger_matched, was_fallback, created_at
        FROM chatbot_logs
        WHERE user_id = ? AND contact_phone = ?
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(phone)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
