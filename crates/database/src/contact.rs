//! Contact conversation state.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Contact, ContactUpdate, NewContact};

/// Get the contact of an account by phone.
pub async fn get_contact(pool: &SqlitePool, user_id: &str, phone: &str) -> Result<Option<Contact>> {
    let contact = sqlx::query_as::<_, Contact>(
        r#"
        SELECT id, user_id, phone, name, current_menu_key, awaiting_human,
               interaction_count, last_message_at, last_response_at, created_at
        FROM chatbot_contacts
        WHERE user_id = ? AND phone = ?
        "#,
    )
    .bind(user_id)
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    Ok(contact)
}

/// Create a contact at the main menu with one interaction.
///
/// If the contact was created concurrently the existing row is returned.
pub async fn create_contact(pool: &SqlitePool, contact: &NewContact) -> Result<Contact> {
    sqlx::query(
        r#"
        INSERT INTO chatbot_contacts (user_id, phone, name, current_menu_key, interaction_count, last_message_at)
        VALUES (?, ?, ?, 'main', 1, datetime('now'))
        ON CONFLICT(user_id, phone) DO NOTHING
        "#,
    )
    .bind(&contact.user_id)
    .bind(&contact.phone)
    .bind(contact.name.as_deref().filter(|n| !n.is_empty()))
    .execute(pool)
    .await?;

    get_contact(pool, &contact.user_id, &contact.phone)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Contact",
            id: contact.phone.clone(),
        })
}

/// Write the state reached after a processed message.
pub async fn update_contact(
    pool: &SqlitePool,
    user_id: &str,
    phone: &str,
    update: &ContactUpdate,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE chatbot_contacts
        SET current_menu_key = ?,
            awaiting_human = ?,
            interaction_count = ?,
            name = COALESCE(?, name),
            last_message_at = datetime('now'),
            last_response_at = datetime('now')
        WHERE user_id = ? AND phone = ?
        "#,
    )
    .bind(&update.current_menu_key)
    .bind(update.awaiting_human)
    .bind(update.interaction_count)
    .bind(update.name.as_deref().filter(|n| !n.is_empty()))
    .bind(user_id)
    .bind(phone)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Contact",
            id: phone.to_string(),
        });
    }

    Ok(())
}
