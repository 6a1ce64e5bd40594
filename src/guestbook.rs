//! Guestbook message operations.
//!
//! Validation and the three queries the pages need: the public feed (joined
//! with the author for display), the per-user private feed, and message
//! creation. Both feeds return the 10 most recent rows, newest first.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;
use tracing::debug;

use crate::entity::{guestbook_message, user};
use crate::error::AppError;

/// Feed queries never return more rows than this.
pub const FEED_LIMIT: u64 = 10;

/// Form payload for a guestbook submission.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub message: String,
    /// Optional reference to an already-uploaded image.
    #[serde(default)]
    pub image: Option<String>,
}

/// Rejects submissions with an empty message. The error carries a
/// field-keyed map so the form can re-render with the failure inline.
pub fn validate(form: &MessageForm) -> Result<(), AppError> {
    if form.message.is_empty() {
        return Err(AppError::validation("message", "Message is required"));
    }
    Ok(())
}

/// Public feed: recent messages across all users, each paired with its
/// author row. The FK guarantees every message has one.
pub async fn recent_messages(
    db: &DatabaseConnection,
) -> Result<Vec<(guestbook_message::Model, user::Model)>, DbErr> {
    let rows = guestbook_message::Entity::find()
        .find_also_related(user::Entity)
        .order_by_desc(guestbook_message::Column::CreatedAt)
        .limit(FEED_LIMIT)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(message, author)| author.map(|a| (message, a)))
        .collect())
}

/// Private feed: recent messages belonging to `user_id` only.
pub async fn messages_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<guestbook_message::Model>, DbErr> {
    guestbook_message::Entity::find()
        .filter(guestbook_message::Column::UserId.eq(user_id))
        .order_by_desc(guestbook_message::Column::CreatedAt)
        .limit(FEED_LIMIT)
        .all(db)
        .await
}

/// Validates and persists one message owned by `user_id`.
pub async fn create_message(
    db: &DatabaseConnection,
    user_id: &str,
    form: &MessageForm,
    country: Option<String>,
) -> Result<guestbook_message::Model, AppError> {
    validate(form)?;

    let image = form.image.as_deref().filter(|s| !s.is_empty());

    let row = guestbook_message::ActiveModel {
        message: Set(form.message.clone()),
        country: Set(Some(country.unwrap_or_else(|| "Unknown".to_string()))),
        image: Set(image.map(str::to_owned)),
        created_at: Set(now_timestamp()),
        user_id: Set(user_id.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(id = row.id, user = %row.user_id, "guestbook message created");
    Ok(row)
}

/// Current UTC time in the text format the schema stores
/// (`YYYY-MM-DD HH:MM:SS`), which also sorts lexicographically.
pub(crate) fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_is_rejected() {
        let form = MessageForm {
            message: String::new(),
            image: None,
        };
        match validate(&form) {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.get("message").map(String::as_str), Some("Message is required"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn non_empty_message_passes() {
        let form = MessageForm {
            message: "hello".to_string(),
            image: None,
        };
        assert!(validate(&form).is_ok());
    }

    #[test]
    fn timestamp_format_sorts_lexicographically() {
        let ts = now_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
    }
}
