use crate::schema::telegram_updates;
use chrono::{DateTime, Utc};

/// A persisted inbound chat message. Write-once; the poll offset is
/// recovered as the highest stored `update_id` plus one.
#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = telegram_updates)]
pub struct TelegramUpdate {
    pub id: i64,
    pub update_id: i64,
    pub chat_id: i64,
    pub date: DateTime<Utc>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
