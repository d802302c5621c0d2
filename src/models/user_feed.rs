use crate::schema::user_feeds;
use chrono::{DateTime, Utc};

/// One chat's notification configuration.
#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = user_feeds)]
pub struct UserFeed {
    pub id: i64,
    pub chat_id: i64,
    pub score_threshold: i32,
    pub domain_names: Vec<String>,
    pub hn_username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
