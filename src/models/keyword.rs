use crate::schema::keywords;
use chrono::{DateTime, Utc};

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = keywords)]
pub struct Keyword {
    pub id: i64,
    pub user_feed_id: i64,
    pub name: String,
    pub is_full_match: bool,
    pub search_threads: bool,
    pub search_comments: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
