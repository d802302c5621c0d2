use crate::schema::comments;
use chrono::{DateTime, Utc};

/// A scraped Hacker News comment. `thread_id_int` carries the external
/// thread id instead of a hard foreign key so partially scraped threads
/// don't block comment ingestion. The body is stored space-padded, like
/// thread titles.
#[derive(Queryable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub id: i64,
    pub comment_id: i64,
    pub thread_id_int: i64,
    pub parent_comment_id: Option<i64>,
    pub username: String,
    pub body: String,
    pub comment_created_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn display_body(&self) -> &str {
        self.body.trim()
    }
}
