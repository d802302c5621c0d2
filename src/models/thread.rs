use crate::schema::threads;
use chrono::{DateTime, Utc};

/// A scraped Hacker News story. The stored title is padded with one space
/// on each side so whole-word keyword matching can run as a plain
/// containment test.
#[derive(Queryable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = threads)]
pub struct Thread {
    pub id: i64,
    pub thread_id: i64,
    pub link: String,
    pub title: String,
    pub creator_username: Option<String>,
    pub score: Option<i32>,
    pub thread_created_at: DateTime<Utc>,
    pub comments_count: Option<i32>,
    pub comments_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Thread {
    pub fn display_title(&self) -> &str {
        self.title.trim()
    }
}
