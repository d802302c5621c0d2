use crate::schema::followed_users;
use chrono::{DateTime, Utc};

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = followed_users)]
pub struct FollowedUser {
    pub id: i64,
    pub user_feed_id: i64,
    pub username: String,
    pub follow_threads: bool,
    pub follow_comments: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
