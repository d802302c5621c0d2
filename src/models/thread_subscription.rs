use crate::schema::thread_subscriptions;
use chrono::{DateTime, Utc};

/// The single active thread subscription of a feed. The primary key on
/// `user_feed_id` is what enforces the one-subscription-per-feed cap.
#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = thread_subscriptions)]
#[diesel(primary_key(user_feed_id))]
pub struct ThreadSubscription {
    pub user_feed_id: i64,
    pub thread_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
