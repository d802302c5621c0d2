use super::Command;
use crate::bot::commands;
use crate::db::{telegram, threads};
use crate::models::UserFeed;
use diesel::PgConnection;

static COMMAND: &str = "/subscriptions";

const NOT_SUBSCRIBED_RESPONSE: &str = "Fail! Not subscribed to any thread";

pub struct ListSubscriptions {}

impl ListSubscriptions {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for ListSubscriptions {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        let subscription = match telegram::find_subscription(db_connection, user_feed.id) {
            Some(subscription) => subscription,
            None => return NOT_SUBSCRIBED_RESPONSE.to_string(),
        };

        match threads::find(db_connection, subscription.thread_id) {
            Some(thread) => format!(
                "Subscribed to thread: {} ({})",
                thread.display_title(),
                thread.thread_id
            ),
            None => commands::STORAGE_ERROR_RESPONSE.to_string(),
        }
    }
}
