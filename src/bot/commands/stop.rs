use super::Command;
use crate::bot::commands;
use crate::db::telegram;
use crate::models::UserFeed;
use diesel::PgConnection;

static COMMAND: &str = "/stop";

const STOP_RESPONSE: &str = "Success! Data is erased";

/// Deletes the feed and everything hanging off it. The next message from
/// this chat starts over with a fresh feed.
pub struct Stop {}

impl Stop {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for Stop {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        match telegram::delete_user_feed(db_connection, user_feed) {
            Ok(_) => STOP_RESPONSE.to_string(),
            Err(_) => commands::STORAGE_ERROR_RESPONSE.to_string(),
        }
    }
}
