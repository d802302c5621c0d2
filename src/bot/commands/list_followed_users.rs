use super::Command;
use crate::bot::commands;
use crate::db::telegram;
use crate::models::UserFeed;
use diesel::PgConnection;

static COMMAND: &str = "/followed_users";

const NO_FOLLOWED_USERS_RESPONSE: &str = "Fail! Follow a user first. /help for info";

pub struct ListFollowedUsers {}

impl ListFollowedUsers {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for ListFollowedUsers {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        match telegram::find_followed_users(db_connection, user_feed.id) {
            Err(_) => commands::STORAGE_ERROR_RESPONSE.to_string(),
            Ok(followed_users) => {
                if followed_users.is_empty() {
                    NO_FOLLOWED_USERS_RESPONSE.to_string()
                } else {
                    commands::followed_users_list(&followed_users)
                }
            }
        }
    }
}
