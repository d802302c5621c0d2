use super::Command;
use crate::bot::commands;
use crate::db::telegram;
use crate::models::UserFeed;
use diesel::PgConnection;
use typed_builder::TypedBuilder;

static COMMAND: &str = "/unfollow";

const NO_FOLLOWED_USERS_RESPONSE: &str = "Fail! Follow a user first. /help for info";
const NOT_FOUND_RESPONSE: &str = "Fail! User not found in the followed users list";
const LAST_REMOVED_RESPONSE: &str = "Success! Last followed user removed";

#[derive(TypedBuilder)]
pub struct UnfollowUser {
    args: String,
}

impl UnfollowUser {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn unfollow(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        let username = self.args.trim();

        let followed_users = match telegram::find_followed_users(db_connection, user_feed.id) {
            Ok(followed_users) => followed_users,
            Err(_) => return commands::STORAGE_ERROR_RESPONSE.to_string(),
        };

        if followed_users.is_empty() {
            return NO_FOLLOWED_USERS_RESPONSE.to_string();
        }

        if !followed_users.iter().any(|user| user.username == username) {
            return NOT_FOUND_RESPONSE.to_string();
        }

        if telegram::remove_followed_user(db_connection, user_feed.id, username).is_err() {
            return commands::STORAGE_ERROR_RESPONSE.to_string();
        }

        let remaining: Vec<_> = followed_users
            .into_iter()
            .filter(|user| user.username != username)
            .collect();

        if remaining.is_empty() {
            LAST_REMOVED_RESPONSE.to_string()
        } else {
            format!(
                "Success! User unfollowed. Current followed users list:\n\n{}",
                commands::followed_users_list(&remaining)
            )
        }
    }
}

impl Command for UnfollowUser {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        self.unfollow(db_connection, user_feed)
    }
}
