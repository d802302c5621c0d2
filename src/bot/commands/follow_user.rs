use super::Command;
use crate::bot::commands;
use crate::bot::commands::{CommandOption, OptionsError};
use crate::db::telegram;
use crate::db::telegram::NewFollowedUser;
use crate::models::UserFeed;
use diesel::PgConnection;
use typed_builder::TypedBuilder;

static COMMAND: &str = "/follow";

#[derive(Debug)]
enum FollowError {
    TooShort,
    TooLong,
    Options(OptionsError),
    AlreadyFollowed,
    DbError(diesel::result::Error),
}

impl From<diesel::result::Error> for FollowError {
    fn from(error: diesel::result::Error) -> Self {
        FollowError::DbError(error)
    }
}

impl From<OptionsError> for FollowError {
    fn from(error: OptionsError) -> Self {
        FollowError::Options(error)
    }
}

#[derive(TypedBuilder)]
pub struct FollowUser {
    args: String,
}

impl FollowUser {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn follow(
        &self,
        db_connection: &mut PgConnection,
        user_feed: &UserFeed,
    ) -> Result<String, FollowError> {
        let (username, raw_options) = commands::split_term_and_options(&self.args);

        if username.chars().count() < commands::USERNAME_MIN_LENGTH {
            return Err(FollowError::TooShort);
        }

        if username.chars().count() > commands::USERNAME_MAX_LENGTH {
            return Err(FollowError::TooLong);
        }

        let options = commands::parse_options(&raw_options, false)?;

        if telegram::find_followed_user(db_connection, user_feed.id, &username).is_some() {
            return Err(FollowError::AlreadyFollowed);
        }

        let new_followed_user = NewFollowedUser {
            user_feed_id: user_feed.id,
            username,
            follow_threads: !options.contains(&CommandOption::Comments),
            follow_comments: !options.contains(&CommandOption::Stories),
        };

        telegram::create_followed_user(db_connection, new_followed_user)?;

        let followed_users = telegram::find_followed_users(db_connection, user_feed.id)?;

        Ok(format!(
            "Success! User followed. Current followed users list:\n\n{}",
            commands::followed_users_list(&followed_users)
        ))
    }
}

impl Command for FollowUser {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        match self.follow(db_connection, user_feed) {
            Ok(response) => response,
            Err(FollowError::TooShort) => format!(
                "Fail! Username must be at least {} characters long",
                commands::USERNAME_MIN_LENGTH
            ),
            Err(FollowError::TooLong) => format!(
                "Fail! Max username length is {} characters",
                commands::USERNAME_MAX_LENGTH
            ),
            Err(FollowError::Options(error)) => error.response(),
            Err(FollowError::AlreadyFollowed) => "Fail! User is already followed".to_string(),
            Err(FollowError::DbError(_)) => commands::STORAGE_ERROR_RESPONSE.to_string(),
        }
    }
}
