use super::Command;
use crate::bot::commands;
use crate::bot::commands::{CommandOption, OptionsError};
use crate::db::telegram;
use crate::db::telegram::NewKeyword;
use crate::models::UserFeed;
use diesel::PgConnection;
use typed_builder::TypedBuilder;

static COMMAND: &str = "/add";

#[derive(Debug)]
enum AddKeywordError {
    TooShort,
    TooLong,
    Options(OptionsError),
    AlreadyExists,
    LimitReached,
    DbError(diesel::result::Error),
}

impl From<diesel::result::Error> for AddKeywordError {
    fn from(error: diesel::result::Error) -> Self {
        AddKeywordError::DbError(error)
    }
}

impl From<OptionsError> for AddKeywordError {
    fn from(error: OptionsError) -> Self {
        AddKeywordError::Options(error)
    }
}

#[derive(TypedBuilder)]
pub struct AddKeyword {
    args: String,
}

impl AddKeyword {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn add_keyword(
        &self,
        db_connection: &mut PgConnection,
        user_feed: &UserFeed,
    ) -> Result<String, AddKeywordError> {
        let (name, raw_options) = commands::split_term_and_options(&self.args);

        if name.chars().count() < commands::KEYWORD_MIN_LENGTH {
            return Err(AddKeywordError::TooShort);
        }

        if name.chars().count() > commands::KEYWORD_MAX_LENGTH {
            return Err(AddKeywordError::TooLong);
        }

        let options = commands::parse_options(&raw_options, true)?;

        if telegram::find_keyword(db_connection, user_feed.id, &name).is_some() {
            return Err(AddKeywordError::AlreadyExists);
        }

        let keyword_count = telegram::count_keywords(db_connection, user_feed.id);
        if keyword_count >= commands::KEYWORDS_LIMIT as i64 {
            return Err(AddKeywordError::LimitReached);
        }

        let new_keyword = NewKeyword {
            user_feed_id: user_feed.id,
            name,
            is_full_match: options.contains(&CommandOption::WholeWord),
            search_threads: !options.contains(&CommandOption::Comments),
            search_comments: !options.contains(&CommandOption::Stories),
        };

        telegram::create_keyword(db_connection, new_keyword)?;

        if keyword_count == 0 {
            return Ok("Success! Keyword added. \
                 You will receive a message when this keyword is mentioned on Hacker News"
                .to_string());
        }

        let keywords = telegram::find_keywords(db_connection, user_feed.id)?;

        Ok(format!(
            "Success! Keyword added. Current keywords list:\n\n{}",
            commands::keywords_list(&keywords)
        ))
    }
}

impl Command for AddKeyword {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        match self.add_keyword(db_connection, user_feed) {
            Ok(response) => response,
            Err(AddKeywordError::TooShort) => format!(
                "Fail! Keyword must be at least {} characters long",
                commands::KEYWORD_MIN_LENGTH
            ),
            Err(AddKeywordError::TooLong) => format!(
                "Fail! Max keyword length is {} characters",
                commands::KEYWORD_MAX_LENGTH
            ),
            Err(AddKeywordError::Options(error)) => error.response(),
            Err(AddKeywordError::AlreadyExists) => "Fail! Keyword already exists".to_string(),
            Err(AddKeywordError::LimitReached) => format!(
                "Fail! You have reached the limit of {} keywords",
                commands::KEYWORDS_LIMIT
            ),
            Err(AddKeywordError::DbError(_)) => commands::STORAGE_ERROR_RESPONSE.to_string(),
        }
    }
}
