use super::Command;
use crate::bot::commands;
use crate::db::telegram;
use crate::models::UserFeed;
use diesel::PgConnection;

static COMMAND: &str = "/keywords";

const NO_KEYWORDS_RESPONSE: &str = "Fail! Add keyword first. /help for info";

pub struct ListKeywords {}

impl ListKeywords {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for ListKeywords {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        match telegram::find_keywords(db_connection, user_feed.id) {
            Err(_) => commands::STORAGE_ERROR_RESPONSE.to_string(),
            Ok(keywords) => {
                if keywords.is_empty() {
                    NO_KEYWORDS_RESPONSE.to_string()
                } else {
                    commands::keywords_list(&keywords)
                }
            }
        }
    }
}
