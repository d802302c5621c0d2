use super::Command;
use crate::bot::commands;
use crate::db::telegram;
use crate::models::UserFeed;
use diesel::PgConnection;
use typed_builder::TypedBuilder;

static COMMAND: &str = "/notify";

const ALREADY_SET_RESPONSE: &str =
    "Fail! Username is already set. Use /disable to remove it first";
const SET_RESPONSE: &str =
    "Success! You will receive a message when someone replies to one of your comments";

#[derive(TypedBuilder)]
pub struct SetNotifyUsername {
    username: String,
}

impl SetNotifyUsername {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for SetNotifyUsername {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        if user_feed.hn_username.is_some() {
            return ALREADY_SET_RESPONSE.to_string();
        }

        match telegram::set_hn_username(db_connection, user_feed, Some(self.username.trim())) {
            Ok(_) => SET_RESPONSE.to_string(),
            Err(_) => commands::STORAGE_ERROR_RESPONSE.to_string(),
        }
    }
}
