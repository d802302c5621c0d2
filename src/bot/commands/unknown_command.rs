use super::Command;
use crate::models::UserFeed;
use diesel::PgConnection;

const UNDEFINED_RESPONSE: &str = "Huh? Use /help to see the list of implemented commands";

pub struct UnknownCommand {}

impl Command for UnknownCommand {
    fn response(&self, _db_connection: &mut PgConnection, _user_feed: &UserFeed) -> String {
        UNDEFINED_RESPONSE.to_string()
    }
}
