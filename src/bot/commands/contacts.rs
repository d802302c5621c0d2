use super::Command;
use crate::models::UserFeed;
use diesel::PgConnection;

static COMMAND: &str = "/contacts";

const CONTACTS_RESPONSE: &str =
    "Suggestions, feature requests and bug reports:\nhttps://github.com/hnotify/hnotify/issues";

pub struct Contacts {}

impl Contacts {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for Contacts {
    fn response(&self, _db_connection: &mut PgConnection, _user_feed: &UserFeed) -> String {
        CONTACTS_RESPONSE.to_string()
    }
}
