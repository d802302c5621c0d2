use super::Command;
use crate::models::UserFeed;
use diesel::PgConnection;

static COMMAND: &str = "/domains";

const NO_DOMAINS_RESPONSE: &str = "Fail! Watch a domain first. /help for info";

pub struct ListDomains {}

impl ListDomains {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for ListDomains {
    fn response(&self, _db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        if user_feed.domain_names.is_empty() {
            NO_DOMAINS_RESPONSE.to_string()
        } else {
            user_feed.domain_names.join("\n")
        }
    }
}
