use super::Command;
use crate::models::UserFeed;
use diesel::PgConnection;

static COMMAND: &str = "/commands";

const COMMANDS_RESPONSE: &str = "\
/add KEYWORD [-whole-word, -stories, -comments]
/remove KEYWORD
/keywords
/set_score SCORE
/subscribe THREAD_ID
/unsubscribe THREAD_ID
/subscriptions
/follow USERNAME [-stories, -comments]
/unfollow USERNAME
/followed_users
/watch DOMAIN_NAME
/abandon DOMAIN_NAME
/domains
/notify HN_USERNAME
/disable
/commands
/contacts
/help
/stop";

/// Terse command index; `/help` carries the full descriptions.
pub struct ListCommands {}

impl ListCommands {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for ListCommands {
    fn response(&self, _db_connection: &mut PgConnection, _user_feed: &UserFeed) -> String {
        COMMANDS_RESPONSE.to_string()
    }
}
