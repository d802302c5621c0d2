use super::Command;
use crate::bot::commands;
use crate::db::telegram;
use crate::models::UserFeed;
use diesel::PgConnection;

static COMMAND: &str = "/disable";

const NOT_SET_RESPONSE: &str = "Fail! Reply notifications are not enabled";
const DISABLED_RESPONSE: &str = "Success! Reply notifications are disabled";

pub struct DisableNotify {}

impl DisableNotify {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for DisableNotify {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        if user_feed.hn_username.is_none() {
            return NOT_SET_RESPONSE.to_string();
        }

        match telegram::set_hn_username(db_connection, user_feed, None) {
            Ok(_) => DISABLED_RESPONSE.to_string(),
            Err(_) => commands::STORAGE_ERROR_RESPONSE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DisableNotify;
    use crate::bot::commands::set_notify_username::SetNotifyUsername;
    use crate::bot::commands::Command;
    use crate::db;
    use crate::db::telegram;
    use diesel::connection::Connection;
    use diesel::result::Error;

    #[test]
    #[ignore = "requires a database"]
    fn notify_must_be_disabled_before_it_can_be_set_again() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            let user_feed = telegram::find_or_create_user_feed(connection, 1)?;

            let response = DisableNotify {}.response(connection, &user_feed);
            assert_eq!(response, "Fail! Reply notifications are not enabled");

            let set_command = SetNotifyUsername::builder()
                .username("somebody".to_string())
                .build();

            let response = set_command.response(connection, &user_feed);
            assert_eq!(
                response,
                "Success! You will receive a message when someone replies to one of your comments"
            );

            let user_feed = telegram::find_user_feed(connection, 1).unwrap();
            assert_eq!(user_feed.hn_username.as_deref(), Some("somebody"));

            let response = set_command.response(connection, &user_feed);
            assert_eq!(
                response,
                "Fail! Username is already set. Use /disable to remove it first"
            );

            let response = DisableNotify {}.response(connection, &user_feed);
            assert_eq!(response, "Success! Reply notifications are disabled");

            Ok(())
        });
    }
}
