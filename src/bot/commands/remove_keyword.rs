use super::Command;
use crate::bot::commands;
use crate::db::telegram;
use crate::models::UserFeed;
use diesel::PgConnection;
use typed_builder::TypedBuilder;

static COMMAND: &str = "/remove";

const NO_KEYWORDS_RESPONSE: &str = "Fail! Add keyword first. /help for info";
const NOT_FOUND_RESPONSE: &str = "Fail! Keyword not found";
const LAST_REMOVED_RESPONSE: &str = "Success! Last keyword removed";

#[derive(TypedBuilder)]
pub struct RemoveKeyword {
    args: String,
}

impl RemoveKeyword {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn remove_keyword(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        let name = self.args.trim();

        let keywords = match telegram::find_keywords(db_connection, user_feed.id) {
            Ok(keywords) => keywords,
            Err(_) => return commands::STORAGE_ERROR_RESPONSE.to_string(),
        };

        if keywords.is_empty() {
            return NO_KEYWORDS_RESPONSE.to_string();
        }

        if !keywords.iter().any(|keyword| keyword.name == name) {
            return NOT_FOUND_RESPONSE.to_string();
        }

        if telegram::remove_keyword(db_connection, user_feed.id, name).is_err() {
            return commands::STORAGE_ERROR_RESPONSE.to_string();
        }

        let remaining: Vec<_> = keywords
            .into_iter()
            .filter(|keyword| keyword.name != name)
            .collect();

        if remaining.is_empty() {
            LAST_REMOVED_RESPONSE.to_string()
        } else {
            format!(
                "Success! Keyword removed. Current keywords list:\n\n{}",
                commands::keywords_list(&remaining)
            )
        }
    }
}

impl Command for RemoveKeyword {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        self.remove_keyword(db_connection, user_feed)
    }
}

#[cfg(test)]
mod tests {
    use super::RemoveKeyword;
    use crate::bot::commands::Command;
    use crate::db;
    use crate::db::telegram;
    use crate::db::telegram::NewKeyword;
    use diesel::connection::Connection;
    use diesel::result::Error;

    fn remove(connection: &mut diesel::PgConnection, chat_id: i64, args: &str) -> String {
        let user_feed = telegram::find_or_create_user_feed(connection, chat_id).unwrap();

        RemoveKeyword::builder()
            .args(args.to_string())
            .build()
            .response(connection, &user_feed)
    }

    fn create_keyword(connection: &mut diesel::PgConnection, chat_id: i64, name: &str) {
        let user_feed = telegram::find_or_create_user_feed(connection, chat_id).unwrap();

        telegram::create_keyword(
            connection,
            NewKeyword {
                user_feed_id: user_feed.id,
                name: name.to_string(),
                is_full_match: false,
                search_threads: true,
                search_comments: true,
            },
        )
        .unwrap();
    }

    #[test]
    #[ignore = "requires a database"]
    fn removing_with_no_keywords_points_to_help() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            let response = remove(connection, 1, "potato");

            assert_eq!(response, "Fail! Add keyword first. /help for info");

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn removing_a_missing_keyword_reports_not_found() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            create_keyword(connection, 1, "cucumber");

            let response = remove(connection, 1, "peach");

            assert_eq!(response, "Fail! Keyword not found");

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn removing_the_last_keyword_has_its_own_confirmation() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            create_keyword(connection, 1, "tomato");

            let response = remove(connection, 1, "tomato");

            assert_eq!(response, "Success! Last keyword removed");

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn removing_a_keyword_lists_the_remaining_ones() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            create_keyword(connection, 1, "cucumber");
            create_keyword(connection, 1, "tomato");

            let response = remove(connection, 1, "cucumber");

            assert_eq!(
                response,
                "Success! Keyword removed. Current keywords list:\n\ntomato"
            );

            Ok(())
        });
    }
}
