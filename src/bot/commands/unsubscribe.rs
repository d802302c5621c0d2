use super::Command;
use crate::bot::commands;
use crate::db::{telegram, threads};
use crate::models::UserFeed;
use diesel::PgConnection;
use typed_builder::TypedBuilder;

static COMMAND: &str = "/unsubscribe";

const NOT_SUBSCRIBED_RESPONSE: &str = "Fail! Not subscribed to any thread";

#[derive(TypedBuilder)]
pub struct Unsubscribe {
    thread_id: i64,
}

impl Unsubscribe {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn unsubscribe(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        let subscription = match telegram::find_subscription(db_connection, user_feed.id) {
            Some(subscription) => subscription,
            None => return NOT_SUBSCRIBED_RESPONSE.to_string(),
        };

        let thread = match threads::find(db_connection, subscription.thread_id) {
            Some(thread) => thread,
            None => return commands::STORAGE_ERROR_RESPONSE.to_string(),
        };

        if thread.thread_id != self.thread_id {
            return format!(
                "Fail! Not subscribed to thread {}. Currently subscribed to thread {}",
                self.thread_id, thread.thread_id
            );
        }

        match telegram::remove_subscription(db_connection, user_feed.id) {
            Ok(_) => format!(
                "Success! Unsubscribed from thread: {}",
                thread.display_title()
            ),
            Err(_) => commands::STORAGE_ERROR_RESPONSE.to_string(),
        }
    }
}

impl Command for Unsubscribe {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        self.unsubscribe(db_connection, user_feed)
    }
}

#[cfg(test)]
mod tests {
    use super::Unsubscribe;
    use crate::bot::commands::Command;
    use crate::db;
    use crate::db::telegram::NewThreadSubscription;
    use crate::db::threads::NewThread;
    use crate::db::{telegram, threads};
    use diesel::connection::Connection;
    use diesel::result::Error;

    #[test]
    #[ignore = "requires a database"]
    fn unsubscribing_with_a_mismatched_id_reports_the_actual_subscription() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            let user_feed = telegram::find_or_create_user_feed(connection, 1)?;
            let thread = threads::upsert(
                connection,
                &NewThread {
                    thread_id: 1000,
                    link: "https://example.com".to_string(),
                    title: "A story".to_string(),
                    creator_username: None,
                    score: Some(1),
                    thread_created_at: db::current_time(),
                    comments_count: Some(0),
                    comments_link: None,
                },
            )?;
            telegram::create_subscription(
                connection,
                NewThreadSubscription {
                    user_feed_id: user_feed.id,
                    thread_id: thread.id,
                },
            )?;

            let response = Unsubscribe::builder()
                .thread_id(2000)
                .build()
                .response(connection, &user_feed);
            assert_eq!(
                response,
                "Fail! Not subscribed to thread 2000. Currently subscribed to thread 1000"
            );

            let response = Unsubscribe::builder()
                .thread_id(1000)
                .build()
                .response(connection, &user_feed);
            assert_eq!(response, "Success! Unsubscribed from thread: A story");

            assert!(telegram::find_subscription(connection, user_feed.id).is_none());

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn unsubscribing_without_a_subscription_fails() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            let user_feed = telegram::find_or_create_user_feed(connection, 1)?;

            let response = Unsubscribe::builder()
                .thread_id(1000)
                .build()
                .response(connection, &user_feed);

            assert_eq!(response, "Fail! Not subscribed to any thread");

            Ok(())
        });
    }
}
