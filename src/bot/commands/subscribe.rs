use super::Command;
use crate::bot::commands;
use crate::db::comments::CommentSearch;
use crate::db::telegram::NewThreadSubscription;
use crate::db::{comments, telegram, threads, CommentLedger};
use crate::models::{Thread, UserFeed};
use diesel::{Connection, PgConnection};
use typed_builder::TypedBuilder;

static COMMAND: &str = "/subscribe";

#[derive(Debug)]
enum SubscriptionError {
    ThreadNotFound,
    AlreadySubscribedToThread,
    SubscriptionLimit,
    DbError(diesel::result::Error),
}

impl From<diesel::result::Error> for SubscriptionError {
    fn from(error: diesel::result::Error) -> Self {
        SubscriptionError::DbError(error)
    }
}

#[derive(TypedBuilder)]
pub struct Subscribe {
    thread_id: i64,
}

impl Subscribe {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn subscribe(
        &self,
        db_connection: &mut PgConnection,
        user_feed: &UserFeed,
    ) -> Result<Thread, SubscriptionError> {
        db_connection.transaction::<Thread, SubscriptionError, _>(|db_connection| {
            let thread = threads::find_by_thread_id(db_connection, self.thread_id)
                .ok_or(SubscriptionError::ThreadNotFound)?;

            if let Some(subscription) = telegram::find_subscription(db_connection, user_feed.id) {
                if subscription.thread_id == thread.id {
                    return Err(SubscriptionError::AlreadySubscribedToThread);
                }

                return Err(SubscriptionError::SubscriptionLimit);
            }

            telegram::create_subscription(
                db_connection,
                NewThreadSubscription {
                    user_feed_id: user_feed.id,
                    thread_id: thread.id,
                },
            )?;

            // snapshot the comments that already exist, so only comments
            // arriving after this point are delivered
            let existing = comments::search(
                db_connection,
                &CommentSearch::builder().thread_id_int(thread.thread_id).build(),
            )?;
            let existing_ids: Vec<i64> = existing.iter().map(|comment| comment.id).collect();

            telegram::add_comments_to_ledger(
                db_connection,
                user_feed.id,
                &existing_ids,
                CommentLedger::SubscriptionComments,
            )?;

            Ok(thread)
        })
    }
}

impl Command for Subscribe {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        match self.subscribe(db_connection, user_feed) {
            Ok(thread) => format!(
                "Success! Subscribed to thread: {}",
                thread.display_title()
            ),
            Err(SubscriptionError::ThreadNotFound) => "Fail! Thread not found".to_string(),
            Err(SubscriptionError::AlreadySubscribedToThread) => {
                "Fail! Already subscribed to this thread".to_string()
            }
            Err(SubscriptionError::SubscriptionLimit) => {
                "Fail! Only one subscription at a time is allowed".to_string()
            }
            Err(SubscriptionError::DbError(_)) => commands::STORAGE_ERROR_RESPONSE.to_string(),
        }
    }
}
