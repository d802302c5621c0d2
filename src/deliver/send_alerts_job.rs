use super::{AlertMatcher, DeliveryDriver};
use crate::bot::telegram_client;
use crate::bot::telegram_client::Api;
use crate::config::Config;
use crate::db::{telegram, CommentLedger, ThreadLedger};
use crate::models::{Comment, Thread, UserFeed};
use diesel::PgConnection;
use fang::typetag;
use fang::FangError;
use fang::Queueable;
use fang::Runnable;
use fang::Scheduled;
use serde::{Deserialize, Serialize};

/// Periodic trigger: run every matching strategy for every feed and
/// deliver what came up. Ledgers are appended after each strategy's send
/// loop and cover every matched item whether or not its send succeeded;
/// failed sends are never retried.
#[derive(Serialize, Deserialize)]
pub struct SendAlertsJob {}

impl Default for SendAlertsJob {
    fn default() -> Self {
        Self::new()
    }
}

impl SendAlertsJob {
    pub fn new() -> Self {
        SendAlertsJob {}
    }

    pub fn deliver(&self, db_connection: &mut PgConnection) -> Result<(), FangError> {
        let user_feeds = match telegram::fetch_user_feeds(db_connection) {
            Ok(user_feeds) => user_feeds,
            Err(error) => {
                let description = format!("Failed to fetch user feeds: {error:?}");

                return Err(FangError { description });
            }
        };

        log::info!("Started delivering alerts to {} feeds", user_feeds.len());

        let api = telegram_client::api();
        let mut all_sent = true;

        for user_feed in user_feeds {
            match self.deliver_feed_alerts(db_connection, api, &user_feed) {
                Ok(sent) => all_sent &= sent,
                Err(error) => {
                    log::error!(
                        "Failed to deliver alerts to chat {}: {:?}",
                        user_feed.chat_id,
                        error
                    );
                    all_sent = false;
                }
            }
        }

        if all_sent {
            log::info!("Finished delivering alerts");
        } else {
            log::error!("Finished delivering alerts, some messages were not sent");
        }

        Ok(())
    }

    fn deliver_feed_alerts(
        &self,
        db_connection: &mut PgConnection,
        api: &Api,
        user_feed: &UserFeed,
    ) -> Result<bool, diesel::result::Error> {
        let matcher = AlertMatcher::new(user_feed);
        let driver = DeliveryDriver::new(api, user_feed);
        let mut all_sent = true;

        // keyword and domain hits share one message shape and one ledger
        let mut new_threads = matcher.new_threads_by_keywords(db_connection)?;
        for thread in matcher.new_threads_by_domains(db_connection)? {
            if !new_threads.iter().any(|known| known.id == thread.id) {
                new_threads.push(thread);
            }
        }

        all_sent &= driver.send_new_threads(&new_threads);
        self.record_threads(db_connection, user_feed, &new_threads, ThreadLedger::Threads)?;

        let (new_comments, comments_by_keyword) =
            matcher.new_comments_by_keywords(db_connection)?;
        for (keyword, comments) in &comments_by_keyword {
            all_sent &= driver.send_keyword_comments(&keyword.name, comments);
        }
        self.record_comments(db_connection, user_feed, &new_comments, CommentLedger::Comments)?;

        let subscription_comments = matcher.new_subscription_comments(db_connection)?;
        all_sent &= driver.send_subscription_comments(&subscription_comments);
        self.record_comments(
            db_connection,
            user_feed,
            &subscription_comments,
            CommentLedger::SubscriptionComments,
        )?;

        let followed_user_threads = matcher.new_threads_by_followed_users(db_connection)?;
        all_sent &= driver.send_followed_user_threads(&followed_user_threads);
        self.record_threads(
            db_connection,
            user_feed,
            &followed_user_threads,
            ThreadLedger::FollowedUserThreads,
        )?;

        let followed_user_comments = matcher.new_comments_by_followed_users(db_connection)?;
        all_sent &= driver.send_followed_user_comments(&followed_user_comments);
        self.record_comments(
            db_connection,
            user_feed,
            &followed_user_comments,
            CommentLedger::FollowedUserComments,
        )?;

        let reply_comments = matcher.new_reply_comments(db_connection)?;
        all_sent &= driver.send_reply_comments(&reply_comments);
        self.record_comments(
            db_connection,
            user_feed,
            &reply_comments,
            CommentLedger::ReplyComments,
        )?;

        Ok(all_sent)
    }

    fn record_threads(
        &self,
        db_connection: &mut PgConnection,
        user_feed: &UserFeed,
        threads: &[Thread],
        ledger: ThreadLedger,
    ) -> Result<(), diesel::result::Error> {
        if threads.is_empty() {
            return Ok(());
        }

        let thread_ids: Vec<i64> = threads.iter().map(|thread| thread.id).collect();
        telegram::add_threads_to_ledger(db_connection, user_feed.id, &thread_ids, ledger)?;

        Ok(())
    }

    fn record_comments(
        &self,
        db_connection: &mut PgConnection,
        user_feed: &UserFeed,
        comments: &[Comment],
        ledger: CommentLedger,
    ) -> Result<(), diesel::result::Error> {
        if comments.is_empty() {
            return Ok(());
        }

        let comment_ids: Vec<i64> = comments.iter().map(|comment| comment.id).collect();
        telegram::add_comments_to_ledger(db_connection, user_feed.id, &comment_ids, ledger)?;

        Ok(())
    }
}

#[typetag::serde]
impl Runnable for SendAlertsJob {
    fn run(&self, _queue: &dyn Queueable) -> Result<(), FangError> {
        let mut db_connection = crate::db::pool().get()?;

        self.deliver(&mut db_connection)
    }

    fn cron(&self) -> Option<Scheduled> {
        Some(Scheduled::CronPattern(Config::alerts_cron_pattern()))
    }

    fn uniq(&self) -> bool {
        true
    }

    fn task_type(&self) -> String {
        super::JOB_TYPE.to_string()
    }
}
