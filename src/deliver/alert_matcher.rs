use crate::db;
use crate::db::comments::CommentSearch;
use crate::db::threads::ThreadSearch;
use crate::db::{comments, telegram, threads, CommentLedger, ThreadLedger};
use crate::models::{Comment, Keyword, Thread, UserFeed};
use chrono::{DateTime, Duration, Utc};
use diesel::{PgConnection, QueryResult};

const LOOKBACK_HOURS: i64 = 24;

/// Computes, for one feed, the not-yet-delivered items of every matching
/// strategy. Each strategy is a candidate query minus its own ledger; a
/// strategy never sees another strategy's ledger, so the same item can be
/// delivered once per reason.
pub struct AlertMatcher<'a> {
    user_feed: &'a UserFeed,
}

impl<'a> AlertMatcher<'a> {
    pub fn new(user_feed: &'a UserFeed) -> Self {
        AlertMatcher { user_feed }
    }

    /// Stories matching an active keyword: in-window, above the score
    /// threshold and linked to a comments page (posts without one are not
    /// discussion threads and are skipped).
    pub fn new_threads_by_keywords(
        &self,
        db_connection: &mut PgConnection,
    ) -> QueryResult<Vec<Thread>> {
        let keywords = telegram::find_keywords(db_connection, self.user_feed.id)?;
        let mut matched = Vec::new();

        for keyword in keywords.iter().filter(|keyword| keyword.search_threads) {
            let search = ThreadSearch::builder()
                .created_after(self.window_start())
                .score_gte(self.user_feed.score_threshold)
                .title_contains(keyword.name.clone())
                .title_whole_word(keyword.is_full_match)
                .with_comments_link(true)
                .build();

            let found = threads::search_undelivered(
                db_connection,
                &search,
                self.user_feed.id,
                ThreadLedger::Threads,
            )?;

            merge_threads(&mut matched, found);
        }

        Ok(matched)
    }

    /// Comments matching an active keyword. Returns the deduplicated union
    /// for the ledger write plus the per-keyword breakdown for message
    /// labeling; a comment hitting two keywords appears under both.
    pub fn new_comments_by_keywords(
        &self,
        db_connection: &mut PgConnection,
    ) -> QueryResult<(Vec<Comment>, Vec<(Keyword, Vec<Comment>)>)> {
        let keywords = telegram::find_keywords(db_connection, self.user_feed.id)?;
        let mut matched = Vec::new();
        let mut matched_by_keyword = Vec::new();

        for keyword in keywords
            .into_iter()
            .filter(|keyword| keyword.search_comments)
        {
            let search = CommentSearch::builder()
                .created_after(self.window_start())
                .body_contains(keyword.name.clone())
                .body_whole_word(keyword.is_full_match)
                .build();

            let found = comments::search_undelivered(
                db_connection,
                &search,
                self.user_feed.id,
                CommentLedger::Comments,
            )?;

            if found.is_empty() {
                continue;
            }

            merge_comments(&mut matched, found.clone());
            matched_by_keyword.push((keyword, found));
        }

        Ok((matched, matched_by_keyword))
    }

    /// Comments of the subscribed thread that are neither delivered nor in
    /// the snapshot taken at subscribe time. No window: the snapshot is the
    /// baseline.
    pub fn new_subscription_comments(
        &self,
        db_connection: &mut PgConnection,
    ) -> QueryResult<Vec<Comment>> {
        let subscription = match telegram::find_subscription(db_connection, self.user_feed.id) {
            Some(subscription) => subscription,
            None => return Ok(Vec::new()),
        };

        let thread = match threads::find(db_connection, subscription.thread_id) {
            Some(thread) => thread,
            None => return Ok(Vec::new()),
        };

        let search = CommentSearch::builder()
            .thread_id_int(thread.thread_id)
            .build();

        comments::search_undelivered(
            db_connection,
            &search,
            self.user_feed.id,
            CommentLedger::SubscriptionComments,
        )
    }

    /// Stories whose link contains a watched domain. Shares the ledger
    /// with keyword-thread matches, so a story hitting both reasons is
    /// delivered once.
    pub fn new_threads_by_domains(
        &self,
        db_connection: &mut PgConnection,
    ) -> QueryResult<Vec<Thread>> {
        let mut matched = Vec::new();

        for domain in &self.user_feed.domain_names {
            let search = ThreadSearch::builder()
                .created_after(self.window_start())
                .score_gte(self.user_feed.score_threshold)
                .link_contains(domain.clone())
                .build();

            let found = threads::search_undelivered(
                db_connection,
                &search,
                self.user_feed.id,
                ThreadLedger::Threads,
            )?;

            merge_threads(&mut matched, found);
        }

        Ok(matched)
    }

    pub fn new_threads_by_followed_users(
        &self,
        db_connection: &mut PgConnection,
    ) -> QueryResult<Vec<Thread>> {
        let followed_users = telegram::find_followed_users(db_connection, self.user_feed.id)?;
        let mut matched = Vec::new();

        for followed_user in followed_users.iter().filter(|user| user.follow_threads) {
            let search = ThreadSearch::builder()
                .created_after(self.window_start())
                .creator_username(followed_user.username.clone())
                .build();

            let found = threads::search_undelivered(
                db_connection,
                &search,
                self.user_feed.id,
                ThreadLedger::FollowedUserThreads,
            )?;

            merge_threads(&mut matched, found);
        }

        Ok(matched)
    }

    pub fn new_comments_by_followed_users(
        &self,
        db_connection: &mut PgConnection,
    ) -> QueryResult<Vec<Comment>> {
        let followed_users = telegram::find_followed_users(db_connection, self.user_feed.id)?;
        let mut matched = Vec::new();

        for followed_user in followed_users.iter().filter(|user| user.follow_comments) {
            let search = CommentSearch::builder()
                .created_after(self.window_start())
                .username(followed_user.username.clone())
                .build();

            let found = comments::search_undelivered(
                db_connection,
                &search,
                self.user_feed.id,
                CommentLedger::FollowedUserComments,
            )?;

            merge_comments(&mut matched, found);
        }

        Ok(matched)
    }

    /// Replies to comments written under the subscriber's own username.
    /// Parent authorship is resolved in two steps instead of a self-join.
    pub fn new_reply_comments(
        &self,
        db_connection: &mut PgConnection,
    ) -> QueryResult<Vec<Comment>> {
        let hn_username = match &self.user_feed.hn_username {
            Some(hn_username) => hn_username,
            None => return Ok(Vec::new()),
        };

        let own_comment_ids = comments::ids_by_author(db_connection, hn_username)?;

        if own_comment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let search = CommentSearch::builder()
            .created_after(self.window_start())
            .parent_comment_id_in(own_comment_ids)
            .build();

        comments::search_undelivered(
            db_connection,
            &search,
            self.user_feed.id,
            CommentLedger::ReplyComments,
        )
    }

    fn window_start(&self) -> DateTime<Utc> {
        db::current_time() - Duration::hours(LOOKBACK_HOURS)
    }
}

fn merge_threads(matched: &mut Vec<Thread>, found: Vec<Thread>) {
    for thread in found {
        if !matched.iter().any(|known| known.id == thread.id) {
            matched.push(thread);
        }
    }
}

fn merge_comments(matched: &mut Vec<Comment>, found: Vec<Comment>) {
    for comment in found {
        if !matched.iter().any(|known| known.id == comment.id) {
            matched.push(comment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AlertMatcher;
    use crate::db;
    use crate::db::comments::NewComment;
    use crate::db::telegram::{NewFollowedUser, NewKeyword};
    use crate::db::threads::NewThread;
    use crate::db::{comments, telegram, threads, CommentLedger, ThreadLedger};
    use crate::models::UserFeed;
    use chrono::Duration;
    use diesel::connection::Connection;
    use diesel::result::Error;
    use diesel::PgConnection;

    fn build_thread(thread_id: i64, title: &str) -> NewThread {
        NewThread {
            thread_id,
            link: "https://example.com/story".to_string(),
            title: title.to_string(),
            creator_username: Some("storyteller".to_string()),
            score: Some(10),
            thread_created_at: db::current_time(),
            comments_count: Some(1),
            comments_link: Some(format!(
                "https://news.ycombinator.com/item?id={thread_id}"
            )),
        }
    }

    fn build_comment(comment_id: i64, username: &str, body: &str) -> NewComment {
        NewComment {
            comment_id,
            thread_id_int: 1000,
            parent_comment_id: None,
            username: username.to_string(),
            body: body.to_string(),
            comment_created_at: db::current_time(),
        }
    }

    fn create_keyword(connection: &mut PgConnection, user_feed: &UserFeed, name: &str) {
        create_keyword_with_flags(connection, user_feed, name, true, true);
    }

    fn create_keyword_with_flags(
        connection: &mut PgConnection,
        user_feed: &UserFeed,
        name: &str,
        search_threads: bool,
        search_comments: bool,
    ) {
        telegram::create_keyword(
            connection,
            NewKeyword {
                user_feed_id: user_feed.id,
                name: name.to_string(),
                is_full_match: false,
                search_threads,
                search_comments,
            },
        )
        .unwrap();
    }

    #[test]
    #[ignore = "requires a database"]
    fn keyword_threads_exclude_already_delivered_stories() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            threads::upsert(connection, &build_thread(1, "new thread with potato keyword"))?;
            threads::upsert(connection, &build_thread(2, "new thread with tomato keyword"))?;
            let sent = threads::upsert(
                connection,
                &build_thread(3, "already sent thread with tomato keyword"),
            )?;

            let user_feed = telegram::find_or_create_user_feed(connection, 1)?;
            telegram::add_threads_to_ledger(
                connection,
                user_feed.id,
                &[sent.id],
                ThreadLedger::Threads,
            )?;

            create_keyword_with_flags(connection, &user_feed, "tomato", true, false);
            create_keyword(connection, &user_feed, "potato");

            let matcher = AlertMatcher::new(&user_feed);
            let new_threads = matcher.new_threads_by_keywords(connection)?;

            assert_eq!(new_threads.len(), 2);
            assert!(new_threads.iter().all(|thread| thread.id != sent.id));

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn whole_word_keywords_do_not_match_inside_words() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            threads::upsert(connection, &build_thread(1, "new thread with tomato keyword"))?;
            let unmatched = threads::upsert(
                connection,
                &build_thread(2, "this is not a full word match - tomatoes"),
            )?;

            let user_feed = telegram::find_or_create_user_feed(connection, 1)?;
            telegram::create_keyword(
                connection,
                NewKeyword {
                    user_feed_id: user_feed.id,
                    name: "tomato".to_string(),
                    is_full_match: true,
                    search_threads: true,
                    search_comments: false,
                },
            )?;

            let matcher = AlertMatcher::new(&user_feed);
            let new_threads = matcher.new_threads_by_keywords(connection)?;

            assert_eq!(new_threads.len(), 1);
            assert!(new_threads.iter().all(|thread| thread.id != unmatched.id));

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn score_threshold_filters_keyword_threads() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            let mut weak = build_thread(1, "weak potato story");
            weak.score = Some(5);
            threads::upsert(connection, &weak)?;

            let mut strong = build_thread(2, "strong potato story");
            strong.score = Some(500);
            let strong = threads::upsert(connection, &strong)?;

            let user_feed = telegram::find_or_create_user_feed(connection, 1)?;
            let user_feed = telegram::set_score_threshold(connection, &user_feed, 100)?;
            create_keyword(connection, &user_feed, "potato");

            let matcher = AlertMatcher::new(&user_feed);
            let new_threads = matcher.new_threads_by_keywords(connection)?;

            assert_eq!(new_threads.len(), 1);
            assert_eq!(new_threads[0].id, strong.id);

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn matcher_is_idempotent_once_the_ledger_is_written() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            threads::upsert(connection, &build_thread(1, "a potato story"))?;

            let user_feed = telegram::find_or_create_user_feed(connection, 1)?;
            create_keyword(connection, &user_feed, "potato");

            let matcher = AlertMatcher::new(&user_feed);

            let first_pass = matcher.new_threads_by_keywords(connection)?;
            assert_eq!(first_pass.len(), 1);

            let ids: Vec<i64> = first_pass.iter().map(|thread| thread.id).collect();
            telegram::add_threads_to_ledger(connection, user_feed.id, &ids, ThreadLedger::Threads)?;

            let second_pass = matcher.new_threads_by_keywords(connection)?;
            assert!(second_pass.is_empty());

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn keyword_comments_come_with_a_per_keyword_breakdown() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            comments::upsert(connection, &build_comment(1, "alice", "new comment with tomato keyword"))?;
            comments::upsert(connection, &build_comment(2, "bob", "new comment with potato keyword"))?;
            let sent = comments::upsert(
                connection,
                &build_comment(3, "carol", "already sent comment with tomato keyword"),
            )?;

            let user_feed = telegram::find_or_create_user_feed(connection, 1)?;
            telegram::add_comments_to_ledger(
                connection,
                user_feed.id,
                &[sent.id],
                CommentLedger::Comments,
            )?;

            create_keyword_with_flags(connection, &user_feed, "tomato", false, true);
            create_keyword(connection, &user_feed, "potato");

            let matcher = AlertMatcher::new(&user_feed);
            let (new_comments, by_keyword) = matcher.new_comments_by_keywords(connection)?;

            assert_eq!(new_comments.len(), 2);
            assert!(new_comments.iter().all(|comment| comment.id != sent.id));

            assert_eq!(by_keyword.len(), 2);
            for (keyword, comments) in &by_keyword {
                assert_eq!(comments.len(), 1, "keyword {}", keyword.name);
            }

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn domain_threads_share_the_ledger_with_keyword_threads() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            let mut thread = build_thread(1, "a potato story");
            thread.link = "https://blog.example.com/post".to_string();
            let thread = threads::upsert(connection, &thread)?;

            let user_feed = telegram::find_or_create_user_feed(connection, 1)?;
            let user_feed =
                telegram::set_domain_names(connection, &user_feed, &["example.com".to_string()])?;
            create_keyword(connection, &user_feed, "potato");

            let matcher = AlertMatcher::new(&user_feed);

            assert_eq!(matcher.new_threads_by_domains(connection)?.len(), 1);

            // delivering it for either reason suppresses the other
            telegram::add_threads_to_ledger(
                connection,
                user_feed.id,
                &[thread.id],
                ThreadLedger::Threads,
            )?;

            assert!(matcher.new_threads_by_domains(connection)?.is_empty());
            assert!(matcher.new_threads_by_keywords(connection)?.is_empty());

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn followed_user_strategies_use_their_own_ledgers() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            let thread = threads::upsert(connection, &build_thread(1, "a story"))?;
            comments::upsert(connection, &build_comment(10, "storyteller", "a comment"))?;

            let user_feed = telegram::find_or_create_user_feed(connection, 1)?;
            telegram::create_followed_user(
                connection,
                NewFollowedUser {
                    user_feed_id: user_feed.id,
                    username: "storyteller".to_string(),
                    follow_threads: true,
                    follow_comments: true,
                },
            )?;

            // the shared keyword/domain ledger does not suppress follows
            telegram::add_threads_to_ledger(
                connection,
                user_feed.id,
                &[thread.id],
                ThreadLedger::Threads,
            )?;

            let matcher = AlertMatcher::new(&user_feed);

            assert_eq!(matcher.new_threads_by_followed_users(connection)?.len(), 1);
            assert_eq!(matcher.new_comments_by_followed_users(connection)?.len(), 1);

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn replies_to_the_configured_username_are_matched() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            let own = comments::upsert(connection, &build_comment(1, "subscriber", "my comment"))?;

            let mut reply = build_comment(2, "alice", "a reply");
            reply.parent_comment_id = Some(own.id);
            let reply = comments::upsert(connection, &reply)?;

            comments::upsert(connection, &build_comment(3, "bob", "unrelated"))?;

            let user_feed = telegram::find_or_create_user_feed(connection, 1)?;

            // nothing is matched until a username is configured
            let matcher = AlertMatcher::new(&user_feed);
            assert!(matcher.new_reply_comments(connection)?.is_empty());

            let user_feed = telegram::set_hn_username(connection, &user_feed, Some("subscriber"))?;
            let matcher = AlertMatcher::new(&user_feed);

            let replies = matcher.new_reply_comments(connection)?;
            assert_eq!(replies.len(), 1);
            assert_eq!(replies[0].id, reply.id);

            Ok(())
        });
    }
}
