use crate::db;
use crate::db::{CommentLedger, ThreadLedger};
use crate::models::{FollowedUser, Keyword, TelegramUpdate, ThreadSubscription, UserFeed};
use crate::schema::{
    delivered_comments, delivered_threads, followed_users, keywords, telegram_updates,
    thread_subscriptions, user_feeds,
};
use chrono::{DateTime, Utc};
use diesel::dsl::max;
use diesel::{ExpressionMethods, PgConnection, QueryDsl, QueryResult, RunQueryDsl};

#[derive(Insertable, Clone, Copy)]
#[diesel(table_name = user_feeds)]
struct NewUserFeed {
    chat_id: i64,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = keywords)]
pub struct NewKeyword {
    pub user_feed_id: i64,
    pub name: String,
    pub is_full_match: bool,
    pub search_threads: bool,
    pub search_comments: bool,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = followed_users)]
pub struct NewFollowedUser {
    pub user_feed_id: i64,
    pub username: String,
    pub follow_threads: bool,
    pub follow_comments: bool,
}

#[derive(Insertable, Clone, Copy)]
#[diesel(table_name = thread_subscriptions)]
pub struct NewThreadSubscription {
    pub user_feed_id: i64,
    pub thread_id: i64,
}

#[derive(Insertable, Clone)]
#[diesel(table_name = telegram_updates)]
pub struct NewTelegramUpdate {
    pub update_id: i64,
    pub chat_id: i64,
    pub date: DateTime<Utc>,
    pub text: String,
}

#[derive(Insertable)]
#[diesel(table_name = delivered_threads)]
struct DeliveredThread<'a> {
    user_feed_id: i64,
    thread_id: i64,
    ledger: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = delivered_comments)]
struct DeliveredComment<'a> {
    user_feed_id: i64,
    comment_id: i64,
    ledger: &'a str,
}

/// Upsert-then-return in one statement: every inbound command materializes
/// a feed for its chat, and concurrent callers resolve to the same row.
pub fn find_or_create_user_feed(conn: &mut PgConnection, chat_id: i64) -> QueryResult<UserFeed> {
    diesel::insert_into(user_feeds::table)
        .values(NewUserFeed { chat_id })
        .on_conflict(user_feeds::chat_id)
        .do_update()
        .set(user_feeds::updated_at.eq(db::current_time()))
        .get_result::<UserFeed>(conn)
}

pub fn find_user_feed(conn: &mut PgConnection, chat_id: i64) -> Option<UserFeed> {
    match user_feeds::table
        .filter(user_feeds::chat_id.eq(chat_id))
        .first::<UserFeed>(conn)
    {
        Ok(record) => Some(record),
        _ => None,
    }
}

pub fn fetch_user_feeds(conn: &mut PgConnection) -> QueryResult<Vec<UserFeed>> {
    user_feeds::table.order(user_feeds::id).get_results(conn)
}

/// The sole deletion path: the stop command. Keywords, follows,
/// subscription and ledgers go with the feed through cascades.
pub fn delete_user_feed(conn: &mut PgConnection, user_feed: &UserFeed) -> QueryResult<usize> {
    diesel::delete(user_feeds::table.filter(user_feeds::id.eq(user_feed.id))).execute(conn)
}

pub fn set_score_threshold(
    conn: &mut PgConnection,
    user_feed: &UserFeed,
    score_threshold: i32,
) -> QueryResult<UserFeed> {
    diesel::update(user_feed)
        .set((
            user_feeds::score_threshold.eq(score_threshold),
            user_feeds::updated_at.eq(db::current_time()),
        ))
        .get_result::<UserFeed>(conn)
}

pub fn set_domain_names(
    conn: &mut PgConnection,
    user_feed: &UserFeed,
    domain_names: &[String],
) -> QueryResult<UserFeed> {
    diesel::update(user_feed)
        .set((
            user_feeds::domain_names.eq(domain_names),
            user_feeds::updated_at.eq(db::current_time()),
        ))
        .get_result::<UserFeed>(conn)
}

pub fn set_hn_username(
    conn: &mut PgConnection,
    user_feed: &UserFeed,
    hn_username: Option<&str>,
) -> QueryResult<UserFeed> {
    diesel::update(user_feed)
        .set((
            user_feeds::hn_username.eq(hn_username),
            user_feeds::updated_at.eq(db::current_time()),
        ))
        .get_result::<UserFeed>(conn)
}

pub fn create_keyword(conn: &mut PgConnection, new_keyword: NewKeyword) -> QueryResult<Keyword> {
    diesel::insert_into(keywords::table)
        .values(new_keyword)
        .get_result::<Keyword>(conn)
}

pub fn find_keywords(conn: &mut PgConnection, user_feed_id: i64) -> QueryResult<Vec<Keyword>> {
    keywords::table
        .filter(keywords::user_feed_id.eq(user_feed_id))
        .order(keywords::name)
        .get_results(conn)
}

pub fn find_keyword(conn: &mut PgConnection, user_feed_id: i64, name: &str) -> Option<Keyword> {
    match keywords::table
        .filter(keywords::user_feed_id.eq(user_feed_id))
        .filter(keywords::name.eq(name))
        .first::<Keyword>(conn)
    {
        Ok(record) => Some(record),
        _ => None,
    }
}

pub fn remove_keyword(
    conn: &mut PgConnection,
    user_feed_id: i64,
    name: &str,
) -> QueryResult<usize> {
    diesel::delete(
        keywords::table
            .filter(keywords::user_feed_id.eq(user_feed_id))
            .filter(keywords::name.eq(name)),
    )
    .execute(conn)
}

pub fn count_keywords(conn: &mut PgConnection, user_feed_id: i64) -> i64 {
    keywords::table
        .filter(keywords::user_feed_id.eq(user_feed_id))
        .count()
        .get_result::<i64>(conn)
        .unwrap_or(0)
}

pub fn create_followed_user(
    conn: &mut PgConnection,
    new_followed_user: NewFollowedUser,
) -> QueryResult<FollowedUser> {
    diesel::insert_into(followed_users::table)
        .values(new_followed_user)
        .get_result::<FollowedUser>(conn)
}

pub fn find_followed_users(
    conn: &mut PgConnection,
    user_feed_id: i64,
) -> QueryResult<Vec<FollowedUser>> {
    followed_users::table
        .filter(followed_users::user_feed_id.eq(user_feed_id))
        .order(followed_users::username)
        .get_results(conn)
}

pub fn find_followed_user(
    conn: &mut PgConnection,
    user_feed_id: i64,
    username: &str,
) -> Option<FollowedUser> {
    match followed_users::table
        .filter(followed_users::user_feed_id.eq(user_feed_id))
        .filter(followed_users::username.eq(username))
        .first::<FollowedUser>(conn)
    {
        Ok(record) => Some(record),
        _ => None,
    }
}

pub fn remove_followed_user(
    conn: &mut PgConnection,
    user_feed_id: i64,
    username: &str,
) -> QueryResult<usize> {
    diesel::delete(
        followed_users::table
            .filter(followed_users::user_feed_id.eq(user_feed_id))
            .filter(followed_users::username.eq(username)),
    )
    .execute(conn)
}

pub fn create_subscription(
    conn: &mut PgConnection,
    subscription: NewThreadSubscription,
) -> QueryResult<ThreadSubscription> {
    diesel::insert_into(thread_subscriptions::table)
        .values(subscription)
        .get_result::<ThreadSubscription>(conn)
}

pub fn find_subscription(conn: &mut PgConnection, user_feed_id: i64) -> Option<ThreadSubscription> {
    match thread_subscriptions::table
        .filter(thread_subscriptions::user_feed_id.eq(user_feed_id))
        .first::<ThreadSubscription>(conn)
    {
        Ok(record) => Some(record),
        _ => None,
    }
}

pub fn remove_subscription(conn: &mut PgConnection, user_feed_id: i64) -> QueryResult<usize> {
    diesel::delete(
        thread_subscriptions::table.filter(thread_subscriptions::user_feed_id.eq(user_feed_id)),
    )
    .execute(conn)
}

/// Appends to a thread delivery ledger. Re-adding an already present item
/// is a no-op, which keeps the ledgers monotonically growing sets.
pub fn add_threads_to_ledger(
    conn: &mut PgConnection,
    user_feed_id: i64,
    thread_ids: &[i64],
    ledger: ThreadLedger,
) -> QueryResult<usize> {
    let records: Vec<DeliveredThread> = thread_ids
        .iter()
        .map(|thread_id| DeliveredThread {
            user_feed_id,
            thread_id: *thread_id,
            ledger: ledger.as_str(),
        })
        .collect();

    diesel::insert_into(delivered_threads::table)
        .values(records)
        .on_conflict_do_nothing()
        .execute(conn)
}

pub fn add_comments_to_ledger(
    conn: &mut PgConnection,
    user_feed_id: i64,
    comment_ids: &[i64],
    ledger: CommentLedger,
) -> QueryResult<usize> {
    let records: Vec<DeliveredComment> = comment_ids
        .iter()
        .map(|comment_id| DeliveredComment {
            user_feed_id,
            comment_id: *comment_id,
            ledger: ledger.as_str(),
        })
        .collect();

    diesel::insert_into(delivered_comments::table)
        .values(records)
        .on_conflict_do_nothing()
        .execute(conn)
}

pub fn create_telegram_update(
    conn: &mut PgConnection,
    new_update: NewTelegramUpdate,
) -> QueryResult<TelegramUpdate> {
    diesel::insert_into(telegram_updates::table)
        .values(new_update)
        .get_result::<TelegramUpdate>(conn)
}

/// The highest persisted update id, used to derive the next poll offset.
pub fn last_update_id(conn: &mut PgConnection) -> QueryResult<Option<i64>> {
    telegram_updates::table
        .select(max(telegram_updates::update_id))
        .first::<Option<i64>>(conn)
}
