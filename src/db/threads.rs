use crate::db;
use crate::db::ThreadLedger;
use crate::models::Thread;
use crate::schema::{delivered_threads, thread_subscriptions, threads};
use chrono::{DateTime, Utc};
use diesel::dsl::not;
use diesel::upsert::excluded;
use diesel::{
    ExpressionMethods, PgConnection, PgTextExpressionMethods, QueryDsl, QueryResult, RunQueryDsl,
};
use typed_builder::TypedBuilder;

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = threads)]
pub struct NewThread {
    pub thread_id: i64,
    pub link: String,
    pub title: String,
    pub creator_username: Option<String>,
    pub score: Option<i32>,
    pub thread_created_at: DateTime<Utc>,
    pub comments_count: Option<i32>,
    pub comments_link: Option<String>,
}

/// Candidate query over stored threads, newest first. Mirrors the
/// `find_threads` operation of the content store interface.
#[derive(TypedBuilder, Debug)]
pub struct ThreadSearch {
    created_after: DateTime<Utc>,
    #[builder(default, setter(strip_option))]
    score_gte: Option<i32>,
    #[builder(default, setter(strip_option, into))]
    title_contains: Option<String>,
    #[builder(default = false)]
    title_whole_word: bool,
    #[builder(default, setter(strip_option, into))]
    link_contains: Option<String>,
    #[builder(default = false)]
    with_comments_link: bool,
    #[builder(default, setter(strip_option, into))]
    creator_username: Option<String>,
}

/// Creates or refreshes a thread keyed by its external id. The stored
/// title is space-padded here, at the ingestion boundary, so every
/// matching path can rely on it.
pub fn upsert(conn: &mut PgConnection, new_thread: &NewThread) -> QueryResult<Thread> {
    let mut record = new_thread.clone();
    record.title = db::pad_for_matching(&record.title);

    diesel::insert_into(threads::table)
        .values(&record)
        .on_conflict(threads::thread_id)
        .do_update()
        .set((
            threads::link.eq(excluded(threads::link)),
            threads::title.eq(excluded(threads::title)),
            threads::creator_username.eq(excluded(threads::creator_username)),
            threads::score.eq(excluded(threads::score)),
            threads::thread_created_at.eq(excluded(threads::thread_created_at)),
            threads::comments_count.eq(excluded(threads::comments_count)),
            threads::comments_link.eq(excluded(threads::comments_link)),
            threads::updated_at.eq(db::current_time()),
        ))
        .get_result(conn)
}

pub fn find(conn: &mut PgConnection, id: i64) -> Option<Thread> {
    match threads::table.filter(threads::id.eq(id)).first::<Thread>(conn) {
        Ok(record) => Some(record),
        _ => None,
    }
}

pub fn find_by_thread_id(conn: &mut PgConnection, thread_id: i64) -> Option<Thread> {
    match threads::table
        .filter(threads::thread_id.eq(thread_id))
        .first::<Thread>(conn)
    {
        Ok(record) => Some(record),
        _ => None,
    }
}

pub fn search(conn: &mut PgConnection, search: &ThreadSearch) -> QueryResult<Vec<Thread>> {
    search_query(search).load(conn)
}

/// Same candidate query minus the feed's delivery ledger. This runs for
/// every feed on every trigger cycle.
pub fn search_undelivered(
    conn: &mut PgConnection,
    search: &ThreadSearch,
    user_feed_id: i64,
    ledger: ThreadLedger,
) -> QueryResult<Vec<Thread>> {
    let delivered = delivered_threads::table
        .filter(delivered_threads::user_feed_id.eq(user_feed_id))
        .filter(delivered_threads::ledger.eq(ledger.as_str()))
        .select(delivered_threads::thread_id);

    search_query(search)
        .filter(not(threads::id.eq_any(delivered)))
        .load(conn)
}

/// Retention pass. Threads pinned by an active subscription are kept so
/// the subscription keeps resolving.
pub fn delete_created_before(conn: &mut PgConnection, cutoff: DateTime<Utc>) -> QueryResult<usize> {
    let subscribed = thread_subscriptions::table.select(thread_subscriptions::thread_id);

    diesel::delete(
        threads::table
            .filter(threads::thread_created_at.lt(cutoff))
            .filter(not(threads::id.eq_any(subscribed))),
    )
    .execute(conn)
}

fn search_query<'a>(search: &ThreadSearch) -> threads::BoxedQuery<'a, diesel::pg::Pg> {
    let mut query = threads::table
        .filter(threads::thread_created_at.ge(search.created_after))
        .order(threads::thread_created_at.desc())
        .into_boxed();

    if let Some(score) = search.score_gte {
        query = query.filter(threads::score.ge(score));
    }

    if let Some(term) = &search.title_contains {
        let pattern = db::containment_pattern(term, search.title_whole_word);
        query = query.filter(threads::title.ilike(pattern));
    }

    if let Some(domain) = &search.link_contains {
        let pattern = format!("%{}%", db::escape_like_pattern(domain));
        query = query.filter(threads::link.ilike(pattern));
    }

    if search.with_comments_link {
        query = query.filter(threads::comments_link.is_not_null());
    }

    if let Some(username) = &search.creator_username {
        query = query.filter(threads::creator_username.eq(username.clone()));
    }

    query
}
