use crate::db;
use crate::db::CommentLedger;
use crate::models::Comment;
use crate::schema::{comments, delivered_comments};
use chrono::{DateTime, Utc};
use diesel::dsl::not;
use diesel::upsert::excluded;
use diesel::{
    ExpressionMethods, PgConnection, PgTextExpressionMethods, QueryDsl, QueryResult, RunQueryDsl,
};
use typed_builder::TypedBuilder;

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = comments)]
pub struct NewComment {
    pub comment_id: i64,
    pub thread_id_int: i64,
    pub parent_comment_id: Option<i64>,
    pub username: String,
    pub body: String,
    pub comment_created_at: DateTime<Utc>,
}

/// Candidate query over stored comments, newest first. Mirrors the
/// `find_comments` operation of the content store interface. The time
/// window is optional: subscription matching scans the whole thread and
/// relies on the snapshot taken at subscribe time instead.
#[derive(TypedBuilder, Debug)]
pub struct CommentSearch {
    #[builder(default, setter(strip_option))]
    created_after: Option<DateTime<Utc>>,
    #[builder(default, setter(strip_option, into))]
    body_contains: Option<String>,
    #[builder(default = false)]
    body_whole_word: bool,
    #[builder(default, setter(strip_option))]
    thread_id_int: Option<i64>,
    #[builder(default, setter(strip_option, into))]
    username: Option<String>,
    #[builder(default, setter(strip_option))]
    parent_comment_id_in: Option<Vec<i64>>,
}

/// Creates or refreshes a comment keyed by its external id, padding the
/// stored body for whole-word matching.
pub fn upsert(conn: &mut PgConnection, new_comment: &NewComment) -> QueryResult<Comment> {
    let mut record = new_comment.clone();
    record.body = db::pad_for_matching(&record.body);

    diesel::insert_into(comments::table)
        .values(&record)
        .on_conflict(comments::comment_id)
        .do_update()
        .set((
            comments::thread_id_int.eq(excluded(comments::thread_id_int)),
            comments::parent_comment_id.eq(excluded(comments::parent_comment_id)),
            comments::username.eq(excluded(comments::username)),
            comments::body.eq(excluded(comments::body)),
            comments::comment_created_at.eq(excluded(comments::comment_created_at)),
            comments::updated_at.eq(db::current_time()),
        ))
        .get_result(conn)
}

pub fn find_by_comment_id(conn: &mut PgConnection, comment_id: i64) -> Option<Comment> {
    match comments::table
        .filter(comments::comment_id.eq(comment_id))
        .first::<Comment>(conn)
    {
        Ok(record) => Some(record),
        _ => None,
    }
}

pub fn search(conn: &mut PgConnection, search: &CommentSearch) -> QueryResult<Vec<Comment>> {
    search_query(search).load(conn)
}

pub fn search_undelivered(
    conn: &mut PgConnection,
    search: &CommentSearch,
    user_feed_id: i64,
    ledger: CommentLedger,
) -> QueryResult<Vec<Comment>> {
    let delivered = delivered_comments::table
        .filter(delivered_comments::user_feed_id.eq(user_feed_id))
        .filter(delivered_comments::ledger.eq(ledger.as_str()))
        .select(delivered_comments::comment_id);

    search_query(search)
        .filter(not(comments::id.eq_any(delivered)))
        .load(conn)
}

/// Internal ids of every comment written by `username`. Used to resolve
/// reply notifications without a self-join.
pub fn ids_by_author(conn: &mut PgConnection, username: &str) -> QueryResult<Vec<i64>> {
    comments::table
        .filter(comments::username.eq(username))
        .select(comments::id)
        .load(conn)
}

pub fn delete_created_before(conn: &mut PgConnection, cutoff: DateTime<Utc>) -> QueryResult<usize> {
    diesel::delete(comments::table.filter(comments::comment_created_at.lt(cutoff))).execute(conn)
}

fn search_query<'a>(search: &CommentSearch) -> comments::BoxedQuery<'a, diesel::pg::Pg> {
    let mut query = comments::table
        .order(comments::comment_created_at.desc())
        .into_boxed();

    if let Some(created_after) = search.created_after {
        query = query.filter(comments::comment_created_at.ge(created_after));
    }

    if let Some(term) = &search.body_contains {
        let pattern = db::containment_pattern(term, search.body_whole_word);
        query = query.filter(comments::body.ilike(pattern));
    }

    if let Some(thread_id_int) = search.thread_id_int {
        query = query.filter(comments::thread_id_int.eq(thread_id_int));
    }

    if let Some(username) = &search.username {
        query = query.filter(comments::username.eq(username.clone()));
    }

    if let Some(parent_ids) = &search.parent_comment_id_in {
        let parents: Vec<Option<i64>> = parent_ids.iter().map(|id| Some(*id)).collect();
        query = query.filter(comments::parent_comment_id.eq_any(parents));
    }

    query
}

#[cfg(test)]
mod tests {
    use super::CommentSearch;
    use super::NewComment;
    use crate::db;
    use crate::db::telegram;
    use crate::db::CommentLedger;
    use chrono::Duration;
    use diesel::connection::Connection;
    use diesel::result::Error;

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

    #[test]
    #[ignore = "requires a database"]
    fn upsert_pads_the_stored_body() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            let comment = super::upsert(connection, &build_comment(7, "alice", "nice widget"))?;

            assert_eq!(comment.body, " nice widget ");
            assert_eq!(comment.display_body(), "nice widget");

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn search_filters_by_body_author_and_parent() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            let parent = super::upsert(connection, &build_comment(1, "alice", "parent text"))?;

            let mut reply = build_comment(2, "bob", "a reply about potato");
            reply.parent_comment_id = Some(parent.id);
            super::upsert(connection, &reply)?;

            super::upsert(connection, &build_comment(3, "carol", "unrelated potato talk"))?;

            let by_parent = CommentSearch::builder()
                .parent_comment_id_in(vec![parent.id])
                .build();
            let found = super::search(connection, &by_parent)?;
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].comment_id, 2);

            let by_author = CommentSearch::builder().username("carol").build();
            let found = super::search(connection, &by_author)?;
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].comment_id, 3);

            let by_body = CommentSearch::builder()
                .created_after(db::current_time() - Duration::hours(24))
                .body_contains("potato")
                .build();
            let found = super::search(connection, &by_body)?;
            assert_eq!(found.len(), 2);

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn search_undelivered_subtracts_only_the_requested_ledger() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            let comment = super::upsert(connection, &build_comment(1, "alice", "tomato talk"))?;

            let feed = telegram::find_or_create_user_feed(connection, 42)?;
            telegram::add_comments_to_ledger(
                connection,
                feed.id,
                &[comment.id],
                CommentLedger::Comments,
            )?;

            let search = CommentSearch::builder().body_contains("tomato").build();

            let keyword_new = super::search_undelivered(
                connection,
                &search,
                feed.id,
                CommentLedger::Comments,
            )?;
            assert!(keyword_new.is_empty());

            // the same comment is still fresh on a different ledger
            let reply_new = super::search_undelivered(
                connection,
                &search,
                feed.id,
                CommentLedger::ReplyComments,
            )?;
            assert_eq!(reply_new.len(), 1);

            Ok(())
        });
    }
}
