use crate::config::Config;
use chrono::prelude::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use diesel::r2d2::Pool;
use diesel::Connection;
use std::sync::OnceLock;

pub mod comments;
pub mod telegram;
pub mod threads;

static POOL: OnceLock<Pool<ConnectionManager<PgConnection>>> = OnceLock::new();

pub fn pool() -> &'static Pool<ConnectionManager<PgConnection>> {
    POOL.get_or_init(init_pool)
}

fn init_pool() -> Pool<ConnectionManager<PgConnection>> {
    let manager = ConnectionManager::<PgConnection>::new(Config::database_url());

    Pool::builder()
        .max_size(Config::database_pool_size())
        .build(manager)
        .expect("Failed to create a connection pool")
}

pub fn establish_connection() -> PgConnection {
    PgConnection::establish(&Config::database_url()).expect("Error connecting to the database")
}

pub fn current_time() -> DateTime<Utc> {
    Utc::now()
}

/// Ledgers of threads already delivered to a feed. Keyword and domain
/// matches share `Threads` on purpose: a story matching both reasons is
/// delivered once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadLedger {
    Threads,
    FollowedUserThreads,
}

impl ThreadLedger {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadLedger::Threads => "threads",
            ThreadLedger::FollowedUserThreads => "followed_user_threads",
        }
    }
}

/// Ledgers of comments already delivered to a feed, one per matching
/// strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentLedger {
    Comments,
    SubscriptionComments,
    ReplyComments,
    FollowedUserComments,
}

impl CommentLedger {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentLedger::Comments => "comments",
            CommentLedger::SubscriptionComments => "subscription_comments",
            CommentLedger::ReplyComments => "reply_comments",
            CommentLedger::FollowedUserComments => "followed_user_comments",
        }
    }
}

/// Pads text with one space on each side. Titles and bodies are stored
/// this way so a whole-word keyword can be matched as containment of
/// `" keyword "`, start and end of text included.
pub fn pad_for_matching(text: &str) -> String {
    format!(" {} ", text.trim())
}

pub(crate) fn escape_like_pattern(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Builds the ILIKE pattern for a keyword: plain containment, or
/// containment of the space-delimited word when `whole_word` is set.
pub fn containment_pattern(term: &str, whole_word: bool) -> String {
    let escaped = escape_like_pattern(term);

    if whole_word {
        format!("% {escaped} %")
    } else {
        format!("%{escaped}%")
    }
}

#[cfg(test)]
mod tests {
    use super::containment_pattern;
    use super::escape_like_pattern;
    use super::pad_for_matching;

    #[test]
    fn pad_for_matching_pads_with_single_spaces() {
        assert_eq!(pad_for_matching("Show HN: Widget"), " Show HN: Widget ");
    }

    #[test]
    fn pad_for_matching_is_idempotent() {
        let padded = pad_for_matching("a title");

        assert_eq!(pad_for_matching(&padded), padded);
    }

    #[test]
    fn escape_like_pattern_escapes_wildcards() {
        assert_eq!(escape_like_pattern("100%_sure"), "100\\%\\_sure");
        assert_eq!(escape_like_pattern("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn containment_pattern_for_substring_match() {
        assert_eq!(containment_pattern("potato", false), "%potato%");
    }

    #[test]
    fn containment_pattern_for_whole_word_match() {
        assert_eq!(containment_pattern("potato", true), "% potato %");
    }
}
