use super::Command;
use crate::bot::commands;
use crate::db::telegram;
use crate::models::UserFeed;
use diesel::PgConnection;
use typed_builder::TypedBuilder;

static COMMAND: &str = "/set_score";

/// Overwrites the threshold with whatever integer the parser accepted; no
/// bounds are enforced at this layer.
#[derive(TypedBuilder)]
pub struct SetScore {
    score: i32,
}

impl SetScore {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for SetScore {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        match telegram::set_score_threshold(db_connection, user_feed, self.score) {
            Ok(updated) => format!("Success! Score threshold set to {}", updated.score_threshold),
            Err(_) => commands::STORAGE_ERROR_RESPONSE.to_string(),
        }
    }
}
