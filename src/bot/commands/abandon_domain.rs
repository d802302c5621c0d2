use super::Command;
use crate::bot::commands;
use crate::db::telegram;
use crate::models::UserFeed;
use diesel::PgConnection;
use typed_builder::TypedBuilder;

static COMMAND: &str = "/abandon";

const NO_DOMAINS_RESPONSE: &str = "Fail! Watch a domain first. /help for info";
const NOT_FOUND_RESPONSE: &str = "Fail! Domain not found in the watch list";
const LAST_REMOVED_RESPONSE: &str = "Success! Last watched domain removed";

#[derive(TypedBuilder)]
pub struct AbandonDomain {
    domain: String,
}

impl AbandonDomain {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn abandon(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        let domain = self.domain.trim().to_lowercase();

        if user_feed.domain_names.is_empty() {
            return NO_DOMAINS_RESPONSE.to_string();
        }

        if !user_feed.domain_names.contains(&domain) {
            return NOT_FOUND_RESPONSE.to_string();
        }

        let domain_names: Vec<String> = user_feed
            .domain_names
            .iter()
            .filter(|name| *name != &domain)
            .cloned()
            .collect();

        match telegram::set_domain_names(db_connection, user_feed, &domain_names) {
            Ok(updated) => {
                if updated.domain_names.is_empty() {
                    LAST_REMOVED_RESPONSE.to_string()
                } else {
                    format!(
                        "Success! Domain removed from the watch list:\n\n{}",
                        updated.domain_names.join("\n")
                    )
                }
            }
            Err(_) => commands::STORAGE_ERROR_RESPONSE.to_string(),
        }
    }
}

impl Command for AbandonDomain {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        self.abandon(db_connection, user_feed)
    }
}
