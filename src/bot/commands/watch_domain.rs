use super::Command;
use crate::bot::commands;
use crate::db::telegram;
use crate::models::UserFeed;
use diesel::PgConnection;
use typed_builder::TypedBuilder;

static COMMAND: &str = "/watch";

const ALREADY_WATCHED_RESPONSE: &str = "Fail! Domain is already watched";

#[derive(TypedBuilder)]
pub struct WatchDomain {
    domain: String,
}

impl WatchDomain {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn watch(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        // link matching is case-insensitive, so domains are kept lowercase
        let domain = self.domain.trim().to_lowercase();

        if domain.chars().count() < commands::DOMAIN_MIN_LENGTH {
            return format!(
                "Fail! Domain name must be at least {} characters long",
                commands::DOMAIN_MIN_LENGTH
            );
        }

        if domain.chars().count() > commands::DOMAIN_MAX_LENGTH {
            return format!(
                "Fail! Max domain name length is {} characters",
                commands::DOMAIN_MAX_LENGTH
            );
        }

        if user_feed.domain_names.contains(&domain) {
            return ALREADY_WATCHED_RESPONSE.to_string();
        }

        if user_feed.domain_names.len() >= commands::DOMAINS_LIMIT {
            return format!(
                "Fail! Maximum amount of watched domains is reached ({})",
                commands::DOMAINS_LIMIT
            );
        }

        let mut domain_names = user_feed.domain_names.clone();
        domain_names.push(domain);

        match telegram::set_domain_names(db_connection, user_feed, &domain_names) {
            Ok(updated) => format!(
                "Success! Domain added to the watch list:\n\n{}",
                updated.domain_names.join("\n")
            ),
            Err(_) => commands::STORAGE_ERROR_RESPONSE.to_string(),
        }
    }
}

impl Command for WatchDomain {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String {
        self.watch(db_connection, user_feed)
    }
}

#[cfg(test)]
mod tests {
    use super::WatchDomain;
    use crate::bot::commands::Command;
    use crate::db;
    use crate::db::telegram;
    use diesel::connection::Connection;
    use diesel::result::Error;

    fn watch(connection: &mut diesel::PgConnection, chat_id: i64, domain: &str) -> String {
        let user_feed = telegram::find_or_create_user_feed(connection, chat_id).unwrap();

        WatchDomain::builder()
            .domain(domain.to_string())
            .build()
            .response(connection, &user_feed)
    }

    #[test]
    #[ignore = "requires a database"]
    fn the_sixth_domain_is_rejected_and_the_list_stays_at_five() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            for i in 0..5 {
                let response = watch(connection, 1, &format!("domain{i}.com"));
                assert!(response.starts_with("Success!"), "{response}");
            }

            let response = watch(connection, 1, "domain5.com");
            assert_eq!(
                response,
                "Fail! Maximum amount of watched domains is reached (5)"
            );

            let user_feed = telegram::find_user_feed(connection, 1).unwrap();
            assert_eq!(user_feed.domain_names.len(), 5);

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn watching_the_same_domain_twice_fails() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            watch(connection, 1, "example.com");
            let response = watch(connection, 1, "Example.com");

            assert_eq!(response, "Fail! Domain is already watched");

            Ok(())
        });
    }

    #[test]
    #[ignore = "requires a database"]
    fn domain_length_bounds_are_validated() {
        let mut connection = db::establish_connection();

        connection.test_transaction::<(), Error, _>(|connection| {
            let response = watch(connection, 1, "ab");
            assert_eq!(
                response,
                "Fail! Domain name must be at least 3 characters long"
            );

            let response = watch(connection, 1, &"x".repeat(244));
            assert_eq!(response, "Fail! Max domain name length is 243 characters");

            Ok(())
        });
    }
}
