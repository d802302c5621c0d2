use crate::config::Config;
use crate::db;
use crate::db::{comments, threads};
use chrono::Duration;
use diesel::PgConnection;
use fang::typetag;
use fang::FangError;
use fang::Queueable;
use fang::Runnable;
use fang::Scheduled;
use serde::{Deserialize, Serialize};

/// Retention pass over scraped content. The retention cutoff must stay
/// well outside the 24-hour matching window.
#[derive(Serialize, Deserialize)]
pub struct CleanContentJob {}

impl Default for CleanContentJob {
    fn default() -> Self {
        Self::new()
    }
}

impl CleanContentJob {
    pub fn new() -> Self {
        CleanContentJob {}
    }

    pub fn clean(&self, db_connection: &mut PgConnection) -> Result<(), FangError> {
        let cutoff = db::current_time() - Duration::days(Config::content_retention_days());

        // comments go first so parent references are cleared before their
        // threads disappear
        let removed_comments = comments::delete_created_before(db_connection, cutoff)
            .map_err(|error| FangError {
                description: format!("Failed to delete old comments: {error:?}"),
            })?;

        let removed_threads =
            threads::delete_created_before(db_connection, cutoff).map_err(|error| FangError {
                description: format!("Failed to delete old threads: {error:?}"),
            })?;

        log::info!(
            "Removed {} comments and {} threads older than {:?}",
            removed_comments,
            removed_threads,
            cutoff
        );

        Ok(())
    }
}

#[typetag::serde]
impl Runnable for CleanContentJob {
    fn run(&self, _queue: &dyn Queueable) -> Result<(), FangError> {
        let mut db_connection = crate::db::pool().get()?;

        self.clean(&mut db_connection)
    }

    fn cron(&self) -> Option<Scheduled> {
        Some(Scheduled::CronPattern(Config::clean_cron_pattern()))
    }

    fn uniq(&self) -> bool {
        true
    }

    fn task_type(&self) -> String {
        super::JOB_TYPE.to_string()
    }
}
