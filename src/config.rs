use std::env;
use std::fmt::Debug;
use std::str::FromStr;

pub struct Config;

impl Config {
    pub fn database_url() -> String {
        env::var("DATABASE_URL").expect("DATABASE_URL must be set")
    }

    pub fn database_pool_size() -> u32 {
        Self::read_var_with_default("DATABASE_POOL_SIZE", "5")
    }

    pub fn telegram_bot_token() -> String {
        env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN must be set")
    }

    pub fn telegram_base_url() -> String {
        env::var("TELEGRAM_BASE_URL")
            .unwrap_or_else(|_| "https://api.telegram.org/bot".to_string())
    }

    pub fn hackernews_url() -> String {
        env::var("HACKERNEWS_URL").unwrap_or_else(|_| "https://news.ycombinator.com/".to_string())
    }

    pub fn request_timeout_in_seconds() -> u64 {
        Self::read_var_with_default("REQUEST_TIMEOUT_IN_SECONDS", "10")
    }

    pub fn alerts_cron_pattern() -> String {
        env::var("ALERTS_CRON_PATTERN").unwrap_or_else(|_| "0 * * * * *".to_string())
    }

    pub fn respond_cron_pattern() -> String {
        env::var("RESPOND_CRON_PATTERN").unwrap_or_else(|_| "*/10 * * * * *".to_string())
    }

    pub fn clean_cron_pattern() -> String {
        env::var("CLEAN_CRON_PATTERN").unwrap_or_else(|_| "0 0 2 * * *".to_string())
    }

    pub fn content_retention_days() -> i64 {
        Self::read_var_with_default("CONTENT_RETENTION_DAYS", "30")
    }

    pub fn deliver_workers_number() -> u32 {
        Self::read_var_with_default("DELIVER_WORKERS_NUMBER", "1")
    }

    pub fn respond_workers_number() -> u32 {
        Self::read_var_with_default("RESPOND_WORKERS_NUMBER", "1")
    }

    pub fn clean_workers_number() -> u32 {
        Self::read_var_with_default("CLEAN_WORKERS_NUMBER", "1")
    }

    fn read_var_with_default<T: FromStr>(name: &str, default_value: &str) -> T
    where
        <T as FromStr>::Err: Debug,
    {
        let value = env::var(name).unwrap_or_else(|_| default_value.to_string());

        value
            .parse()
            .unwrap_or_else(|_| panic!("{name} can not be parsed"))
    }
}
