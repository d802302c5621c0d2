pub mod commands;
pub mod respond_job;
pub mod telegram_client;

pub use respond_job::RespondJob;
