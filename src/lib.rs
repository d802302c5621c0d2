#[macro_use]
extern crate diesel;

pub mod bot;
pub mod cleaner;
pub mod config;
pub mod db;
pub mod deliver;
pub mod http_client;
pub mod models;
pub mod schema;

pub use config::Config;
