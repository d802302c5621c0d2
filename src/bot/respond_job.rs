use crate::bot::commands::abandon_domain::AbandonDomain;
use crate::bot::commands::add_keyword::AddKeyword;
use crate::bot::commands::contacts::Contacts;
use crate::bot::commands::disable_notify::DisableNotify;
use crate::bot::commands::follow_user::FollowUser;
use crate::bot::commands::help::Help;
use crate::bot::commands::list_commands::ListCommands;
use crate::bot::commands::list_domains::ListDomains;
use crate::bot::commands::list_followed_users::ListFollowedUsers;
use crate::bot::commands::list_keywords::ListKeywords;
use crate::bot::commands::list_subscriptions::ListSubscriptions;
use crate::bot::commands::remove_keyword::RemoveKeyword;
use crate::bot::commands::set_notify_username::SetNotifyUsername;
use crate::bot::commands::set_score::SetScore;
use crate::bot::commands::stop::Stop;
use crate::bot::commands::subscribe::Subscribe;
use crate::bot::commands::unfollow_user::UnfollowUser;
use crate::bot::commands::unknown_command::UnknownCommand;
use crate::bot::commands::unsubscribe::Unsubscribe;
use crate::bot::commands::watch_domain::WatchDomain;
use crate::bot::commands::{self, BotCommand, Command};
use crate::bot::telegram_client;
use crate::bot::telegram_client::{Api, SimpleMessageParams};
use crate::config::Config;
use crate::db;
use crate::db::telegram;
use crate::db::telegram::NewTelegramUpdate;
use crate::models::TelegramUpdate;
use chrono::DateTime;
use diesel::PgConnection;
use fang::typetag;
use fang::FangError;
use fang::Queueable;
use fang::Runnable;
use fang::Scheduled;
use frankenstein::{Update, UpdateContent};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

pub const JOB_TYPE: &str = "respond";

const SEND_DELAY: Duration = Duration::from_millis(40);

/// Periodic trigger: fetch pending inbound messages, persist them, run
/// each through the command grammar and reply.
#[derive(Serialize, Deserialize)]
pub struct RespondJob {}

impl Default for RespondJob {
    fn default() -> Self {
        Self::new()
    }
}

impl RespondJob {
    pub fn new() -> Self {
        RespondJob {}
    }

    pub fn respond(&self, db_connection: &mut PgConnection, api: &Api) -> Result<(), FangError> {
        let offset = match telegram::last_update_id(db_connection) {
            Ok(last_update_id) => last_update_id.map(|update_id| update_id + 1),
            Err(error) => {
                let description = format!("Failed to read the update offset: {error:?}");

                return Err(FangError { description });
            }
        };

        let updates = api.fetch_pending_updates(offset)?;

        for update in updates {
            let new_update = match new_telegram_update(&update) {
                Some(new_update) => new_update,
                None => continue,
            };

            // persisted before responding, so the offset advances even if
            // the reply fails
            let record = match telegram::create_telegram_update(db_connection, new_update) {
                Ok(record) => record,
                Err(error) => {
                    let description = format!("Failed to persist an update: {error:?}");

                    return Err(FangError { description });
                }
            };

            if record.text.trim().is_empty() {
                continue;
            }

            let command = BotCommand::from_str(&record.text).unwrap();
            let response = self.respond_to_update(db_connection, &command, &record);

            // only the help text carries markdown
            let markdown = command == BotCommand::Help;

            let message_params = SimpleMessageParams::builder()
                .chat_id(record.chat_id)
                .message(response)
                .markdown(markdown)
                .preview_enabled(!markdown)
                .build();

            if let Err(error) = api.send_message_to_chat(&message_params) {
                log::error!("Failed to reply to chat {}: {:?}", record.chat_id, error);
            }

            std::thread::sleep(SEND_DELAY);
        }

        Ok(())
    }

    fn respond_to_update(
        &self,
        db_connection: &mut PgConnection,
        command: &BotCommand,
        update: &TelegramUpdate,
    ) -> String {
        log::info!("{} wrote: {}", update.chat_id, update.text);

        // every command operates on a materialized feed, Undefined included
        let user_feed = match telegram::find_or_create_user_feed(db_connection, update.chat_id) {
            Ok(user_feed) => user_feed,
            Err(error) => {
                log::error!("Failed to materialize a feed: {error:?}");

                return commands::STORAGE_ERROR_RESPONSE.to_string();
            }
        };

        match command.clone() {
            BotCommand::Help => Help {}.response(db_connection, &user_feed),
            BotCommand::ListCommands => ListCommands {}.response(db_connection, &user_feed),
            BotCommand::Contacts => Contacts {}.response(db_connection, &user_feed),
            BotCommand::ListKeywords => ListKeywords {}.response(db_connection, &user_feed),
            BotCommand::AddKeyword(args) => AddKeyword::builder()
                .args(args)
                .build()
                .response(db_connection, &user_feed),
            BotCommand::RemoveKeyword(args) => RemoveKeyword::builder()
                .args(args)
                .build()
                .response(db_connection, &user_feed),
            BotCommand::SetScore(score) => SetScore::builder()
                .score(score)
                .build()
                .response(db_connection, &user_feed),
            BotCommand::Stop => Stop {}.response(db_connection, &user_feed),
            BotCommand::Subscribe(thread_id) => Subscribe::builder()
                .thread_id(thread_id)
                .build()
                .response(db_connection, &user_feed),
            BotCommand::Unsubscribe(thread_id) => Unsubscribe::builder()
                .thread_id(thread_id)
                .build()
                .response(db_connection, &user_feed),
            BotCommand::ListSubscriptions => {
                ListSubscriptions {}.response(db_connection, &user_feed)
            }
            BotCommand::ListFollowedUsers => {
                ListFollowedUsers {}.response(db_connection, &user_feed)
            }
            BotCommand::FollowUser(args) => FollowUser::builder()
                .args(args)
                .build()
                .response(db_connection, &user_feed),
            BotCommand::UnfollowUser(args) => UnfollowUser::builder()
                .args(args)
                .build()
                .response(db_connection, &user_feed),
            BotCommand::WatchDomain(domain) => WatchDomain::builder()
                .domain(domain)
                .build()
                .response(db_connection, &user_feed),
            BotCommand::AbandonDomain(domain) => AbandonDomain::builder()
                .domain(domain)
                .build()
                .response(db_connection, &user_feed),
            BotCommand::ListDomains => ListDomains {}.response(db_connection, &user_feed),
            BotCommand::SetNotifyUsername(username) => SetNotifyUsername::builder()
                .username(username)
                .build()
                .response(db_connection, &user_feed),
            BotCommand::DisableNotify => DisableNotify {}.response(db_connection, &user_feed),
            BotCommand::Undefined => UnknownCommand {}.response(db_connection, &user_feed),
        }
    }
}

fn new_telegram_update(update: &Update) -> Option<NewTelegramUpdate> {
    let message = match &update.content {
        UpdateContent::Message(message) => message,
        _ => return None,
    };

    let date = DateTime::from_timestamp(message.date as i64, 0).unwrap_or_else(db::current_time);

    Some(NewTelegramUpdate {
        update_id: update.update_id.into(),
        chat_id: message.chat.id,
        date,
        text: message.text.clone().unwrap_or_default(),
    })
}

#[typetag::serde]
impl Runnable for RespondJob {
    fn run(&self, _queue: &dyn Queueable) -> Result<(), FangError> {
        let mut db_connection = crate::db::pool().get()?;

        self.respond(&mut db_connection, telegram_client::api())
    }

    fn cron(&self) -> Option<Scheduled> {
        Some(Scheduled::CronPattern(Config::respond_cron_pattern()))
    }

    fn uniq(&self) -> bool {
        true
    }

    fn task_type(&self) -> String {
        JOB_TYPE.to_string()
    }
}
