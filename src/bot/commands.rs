use crate::models::{FollowedUser, Keyword, UserFeed};
use diesel::PgConnection;
use std::str::FromStr;

pub mod abandon_domain;
pub mod add_keyword;
pub mod contacts;
pub mod disable_notify;
pub mod follow_user;
pub mod help;
pub mod list_commands;
pub mod list_domains;
pub mod list_followed_users;
pub mod list_keywords;
pub mod list_subscriptions;
pub mod remove_keyword;
pub mod set_notify_username;
pub mod set_score;
pub mod stop;
pub mod subscribe;
pub mod unfollow_user;
pub mod unknown_command;
pub mod unsubscribe;
pub mod watch_domain;

pub const KEYWORDS_LIMIT: usize = 50;
pub const KEYWORD_MIN_LENGTH: usize = 2;
pub const KEYWORD_MAX_LENGTH: usize = 100;
pub const USERNAME_MIN_LENGTH: usize = 2;
pub const USERNAME_MAX_LENGTH: usize = 15;
pub const DOMAINS_LIMIT: usize = 5;
pub const DOMAIN_MIN_LENGTH: usize = 3;
pub const DOMAIN_MAX_LENGTH: usize = 243;

pub const STORAGE_ERROR_RESPONSE: &str = "Fail! Something went wrong with the bot's storage";

/// One inbound message parsed against the fixed grammar. Arguments are
/// validated only for shape here (numeric tokens, single-token domains);
/// anything that doesn't fit falls through to `Undefined`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Help,
    ListCommands,
    Contacts,
    ListKeywords,
    AddKeyword(String),
    RemoveKeyword(String),
    SetScore(i32),
    Stop,
    Subscribe(i64),
    Unsubscribe(i64),
    ListSubscriptions,
    ListFollowedUsers,
    FollowUser(String),
    UnfollowUser(String),
    WatchDomain(String),
    AbandonDomain(String),
    ListDomains,
    SetNotifyUsername(String),
    DisableNotify,
    Undefined,
}

impl FromStr for BotCommand {
    type Err = ();

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = text.split_whitespace().collect();

        let command = match tokens.as_slice() {
            ["/start"] | ["/help"] => BotCommand::Help,
            ["/commands"] => BotCommand::ListCommands,
            ["/contacts"] => BotCommand::Contacts,
            ["/keywords"] => BotCommand::ListKeywords,
            ["/add", args @ ..] if !args.is_empty() => BotCommand::AddKeyword(args.join(" ")),
            ["/remove", args @ ..] if !args.is_empty() => BotCommand::RemoveKeyword(args.join(" ")),
            ["/set_score", score] => match parse_numeric::<i32>(score) {
                Some(score) => BotCommand::SetScore(score),
                None => BotCommand::Undefined,
            },
            ["/stop"] => BotCommand::Stop,
            ["/subscribe", id] => match parse_numeric::<i64>(id) {
                Some(id) => BotCommand::Subscribe(id),
                None => BotCommand::Undefined,
            },
            ["/unsubscribe", id] => match parse_numeric::<i64>(id) {
                Some(id) => BotCommand::Unsubscribe(id),
                None => BotCommand::Undefined,
            },
            ["/subscriptions"] => BotCommand::ListSubscriptions,
            ["/followed_users"] => BotCommand::ListFollowedUsers,
            ["/follow", args @ ..] if !args.is_empty() => BotCommand::FollowUser(args.join(" ")),
            ["/unfollow", args @ ..] if !args.is_empty() => {
                BotCommand::UnfollowUser(args.join(" "))
            }
            ["/watch", domain] => BotCommand::WatchDomain(domain.to_string()),
            ["/abandon", domain] => BotCommand::AbandonDomain(domain.to_string()),
            ["/domains"] => BotCommand::ListDomains,
            ["/notify", username] => BotCommand::SetNotifyUsername(username.to_string()),
            ["/disable"] => BotCommand::DisableNotify,
            _ => BotCommand::Undefined,
        };

        Ok(command)
    }
}

/// Digits-only tokens are the only accepted numeric arguments; everything
/// else (signs, overflow, letters) is treated as not-a-number.
fn parse_numeric<T: FromStr>(token: &str) -> Option<T> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}

pub trait Command {
    fn response(&self, db_connection: &mut PgConnection, user_feed: &UserFeed) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOption {
    WholeWord,
    Stories,
    Comments,
}

#[derive(Debug, PartialEq, Eq)]
pub enum OptionsError {
    InvalidOption(String),
    BadCombination,
}

impl OptionsError {
    pub fn response(&self) -> String {
        match self {
            OptionsError::InvalidOption(option) => format!("Fail! Invalid option: {option}"),
            OptionsError::BadCombination => {
                "Fail! These options cannot be used together: -stories, -comments".to_string()
            }
        }
    }
}

/// Splits command arguments into the term (everything before the first
/// ` -`) and the trailing option chunks.
pub fn split_term_and_options(args: &str) -> (String, Vec<String>) {
    let mut chunks = args.split(" -");

    let term = chunks.next().unwrap_or_default().trim().to_string();
    let options = chunks
        .map(|chunk| chunk.trim().to_string())
        .filter(|chunk| !chunk.is_empty())
        .collect();

    (term, options)
}

/// Maps raw option chunks to `CommandOption`s. `-stories` and `-comments`
/// are opposite restrictions, so using both at once is rejected.
pub fn parse_options(
    raw_options: &[String],
    whole_word_allowed: bool,
) -> Result<Vec<CommandOption>, OptionsError> {
    let mut options = Vec::new();

    for raw_option in raw_options {
        let option = match raw_option.as_str() {
            "whole-word" if whole_word_allowed => CommandOption::WholeWord,
            "stories" => CommandOption::Stories,
            "comments" => CommandOption::Comments,
            unknown => return Err(OptionsError::InvalidOption(unknown.to_string())),
        };

        if !options.contains(&option) {
            options.push(option);
        }
    }

    if options.contains(&CommandOption::Stories) && options.contains(&CommandOption::Comments) {
        return Err(OptionsError::BadCombination);
    }

    Ok(options)
}

pub fn keywords_list(keywords: &[Keyword]) -> String {
    keywords
        .iter()
        .map(keyword_line)
        .collect::<Vec<String>>()
        .join("\n")
}

fn keyword_line(keyword: &Keyword) -> String {
    let mut options = Vec::new();

    if keyword.is_full_match {
        options.push("-whole-word");
    }
    if !keyword.search_comments {
        options.push("-stories");
    }
    if !keyword.search_threads {
        options.push("-comments");
    }

    if options.is_empty() {
        keyword.name.clone()
    } else {
        format!("{} ({})", keyword.name, options.join(", "))
    }
}

pub fn followed_users_list(followed_users: &[FollowedUser]) -> String {
    followed_users
        .iter()
        .map(followed_user_line)
        .collect::<Vec<String>>()
        .join("\n")
}

fn followed_user_line(followed_user: &FollowedUser) -> String {
    let mut options = Vec::new();

    if !followed_user.follow_comments {
        options.push("-stories");
    }
    if !followed_user.follow_threads {
        options.push("-comments");
    }

    if options.is_empty() {
        followed_user.username.clone()
    } else {
        format!("{} ({})", followed_user.username, options.join(", "))
    }
}
