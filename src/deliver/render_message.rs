use crate::config::Config;
use crate::models::{Comment, Thread};
use chrono::{DateTime, Utc};
use frankenstein::InlineKeyboardButton;
use frankenstein::InlineKeyboardMarkup;
use frankenstein::ReplyMarkup;

// every character MarkdownV2 treats as markup
const ESCAPED_CHARACTERS: [char; 18] = [
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

const BODY_PREVIEW_LIMIT: usize = 700;

pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for character in text.chars() {
        if character == '\\' || ESCAPED_CHARACTERS.contains(&character) {
            escaped.push('\\');
        }

        escaped.push(character);
    }

    escaped
}

/// Inside an inline link url only `)` and `\` are special.
pub fn escape_link(link: &str) -> String {
    let mut escaped = String::with_capacity(link.len());

    for character in link.chars() {
        if character == '\\' || character == ')' {
            escaped.push('\\');
        }

        escaped.push(character);
    }

    escaped
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %d, %H:%M").to_string()
}

/// Story alert layout: linked title, then score, comments and date.
/// Threads without a comments page (jobs and the like) drop the comments
/// segment.
pub fn thread_message(thread: &Thread) -> String {
    let title = escape_markdown(thread.display_title());
    let link = escape_link(&thread.link);
    let score = thread.score.unwrap_or(0);
    let date = format_date(&thread.thread_created_at);

    match &thread.comments_link {
        Some(comments_link) => format!(
            "[*{title}*]({link}) \n\n{score}\\+ points \\| [{comments_count}\\+ comments]({comments_link}) \\| {date}",
            comments_count = thread.comments_count.unwrap_or(0),
            comments_link = escape_link(comments_link),
        ),
        None => format!("[*{title}*]({link}) \n\n{score}\\+ points \\| {date}"),
    }
}

pub fn followed_user_thread_message(thread: &Thread) -> String {
    let username = thread.creator_username.as_deref().unwrap_or_default();

    format!(
        "New story by *{}*\n\n{}",
        escape_markdown(username),
        thread_message(thread)
    )
}

/// Comment alert layout: a strategy label, the trimmed body and the date.
pub fn comment_message(label: &str, comment: &Comment) -> String {
    let body = escape_markdown(&body_preview(comment));
    let date = format_date(&comment.comment_created_at);

    format!("🔻 {label}\n\n{body}\n\n{date}")
}

pub fn keyword_label(keyword_name: &str) -> String {
    format!("New *{}* mention", escape_markdown(keyword_name))
}

pub fn followed_user_label(username: &str) -> String {
    format!("New comment by *{}*", escape_markdown(username))
}

pub fn subscription_label() -> String {
    "New comment in the subscribed thread".to_string()
}

pub fn reply_label() -> String {
    "New reply to your comment".to_string()
}

pub fn thread_buttons(thread: &Thread) -> ReplyMarkup {
    let mut row = vec![InlineKeyboardButton::builder()
        .text("read")
        .url(thread.link.clone())
        .build()];

    if let Some(comments_link) = &thread.comments_link {
        row.push(
            InlineKeyboardButton::builder()
                .text(format!("{}+ comments", thread.comments_count.unwrap_or(0)))
                .url(comments_link.clone())
                .build(),
        );
    }

    let keyboard = InlineKeyboardMarkup::builder()
        .inline_keyboard(vec![row])
        .build();

    ReplyMarkup::InlineKeyboardMarkup(keyboard)
}

pub fn comment_buttons(comment: &Comment) -> ReplyMarkup {
    let base_url = Config::hackernews_url();

    let row = vec![
        InlineKeyboardButton::builder()
            .text("context")
            .url(format!("{base_url}item?id={}", comment.comment_id))
            .build(),
        InlineKeyboardButton::builder()
            .text("reply")
            .url(format!("{base_url}reply?id={}", comment.comment_id))
            .build(),
    ];

    let keyboard = InlineKeyboardMarkup::builder()
        .inline_keyboard(vec![row])
        .build();

    ReplyMarkup::InlineKeyboardMarkup(keyboard)
}

fn body_preview(comment: &Comment) -> String {
    let body = comment.display_body();

    if body.chars().count() <= BODY_PREVIEW_LIMIT {
        return body.to_string();
    }

    let preview: String = body.chars().take(BODY_PREVIEW_LIMIT).collect();

    format!("{preview}…")
}
