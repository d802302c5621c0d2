use crate::bot::telegram_client::{Api, SimpleMessageParams};
use crate::deliver::render_message;
use crate::models::{Comment, Thread, UserFeed};
use frankenstein::ReplyMarkup;
use std::thread;
use std::time::Duration;

// spacing between consecutive sends, to stay under the bot API rate limit
const SEND_DELAY: Duration = Duration::from_millis(40);

/// Renders and sends one message per matched item, oldest first, and
/// reports whether the whole batch went through. Failed sends are counted
/// but never retried here; the caller's ledger write is not gated on them.
pub struct DeliveryDriver<'a> {
    api: &'a Api,
    user_feed: &'a UserFeed,
}

impl<'a> DeliveryDriver<'a> {
    pub fn new(api: &'a Api, user_feed: &'a UserFeed) -> Self {
        DeliveryDriver { api, user_feed }
    }

    pub fn send_new_threads(&self, threads: &[Thread]) -> bool {
        let mut all_sent = true;

        for thread in threads.iter().rev() {
            let message = render_message::thread_message(thread);
            let reply_markup = render_message::thread_buttons(thread);

            all_sent &= self.send(message, reply_markup);
        }

        all_sent
    }

    pub fn send_followed_user_threads(&self, threads: &[Thread]) -> bool {
        let mut all_sent = true;

        for thread in threads.iter().rev() {
            let message = render_message::followed_user_thread_message(thread);
            let reply_markup = render_message::thread_buttons(thread);

            all_sent &= self.send(message, reply_markup);
        }

        all_sent
    }

    pub fn send_keyword_comments(&self, keyword_name: &str, comments: &[Comment]) -> bool {
        self.send_comments(&render_message::keyword_label(keyword_name), comments)
    }

    pub fn send_subscription_comments(&self, comments: &[Comment]) -> bool {
        self.send_comments(&render_message::subscription_label(), comments)
    }

    pub fn send_followed_user_comments(&self, comments: &[Comment]) -> bool {
        let mut all_sent = true;

        for comment in comments.iter().rev() {
            let label = render_message::followed_user_label(&comment.username);
            let message = render_message::comment_message(&label, comment);
            let reply_markup = render_message::comment_buttons(comment);

            all_sent &= self.send(message, reply_markup);
        }

        all_sent
    }

    pub fn send_reply_comments(&self, comments: &[Comment]) -> bool {
        self.send_comments(&render_message::reply_label(), comments)
    }

    fn send_comments(&self, label: &str, comments: &[Comment]) -> bool {
        let mut all_sent = true;

        for comment in comments.iter().rev() {
            let message = render_message::comment_message(label, comment);
            let reply_markup = render_message::comment_buttons(comment);

            all_sent &= self.send(message, reply_markup);
        }

        all_sent
    }

    fn send(&self, message: String, reply_markup: ReplyMarkup) -> bool {
        let message_params = SimpleMessageParams::builder()
            .chat_id(self.user_feed.chat_id)
            .message(message)
            .markdown(true)
            .reply_markup(reply_markup)
            .build();

        let sent = self.api.send_message_to_chat(&message_params).is_ok();

        thread::sleep(SEND_DELAY);

        sent
    }
}
