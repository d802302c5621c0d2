use super::Command;
use crate::models::UserFeed;
use diesel::PgConnection;

static COMMAND: &str = "/help";

// MarkdownV2, sent with link previews disabled.
const HELP_RESPONSE: &str = r#"This is a [Hacker News](https://news.ycombinator.com/) alerts bot 🤖

Currently it can do:

✨ *Keyword alerts* ✨
Create a personal feed of stories or monitor mentions of your brand, projects or topics you're interested in\.
Keyword search implemented via case\-insensitive containment test\.

To set\-up:
● Add keywords, can specify options for each one \(match whole word, scan only thread titles, etc\.\)
✔️ Done\! You will receive a message whenever one of your keywords is mentioned on Hacker News


🔻 *COMMANDS*

● *Add keyword*

   `/add KEYWORD [\-whole\-word, \-stories, \-comments]`

   Bot will scan both story titles & comment bodies if options are not specified\.

   Options:
       ○ `\-whole\-word`
         match whole word only

       ○ `\-stories`
         scan only thread titles

       ○ `\-comments`
         scan only comment bodies

   Examples:
       ○ `/add project\-name`
       ○ `/add python \-stories`
       ○ `/add AI \-whole\-word \-stories`
       ○ `/add machine learning \-stories`


● *Set score threshold*

   `/set\_score SCORE`

   Filter out stories that do not pass the threshold \(set to 1 by default\)\.


● *List keywords*

   `/keywords`


● *Remove keyword*

   `/remove KEYWORD`


● *Subscribe to a thread*

   `/subscribe THREAD\_ID`

   Receive new comments of a thread\. One thread at a time\.


● *Unsubscribe from a thread*

   `/unsubscribe THREAD\_ID`


● *List subscriptions*

   `/subscriptions`


● *Follow a user*

   `/follow USERNAME [\-stories, \-comments]`

   Receive new stories or comments of a user\.


● *Unfollow a user*

   `/unfollow USERNAME`


● *List followed users*

   `/followed\_users`


● *Watch a domain*

   `/watch DOMAIN\_NAME`

   Receive stories from a domain \(up to 5 domains\)\.


● *Abandon a domain*

   `/abandon DOMAIN\_NAME`


● *List watched domains*

   `/domains`


● *Reply notifications*

   `/notify HN\_USERNAME` to get notified when someone replies to one of your comments
   `/disable` to turn reply notifications off


● *Commands index and contacts*

   `/commands`, `/contacts`


● *Stop bot*

   `/stop`

   Stop the bot and delete your data\."#;

/// `/start` and `/help` share this response.
pub struct Help {}

impl Help {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for Help {
    fn response(&self, _db_connection: &mut PgConnection, _user_feed: &UserFeed) -> String {
        HELP_RESPONSE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::HELP_RESPONSE;

    #[test]
    fn help_mentions_every_command() {
        for command in [
            "/add", "/remove", "/keywords", "/set\\_score", "/stop", "/subscribe",
            "/unsubscribe", "/subscriptions", "/follow", "/unfollow", "/followed\\_users",
            "/watch", "/abandon", "/domains", "/notify", "/disable", "/commands", "/contacts",
        ] {
            assert!(
                HELP_RESPONSE.contains(command),
                "help response is missing {command}"
            );
        }
    }
}
