pub mod comment;
pub mod followed_user;
pub mod keyword;
pub mod telegram_update;
pub mod thread;
pub mod thread_subscription;
pub mod user_feed;

pub use comment::Comment;
pub use followed_user::FollowedUser;
pub use keyword::Keyword;
pub use telegram_update::TelegramUpdate;
pub use thread::Thread;
pub use thread_subscription::ThreadSubscription;
pub use user_feed::UserFeed;
