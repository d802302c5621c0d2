diesel::table! {
    comments (id) {
        id -> Int8,
        comment_id -> Int8,
        thread_id_int -> Int8,
        parent_comment_id -> Nullable<Int8>,
        username -> Text,
        body -> Text,
        comment_created_at -> Timestamptz,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    delivered_comments (user_feed_id, comment_id, ledger) {
        user_feed_id -> Int8,
        comment_id -> Int8,
        ledger -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    delivered_threads (user_feed_id, thread_id, ledger) {
        user_feed_id -> Int8,
        thread_id -> Int8,
        ledger -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    followed_users (id) {
        id -> Int8,
        user_feed_id -> Int8,
        username -> Text,
        follow_threads -> Bool,
        follow_comments -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    keywords (id) {
        id -> Int8,
        user_feed_id -> Int8,
        name -> Text,
        is_full_match -> Bool,
        search_threads -> Bool,
        search_comments -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    telegram_updates (id) {
        id -> Int8,
        update_id -> Int8,
        chat_id -> Int8,
        date -> Timestamptz,
        text -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    thread_subscriptions (user_feed_id) {
        user_feed_id -> Int8,
        thread_id -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    threads (id) {
        id -> Int8,
        thread_id -> Int8,
        link -> Text,
        title -> Text,
        creator_username -> Nullable<Text>,
        score -> Nullable<Int4>,
        thread_created_at -> Timestamptz,
        comments_count -> Nullable<Int4>,
        comments_link -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    user_feeds (id) {
        id -> Int8,
        chat_id -> Int8,
        score_threshold -> Int4,
        domain_names -> Array<Text>,
        hn_username -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(delivered_comments -> user_feeds (user_feed_id));
diesel::joinable!(delivered_threads -> user_feeds (user_feed_id));
diesel::joinable!(followed_users -> user_feeds (user_feed_id));
diesel::joinable!(keywords -> user_feeds (user_feed_id));
diesel::joinable!(thread_subscriptions -> threads (thread_id));
diesel::joinable!(thread_subscriptions -> user_feeds (user_feed_id));

diesel::allow_tables_to_appear_in_same_query!(
    comments,
    delivered_comments,
    delivered_threads,
    followed_users,
    keywords,
    telegram_updates,
    thread_subscriptions,
    threads,
    user_feeds,
);
