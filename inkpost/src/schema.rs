table! {
    authors (id) {
        id -> Text,
        name -> Text,
        image -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

table! {
    comments (id) {
        id -> Text,
        post_id -> Text,
        name -> Text,
        email -> Text,
        comment -> Text,
        approved -> Bool,
        created_at -> Timestamptz,
    }
}

table! {
    posts (id) {
        id -> Text,
        title -> Text,
        description -> Nullable<Text>,
        slug -> Text,
        main_image -> Nullable<Text>,
        author_id -> Text,
        body -> Jsonb,
        created_at -> Timestamptz,
    }
}

joinable!(comments -> posts (post_id));
joinable!(posts -> authors (author_id));

allow_tables_to_appear_in_same_query!(authors, comments, posts,);
