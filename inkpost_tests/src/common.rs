use std::sync::Arc;

use diesel::prelude::*;
use diesel::PgConnection;
use rocket::figment::Figment;
use rocket::{Build, Rocket};

use inkpost::schema::{authors, comments, posts};
use inkpost::store::PgStore;

pub fn database_url() -> String {
    dotenv::dotenv().ok();
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://inkpost@127.0.0.1:5432/inkpost".to_owned())
}

pub fn connection() -> PgConnection {
    PgConnection::establish(&database_url()).unwrap()
}

/// Post ids, slugs and author ids used by a single test, so tests sharing a
/// database do not see each other's rows.
pub struct Seed {
    pub author_id: String,
    pub post_id: String,
    pub slug: String,
}

impl Seed {
    pub fn new(prefix: &str) -> Self {
        Seed {
            author_id: format!("{}-author", prefix),
            post_id: format!("{}-post", prefix),
            slug: format!("{}-slug", prefix),
        }
    }
}

/// Remove whatever an earlier run left behind and insert a fresh author and
/// post.
pub fn seed(conn: &PgConnection, prefix: &str) -> Seed {
    let seed = Seed::new(prefix);

    diesel::delete(comments::table.filter(comments::post_id.eq(&seed.post_id)))
        .execute(conn)
        .unwrap();
    diesel::delete(posts::table.filter(posts::id.eq(&seed.post_id)))
        .execute(conn)
        .unwrap();
    diesel::delete(authors::table.filter(authors::id.eq(&seed.author_id)))
        .execute(conn)
        .unwrap();

    diesel::insert_into(authors::table)
        .values((
            authors::id.eq(&seed.author_id),
            authors::name.eq("Ada Lovelace"),
        ))
        .execute(conn)
        .unwrap();
    diesel::insert_into(posts::table)
        .values((
            posts::id.eq(&seed.post_id),
            posts::title.eq("Notes on the analytical engine"),
            posts::slug.eq(&seed.slug),
            posts::author_id.eq(&seed.author_id),
            posts::body.eq(serde_json::json!([])),
        ))
        .execute(conn)
        .unwrap();

    seed
}

/// Insert a comment the way a moderator or an import would, bypassing the
/// submission endpoint.
pub fn insert_comment(conn: &PgConnection, post_id: &str, id: &str, approved: bool) {
    diesel::insert_into(comments::table)
        .values((
            comments::id.eq(id),
            comments::post_id.eq(post_id),
            comments::name.eq("Charles"),
            comments::email.eq("charles@example.com"),
            comments::comment.eq(format!("comment {}", id)),
            comments::approved.eq(approved),
        ))
        .execute(conn)
        .unwrap();
}

pub fn approve(conn: &PgConnection, id: &str) {
    diesel::update(comments::table.find(id))
        .set(comments::approved.eq(true))
        .execute(conn)
        .unwrap();
}

pub fn init_rocket() -> Rocket<Build> {
    let store = PgStore::connect(&database_url(), 2).unwrap();
    store.run_migrations().unwrap();

    inkpost::build(
        Figment::from(rocket::Config::debug_default()),
        Arc::new(store),
    )
}
