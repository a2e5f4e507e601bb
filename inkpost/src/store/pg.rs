use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use rocket::tokio::task;
use tracing::info;

use crate::error::StoreError;
use crate::models::{AuthorSummary, Comment, NewComment, Post, PostSummary};
use crate::schema::{authors, comments, posts};
use crate::visibility::CommentFilter;

use super::ContentStore;

embed_migrations!();

type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Content store backed by Postgres.
///
/// Diesel connections are blocking, so every query runs on the blocking
/// thread pool with a connection taken from an r2d2 pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(Queryable)]
struct PostRow {
    id: String,
    title: String,
    description: Option<String>,
    slug: String,
    main_image: Option<String>,
    body: serde_json::Value,
    created_at: DateTime<Utc>,
}

#[derive(Queryable)]
struct CommentRow {
    id: String,
    post_id: String,
    name: String,
    email: String,
    comment: String,
    approved: bool,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            post_id: row.post_id,
            name: row.name,
            email: row.email,
            comment: row.comment,
            status: row.approved.into(),
            created_at: row.created_at,
        }
    }
}

impl PgStore {
    pub fn connect(url: &str, pool_size: u32) -> Result<Self, StoreError> {
        let manager = ConnectionManager::<PgConnection>::new(url);
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        Ok(PgStore { pool })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        embedded_migrations::run(&*conn)?;
        info!("content store migrations are up to date");
        Ok(())
    }

    /// Run a closure with a pooled connection on the blocking thread pool.
    async fn run<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&PgConnection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        task::spawn_blocking(move || {
            let conn = pool.get()?;
            f(&*conn)
        })
        .await?
    }
}

fn load_posts(conn: &PgConnection) -> QueryResult<Vec<PostSummary>> {
    let rows = posts::table
        .inner_join(authors::table)
        .select((
            posts::id,
            posts::title,
            posts::description,
            posts::slug,
            posts::main_image,
            (authors::name, authors::image),
        ))
        .load::<(
            String,
            String,
            Option<String>,
            String,
            Option<String>,
            AuthorSummary,
        )>(conn)?;

    Ok(rows
        .into_iter()
        .map(
            |(id, title, description, slug, main_image, author)| PostSummary {
                id,
                title,
                description,
                slug,
                main_image,
                author,
            },
        )
        .collect())
}

fn load_post(conn: &PgConnection, slug: &str) -> QueryResult<Option<Post>> {
    let found = posts::table
        .inner_join(authors::table)
        .filter(posts::slug.eq(slug))
        .select((
            (
                posts::id,
                posts::title,
                posts::description,
                posts::slug,
                posts::main_image,
                posts::body,
                posts::created_at,
            ),
            (authors::name, authors::image),
        ))
        .first::<(PostRow, AuthorSummary)>(conn)
        .optional()?;

    let (row, author) = match found {
        Some(found) => found,
        None => return Ok(None),
    };

    let query = comments::table
        .filter(comments::post_id.eq(row.id.clone()))
        .into_boxed();
    let comments = CommentFilter::readers()
        .apply(query)
        .load::<CommentRow>(conn)?
        .into_iter()
        .map(Comment::from)
        .collect();

    Ok(Some(Post {
        id: row.id,
        created_at: row.created_at,
        title: row.title,
        description: row.description,
        slug: row.slug,
        main_image: row.main_image,
        author,
        body: row.body,
        comments,
    }))
}

#[rocket::async_trait]
impl ContentStore for PgStore {
    async fn posts(&self) -> Result<Vec<PostSummary>, StoreError> {
        self.run(|conn| Ok(load_posts(conn)?)).await
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let slug = slug.to_owned();
        self.run(move |conn| Ok(load_post(conn, &slug)?)).await
    }

    async fn slugs(&self) -> Result<Vec<String>, StoreError> {
        self.run(|conn| {
            Ok(posts::table
                .inner_join(authors::table)
                .select(posts::slug)
                .load::<String>(conn)?)
        })
        .await
    }

    async fn create_comment(&self, comment: NewComment) -> Result<(), StoreError> {
        self.run(move |conn| {
            diesel::insert_into(comments::table)
                .values(&comment)
                .execute(conn)?;
            Ok(())
        })
        .await
    }
}
