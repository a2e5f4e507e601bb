//! The content store holds posts, authors and comments.
//!
//! Everything else in this crate only talks to the store through the
//! [`ContentStore`] trait. Two implementations are provided: [`PgStore`]
//! keeps the documents in Postgres, [`MemoryStore`] keeps them in memory and
//! is mostly useful for tests and local demos.
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rocket::figment::Figment;
use serde::Deserialize;

use crate::error::StoreError;
use crate::models::{NewComment, Post, PostSummary};

mod memory;
mod pg;

pub use self::memory::{Fixtures, MemoryStore, PostDocument};
pub use self::pg::PgStore;

/// Read and write contract of the content store.
///
/// Implementations decide how documents are kept, but all of them must
/// uphold the moderation contract: [`ContentStore::post_by_slug`] only ever
/// returns approved comments that reference the returned post.
#[rocket::async_trait]
pub trait ContentStore: Send + Sync {
    /// All posts, each with a summary of its author.
    async fn posts(&self) -> Result<Vec<PostSummary>, StoreError>;

    /// The post with the given slug, its author and its approved comments.
    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError>;

    /// The slugs of all posts that [`ContentStore::post_by_slug`] can
    /// return. Posts whose author cannot be resolved are left out.
    async fn slugs(&self) -> Result<Vec<String>, StoreError>;

    /// Create a single comment document.
    ///
    /// The new comment is never visible to readers until a moderator
    /// approves it outside of this crate. Nothing about the created document
    /// is returned.
    async fn create_comment(&self, comment: NewComment) -> Result<(), StoreError>;
}

/// Wait at most `limit` for a store call to finish.
///
/// Only the wait is bounded. A store call that already started, such as a
/// Postgres insert on the blocking pool, may still complete after the
/// timeout has been reported.
pub(crate) async fn within<T, F>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match rocket::tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

/// Which store to use, as read from the `store` configuration key.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreSettings {
    Postgres {
        url: String,
        #[serde(default = "default_pool_size")]
        pool_size: u32,
    },
    Memory {
        fixtures: Option<PathBuf>,
    },
}

fn default_pool_size() -> u32 {
    10
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings::Memory { fixtures: None }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("Invalid store configuration: {0}")]
    Config(#[from] rocket::figment::Error),

    #[error("Could not read fixtures: {0}")]
    Fixtures(#[from] std::io::Error),

    #[error("Could not parse fixtures: {0}")]
    FixtureFormat(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Set up the store described by the `store` and `run_migrations` keys of
/// the given configuration.
pub fn connect(figment: &Figment) -> Result<Arc<dyn ContentStore>, ConnectError> {
    let settings = if figment.contains("store") {
        figment.extract_inner::<StoreSettings>("store")?
    } else {
        StoreSettings::default()
    };
    let run_migrations = if figment.contains("run_migrations") {
        figment.extract_inner::<bool>("run_migrations")?
    } else {
        true
    };

    match settings {
        StoreSettings::Postgres { url, pool_size } => {
            let store = PgStore::connect(&url, pool_size)?;
            if run_migrations {
                store.run_migrations()?;
            }
            Ok(Arc::new(store))
        }
        StoreSettings::Memory { fixtures: Some(path) } => {
            let fixtures = Fixtures::from_path(&path)?;
            Ok(Arc::new(MemoryStore::with_fixtures(fixtures)))
        }
        StoreSettings::Memory { fixtures: None } => Ok(Arc::new(MemoryStore::default())),
    }
}
