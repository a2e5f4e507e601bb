use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::BlogError;
use crate::models::{Post, PostSummary};
use crate::store::{within, ContentStore};

/// Read side of the application: the three queries the pages need.
///
/// Every call goes straight to the content store; nothing is cached here.
#[derive(Clone)]
pub struct QueryGateway {
    store: Arc<dyn ContentStore>,
    timeout: Duration,
}

impl QueryGateway {
    pub fn new(store: Arc<dyn ContentStore>, timeout: Duration) -> Self {
        QueryGateway { store, timeout }
    }

    /// All posts with a summary of their author, for the listing page.
    pub async fn posts(&self) -> Result<Vec<PostSummary>, BlogError> {
        within(self.timeout, self.store.posts())
            .await
            .map_err(BlogError::ReadFailed)
    }

    /// A single post with its approved comments.
    ///
    /// An unknown slug is reported as [`BlogError::NotFound`].
    pub async fn post(&self, slug: &str) -> Result<Post, BlogError> {
        let post = within(self.timeout, self.store.post_by_slug(slug))
            .await
            .map_err(BlogError::ReadFailed)?
            .ok_or(BlogError::NotFound)?;

        debug!(slug, comments = post.comments.len(), "loaded post");
        Ok(post)
    }

    /// Slugs of all posts, used to enumerate addressable pages.
    pub async fn slugs(&self) -> Result<Vec<String>, BlogError> {
        within(self.timeout, self.store.slugs())
            .await
            .map_err(BlogError::ReadFailed)
    }
}
