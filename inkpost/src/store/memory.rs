use std::path::Path;

use chrono::{DateTime, Utc};
use rocket::tokio::sync::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Author, AuthorSummary, Comment, Moderation, NewComment, Post, PostSummary};

use super::{ConnectError, ContentStore};

/// A post as it is stored: the author is a reference, comments live in their
/// own collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub main_image: Option<String>,
    pub author: String,
    #[serde(default)]
    pub body: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Initial contents of a [`MemoryStore`], usually read from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub posts: Vec<PostDocument>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Fixtures {
    pub fn from_path(path: &Path) -> Result<Self, ConnectError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Content store that keeps all documents in memory.
///
/// Like a real document store it assigns comment ids and creation times,
/// and refuses comments for posts it does not know.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Fixtures>,
}

impl MemoryStore {
    pub fn with_fixtures(fixtures: Fixtures) -> Self {
        MemoryStore {
            documents: RwLock::new(fixtures),
        }
    }

    /// Every stored comment, regardless of its moderation state.
    pub async fn comments(&self) -> Vec<Comment> {
        self.documents.read().await.comments.clone()
    }

    /// Add a post, the way an author would through the store's own editor.
    pub async fn publish(&self, author: Author, post: PostDocument) {
        let mut documents = self.documents.write().await;
        if !documents.authors.iter().any(|a| a.id == author.id) {
            documents.authors.push(author);
        }
        documents.posts.push(post);
    }

    /// Approve a comment the way a moderator would, directly on the store.
    ///
    /// Returns `false` when there is no comment with the given id.
    pub async fn approve(&self, comment_id: &str) -> bool {
        let mut documents = self.documents.write().await;
        match documents.comments.iter_mut().find(|c| c.id == comment_id) {
            Some(comment) => {
                comment.status = Moderation::Approved;
                true
            }
            None => false,
        }
    }
}

fn author_summary(documents: &Fixtures, author_id: &str) -> Option<AuthorSummary> {
    documents
        .authors
        .iter()
        .find(|a| a.id == author_id)
        .map(AuthorSummary::from)
}

#[rocket::async_trait]
impl ContentStore for MemoryStore {
    async fn posts(&self) -> Result<Vec<PostSummary>, StoreError> {
        let documents = self.documents.read().await;

        // posts without a resolvable author are skipped, like an inner join
        Ok(documents
            .posts
            .iter()
            .filter_map(|post| {
                let author = author_summary(&documents, &post.author)?;
                Some(PostSummary {
                    id: post.id.clone(),
                    title: post.title.clone(),
                    description: post.description.clone(),
                    slug: post.slug.clone(),
                    main_image: post.main_image.clone(),
                    author,
                })
            })
            .collect())
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let documents = self.documents.read().await;

        let post = match documents.posts.iter().find(|p| p.slug == slug) {
            Some(post) => post,
            None => return Ok(None),
        };
        let author = match author_summary(&documents, &post.author) {
            Some(author) => author,
            None => return Ok(None),
        };
        let comments = documents
            .comments
            .iter()
            .filter(|c| c.post_id == post.id && c.status.is_visible())
            .cloned()
            .collect();

        Ok(Some(Post {
            id: post.id.clone(),
            created_at: post.created_at,
            title: post.title.clone(),
            description: post.description.clone(),
            slug: post.slug.clone(),
            main_image: post.main_image.clone(),
            author,
            body: post.body.clone(),
            comments,
        }))
    }

    async fn slugs(&self) -> Result<Vec<String>, StoreError> {
        let documents = self.documents.read().await;

        // same skip as `posts`, so every listed slug can be read
        Ok(documents
            .posts
            .iter()
            .filter(|p| author_summary(&documents, &p.author).is_some())
            .map(|p| p.slug.clone())
            .collect())
    }

    async fn create_comment(&self, comment: NewComment) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;

        if !documents.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(StoreError::Rejected(format!(
                "no post with id {}",
                comment.post_id
            )));
        }

        documents.comments.push(Comment {
            id: Uuid::new_v4().to_string(),
            post_id: comment.post_id,
            name: comment.name,
            email: comment.email,
            comment: comment.comment,
            status: Moderation::default(),
            created_at: Utc::now(),
        });

        Ok(())
    }
}
