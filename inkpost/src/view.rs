//! What readers get to see of posts and comments.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::image::{url_for, ImageConfig};
use crate::models::{AuthorSummary, Comment, Post, PostSummary};
use crate::routing::post_path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorView {
    pub name: String,
    pub image_url: Option<String>,
}

impl AuthorView {
    fn render(author: AuthorSummary, images: &ImageConfig) -> Self {
        AuthorView {
            image_url: url_for(author.image.as_deref(), images),
            name: author.name,
        }
    }
}

/// A post on the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub path: String,
    pub main_image_url: Option<String>,
    pub author: AuthorView,
}

impl PostCard {
    pub fn render(post: PostSummary, images: &ImageConfig) -> Self {
        PostCard {
            main_image_url: url_for(post.main_image.as_deref(), images),
            path: post_path(&post.slug),
            author: AuthorView::render(post.author, images),
            id: post.id,
            title: post.title,
            description: post.description,
            slug: post.slug,
        }
    }
}

/// A comment as shown under a post. The submitter's email is left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub name: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        CommentView {
            id: comment.id,
            name: comment.name,
            comment: comment.comment,
            created_at: comment.created_at,
        }
    }
}

/// A full post page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub main_image_url: Option<String>,
    pub author: AuthorView,
    pub body: serde_json::Value,
    /// Whether the comment section should be rendered at all.
    pub show_comments: bool,
    pub comments: Vec<CommentView>,
}

impl PostView {
    pub fn render(post: Post, images: &ImageConfig) -> Self {
        let comments: Vec<CommentView> = post.comments.into_iter().map(CommentView::from).collect();

        PostView {
            main_image_url: url_for(post.main_image.as_deref(), images),
            author: AuthorView::render(post.author, images),
            show_comments: !comments.is_empty(),
            comments,
            id: post.id,
            title: post.title,
            description: post.description,
            slug: post.slug,
            created_at: post.created_at,
            body: post.body,
        }
    }
}
