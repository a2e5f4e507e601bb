//! Documents as they are read from and written to the content store.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::comments;

/// Moderation state of a comment.
///
/// Comments are created `Unapproved`. Only a moderator working directly on
/// the content store moves a comment to `Approved`; nothing in this crate
/// does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Moderation {
    Unapproved,
    Approved,
}

impl Moderation {
    /// Whether a comment in this state may be shown to readers.
    pub fn is_visible(self) -> bool {
        matches!(self, Moderation::Approved)
    }
}

impl Default for Moderation {
    fn default() -> Self {
        Moderation::Unapproved
    }
}

impl From<bool> for Moderation {
    fn from(approved: bool) -> Self {
        if approved {
            Moderation::Approved
        } else {
            Moderation::Unapproved
        }
    }
}

impl From<Option<bool>> for Moderation {
    fn from(approved: Option<bool>) -> Self {
        approved.unwrap_or(false).into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

/// The part of an author that is embedded in post documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable)]
pub struct AuthorSummary {
    pub name: String,
    pub image: Option<String>,
}

impl From<&Author> for AuthorSummary {
    fn from(author: &Author) -> Self {
        AuthorSummary {
            name: author.name.clone(),
            image: author.image.clone(),
        }
    }
}

/// A post as returned by the listing query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub main_image: Option<String>,
    pub author: AuthorSummary,
}

/// A single post with its author and the comments readers may see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub main_image: Option<String>,
    pub author: AuthorSummary,
    /// Rich text document tree, passed through untouched.
    pub body: serde_json::Value,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub name: String,
    pub email: String,
    pub comment: String,
    #[serde(default)]
    pub status: Moderation,
    pub created_at: DateTime<Utc>,
}

/// A comment that is about to be written.
///
/// Has no moderation field, the store assigns the unapproved default on
/// insert.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Insertable)]
#[table_name = "comments"]
pub struct NewComment {
    pub post_id: String,
    pub name: String,
    pub email: String,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_approval_is_unapproved() {
        assert_eq!(Moderation::from(None), Moderation::Unapproved);
        assert_eq!(Moderation::from(Some(false)), Moderation::Unapproved);
        assert_eq!(Moderation::from(Some(true)), Moderation::Approved);
    }

    #[test]
    fn only_approved_is_visible() {
        assert!(Moderation::Approved.is_visible());
        assert!(!Moderation::Unapproved.is_visible());
    }

    #[test]
    fn comment_status_defaults_when_missing() {
        let comment: Comment = serde_json::from_str(
            r#"{
                "id": "c1",
                "post_id": "p1",
                "name": "Ada",
                "email": "ada@example.com",
                "comment": "Great read",
                "created_at": "2022-03-01T12:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(comment.status, Moderation::Unapproved);
    }
}
