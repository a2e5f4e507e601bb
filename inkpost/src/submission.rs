//! Accepting reader comments.
//!
//! A submitted comment is written once, unapproved, and then left alone.
//! Approving it is up to a moderator working on the content store directly;
//! until then the post pages do not show it.
use std::sync::Arc;
use std::time::Duration;

use rocket::form::FromForm;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::{Validate, ValidationError};

use crate::error::BlogError;
use crate::models::NewComment;
use crate::store::{within, ContentStore};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// The comment form as posted by a reader.
///
/// The post is identified by its store id, sent as `_id`.
#[derive(Debug, Clone, Deserialize, FromForm, Validate)]
pub struct CommentForm {
    #[serde(rename = "_id")]
    #[field(name = "_id")]
    #[validate(custom = "not_blank")]
    pub post_id: String,
    #[validate(custom = "not_blank")]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom = "not_blank")]
    pub comment: String,
}

impl From<CommentForm> for NewComment {
    fn from(form: CommentForm) -> Self {
        NewComment {
            post_id: form.post_id,
            name: form.name,
            email: form.email,
            comment: form.comment,
        }
    }
}

/// Returned when a comment has been written.
///
/// Does not identify the created comment; the store assigns its id and the
/// comment is not readable until approved anyway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

impl Acknowledgement {
    fn submitted() -> Self {
        Acknowledgement {
            message: "Comment submitted".to_owned(),
        }
    }
}

/// Writes new comments to the content store.
#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn ContentStore>,
    timeout: Duration,
}

impl CommentService {
    pub fn new(store: Arc<dyn ContentStore>, timeout: Duration) -> Self {
        CommentService { store, timeout }
    }

    /// Write a single unapproved comment.
    ///
    /// The input is expected to be validated by the caller. A failed write is
    /// reported as [`BlogError::WriteFailed`] and not retried; submitting
    /// again creates a second comment. A write that timed out may still
    /// land in the store.
    pub async fn submit(&self, comment: NewComment) -> Result<Acknowledgement, BlogError> {
        let post_id = comment.post_id.clone();

        match within(self.timeout, self.store.create_comment(comment)).await {
            Ok(()) => {
                info!(post_id = %post_id, "comment submitted for moderation");
                Ok(Acknowledgement::submitted())
            }
            Err(e) => {
                warn!(post_id = %post_id, "comment write failed: {}", e);
                Err(BlogError::WriteFailed(e))
            }
        }
    }
}
