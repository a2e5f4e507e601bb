use std::io::Cursor;
use std::time::Duration;

use diesel::r2d2::PoolError;
use diesel_migrations::RunMigrationsError;
use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::tokio::task::JoinError;
use rocket::Response;
use tracing::{debug, error};
use validator::ValidationErrors;

/// Indicates that the content store could not answer a query or complete a
/// write.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Could not get a connection from the pool: {0}")]
    Pool(#[from] PoolError),

    #[error("Could not run migrations: {0}")]
    Migration(#[from] RunMigrationsError),

    #[error("Store task did not complete: {0}")]
    Task(#[from] JoinError),

    #[error("Store rejected the document: {0}")]
    Rejected(String),

    #[error("Store did not answer within {0:?}")]
    Timeout(Duration),
}

/// Errors surfaced to clients of the HTTP interface.
#[derive(thiserror::Error, Debug)]
pub enum BlogError {
    #[error("Invalid comment submission")]
    Validation(#[from] ValidationErrors),

    #[error("Could not store comment")]
    WriteFailed(#[source] StoreError),

    #[error("Not found")]
    NotFound,

    #[error("Could not read from the content store")]
    ReadFailed(#[source] StoreError),
}

impl BlogError {
    pub fn status(&self) -> Status {
        match self {
            BlogError::Validation(_) => Status::BadRequest,
            BlogError::WriteFailed(_) => Status::InternalServerError,
            BlogError::NotFound => Status::NotFound,
            BlogError::ReadFailed(_) => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for BlogError {
    fn respond_to(self, request: &'r rocket::Request<'_>) -> rocket::response::Result<'static> {
        let status = self.status();
        let body = match &self {
            BlogError::Validation(errors) => ::serde_json::json!({
                "error": status.code,
                "validation_error": errors.field_errors(),
            }),
            BlogError::WriteFailed(e) | BlogError::ReadFailed(e) => {
                error!(uri = %request.uri(), "{}: {}", self, e);
                ::serde_json::json!({ "error": status.code })
            }
            BlogError::NotFound => {
                debug!(uri = %request.uri(), "{}", self);
                ::serde_json::json!({ "error": status.code })
            }
        }
        .to_string();

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}
