use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::models::category::CategoryId;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("conflicting state: {0}")]
    Conflict(String),
    #[error("media storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Clone, Debug, Error)]
pub enum ValidationError {
    #[error("input value is invalid: `{value}`, reason: {reason}")]
    InvalidInput { value: String, reason: String },
    #[error("a file upload or a source url is required")]
    MissingSource,
    #[error("category does not exist: {id}")]
    UnknownCategory { id: CategoryId },
    #[error("limit exceeded for {subject}, allowed {limit} {unit}(s), got {attempted}")]
    LimitExceeded {
        subject: String,
        unit: String,
        attempted: usize,
        limit: usize,
    },
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::Sqlx(e) => match e {
                sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "not found".into()),
                e => {
                    error!("received internal error for user request: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Something went wrong".into(),
                    )
                }
            },
            Self::Storage(e) => {
                error!("media provider call failed while handling request: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "media storage request failed".into(),
                )
            }
            e @ Self::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            e @ Self::Conflict(_) => (StatusCode::CONFLICT, e.to_string()),
        };
        let error = json!({ "error": error }).to_string();
        (status, error).into_response()
    }
}
