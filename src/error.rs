use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::models::ProblemDetails;

/// Errors raised while loading `AppConfig` from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// RepositoryError
///
/// Failures reported by the persistence layer. The handlers decide how each one
/// surfaces over HTTP, since the same variant means different things per operation
/// (an unavailable store is a 404 on reads but a 500 on create).
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The People entity set cannot be reached (pool closed, I/O failure, missing table).
    #[error("entity set 'People' is unavailable")]
    Unavailable,

    /// Insert collided with an existing primary key.
    #[error("person {0} already exists")]
    Duplicate(Uuid),

    /// A write affected no rows: the record vanished or changed underneath us.
    #[error("concurrent modification of person {0}")]
    Concurrency(Uuid),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, RepositoryError::Unavailable)
    }
}

/// ApiError
///
/// The HTTP-facing error taxonomy. Every variant maps to exactly one status code and
/// is rendered as an `application/problem+json` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("conflict: {0}")]
    Conflict(String),

    /// The entity set is unavailable. The detail is returned to the caller.
    #[error("{0}")]
    Problem(String),

    /// Unexpected store failure. Logged, never echoed back.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Problem(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            ApiError::BadRequest(detail) | ApiError::Conflict(detail) | ApiError::Problem(detail) => {
                Some(detail.clone())
            }
            _ => None,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Unavailable => ApiError::Problem(err.to_string()),
            RepositoryError::Duplicate(_) | RepositoryError::Concurrency(_) => {
                ApiError::Conflict(err.to_string())
            }
            RepositoryError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

/// Malformed or incomplete request bodies are client errors with a problem body.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(ref cause) = self {
            tracing::error!("internal error: {}", cause);
        }

        let body = ProblemDetails {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            detail: self.detail(),
        };

        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(body),
        )
            .into_response()
    }
}
