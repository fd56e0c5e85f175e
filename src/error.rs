use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error as ThisError;
use tracing::error;

/// Error taxonomy for the whole API surface.
///
/// Every variant maps to exactly one response class; handlers return
/// `Result<_, ApiError>` and never build error responses by hand.
#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Database not configured. Set DATABASE_URL to enable data endpoints.")]
    NotConfigured,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl ApiError {
    /// Maps a unique-constraint violation to a conflict with the given
    /// message; anything else stays a database error.
    pub fn unique_conflict(e: sqlx::Error, message: &'static str) -> Self {
        match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::Conflict(message),
            other => ApiError::Database(other),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::unique_conflict(e, "A unique field value already exists")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message),
            ApiError::NotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "NOT_CONFIGURED",
                "Database not configured. Set DATABASE_URL to enable data endpoints.".to_string(),
            ),
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found"),
            ),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "CONFLICT", message.to_string()),
            ApiError::Database(e) => {
                // Log the driver detail server-side; the caller gets a generic body.
                error!(error = %e, "database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = ApiErrorBody {
            inner: ApiErrorObject {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}
