use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use freeflow_core::error::CoreError;
use freeflow_db::client::{
    CHECK_VIOLATION, FOREIGN_KEY_VIOLATION, INVALID_TEXT_REPRESENTATION, UNIQUE_VIOLATION,
};
use freeflow_db::{ClientError, DbError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`ClientError`] for backend
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{ "success": false, "error": ..., "code": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `freeflow_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure reported by the backend client.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(core) => AppError::Core(core),
            DbError::Client(client) => AppError::Client(client),
        }
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl AppError {
    /// HTTP status, machine-readable code and client-facing message.
    pub fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } | CoreError::NotFoundByKey { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Backend errors ---
            AppError::Client(err) => classify_client_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

/// Classify a backend client error into an HTTP status, error code, and message.
///
/// - `NoRows` and sqlx `RowNotFound` map to 404.
/// - Unique violations (SQLSTATE `23505`) map to 409.
/// - Foreign-key, check and malformed-value violations map to 400.
/// - Queries rejected before reaching the backend map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_client_error(err: &ClientError) -> (StatusCode, &'static str, String) {
    match err {
        ClientError::NoRows | ClientError::Sqlx(sqlx::Error::RowNotFound) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        ClientError::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        other => match other.code().as_deref() {
            Some(UNIQUE_VIOLATION) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!(
                    "Duplicate value violates unique constraint: {}",
                    constraint_name(other)
                ),
            ),
            Some(FOREIGN_KEY_VIOLATION) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Referenced record does not exist".to_string(),
            ),
            Some(CHECK_VIOLATION) | Some(INVALID_TEXT_REPRESENTATION) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Invalid value".to_string(),
            ),
            _ => {
                tracing::error!(error = %other, code = ?other.code(), "Backend error");
                internal()
            }
        },
    }
}

/// Constraint named by a unique violation, or `unknown`.
fn constraint_name(err: &ClientError) -> String {
    match err {
        ClientError::Sqlx(sqlx::Error::Database(db_err)) => {
            db_err.constraint().unwrap_or("unknown").to_string()
        }
        ClientError::Backend { message, .. } => message
            .split('"')
            .nth(1)
            .unwrap_or("unknown")
            .to_string(),
        _ => "unknown".to_string(),
    }
}
