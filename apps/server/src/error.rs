//! API error mapping.
//!
//! ## Error → HTTP Status
//! ```text
//! ValidationError            → 400 Bad Request
//! ProductNotFound            → 404 Not Found
//! SaleNotFound               → 404 Not Found
//! InsufficientStock          → 422 Unprocessable Entity
//! UniqueViolation            → 409 Conflict
//! ForeignKeyViolation        → 409 Conflict
//! missing/invalid token      → 401 Unauthorized
//! role gate                  → 403 Forbidden
//! any other DbError          → 500, generic body, detail logged
//! ```
//!
//! Client-caused failures carry their message through; internal failures
//! never leak detail to the response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use tally_core::CoreError;
use tally_db::{DbError, SaleError};

/// Error type returned by every handler.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::FORBIDDEN, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, message)
    }

    /// 500 with a generic body; the real cause is logged, not returned.
    fn internal(detail: impl std::fmt::Display) -> Self {
        error!(%detail, "Internal error");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.message,
        }));
        (self.status, body).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let status = match err {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::ProductNotFound(_) | CoreError::SaleNotFound(_) => StatusCode::NOT_FOUND,
            CoreError::InsufficientStock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::new(StatusCode::NOT_FOUND, err.to_string()),
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                ApiError::new(StatusCode::CONFLICT, err.to_string())
            }
            other => ApiError::internal(other),
        }
    }
}

impl From<SaleError> for ApiError {
    fn from(err: SaleError) -> Self {
        match err {
            SaleError::Core(core) => core.into(),
            SaleError::Db(db) => db.into(),
        }
    }
}
