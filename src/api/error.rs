//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::db::DatabaseError;
use crate::report::ReportError;

/// Error response body: `{"error": "...", "details": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The model call failed. `details` carries the diagnostic.
    #[error("{message}: {details}")]
    Upstream { message: String, details: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Model failure reported under an endpoint-specific `message`.
    pub fn upstream(message: &str, err: impl std::fmt::Display) -> Self {
        ApiError::Upstream {
            message: message.to_string(),
            details: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream { .. } | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Unauthorized => ErrorBody {
                error: "Authentication required".into(),
                details: None,
            },
            ApiError::Forbidden(detail)
            | ApiError::NotFound(detail)
            | ApiError::BadRequest(detail)
            | ApiError::Conflict(detail) => ErrorBody {
                error: detail,
                details: None,
            },
            ApiError::Upstream { message, details } => {
                tracing::error!(%details, "{message}");
                ErrorBody {
                    error: message,
                    details: Some(details),
                }
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                ErrorBody {
                    error: "An internal error occurred".into(),
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Database(e) => e.into(),
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::Closed => ApiError::Internal("database is closed".into()),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{entity_type} {id} not found"))
            }
            DatabaseError::ConstraintViolation(detail) => ApiError::Conflict(detail),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
