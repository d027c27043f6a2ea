//! Authorization error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error code returned for every authorization failure. Clients use it as
/// the key for their localized "access denied" message.
pub const ACCESS_DENIED_CODE: &str = "ACCESS_DENIED";

/// Authorization failures at the operation boundary.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The role lacks the required level on a module.
    #[error("Access denied")]
    AccessDenied {
        /// Module that was checked. Never sent to the client.
        module: String,
    },

    /// Operation targets a club outside the caller's scope.
    #[error("Access denied")]
    OutOfScope,

    /// No identity could be resolved for the request.
    #[error("Access denied")]
    ContextUnavailable(String),

    /// The override store could not be read or written.
    #[error("Permission configuration unavailable")]
    ConfigurationUnavailable(String),

    /// Invalid request payload.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Internal failure unrelated to authorization.
    #[error("Internal server error")]
    Internal(String),
}

impl AccessError {
    /// Denial for `module`.
    #[must_use]
    pub fn denied(module: &str) -> Self {
        Self::AccessDenied {
            module: module.to_string(),
        }
    }

    /// Whether this error must be presented as a generic denial.
    #[must_use]
    pub const fn is_denial(&self) -> bool {
        matches!(
            self,
            Self::AccessDenied { .. } | Self::OutOfScope | Self::ContextUnavailable(_)
        )
    }
}

/// Error response body for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

impl From<sqlx::Error> for AccessError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(format!("database error: {err}"))
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) | Self::ConfigurationUnavailable(detail) = &self {
            tracing::error!(error = %detail, "Request failed");
        }

        let (status, code) = if self.is_denial() {
            (StatusCode::FORBIDDEN, ACCESS_DENIED_CODE)
        } else {
            match &self {
                Self::ConfigurationUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "CONFIGURATION_UNAVAILABLE")
                }
                Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            }
        };

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type for authorization-checked operations.
pub type AccessResult<T> = Result<T, AccessError>;
