//! Application error handling
//!
//! Every handler returns [`ApiResult`]. Lower layers have their own error
//! types ([`AuthError`], [`RepositoryError`]) which are folded into
//! [`ApiError`] here, so the HTTP mapping lives in exactly one place.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use blog_admin_shared::{AuthError, ErrorDetail, ErrorResponse};
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::repositories::RepositoryError;

/// Message returned for every authentication failure, whatever the cause
pub const UNAUTHENTICATED_MESSAGE: &str = "Could not validate credentials";
/// Message returned for failed logins
pub const BAD_LOGIN_MESSAGE: &str = "Incorrect email or password";
/// Message returned when an admin-only operation is attempted by a user
pub const ADMIN_REQUIRED_MESSAGE: &str = "Admin access required";

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Self action conflict: {0}")]
    SelfActionConflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    /// Validation failure not tied to a single field
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Validation failure on a named field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) | ApiError::SelfActionConflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::SelfActionConflict(_) => "SELF_ACTION_CONFLICT",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Forbidden => ApiError::Forbidden(ADMIN_REQUIRED_MESSAGE.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(BAD_LOGIN_MESSAGE.to_string()),
            // The client gets one message; the cause only goes to the log
            other => {
                warn!(reason = %other, "Rejected request authentication");
                ApiError::Unauthorized(UNAUTHENTICATED_MESSAGE.to_string())
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => ApiError::Conflict(msg),
            RepositoryError::NotFound(msg) => ApiError::NotFound(msg),
            RepositoryError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        // Report the first offending field, sorted for a stable response
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                ApiError::invalid_field(field.to_string(), message)
            }
            None => ApiError::validation("Invalid request"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let (message, field) = match self {
            ApiError::Validation { message, field } => (message, field),
            ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::Conflict(msg)
            | ApiError::SelfActionConflict(msg)
            | ApiError::BadRequest(msg) => (msg, None),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                ("An internal error occurred".to_string(), None)
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                ("A database error occurred".to_string(), None)
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
                details: None,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
