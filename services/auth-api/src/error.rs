//! Error types for the Auth API service.
//!
//! Every failure reaching the HTTP boundary goes through [`ApiError`], and
//! [`ApiError::into_response`] is the only place a cause becomes a status code
//! and body. Authentication failures of any kind share one body so clients
//! cannot tell a bad key from a bad token or an unknown account.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use warden_auth_core::{AuthError, ExternalKind, LoginError, PasswordError};

/// Message returned for every authentication failure
pub const UNAUTHENTICATED_MESSAGE: &str = "authentication required";

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No credential was presented where one is required
    #[error("missing credentials")]
    MissingCredentials,

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    fn kind(&self) -> ExternalKind {
        match self {
            Self::MissingCredentials => ExternalKind::Unauthenticated,
            Self::Auth(e) => e.external_kind(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ExternalKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ExternalKind::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
            ExternalKind::Conflict => StatusCode::CONFLICT,
            ExternalKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self.kind() {
            ExternalKind::Unauthenticated => "UNAUTHENTICATED",
            ExternalKind::InvalidInput => "INVALID_INPUT",
            ExternalKind::Conflict => "CONFLICT",
            ExternalKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Client-safe message. Only input validation text is passed through.
    fn message(&self) -> String {
        match self.kind() {
            ExternalKind::Unauthenticated => UNAUTHENTICATED_MESSAGE.to_string(),
            ExternalKind::InvalidInput => match self {
                Self::Auth(AuthError::Login(LoginError::InvalidInput(msg))) => msg.clone(),
                Self::Auth(AuthError::Password(e @ PasswordError::TooLong { .. })) => e.to_string(),
                _ => "invalid input".to_string(),
            },
            ExternalKind::Conflict => "email already registered".to_string(),
            ExternalKind::Internal => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self.kind() {
            ExternalKind::Internal => tracing::error!(error = %self, "Internal API error"),
            ExternalKind::Unauthenticated => tracing::debug!(reason = %self, "Request rejected"),
            ExternalKind::InvalidInput | ExternalKind::Conflict => {}
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code(),
                message: self.message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
