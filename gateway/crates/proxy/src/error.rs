//! Proxy Error Types
//!
//! This module provides proxy-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Proxy-specific result type alias
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Proxy-specific error variants
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Login request missing email or password
    #[error("Email and password are required.")]
    MissingCredentials,

    /// No valid credentials and refresh was impossible or rejected
    #[error("Unauthorized")]
    Unauthorized,

    /// Login response missing the expected token fields
    #[error("Invalid authentication response.")]
    InvalidAuthResponse,

    /// Upstream declared JSON but the body did not parse
    #[error("Invalid upstream response body")]
    InvalidUpstreamBody,

    /// Backend could not be reached (connect failure or timeout)
    #[error("Backend service unavailable.")]
    UpstreamUnavailable,

    /// Non-2xx upstream response relayed verbatim
    #[error("{detail}")]
    Upstream { status: StatusCode, detail: String },

    /// Inbound request body could not be buffered
    #[error("Request body too large")]
    BodyTooLarge,

    /// Login rate limit exceeded
    #[error("Too many login attempts")]
    RateLimited,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingCredentials => StatusCode::BAD_REQUEST,
            ProxyError::Unauthorized => StatusCode::UNAUTHORIZED,
            ProxyError::InvalidAuthResponse | ProxyError::InvalidUpstreamBody => {
                StatusCode::BAD_GATEWAY
            }
            ProxyError::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::Upstream { status, .. } => *status,
            ProxyError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::MissingCredentials => ErrorKind::BadRequest,
            ProxyError::Unauthorized => ErrorKind::Unauthorized,
            ProxyError::InvalidAuthResponse | ProxyError::InvalidUpstreamBody => {
                ErrorKind::BadGateway
            }
            ProxyError::UpstreamUnavailable => ErrorKind::ServiceUnavailable,
            ProxyError::Upstream { status, .. } if status.is_server_error() => {
                ErrorKind::BadGateway
            }
            ProxyError::Upstream { .. } => ErrorKind::BadRequest,
            ProxyError::BodyTooLarge => ErrorKind::PayloadTooLarge,
            ProxyError::RateLimited => ErrorKind::TooManyRequests,
            ProxyError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ProxyError::UpstreamUnavailable => {
                tracing::error!("Backend unreachable");
            }
            ProxyError::InvalidAuthResponse | ProxyError::InvalidUpstreamBody => {
                tracing::error!(error = %self, "Upstream contract violation");
            }
            ProxyError::Internal(msg) => {
                tracing::error!(message = %msg, "Proxy internal error");
            }
            ProxyError::RateLimited => {
                tracing::warn!("Login rate limit exceeded");
            }
            ProxyError::Unauthorized => {
                tracing::debug!("Request rejected as unauthorized");
            }
            _ => {
                tracing::debug!(error = %self, "Proxy error");
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        self.log();

        // Passthrough errors relay the upstream status and detail verbatim;
        // everything else goes through the unified AppError body.
        match self {
            ProxyError::Upstream { status, detail } => {
                (status, Json(serde_json::json!({ "detail": detail }))).into_response()
            }
            other => other.to_app_error().into_response(),
        }
    }
}

impl From<AppError> for ProxyError {
    fn from(err: AppError) -> Self {
        ProxyError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        // Connect failures and timeouts are the "backend down" path; anything
        // else (builder, redirect, body) is a bug worth surfacing as 500.
        if err.is_timeout() || err.is_connect() {
            ProxyError::UpstreamUnavailable
        } else {
            ProxyError::Internal(err.to_string())
        }
    }
}
