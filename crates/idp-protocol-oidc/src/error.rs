//! OIDC protocol error types.
//!
//! Implements OAuth 2.0 and `OpenID` Connect error responses as defined in:
//! - RFC 6749 (OAuth 2.0)
//! - `OpenID` Connect Core 1.0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use idp_session::SessionError;
use idp_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OIDC protocol errors.
#[derive(Debug, Error)]
pub enum OidcError {
    /// Invalid request parameters.
    #[error("invalid_request: {0}")]
    InvalidRequest(String),

    /// Client is unknown.
    #[error("invalid_client: {0}")]
    InvalidClient(String),

    /// Access denied by resource owner.
    #[error("access_denied: {0}")]
    AccessDenied(String),

    /// Login required.
    #[error("login_required")]
    LoginRequired,

    /// Consent required.
    #[error("consent_required")]
    ConsentRequired,

    /// Token validation error.
    #[error("token validation failed: {0}")]
    TokenValidation(String),

    /// Client registry or consent store failure.
    #[error("storage error: {0}")]
    Store(#[from] StorageError),

    /// Session store failure.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OidcError {
    /// Returns the OAuth 2.0 error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidClient(_) => "invalid_client",
            Self::AccessDenied(_) => "access_denied",
            Self::LoginRequired => "login_required",
            Self::ConsentRequired => "consent_required",
            Self::TokenValidation(_) | Self::Store(_) | Self::Session(_) | Self::Internal(_) => {
                "server_error"
            }
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) | Self::LoginRequired | Self::ConsentRequired => 400,
            Self::InvalidClient(_) => 401,
            Self::AccessDenied(_) => 403,
            Self::TokenValidation(_) | Self::Store(_) | Self::Session(_) | Self::Internal(_) => 500,
        }
    }

    /// Creates an error response for OAuth 2.0/OIDC.
    ///
    /// Server errors carry a generic description so backend details stay
    /// in the logs.
    #[must_use]
    pub fn to_error_response(&self) -> ErrorResponse {
        let description = if self.http_status() >= 500 {
            "the request could not be processed".to_string()
        } else {
            self.to_string()
        };

        ErrorResponse {
            error: self.error_code().to_string(),
            error_description: Some(description),
            error_uri: None,
        }
    }
}

impl IntoResponse for OidcError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self, "OIDC request failed");
        } else {
            tracing::debug!(error = %self, "OIDC request rejected");
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// OAuth 2.0 error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,

    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,

    /// URI with more information about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_uri: Option<String>,
}

/// Result type for OIDC operations.
pub type OidcResult<T> = Result<T, OidcError>;
