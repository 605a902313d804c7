//! Error types for the API client

use std::time::Duration;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, TLS, reset)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// No response within the request timeout
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Credentials could not be refreshed; the local session was cleared
    #[error("Session refresh failed: {0}")]
    RefreshFailed(#[from] RefreshError),

    /// Credential storage could not be read or written
    #[error("Credential storage error: {0}")]
    Storage(String),
}

/// Why a refresh operation failed
///
/// Cloneable so every request waiting on the same refresh observes the same
/// failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// The refresh endpoint answered with a non-success status
    #[error("refresh endpoint rejected the request ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// The refresh request never got a response
    #[error("refresh request failed: {0}")]
    Transport(String),

    /// The refresh request exceeded its timeout
    #[error("refresh request timed out after {0:?}")]
    Timeout(Duration),

    /// The response body was not the expected JSON
    #[error("refresh response could not be decoded: {0}")]
    Decode(String),

    /// The response carried no access token
    #[error("refresh response did not contain an access token")]
    MissingAccessToken,

    /// New credentials could not be persisted
    #[error("refreshed credentials could not be stored: {0}")]
    Storage(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// No response was received at all
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Timeout(_))
    }

    /// The server answered 401
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// The session could not be recovered and was cleared
    #[must_use]
    pub fn is_refresh_failure(&self) -> bool {
        matches!(self, Self::RefreshFailed(_))
    }

    /// HTTP status of an error response
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }
}
