//! API-specific error types
//!
//! Callers tell failures apart by variant: the LMS could not be reached
//! (`Transport`/`Timeout`), it refused our credentials (`Authentication`), or
//! it answered with another non-2xx status (`Http`). Business failures of the
//! registration endpoint are not errors and never show up here.

use serde_json::Value;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Credentials rejected by the token endpoint or the API
    Authentication,
    /// Server errors (5xx)
    Server,
    /// Client errors (4xx except auth) and invalid local input
    Client,
    /// Network/connection errors and timeouts
    Network,
    /// Configuration errors
    Config,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    /// `status` is `None` when the failure happened before any response
    /// (e.g. a malformed grant answer is still reported with its status)
    #[error("Authentication failed: {message}")]
    Authentication { status: Option<u16>, body: Option<Value>, message: String },

    /// `body` is the parsed JSON body, or the raw text as a JSON string
    #[error("{url} returned status {status}: {body}")]
    Http { status: u16, url: String, body: Value },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Authentication { .. } => ApiErrorCategory::Authentication,
            Self::Http { status, .. } if *status >= 500 => ApiErrorCategory::Server,
            Self::Http { .. } | Self::InvalidInput(_) => ApiErrorCategory::Client,
            Self::Decode(_) => ApiErrorCategory::Server,
            Self::Transport(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Upstream HTTP status, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Authentication { status, .. } => *status,
            _ => None,
        }
    }

    /// Upstream response body, if the server answered
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Http { body, .. } => Some(body),
            Self::Authentication { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// True for failures where no HTTP response was received
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}
