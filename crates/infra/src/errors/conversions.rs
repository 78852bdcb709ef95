//! Conversions from domain, auth and transport errors into [`ApiError`].

use openedx_common::auth::{OAuthClientError, TokenManagerError};
use openedx_domain::OpenedxError;
use reqwest::Error as HttpError;
use serde_json::Value;

use crate::api::ApiError;

/// Parse a response body as JSON, keeping non-JSON text as a JSON string
pub(crate) fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        if err.is_timeout() {
            return ApiError::Timeout(err.to_string());
        }

        if err.is_builder() {
            return ApiError::Config(format!("Invalid HTTP request: {err}"));
        }

        if err.is_decode() {
            return ApiError::Decode(err.to_string());
        }

        ApiError::Transport(err.to_string())
    }
}

/* -------------------------------------------------------------------------- */
/* TokenManagerError → ApiError */
/* -------------------------------------------------------------------------- */

impl From<TokenManagerError> for ApiError {
    fn from(err: TokenManagerError) -> Self {
        let message = err.to_string();
        match err {
            TokenManagerError::GrantFailed(OAuthClientError::RequestFailed(source)) => {
                source.into()
            }
            TokenManagerError::GrantFailed(OAuthClientError::ConfigError(msg)) => {
                ApiError::Config(msg)
            }
            TokenManagerError::GrantFailed(
                OAuthClientError::Rejected { status, body }
                | OAuthClientError::InvalidResponse { status, body, .. },
            ) => ApiError::Authentication {
                status: Some(status),
                body: Some(parse_body(&body)),
                message,
            },
        }
    }
}

/* -------------------------------------------------------------------------- */
/* OpenedxError → ApiError */
/* -------------------------------------------------------------------------- */

impl From<OpenedxError> for ApiError {
    fn from(err: OpenedxError) -> Self {
        match err {
            OpenedxError::InvalidInput(msg) | OpenedxError::Internal(msg) => {
                ApiError::InvalidInput(msg)
            }
            OpenedxError::Config(msg) => ApiError::Config(msg),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
