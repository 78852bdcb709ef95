//! OAuth 2.0 client-credentials client
//!
//! Posts `grant_type=client_credentials` to the LMS token endpoint and parses
//! the token response. Caching lives in [`super::TokenManager`]; this client
//! performs exactly one grant per call.

use async_trait::async_trait;
use openedx_domain::TokenType;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use super::traits::OAuthClientTrait;
use super::types::{ClientCredentialsConfig, OAuthErrorBody, TokenResponse};

/// Error type for OAuth client operations
#[derive(Debug)]
pub enum OAuthClientError {
    /// Token endpoint could not be reached (DNS, connect, timeout)
    RequestFailed(reqwest::Error),

    /// Token endpoint answered with a non-2xx status
    Rejected { status: u16, body: String },

    /// 2xx answer that is not a usable token response
    InvalidResponse { status: u16, body: String, reason: String },

    /// HTTP client could not be built
    ConfigError(String),
}

impl OAuthClientError {
    /// Upstream HTTP status, when the endpoint answered
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } | Self::InvalidResponse { status, .. } => Some(*status),
            Self::RequestFailed(err) => err.status().map(|s| s.as_u16()),
            Self::ConfigError(_) => None,
        }
    }

    /// Upstream response body, when the endpoint answered
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Rejected { body, .. } | Self::InvalidResponse { body, .. } => Some(body),
            Self::RequestFailed(_) | Self::ConfigError(_) => None,
        }
    }
}

impl std::fmt::Display for OAuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => write!(f, "Token request failed: {e}"),
            Self::Rejected { status, body } => {
                match serde_json::from_str::<OAuthErrorBody>(body) {
                    Ok(oauth) => write!(f, "Token endpoint returned {status}: {oauth}"),
                    Err(_) => write!(f, "Token endpoint returned {status}: {body}"),
                }
            }
            Self::InvalidResponse { status, reason, .. } => {
                write!(f, "Invalid token response ({status}): {reason}")
            }
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for OAuthClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RequestFailed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OAuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err)
    }
}

/// Client-credentials grant client for the LMS OAuth2 provider
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: ClientCredentialsConfig,
    client: Client,
}

impl OAuthClient {
    /// Create a new OAuth client with the given configuration
    ///
    /// # Errors
    /// Returns `ConfigError` if the underlying HTTP client cannot be built
    /// (e.g. an invalid user agent).
    pub fn new(config: ClientCredentialsConfig) -> Result<Self, OAuthClientError> {
        let mut builder =
            Client::builder().timeout(config.timeout).connect_timeout(config.connect_timeout);

        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        let client = builder
            .build()
            .map_err(|e| OAuthClientError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Get the OAuth configuration
    #[must_use]
    pub fn config(&self) -> &ClientCredentialsConfig {
        &self.config
    }

    /// Full URL of the token endpoint
    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.config.token_url
    }
}

#[async_trait]
impl OAuthClientTrait for OAuthClient {
    #[instrument(skip(self), fields(token_url = %self.config.token_url, client_id = %self.config.client_id))]
    async fn request_token(&self) -> Result<TokenResponse, OAuthClientError> {
        debug!("Requesting access token with client credentials");

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&self.config.form_params())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Token endpoint rejected the client credentials");
            return Err(OAuthClientError::Rejected { status: status.as_u16(), body });
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            OAuthClientError::InvalidResponse {
                status: status.as_u16(),
                body: body.clone(),
                reason: e.to_string(),
            }
        })?;

        if token.access_token.is_empty() {
            return Err(OAuthClientError::InvalidResponse {
                status: status.as_u16(),
                body,
                reason: "access_token is empty".to_string(),
            });
        }

        debug!(expires_in = token.expires_in, "Received access token");
        Ok(token)
    }

    fn token_type(&self) -> TokenType {
        self.config.token_type
    }
}
