//! OAuth 2.0 types and structures
//!
//! Token, response and configuration types for the client-credentials grant
//! against the LMS OAuth2 provider.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use openedx_domain::constants::{ACCESS_TOKEN_SUFFIX, OAUTH2_ACCESS_TOKEN_PATH, OAUTH2_PATH};
use openedx_domain::{ClientConfig, TokenType};
use serde::{Deserialize, Serialize};

/// Access token with its absolute expiry
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,

    /// Kind of token, selects the Authorization header scheme
    pub token_type: TokenType,

    /// Lifetime reported by the token endpoint, in seconds
    pub expires_in: i64,

    /// Absolute expiration timestamp (UTC), `issued_at + expires_in`
    pub expires_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenSet {
    /// Create a `TokenSet` issued at `issued_at`
    ///
    /// `issued_at` should be captured before the grant request is sent so the
    /// computed expiry never outlives the real one.
    #[must_use]
    pub fn new(
        access_token: String,
        token_type: TokenType,
        expires_in: i64,
        issued_at: DateTime<Utc>,
        scope: Option<String>,
    ) -> Self {
        Self {
            access_token,
            token_type,
            expires_in,
            expires_at: expiry_after(issued_at, expires_in),
            scope,
        }
    }

    /// Check if the token is expired at `now`, or will be within
    /// `threshold_seconds`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, threshold_seconds: i64) -> bool {
        now + chrono::Duration::seconds(threshold_seconds) >= self.expires_at
    }

    /// Seconds left before `expires_at` (negative once expired)
    #[must_use]
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds()
    }

    /// Value for the `Authorization` header (`Bearer <token>` or `JWT <token>`)
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type.auth_scheme(), self.access_token)
    }
}

/// `issued_at + expires_in`, saturating at the latest representable instant
fn expiry_after(issued_at: DateTime<Utc>, expires_in: i64) -> DateTime<Utc> {
    chrono::Duration::try_seconds(expires_in.max(0))
        .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Token endpoint response (RFC 6749 §5.1)
///
/// Only `access_token` and `expires_in` are required; the LMS echoes
/// `token_type` and `scope` but they are not relied upon.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Settings for the client-credentials grant
#[derive(Clone)]
pub struct ClientCredentialsConfig {
    /// Full URL of the token endpoint
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub token_type: TokenType,
    pub user_agent: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl ClientCredentialsConfig {
    /// Derive grant settings from a client configuration
    #[must_use]
    pub fn from_client_config(config: &ClientConfig, user_agent: Option<String>) -> Self {
        Self {
            token_url: token_endpoint_url(&config.base_url, config.oauth_uri.as_deref()),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token_type: config.token_type,
            user_agent,
            timeout: config.request_timeout(),
            connect_timeout: config.connect_timeout(),
        }
    }

    /// Form fields sent to the token endpoint
    #[must_use]
    pub fn form_params(&self) -> [(&'static str, String); 4] {
        [
            ("grant_type", "client_credentials".to_string()),
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("token_type", self.token_type.to_string()),
        ]
    }
}

impl fmt::Debug for ClientCredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentialsConfig")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Resolve the OAuth2 token endpoint for an LMS
///
/// `oauth_uri` (if any) is appended to `base_url`. The result is then
/// completed to end in `/oauth2/access_token`:
/// - already ends in `/access_token`: kept as is
/// - ends in `/oauth2`: `/access_token` is appended
/// - otherwise: `/oauth2/access_token` is appended
#[must_use]
pub fn token_endpoint_url(base_url: &str, oauth_uri: Option<&str>) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let joined = match oauth_uri.map(str::trim).filter(|uri| !uri.is_empty()) {
        Some(uri) if uri.starts_with('/') => format!("{base}{uri}"),
        Some(uri) => format!("{base}/{uri}"),
        None => base.to_string(),
    };

    let stripped = joined.trim_end_matches('/');
    if stripped.ends_with(ACCESS_TOKEN_SUFFIX) {
        stripped.to_string()
    } else if stripped.ends_with(OAUTH2_PATH) {
        format!("{stripped}{ACCESS_TOKEN_SUFFIX}")
    } else {
        format!("{stripped}{OAUTH2_ACCESS_TOKEN_PATH}")
    }
}

/// OAuth error response from the authorization server (RFC 6749 §5.2)
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthErrorBody {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}
