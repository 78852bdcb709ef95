//! Client configuration

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::errors::{OpenedxError, Result};
use crate::impl_wire_code_conversions;

/// Kind of access token requested from the LMS token endpoint
///
/// The LMS issues either opaque bearer tokens or signed JWTs. The kind also
/// selects the `Authorization` header scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    #[default]
    Bearer,
    Jwt,
}

impl_wire_code_conversions!(TokenType {
    Bearer => "bearer",
    Jwt => "jwt",
});

impl TokenType {
    /// Scheme used in the `Authorization` header for this token kind
    #[must_use]
    pub fn auth_scheme(self) -> &'static str {
        match self {
            Self::Bearer => "Bearer",
            Self::Jwt => "JWT",
        }
    }
}

/// Connection settings for one LMS and one OAuth2 client
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// LMS base URL including scheme (e.g. `https://lms.example.com`)
    pub base_url: String,
    /// OAuth2 client id (created in `<lms>/admin/oauth2_provider/application/`)
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    #[serde(default)]
    pub token_type: TokenType,
    /// Optional path appended to `base_url` to reach the OAuth2 provider
    /// (e.g. `/edx/oauth2`)
    #[serde(default)]
    pub oauth_uri: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Application name reported in the User-Agent header
    #[serde(default)]
    pub client_name: Option<String>,
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

impl ClientConfig {
    /// Create a configuration with default token type and timeouts
    ///
    /// The base URL is normalized (trailing slashes removed).
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_type: TokenType::default(),
            oauth_uri: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            client_name: None,
        }
    }

    #[must_use]
    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = token_type;
        self
    }

    #[must_use]
    pub fn with_oauth_uri(mut self, oauth_uri: impl Into<String>) -> Self {
        self.oauth_uri = Some(oauth_uri.into());
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs().max(1);
        self
    }

    #[must_use]
    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    /// Base URL without trailing slashes
    #[must_use]
    pub fn normalized_base_url(&self) -> String {
        normalize_base_url(&self.base_url)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Check that the configuration can produce a working client
    ///
    /// # Errors
    /// Returns `OpenedxError::Config` if the base URL lacks an http(s) scheme,
    /// the client id or secret is empty, or a timeout is zero.
    pub fn validate(&self) -> Result<()> {
        let base = self.normalized_base_url();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(OpenedxError::Config(format!(
                "base_url must include the scheme (http:// or https://): {base:?}"
            )));
        }
        if self.client_id.trim().is_empty() {
            return Err(OpenedxError::Config("client_id must not be empty".to_string()));
        }
        if self.client_secret.is_empty() {
            return Err(OpenedxError::Config("client_secret must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_ms == 0 {
            return Err(OpenedxError::Config("timeouts must be greater than zero".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("oauth_uri", &self.oauth_uri)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("client_name", &self.client_name)
            .finish()
    }
}

/// Strip trailing slashes and surrounding whitespace from a base URL
#[must_use]
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_base_url() {
        let config = ClientConfig::new("https://lms.example.com//", "id", "secret");
        assert_eq!(config.base_url, "https://lms.example.com");
        assert_eq!(config.token_type, TokenType::Bearer);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_millis(3050));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ClientConfig::new("https://lms.example.com", "id", "super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_validate_rejects_missing_scheme() {
        let config = ClientConfig::new("lms.example.com", "id", "secret");
        assert!(matches!(config.validate(), Err(OpenedxError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        assert!(ClientConfig::new("https://lms.example.com", " ", "secret").validate().is_err());
        assert!(ClientConfig::new("https://lms.example.com", "id", "").validate().is_err());
        assert!(ClientConfig::new("https://lms.example.com", "id", "secret").validate().is_ok());
    }

    #[test]
    fn test_token_type_scheme_and_wire_code() {
        assert_eq!(TokenType::Bearer.auth_scheme(), "Bearer");
        assert_eq!(TokenType::Jwt.auth_scheme(), "JWT");
        assert_eq!(TokenType::Jwt.to_string(), "jwt");
        assert_eq!("BEARER".parse::<TokenType>(), Ok(TokenType::Bearer));
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let json = r#"{
            "base_url": "https://lms.example.com",
            "client_id": "id",
            "client_secret": "secret"
        }"#;
        let config: ClientConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.token_type, TokenType::Bearer);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.connect_timeout_ms, 3050);
        assert!(config.oauth_uri.is_none());
    }

    #[test]
    fn test_serialize_skips_secret() {
        let config = ClientConfig::new("https://lms.example.com", "id", "secret");
        let value = serde_json::to_value(&config).unwrap();
        assert!(value.get("client_secret").is_none());
    }
}
