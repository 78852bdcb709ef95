//! Open edX LMS endpoint operations
//!
//! [`OpenedxClient`] shapes parameters for a handful of LMS REST endpoints and
//! hands them to the authenticated [`ApiClient`] session. Responses are
//! returned as the JSON the LMS sent.
//!
//! # Usage Example
//!
//! ```no_run
//! use openedx_infra::lms::OpenedxClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenedxClient::new("https://lms.example.com", "client-id", "client-secret")?;
//!
//!     for course in client.list_all_courses(Some("edX")).await? {
//!         println!("{}", course["id"]);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod courses;
mod enrollment;
mod registration;

use std::sync::Arc;

use openedx_common::auth::{ClientCredentialsConfig, OAuthClient, TokenManager};
use openedx_domain::{normalize_base_url, ClientConfig};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::api::{AccessTokenProvider, ApiClient, ApiError};
use crate::http::{user_agent, HttpClient};

/// Client for the Open edX LMS REST API
///
/// Cheap to clone; clones share the session and its cached token.
#[derive(Clone)]
pub struct OpenedxClient {
    api: Arc<ApiClient>,
}

impl OpenedxClient {
    /// Create a client with default token type and timeouts
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if the base URL or credentials are
    /// invalid.
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ApiError> {
        Self::from_config(&ClientConfig::new(base_url, client_id, client_secret))
    }

    /// Build the full client stack from a configuration
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if the configuration does not validate or
    /// an HTTP client cannot be built.
    #[instrument(skip(config), fields(base_url = %config.base_url, client_id = %config.client_id))]
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;

        let agent = user_agent(config.client_name.as_deref());

        let grant = ClientCredentialsConfig::from_client_config(config, Some(agent.clone()));
        debug!(token_url = %grant.token_url, "Resolved OAuth2 token endpoint");

        let oauth_client =
            OAuthClient::new(grant).map_err(|e| ApiError::Config(e.to_string()))?;
        let auth: Arc<dyn AccessTokenProvider> = Arc::new(TokenManager::new(oauth_client));

        let http_client = HttpClient::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(agent)
            .build()?;

        let api = ApiClient::new(config.normalized_base_url(), http_client, auth);
        Ok(Self::with_api_client(Arc::new(api)))
    }

    /// Wrap an existing session (e.g. one with a custom token provider)
    pub fn with_api_client(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Underlying authenticated session
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    /// Current access token, e.g. to read JWT claims
    ///
    /// # Errors
    /// Returns [`ApiError::Authentication`] if a new token is needed and the
    /// grant is rejected.
    pub async fn access_token(&self) -> Result<String, ApiError> {
        self.api.access_token().await
    }

    /// Authenticated request against any LMS endpoint
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn request(
        &self,
        method: Method,
        path_or_url: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        self.api.request(method, path_or_url, query, body).await
    }

    /// Endpoint URL on `site_url` if given, on the session base URL otherwise
    fn endpoint(&self, site_url: Option<&str>, path: &str) -> String {
        match site_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(site) => format!("{}{}", normalize_base_url(site), path),
            None => self.api.resolve_url(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use openedx_domain::constants::URL_BULK_ENROLL;

    use super::*;

    #[test]
    fn test_new_normalizes_base_url() {
        let client = OpenedxClient::new("https://lms.example.com/", "id", "secret").unwrap();
        assert_eq!(client.base_url(), "https://lms.example.com");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = OpenedxClient::new("lms.example.com", "id", "secret");
        assert!(matches!(result, Err(ApiError::Config(_))));

        let result = OpenedxClient::new("https://lms.example.com", "id", "");
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_endpoint_override() {
        let client = OpenedxClient::new("https://lms.example.com", "id", "secret").unwrap();

        assert_eq!(
            client.endpoint(None, URL_BULK_ENROLL),
            "https://lms.example.com/api/bulk_enroll/v1/bulk_enroll/"
        );
        assert_eq!(
            client.endpoint(Some("https://site.example.com/"), URL_BULK_ENROLL),
            "https://site.example.com/api/bulk_enroll/v1/bulk_enroll/"
        );
    }
}
