//! Authenticated LMS session
//!
//! Every call obtains a token from the [`AccessTokenProvider`], sends the
//! request with the matching `Authorization` header and, on a 401, drops the
//! token and retries exactly once with a fresh one.

use std::sync::Arc;

use openedx_common::auth::TokenSet;
use openedx_domain::normalize_base_url;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::auth::AccessTokenProvider;
use super::errors::ApiError;
use crate::errors::parse_body;
use crate::http::HttpClient;

/// Status and parsed body of a completed request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub url: String,
    /// Parsed JSON; raw text is kept as a JSON string, an empty body is `null`
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body of a 2xx response, or [`ApiError::Http`] otherwise
    pub fn into_result(self) -> Result<Value, ApiError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(ApiError::Http { status: self.status.as_u16(), url: self.url, body: self.body })
        }
    }
}

/// API client bound to one LMS and one OAuth2 client
pub struct ApiClient {
    http_client: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// The base URL is normalized (trailing slashes removed).
    pub fn new(
        base_url: impl AsRef<str>,
        http_client: HttpClient,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self { http_client, auth, base_url: normalize_base_url(base_url.as_ref()) }
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current access token, requesting one if none is cached or it expired
    ///
    /// # Errors
    /// Returns [`ApiError::Authentication`] if the grant is rejected.
    pub async fn access_token(&self) -> Result<String, ApiError> {
        Ok(self.auth.token().await?.access_token)
    }

    /// Resolve `path_or_url` against the base URL
    ///
    /// Absolute http(s) URLs are used as is; anything else is treated as a
    /// path appended to the base URL.
    pub fn resolve_url(&self, path_or_url: &str) -> String {
        if let Ok(url) = Url::parse(path_or_url) {
            if matches!(url.scheme(), "http" | "https") {
                return path_or_url.to_string();
            }
        }

        if path_or_url.starts_with('/') {
            format!("{}{}", self.base_url, path_or_url)
        } else {
            format!("{}/{}", self.base_url, path_or_url)
        }
    }

    /// Send an authenticated request and return the parsed 2xx body
    ///
    /// # Errors
    /// - [`ApiError::Transport`]/[`ApiError::Timeout`] if the LMS is
    ///   unreachable
    /// - [`ApiError::Authentication`] if the grant fails or the retried call
    ///   is rejected again
    /// - [`ApiError::Http`] for any other non-2xx status
    /// - [`ApiError::Decode`] if a 2xx body is not JSON
    pub async fn request(
        &self,
        method: Method,
        path_or_url: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        self.execute(method, path_or_url, query, body).await?.into_result()
    }

    /// Send an authenticated request and return the response whatever its
    /// status, except for authentication failures
    ///
    /// # Errors
    /// Same as [`Self::request`], minus [`ApiError::Http`].
    #[instrument(skip(self, query, body), fields(method = %method, target = %path_or_url))]
    pub async fn execute(
        &self,
        method: Method,
        path_or_url: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.resolve_url(path_or_url);

        let token = self.auth.token().await?;
        let (status, text) = self.dispatch(&method, &url, query, body, &token).await?;

        let (status, text) = if status == StatusCode::UNAUTHORIZED {
            warn!(url = %url, "Access token rejected, retrying once with a new token");
            self.auth.invalidate(&token.access_token).await;

            let token = self.auth.token().await?;
            let (status, text) = self.dispatch(&method, &url, query, body, &token).await?;
            if status == StatusCode::UNAUTHORIZED {
                return Err(ApiError::Authentication {
                    status: Some(status.as_u16()),
                    body: Some(parse_body(&text)),
                    message: format!("{url} rejected a freshly issued access token"),
                });
            }
            (status, text)
        } else {
            (status, text)
        };

        let body = if status.is_success() {
            decode_success_body(&url, &text)?
        } else {
            parse_body(&text)
        };

        Ok(ApiResponse { status, url, body })
    }

    /// Execute a GET request and deserialize the 2xx body
    ///
    /// # Errors
    /// See [`Self::request`]; a body of the wrong shape is a
    /// [`ApiError::Decode`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        path_or_url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let value = self.request(Method::GET, path_or_url, query, None).await?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::Decode(format!("Unexpected response shape: {e}")))
    }

    /// Execute a POST request with a JSON body and return the 2xx body
    ///
    /// # Errors
    /// See [`Self::request`].
    pub async fn post(&self, path_or_url: &str, body: &Value) -> Result<Value, ApiError> {
        let result = self.request(Method::POST, path_or_url, &[], Some(body)).await?;
        info!(target = %path_or_url, "POST request successful");
        Ok(result)
    }

    async fn dispatch(
        &self,
        method: &Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
        token: &TokenSet,
    ) -> Result<(StatusCode, String), ApiError> {
        let mut request = self
            .http_client
            .request(method.clone(), url)
            .header(AUTHORIZATION, token.authorization_header())
            .header(ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.http_client.send(request).await?;
        let status = response.status();
        let text = response.text().await?;

        debug!(url = %url, status = status.as_u16(), "LMS responded");
        Ok((status, text))
    }
}

fn decode_success_body(url: &str, text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text)
        .map_err(|e| ApiError::Decode(format!("{url} returned a non-JSON body: {e}")))
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    http_client: Option<HttpClient>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl ApiClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Use a preconfigured HTTP client (timeouts, user agent)
    pub fn http_client(mut self, http_client: HttpClient) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Set the authentication provider
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if the base URL or auth provider is missing, or the
    /// default HTTP client cannot be built
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base_url =
            self.base_url.ok_or_else(|| ApiError::Config("Base URL not set".to_string()))?;
        let auth =
            self.auth.ok_or_else(|| ApiError::Config("Auth provider not set".to_string()))?;
        let http_client = match self.http_client {
            Some(client) => client,
            None => HttpClient::new()?,
        };

        Ok(ApiClient::new(base_url, http_client, auth))
    }
}
