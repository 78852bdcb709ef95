//! Cached client-credentials token with single-flight refresh
//!
//! The manager holds at most one token. Callers read it through a shared
//! lock; when it is missing or inside the early-expiry window one caller
//! performs the grant while the others wait on the refresh guard and then
//! reuse its result.

use std::sync::atomic::{AtomicU64, Ordering};

use openedx_domain::constants::ACCESS_TOKEN_EXPIRED_THRESHOLD_SECONDS;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use super::client::OAuthClientError;
use super::traits::OAuthClientTrait;
use super::types::TokenSet;
use crate::time::{Clock, SystemClock};

/// Error type for token manager operations
#[derive(Debug)]
pub enum TokenManagerError {
    /// The client-credentials grant failed
    GrantFailed(OAuthClientError),
}

impl TokenManagerError {
    /// Upstream HTTP status of the failed grant, if the endpoint answered
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::GrantFailed(err) => err.status(),
        }
    }

    /// Upstream body of the failed grant, if the endpoint answered
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::GrantFailed(err) => err.body(),
        }
    }
}

impl std::fmt::Display for TokenManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GrantFailed(e) => write!(f, "Access token request failed: {e}"),
        }
    }
}

impl std::error::Error for TokenManagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::GrantFailed(e) => Some(e),
        }
    }
}

impl From<OAuthClientError> for TokenManagerError {
    fn from(err: OAuthClientError) -> Self {
        Self::GrantFailed(err)
    }
}

/// Access token cache for one OAuth2 client
///
/// 1. Returns the cached token while it is outside the expiry threshold
/// 2. Requests a new token otherwise, at most one grant in flight
/// 3. Drops a token the server rejected so the next call fetches a new one
pub struct TokenManager<C: OAuthClientTrait + 'static, K: Clock = SystemClock> {
    oauth_client: C,
    clock: K,
    current_tokens: RwLock<Option<TokenSet>>,
    refresh_lock: Mutex<()>,
    refresh_threshold_seconds: i64,
    grants: AtomicU64,
}

impl<C: OAuthClientTrait + 'static> TokenManager<C, SystemClock> {
    /// Create a token manager on the system clock with the default 5 second
    /// expiry threshold
    #[must_use]
    pub fn new(oauth_client: C) -> Self {
        Self::with_clock(oauth_client, SystemClock)
    }
}

impl<C: OAuthClientTrait + 'static, K: Clock> TokenManager<C, K> {
    #[must_use]
    pub fn with_clock(oauth_client: C, clock: K) -> Self {
        Self {
            oauth_client,
            clock,
            current_tokens: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            refresh_threshold_seconds: ACCESS_TOKEN_EXPIRED_THRESHOLD_SECONDS,
            grants: AtomicU64::new(0),
        }
    }

    /// Get a usable token, requesting a new one if needed
    ///
    /// # Errors
    /// Returns `GrantFailed` if a grant was needed and did not succeed. The
    /// cache is left untouched in that case.
    pub async fn get_token_set(&self) -> Result<TokenSet, TokenManagerError> {
        if let Some(tokens) = self.cached_valid().await {
            return Ok(tokens);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited
        if let Some(tokens) = self.cached_valid().await {
            return Ok(tokens);
        }

        self.fetch_tokens().await
    }

    /// Get the current access token string, requesting one if needed
    ///
    /// # Errors
    /// See [`Self::get_token_set`].
    pub async fn get_access_token(&self) -> Result<String, TokenManagerError> {
        self.get_token_set().await.map(|t| t.access_token)
    }

    /// Current token set, without refreshing
    pub async fn get_tokens(&self) -> Option<TokenSet> {
        self.current_tokens.read().await.clone()
    }

    /// Drop the cached token if it is still `stale_token`
    ///
    /// Returns whether the cache was cleared. A token already replaced by a
    /// concurrent refresh is kept.
    pub async fn invalidate(&self, stale_token: &str) -> bool {
        let mut tokens = self.current_tokens.write().await;
        match tokens.as_ref() {
            Some(current) if current.access_token == stale_token => {
                *tokens = None;
                debug!("Cached access token invalidated");
                true
            }
            _ => false,
        }
    }

    pub async fn clear_tokens(&self) {
        *self.current_tokens.write().await = None;
        info!("Cached access token cleared");
    }

    /// Whether a token is cached and outside the expiry threshold
    pub async fn has_valid_token(&self) -> bool {
        self.cached_valid().await.is_some()
    }

    /// Seconds until the cached token expires, or None if nothing is cached
    pub async fn seconds_until_expiry(&self) -> Option<i64> {
        let tokens = self.current_tokens.read().await;
        tokens.as_ref().map(|t| t.seconds_until_expiry(self.clock.now()))
    }

    #[must_use]
    pub fn refresh_threshold(&self) -> i64 {
        self.refresh_threshold_seconds
    }

    /// Number of successful grants performed so far
    #[must_use]
    pub fn grant_count(&self) -> u64 {
        self.grants.load(Ordering::Relaxed)
    }

    async fn cached_valid(&self) -> Option<TokenSet> {
        let tokens = self.current_tokens.read().await;
        tokens
            .as_ref()
            .filter(|t| !t.is_expired(self.clock.now(), self.refresh_threshold_seconds))
            .cloned()
    }

    #[instrument(skip(self))]
    async fn fetch_tokens(&self) -> Result<TokenSet, TokenManagerError> {
        // Expiry is counted from before the request goes out
        let issued_at = self.clock.now();

        let response = self.oauth_client.request_token().await.map_err(|e| {
            warn!(error = %e, "Client credentials grant failed");
            TokenManagerError::GrantFailed(e)
        })?;

        let tokens = TokenSet::new(
            response.access_token,
            self.oauth_client.token_type(),
            response.expires_in,
            issued_at,
            response.scope,
        );

        *self.current_tokens.write().await = Some(tokens.clone());
        self.grants.fetch_add(1, Ordering::Relaxed);

        info!(expires_in = tokens.expires_in, "Obtained new access token");
        Ok(tokens)
    }
}
