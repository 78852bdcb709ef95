//! Access token source for the API session
//!
//! The session only needs two things from the auth layer: a currently valid
//! token and a way to drop one the server rejected.

use async_trait::async_trait;
use openedx_common::auth::{OAuthClientTrait, TokenManager, TokenSet};
use openedx_common::time::Clock;

use super::errors::ApiError;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid token, requesting a new one if the cached one expired
    async fn token(&self) -> Result<TokenSet, ApiError>;

    /// Forget `stale_token` so the next [`Self::token`] call fetches a new one
    async fn invalidate(&self, stale_token: &str);
}

#[async_trait]
impl<C, K> AccessTokenProvider for TokenManager<C, K>
where
    C: OAuthClientTrait + 'static,
    K: Clock,
{
    async fn token(&self) -> Result<TokenSet, ApiError> {
        Ok(self.get_token_set().await?)
    }

    async fn invalidate(&self, stale_token: &str) {
        TokenManager::invalidate(self, stale_token).await;
    }
}
