//! Trait seam for the token endpoint
//!
//! Lets the token manager be tested against scripted grant results instead of
//! a live authorization server.

use async_trait::async_trait;
use openedx_domain::TokenType;

use super::client::OAuthClientError;
use super::types::TokenResponse;

/// Trait for OAuth client-credentials operations
#[async_trait]
pub trait OAuthClientTrait: Send + Sync {
    /// Perform one client-credentials grant
    ///
    /// # Errors
    /// Returns error if the endpoint is unreachable, rejects the credentials,
    /// or answers with a body lacking `access_token`/`expires_in`
    async fn request_token(&self) -> Result<TokenResponse, OAuthClientError>;

    /// Kind of token this client requests
    fn token_type(&self) -> TokenType;
}
