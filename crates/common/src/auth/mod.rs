//! OAuth 2.0 client-credentials infrastructure
//!
//! Server-to-server authentication against the Open edX OAuth2 provider.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  TokenManager   │  Cached token, single-flight refresh
//! └────────┬────────┘
//!          │
//!          ├──► OAuthClient   (POST grant_type=client_credentials)
//!          │
//!          └──► Clock         (expiry checks)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use openedx_common::auth::{ClientCredentialsConfig, OAuthClient, TokenManager};
//! use openedx_domain::ClientConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("https://lms.example.com", "client-id", "client-secret");
//!     let grant = ClientCredentialsConfig::from_client_config(&config, None);
//!
//!     let manager = TokenManager::new(OAuthClient::new(grant)?);
//!     let token = manager.get_token_set().await?;
//!     println!("Authorization: {}", token.authorization_header());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: `TokenSet`, `TokenResponse`, grant settings and token
//!   endpoint resolution
//! - **[`client`]**: HTTP client for the token endpoint
//! - **[`token_manager`]**: token cache with expiry threshold

pub mod client;
pub mod token_manager;
pub mod traits;
pub mod types;

pub use client::{OAuthClient, OAuthClientError};
pub use token_manager::{TokenManager, TokenManagerError};
pub use traits::OAuthClientTrait;
pub use types::{token_endpoint_url, ClientCredentialsConfig, OAuthErrorBody, TokenResponse, TokenSet};
