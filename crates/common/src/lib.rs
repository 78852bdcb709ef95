//! Shared OAuth2 machinery for the Open edX REST client.
//!
//! - [`auth`]: client-credentials grant, token types and the cached
//!   [`auth::TokenManager`]
//! - [`time`]: wall-clock abstraction so token expiry can be tested without
//!   sleeping

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod time;

pub use auth::{
    token_endpoint_url, ClientCredentialsConfig, OAuthClient, OAuthClientError, OAuthClientTrait,
    TokenManager, TokenManagerError, TokenResponse, TokenSet,
};
pub use time::{Clock, MockClock, SystemClock};
