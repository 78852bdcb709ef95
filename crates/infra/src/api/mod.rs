//! Authenticated session for the Open edX LMS
//!
//! # Architecture
//!
//! - Uses [`crate::http::HttpClient`] (no direct reqwest)
//! - OAuth2 client-credentials token via [`AccessTokenProvider`]
//! - One re-authentication attempt on 401, no other retries

pub mod auth;
pub mod client;
pub mod errors;

pub use auth::AccessTokenProvider;
pub use client::{ApiClient, ApiClientBuilder, ApiResponse};
pub use errors::{ApiError, ApiErrorCategory};
