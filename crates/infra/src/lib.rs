//! # Open edX Infrastructure
//!
//! I/O side of the Open edX REST client.
//!
//! This crate contains:
//! - HTTP transport with timeouts and the client User-Agent
//! - The authenticated LMS session (token handling, 401 retry)
//! - Endpoint operations: courses, bulk enrollment, registration
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Token acquisition comes from `openedx-common`
//! - Request types and validation come from `openedx-domain`

pub mod api;
pub mod config;
mod errors;
pub mod http;
pub mod lms;

// Re-export commonly used items
pub use api::{AccessTokenProvider, ApiClient, ApiError, ApiErrorCategory, ApiResponse};
pub use http::{HttpClient, HttpClientBuilder};
pub use lms::OpenedxClient;
