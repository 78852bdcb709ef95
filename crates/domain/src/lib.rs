//! # Open edX Domain
//!
//! Domain types shared by the Open edX REST client crates.
//!
//! This crate contains:
//! - Domain error type and Result definition
//! - Client configuration structures
//! - Endpoint constants
//! - Request types for enrollment and registration endpoints
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - No I/O; pure data and local validation

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
