//! HTTP transport shared by the API session

mod client;

pub use client::{HttpClient, HttpClientBuilder};
use openedx_domain::constants::{CLIENT_PRODUCT_NAME, UNKNOWN_CLIENT_NAME};

/// User-Agent sent with every request: `openedx-rest-client/<version> <client>`
pub fn user_agent(client_name: Option<&str>) -> String {
    let client = client_name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or(UNKNOWN_CLIENT_NAME);
    format!("{CLIENT_PRODUCT_NAME}/{} {client}", env!("CARGO_PKG_VERSION"))
}
