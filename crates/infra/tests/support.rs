#![allow(dead_code)]

use std::sync::Once;

use openedx_domain::{ClientConfig, TokenType};
use openedx_infra::OpenedxClient;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/oauth2/access_token";

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_test_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Token endpoint answering every grant with `token`.
pub async fn mount_token(server: &MockServer, token: &str, expires_in: i64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": token, "expires_in": expires_in})),
        )
        .mount(server)
        .await;
}

/// Client pointed at the stub server with bearer tokens.
pub fn client_for(server: &MockServer) -> OpenedxClient {
    init_test_tracing();
    OpenedxClient::new(server.uri(), "test", "secret").expect("client should build")
}

pub fn config_for(server: &MockServer, token_type: TokenType) -> ClientConfig {
    ClientConfig::new(server.uri(), "test", "secret")
        .with_token_type(token_type)
        .with_client_name("integration-tests")
}

/// Number of grant requests the stub server received.
pub async fn grant_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == TOKEN_PATH)
        .count()
}
