//! Common test utilities for Last.fm client integration tests
//!
//! The client is blocking, so every call against the mock server runs on
//! the runtime's blocking pool while wiremock keeps serving.

#![allow(unused_imports)]
#![allow(dead_code)]

pub use tapedeck_test_utils::{fixtures, MockLastfmServer};

use tapedeck_lastfm::{ClientConfig, LastfmClient};

pub const API_KEY: &str = "integration_api_key";
pub const API_SECRET: &str = "integration_secret";

/// Configuration pointing at the mock server
pub fn config_for(server: &MockLastfmServer) -> ClientConfig {
    ClientConfig::new(API_KEY, API_SECRET).with_api_url(server.api_url())
}

/// Run blocking client code off the async worker threads
pub async fn blocking<F, R>(f: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

/// Build an HTTP-backed client and log in against the mock server
pub async fn logged_in_client(server: &MockLastfmServer) -> LastfmClient {
    server.mock_login_success("listener", "session-key-1").await;
    let config = config_for(server);
    blocking(move || {
        let mut client = LastfmClient::from_config(config).unwrap();
        client.login("listener", "hunter2").unwrap();
        client
    })
    .await
}
