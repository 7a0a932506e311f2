//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::time::Duration;

use megaport::{Client, ClientConfig, Credentials, Environment};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Config pointed at the mock server, polling fast enough for tests
pub fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(Environment::Development)
        .with_base_url(server.uri())
        .with_credentials(Credentials::bearer(TOKEN))
        .with_poll_interval(Duration::from_millis(10))
}

pub fn client(server: &MockServer) -> Client {
    init_tracing();
    Client::with_config(config(server)).unwrap()
}

/// Wrap `data` in the API response envelope
pub fn envelope(data: Value) -> Value {
    json!({
        "message": "OK",
        "terms": "This data is subject to the Acceptable Use Policy",
        "data": data,
    })
}
