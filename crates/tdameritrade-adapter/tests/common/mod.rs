/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for tdameritrade-adapter tests

use std::sync::Arc;

use tdameritrade_adapter::{
    ClientConfig, OptionsMonitor, StaticTokenProvider, TdAmeritradeClient, TdAmeritradeOptions,
};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Mock access token for testing
pub fn mock_access_token() -> String {
    "td-access-token-abc123".to_string()
}

/// Client with a fixed token pointed at the mock server
#[allow(dead_code)]
pub fn static_client(server: &MockServer) -> TdAmeritradeClient {
    TdAmeritradeClient::with_config_and_base_url(
        ClientConfig::default(),
        &server.uri(),
        Arc::new(StaticTokenProvider::new(mock_access_token())),
    )
    .expect("client init")
}

/// Monitor seeded with the mock token and the mock server as base URL
#[allow(dead_code)]
pub fn monitor_for(server: &MockServer) -> OptionsMonitor {
    OptionsMonitor::new(TdAmeritradeOptions::with_token(mock_access_token()).base_url(server.uri()))
}
