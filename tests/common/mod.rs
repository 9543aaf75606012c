//! Shared utilities for integration tests.

use stub_server::{MockServer, MockServerConfig, RequestPattern, StubResponse};

/// Start a server on an ephemeral loopback port with the given stubs.
pub async fn start_with_stubs(stubs: Vec<(RequestPattern, StubResponse)>) -> MockServer {
    stub_server::observability::init_logging(&Default::default());

    let mut server = MockServer::new(MockServerConfig::ephemeral());
    for (pattern, response) in stubs {
        server.register(pattern, response).unwrap();
    }
    server.start().await.unwrap();
    server
}

/// A client that never reuses connections or goes through a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
