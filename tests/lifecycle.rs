//! Start/stop behaviour of the mock server.

use stub_server::{MockServer, MockServerConfig, RequestPattern, ServerError, StubResponse};
use tokio::net::TcpListener;

mod common;

#[tokio::test]
async fn test_start_twice_restarts() {
    let mut server = common::start_with_stubs(vec![(
        RequestPattern::new("/ping"),
        StubResponse::new(200, "pong"),
    )])
    .await;

    server.start().await.unwrap();
    assert!(server.is_running());

    let res = common::client().get(server.url("/ping")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "pong");

    server.stop().await.unwrap();
    server.stop().await.unwrap();
    assert!(!server.is_running());
}

#[tokio::test]
async fn test_restart_on_fixed_port() {
    let config = MockServerConfig::default().with_host("127.0.0.1").with_port(28391);
    let mut server = MockServer::new(config);
    server
        .register(RequestPattern::new("/ping"), StubResponse::new(200, "pong"))
        .unwrap();

    for _ in 0..3 {
        let addr = server.start().await.unwrap();
        assert_eq!(addr.port(), 28391);
        assert_eq!(server.url("ping"), "http://127.0.0.1:28391/ping");

        let res = common::client().get(server.url("ping")).send().await.unwrap();
        assert_eq!(res.status(), 200);

        server.stop().await.unwrap();
    }
}

#[tokio::test]
async fn test_stop_releases_port() {
    let mut server = MockServer::new(MockServerConfig::ephemeral());
    let addr = server.start().await.unwrap();
    server.stop().await.unwrap();

    let rebound = TcpListener::bind(addr).await;
    assert!(rebound.is_ok(), "port still held after stop");
}

#[tokio::test]
async fn test_stopped_server_refuses_connections() {
    let mut server = common::start_with_stubs(vec![(
        RequestPattern::new("/ping"),
        StubResponse::new(200, "pong"),
    )])
    .await;
    let url = server.url("/ping");
    server.stop().await.unwrap();

    assert!(common::client().get(url).send().await.is_err());
}

#[tokio::test]
async fn test_bind_failure_is_surfaced() {
    let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = occupied.local_addr().unwrap().port();

    let mut server = MockServer::new(MockServerConfig::ephemeral().with_port(port));
    let err = server.start().await.unwrap_err();
    assert!(matches!(err, ServerError::Bind { .. }), "{err}");
    assert!(!server.is_running());
}

#[tokio::test]
async fn test_dropping_running_server_releases_port() {
    let addr = {
        let mut server = MockServer::new(MockServerConfig::ephemeral());
        server.start().await.unwrap()
    };

    let mut rebound = None;
    for _ in 0..50 {
        if let Ok(listener) = TcpListener::bind(addr).await {
            rebound = Some(listener);
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert!(rebound.is_some(), "port still held after drop");
}
