//! Router setup for the mock server.
//!
//! # Responsibilities
//! - Install the dispatcher as the handler for every method and path
//! - Wire up middleware (tracing, body limit)
//!
//! No layer here may add request or response headers: inbound headers feed
//! matching and responses must carry only what the stub declares.

use axum::Router;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::LimitsConfig;
use crate::http::dispatcher::{dispatch_handler, Dispatcher};

/// Build the Axum router with all middleware layers.
pub fn build_router(dispatcher: Dispatcher, limits: &LimitsConfig) -> Router {
    Router::new()
        .fallback(dispatch_handler)
        .with_state(dispatcher)
        .layer(RequestBodyLimitLayer::new(limits.max_body_bytes))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::RequestPattern;
    use crate::stubs::{StubRegistry, StubResponse};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router(registry: &StubRegistry) -> Router {
        let limits = LimitsConfig { max_body_bytes: 16 };
        let dispatcher = Dispatcher::new(Arc::new(registry.seal()), limits.max_body_bytes);
        build_router(dispatcher, &limits)
    }

    fn assert_only_framing_headers(response: &axum::response::Response) {
        for name in response.headers().keys() {
            assert_eq!(name, "content-length", "unexpected header {name}");
        }
    }

    #[tokio::test]
    async fn test_every_method_and_path_reaches_dispatcher() {
        let mut registry = StubRegistry::new();
        registry
            .register(RequestPattern::new("/"), StubResponse::new(204, ""))
            .unwrap();
        registry
            .register(RequestPattern::new("/a/b/c").param("x", "1"), StubResponse::new(200, "deep"))
            .unwrap();
        let app = router(&registry);

        let root = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(root.status(), StatusCode::NO_CONTENT);

        let deep = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/a/b/c?x=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deep.status(), StatusCode::OK);

        let missing = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_request_id_stub_does_not_disturb_plain_stubs() {
        let mut registry = StubRegistry::new();
        registry
            .register(
                RequestPattern::new("/traced").header("X-Request-Id", "abc"),
                StubResponse::new(200, "traced"),
            )
            .unwrap();
        registry
            .register(RequestPattern::new("/plain"), StubResponse::new(200, "plain"))
            .unwrap();
        let app = router(&registry);

        let plain = app
            .clone()
            .oneshot(Request::builder().uri("/plain").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(plain.status(), StatusCode::OK);
        assert_only_framing_headers(&plain);

        let traced = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/traced")
                    .header("x-request-id", "abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(traced.status(), StatusCode::OK);
        assert!(!traced.headers().contains_key("x-request-id"));

        let missing = app
            .oneshot(Request::builder().uri("/traced").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_only_framing_headers(&missing);
    }

    #[tokio::test]
    async fn test_declared_oversized_body_is_refused() {
        let app = router(&StubRegistry::new());
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/echo")
                    .header("content-length", "64")
                    .body(Body::from("x".repeat(64)))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
