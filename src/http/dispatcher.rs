//! Request dispatch against the sealed stub table.
//!
//! # Responsibilities
//! - Buffer the inbound body exactly once
//! - Canonicalize the request with the registered header names
//! - Render the matched stub, or an empty 404 on a miss
//!
//! # Design Decisions
//! - The table is read-only; dispatch never registers or removes stubs
//! - No retries or waiting: a miss resolves to 404 immediately
//! - The body stream is consumed by value and dropped on every path

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{request::Parts, StatusCode},
    response::Response,
};
use uuid::Uuid;

use crate::pattern::Canonicalizer;
use crate::stubs::StubTable;

/// Per-request progress through dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Not yet bound to a request.
    Idle,
    /// Request received, response being produced.
    Processing,
    /// Response written or not-found signalled.
    Completed,
}

/// Tracks one request through the state machine.
#[derive(Debug)]
struct Exchange {
    state: DispatchState,
    request_id: String,
}

impl Exchange {
    /// The request ID only labels log events; it is never written into the
    /// request or the response.
    fn bind(parts: &Parts) -> Self {
        let request_id = parts
            .headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
        let mut exchange = Self {
            state: DispatchState::Idle,
            request_id,
        };
        exchange.advance(DispatchState::Processing);
        exchange
    }

    fn advance(&mut self, next: DispatchState) {
        debug_assert!(
            matches!(
                (self.state, next),
                (DispatchState::Idle, DispatchState::Processing)
                    | (DispatchState::Processing, DispatchState::Completed)
            ),
            "illegal dispatch transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::trace!(
            request_id = %self.request_id,
            from = ?self.state,
            to = ?next,
            "Dispatch state"
        );
        self.state = next;
    }

    fn complete(mut self, response: Response) -> Response {
        self.advance(DispatchState::Completed);
        response
    }
}

/// Answers inbound requests from a sealed `StubTable`.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    stubs: Arc<StubTable>,
    max_body_bytes: usize,
}

impl Dispatcher {
    pub fn new(stubs: Arc<StubTable>, max_body_bytes: usize) -> Self {
        Self {
            stubs,
            max_body_bytes,
        }
    }

    pub fn stubs(&self) -> &StubTable {
        &self.stubs
    }

    /// Drive one request from `Idle` to `Completed`.
    pub async fn dispatch(&self, request: Request) -> Response {
        let (parts, body) = request.into_parts();
        let exchange = Exchange::bind(&parts);

        let body = match axum::body::to_bytes(body, self.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    request_id = %exchange.request_id,
                    path = %parts.uri.path(),
                    error = %e,
                    "Failed to read request body"
                );
                return exchange.complete(empty_response(StatusCode::BAD_REQUEST));
            }
        };

        let pattern = Canonicalizer::new(self.stubs.header_names()).canonicalize(&parts, &body);

        let response = match self.stubs.lookup(&pattern) {
            Some(stub) => {
                tracing::debug!(
                    request_id = %exchange.request_id,
                    method = %parts.method,
                    path = %pattern.path(),
                    parameters = %pattern.canonical_parameters(),
                    headers = ?pattern.headers(),
                    status = stub.response().status(),
                    "Stub matched"
                );
                stub.prepared().render()
            }
            None => {
                tracing::debug!(
                    request_id = %exchange.request_id,
                    method = %parts.method,
                    path = %pattern.path(),
                    parameters = %pattern.canonical_parameters(),
                    headers = ?pattern.headers(),
                    "No stub matched"
                );
                empty_response(StatusCode::NOT_FOUND)
            }
        };

        exchange.complete(response)
    }
}

fn empty_response(status: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

/// Axum handler installed as the router's only endpoint.
pub async fn dispatch_handler(State(dispatcher): State<Dispatcher>, request: Request) -> Response {
    dispatcher.dispatch(request).await
}
