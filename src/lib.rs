//! In-process mock HTTP server for test suites.
//!
//! A test registers request patterns with canned responses, starts the
//! server, points the code under test at [`MockServer::url`], and asserts on
//! what comes back. Unmatched requests get an empty `404`.
//!
//! # Architecture Overview
//!
//! ```text
//!   test ──register──▶ StubRegistry ──seal on start──▶ Arc<StubTable>
//!                                                         │
//!   client ──▶ axum::serve ──▶ Dispatcher ──▶ Canonicalizer ┘ lookup
//!                                  │
//!   client ◀────────────── rendered stub, or 404
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pattern;
pub mod stubs;

pub use config::MockServerConfig;
pub use lifecycle::{MockServer, ServerError};
pub use pattern::{ParamValue, Parameters, PatternKey, RequestPattern};
pub use stubs::{RegistrationError, StubResponse};
