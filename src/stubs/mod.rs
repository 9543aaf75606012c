//! Stub storage subsystem.
//!
//! # Data Flow
//! ```text
//! register(pattern, response)
//!     → response.rs (validate, encode body, build header map)
//!     → registry.rs (StubRegistry, keyed by PatternKey)
//!
//! MockServer::start
//!     → StubRegistry::seal → Arc<StubTable> (read-only)
//!     → dispatcher lookups
//! ```

pub mod registry;
pub mod response;

use thiserror::Error;

pub use registry::{Stub, StubRegistry, StubTable};
pub use response::{PreparedResponse, StubResponse, DEFAULT_ENCODING};

/// Reasons a stub registration is refused.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The pattern has no path.
    #[error("pattern path is empty")]
    EmptyPath,

    /// The pattern path does not start with `/` and could never match.
    #[error("pattern path must start with '/': {0}")]
    RelativePath(String),

    /// A pattern header name is not a valid HTTP header name.
    #[error("invalid pattern header name: {0}")]
    InvalidHeaderName(String),

    /// The response status is outside 100..=999.
    #[error("invalid response status: {0}")]
    InvalidStatus(u16),

    #[error("invalid response header {name}: {value}")]
    InvalidResponseHeader { name: String, value: String },

    #[error("invalid content type: {0}")]
    InvalidContentType(String),

    /// A `Content-Type` was given both as a header and as the content type.
    #[error("content type {0} conflicts with a Content-Type response header")]
    ConflictingContentType(String),

    /// The encoding label is not known to the WHATWG encoding standard.
    #[error("unknown character encoding: {0}")]
    UnknownEncoding(String),

    /// Stubs are sealed while the server runs; stop it before registering.
    #[error("cannot register stubs while the server is running")]
    ServerRunning,
}
