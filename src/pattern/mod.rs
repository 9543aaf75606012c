//! Request pattern subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (test author):
//!     RequestPattern::new(path).param(..).header(..)
//!     → request_pattern.rs (canonical form kept on every mutation)
//!     → PatternKey (single percent-encoded string)
//!
//! Inbound request (dispatcher):
//!     method, uri, headers, buffered body
//!     → canonicalize.rs (query or raw body, registered headers only)
//!     → RequestPattern → PatternKey → registry lookup
//! ```
//!
//! # Design Decisions
//! - POST and PUT match on the raw body text, every other method on the
//!   decoded query string
//! - Blank parameter values collapse to `ParamValue::Absent`
//! - Header names are lowercased, header pairs sorted by (name, value)
//! - Headers are compared as a sorted multiset, never positionally

pub mod canonicalize;
pub mod request_pattern;

pub use canonicalize::{is_body_carrying, Canonicalizer};
pub use request_pattern::{ParamValue, Parameters, PatternKey, RequestPattern};
