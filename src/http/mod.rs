//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (axum::serve)
//!     → server.rs (request ID, trace span, body limit)
//!     → dispatcher.rs (buffer body, canonicalize, look up)
//!     → matched stub rendered, or empty 404
//!     → Send to client
//! ```

pub mod dispatcher;
pub mod server;

pub use dispatcher::{DispatchState, Dispatcher};
pub use server::build_router;
