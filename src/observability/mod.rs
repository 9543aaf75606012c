//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! registry / dispatcher / lifecycle
//!     → tracing events (structured fields)
//!     → logging.rs subscriber (plain or JSON, EnvFilter)
//!     → test output
//! ```

pub mod logging;

pub use logging::init_logging;
