//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! start():
//!     stop if running → validate config → bind listener
//!     → seal registry → spawn axum::serve with Shutdown signal
//!
//! stop():
//!     trigger Shutdown → stop accepting → in-flight requests finish
//!     → serve task joins → port released
//! ```
//!
//! # Design Decisions
//! - start/stop are idempotent; start on a running server restarts it
//! - Registration is refused while running (the table is sealed)
//! - Dropping a running server triggers shutdown

pub mod server;
pub mod shutdown;

pub use server::{MockServer, ServerError};
pub use shutdown::Shutdown;
