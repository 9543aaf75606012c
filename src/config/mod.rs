//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! MockServerConfig::default()          config file (TOML)
//!     │                                    → loader.rs (parse & deserialize)
//!     │                                    → validation.rs (semantic checks)
//!     └──────────────┬─────────────────────┘
//!                    → MockServer::new(config)
//!                    → validated again on start()
//! ```
//!
//! # Design Decisions
//! - Host and port are explicit configuration, never process-wide constants
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{LimitsConfig, ListenerConfig, LoggingConfig, MockServerConfig};
pub use validation::{validate_config, ValidationError};
