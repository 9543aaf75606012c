//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Plain output goes through the test writer so libtest captures it
//! - `RUST_LOG` wins over the configured filter

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed, which is the
/// normal case for every test after the first in a process.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().with_test_writer()).try_init()
    };
    installed.is_ok()
}
