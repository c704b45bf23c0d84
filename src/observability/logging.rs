//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, overridable by `RUST_LOG`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

pub use tracing_subscriber::util::TryInitError;

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(log_level: &str) -> String {
    format!("status_dispatcher={}", log_level.to_ascii_lowercase())
}

/// Install the global tracing subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(&config.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    }
}
