//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher, retrying callers, CLI:
//!     → spans.rs (one span per dispatch, tagged with a dispatch id)
//!     → logging.rs (structured log events to stdout)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON optional) for machine parsing
//! - Dispatch ID flows through both branches via span inheritance
//! - No metrics: callers observe outcomes through the returned response

pub mod logging;
pub mod spans;

pub use logging::init_logging;
