//! Application status dispatcher.
//!
//! Resolves an application's status by racing two redundant, blocking
//! lookup services under one deadline, retrying each as directed by the
//! service's own `RetryAfter` answers.

pub mod config;
pub mod dispatch;
pub mod lookup;
pub mod observability;
pub mod resilience;

pub use config::AppConfig;
pub use dispatch::{ApplicationStatusResponse, BlockingHandler, Handler, StatusDispatcher};
pub use lookup::{LookupError, LookupOutcome, StatusService};
