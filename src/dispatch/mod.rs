//! Status dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! perform_operation(id)          (handler.rs, blocking)
//!     → StatusDispatcher::dispatch (dispatcher.rs)
//!         → spawn one RetryingCaller per service
//!         → race.rs (unbiased select over pending branches)
//!         → resilience::timeouts (single deadline)
//!     → ApplicationStatusResponse (types.rs)
//! ```
//!
//! # Design Decisions
//! - A branch failure never ends the race early; only success or the deadline does
//! - Branches are cancelled as soon as the outcome is known
//! - No error ever reaches the caller; every outcome maps to a response value

pub mod dispatcher;
pub mod handler;
pub mod race;
pub mod types;

pub use dispatcher::StatusDispatcher;
pub use handler::{BlockingHandler, Handler};
pub use types::{ApplicationStatusResponse, BranchResult, DispatchError};
