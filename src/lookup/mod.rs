//! Status lookup services.
//!
//! # Data Flow
//! ```text
//! Dispatcher branch
//!     → service.rs (StatusService::lookup, blocking)
//!     → types.rs (LookupOutcome: Success | RetryAfter | Failure)
//!     → back to the retrying caller
//! ```
//!
//! # Design Decisions
//! - Services are external collaborators; only their contract lives here
//! - Lookups are blocking and run on the blocking pool, never on a worker thread
//! - simulated.rs replays scripted outcomes for the CLI driver and tests

pub mod service;
pub mod simulated;
pub mod types;

pub use service::StatusService;
pub use simulated::SimulatedService;
pub use types::{LookupError, LookupOutcome};
