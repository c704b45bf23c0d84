//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher launches a branch:
//!     → retries.rs (call, honor RetryAfter, call again ...)
//!     → cancel.rs (branch stops as soon as the dispatcher is done)
//! Dispatcher waits on the race:
//!     → timeouts.rs (single deadline over both branches)
//! ```
//!
//! # Design Decisions
//! - Backoff is server-directed; delays are honored verbatim, never clamped
//! - No local retry cap; the deadline bounds the total work
//! - Every suspension point is raced against cancellation

pub mod cancel;
pub mod retries;
pub mod timeouts;

pub use cancel::{CancelSignal, CancelToken};
pub use retries::RetryingCaller;
pub use timeouts::with_deadline;
