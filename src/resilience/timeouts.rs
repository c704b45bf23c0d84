//! Deadline enforcement.
//!
//! # Responsibilities
//! - Wrap the whole race with a single deadline
//! - Report expiry as a distinct error
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - The wrapped future is dropped on expiry; callers cancel branches

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::dispatch::types::DispatchError;

/// Run `future` to completion unless `deadline` elapses first.
pub async fn with_deadline<F>(deadline: Duration, future: F) -> Result<F::Output, DispatchError>
where
    F: Future,
{
    timeout(deadline, future)
        .await
        .map_err(|_| DispatchError::DeadlineExceeded(deadline))
}
