//! Retry logic.
//!
//! # Responsibilities
//! - Run one blocking lookup off the async worker threads
//! - Retry while the service answers `RetryAfter`, waiting exactly the
//!   requested delay
//! - Count retries and time the latest attempt
//!
//! # Design Decisions
//! - Failures are terminal for the branch; only `RetryAfter` is retried
//! - No retry cap; the dispatcher's deadline bounds the loop
//! - Backoff delays and in-flight attempts are raced against cancellation

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::dispatch::types::{BranchResult, DispatchError};
use crate::lookup::{LookupOutcome, StatusService};
use crate::resilience::cancel::CancelToken;

/// Drives one lookup service until it gives a definitive answer.
#[derive(Clone)]
pub struct RetryingCaller {
    service: Arc<dyn StatusService>,
    id: Arc<str>,
}

impl RetryingCaller {
    pub fn new(service: Arc<dyn StatusService>, id: &str) -> Self {
        Self {
            service,
            id: Arc::from(id),
        }
    }

    /// Name of the wrapped service.
    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    /// Call the service until it succeeds or fails.
    ///
    /// Returns `Err(DispatchError::Cancelled)` once `cancel` fires; no
    /// attempt is started after that.
    pub async fn run(&self, cancel: &mut CancelToken) -> Result<BranchResult, DispatchError> {
        let mut outcome = self.attempt(cancel).await?;
        let mut retry_count: u32 = 0;
        let mut last_attempt_duration = Duration::ZERO;

        loop {
            match outcome {
                LookupOutcome::Success { application_id, status } => {
                    tracing::debug!(retry_count, "Lookup succeeded");
                    return Ok(BranchResult::Success { application_id, status });
                }
                LookupOutcome::Failure { cause } => {
                    tracing::debug!(retry_count, error = %cause, "Lookup failed");
                    return Ok(BranchResult::Failure {
                        last_attempt_duration,
                        retry_count,
                    });
                }
                LookupOutcome::RetryAfter { delay } => {
                    tracing::debug!(
                        retry_count,
                        delay_ms = delay.as_millis() as u64,
                        "Lookup not ready, retrying after delay"
                    );

                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = cancel.cancelled() => return Err(DispatchError::Cancelled),
                    }

                    retry_count += 1;
                    let started = Instant::now();
                    outcome = self.attempt(cancel).await?;
                    last_attempt_duration = started.elapsed();
                }
            }
        }
    }

    /// One blocking lookup on the blocking pool.
    async fn attempt(&self, cancel: &mut CancelToken) -> Result<LookupOutcome, DispatchError> {
        if cancel.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }

        let service = Arc::clone(&self.service);
        let id = Arc::clone(&self.id);
        let call = tokio::task::spawn_blocking(move || service.lookup(&id));

        tokio::select! {
            joined = call => joined.map_err(|e| {
                if e.is_panic() {
                    DispatchError::LookupPanicked {
                        service: self.service_name().to_string(),
                    }
                } else {
                    DispatchError::BranchAborted {
                        service: self.service_name().to_string(),
                        reason: e.to_string(),
                    }
                }
            }),
            // The blocking call keeps running; its outcome is discarded.
            _ = cancel.cancelled() => Err(DispatchError::Cancelled),
        }
    }
}

impl std::fmt::Debug for RetryingCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingCaller")
            .field("service", &self.service.name())
            .field("id", &self.id)
            .finish()
    }
}
