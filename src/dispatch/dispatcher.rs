//! Race/retry/timeout dispatcher.
//!
//! # State Machine (per call)
//! ```text
//! Started → Racing → Succeeded   (first branch success)
//!                  → Failed      (every branch failed before the deadline)
//!                  → Failed      (deadline after a branch failed)
//!                  → TimedOut    (deadline, or every branch faulted)
//! ```

use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::DispatcherConfig;
use crate::dispatch::race::{race, PendingBranch, RaceOutcome};
use crate::dispatch::types::{ApplicationStatusResponse, DispatchError};
use crate::lookup::StatusService;
use crate::observability::spans::{branch_span, dispatch_span};
use crate::resilience::{with_deadline, CancelSignal, RetryingCaller};

/// Resolves an application status by racing two redundant lookup services.
#[derive(Clone)]
pub struct StatusDispatcher {
    services: Vec<Arc<dyn StatusService>>,
    config: DispatcherConfig,
}

impl StatusDispatcher {
    /// Create a dispatcher over a pair of redundant services.
    pub fn new(
        primary: Arc<dyn StatusService>,
        secondary: Arc<dyn StatusService>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            services: vec![primary, secondary],
            config,
        }
    }

    /// Overall deadline applied to every call.
    pub fn deadline(&self) -> Duration {
        self.config.deadline()
    }

    /// Resolve the status of application `id`.
    ///
    /// Always returns a response: branch failures, deadline expiry and
    /// internal faults are all folded into `ApplicationStatusResponse::Failure`.
    pub async fn dispatch(&self, id: &str) -> ApplicationStatusResponse {
        let span = dispatch_span(Uuid::new_v4(), id);
        self.dispatch_inner(id).instrument(span).await
    }

    async fn dispatch_inner(&self, id: &str) -> ApplicationStatusResponse {
        let deadline = self.deadline();
        let started = Instant::now();
        let cancel = CancelSignal::new();

        tracing::info!(
            deadline_ms = deadline.as_millis() as u64,
            branches = self.services.len(),
            "Dispatch started"
        );

        let parent = tracing::Span::current();
        let pending: Vec<PendingBranch> = self
            .services
            .iter()
            .map(|service| {
                PendingBranch::spawn(
                    RetryingCaller::new(Arc::clone(service), id),
                    cancel.subscribe(),
                    branch_span(&parent, service.name()),
                )
            })
            .collect();

        let mut first_failure = None;
        let raced = AssertUnwindSafe(race(pending, &mut first_failure)).catch_unwind();
        let outcome = with_deadline(deadline, raced)
            .await
            .and_then(|raced| {
                raced.map_err(|panic| DispatchError::RaceFaulted(panic_message(panic.as_ref())))
            });

        // Stop whatever is still retrying.
        cancel.trigger();

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(RaceOutcome::Succeeded {
                service,
                application_id,
                status,
            }) => {
                tracing::info!(service = %service, status = %status, elapsed_ms, "Dispatch succeeded");
                ApplicationStatusResponse::Success {
                    id: application_id,
                    status,
                }
            }
            Ok(RaceOutcome::Failed(failure)) => {
                tracing::warn!(
                    service = %failure.service,
                    retry_count = failure.retry_count,
                    elapsed_ms,
                    "Dispatch failed: no branch succeeded"
                );
                ApplicationStatusResponse::Failure {
                    last_request_time: Some(failure.last_attempt_duration),
                    retry_count: failure.retry_count,
                }
            }
            Ok(RaceOutcome::Faulted) => {
                tracing::error!(elapsed_ms, "Dispatch failed: every branch faulted");
                ApplicationStatusResponse::timed_out()
            }
            Err(e @ DispatchError::DeadlineExceeded(_)) => match first_failure {
                // A branch already failed definitively; report it rather than a bare timeout.
                Some(failure) => {
                    tracing::warn!(
                        error = %e,
                        service = %failure.service,
                        retry_count = failure.retry_count,
                        elapsed_ms,
                        "Dispatch timed out after a branch failure"
                    );
                    ApplicationStatusResponse::Failure {
                        last_request_time: Some(failure.last_attempt_duration),
                        retry_count: failure.retry_count,
                    }
                }
                None => {
                    tracing::warn!(error = %e, elapsed_ms, "Dispatch timed out");
                    ApplicationStatusResponse::timed_out()
                }
            },
            Err(e) => {
                tracing::error!(error = %e, elapsed_ms, "Dispatch faulted");
                ApplicationStatusResponse::timed_out()
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl std::fmt::Debug for StatusDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.services.iter().map(|s| s.name()).collect();
        f.debug_struct("StatusDispatcher")
            .field("services", &names)
            .field("deadline_ms", &self.config.deadline_ms)
            .finish()
    }
}
