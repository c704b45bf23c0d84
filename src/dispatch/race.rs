//! Unbiased race over branch completions.
//!
//! All branches sit in one homogeneous collection. Before every selection
//! the collection is rotated by a random offset, so when several branches
//! are ready at once none of them wins by position.
//!
//! Fairness is tested here, on branches that are already complete. Inside a
//! real dispatch, thread timing decides which branch becomes ready first, so
//! a dispatcher-level statistical test would measure the scheduler rather
//! than this selection.

use futures_util::future::select_all;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::dispatch::types::{BranchResult, DispatchError};
use crate::resilience::{CancelToken, RetryingCaller};

/// What a finished branch reports: its service name and result.
pub type BranchOutput = (Arc<str>, Result<BranchResult, DispatchError>);

/// A launched branch.
pub struct PendingBranch {
    service: Arc<str>,
    handle: JoinHandle<Result<BranchResult, DispatchError>>,
}

impl PendingBranch {
    /// Spawn `caller` as its own task.
    pub fn spawn(caller: RetryingCaller, mut cancel: CancelToken, span: tracing::Span) -> Self {
        let service: Arc<str> = Arc::from(caller.service_name());
        let handle = tokio::spawn(async move { caller.run(&mut cancel).await }.instrument(span));
        Self { service, handle }
    }
}

impl Future for PendingBranch {
    type Output = BranchOutput;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let joined = match Pin::new(&mut self.handle).poll(cx) {
            Poll::Ready(joined) => joined,
            Poll::Pending => return Poll::Pending,
        };

        let result = joined.unwrap_or_else(|e| {
            Err(DispatchError::BranchAborted {
                service: self.service.to_string(),
                reason: e.to_string(),
            })
        });
        Poll::Ready((Arc::clone(&self.service), result))
    }
}

/// A branch that finished with a definitive failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchFailure {
    pub service: Arc<str>,
    pub last_attempt_duration: Duration,
    pub retry_count: u32,
}

/// How a race ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceOutcome {
    /// A branch succeeded; the rest were abandoned.
    Succeeded {
        service: Arc<str>,
        application_id: String,
        status: String,
    },
    /// Every branch finished without success; the first reported failure.
    Failed(BranchFailure),
    /// Every branch faulted; nothing definitive was reported.
    Faulted,
}

/// Wait for the first successful branch.
///
/// A failed or faulted branch does not end the race while other branches
/// are still pending. The first definitive failure is written to
/// `first_failure` as soon as it arrives, so it outlives the race future if
/// the caller drops it at a deadline.
pub async fn race<F>(mut pending: Vec<F>, first_failure: &mut Option<BranchFailure>) -> RaceOutcome
where
    F: Future<Output = BranchOutput> + Unpin,
{
    while !pending.is_empty() {
        let offset = fastrand::usize(..pending.len());
        pending.rotate_left(offset);

        let ((service, result), _, rest) = select_all(pending).await;
        pending = rest;

        match result {
            Ok(BranchResult::Success { application_id, status }) => {
                return RaceOutcome::Succeeded {
                    service,
                    application_id,
                    status,
                };
            }
            Ok(BranchResult::Failure {
                last_attempt_duration,
                retry_count,
            }) => {
                tracing::warn!(
                    service = %service,
                    retry_count,
                    remaining = pending.len(),
                    "Branch failed, waiting for remaining branches"
                );
                first_failure.get_or_insert(BranchFailure {
                    service,
                    last_attempt_duration,
                    retry_count,
                });
            }
            Err(e) => {
                tracing::error!(service = %service, error = %e, "Branch faulted");
            }
        }
    }

    match first_failure.clone() {
        Some(failure) => RaceOutcome::Failed(failure),
        None => RaceOutcome::Faulted,
    }
}
