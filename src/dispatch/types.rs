//! Branch results, the public response type and internal dispatch errors.

use serde::{Serialize, Serializer};
use std::time::Duration;
use thiserror::Error;

/// Terminal result of one retrying branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchResult {
    Success {
        application_id: String,
        status: String,
    },
    /// `last_attempt_duration` is zero when the first attempt failed directly.
    Failure {
        last_attempt_duration: Duration,
        retry_count: u32,
    },
}

/// Public result of a status resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApplicationStatusResponse {
    Success {
        id: String,
        status: String,
    },
    /// `last_request_time` is `None` when the deadline expired (or the race
    /// faulted) rather than a branch reporting a failure.
    Failure {
        #[serde(rename = "last_request_time_ms", serialize_with = "serialize_millis")]
        last_request_time: Option<Duration>,
        retry_count: u32,
    },
}

impl ApplicationStatusResponse {
    /// Response used for deadline expiry and internal faults.
    pub fn timed_out() -> Self {
        Self::Failure {
            last_request_time: None,
            retry_count: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

fn serialize_millis<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(duration) => serializer.serialize_some(&(duration.as_millis() as u64)),
        None => serializer.serialize_none(),
    }
}

/// Internal errors of the race machinery. Never returned to callers of the
/// dispatcher; every variant is normalized into an `ApplicationStatusResponse`.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The dispatcher no longer needs this branch.
    #[error("Branch cancelled")]
    Cancelled,

    /// The blocking lookup panicked.
    #[error("Lookup on service '{service}' panicked")]
    LookupPanicked { service: String },

    /// The branch task ended without producing a result.
    #[error("Branch for service '{service}' aborted: {reason}")]
    BranchAborted { service: String, reason: String },

    /// No branch succeeded before the deadline.
    #[error("Deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    /// The race itself panicked.
    #[error("Race faulted: {0}")]
    RaceFaulted(String),
}
