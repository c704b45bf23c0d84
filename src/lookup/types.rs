//! Lookup outcome and error definitions.

use std::time::Duration;
use thiserror::Error;

/// Errors a lookup service can report as a terminal failure.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The service rejected the application id.
    #[error("Invalid application id: {0}")]
    InvalidId(String),

    /// The service could not be reached or is not serving.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The service answered but refused to report a status.
    #[error("Lookup rejected: {0}")]
    Rejected(String),

    /// Any other service-side error.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Result of a single attempt against one lookup service.
#[derive(Debug)]
pub enum LookupOutcome {
    /// Definitive answer.
    Success {
        application_id: String,
        status: String,
    },
    /// Answer not ready yet; the caller must wait `delay` and ask again.
    RetryAfter { delay: Duration },
    /// Terminal, non-retryable failure of this branch.
    Failure { cause: LookupError },
}

impl LookupOutcome {
    pub fn success(application_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self::Success {
            application_id: application_id.into(),
            status: status.into(),
        }
    }

    pub fn retry_after(delay: Duration) -> Self {
        Self::RetryAfter { delay }
    }

    pub fn failure(cause: LookupError) -> Self {
        Self::Failure { cause }
    }

    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::RetryAfter { .. } => "retry_after",
            Self::Failure { .. } => "failure",
        }
    }
}
