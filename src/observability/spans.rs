//! Dispatch spans.
//!
//! Every dispatch runs inside one span; both branch tasks are instrumented
//! with a child span so retry events carry the dispatch id and service name.

use tracing::Span;
use uuid::Uuid;

/// Span covering one status resolution.
pub fn dispatch_span(dispatch_id: Uuid, application_id: &str) -> Span {
    tracing::info_span!("dispatch", %dispatch_id, application_id = %application_id)
}

/// Span covering one branch of a dispatch.
pub fn branch_span(parent: &Span, service: &str) -> Span {
    tracing::debug_span!(parent: parent, "branch", service = %service)
}
