//! Lookup service boundary.

use crate::lookup::types::LookupOutcome;

/// A blocking application status lookup.
///
/// Implementations may block the calling thread for as long as the
/// underlying I/O takes; the dispatcher always calls `lookup` from Tokio's
/// blocking pool.
pub trait StatusService: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Query the status of application `id`.
    fn lookup(&self, id: &str) -> LookupOutcome;
}

