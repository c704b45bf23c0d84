//! Synchronous entry point.
//!
//! Request handlers that are not async call `perform_operation`, which
//! blocks the calling thread on the async dispatcher.

use tokio::runtime::{Builder, Handle, Runtime};

use crate::dispatch::dispatcher::StatusDispatcher;
use crate::dispatch::types::ApplicationStatusResponse;

/// Blocking status resolution.
pub trait Handler {
    fn perform_operation(&self, id: &str) -> ApplicationStatusResponse;
}

/// `Handler` that owns a Tokio runtime for the dispatcher to run on.
///
/// Safe to call from plain threads and from inside another Tokio runtime;
/// in the latter case the dispatch is driven from a scoped helper thread.
pub struct BlockingHandler {
    dispatcher: StatusDispatcher,
    // Always `Some` until `drop` takes it to shut down in the background.
    runtime: Option<Runtime>,
}

impl BlockingHandler {
    /// Build a handler with its own multi-threaded runtime.
    pub fn new(dispatcher: StatusDispatcher) -> std::io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .enable_all()
            .thread_name("status-dispatch")
            .build()?;
        Ok(Self::with_runtime(dispatcher, runtime))
    }

    /// Build a handler on a caller-supplied runtime.
    pub fn with_runtime(dispatcher: StatusDispatcher, runtime: Runtime) -> Self {
        Self {
            dispatcher,
            runtime: Some(runtime),
        }
    }

    pub fn dispatcher(&self) -> &StatusDispatcher {
        &self.dispatcher
    }
}

impl Handler for BlockingHandler {
    fn perform_operation(&self, id: &str) -> ApplicationStatusResponse {
        let Some(runtime) = &self.runtime else {
            return ApplicationStatusResponse::timed_out();
        };

        if Handle::try_current().is_err() {
            return runtime.block_on(self.dispatcher.dispatch(id));
        }

        // `block_on` panics on a thread that already drives a runtime.
        tracing::debug!("perform_operation called inside a runtime, dispatching from helper thread");
        std::thread::scope(|scope| {
            scope
                .spawn(|| runtime.block_on(self.dispatcher.dispatch(id)))
                .join()
        })
        .unwrap_or_else(|_| {
            tracing::error!("Dispatch helper thread panicked");
            ApplicationStatusResponse::timed_out()
        })
    }
}

impl Drop for BlockingHandler {
    fn drop(&mut self) {
        // Abandoned lookups may still be blocking; don't wait for them.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
