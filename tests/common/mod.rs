//! Shared fixtures for dispatcher integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use status_dispatcher::config::{DispatcherConfig, ScriptStep};
use status_dispatcher::lookup::{LookupOutcome, SimulatedService, StatusService};
use status_dispatcher::StatusDispatcher;

pub fn retry(delay_ms: u64) -> ScriptStep {
    ScriptStep::RetryAfter { delay_ms }
}

pub fn approve(status: &str) -> ScriptStep {
    ScriptStep::Success {
        status: status.to_string(),
        application_id: None,
    }
}

pub fn fail(message: &str) -> ScriptStep {
    ScriptStep::Failure {
        message: message.to_string(),
    }
}

/// A scripted service; keep the `Arc` to inspect call counts.
pub fn scripted(name: &str, steps: Vec<ScriptStep>) -> Arc<SimulatedService> {
    Arc::new(SimulatedService::new(name, steps))
}

/// Dispatcher over two services with the given deadline.
pub fn dispatcher(
    primary: Arc<dyn StatusService>,
    secondary: Arc<dyn StatusService>,
    deadline: Duration,
) -> StatusDispatcher {
    StatusDispatcher::new(primary, secondary, DispatcherConfig::with_deadline(deadline))
}

/// A lookup that breaks its contract by panicking.
pub struct PanickingService;

impl StatusService for PanickingService {
    fn name(&self) -> &str {
        "panicking"
    }

    fn lookup(&self, id: &str) -> LookupOutcome {
        panic!("lookup for {} blew up", id);
    }
}
