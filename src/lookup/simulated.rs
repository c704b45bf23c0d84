//! Scripted lookup service.
//!
//! Replays a fixed sequence of outcomes, one per call. Used by the CLI
//! driver to exercise the dispatcher without real backends.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crate::config::schema::{ScriptStep, ServiceConfig};
use crate::lookup::service::StatusService;
use crate::lookup::types::{LookupError, LookupOutcome};

/// A lookup service that answers from a script.
#[derive(Debug)]
pub struct SimulatedService {
    name: String,
    latency: Duration,
    steps: Vec<ScriptStep>,
    repeat_last: bool,
    calls: AtomicU32,
}

impl SimulatedService {
    pub fn new(name: impl Into<String>, steps: Vec<ScriptStep>) -> Self {
        Self {
            name: name.into(),
            latency: Duration::ZERO,
            steps,
            repeat_last: true,
            calls: AtomicU32::new(0),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            name: config.name.clone(),
            latency: Duration::from_millis(config.latency_ms),
            steps: config.steps.clone(),
            repeat_last: config.repeat_last,
            calls: AtomicU32::new(0),
        }
    }

    /// Block for `latency` on every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Whether the last step answers every call past the end of the script.
    pub fn repeat_last(mut self, repeat: bool) -> Self {
        self.repeat_last = repeat;
        self
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn step_for(&self, call: usize) -> Option<&ScriptStep> {
        match self.steps.get(call) {
            Some(step) => Some(step),
            None if self.repeat_last => self.steps.last(),
            None => None,
        }
    }
}

impl StatusService for SimulatedService {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, id: &str) -> LookupOutcome {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;

        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        match self.step_for(call) {
            Some(step) => step.to_outcome(id),
            None => LookupOutcome::failure(LookupError::Unavailable(format!(
                "{} script exhausted after {} calls",
                self.name,
                self.steps.len()
            ))),
        }
    }
}

impl ScriptStep {
    /// Outcome this step produces for application `id`.
    pub fn to_outcome(&self, id: &str) -> LookupOutcome {
        match self {
            ScriptStep::Success { status, application_id } => LookupOutcome::success(
                application_id.as_deref().unwrap_or(id),
                status.as_str(),
            ),
            ScriptStep::RetryAfter { delay_ms } => {
                LookupOutcome::retry_after(Duration::from_millis(*delay_ms))
            }
            ScriptStep::Failure { message } => {
                LookupOutcome::failure(LookupError::Rejected(message.clone()))
            }
        }
    }
}
