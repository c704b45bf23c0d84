//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Race/timeout settings.
    pub dispatcher: DispatcherConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Simulated lookup services driven by the CLI (exactly two).
    pub services: Vec<ServiceConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dispatcher: DispatcherConfig::default(),
            observability: ObservabilityConfig::default(),
            services: default_services(),
        }
    }
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Overall deadline for one status resolution, in milliseconds.
    pub deadline_ms: u64,
}

impl DispatcherConfig {
    /// Default deadline: 15 seconds.
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(15);

    /// Sub-millisecond remainders round up, so a non-zero deadline never
    /// becomes zero.
    pub fn with_deadline(deadline: Duration) -> Self {
        let millis = deadline.as_nanos().div_ceil(1_000_000);
        Self {
            deadline_ms: u64::try_from(millis).unwrap_or(u64::MAX),
        }
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::with_deadline(Self::DEFAULT_DEADLINE)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

/// A scripted lookup service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service identifier for logging.
    pub name: String,

    /// Blocking latency added to every lookup, in milliseconds.
    #[serde(default)]
    pub latency_ms: u64,

    /// Outcomes returned in order, one per lookup.
    pub steps: Vec<ScriptStep>,

    /// Keep answering with the last step once the script is exhausted.
    #[serde(default = "default_repeat_last")]
    pub repeat_last: bool,
}

/// One scripted lookup outcome.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Definitive status. The requested id is echoed unless overridden.
    Success {
        status: String,
        #[serde(default)]
        application_id: Option<String>,
    },
    /// Ask the caller to come back later.
    RetryAfter { delay_ms: u64 },
    /// Terminal failure.
    Failure { message: String },
}

fn default_repeat_last() -> bool {
    true
}

fn default_services() -> Vec<ServiceConfig> {
    vec![
        ServiceConfig {
            name: "status-primary".to_string(),
            latency_ms: 20,
            steps: vec![
                ScriptStep::RetryAfter { delay_ms: 50 },
                ScriptStep::Success {
                    status: "APPROVED".to_string(),
                    application_id: None,
                },
            ],
            repeat_last: true,
        },
        ServiceConfig {
            name: "status-secondary".to_string(),
            latency_ms: 5,
            steps: vec![ScriptStep::Failure {
                message: "status backend is read-only".to_string(),
            }],
            repeat_last: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.dispatcher.deadline(), Duration::from_secs(15));
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.observability.json);
        assert_eq!(config.services.len(), 2);
    }

    #[test]
    fn test_sub_millisecond_deadline_rounds_up() {
        let config = DispatcherConfig::with_deadline(Duration::from_micros(500));
        assert_eq!(config.deadline(), Duration::from_millis(1));

        let config = DispatcherConfig::with_deadline(Duration::from_micros(1_500));
        assert_eq!(config.deadline(), Duration::from_millis(2));

        let config = DispatcherConfig::with_deadline(Duration::from_millis(250));
        assert_eq!(config.deadline_ms, 250);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: AppConfig = toml::from_str("[dispatcher]\ndeadline_ms = 2500\n").unwrap();
        assert_eq!(config.dispatcher.deadline(), Duration::from_millis(2500));
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.services.len(), 2);
    }

    #[test]
    fn test_parse_scripted_services() {
        let raw = r#"
            [[services]]
            name = "a"
            latency_ms = 10
            steps = [
                { kind = "retry_after", delay_ms = 100 },
                { kind = "success", status = "APPROVED" },
            ]

            [[services]]
            name = "b"
            repeat_last = false
            steps = [{ kind = "failure", message = "boom" }]
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.services.len(), 2);
        assert_eq!(config.services[0].latency_ms, 10);
        assert!(config.services[0].repeat_last);
        assert_eq!(config.services[0].steps[0], ScriptStep::RetryAfter { delay_ms: 100 });
        assert!(!config.services[1].repeat_last);
        assert_eq!(
            config.services[1].steps[0],
            ScriptStep::Failure { message: "boom".into() }
        );
    }
}
