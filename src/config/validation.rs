//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (deadline > 0)
//! - Check the service pair (exactly two, unique names, non-empty scripts)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// Number of redundant lookup services the dispatcher races.
pub const REQUIRED_SERVICES: usize = 2;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("dispatcher.deadline_ms must be greater than zero")]
    ZeroDeadline,

    #[error("expected exactly {expected} services, found {found}")]
    ServiceCount { expected: usize, found: usize },

    #[error("services[{index}] has an empty name")]
    EmptyServiceName { index: usize },

    #[error("duplicate service name '{0}'")]
    DuplicateServiceName(String),

    #[error("service '{0}' has no scripted steps")]
    EmptyScript(String),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.dispatcher.deadline_ms == 0 {
        errors.push(ValidationError::ZeroDeadline);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.services.len() != REQUIRED_SERVICES {
        errors.push(ValidationError::ServiceCount {
            expected: REQUIRED_SERVICES,
            found: config.services.len(),
        });
    }

    let mut seen = HashSet::new();
    for (index, service) in config.services.iter().enumerate() {
        if service.name.trim().is_empty() {
            errors.push(ValidationError::EmptyServiceName { index });
        } else if !seen.insert(service.name.as_str()) {
            errors.push(ValidationError::DuplicateServiceName(service.name.clone()));
        }

        if service.steps.is_empty() {
            errors.push(ValidationError::EmptyScript(service.name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
