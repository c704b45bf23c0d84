//! Application status dispatcher (CLI driver).
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                STATUS DISPATCHER                 │
//!                     │                                                  │
//!   perform_operation │  ┌──────────┐   ┌──────────────┐   ┌──────────┐  │
//!   ──────────────────┼─▶│ handler  │──▶│  dispatcher  │──▶│ branch 1 │──┼──▶ service 1
//!                     │  │(blocking)│   │ race+deadline│   │ retrying │  │
//!                     │  └──────────┘   │              │   └──────────┘  │
//!   ApplicationStatus │                 │              │   ┌──────────┐  │
//!   Response          │                 │              │──▶│ branch 2 │──┼──▶ service 2
//!   ◀─────────────────┼─────────────────┤              │   │ retrying │  │
//!                     │                 └──────────────┘   └──────────┘  │
//!                     │                                                  │
//!                     │  Cross-cutting: config, observability,           │
//!                     │  resilience (retries, cancel, timeouts)          │
//!                     └──────────────────────────────────────────────────┘
//! ```
//!
//! The binary wires two scripted services from the configuration file and
//! prints the response as JSON.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use status_dispatcher::config::validation::validate_config;
use status_dispatcher::config::{load_config, AppConfig, ConfigError};
use status_dispatcher::lookup::SimulatedService;
use status_dispatcher::observability::init_logging;
use status_dispatcher::{BlockingHandler, Handler, StatusDispatcher};

#[derive(Parser)]
#[command(name = "status-dispatcher")]
#[command(about = "Resolve an application status by racing two lookup services", long_about = None)]
struct Cli {
    /// Application id to resolve.
    id: String,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the overall deadline, in milliseconds.
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Override the log level.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    init_logging(&config.observability)?;

    tracing::info!(
        deadline_ms = config.dispatcher.deadline_ms,
        primary = %config.services[0].name,
        secondary = %config.services[1].name,
        "Configuration loaded"
    );

    let primary = Arc::new(SimulatedService::from_config(&config.services[0]));
    let secondary = Arc::new(SimulatedService::from_config(&config.services[1]));
    let dispatcher = StatusDispatcher::new(primary, secondary, config.dispatcher.clone());
    let handler = BlockingHandler::new(dispatcher)?;

    let response = handler.perform_operation(&cli.id);
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Load the config file (or defaults), apply CLI overrides and validate.
fn resolve_config(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    if let Some(deadline_ms) = cli.deadline_ms {
        config.dispatcher.deadline_ms = deadline_ms;
    }
    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
