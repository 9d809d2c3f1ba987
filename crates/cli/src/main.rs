//! # Sentry Viewer CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Event catalog listing and read-status management
//! - Telemetry extraction from clip files
//! - Headless synchronized playback of an event

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_mark_read, run_play, run_scan, run_telemetry, run_validate, Context};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_observability(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Sentry Viewer starting"
    );

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::Scan(args) => run_scan(&Context::load(&cli)?, args),
        Commands::Telemetry(args) => run_telemetry(&Context::load(&cli)?, args),
        Commands::Play(args) => run_play(&Context::load(&cli)?, args).await,
        Commands::MarkRead(args) => run_mark_read(&Context::load(&cli)?, args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

fn init_observability(cli: &Cli) -> Result<()> {
    observability::init_with_config(observability_config(cli))
}

fn observability_config(cli: &Cli) -> observability::ObservabilityConfig {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    observability::ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: (cli.metrics_port != 0).then_some(cli.metrics_port),
        default_log_level: default_log_level.to_string(),
    }
}
