//! Command implementations.

mod mark_read;
mod play;
mod scan;
mod telemetry;
mod validate;

pub use mark_read::run_mark_read;
pub use play::run_play;
pub use scan::run_scan;
pub use telemetry::run_telemetry;
pub use validate::run_validate;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use contracts::PlayerConfig;
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct Context {
    pub config: PlayerConfig,
    pub store_path: PathBuf,
}

impl Context {
    pub fn load(cli: &Cli) -> Result<Self> {
        if let Some(path) = &cli.config {
            if !path.exists() {
                return Err(CliError::config_not_found(path).into());
            }
        }
        let config = config_loader::ConfigLoader::load_or_default(cli.config.as_deref())
            .context("Failed to load configuration")?;
        let store_path = cli.store.clone().unwrap_or_else(|| config.store.path.clone());
        debug!(store = %store_path.display(), "context ready");
        Ok(Self { config, store_path })
    }
}
