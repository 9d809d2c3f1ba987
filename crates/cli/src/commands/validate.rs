//! `validate` command implementation.

use anyhow::{Context as _, Result};
use contracts::PlayerConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    default_rate: f64,
    playback_rates: Vec<f64>,
    tick_hz: u32,
    drift_threshold_at_default_rate: f64,
    prefetch_ahead: usize,
    release_behind: usize,
    store_path: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.file.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.file.display().to_string();

    if !args.file.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.file.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.file) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    default_rate: config.playback.default_rate,
                    playback_rates: config.playback.playback_rates.clone(),
                    tick_hz: config.sync.tick_hz,
                    drift_threshold_at_default_rate: config
                        .sync
                        .drift_threshold(config.playback.default_rate),
                    prefetch_ahead: config.window.prefetch_ahead,
                    release_behind: config.window.release_behind,
                    store_path: config.store.path.display().to_string(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Legal but probably unintended settings
fn collect_warnings(config: &PlayerConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.window.prefetch_ahead == 0 {
        warnings.push("window.prefetch_ahead is 0 - clip switches will always wait for a load".to_string());
    }
    if config.sync.tick_hz > 120 {
        warnings.push(format!(
            "sync.tick_hz = {} exceeds typical display refresh rates",
            config.sync.tick_hz
        ));
    }
    if config.playback.auto_seek_lead_s >= config.playback.default_clip_duration_s * 2.0 {
        warnings.push("playback.auto_seek_lead_s spans more than two clips".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Playback rates: {:?} (default {})", summary.playback_rates, summary.default_rate);
            println!("  Sync tick: {} Hz", summary.tick_hz);
            println!("  Drift threshold: {:.2}s", summary.drift_threshold_at_default_rate);
            println!(
                "  Window: {} ahead, release {} behind",
                summary.prefetch_ahead, summary.release_behind
            );
            println!("  Store: {}", summary.store_path);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_file_invalid() {
        let result = validate_config(&ValidateArgs {
            file: PathBuf::from("/no/such/sentry-viewer.toml"),
            json: false,
        });
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("File not found"));
    }

    #[test]
    fn test_valid_file_summarized() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("player.toml");
        std::fs::write(&file, "[sync]\ntick_hz = 240\n").unwrap();

        let result = validate_config(&ValidateArgs { file, json: true });
        assert!(result.valid);
        assert_eq!(result.summary.unwrap().tick_hz, 240);
        assert_eq!(result.warnings.unwrap().len(), 1);
    }

    #[test]
    fn test_rule_violation_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("player.toml");
        std::fs::write(&file, "[window]\nrelease_behind = 1\n").unwrap();

        let result = validate_config(&ValidateArgs { file, json: false });
        assert!(!result.valid);
        assert!(result.error.is_some());
    }
}
