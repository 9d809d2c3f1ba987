//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Produce a `PlayerConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("player.toml")).unwrap();
//! println!("tick rate: {} Hz", config.sync.tick_hz);
//! ```

mod parser;
mod validator;

pub use contracts::PlayerConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<PlayerConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load from `path` when given, else validated defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<PlayerConfig, ContractError> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => {
                let config = PlayerConfig::default();
                validator::validate(&config)?;
                Ok(config)
            }
        }
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<PlayerConfig, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Validate an already-built configuration
    pub fn validate(config: &PlayerConfig) -> Result<(), ContractError> {
        validator::validate(config)
    }

    /// Serialize PlayerConfig to TOML string
    pub fn to_toml(config: &PlayerConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize PlayerConfig to JSON string
    pub fn to_json(config: &PlayerConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(content: &str, format: ConfigFormat) -> Result<PlayerConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TOML: &str = r#"
[playback]
default_clip_duration_s = 60.0
seek_grace_ms = 300
playback_rates = [0.5, 1.0, 2.0]
default_rate = 2.0

[sync]
drift_floor_s = 0.4

[window]
near_end_prefetch_s = 5.0
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(SAMPLE_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let cfg = result.unwrap();
        assert_eq!(cfg.playback.default_rate, 2.0);
        assert_eq!(cfg.window.near_end_prefetch_s, 5.0);
    }

    #[test]
    fn test_round_trip_toml() {
        let cfg = ConfigLoader::load_from_str(SAMPLE_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&cfg).unwrap();
        let cfg2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(cfg, cfg2);
    }

    #[test]
    fn test_round_trip_json() {
        let cfg = ConfigLoader::load_from_str(SAMPLE_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&cfg).unwrap();
        let cfg2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(cfg, cfg2);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
[playback]
playback_rates = [1.0, 2.0]
default_rate = 0.25
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("default_rate"));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = ConfigLoader::load_from_path(Path::new("player.yaml"));
        assert!(matches!(result, Err(ContractError::ConfigParse { .. })));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let cfg = ConfigLoader::load_or_default(None).unwrap();
        assert_eq!(cfg, PlayerConfig::default());
    }
}
