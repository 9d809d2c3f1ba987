//! Config validation
//!
//! Rules:
//! - field ranges declared on the contract structs (`validator` derive)
//! - playback rates finite, positive, ascending, and containing `default_rate`
//! - `release_behind` keeps at least the clip directly behind the active one
//! - `end_epsilon_s` smaller than the default clip duration

use contracts::{ContractError, PlayerConfig};
use ::validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Validate a PlayerConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &PlayerConfig) -> Result<(), ContractError> {
    validate_ranges(config)?;
    validate_playback_rates(config)?;
    validate_window(config)?;
    validate_epsilon(config)?;
    Ok(())
}

/// Declarative range checks
fn validate_ranges(config: &PlayerConfig) -> Result<(), ContractError> {
    config.validate().map_err(|errors| {
        let (field, message) = first_error(&errors, String::new());
        ContractError::config_validation(field, message)
    })
}

/// Walk nested validation errors down to the first leaf, building a dotted path
fn first_error(errors: &ValidationErrors, prefix: String) -> (String, String) {
    for (name, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(err) = list.first() {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", err.code));
                    return (path, message);
                }
            }
            ValidationErrorsKind::Struct(inner) => return first_error(inner, path),
            ValidationErrorsKind::List(items) => {
                if let Some((idx, inner)) = items.iter().next() {
                    return first_error(inner, format!("{path}[{idx}]"));
                }
            }
        }
    }
    (prefix, "invalid value".to_string())
}

fn validate_playback_rates(config: &PlayerConfig) -> Result<(), ContractError> {
    let playback = &config.playback;

    for (idx, rate) in playback.playback_rates.iter().enumerate() {
        if !rate.is_finite() || *rate <= 0.0 {
            return Err(ContractError::config_validation(
                format!("playback.playback_rates[{idx}]"),
                format!("rate must be finite and > 0, got {rate}"),
            ));
        }
    }

    if playback.playback_rates.windows(2).any(|w| w[0] >= w[1]) {
        return Err(ContractError::config_validation(
            "playback.playback_rates",
            "rates must be strictly ascending",
        ));
    }

    if !playback
        .playback_rates
        .iter()
        .any(|r| (r - playback.default_rate).abs() < f64::EPSILON)
    {
        return Err(ContractError::config_validation(
            "playback.default_rate",
            format!(
                "default_rate ({}) must be one of playback_rates {:?}",
                playback.default_rate, playback.playback_rates
            ),
        ));
    }

    Ok(())
}

fn validate_window(config: &PlayerConfig) -> Result<(), ContractError> {
    if config.window.release_behind < 2 {
        return Err(ContractError::config_validation(
            "window.release_behind",
            format!(
                "release_behind must be >= 2 so the previous clip stays cached, got {}",
                config.window.release_behind
            ),
        ));
    }
    Ok(())
}

fn validate_epsilon(config: &PlayerConfig) -> Result<(), ContractError> {
    let playback = &config.playback;
    if playback.end_epsilon_s >= playback.default_clip_duration_s {
        return Err(ContractError::config_validation(
            "playback.end_epsilon_s",
            format!(
                "end_epsilon_s ({}) must be < default_clip_duration_s ({})",
                playback.end_epsilon_s, playback.default_clip_duration_s
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate(&PlayerConfig::default()).is_ok());
    }

    #[test]
    fn test_default_rate_must_be_listed() {
        let mut cfg = PlayerConfig::default();
        cfg.playback.default_rate = 3.0;
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("playback.default_rate"));
    }

    #[test]
    fn test_rates_must_ascend() {
        let mut cfg = PlayerConfig::default();
        cfg.playback.playback_rates = vec![1.0, 0.5];
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("ascending"));
    }

    #[test]
    fn test_range_error_reports_nested_path() {
        let mut cfg = PlayerConfig::default();
        cfg.telemetry.fps = 0.0;
        match validate(&cfg).unwrap_err() {
            ContractError::ConfigValidation { field, .. } => {
                assert_eq!(field, "telemetry.fps");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_release_behind_floor() {
        let mut cfg = PlayerConfig::default();
        cfg.window.release_behind = 1;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_epsilon_below_clip_duration() {
        let mut cfg = PlayerConfig::default();
        cfg.playback.default_clip_duration_s = 0.05;
        assert!(validate(&cfg).is_err());
    }
}
