//! PlayerConfig - runtime tuning shared across crates
//!
//! Field-level ranges are declared with `validator`; cross-field rules live in
//! `config_loader`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Top-level player configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PlayerConfig {
    #[validate(nested)]
    pub playback: PlaybackConfig,

    #[validate(nested)]
    pub sync: SyncConfig,

    #[validate(nested)]
    pub window: WindowConfig,

    #[validate(nested)]
    pub telemetry: TelemetryConfig,

    pub store: StoreConfig,
}

/// Timeline and transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Duration assumed for a clip until probing reports the real one
    #[validate(range(exclusive_min = 0.0))]
    pub default_clip_duration_s: f64,

    /// Last-clip clamp margin: global positions map to at most `duration - epsilon`
    #[validate(range(min = 0.0, max = 1.0))]
    pub end_epsilon_s: f64,

    /// Drift correction is suppressed this long after a seek
    #[validate(range(max = 5000))]
    pub seek_grace_ms: u64,

    /// Auto-seek lands this many seconds before the trigger
    #[validate(range(min = 0.0))]
    pub auto_seek_lead_s: f64,

    /// Selectable rates, ascending
    #[validate(length(min = 1))]
    pub playback_rates: Vec<f64>,

    /// Rate used when nothing was persisted
    #[validate(range(exclusive_min = 0.0))]
    pub default_rate: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_clip_duration_s: 60.0,
            end_epsilon_s: 0.1,
            seek_grace_ms: 250,
            auto_seek_lead_s: 60.0,
            playback_rates: vec![0.25, 0.5, 1.0, 2.0, 4.0],
            default_rate: 1.0,
        }
    }
}

/// Drift loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SyncConfig {
    /// Drift threshold floor in seconds
    #[validate(range(exclusive_min = 0.0))]
    pub drift_floor_s: f64,

    /// Drift threshold grows with rate: `max(floor, factor * rate)`
    #[validate(range(min = 0.0))]
    pub drift_rate_factor: f64,

    /// Consecutive stalled ticks tolerated before a nudge
    #[validate(range(min = 1))]
    pub stall_tick_limit: u32,

    /// Nudge applied to a stalled master
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub stall_nudge_s: f64,

    /// A freshly loaded track further than this from the target is re-seeked
    #[validate(range(min = 0.0))]
    pub reload_tolerance_s: f64,

    /// Drift loop frequency
    #[validate(range(min = 1, max = 240))]
    pub tick_hz: u32,

    /// Retained diagnostics entries
    #[validate(range(min = 1))]
    pub diagnostics_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            drift_floor_s: 0.5,
            drift_rate_factor: 0.3,
            stall_tick_limit: 3,
            stall_nudge_s: 0.001,
            reload_tolerance_s: 0.5,
            tick_hz: 60,
            diagnostics_capacity: 32,
        }
    }
}

impl SyncConfig {
    /// Drift threshold for a playback rate
    pub fn drift_threshold(&self, rate: f64) -> f64 {
        self.drift_floor_s.max(self.drift_rate_factor * rate)
    }
}

/// Resource window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WindowConfig {
    /// Clips after the active one kept materialized
    #[validate(range(max = 4))]
    pub prefetch_ahead: usize,

    /// Clips at `active - release_behind` and earlier are released
    #[validate(range(min = 2))]
    pub release_behind: usize,

    /// Within this many seconds of a clip's end the next clip is prefetched
    #[validate(range(min = 0.0))]
    pub near_end_prefetch_s: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            prefetch_ahead: 1,
            release_behind: 2,
            near_end_prefetch_s: 10.0,
        }
    }
}

/// Telemetry lookup settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Assumed frame rate for time -> frame conversion
    #[validate(range(exclusive_min = 0.0))]
    pub fps: f64,

    /// Nearest sample further than this many frames is no match
    pub max_frame_distance: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            fps: 36.0,
            max_frame_distance: 10,
        }
    }
}

/// Read-status store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("sentry-viewer-state.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(PlayerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_drift_threshold() {
        let sync = SyncConfig::default();
        assert_eq!(sync.drift_threshold(1.0), 0.5);
        assert!((sync.drift_threshold(4.0) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_range_violation_detected() {
        let mut cfg = PlayerConfig::default();
        cfg.sync.tick_hz = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: PlayerConfig =
            serde_json::from_str(r#"{"telemetry": {"fps": 30.0}}"#).unwrap();
        assert_eq!(cfg.telemetry.fps, 30.0);
        assert_eq!(cfg.telemetry.max_frame_distance, 10);
        assert_eq!(cfg.playback.seek_grace_ms, 250);
    }
}
