//! Playback state - Synchronizer output
//!
//! Published to the UI (or CLI) after every command and tick.

use serde::{Deserialize, Serialize};

use crate::{CameraId, RejectionClass};

/// Synchronizer state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// No event loaded
    #[default]
    Idle,
    /// Waiting for the master track after a clip or camera switch
    Buffering,
    Playing,
    Paused,
    /// User is dragging the timeline
    Seeking,
    /// Master of the last clip completed
    Ended,
}

impl PlaybackState {
    /// Whether the drift loop should be running
    pub fn is_playing(self) -> bool {
        self == PlaybackState::Playing
    }
}

/// Point-in-time view of the synchronizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub clip_index: usize,
    pub clip_count: usize,
    /// Seconds within the active clip
    pub local_time: f64,
    /// Seconds since the first clip started
    pub global_time: f64,
    pub total_duration: f64,
    pub playback_rate: f64,
    pub master_camera: Option<CameraId>,
    /// Cameras with a playable handle for the active clip
    pub available_cameras: Vec<CameraId>,
    /// `global_time / total_duration` in `[0, 1]`; zero when nothing is loaded
    pub progress: f64,
    /// Durations are still estimates
    pub durations_pending: bool,
}

/// One follower hard-seeked back onto the master clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftCorrection {
    pub camera: CameraId,
    /// Absolute offset from the master before the seek
    pub drift: f64,
}

/// What one drift-correction tick did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Master position read this tick
    pub master_time: Option<f64>,

    /// Largest follower offset observed, corrected or not
    pub max_drift: f64,

    pub corrections: Vec<DriftCorrection>,

    /// Tracks nudged out of a stall
    pub nudged: Vec<CameraId>,
}

/// Non-fatal problem worth surfacing to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub camera: Option<CameraId>,
    pub class: RejectionClass,
    pub message: String,
}

/// `part / whole`, clamped to `[0, 1]`; zero for an empty or non-finite whole.
pub fn ratio(part: f64, whole: f64) -> f64 {
    if !(whole.is_finite() && whole > 0.0 && part.is_finite()) {
        return 0.0;
    }
    (part / whole).clamp(0.0, 1.0)
}
