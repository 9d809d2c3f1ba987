//! Layered error definitions
//!
//! Categorized by source: config / catalog / media / playback / store

use thiserror::Error;

use crate::CameraId;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Media Errors =====
    /// A playable handle could not be created for one camera of a clip
    #[error("resource allocation failed for clip {clip_index} camera '{camera}': {message}")]
    ResourceAllocation {
        clip_index: usize,
        camera: CameraId,
        message: String,
    },

    /// Container could not be probed for a duration
    #[error("duration probe failed for '{path}': {message}")]
    DurationProbe { path: String, message: String },

    // ===== Playback Errors =====
    /// A command needs a loaded event
    #[error("no event loaded")]
    NoEventLoaded,

    /// Playback rate must be finite and positive
    #[error("invalid playback rate: {rate}")]
    InvalidPlaybackRate { rate: f64 },

    /// Clip index outside the loaded event
    #[error("clip index {index} out of range (event has {clip_count} clips)")]
    ClipOutOfRange { index: usize, clip_count: usize },

    /// The active clip's resources cannot be released
    #[error("refusing to release active clip {index}")]
    ReleaseActiveClip { index: usize },

    // ===== Store Errors =====
    /// Read-status / preference store error
    #[error("state store error at '{path}': {message}")]
    Store { path: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create resource allocation error
    pub fn resource_allocation(
        clip_index: usize,
        camera: CameraId,
        message: impl Into<String>,
    ) -> Self {
        Self::ResourceAllocation {
            clip_index,
            camera,
            message: message.into(),
        }
    }

    /// Create duration probe error
    pub fn duration_probe(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DurationProbe {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create store error
    pub fn store(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            path: path.into(),
            message: message.into(),
        }
    }
}
