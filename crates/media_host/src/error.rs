//! Media host error types

use contracts::ContractError;
use telemetry::TelemetryError;
use thiserror::Error;

/// Media host specific error
#[derive(Debug, Error)]
pub enum HostError {
    /// Container could not be read or has no usable duration
    #[error("duration probe failed for '{path}': {source}")]
    Probe {
        path: String,
        #[source]
        source: TelemetryError,
    },

    /// Blocking probe task panicked or was cancelled
    #[error("probe task for '{path}' failed: {message}")]
    Task { path: String, message: String },

    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl HostError {
    /// Create probe error
    pub fn probe(path: impl Into<String>, source: TelemetryError) -> Self {
        Self::Probe {
            path: path.into(),
            source,
        }
    }

    /// Create task error
    pub fn task(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Task {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, HostError>;
