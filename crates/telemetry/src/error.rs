//! Telemetry error types
//!
//! Extraction itself never fails; these cover file access and the duration probe.

use contracts::ContractError;
use thiserror::Error;

/// Telemetry specific error
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Required box not present
    #[error("box '{kind}' not found")]
    BoxNotFound { kind: String },

    /// Box present but too short or inconsistent
    #[error("malformed '{kind}' box: {message}")]
    MalformedBox { kind: String, message: String },

    /// File read error
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl TelemetryError {
    /// Create box-not-found error
    pub fn box_not_found(kind: impl Into<String>) -> Self {
        Self::BoxNotFound { kind: kind.into() }
    }

    /// Create malformed box error
    pub fn malformed(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedBox {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl From<TelemetryError> for ContractError {
    fn from(err: TelemetryError) -> Self {
        match err {
            TelemetryError::Read { path, source } => {
                ContractError::duration_probe(path, source.to_string())
            }
            other => ContractError::duration_probe("<buffer>", other.to_string()),
        }
    }
}
