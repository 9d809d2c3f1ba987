//! Error types for CLI operations.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    /// Recordings root holds no recognizable events
    #[error("no events found under {}", root.display())]
    NoEvents { root: PathBuf },

    /// Requested event name is not in the catalog
    #[error("event '{name}' not found under {}", root.display())]
    EventNotFound { name: String, root: PathBuf },

    /// Configuration file not found
    #[error("configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },
}

impl CliError {
    pub fn no_events(root: impl Into<PathBuf>) -> Self {
        Self::NoEvents { root: root.into() }
    }

    pub fn event_not_found(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self::EventNotFound {
            name: name.into(),
            root: root.into(),
        }
    }

    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }
}
