//! ReadStatusStore - read flags and preferences
//!
//! A small JSON document: event name -> read flag, plus the last playback rate.
//! A missing or corrupt file loads as an empty store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use contracts::ContractError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct StoreDocument {
    read_status: BTreeMap<String, bool>,
    playback_rate: Option<f64>,
}

/// Persistent read-status / preference store.
#[derive(Debug, Clone)]
pub struct ReadStatusStore {
    path: PathBuf,
    doc: StoreDocument,
    dirty: bool,
}

impl ReadStatusStore {
    /// Empty store that will save to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            doc: StoreDocument::default(),
            dirty: false,
        }
    }

    /// Load from `path`; unreadable content yields an empty store
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let doc = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "state store corrupt, starting empty");
                StoreDocument::default()
            }),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no state store yet");
                StoreDocument::default()
            }
        };
        Self {
            path,
            doc,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unsaved changes pending
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_read(&self, event_name: &str) -> bool {
        self.doc.read_status.get(event_name).copied().unwrap_or(false)
    }

    pub fn set_read(&mut self, event_name: &str, read: bool) {
        let previous = self.doc.read_status.insert(event_name.to_string(), read);
        if previous != Some(read) {
            self.dirty = true;
        }
    }

    /// Flip the read flag; returns the new value
    pub fn toggle(&mut self, event_name: &str) -> bool {
        let next = !self.is_read(event_name);
        self.set_read(event_name, next);
        next
    }

    /// Number of events marked read
    pub fn read_count(&self) -> usize {
        self.doc.read_status.values().filter(|r| **r).count()
    }

    /// Last persisted playback rate
    pub fn playback_rate(&self) -> Option<f64> {
        self.doc.playback_rate.filter(|r| r.is_finite() && *r > 0.0)
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        if self.doc.playback_rate != Some(rate) {
            self.doc.playback_rate = Some(rate);
            self.dirty = true;
        }
    }

    /// Write atomically: temp file in the same directory, then rename
    pub fn save(&mut self) -> Result<(), ContractError> {
        let shown = self.path.display().to_string();
        let json = serde_json::to_string_pretty(&self.doc)
            .map_err(|e| ContractError::store(&shown, e.to_string()))?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| ContractError::store(&shown, e.to_string()))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).map_err(|e| ContractError::store(&shown, e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| ContractError::store(&shown, e.to_string()))?;

        self.dirty = false;
        debug!(path = %shown, "state store saved");
        Ok(())
    }
}
