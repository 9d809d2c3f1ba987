//! Media host traits
//!
//! The playback engine never decodes video itself. It drives tracks and asks an
//! allocator for playable handles through the traits below, so a GUI host, a
//! headless simulator and test doubles all plug in the same way.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::{CameraId, ContractError, VideoSource};

/// How much media data a track has available, ordered from least to most.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    /// No source, or nothing known about it yet
    #[default]
    HaveNothing,
    /// Duration and dimensions known
    HaveMetadata,
    /// The current frame is decodable, but nothing beyond it
    HaveCurrentData,
    /// Playback can advance at least a little
    HaveFutureData,
    /// Playback can run through without stalling
    HaveEnoughData,
}

impl ReadyState {
    /// Enough data for a follower to be hard-seeked or started
    pub fn can_play(self) -> bool {
        self >= ReadyState::HaveFutureData
    }

    /// "Playing but no further data": the stall signature
    pub fn is_starved(self) -> bool {
        self == ReadyState::HaveCurrentData
    }
}

/// Playable handle for one camera of one clip.
///
/// Cloning only bumps a reference count on the locator.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    /// Allocator-unique id; a track event carrying an older id is stale
    pub id: u64,
    pub camera: CameraId,
    pub clip_index: usize,
    /// Host-specific address of the playable data (path, object URL, ...)
    pub locator: Arc<str>,
}

impl ResourceHandle {
    pub fn new(id: u64, camera: CameraId, clip_index: usize, locator: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            camera,
            clip_index,
            locator: locator.into(),
        }
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ResourceHandle(#{} clip={} {} {:?})",
            self.id, self.clip_index, self.camera, &*self.locator
        )
    }
}

/// Creates and revokes playable handles. Owned by the resource window only.
pub trait ResourceAllocator {
    /// Allocate a handle for one camera of a clip
    fn allocate(
        &mut self,
        clip_index: usize,
        camera: CameraId,
        source: &VideoSource,
    ) -> Result<ResourceHandle, ContractError>;

    /// Free a handle; revoking twice is harmless
    fn revoke(&mut self, handle: &ResourceHandle);
}

/// Why the media subsystem refused a play request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayRejection {
    /// A newer load replaced the source before playback began
    Superseded,
    /// Host policy refused to start playback
    AutoplayBlocked,
    /// Anything else reported by the media pipeline
    Media(String),
}

/// Severity class of a play rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionClass {
    Benign,
    Unexpected,
}

impl PlayRejection {
    pub fn classify(&self) -> RejectionClass {
        match self {
            PlayRejection::Superseded | PlayRejection::AutoplayBlocked => RejectionClass::Benign,
            PlayRejection::Media(_) => RejectionClass::Unexpected,
        }
    }
}

impl fmt::Display for PlayRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayRejection::Superseded => f.write_str("play superseded by a newer load"),
            PlayRejection::AutoplayBlocked => f.write_str("autoplay blocked"),
            PlayRejection::Media(msg) => write!(f, "media error: {msg}"),
        }
    }
}

/// Asynchronous notifications a host delivers back to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackEvent {
    /// The track finished loading the handle with this id
    Loaded { camera: CameraId, handle_id: u64 },
    /// The track reached end-of-media for the handle with this id
    Ended { camera: CameraId, handle_id: u64 },
    /// A previously issued play was refused after the fact
    PlayRejected {
        camera: CameraId,
        rejection: PlayRejection,
    },
}

impl TrackEvent {
    pub fn camera(&self) -> CameraId {
        match self {
            TrackEvent::Loaded { camera, .. }
            | TrackEvent::Ended { camera, .. }
            | TrackEvent::PlayRejected { camera, .. } => *camera,
        }
    }
}

/// One camera's playback element.
///
/// Commands take effect on the host's schedule; the engine reads state back on
/// the next tick and never assumes a command completed synchronously.
pub trait MediaTrack {
    fn camera(&self) -> CameraId;

    /// Switch to a new source. Resets position to zero and readiness to nothing.
    fn load(&mut self, handle: &ResourceHandle);

    /// Drop the current source
    fn unload(&mut self);

    /// Id of the loaded handle
    fn source(&self) -> Option<u64>;

    /// Playback position in seconds
    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, seconds: f64);

    /// Media duration, once known
    fn duration(&self) -> Option<f64>;

    fn ready_state(&self) -> ReadyState;

    fn is_paused(&self) -> bool;

    fn has_ended(&self) -> bool;

    /// Request playback. An immediate refusal is returned; a later one arrives
    /// as [`TrackEvent::PlayRejected`].
    fn play(&mut self) -> Result<(), PlayRejection>;

    fn pause(&mut self);

    fn set_playback_rate(&mut self, rate: f64);

    fn playback_rate(&self) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_state_ordering() {
        assert!(ReadyState::HaveEnoughData > ReadyState::HaveFutureData);
        assert!(ReadyState::HaveFutureData.can_play());
        assert!(!ReadyState::HaveCurrentData.can_play());
        assert!(ReadyState::HaveCurrentData.is_starved());
        assert!(!ReadyState::HaveNothing.is_starved());
    }

    #[test]
    fn test_rejection_classes() {
        assert_eq!(PlayRejection::Superseded.classify(), RejectionClass::Benign);
        assert_eq!(
            PlayRejection::AutoplayBlocked.classify(),
            RejectionClass::Benign
        );
        assert_eq!(
            PlayRejection::Media("decode failed".into()).classify(),
            RejectionClass::Unexpected
        );
    }

    #[test]
    fn test_handle_clone_shares_locator() {
        let h = ResourceHandle::new(7, CameraId::Front, 2, "clips/a.mp4");
        let h2 = h.clone();
        assert!(Arc::ptr_eq(&h.locator, &h2.locator));
        assert_eq!(format!("{h:?}"), "ResourceHandle(#7 clip=2 front \"clips/a.mp4\")");
    }
}
