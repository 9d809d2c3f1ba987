//! Event / Clip - Catalog output
//!
//! An Event is one directory of recordings; a Clip is one recording interval
//! with up to one video per camera.

use chrono::{Duration as ChronoDuration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::CameraId;

/// Location of one camera's video file for a clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    /// Path relative to the scanned root, as listed
    pub relative_path: String,

    /// Resolved location on the host
    pub location: PathBuf,
}

/// One recording interval.
///
/// Invariant: within an Event, clip keys are unique and strictly increasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    /// Start time parsed from `YYYY-MM-DD_HH-MM-SS`
    pub key: NaiveDateTime,

    /// Sparse camera -> video map
    pub videos: BTreeMap<CameraId, VideoSource>,
}

impl Clip {
    /// Create an empty clip for the given key
    pub fn new(key: NaiveDateTime) -> Self {
        Self {
            key,
            videos: BTreeMap::new(),
        }
    }

    /// Video for a camera, if recorded
    pub fn video(&self, camera: CameraId) -> Option<&VideoSource> {
        self.videos.get(&camera)
    }

    /// Check whether a camera was recorded for this clip
    pub fn has_camera(&self, camera: CameraId) -> bool {
        self.videos.contains_key(&camera)
    }

    /// Cameras present, in fixed priority order
    pub fn cameras(&self) -> impl Iterator<Item = CameraId> + '_ {
        self.videos.keys().copied()
    }

    /// Camera whose file is probed for the clip duration: `front`, else the first present.
    pub fn primary_camera(&self) -> Option<CameraId> {
        if self.has_camera(CameraId::Front) {
            Some(CameraId::Front)
        } else {
            self.cameras().next()
        }
    }

    /// Wall-clock time at `local_s` seconds into the clip
    pub fn clock_time_at(&self, local_s: f64) -> NaiveDateTime {
        let millis = if local_s.is_finite() {
            (local_s.max(0.0) * 1000.0) as i64
        } else {
            0
        };
        self.key + ChronoDuration::milliseconds(millis)
    }
}

/// Why the event was saved, resolved from the `reason` prefix table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventReason {
    AutoEmergencyBraking,
    DashcamIconTapped,
    DashcamPanelSave,
    Honk,
    ManualSave,
    SentryObjectDetection,
    SentryShake,
    Sentry,
    /// Reason string that matches no known prefix
    Other(String),
}

impl EventReason {
    /// Prefix table; first match wins, so more specific prefixes come first.
    const PREFIXES: [(&'static str, EventReason); 8] = [
        ("vehicle_auto_emergency_braking", EventReason::AutoEmergencyBraking),
        ("user_interaction_dashcam_icon_tapped", EventReason::DashcamIconTapped),
        ("user_interaction_dashcam_panel_save", EventReason::DashcamPanelSave),
        ("user_interaction_honk", EventReason::Honk),
        ("user_interaction_", EventReason::ManualSave),
        ("sentry_aware_object_detection", EventReason::SentryObjectDetection),
        ("sentry_aware_accel_", EventReason::SentryShake),
        ("sentry_", EventReason::Sentry),
    ];

    /// Resolve a raw `reason` string
    pub fn from_code(code: &str) -> Self {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| code.starts_with(prefix))
            .map(|(_, reason)| reason.clone())
            .unwrap_or_else(|| EventReason::Other(code.to_string()))
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        match self {
            EventReason::AutoEmergencyBraking => "Automatic Emergency Braking",
            EventReason::DashcamIconTapped => "Dashcam Icon Tapped",
            EventReason::DashcamPanelSave => "Dashcam Panel Save",
            EventReason::Honk => "Honk",
            EventReason::ManualSave => "Manual Save",
            EventReason::SentryObjectDetection => "Sentry Object Detection",
            EventReason::SentryShake => "Sentry Shake Detection",
            EventReason::Sentry => "Sentry Mode",
            EventReason::Other(raw) => raw,
        }
    }
}

/// Parsed `event.json`. Every consumed field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Trigger time
    pub timestamp: Option<NaiveDateTime>,

    /// Raw reason code
    pub reason: Option<String>,

    pub city: Option<String>,

    pub street: Option<String>,

    /// Estimated position (lat, lon)
    pub gps: Option<(f64, f64)>,

    /// Index into the camera-index table
    pub camera_index: Option<u32>,
}

impl EventMetadata {
    /// Resolved reason, if any was recorded
    pub fn reason(&self) -> Option<EventReason> {
        self.reason.as_deref().map(EventReason::from_code)
    }

    /// `city` + `street`, trimmed; `None` when both are empty
    pub fn location(&self) -> Option<String> {
        let joined = format!(
            "{}{}",
            self.city.as_deref().unwrap_or_default(),
            self.street.as_deref().unwrap_or_default()
        );
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Camera the vehicle flagged for this event
    pub fn default_camera(&self) -> Option<CameraId> {
        self.camera_index.and_then(CameraId::from_metadata_index)
    }
}

/// Display timestamp of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTime {
    /// Metadata trigger timestamp
    Triggered(NaiveDateTime),
    /// First clip start .. last clip start + default clip duration
    Range {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// One saved recording event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Identity: the source directory path, relative to the scanned root
    pub id: String,

    /// Directory name
    pub name: String,

    /// Clips sorted ascending by key; never empty
    pub clips: Vec<Clip>,

    pub metadata: Option<EventMetadata>,

    /// `thumb.png`, if present
    pub thumbnail: Option<VideoSource>,

    /// Read flag, filled from the state store
    #[serde(default)]
    pub read: bool,
}

impl Event {
    /// Number of clips
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Clip by index
    pub fn clip(&self, index: usize) -> Option<&Clip> {
        self.clips.get(index)
    }

    /// Trigger timestamp from metadata
    pub fn trigger_time(&self) -> Option<NaiveDateTime> {
        self.metadata.as_ref().and_then(|m| m.timestamp)
    }

    /// Display timestamp: metadata trigger if present, else the clip span
    pub fn display_time(&self, default_clip_duration_s: f64) -> Option<EventTime> {
        if let Some(ts) = self.trigger_time() {
            return Some(EventTime::Triggered(ts));
        }
        let first = self.clips.first()?;
        let last = self.clips.last()?;
        Some(EventTime::Range {
            start: first.key,
            end: last.clock_time_at(default_clip_duration_s),
        })
    }

    /// "Most recent activity": start of the last clip, else the metadata timestamp.
    pub fn sort_key(&self) -> Option<NaiveDateTime> {
        self.clips
            .last()
            .map(|c| c.key)
            .or_else(|| self.trigger_time())
    }

    /// Resolved reason; absent reason reads as plain sentry mode
    pub fn reason(&self) -> EventReason {
        self.metadata
            .as_ref()
            .and_then(EventMetadata::reason)
            .unwrap_or(EventReason::Sentry)
    }

    /// Location string, falling back to the directory name
    pub fn title(&self) -> String {
        self.metadata
            .as_ref()
            .and_then(EventMetadata::location)
            .unwrap_or_else(|| self.name.clone())
    }

    /// Master camera to start with: the metadata camera if valid, else front
    pub fn default_camera(&self) -> CameraId {
        self.metadata
            .as_ref()
            .and_then(EventMetadata::default_camera)
            .unwrap_or(CameraId::Front)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn key(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn event_with_clips(keys: &[NaiveDateTime]) -> Event {
        Event {
            id: "SentryClips/2024-03-09_10-01-00".into(),
            name: "2024-03-09_10-01-00".into(),
            clips: keys.iter().map(|k| Clip::new(*k)).collect(),
            metadata: None,
            thumbnail: None,
            read: false,
        }
    }

    #[test]
    fn test_reason_prefix_table() {
        assert_eq!(
            EventReason::from_code("user_interaction_honk"),
            EventReason::Honk
        );
        assert_eq!(
            EventReason::from_code("user_interaction_something_new"),
            EventReason::ManualSave
        );
        assert_eq!(
            EventReason::from_code("sentry_aware_accel_0.53"),
            EventReason::SentryShake
        );
        assert_eq!(
            EventReason::from_code("sentry_locked"),
            EventReason::Sentry
        );
        assert_eq!(
            EventReason::from_code("mystery").label(),
            "mystery"
        );
    }

    #[test]
    fn test_display_time_falls_back_to_clip_span() {
        let evt = event_with_clips(&[key(10, 0, 0), key(10, 1, 0)]);
        assert_eq!(
            evt.display_time(60.0),
            Some(EventTime::Range {
                start: key(10, 0, 0),
                end: key(10, 2, 0),
            })
        );
    }

    #[test]
    fn test_display_time_prefers_trigger() {
        let mut evt = event_with_clips(&[key(10, 0, 0)]);
        evt.metadata = Some(EventMetadata {
            timestamp: Some(key(10, 0, 42)),
            ..Default::default()
        });
        assert_eq!(
            evt.display_time(60.0),
            Some(EventTime::Triggered(key(10, 0, 42)))
        );
    }

    #[test]
    fn test_sort_key_is_last_clip_start() {
        let evt = event_with_clips(&[key(9, 0, 0), key(9, 1, 0)]);
        assert_eq!(evt.sort_key(), Some(key(9, 1, 0)));
    }

    #[test]
    fn test_location_and_title() {
        let mut evt = event_with_clips(&[key(9, 0, 0)]);
        assert_eq!(evt.title(), "2024-03-09_10-01-00");
        evt.metadata = Some(EventMetadata {
            city: Some("Taipei".into()),
            street: Some(" Zhongshan Rd ".into()),
            ..Default::default()
        });
        assert_eq!(evt.title(), "Taipei Zhongshan Rd");
    }

    #[test]
    fn test_primary_camera() {
        let mut clip = Clip::new(key(9, 0, 0));
        let src = VideoSource {
            relative_path: "a".into(),
            location: PathBuf::from("a"),
        };
        clip.videos.insert(CameraId::RightRepeater, src.clone());
        clip.videos.insert(CameraId::Back, src.clone());
        assert_eq!(clip.primary_camera(), Some(CameraId::Back));
        clip.videos.insert(CameraId::Front, src);
        assert_eq!(clip.primary_camera(), Some(CameraId::Front));
    }

    #[test]
    fn test_clock_time_at() {
        let clip = Clip::new(key(9, 0, 0));
        assert_eq!(clip.clock_time_at(61.5), key(9, 1, 1) + ChronoDuration::milliseconds(500));
        assert_eq!(clip.clock_time_at(f64::NAN), key(9, 0, 0));
    }
}
