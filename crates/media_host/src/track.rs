//! Simulated media track
//!
//! Deterministic playback driven by a [`Clock`]: position advances with
//! `rate * skew` once the track has data, load completion and end-of-media
//! are reported through [`SimulatedTrack::poll_events`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use contracts::{CameraId, MediaTrack, PlayRejection, ReadyState, ResourceHandle, TrackEvent};
use sync_engine::Clock;
use tracing::trace;

/// Media duration per handle locator
pub type DurationTable = Arc<HashMap<String, f64>>;

/// Behaviour knobs for simulated tracks
#[derive(Debug, Clone)]
pub struct TrackProfile {
    /// Time between `load` and the track having data
    pub load_delay: Duration,
    /// Speed error relative to the requested rate
    pub skew: f64,
    /// Duration for locators missing from the table
    pub default_duration: f64,
}

impl Default for TrackProfile {
    fn default() -> Self {
        Self {
            load_delay: Duration::from_millis(50),
            skew: 1.0,
            default_duration: 60.0,
        }
    }
}

pub struct SimulatedTrack {
    camera: CameraId,
    clock: Arc<dyn Clock>,
    profile: TrackProfile,
    durations: DurationTable,

    source: Option<u64>,
    media_duration: f64,
    ready_at: Duration,
    load_reported: bool,

    anchor_time: f64,
    anchor_clock: Duration,
    paused: bool,
    ended: bool,
    stalled: bool,
    rate: f64,
    reject_next: Option<PlayRejection>,
}

impl std::fmt::Debug for SimulatedTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedTrack")
            .field("camera", &self.camera)
            .field("source", &self.source)
            .field("time", &self.current_time())
            .field("paused", &self.paused)
            .finish()
    }
}

impl SimulatedTrack {
    pub fn new(
        camera: CameraId,
        clock: Arc<dyn Clock>,
        profile: TrackProfile,
        durations: DurationTable,
    ) -> Self {
        Self {
            camera,
            clock,
            media_duration: profile.default_duration,
            profile,
            durations,
            source: None,
            ready_at: Duration::ZERO,
            load_reported: false,
            anchor_time: 0.0,
            anchor_clock: Duration::ZERO,
            paused: true,
            ended: false,
            stalled: false,
            rate: 1.0,
            reject_next: None,
        }
    }

    /// Freeze or release the position while reporting "playing, no data"
    pub fn set_stalled(&mut self, stalled: bool) {
        self.settle();
        self.stalled = stalled;
    }

    /// The next `play` fails with `rejection`
    pub fn fail_next_play(&mut self, rejection: PlayRejection) {
        self.reject_next = Some(rejection);
    }

    pub fn set_skew(&mut self, skew: f64) {
        self.settle();
        self.profile.skew = skew;
    }

    /// Load completion and end-of-media notices since the last poll
    pub fn poll_events(&mut self) -> Vec<TrackEvent> {
        let Some(handle_id) = self.source else {
            return Vec::new();
        };
        let now = self.clock.now();
        let mut events = Vec::new();

        if !self.load_reported && now >= self.ready_at {
            self.load_reported = true;
            events.push(TrackEvent::Loaded {
                camera: self.camera,
                handle_id,
            });
        }

        if !self.paused && !self.ended && self.position(now) >= self.media_duration {
            self.anchor_time = self.media_duration;
            self.anchor_clock = now;
            self.ended = true;
            self.paused = true;
            trace!(camera = %self.camera, handle_id, "media ended");
            events.push(TrackEvent::Ended {
                camera: self.camera,
                handle_id,
            });
        }
        events
    }

    fn has_data(&self, now: Duration) -> bool {
        self.source.is_some() && now >= self.ready_at
    }

    fn position(&self, now: Duration) -> f64 {
        if self.paused || self.ended || self.stalled || !self.has_data(now) {
            return self.anchor_time;
        }
        let start = self.anchor_clock.max(self.ready_at);
        let elapsed = now.saturating_sub(start).as_secs_f64();
        (self.anchor_time + elapsed * self.rate * self.profile.skew).min(self.media_duration)
    }

    fn settle(&mut self) {
        let now = self.clock.now();
        self.anchor_time = self.position(now);
        self.anchor_clock = now;
    }
}

impl MediaTrack for SimulatedTrack {
    fn camera(&self) -> CameraId {
        self.camera
    }

    fn load(&mut self, handle: &ResourceHandle) {
        let now = self.clock.now();
        self.source = Some(handle.id);
        self.media_duration = self
            .durations
            .get(&*handle.locator)
            .copied()
            .unwrap_or(self.profile.default_duration);
        self.ready_at = now + self.profile.load_delay;
        self.load_reported = false;
        self.anchor_time = 0.0;
        self.anchor_clock = now;
        self.paused = true;
        self.ended = false;
        self.stalled = false;
        trace!(camera = %self.camera, handle = ?handle, "track loading");
    }

    fn unload(&mut self) {
        self.source = None;
        self.paused = true;
        self.ended = false;
        self.stalled = false;
        self.anchor_time = 0.0;
    }

    fn source(&self) -> Option<u64> {
        self.source
    }

    fn current_time(&self) -> f64 {
        self.position(self.clock.now())
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.settle();
        self.anchor_time = seconds.clamp(0.0, self.media_duration);
        self.ended = false;
        self.stalled = false;
    }

    fn duration(&self) -> Option<f64> {
        self.has_data(self.clock.now()).then_some(self.media_duration)
    }

    fn ready_state(&self) -> ReadyState {
        if !self.has_data(self.clock.now()) {
            ReadyState::HaveNothing
        } else if self.stalled {
            ReadyState::HaveCurrentData
        } else {
            ReadyState::HaveEnoughData
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn has_ended(&self) -> bool {
        self.ended
    }

    fn play(&mut self) -> Result<(), PlayRejection> {
        if self.source.is_none() {
            return Err(PlayRejection::Media("no source loaded".into()));
        }
        if let Some(rejection) = self.reject_next.take() {
            return Err(rejection);
        }
        self.settle();
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.settle();
        self.paused = true;
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.settle();
        self.rate = rate;
    }

    fn playback_rate(&self) -> f64 {
        self.rate
    }
}

/// One simulated track per camera, sharing a clock and duration table
pub fn simulated_tracks(
    clock: Arc<dyn Clock>,
    profile: &TrackProfile,
    durations: DurationTable,
) -> Vec<SimulatedTrack> {
    CameraId::ALL
        .into_iter()
        .map(|camera| SimulatedTrack::new(camera, clock.clone(), profile.clone(), durations.clone()))
        .collect()
}
