//! PlaybackEngine - multi-camera playback synchronizer
//!
//! One master track is the clock; followers are pulled back onto it by a
//! cancelable frame tick. Commands are synchronous; their effect on tracks is
//! eventually consistent (loads, play requests and end-of-media arrive later
//! as [`TrackEvent`]s).

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use contracts::{
    ratio, CameraId, ContractError, Diagnostic, DriftCorrection, Event, MediaTrack, PlayRejection,
    PlaybackSnapshot, PlaybackState, PlayerConfig, ReadyState, RejectionClass, ResourceAllocator,
    TickReport, TrackEvent,
};
use tracing::{debug, info, instrument, trace, warn};

use crate::clock::Clock;
use crate::scheduler::{FrameScheduler, TickToken};
use crate::timeline::Timeline;
use crate::window::ResourceWindow;

/// Work postponed by the seek grace delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    /// Re-enter Playing after a seek or reset
    Resume,
    /// Pull every track onto the published time, then play
    Resync,
}

#[derive(Debug)]
struct Timer {
    due: Duration,
    action: Deferred,
}

/// Synchronized playback of one event across its camera tracks.
pub struct PlaybackEngine<T, A> {
    config: PlayerConfig,
    clock: Arc<dyn Clock>,
    tracks: BTreeMap<CameraId, T>,
    window: ResourceWindow<A>,
    scheduler: FrameScheduler,
    timers: Vec<Timer>,

    event: Option<Event>,
    timeline: Timeline,
    durations_pending: bool,
    pending_seek: Option<f64>,
    auto_seek_pending: bool,

    clip_index: usize,
    local_time: f64,
    global_time: f64,
    playback_rate: f64,
    preferred_camera: CameraId,

    wants_play: bool,
    seeking: bool,
    buffering: bool,
    ended: bool,

    stall_counters: BTreeMap<CameraId, u32>,
    diagnostics: VecDeque<Diagnostic>,
}

impl<T: MediaTrack, A: ResourceAllocator> PlaybackEngine<T, A> {
    /// Tracks are keyed by their camera; a later track replaces an earlier one.
    pub fn new(
        config: PlayerConfig,
        clock: Arc<dyn Clock>,
        allocator: A,
        tracks: impl IntoIterator<Item = T>,
    ) -> Self {
        let tracks = tracks.into_iter().map(|t| (t.camera(), t)).collect();
        Self {
            window: ResourceWindow::new(allocator, &config.window),
            scheduler: FrameScheduler::new(config.sync.tick_hz),
            playback_rate: config.playback.default_rate,
            clock,
            tracks,
            timers: Vec::new(),
            event: None,
            timeline: Timeline::default(),
            durations_pending: false,
            pending_seek: None,
            auto_seek_pending: false,
            clip_index: 0,
            local_time: 0.0,
            global_time: 0.0,
            preferred_camera: CameraId::Front,
            wants_play: false,
            seeking: false,
            buffering: false,
            ended: false,
            stall_counters: BTreeMap::new(),
            diagnostics: VecDeque::new(),
            config,
        }
    }

    // ----- event lifecycle -----

    /// Replace the loaded event and start playing its first clip.
    ///
    /// Durations start at the default estimate until [`settle_durations`](Self::settle_durations).
    #[instrument(level = "debug", name = "engine_load_event", skip(self, event), fields(event = %event.id))]
    pub fn load_event(&mut self, event: Event) -> Result<(), ContractError> {
        if event.clips.is_empty() {
            return Err(ContractError::ClipOutOfRange {
                index: 0,
                clip_count: 0,
            });
        }
        self.unload_event();

        info!(event = %event.id, clips = event.clip_count(), "event loaded");
        self.timeline = Timeline::uniform(
            event.clip_count(),
            self.config.playback.default_clip_duration_s,
            self.config.playback.end_epsilon_s,
        );
        self.durations_pending = true;
        self.auto_seek_pending = true;
        self.preferred_camera = event.default_camera();
        self.wants_play = true;
        self.event = Some(event);
        self.activate_clip(0)
    }

    /// Stop the tick, release every handle and zero the timeline
    pub fn unload_event(&mut self) {
        self.scheduler.cancel();
        self.timers.clear();
        for track in self.tracks.values_mut() {
            track.pause();
            track.unload();
        }
        let released = self.window.release_all();
        if let Some(event) = self.event.take() {
            info!(event = %event.id, released, "event unloaded");
        }

        self.timeline = Timeline::default();
        self.durations_pending = false;
        self.pending_seek = None;
        self.auto_seek_pending = false;
        self.clip_index = 0;
        self.local_time = 0.0;
        self.global_time = 0.0;
        self.wants_play = false;
        self.seeking = false;
        self.buffering = false;
        self.ended = false;
        self.stall_counters.clear();
        self.diagnostics.clear();
    }

    /// Install probed clip durations; missing or unusable entries use the default.
    ///
    /// Replays a seek issued while durations were pending, otherwise performs
    /// the auto-seek to the trigger time.
    pub fn settle_durations(&mut self, probed: &[Option<f64>]) -> Result<(), ContractError> {
        let clip_count = self.require_event()?.clip_count();
        let default = self.config.playback.default_clip_duration_s;

        let mut fallbacks = 0usize;
        let durations: Vec<f64> = (0..clip_count)
            .map(|i| {
                match probed.get(i).copied().flatten().filter(|d| d.is_finite() && *d > 0.0) {
                    Some(d) => d,
                    None => {
                        fallbacks += 1;
                        default
                    }
                }
            })
            .collect();

        self.timeline = Timeline::new(durations, self.config.playback.end_epsilon_s);
        self.durations_pending = false;
        if let Some(global) = self.timeline.to_global(self.clip_index, self.local_time) {
            self.global_time = global;
        }
        info!(clips = clip_count, total = self.timeline.total(), fallbacks, "durations settled");

        if let Some(target) = self.pending_seek.take() {
            debug!(target, "replaying deferred seek");
            self.auto_seek_pending = false;
            self.apply_global_seek(target)?;
        } else if std::mem::take(&mut self.auto_seek_pending) {
            let trigger = self.event.as_ref().and_then(|e| self.timeline.trigger_offset(e));
            if let Some(offset) = trigger {
                let target = (offset - self.config.playback.auto_seek_lead_s).max(0.0);
                info!(trigger = offset, target, "auto-seek to trigger");
                self.apply_global_seek(target)?;
            }
        }
        self.refresh();
        Ok(())
    }

    // ----- commands -----

    /// Play/pause. Playing from the end restarts at zero.
    pub fn toggle_play(&mut self) -> Result<PlaybackState, ContractError> {
        self.require_event()?;
        let total = self.timeline.total();
        let at_end = self.ended || (total > 0.0 && (self.global_time - total).abs() < 1.0);

        let mut should_play = !self.wants_play;
        if !self.wants_play && at_end {
            self.apply_global_seek(0.0)?;
            should_play = true;
        }
        self.wants_play = should_play;

        if should_play {
            self.schedule(Deferred::Resync);
        } else {
            self.timers.retain(|t| t.action != Deferred::Resume);
        }
        self.refresh();
        Ok(self.state())
    }

    pub fn play(&mut self) -> Result<PlaybackState, ContractError> {
        if self.wants_play {
            return Ok(self.state());
        }
        self.toggle_play()
    }

    pub fn pause(&mut self) -> Result<PlaybackState, ContractError> {
        if !self.wants_play {
            return Ok(self.state());
        }
        self.toggle_play()
    }

    /// Begin a scrub: pause everything and cancel a pending auto-seek
    pub fn seek_start(&mut self) -> Result<(), ContractError> {
        self.require_event()?;
        self.seeking = true;
        self.wants_play = false;
        self.auto_seek_pending = false;
        self.timers.clear();
        self.refresh();
        Ok(())
    }

    /// Move the playhead to `target` global seconds.
    ///
    /// Deferred until durations settle. Non-finite targets are ignored.
    pub fn seek(&mut self, target: f64) -> Result<(), ContractError> {
        self.require_event()?;
        if !target.is_finite() {
            debug!(target, "ignoring non-finite seek");
            return Ok(());
        }
        if self.durations_pending {
            debug!(target, "durations pending, seek deferred");
            self.pending_seek = Some(target);
            self.auto_seek_pending = false;
            return Ok(());
        }
        self.apply_global_seek(target)?;
        self.refresh();
        Ok(())
    }

    /// End a scrub; playback resumes after the grace delay
    pub fn seek_end(&mut self) -> Result<(), ContractError> {
        self.require_event()?;
        self.seeking = false;
        self.schedule(Deferred::Resume);
        self.refresh();
        Ok(())
    }

    /// `seek_start`, `seek`, `seek_end` in one call
    pub fn seek_to(&mut self, target: f64) -> Result<(), ContractError> {
        self.seek_start()?;
        self.seek(target)?;
        self.seek_end()
    }

    /// Jump by `delta` seconds, optionally scaled by the playback rate
    pub fn skip(&mut self, delta: f64, scaled_by_rate: bool) -> Result<(), ContractError> {
        self.require_event()?;
        let step = if scaled_by_rate {
            delta * self.playback_rate
        } else {
            delta
        };
        let target = (self.global_time + step).clamp(0.0, self.timeline.total());
        self.seek(target)
    }

    /// Pause, return to zero, resume after the grace delay
    pub fn reset_to_start(&mut self) -> Result<(), ContractError> {
        self.require_event()?;
        self.wants_play = false;
        self.timers.clear();
        self.refresh();
        self.seek(0.0)?;
        self.schedule(Deferred::Resume);
        Ok(())
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> Result<(), ContractError> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(ContractError::InvalidPlaybackRate { rate });
        }
        self.playback_rate = rate;
        for track in self.tracks.values_mut() {
            if track.source().is_some() {
                track.set_playback_rate(rate);
            }
        }
        debug!(rate, "playback rate set");
        Ok(())
    }

    /// Remember `camera` as the preferred master. Returns the effective master.
    pub fn set_master_camera(&mut self, camera: CameraId) -> Option<CameraId> {
        let before = self.master_camera();
        self.preferred_camera = camera;
        let after = self.master_camera();

        if before != after {
            self.stall_counters.clear();
            self.buffering = after
                .and_then(|m| self.tracks.get(&m))
                .is_some_and(|t| t.source().is_some() && !t.ready_state().can_play());
            debug!(master = ?after, buffering = self.buffering, "master camera changed");
            self.refresh();
        }
        after
    }

    // ----- host input -----

    /// Feed an asynchronous track notification
    #[instrument(level = "trace", name = "engine_track_event", skip(self))]
    pub fn on_track_event(&mut self, event: TrackEvent) -> Result<(), ContractError> {
        match event {
            TrackEvent::Loaded { camera, handle_id } => self.on_loaded(camera, handle_id),
            TrackEvent::Ended { camera, handle_id } => self.on_ended(camera, handle_id),
            TrackEvent::PlayRejected { camera, rejection } => {
                self.handle_rejection(camera, rejection);
                Ok(())
            }
        }
    }

    /// Fire due deferred commands, then run the frame tick if one is due
    pub fn pump(&mut self) -> Option<TickReport> {
        let now = self.clock.now();
        self.fire_timers(now);
        let token = self.scheduler.due(now)?;
        self.tick(token)
    }

    /// One drift-correction pass. A stale or reentrant token is a no-op.
    #[instrument(level = "trace", name = "engine_tick", skip(self))]
    pub fn tick(&mut self, token: TickToken) -> Option<TickReport> {
        let now = self.clock.now();
        if !self.scheduler.enter(token, now) {
            trace!("stale tick skipped");
            return None;
        }
        let report = self.tick_body();
        self.scheduler.exit();
        if !self.state().is_playing() {
            self.scheduler.cancel();
        }
        report
    }

    // ----- queries -----

    pub fn state(&self) -> PlaybackState {
        if self.event.is_none() {
            PlaybackState::Idle
        } else if self.seeking {
            PlaybackState::Seeking
        } else if self.ended {
            PlaybackState::Ended
        } else if self.buffering {
            PlaybackState::Buffering
        } else if self.wants_play {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    /// Preferred camera if available in the active clip, else front, else
    /// the first available in priority order
    pub fn master_camera(&self) -> Option<CameraId> {
        let available = self.available_cameras();
        if available.contains(&self.preferred_camera) {
            Some(self.preferred_camera)
        } else if available.contains(&CameraId::Front) {
            Some(CameraId::Front)
        } else {
            available.first().copied()
        }
    }

    /// Cameras with a handle in the active clip
    pub fn available_cameras(&self) -> Vec<CameraId> {
        if let Some(handles) = self.window.handles(self.clip_index) {
            return handles.keys().copied().collect();
        }
        self.event
            .as_ref()
            .and_then(|e| e.clip(self.clip_index))
            .map(|c| c.cameras().collect())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        let total = self.timeline.total();
        PlaybackSnapshot {
            state: self.state(),
            clip_index: self.clip_index,
            clip_count: self.event.as_ref().map_or(0, Event::clip_count),
            local_time: self.local_time,
            global_time: self.global_time,
            total_duration: total,
            playback_rate: self.playback_rate,
            master_camera: self.master_camera(),
            available_cameras: self.available_cameras(),
            progress: ratio(self.global_time, total),
            durations_pending: self.durations_pending,
        }
    }

    /// Wall-clock time under the playhead
    pub fn wall_clock_time(&self) -> Option<NaiveDateTime> {
        let clip = self.event.as_ref()?.clip(self.clip_index)?;
        Some(clip.clock_time_at(self.local_time))
    }

    pub fn event(&self) -> Option<&Event> {
        self.event.as_ref()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn window(&self) -> &ResourceWindow<A> {
        &self.window
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn clip_index(&self) -> usize {
        self.clip_index
    }

    pub fn local_time(&self) -> f64 {
        self.local_time
    }

    pub fn global_time(&self) -> f64 {
        self.global_time
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn durations_pending(&self) -> bool {
        self.durations_pending
    }

    pub fn track(&self, camera: CameraId) -> Option<&T> {
        self.tracks.get(&camera)
    }

    pub fn track_mut(&mut self, camera: CameraId) -> Option<&mut T> {
        self.tracks.get_mut(&camera)
    }

    pub fn tracks_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.tracks.values_mut()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.drain(..).collect()
    }

    // ----- internals -----

    fn require_event(&self) -> Result<&Event, ContractError> {
        self.event.as_ref().ok_or(ContractError::NoEventLoaded)
    }

    /// Switch the active clip: window policy, track (re)loads, master buffering
    fn activate_clip(&mut self, index: usize) -> Result<(), ContractError> {
        let event = self.event.as_ref().ok_or(ContractError::NoEventLoaded)?;
        self.scheduler.cancel();
        self.stall_counters.clear();
        let handles = self.window.activate(event, index)?.clone();
        self.clip_index = index;

        let master = self.master_camera();
        let mut master_reloaded = false;
        for (camera, track) in self.tracks.iter_mut() {
            match handles.get(camera) {
                Some(handle) => {
                    if track.source() != Some(handle.id) {
                        track.load(handle);
                        master_reloaded |= Some(*camera) == master;
                    }
                    track.set_playback_rate(self.playback_rate);
                }
                None if track.source().is_some() => track.unload(),
                None => {}
            }
        }

        self.buffering = master
            .and_then(|m| self.tracks.get(&m))
            .is_some_and(|t| master_reloaded || !t.ready_state().can_play());
        debug!(clip = index, master = ?master, buffering = self.buffering, "clip activated");
        self.refresh();
        Ok(())
    }

    fn apply_global_seek(&mut self, target: f64) -> Result<(), ContractError> {
        let target = target.clamp(0.0, self.timeline.total().max(0.0));
        let Some(pos) = self.timeline.locate(target) else {
            return Ok(());
        };

        self.global_time = target;
        self.local_time = pos.local_time;
        self.stall_counters.clear();
        self.ended = false;
        metrics::counter!("playback_seeks_total").increment(1);
        debug!(target, clip = pos.clip_index, local = pos.local_time, "seek applied");

        if pos.clip_index != self.clip_index {
            return self.activate_clip(pos.clip_index);
        }
        for track in self.tracks.values_mut() {
            if track.source().is_some() && track.ready_state() > ReadyState::HaveNothing {
                track.set_current_time(pos.local_time);
            }
        }
        Ok(())
    }

    /// Push play/pause to every loaded track and start or stop the tick
    fn refresh(&mut self) {
        let playing = self.state().is_playing();
        let mut rejections = Vec::new();
        for (camera, track) in self.tracks.iter_mut() {
            if track.source().is_none() {
                continue;
            }
            if playing {
                if track.is_paused() && !track.has_ended() {
                    if let Err(rejection) = track.play() {
                        rejections.push((*camera, rejection));
                    }
                }
            } else if !track.is_paused() {
                track.pause();
            }
        }
        for (camera, rejection) in rejections {
            self.handle_rejection(camera, rejection);
        }

        if playing {
            self.scheduler.start(self.clock.now());
        } else {
            self.scheduler.cancel();
            self.stall_counters.clear();
        }
    }

    fn on_loaded(&mut self, camera: CameraId, handle_id: u64) -> Result<(), ContractError> {
        if !self.is_current(camera, handle_id) {
            trace!(camera = %camera, handle_id, "stale load ignored");
            return Ok(());
        }
        let local = self.local_time;
        let tolerance = self.config.sync.reload_tolerance_s;
        let rate = self.playback_rate;
        if let Some(track) = self.tracks.get_mut(&camera) {
            if (track.current_time() - local).abs() > tolerance {
                track.set_current_time(local);
            }
            track.set_playback_rate(rate);
        }
        if self.buffering && Some(camera) == self.master_camera() {
            debug!(camera = %camera, "master ready");
            self.buffering = false;
        }
        self.refresh();
        Ok(())
    }

    fn on_ended(&mut self, camera: CameraId, handle_id: u64) -> Result<(), ContractError> {
        if self.seeking || !self.is_current(camera, handle_id) || Some(camera) != self.master_camera() {
            return Ok(());
        }
        let clip_count = self.event.as_ref().map_or(0, Event::clip_count);
        let next = self.clip_index + 1;
        if next < clip_count {
            info!(from = self.clip_index, to = next, "clip advanced");
            metrics::counter!("playback_clip_advances_total").increment(1);
            self.local_time = 0.0;
            if let Some(offset) = self.timeline.offset(next) {
                self.global_time = offset;
            }
            self.activate_clip(next)
        } else if !self.wants_play {
            debug!(camera = %camera, "last clip ended while paused, ignored");
            Ok(())
        } else {
            info!(clips = clip_count, "event playback ended");
            self.ended = true;
            self.wants_play = false;
            self.global_time = self.timeline.total();
            self.refresh();
            Ok(())
        }
    }

    fn is_current(&self, camera: CameraId, handle_id: u64) -> bool {
        self.tracks
            .get(&camera)
            .is_some_and(|t| t.source() == Some(handle_id))
    }

    fn handle_rejection(&mut self, camera: CameraId, rejection: PlayRejection) {
        match rejection.classify() {
            RejectionClass::Benign => {
                trace!(camera = %camera, reason = %rejection, "play rejected");
                metrics::counter!("playback_play_rejections_total", "class" => "benign")
                    .increment(1);
            }
            RejectionClass::Unexpected => {
                warn!(camera = %camera, reason = %rejection, "play failed");
                metrics::counter!("playback_play_rejections_total", "class" => "unexpected")
                    .increment(1);
                let capacity = self.config.sync.diagnostics_capacity;
                if capacity == 0 {
                    return;
                }
                while self.diagnostics.len() >= capacity {
                    self.diagnostics.pop_front();
                }
                self.diagnostics.push_back(Diagnostic {
                    camera: Some(camera),
                    class: RejectionClass::Unexpected,
                    message: rejection.to_string(),
                });
            }
        }
    }

    fn schedule(&mut self, action: Deferred) {
        let due = self.clock.now() + Duration::from_millis(self.config.playback.seek_grace_ms);
        self.timers.retain(|t| t.action != action);
        self.timers.push(Timer { due, action });
    }

    fn fire_timers(&mut self, now: Duration) {
        if self.timers.iter().all(|t| t.due > now) {
            return;
        }
        let (due, pending): (Vec<Timer>, Vec<Timer>) =
            std::mem::take(&mut self.timers).into_iter().partition(|t| t.due <= now);
        self.timers = pending;

        for timer in due {
            match timer.action {
                Deferred::Resume => {
                    trace!("grace delay elapsed, resuming");
                    self.wants_play = true;
                }
                Deferred::Resync => self.resync_tracks(),
            }
        }
        self.refresh();
    }

    fn resync_tracks(&mut self) {
        let local = self.local_time;
        let tolerance = self.config.sync.reload_tolerance_s;
        for track in self.tracks.values_mut() {
            if track.source().is_some() && (track.current_time() - local).abs() > tolerance {
                track.set_current_time(local);
            }
        }
    }

    fn tick_body(&mut self) -> Option<TickReport> {
        if self.buffering {
            return None;
        }
        let master = self.master_camera();
        let master_state = master
            .and_then(|m| self.tracks.get(&m))
            .filter(|t| t.source().is_some())
            .map(|t| (t.current_time(), t.is_paused()));

        if let Some((time, paused)) = master_state {
            if !self.seeking && !paused {
                self.local_time = time;
                if let Some(global) = self.timeline.to_global(self.clip_index, time) {
                    self.global_time = global;
                }
            }
        }

        let mut report = TickReport {
            master_time: master_state.map(|(t, _)| t),
            ..Default::default()
        };
        if !self.wants_play {
            return Some(report);
        }

        let sync = &self.config.sync;
        let threshold = sync.drift_threshold(self.playback_rate);
        let mut rejections = Vec::new();

        for (&camera, track) in self.tracks.iter_mut() {
            if track.source().is_none() {
                continue;
            }

            let stalled = self.stall_counters.entry(camera).or_insert(0);
            if !track.is_paused() && track.ready_state().is_starved() {
                *stalled += 1;
                if *stalled > sync.stall_tick_limit {
                    let t = track.current_time();
                    track.set_current_time(t + sync.stall_nudge_s);
                    *stalled = 0;
                    debug!(camera = %camera, at = t, "stalled track nudged");
                    metrics::counter!("sync_stall_nudges_total").increment(1);
                    report.nudged.push(camera);
                }
            } else {
                *stalled = 0;
            }

            if Some(camera) == master {
                continue;
            }

            if let Some(master_time) = report.master_time {
                let drift = (track.current_time() - master_time).abs();
                report.max_drift = report.max_drift.max(drift);
                if drift > threshold && track.ready_state().can_play() {
                    track.set_current_time(master_time);
                    debug!(camera = %camera, drift, threshold, "follower retargeted");
                    metrics::counter!("sync_drift_corrections_total").increment(1);
                    metrics::histogram!("sync_drift_seconds").record(drift);
                    report.corrections.push(DriftCorrection { camera, drift });
                }
            }

            if track.is_paused() && !track.has_ended() && track.ready_state().can_play() {
                if let Err(rejection) = track.play() {
                    rejections.push((camera, rejection));
                }
            }
        }

        for (camera, rejection) in rejections {
            self.handle_rejection(camera, rejection);
        }
        self.prefetch_near_end();
        Some(report)
    }

    /// Materialize the next clip once the playhead is near the end of this one
    fn prefetch_near_end(&mut self) {
        let Some(event) = self.event.as_ref() else {
            return;
        };
        let next = self.clip_index + 1;
        if next >= event.clip_count() || self.window.is_materialized(next) {
            return;
        }
        let duration = self
            .timeline
            .duration(self.clip_index)
            .unwrap_or(self.config.playback.default_clip_duration_s);
        if self.local_time <= duration - self.config.window.near_end_prefetch_s {
            return;
        }
        match self.window.materialize(event, next) {
            Ok(handles) => debug!(clip = next, cameras = handles.len(), "near-end prefetch"),
            Err(e) => warn!(clip = next, error = %e, "near-end prefetch failed"),
        }
    }
}
