//! In-crate doubles for the media traits

use std::collections::BTreeSet;

use chrono::NaiveDate;
use contracts::{
    CameraId, Clip, ContractError, Event, MediaTrack, PlayRejection, ReadyState, ResourceAllocator,
    ResourceHandle, VideoSource,
};

#[derive(Debug)]
pub struct FakeTrack {
    pub camera: CameraId,
    pub source: Option<u64>,
    pub time: f64,
    pub duration: Option<f64>,
    pub ready: ReadyState,
    pub paused: bool,
    pub ended: bool,
    pub rate: f64,
    pub reject_next: Option<PlayRejection>,
    pub seeks: Vec<f64>,
}

impl FakeTrack {
    pub fn new(camera: CameraId) -> Self {
        Self {
            camera,
            source: None,
            time: 0.0,
            duration: None,
            ready: ReadyState::HaveNothing,
            paused: true,
            ended: false,
            rate: 1.0,
            reject_next: None,
            seeks: Vec::new(),
        }
    }

    pub fn all() -> Vec<FakeTrack> {
        CameraId::ALL.into_iter().map(FakeTrack::new).collect()
    }
}

impl MediaTrack for FakeTrack {
    fn camera(&self) -> CameraId {
        self.camera
    }

    fn load(&mut self, handle: &ResourceHandle) {
        self.source = Some(handle.id);
        self.time = 0.0;
        self.ended = false;
        self.ready = ReadyState::HaveEnoughData;
    }

    fn unload(&mut self) {
        self.source = None;
        self.paused = true;
        self.ready = ReadyState::HaveNothing;
    }

    fn source(&self) -> Option<u64> {
        self.source
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.time = seconds;
        self.seeks.push(seconds);
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn ready_state(&self) -> ReadyState {
        self.ready
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn has_ended(&self) -> bool {
        self.ended
    }

    fn play(&mut self) -> Result<(), PlayRejection> {
        if let Some(rejection) = self.reject_next.take() {
            return Err(rejection);
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    fn playback_rate(&self) -> f64 {
        self.rate
    }
}

#[derive(Debug, Default)]
pub struct FakeAllocator {
    next_id: u64,
    pub live: BTreeSet<u64>,
    pub failing: BTreeSet<CameraId>,
    pub revoked: usize,
}

impl ResourceAllocator for FakeAllocator {
    fn allocate(
        &mut self,
        clip_index: usize,
        camera: CameraId,
        source: &VideoSource,
    ) -> Result<ResourceHandle, ContractError> {
        if self.failing.contains(&camera) {
            return Err(ContractError::resource_allocation(clip_index, camera, "refused"));
        }
        self.next_id += 1;
        self.live.insert(self.next_id);
        Ok(ResourceHandle::new(
            self.next_id,
            camera,
            clip_index,
            source.relative_path.as_str(),
        ))
    }

    fn revoke(&mut self, handle: &ResourceHandle) {
        self.live.remove(&handle.id);
        self.revoked += 1;
    }
}

/// Event with `clip_count` one-minute clips, each recorded by `cameras`
pub fn event(clip_count: usize, cameras: &[CameraId]) -> Event {
    let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap_or_default();
    let clips = (0..clip_count)
        .map(|i| {
            let key = day.and_hms_opt(10, i as u32, 0).unwrap_or_default();
            let mut clip = Clip::new(key);
            for cam in cameras {
                let path = format!("E/2024-03-09_10-{i:02}-00-{}.mp4", cam.file_stem());
                clip.videos.insert(
                    *cam,
                    VideoSource {
                        relative_path: path.clone(),
                        location: path.into(),
                    },
                );
            }
            clip
        })
        .collect();
    Event {
        id: "E".into(),
        name: "E".into(),
        clips,
        metadata: None,
        thumbnail: None,
        read: false,
    }
}
