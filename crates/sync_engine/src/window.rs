//! Resource window over the clips of the loaded event.
//!
//! Handles live in a `Slab` arena; a `BTreeMap` maps clip index to slab key.
//! Only this type allocates or revokes handles, everything else borrows them.

use std::collections::BTreeMap;
use std::fmt;

use contracts::{CameraId, ContractError, Event, ResourceAllocator, ResourceHandle, WindowConfig};
use slab::Slab;
use tracing::{debug, instrument, warn};

/// Handles materialized for one clip
pub type ClipHandles = BTreeMap<CameraId, ResourceHandle>;

#[derive(Debug)]
struct WindowEntry {
    clip_index: usize,
    handles: ClipHandles,
}

/// Materialize/release lifecycle for per-clip media handles.
///
/// Activating clip `i` keeps `i ..= i + prefetch_ahead` materialized and
/// releases everything at or below `i - release_behind` and everything past
/// the prefetch range. A failed camera leaves the rest of its clip usable.
pub struct ResourceWindow<A> {
    allocator: A,
    entries: Slab<WindowEntry>,
    index: BTreeMap<usize, usize>,
    active: Option<usize>,
    prefetch_ahead: usize,
    release_behind: usize,
}

impl<A> fmt::Debug for ResourceWindow<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceWindow")
            .field("active", &self.active)
            .field("materialized", &self.index.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<A: ResourceAllocator> ResourceWindow<A> {
    pub fn new(allocator: A, config: &WindowConfig) -> Self {
        Self {
            allocator,
            entries: Slab::new(),
            index: BTreeMap::new(),
            active: None,
            prefetch_ahead: config.prefetch_ahead,
            release_behind: config.release_behind.max(2),
        }
    }

    /// Allocate one handle per recorded camera of clip `index`.
    ///
    /// Idempotent: a materialized clip returns its cached handles.
    #[instrument(level = "trace", name = "window_materialize", skip(self, event), fields(event = %event.id))]
    pub fn materialize(&mut self, event: &Event, index: usize) -> Result<&ClipHandles, ContractError> {
        let key = match self.index.get(&index) {
            Some(&key) => key,
            None => {
                let clip = event.clip(index).ok_or(ContractError::ClipOutOfRange {
                    index,
                    clip_count: event.clip_count(),
                })?;

                let mut handles = ClipHandles::new();
                for (&camera, source) in &clip.videos {
                    match self.allocator.allocate(index, camera, source) {
                        Ok(handle) => {
                            handles.insert(camera, handle);
                        }
                        Err(e) => {
                            warn!(clip = index, camera = %camera, error = %e, "allocation failed, camera shows no signal");
                            metrics::counter!("window_allocation_failures_total").increment(1);
                        }
                    }
                }

                debug!(clip = index, cameras = handles.len(), "clip materialized");
                metrics::counter!("window_materializations_total").increment(1);

                let key = self.entries.insert(WindowEntry {
                    clip_index: index,
                    handles,
                });
                self.index.insert(index, key);
                self.record_size();
                key
            }
        };
        Ok(&self.entries[key].handles)
    }

    /// Revoke every handle of clip `index`. Returns whether anything was released.
    pub fn release(&mut self, index: usize) -> Result<bool, ContractError> {
        if self.active == Some(index) {
            return Err(ContractError::ReleaseActiveClip { index });
        }
        Ok(self.evict(index))
    }

    /// Make `index` the active clip and apply the window policy
    #[instrument(level = "trace", name = "window_activate", skip(self, event))]
    pub fn activate(&mut self, event: &Event, index: usize) -> Result<&ClipHandles, ContractError> {
        if index >= event.clip_count() {
            return Err(ContractError::ClipOutOfRange {
                index,
                clip_count: event.clip_count(),
            });
        }
        self.active = Some(index);

        let last = (index + self.prefetch_ahead).min(event.clip_count() - 1);
        for ahead in index + 1..=last {
            self.materialize(event, ahead)?;
        }

        let stale: Vec<usize> = self
            .index
            .keys()
            .copied()
            .filter(|&i| i + self.release_behind <= index || i > last)
            .collect();
        for i in stale {
            self.evict(i);
        }

        self.materialize(event, index)
    }

    /// Release everything, the active clip included. Returns the number of clips released.
    pub fn release_all(&mut self) -> usize {
        self.active = None;
        let all: Vec<usize> = self.index.keys().copied().collect();
        all.into_iter().filter(|&i| self.evict(i)).count()
    }

    pub fn handles(&self, index: usize) -> Option<&ClipHandles> {
        self.index.get(&index).map(|&key| &self.entries[key].handles)
    }

    pub fn handle(&self, index: usize, camera: CameraId) -> Option<&ResourceHandle> {
        self.handles(index)?.get(&camera)
    }

    pub fn is_materialized(&self, index: usize) -> bool {
        self.index.contains_key(&index)
    }

    /// Materialized clip indices, ascending
    pub fn materialized(&self) -> impl Iterator<Item = usize> + '_ {
        self.index.keys().copied()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    fn evict(&mut self, index: usize) -> bool {
        let Some(key) = self.index.remove(&index) else {
            return false;
        };
        let entry = self.entries.remove(key);
        for handle in entry.handles.values() {
            self.allocator.revoke(handle);
        }
        debug!(clip = entry.clip_index, handles = entry.handles.len(), "clip released");
        metrics::counter!("window_releases_total").increment(1);
        self.record_size();
        true
    }

    fn record_size(&self) {
        metrics::gauge!("window_materialized_clips").set(self.index.len() as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{event, FakeAllocator};

    const CAMS: [CameraId; 4] = [
        CameraId::Front,
        CameraId::Back,
        CameraId::LeftRepeater,
        CameraId::RightRepeater,
    ];

    fn window() -> ResourceWindow<FakeAllocator> {
        ResourceWindow::new(FakeAllocator::default(), &WindowConfig::default())
    }

    #[test]
    fn test_materialize_is_idempotent() {
        let evt = event(3, &CAMS);
        let mut w = window();
        let first: Vec<u64> = w.materialize(&evt, 1).unwrap().values().map(|h| h.id).collect();
        let second: Vec<u64> = w.materialize(&evt, 1).unwrap().values().map(|h| h.id).collect();
        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
        assert_eq!(w.allocator().live.len(), 4);
    }

    #[test]
    fn test_sequential_activation_releases_behind() {
        let evt = event(4, &CAMS);
        let mut w = window();
        for i in 0..4 {
            w.activate(&evt, i).unwrap();
        }
        assert!(!w.is_materialized(0));
        assert!(!w.is_materialized(1));
        assert!(w.is_materialized(2));
        assert!(w.is_materialized(3));
        assert_eq!(w.allocator().live.len(), 8);
    }

    #[test]
    fn test_activation_prefetches_next() {
        let evt = event(5, &CAMS);
        let mut w = window();
        w.activate(&evt, 0).unwrap();
        assert_eq!(w.materialized().collect::<Vec<_>>(), vec![0, 1]);
        w.activate(&evt, 1).unwrap();
        assert_eq!(w.materialized().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_backward_jump_bounds_window() {
        let evt = event(8, &CAMS);
        let mut w = window();
        w.activate(&evt, 6).unwrap();
        w.activate(&evt, 1).unwrap();
        assert_eq!(w.materialized().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_partial_failure_keeps_other_cameras() {
        let evt = event(2, &CAMS);
        let mut alloc = FakeAllocator::default();
        alloc.failing.insert(CameraId::Back);
        let mut w = ResourceWindow::new(alloc, &WindowConfig::default());
        let handles = w.materialize(&evt, 0).unwrap();
        assert_eq!(handles.len(), 3);
        assert!(!handles.contains_key(&CameraId::Back));
    }

    #[test]
    fn test_release_rules() {
        let evt = event(3, &CAMS);
        let mut w = window();
        w.activate(&evt, 0).unwrap();
        assert!(matches!(
            w.release(0),
            Err(ContractError::ReleaseActiveClip { index: 0 })
        ));
        assert!(w.release(1).unwrap());
        assert!(!w.release(1).unwrap());
        assert!(!w.release(2).unwrap());
    }

    #[test]
    fn test_release_all_revokes_everything() {
        let evt = event(3, &CAMS);
        let mut w = window();
        w.activate(&evt, 1).unwrap();
        assert_eq!(w.release_all(), 2);
        assert!(w.is_empty());
        assert!(w.allocator().live.is_empty());
        assert_eq!(w.active(), None);
    }

    #[test]
    fn test_out_of_range() {
        let evt = event(2, &CAMS);
        let mut w = window();
        assert!(matches!(
            w.activate(&evt, 2),
            Err(ContractError::ClipOutOfRange { index: 2, clip_count: 2 })
        ));
    }
}
