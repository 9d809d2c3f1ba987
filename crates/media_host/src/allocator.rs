//! Filesystem-backed resource allocator
//!
//! A handle is a lease on one clip file; the locator is the file's path.

use std::collections::HashMap;
use std::path::PathBuf;

use contracts::{CameraId, ContractError, ResourceAllocator, ResourceHandle, VideoSource};
use tracing::{trace, warn};

/// Hands out handles for clip files and tracks which are still live.
#[derive(Debug)]
pub struct FsAllocator {
    next_id: u64,
    live: HashMap<u64, PathBuf>,
    peak: usize,
    verify_files: bool,
}

impl Default for FsAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl FsAllocator {
    /// Allocator that refuses files it cannot find
    pub fn new() -> Self {
        Self {
            next_id: 0,
            live: HashMap::new(),
            peak: 0,
            verify_files: true,
        }
    }

    /// Allocator that trusts the listing (simulated media)
    pub fn unchecked() -> Self {
        Self {
            verify_files: false,
            ..Self::new()
        }
    }

    /// Handles allocated and not yet revoked
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Highest `live_count` seen
    pub fn peak_live(&self) -> usize {
        self.peak
    }

    pub fn is_live(&self, id: u64) -> bool {
        self.live.contains_key(&id)
    }
}

impl ResourceAllocator for FsAllocator {
    fn allocate(
        &mut self,
        clip_index: usize,
        camera: CameraId,
        source: &VideoSource,
    ) -> Result<ResourceHandle, ContractError> {
        if self.verify_files && !source.location.is_file() {
            return Err(ContractError::resource_allocation(
                clip_index,
                camera,
                format!("'{}' is not a readable file", source.location.display()),
            ));
        }

        self.next_id += 1;
        let id = self.next_id;
        self.live.insert(id, source.location.clone());
        self.peak = self.peak.max(self.live.len());
        metrics::gauge!("media_live_handles").set(self.live.len() as f64);
        trace!(id, clip = clip_index, camera = %camera, "handle allocated");

        Ok(ResourceHandle::new(
            id,
            camera,
            clip_index,
            source.location.display().to_string(),
        ))
    }

    fn revoke(&mut self, handle: &ResourceHandle) {
        if self.live.remove(&handle.id).is_none() {
            warn!(handle = ?handle, "revoking unknown handle");
            return;
        }
        metrics::gauge!("media_live_handles").set(self.live.len() as f64);
        trace!(id = handle.id, "handle revoked");
    }
}
