//! CameraId - fixed camera enumeration
//!
//! Every per-camera map in the workspace is keyed by this enum, so an unknown
//! camera is an `Option::None` at the parse boundary rather than a stray string key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Camera angle recorded by the vehicle.
///
/// Declaration order is the grid-snapshot order and doubles as the fallback
/// priority when choosing a master camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraId {
    Front,
    Back,
    LeftRepeater,
    RightRepeater,
    Inside,
}

/// One cell of the 2-column snapshot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotCell {
    pub camera: CameraId,
    pub column: usize,
    pub row: usize,
    pub mirrored: bool,
}

impl CameraId {
    /// All cameras in grid-snapshot order.
    pub const ALL: [CameraId; 5] = [
        CameraId::Front,
        CameraId::Back,
        CameraId::LeftRepeater,
        CameraId::RightRepeater,
        CameraId::Inside,
    ];

    const SNAPSHOT_COLUMNS: usize = 2;

    /// Camera suffix used in clip file names (`..._HH-MM-SS-<stem>.mp4`).
    pub fn file_stem(self) -> &'static str {
        match self {
            CameraId::Front => "front",
            CameraId::Back => "back",
            CameraId::LeftRepeater => "left_repeater",
            CameraId::RightRepeater => "right_repeater",
            CameraId::Inside => "inside",
        }
    }

    /// Parse a file-name camera suffix. Unknown suffixes are absent, not errors.
    pub fn from_file_stem(stem: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.file_stem() == stem)
    }

    /// Short label for overlays.
    pub fn display_name(self) -> &'static str {
        match self {
            CameraId::Front => "Front",
            CameraId::Back => "Back",
            CameraId::LeftRepeater => "Left",
            CameraId::RightRepeater => "Right",
            CameraId::Inside => "Inside",
        }
    }

    /// Rear-facing angles are rendered mirrored.
    pub fn is_mirrored(self) -> bool {
        matches!(
            self,
            CameraId::Back | CameraId::LeftRepeater | CameraId::RightRepeater
        )
    }

    /// Position in the snapshot grid.
    pub fn grid_order(self) -> u8 {
        match self {
            CameraId::Front => 0,
            CameraId::Back => 1,
            CameraId::LeftRepeater => 2,
            CameraId::RightRepeater => 3,
            CameraId::Inside => 4,
        }
    }

    /// Position among the sub-view thumbnails.
    pub fn view_order(self) -> u8 {
        match self {
            CameraId::LeftRepeater => 0,
            CameraId::Front => 1,
            CameraId::Back => 2,
            CameraId::RightRepeater => 3,
            CameraId::Inside => 4,
        }
    }

    /// All cameras sorted for the sub-view strip.
    pub fn by_view_order() -> [CameraId; 5] {
        let mut cams = Self::ALL;
        cams.sort_by_key(|c| c.view_order());
        cams
    }

    /// Resolve the `camera` index stored in `event.json`.
    pub fn from_metadata_index(index: u32) -> Option<Self> {
        match index {
            0..=2 => Some(CameraId::Front),
            3 | 5 => Some(CameraId::LeftRepeater),
            4 | 6 => Some(CameraId::RightRepeater),
            7 => Some(CameraId::Back),
            8 => Some(CameraId::Inside),
            _ => None,
        }
    }

    /// Lay out the given cameras in the 2-column snapshot grid.
    ///
    /// The cabin camera is never part of a snapshot.
    pub fn snapshot_grid(present: impl IntoIterator<Item = CameraId>) -> Vec<SnapshotCell> {
        let mut cams: Vec<CameraId> = present
            .into_iter()
            .filter(|c| *c != CameraId::Inside)
            .collect();
        cams.sort_by_key(|c| c.grid_order());
        cams.dedup();

        cams.into_iter()
            .enumerate()
            .map(|(i, camera)| SnapshotCell {
                camera,
                column: i % Self::SNAPSHOT_COLUMNS,
                row: i / Self::SNAPSHOT_COLUMNS,
                mirrored: camera.is_mirrored(),
            })
            .collect()
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

impl FromStr for CameraId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "left" => Ok(CameraId::LeftRepeater),
            "right" => Ok(CameraId::RightRepeater),
            other => Self::from_file_stem(other).ok_or_else(|| format!("unknown camera: {s}")),
        }
    }
}
