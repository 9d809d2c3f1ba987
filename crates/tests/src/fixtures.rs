//! Synthetic recordings and clip files

use std::fs;
use std::path::{Path, PathBuf};

/// One ISO BMFF box
pub fn mp4_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out
}

/// `moov` holding a version 0 `mvhd` with a millisecond timescale
pub fn moov(duration_ms: u32) -> Vec<u8> {
    let mut mvhd = vec![0u8; 4];
    mvhd.extend_from_slice(&[0u8; 8]);
    mvhd.extend_from_slice(&1000u32.to_be_bytes());
    mvhd.extend_from_slice(&duration_ms.to_be_bytes());
    mvhd.extend_from_slice(&[0u8; 80]);
    mp4_box(b"moov", &mp4_box(b"mvhd", &mvhd))
}

/// AVCC length-prefixed NAL unit
fn avcc(unit: &[u8]) -> Vec<u8> {
    let mut out = (unit.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(unit);
    out
}

/// Protobuf-style fixed32 field
pub fn float_field(field: u8, value: f32) -> Vec<u8> {
    let mut out = vec![(field << 3) | 5];
    out.extend_from_slice(&value.to_le_bytes());
    out
}

/// Protobuf-style varint field (values below 128)
pub fn small_varint_field(field: u8, value: u8) -> Vec<u8> {
    vec![field << 3, value]
}

/// Telemetry SEI unit around a tag stream
pub fn telemetry_sei(tag_stream: &[u8]) -> Vec<u8> {
    let mut nal = vec![0x06, 0x05, 0x20, 0x42, 0x42, 0x42, 0x69];
    nal.extend_from_slice(tag_stream);
    nal.push(0x80);
    nal
}

/// Non-IDR coded slice
pub fn slice() -> Vec<u8> {
    vec![0x41, 0x9A, 0x10]
}

/// `ftyp` + `moov` + `mdat` carrying `units`
pub fn clip_file(duration_ms: u32, units: &[Vec<u8>]) -> Vec<u8> {
    let mdat: Vec<u8> = units.iter().flat_map(|u| avcc(u)).collect();
    let mut file = mp4_box(b"ftyp", b"isom\0\0\0\0");
    file.extend(moov(duration_ms));
    file.extend(mp4_box(b"mdat", &mdat));
    file
}

/// `SentryClips/<event>/` with `minutes` clips per camera, each `duration_ms` long.
///
/// Clip names start at `2024-03-09 10:00:00`, one minute apart.
pub fn sentry_event(
    root: &Path,
    event: &str,
    cameras: &[&str],
    minutes: u32,
    duration_ms: u32,
    metadata: Option<&str>,
) -> PathBuf {
    let dir = root.join("SentryClips").join(event);
    fs::create_dir_all(&dir).unwrap();
    for minute in 0..minutes {
        for camera in cameras {
            let name = format!("2024-03-09_10-{minute:02}-00-{camera}.mp4");
            fs::write(dir.join(name), clip_file(duration_ms, &[slice()])).unwrap();
        }
    }
    if let Some(json) = metadata {
        fs::write(dir.join("event.json"), json).unwrap();
    }
    dir
}
