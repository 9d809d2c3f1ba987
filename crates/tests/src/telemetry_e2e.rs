//! Clip file -> telemetry samples -> overlay rows

use contracts::TelemetryField;

use crate::fixtures::{clip_file, float_field, slice, small_varint_field, telemetry_sei};

fn drive_sample(speed_mps: f32, gear: u8) -> Vec<u8> {
    let mut tags = small_varint_field(2, gear);
    tags.extend(float_field(4, speed_mps));
    tags.extend(float_field(14, 3.0));
    tags.extend(float_field(15, 4.0));
    telemetry_sei(&tags)
}

/// One SEI per second of 36 fps video
fn two_second_clip() -> Vec<u8> {
    let mut units = Vec::new();
    for second in 0..2u8 {
        units.push(drive_sample(10.0 * f32::from(second + 1), 1));
        units.extend(std::iter::repeat_with(slice).take(36));
    }
    clip_file(2_000, &units)
}

#[test]
fn test_extract_and_format_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("2024-03-09_10-00-00-front.mp4");
    std::fs::write(&path, two_second_clip()).unwrap();

    let samples = telemetry::extract_from_file(&path).unwrap();
    let frames: Vec<u64> = samples.iter().map(|s| s.frame_index).collect();
    assert_eq!(frames, vec![0, 36]);

    let at = telemetry::sample_at(&samples, 1.02, telemetry::DEFAULT_FPS).unwrap();
    assert_eq!(at.frame_index, 36);

    let rows = telemetry::format_sample(at);
    let value = |field| rows.iter().find(|r| r.field == field).map(|r| r.value.as_str());
    assert_eq!(value(TelemetryField::GearState), Some("D"));
    assert_eq!(value(TelemetryField::VehicleSpeedMps), Some("72.0"));
    assert_eq!(value(TelemetryField::LinearAccelerationMps2X), Some("3.00"));

    let g = telemetry::total_g(at).unwrap();
    assert!((g - 5.0 / 9.806_65).abs() < 1e-6);

    assert_eq!(telemetry::probe_file_duration(&path).unwrap(), 2.0);
}

#[test]
fn test_lookup_beyond_last_sample_is_stale() {
    let samples = telemetry::extract_telemetry(&two_second_clip());
    // frame 72 is 36 frames past the last sample
    assert!(telemetry::sample_at(&samples, 2.0, telemetry::DEFAULT_FPS).is_none());
    assert!(telemetry::sample_at(&samples, 0.2, telemetry::DEFAULT_FPS).is_some());
}

#[test]
fn test_clip_without_telemetry() {
    let file = clip_file(1_000, &[slice(), slice()]);
    assert!(telemetry::extract_telemetry(&file).is_empty());
    assert_eq!(telemetry::probe_duration(&file).unwrap(), 1.0);
}
