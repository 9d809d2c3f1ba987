//! Time -> sample lookup

use contracts::TelemetrySample;

/// Frame rate of the vehicle's cameras
pub const DEFAULT_FPS: f64 = 36.0;

/// Nearest sample further than this is stale
pub const MAX_FRAME_DISTANCE: u64 = 10;

/// Sample nearest to `time` seconds, within [`MAX_FRAME_DISTANCE`] frames.
pub fn sample_at(samples: &[TelemetrySample], time: f64, fps: f64) -> Option<&TelemetrySample> {
    sample_at_within(samples, time, fps, MAX_FRAME_DISTANCE)
}

/// Sample nearest to frame `floor(time * fps)`; ties keep the earlier sample.
pub fn sample_at_within(
    samples: &[TelemetrySample],
    time: f64,
    fps: f64,
    max_distance: u64,
) -> Option<&TelemetrySample> {
    let target = (time * fps).floor();
    if !target.is_finite() {
        return None;
    }
    let target = target as i128;

    let mut best: Option<(&TelemetrySample, u128)> = None;
    for sample in samples {
        let distance = (i128::from(sample.frame_index) - target).unsigned_abs();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((sample, distance));
        }
    }

    best.filter(|(_, d)| *d <= u128::from(max_distance))
        .map(|(s, _)| s)
}
