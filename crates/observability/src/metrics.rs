//! Playback metrics
//!
//! Records per-tick drift and stall data from [`TickReport`]s and keeps an
//! in-memory summary of a playback run.

use std::collections::BTreeMap;

use contracts::{CameraId, Diagnostic, PlaybackSnapshot, TickReport};
use metrics::{counter, gauge, histogram};

/// Record one drift-correction pass.
///
/// # Example
///
/// ```ignore
/// if let Some(report) = engine.pump() {
///     observability::record_tick_metrics(&report);
/// }
/// ```
pub fn record_tick_metrics(report: &TickReport) {
    counter!("sentry_viewer_ticks_total").increment(1);
    gauge!("sentry_viewer_max_drift_seconds").set(report.max_drift);
    histogram!("sentry_viewer_tick_max_drift_seconds").record(report.max_drift);

    if let Some(master_time) = report.master_time {
        gauge!("sentry_viewer_master_time_seconds").set(master_time);
    }

    for correction in &report.corrections {
        counter!(
            "sentry_viewer_drift_corrections_total",
            "camera" => correction.camera.file_stem()
        )
        .increment(1);
    }
    for camera in &report.nudged {
        counter!("sentry_viewer_stall_nudges_total", "camera" => camera.file_stem()).increment(1);
    }
}

/// Record the playhead position
pub fn record_snapshot(snapshot: &PlaybackSnapshot) {
    gauge!("sentry_viewer_clip_index").set(snapshot.clip_index as f64);
    gauge!("sentry_viewer_global_time_seconds").set(snapshot.global_time);
    gauge!("sentry_viewer_progress_ratio").set(snapshot.progress);
    gauge!("sentry_viewer_playback_rate").set(snapshot.playback_rate);
}

/// Aggregates tick reports over a playback run.
#[derive(Debug, Clone, Default)]
pub struct PlaybackMetricsAggregator {
    /// Drift-correction passes seen
    pub total_ticks: u64,

    /// Followers retargeted onto the master
    pub total_corrections: u64,

    /// Stalled tracks nudged forward
    pub total_nudges: u64,

    /// Clip switches observed through snapshots
    pub clip_advances: u64,

    /// Unexpected play failures
    pub diagnostics: u64,

    /// Per-tick largest follower drift (s)
    pub drift_stats: RunningStats,

    /// Drift at the moment of correction (s)
    pub corrected_drift_stats: RunningStats,

    pub corrections_by_camera: BTreeMap<CameraId, u64>,

    last_clip: Option<usize>,
}

impl PlaybackMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, report: &TickReport) {
        self.total_ticks += 1;
        self.total_nudges += report.nudged.len() as u64;
        if report.master_time.is_some() {
            self.drift_stats.push(report.max_drift);
        }
        for correction in &report.corrections {
            self.total_corrections += 1;
            self.corrected_drift_stats.push(correction.drift);
            *self.corrections_by_camera.entry(correction.camera).or_insert(0) += 1;
        }
    }

    /// Count clip switches between successive snapshots
    pub fn observe(&mut self, snapshot: &PlaybackSnapshot) {
        if let Some(last) = self.last_clip {
            if snapshot.clip_index > last {
                self.clip_advances += (snapshot.clip_index - last) as u64;
            }
        }
        self.last_clip = Some(snapshot.clip_index);
    }

    pub fn record_diagnostics<'a>(&mut self, diagnostics: impl IntoIterator<Item = &'a Diagnostic>) {
        self.diagnostics += diagnostics.into_iter().count() as u64;
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_ticks: self.total_ticks,
            total_corrections: self.total_corrections,
            total_nudges: self.total_nudges,
            clip_advances: self.clip_advances,
            diagnostics: self.diagnostics,
            correction_rate: if self.total_ticks > 0 {
                self.total_corrections as f64 / self.total_ticks as f64 * 100.0
            } else {
                0.0
            },
            max_drift_s: StatsSummary::from(&self.drift_stats),
            corrected_drift_s: StatsSummary::from(&self.corrected_drift_stats),
            corrections_by_camera: self.corrections_by_camera.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Summary of a playback run
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_ticks: u64,
    pub total_corrections: u64,
    pub total_nudges: u64,
    pub clip_advances: u64,
    pub diagnostics: u64,
    /// Corrections per hundred ticks
    pub correction_rate: f64,
    pub max_drift_s: StatsSummary,
    pub corrected_drift_s: StatsSummary,
    pub corrections_by_camera: BTreeMap<CameraId, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Playback Metrics Summary ===")?;
        writeln!(f, "Sync ticks: {}", self.total_ticks)?;
        writeln!(
            f,
            "Drift corrections: {} ({:.2}%)",
            self.total_corrections, self.correction_rate
        )?;
        writeln!(f, "Stall nudges: {}", self.total_nudges)?;
        writeln!(f, "Clip advances: {}", self.clip_advances)?;
        writeln!(f, "Play failures: {}", self.diagnostics)?;
        writeln!(f, "Max drift per tick (s): {}", self.max_drift_s)?;
        writeln!(f, "Drift when corrected (s): {}", self.corrected_drift_s)?;

        if !self.corrections_by_camera.is_empty() {
            writeln!(f, "Corrections by camera:")?;
            for (camera, count) in &self.corrections_by_camera {
                writeln!(f, "  {}: {}", camera, count)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean/variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
