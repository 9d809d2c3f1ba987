//! Timeline mapping between event-global seconds and (clip, local seconds).
//!
//! Offsets are a prefix sum of clip durations. The last clip absorbs any
//! overflow, clamped to `duration - epsilon` so a seek never lands exactly on
//! the end boundary and re-triggers an advance.

use chrono::NaiveDateTime;
use contracts::Event;

/// Trigger times up to this far past a clip's end still count as inside it
const TRIGGER_SLACK_S: f64 = 1.0;

/// A point on the timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub clip_index: usize,
    pub local_time: f64,
}

/// `offsets[0] = 0`, `offsets[i] = offsets[i - 1] + durations[i - 1]`
pub fn build_offsets(durations: &[f64]) -> Vec<f64> {
    let mut sum = 0.0;
    durations
        .iter()
        .map(|d| {
            let start = sum;
            sum += d;
            start
        })
        .collect()
}

/// Map a global time onto a clip.
///
/// Targets before the first clip land on `(0, 0)`. `None` for a non-finite
/// target or an empty timeline.
pub fn global_to_local(
    target: f64,
    offsets: &[f64],
    durations: &[f64],
    epsilon: f64,
) -> Option<Position> {
    if !target.is_finite() || offsets.is_empty() {
        return None;
    }

    let last = offsets.len() - 1;
    let mut found = Position {
        clip_index: 0,
        local_time: 0.0,
    };

    for (i, (&start, &duration)) in offsets.iter().zip(durations).enumerate() {
        if target >= start && target < start + duration {
            return Some(Position {
                clip_index: i,
                local_time: target - start,
            });
        }
        if i == last && target >= start {
            found = Position {
                clip_index: i,
                local_time: (target - start).min(duration - epsilon).max(0.0),
            };
        }
    }
    Some(found)
}

/// Inverse of [`global_to_local`]; `None` for an unknown clip
pub fn local_to_global(clip_index: usize, local_time: f64, offsets: &[f64]) -> Option<f64> {
    offsets.get(clip_index).map(|start| start + local_time)
}

/// Clip durations with their cached offsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    durations: Vec<f64>,
    offsets: Vec<f64>,
    epsilon: f64,
}

impl Timeline {
    pub fn new(durations: Vec<f64>, epsilon: f64) -> Self {
        let offsets = build_offsets(&durations);
        Self {
            durations,
            offsets,
            epsilon,
        }
    }

    /// Every clip estimated at `duration`
    pub fn uniform(clip_count: usize, duration: f64, epsilon: f64) -> Self {
        Self::new(vec![duration; clip_count], epsilon)
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    pub fn duration(&self, clip_index: usize) -> Option<f64> {
        self.durations.get(clip_index).copied()
    }

    pub fn offset(&self, clip_index: usize) -> Option<f64> {
        self.offsets.get(clip_index).copied()
    }

    /// Sum of all durations
    pub fn total(&self) -> f64 {
        self.durations.iter().sum()
    }

    pub fn locate(&self, global: f64) -> Option<Position> {
        global_to_local(global, &self.offsets, &self.durations, self.epsilon)
    }

    pub fn to_global(&self, clip_index: usize, local_time: f64) -> Option<f64> {
        local_to_global(clip_index, local_time, &self.offsets)
    }

    /// Global offset of the trigger time, when it falls inside a clip
    pub fn trigger_offset(&self, event: &Event) -> Option<f64> {
        let trigger = event.trigger_time()?;
        event
            .clips
            .iter()
            .zip(self.durations.iter().zip(&self.offsets))
            .find_map(|(clip, (&duration, &start))| {
                let diff = seconds_between(clip.key, trigger);
                (diff >= 0.0 && diff <= duration + TRIGGER_SLACK_S).then_some(start + diff)
            })
    }
}

fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}
