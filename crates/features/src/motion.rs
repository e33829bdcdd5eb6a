//! Wrist motion tracking over a trailing time window.
//!
//! Deltas are measured against the oldest sample still inside the window
//! rather than the previous frame, which keeps single-frame jitter from
//! registering as a swipe.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Ring buffer capacity (about 0.8 s of video at 30 fps).
const DEFAULT_CAPACITY: usize = 24;

/// Trailing window used for deltas and reversal counting.
const DEFAULT_WINDOW_MS: u64 = 500;

/// Movement (in hand scales) that must accumulate against the current
/// direction before it counts as a reversal.
const DEFAULT_REVERSAL_STEP: f32 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    pub capacity: usize,
    pub window_ms: u64,
    pub reversal_step: f32,
    /// Input is horizontally mirrored for display; flip x deltas so that
    /// "right" means the signer's right as seen in the preview.
    pub mirrored: bool,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            window_ms: DEFAULT_WINDOW_MS,
            reversal_step: DEFAULT_REVERSAL_STEP,
            mirrored: true,
        }
    }
}

/// Wrist position at one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub x: f32,
    pub y: f32,
    pub timestamp_ms: u64,
}

/// Motion summary over the trailing window, in hand scales.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionFeatures {
    /// Net horizontal displacement, positive towards the signer's right.
    pub dx: f32,
    /// Net vertical displacement, positive downwards.
    pub dy: f32,
    /// Accumulated absolute horizontal travel.
    pub path_x: f32,
    /// Accumulated absolute vertical travel.
    pub path_y: f32,
    pub reversals_x: u32,
    pub reversals_y: u32,
    /// Samples that fell inside the window, including the current one.
    pub samples: usize,
}

/// Newest-first ring buffer of wrist samples.
#[derive(Debug, Clone)]
pub struct MotionBuffer {
    samples: VecDeque<MotionSample>,
    settings: MotionSettings,
}

impl Default for MotionBuffer {
    fn default() -> Self {
        Self::new(MotionSettings::default())
    }
}

impl MotionBuffer {
    pub fn new(settings: MotionSettings) -> Self {
        Self {
            samples: VecDeque::with_capacity(settings.capacity + 1),
            settings,
        }
    }

    pub fn settings(&self) -> &MotionSettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn newest(&self) -> Option<&MotionSample> {
        self.samples.front()
    }

    /// Push a sample, evicting the oldest beyond capacity.
    ///
    /// Timestamps that run backwards are clamped to the newest one so the
    /// buffer stays time-ordered.
    pub fn push(&mut self, mut sample: MotionSample) {
        if let Some(newest) = self.samples.front() {
            if sample.timestamp_ms < newest.timestamp_ms {
                tracing::warn!(
                    got = sample.timestamp_ms,
                    newest = newest.timestamp_ms,
                    "non-monotonic wrist timestamp, clamping"
                );
                sample.timestamp_ms = newest.timestamp_ms;
            }
        }

        self.samples.push_front(sample);
        while self.samples.len() > self.settings.capacity {
            self.samples.pop_back();
        }
    }

    /// Samples within the trailing window of the newest sample, newest first.
    pub fn window(&self) -> impl Iterator<Item = &MotionSample> {
        let now = self.newest().map(|s| s.timestamp_ms).unwrap_or(0);
        let window_ms = self.settings.window_ms;
        self.samples
            .iter()
            .take_while(move |s| now.saturating_sub(s.timestamp_ms) <= window_ms)
    }

    /// Summarize motion over the window, normalized by `hand_scale`.
    pub fn features(&self, hand_scale: f32) -> MotionFeatures {
        let mut chronological: Vec<&MotionSample> = self.window().collect();
        chronological.reverse();

        let (Some(oldest), Some(current)) = (chronological.first(), chronological.last()) else {
            return MotionFeatures::default();
        };

        let x_sign = if self.settings.mirrored { -1.0 } else { 1.0 };
        let xs: Vec<f32> = chronological
            .iter()
            .map(|s| x_sign * s.x / hand_scale)
            .collect();
        let ys: Vec<f32> = chronological.iter().map(|s| s.y / hand_scale).collect();

        MotionFeatures {
            dx: x_sign * (current.x - oldest.x) / hand_scale,
            dy: (current.y - oldest.y) / hand_scale,
            path_x: path_length(&xs),
            path_y: path_length(&ys),
            reversals_x: count_reversals(&xs, self.settings.reversal_step),
            reversals_y: count_reversals(&ys, self.settings.reversal_step),
            samples: chronological.len(),
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

fn path_length(values: &[f32]) -> f32 {
    values.windows(2).map(|w| (w[1] - w[0]).abs()).sum()
}

/// Count direction reversals with hysteresis: the signal must travel `step`
/// back from its last extreme before a new direction is accepted.
fn count_reversals(values: &[f32], step: f32) -> u32 {
    let Some(&first) = values.first() else {
        return 0;
    };

    let mut reversals = 0;
    let mut direction = 0i8;
    let mut extreme = first;

    for &v in &values[1..] {
        let delta = v - extreme;
        if direction >= 0 && delta <= -step {
            if direction > 0 {
                reversals += 1;
            }
            direction = -1;
            extreme = v;
        } else if direction <= 0 && delta >= step {
            if direction < 0 {
                reversals += 1;
            }
            direction = 1;
            extreme = v;
        } else if (direction > 0 && v > extreme) || (direction < 0 && v < extreme) {
            extreme = v;
        }
    }

    reversals
}
