#![forbid(unsafe_code)]

//! Release-velocity estimation for pan gestures.
//!
//! Uses the impulse strategy: the velocity is derived from the kinetic energy
//! the pointer imparts across its recent samples, which is less sensitive to
//! a single jittery sample than a plain last-two-points difference.
//!
//! # Invariants
//!
//! 1. Only samples within [`HORIZON_MS`] of the newest sample contribute.
//! 2. A gap larger than [`ASSUME_STOPPED_MS`] between consecutive samples
//!    ends the usable history (the pointer is treated as having stopped).
//! 3. Fewer than two usable samples yield a velocity of exactly `0.0`.

use web_time::Instant;

use crate::geometry::{Point, Vec2};

/// Ring buffer size.
const HISTORY_SIZE: usize = 20;

/// Only samples within the last 100ms are considered.
pub const HORIZON_MS: i64 = 100;

/// No movement for this long means the pointer has stopped.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Debug, Clone, Copy, Default)]
struct Sample {
    time_ms: i64,
    value: f64,
}

/// Single-axis impulse velocity tracker over absolute positions.
#[derive(Debug, Clone)]
pub struct AxisVelocityTracker {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
}

impl Default for AxisVelocityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AxisVelocityTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Record a position at `time_ms`.
    pub fn add_sample(&mut self, time_ms: i64, value: f64) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, value });
    }

    /// Velocity in units per second.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        let Some(newest) = self.samples[self.index] else {
            return 0.0;
        };

        let mut values = [0.0f64; HISTORY_SIZE];
        let mut times = [0.0f64; HISTORY_SIZE];
        let mut count = 0;

        let mut cursor = self.index;
        let mut previous = newest;
        while let Some(sample) = self.samples[cursor] {
            let age = newest.time_ms - sample.time_ms;
            let gap = (previous.time_ms - sample.time_ms).abs();
            previous = sample;
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }

            values[count] = sample.value;
            times[count] = -(age as f64);
            count += 1;
            if count >= HISTORY_SIZE {
                break;
            }

            cursor = if cursor == 0 {
                HISTORY_SIZE - 1
            } else {
                cursor - 1
            };
        }

        if count < 2 {
            return 0.0;
        }

        impulse_velocity(&values[..count], &times[..count]) * 1000.0
    }

    /// Forget all samples.
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }
}

/// Samples are ordered newest first; `times` are non-positive ages in ms.
fn impulse_velocity(values: &[f64], times: &[f64]) -> f64 {
    let start = values.len() - 1;
    let mut work = 0.0f64;
    let mut next_time = times[start];

    for i in (1..=start).rev() {
        let current_time = next_time;
        next_time = times[i - 1];
        if current_time == next_time {
            continue;
        }

        let v_curr = (values[i - 1] - values[i]) / (next_time - current_time);
        let v_prev = energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == start {
            work *= 0.5;
        }
    }

    energy_to_velocity(work)
}

/// E = ½·v² with unit mass.
#[inline]
fn energy_to_velocity(energy: f64) -> f64 {
    energy.signum() * (2.0 * energy.abs()).sqrt()
}

/// Two-axis velocity tracker keyed on pointer sample instants.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    origin: Option<Instant>,
    x: AxisVelocityTracker,
    y: AxisVelocityTracker,
}

impl VelocityTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer position sampled at `time`.
    pub fn add_position(&mut self, time: Instant, position: Point) {
        let origin = *self.origin.get_or_insert(time);
        let time_ms = time.saturating_duration_since(origin).as_millis() as i64;
        self.x.add_sample(time_ms, position.x);
        self.y.add_sample(time_ms, position.y);
    }

    /// Current velocity in points per second.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.x.velocity(), self.y.velocity())
    }

    pub fn reset(&mut self) {
        self.origin = None;
        self.x.reset();
        self.y.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn empty_tracker_is_still() {
        assert_eq!(AxisVelocityTracker::new().velocity(), 0.0);
    }

    #[test]
    fn single_sample_is_still() {
        let mut tracker = AxisVelocityTracker::new();
        tracker.add_sample(0, 100.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn constant_motion() {
        let mut tracker = AxisVelocityTracker::new();
        // 100 points per 10ms = 10_000 points/s
        for i in 0..4 {
            tracker.add_sample(i * 10, i as f64 * 100.0);
        }
        let v = tracker.velocity();
        assert!((v - 10_000.0).abs() < 1_000.0, "expected ~10000, got {v}");
    }

    #[test]
    fn upward_motion_is_negative() {
        let mut tracker = AxisVelocityTracker::new();
        tracker.add_sample(0, 300.0);
        tracker.add_sample(10, 200.0);
        tracker.add_sample(20, 100.0);
        assert!(tracker.velocity() < 0.0);
    }

    #[test]
    fn stale_samples_ignored() {
        let mut tracker = AxisVelocityTracker::new();
        tracker.add_sample(0, 0.0);
        tracker.add_sample(150, 100.0);
        tracker.add_sample(160, 200.0);
        tracker.add_sample(170, 300.0);
        assert!(tracker.velocity() > 0.0);
    }

    #[test]
    fn long_gap_means_stopped() {
        let mut tracker = AxisVelocityTracker::new();
        tracker.add_sample(0, 0.0);
        tracker.add_sample(ASSUME_STOPPED_MS + 1, 100.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn reset_clears_history() {
        let mut tracker = AxisVelocityTracker::new();
        tracker.add_sample(0, 0.0);
        tracker.add_sample(10, 100.0);
        tracker.reset();
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn two_axis_tracking_from_instants() {
        let t0 = Instant::now();
        let mut tracker = VelocityTracker::new();
        for i in 0..5u64 {
            tracker.add_position(
                t0 + Duration::from_millis(i * 16),
                Point::new(0.0, 500.0 - i as f64 * 16.0),
            );
        }
        let v = tracker.velocity();
        assert_eq!(v.x, 0.0);
        assert!((v.y + 1_000.0).abs() < 100.0, "expected ~-1000, got {}", v.y);
    }
}
