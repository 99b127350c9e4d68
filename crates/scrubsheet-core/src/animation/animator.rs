#![forbid(unsafe_code)]

//! A scrubbable, pausable, reversible property animation.
//!
//! [`PropertyAnimator`] tracks *progress* from the animation's origin (0.0)
//! to its target (1.0). While running, a [`Spring`] drives progress toward
//! the natural endpoint: the target, or the origin when reversed. While
//! paused, progress only changes through
//! [`set_fraction_complete`](PropertyAnimator::set_fraction_complete).
//!
//! # Lifecycle
//!
//! ```text
//! Inactive ──start──▶ Running ◀──resume── Paused
//!    │                  │  └────pause────▶ ▲
//!    └──pause / set_fraction_complete──────┘
//! Running ──settles──▶ Completed (End or Start)
//! any ──stop_at_current──▶ Completed (Current)
//! ```
//!
//! # Invariants
//!
//! 1. `fraction_complete()` is measured along the current direction: when
//!    reversed it is `1 - progress`.
//! 2. `fraction_complete()` is always in [0.0, 1.0]; writes are clamped.
//! 3. A completed animator reports its position exactly once from
//!    [`tick`](PropertyAnimator::tick) and ignores every later command.
//! 4. Scrub writes are ignored while running.
//! 5. A run lasts at most its duration: once that much time has been ticked
//!    the animator finishes at its natural endpoint, settled or not.

use std::time::Duration;

use super::spring::Spring;

/// Upper bound for `resume` duration factors; keeps `Duration::mul_f64` finite.
const MAX_DURATION_FACTOR: f64 = 1_000.0;

/// How an animation is timed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingParameters {
    pub duration: Duration,
    /// 1.0 is critically damped; lower values bounce.
    pub damping_ratio: f64,
}

impl TimingParameters {
    #[must_use]
    pub const fn new(duration: Duration, damping_ratio: f64) -> Self {
        Self {
            duration,
            damping_ratio,
        }
    }
}

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimatorState {
    /// Created, never started.
    Inactive,
    Running,
    Paused,
    /// Finished; the position has been or is about to be reported.
    Completed,
}

/// Where a finished animation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimatingPosition {
    /// Back at the origin (ran reversed to completion).
    Start,
    /// At the target.
    End,
    /// Stopped mid-flight.
    Current,
}

/// One scrubbable animation.
#[derive(Debug, Clone)]
pub struct PropertyAnimator {
    timing: TimingParameters,
    state: AnimatorState,
    progress: f64,
    reversed: bool,
    spring: Option<Spring>,
    /// Jump to the endpoint on the next tick (zero-duration continuation).
    settle_now: bool,
    /// Time ticked and time allowed for the current run.
    elapsed: Duration,
    budget: Duration,
    pending: Option<AnimatingPosition>,
}

impl PropertyAnimator {
    #[must_use]
    pub fn new(timing: TimingParameters) -> Self {
        Self {
            timing,
            state: AnimatorState::Inactive,
            progress: 0.0,
            reversed: false,
            spring: None,
            settle_now: false,
            elapsed: Duration::ZERO,
            budget: Duration::ZERO,
            pending: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn timing(&self) -> TimingParameters {
        self.timing
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> AnimatorState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == AnimatorState::Running
    }

    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == AnimatorState::Completed
    }

    #[inline]
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Presented progress from origin to target. May leave [0, 1] while an
    /// underdamped spring overshoots.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Completion along the current direction, in [0, 1].
    #[must_use]
    pub fn fraction_complete(&self) -> f64 {
        let progress = self.progress.clamp(0.0, 1.0);
        if self.reversed { 1.0 - progress } else { progress }
    }

    fn endpoint(&self) -> f64 {
        if self.reversed { 0.0 } else { 1.0 }
    }

    /// Begin running over the full duration.
    pub fn start(&mut self) {
        match self.state {
            AnimatorState::Inactive | AnimatorState::Paused => self.run_for(self.timing.duration),
            AnimatorState::Running | AnimatorState::Completed => {}
        }
    }

    /// Freeze progress where it is.
    pub fn pause(&mut self) {
        match self.state {
            AnimatorState::Inactive | AnimatorState::Running => {
                self.spring = None;
                self.settle_now = false;
                self.progress = self.progress.clamp(0.0, 1.0);
                self.state = AnimatorState::Paused;
            }
            AnimatorState::Paused | AnimatorState::Completed => {}
        }
    }

    /// Scrub to `fraction` along the current direction.
    ///
    /// Returns `false` if the write was ignored (running or completed).
    pub fn set_fraction_complete(&mut self, fraction: f64) -> bool {
        match self.state {
            AnimatorState::Running | AnimatorState::Completed => false,
            AnimatorState::Inactive | AnimatorState::Paused => {
                let fraction = if fraction.is_nan() {
                    0.0
                } else {
                    fraction.clamp(0.0, 1.0)
                };
                self.progress = if self.reversed { 1.0 - fraction } else { fraction };
                self.state = AnimatorState::Paused;
                true
            }
        }
    }

    /// Choose the natural endpoint: origin when `reversed`, target otherwise.
    pub fn set_reversed(&mut self, reversed: bool) {
        if self.is_completed() || self.reversed == reversed {
            return;
        }
        self.reversed = reversed;
        let endpoint = self.endpoint();
        if let Some(spring) = self.spring.as_mut() {
            spring.set_target(endpoint);
        }
    }

    /// Continue toward the natural endpoint over `duration * duration_factor`.
    ///
    /// A factor of zero finishes on the next tick.
    pub fn resume(&mut self, duration_factor: f64) {
        if self.is_completed() {
            return;
        }
        let factor = if duration_factor.is_finite() {
            duration_factor.clamp(0.0, MAX_DURATION_FACTOR)
        } else {
            1.0
        };
        self.run_for(self.timing.duration.mul_f64(factor));
    }

    /// Finish immediately at the current progress.
    pub fn stop_at_current(&mut self) {
        if self.is_completed() {
            return;
        }
        self.spring = None;
        self.settle_now = false;
        self.state = AnimatorState::Completed;
        self.pending = Some(AnimatingPosition::Current);
    }

    fn run_for(&mut self, remaining: Duration) {
        self.state = AnimatorState::Running;
        self.elapsed = Duration::ZERO;
        self.budget = remaining;
        if remaining.is_zero() {
            self.spring = None;
            self.settle_now = true;
        } else {
            self.settle_now = false;
            self.spring = Some(Spring::for_duration(
                self.progress,
                self.endpoint(),
                remaining,
                self.timing.damping_ratio,
            ));
        }
    }

    /// Advance by `dt`. Returns the final position once, when finished.
    pub fn tick(&mut self, dt: Duration) -> Option<AnimatingPosition> {
        match self.state {
            AnimatorState::Completed => self.pending.take(),
            AnimatorState::Inactive | AnimatorState::Paused => None,
            AnimatorState::Running => {
                self.elapsed = self.elapsed.saturating_add(dt);
                let settled = match self.spring.as_mut() {
                    Some(spring) if !self.settle_now => {
                        spring.advance(dt);
                        self.progress = spring.position();
                        spring.is_at_rest()
                    }
                    _ => true,
                };
                (settled || self.elapsed >= self.budget).then(|| self.finish())
            }
        }
    }

    fn finish(&mut self) -> AnimatingPosition {
        self.progress = self.endpoint();
        self.spring = None;
        self.settle_now = false;
        self.state = AnimatorState::Completed;
        if self.reversed {
            AnimatingPosition::Start
        } else {
            AnimatingPosition::End
        }
    }
}
