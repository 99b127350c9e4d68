#![forbid(unsafe_code)]

//! Spring that carries animation progress toward an endpoint.
//!
//! Animators describe timing the way a host animation engine does: a
//! duration plus a damping ratio. [`Spring::for_duration`] turns that pair
//! into stiffness `k = ω²` and damping `c = 2ζω`, choosing the natural
//! frequency `ω` so the envelope has decayed to about 0.1% by the end of the
//! duration. Acceleration is `-k·(x - target) - c·v`.
//!
//! # Integration
//!
//! Semi-implicit Euler in substeps of at most 4ms, so a frame delta of any
//! size integrates the same way.
//!
//! # Invariants
//!
//! 1. `k >= MIN_STIFFNESS` and `c >= 0`.
//! 2. Once settled the spring sits exactly on its target with zero velocity
//!    and ignores `advance` until retargeted.

use std::time::Duration;

const SUBSTEP_SECS: f64 = 0.004;

/// Settling tolerances in progress units.
const POSITION_EPSILON: f64 = 0.001;
const VELOCITY_EPSILON: f64 = 0.01;

pub const MIN_STIFFNESS: f64 = 0.1;

/// ω·T at which a critically damped envelope is down to 0.1%.
const SETTLE_OMEGA_TIME: f64 = 9.23;

/// Caps ω so that c·dt is at most 1 per substep at the highest damping ratio.
const MAX_OMEGA: f64 = 100.0;

const MAX_DAMPING_RATIO: f64 = 1.25;

/// Floor for ζ when sizing ω; an undamped spring never settles on its own.
const MIN_DECAY_RATIO: f64 = 0.01;

/// Damped harmonic oscillator over a scalar progress value.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    settled: bool,
}

impl Spring {
    /// Spring from `from` to `to` that settles in about `duration`.
    ///
    /// A `damping_ratio` of 1.0 is critically damped; lower values overshoot
    /// and ring. Ratios are clamped to [0, 1.25].
    #[must_use]
    pub fn for_duration(from: f64, to: f64, duration: Duration, damping_ratio: f64) -> Self {
        let secs = duration.as_secs_f64().max(f64::EPSILON);
        let zeta = damping_ratio.clamp(0.0, MAX_DAMPING_RATIO);
        // An underdamped envelope decays at ζω, not ω.
        let decay = zeta.clamp(MIN_DECAY_RATIO, 1.0);
        let omega = (SETTLE_OMEGA_TIME / (secs * decay)).min(MAX_OMEGA);
        Self::with_coefficients(from, to, omega * omega, 2.0 * zeta * omega)
    }

    /// Spring with explicit stiffness and damping.
    #[must_use]
    pub fn with_coefficients(from: f64, to: f64, stiffness: f64, damping: f64) -> Self {
        Self {
            position: from,
            velocity: 0.0,
            target: to,
            stiffness: stiffness.max(MIN_STIFFNESS),
            damping: damping.max(0.0),
            settled: false,
        }
    }

    /// Current position; may pass the target while underdamped.
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.settled
    }

    /// Point the spring at a new endpoint, keeping its momentum.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > f64::EPSILON {
            self.target = target;
            self.settled = false;
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        if self.settled {
            return;
        }

        let mut left = dt.as_secs_f64();
        while left > 0.0 {
            let h = left.min(SUBSTEP_SECS);
            let accel =
                -self.stiffness * (self.position - self.target) - self.damping * self.velocity;
            self.velocity += accel * h;
            self.position += self.velocity * h;
            left -= h;
        }

        if (self.position - self.target).abs() < POSITION_EPSILON
            && self.velocity.abs() < VELOCITY_EPSILON
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.settled = true;
        }
    }
}
