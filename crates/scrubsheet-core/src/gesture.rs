#![forbid(unsafe_code)]

//! Pan gesture recognition: turns raw [`PointerEvent`]s into [`PanUpdate`]s.
//!
//! Recognition is split into two collaborating parts:
//!
//! - A **tracker** ([`PanTracking`], default [`PanTracker`]) implementing
//!   standard pan behavior: remember the touch-down origin, wait for the
//!   pointer to travel past a movement threshold, then report translation and
//!   velocity until release.
//! - A **phase policy** ([`PhasePolicy`]) that decides how touch-down samples
//!   are classified before the tracker sees them. [`ImmediateStart`] reports
//!   `Began` on the very first contact so a panel can be grabbed with zero
//!   latency; [`ThresholdStart`] leaves the decision to the tracker.
//!
//! [`DragRecognizer`] composes the two.
//!
//! # State Machine
//!
//! ```text
//!            down (policy)           moved
//! Possible ─────────────────▶ Began ───────▶ Changed ──┐
//!    │  moved past threshold ▲                 ▲  moved │
//!    └───────────────────────┘                 └────────┘
//! Began/Changed ── up ──▶ Ended
//! Began/Changed ── cancel ──▶ Cancelled
//! Possible ── up/cancel ──▶ Failed
//! ```
//!
//! # Invariants
//!
//! 1. An update is emitted for every transition into `Began`, `Changed`,
//!    `Ended` and `Cancelled`; never for `Possible` or `Failed`.
//! 2. With [`ImmediateStart`], a touch-down arriving while the recognizer is
//!    already in `Began` is dropped before it reaches the tracker.
//! 3. Translation is always measured from the latest forwarded touch-down.

use web_time::Instant;

use crate::event::{PointerEvent, PointerEventKind};
use crate::geometry::{Point, Vec2};
use crate::velocity::VelocityTracker;

// ---------------------------------------------------------------------------
// Phases and updates
// ---------------------------------------------------------------------------

/// Recognition phase of a pan gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GesturePhase {
    /// Idle, or touching but not yet recognized.
    #[default]
    Possible,
    /// The pan was just recognized.
    Began,
    /// The pointer moved while recognized.
    Changed,
    /// The pointer was released while recognized.
    Ended,
    /// The host cancelled the pointer while recognized.
    Cancelled,
    /// The contact ended before recognition.
    Failed,
}

impl GesturePhase {
    /// Whether the gesture is recognized and still in progress.
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Began | Self::Changed)
    }
}

/// What the recognizer reports to its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanUpdate {
    pub phase: GesturePhase,
    /// Displacement since touch-down.
    pub translation: Vec2,
    /// Pointer velocity in points per second.
    pub velocity: Vec2,
}

// ---------------------------------------------------------------------------
// Tracking
// ---------------------------------------------------------------------------

/// Standard pan tracking: the behavior a policy wraps.
pub trait PanTracking {
    /// A new contact began.
    fn touch_down(&mut self, position: Point, time: Instant);
    /// The contact moved.
    fn touch_moved(&mut self, position: Point, time: Instant);
    /// The contact ended.
    fn touch_up(&mut self, position: Point, time: Instant);
    /// The host cancelled the contact.
    fn cancel(&mut self);
    /// The tracker's own view of the phase.
    fn phase(&self) -> GesturePhase;
    /// Displacement since touch-down.
    fn translation(&self) -> Vec2;
    /// Current velocity in points per second.
    fn velocity(&self) -> Vec2;
}

/// Default movement threshold before a pan is recognized, in points.
pub const DEFAULT_PAN_THRESHOLD: f64 = 10.0;

/// Threshold-based pan tracker.
#[derive(Debug, Clone)]
pub struct PanTracker {
    threshold: f64,
    phase: GesturePhase,
    /// A contact is down.
    touching: bool,
    origin: Point,
    last: Point,
    velocity: VelocityTracker,
}

impl Default for PanTracker {
    fn default() -> Self {
        Self::new(DEFAULT_PAN_THRESHOLD)
    }
}

impl PanTracker {
    /// Create a tracker that recognizes after `threshold` points of travel.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.max(0.0),
            phase: GesturePhase::Possible,
            touching: false,
            origin: Point::ORIGIN,
            last: Point::ORIGIN,
            velocity: VelocityTracker::new(),
        }
    }

    /// Movement threshold in points.
    #[inline]
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl PanTracking for PanTracker {
    fn touch_down(&mut self, position: Point, time: Instant) {
        self.phase = GesturePhase::Possible;
        self.touching = true;
        self.origin = position;
        self.last = position;
        self.velocity.reset();
        self.velocity.add_position(time, position);
    }

    fn touch_moved(&mut self, position: Point, time: Instant) {
        if !self.touching {
            return;
        }
        self.last = position;
        self.velocity.add_position(time, position);
        self.phase = match self.phase {
            GesturePhase::Possible if self.origin.distance(position) >= self.threshold => {
                GesturePhase::Began
            }
            GesturePhase::Began | GesturePhase::Changed => GesturePhase::Changed,
            other => other,
        };
    }

    fn touch_up(&mut self, position: Point, time: Instant) {
        if self.touching {
            self.last = position;
            self.velocity.add_position(time, position);
        }
        self.touching = false;
        self.phase = if self.phase.is_active() {
            GesturePhase::Ended
        } else {
            GesturePhase::Failed
        };
    }

    fn cancel(&mut self) {
        self.touching = false;
        self.phase = if self.phase.is_active() {
            GesturePhase::Cancelled
        } else {
            GesturePhase::Failed
        };
    }

    fn phase(&self) -> GesturePhase {
        self.phase
    }

    fn translation(&self) -> Vec2 {
        self.last - self.origin
    }

    fn velocity(&self) -> Vec2 {
        self.velocity.velocity()
    }
}

// ---------------------------------------------------------------------------
// Phase policies
// ---------------------------------------------------------------------------

/// How a touch-down sample is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchDownAction {
    /// Drop the sample; the tracker never sees it.
    Ignore,
    /// Forward to the tracker and adopt whatever it decides.
    Forward,
    /// Forward to the tracker, then force the phase to `Began`.
    ForwardAndBegin,
}

/// Classifies touch-down samples before they reach the tracker.
pub trait PhasePolicy {
    /// Decide what to do with a touch-down given the recognizer's phase.
    fn on_touch_down(&self, phase: GesturePhase) -> TouchDownAction;
}

/// Report `Began` on the first contact sample instead of after a threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateStart;

impl PhasePolicy for ImmediateStart {
    fn on_touch_down(&self, phase: GesturePhase) -> TouchDownAction {
        if phase == GesturePhase::Began {
            TouchDownAction::Ignore
        } else {
            TouchDownAction::ForwardAndBegin
        }
    }
}

/// Standard behavior: recognition waits for the tracker's threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdStart;

impl PhasePolicy for ThresholdStart {
    fn on_touch_down(&self, phase: GesturePhase) -> TouchDownAction {
        if phase.is_active() {
            TouchDownAction::Ignore
        } else {
            TouchDownAction::Forward
        }
    }
}

// ---------------------------------------------------------------------------
// DragRecognizer
// ---------------------------------------------------------------------------

/// A pan recognizer built from a phase policy and a tracker.
///
/// Feed it pointer events with [`process`](DragRecognizer::process); each
/// call returns the update to deliver to the gesture target, if any.
#[derive(Debug, Clone)]
pub struct DragRecognizer<P, T = PanTracker> {
    policy: P,
    tracker: T,
    phase: GesturePhase,
}

impl<P: PhasePolicy + Default> Default for DragRecognizer<P, PanTracker> {
    fn default() -> Self {
        Self::new(P::default(), PanTracker::default())
    }
}

impl<P: PhasePolicy, T: PanTracking> DragRecognizer<P, T> {
    /// Create a recognizer from a policy and a tracker.
    #[must_use]
    pub fn new(policy: P, tracker: T) -> Self {
        Self {
            policy,
            tracker,
            phase: GesturePhase::Possible,
        }
    }

    /// Current recognizer phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Whether a drag is currently recognized and in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.phase.is_active()
    }

    /// The wrapped tracker.
    #[inline]
    #[must_use]
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Process one pointer sample.
    pub fn process(&mut self, event: &PointerEvent) -> Option<PanUpdate> {
        match event.kind {
            PointerEventKind::Down => self.on_touch_down(event.position, event.time),
            PointerEventKind::Moved => self.on_touch_moved(event.position, event.time),
            PointerEventKind::Up => self.on_touch_up(event.position, event.time),
            PointerEventKind::Cancelled => self.on_cancel(),
        }
    }

    fn on_touch_down(&mut self, position: Point, time: Instant) -> Option<PanUpdate> {
        match self.policy.on_touch_down(self.phase) {
            TouchDownAction::Ignore => None,
            TouchDownAction::Forward => {
                self.tracker.touch_down(position, time);
                self.adopt_tracker_phase()
            }
            TouchDownAction::ForwardAndBegin => {
                self.tracker.touch_down(position, time);
                self.phase = GesturePhase::Began;
                Some(self.update())
            }
        }
    }

    fn on_touch_moved(&mut self, position: Point, time: Instant) -> Option<PanUpdate> {
        self.tracker.touch_moved(position, time);
        if self.phase.is_active() {
            self.phase = GesturePhase::Changed;
            return Some(self.update());
        }
        self.adopt_tracker_phase()
    }

    fn on_touch_up(&mut self, position: Point, time: Instant) -> Option<PanUpdate> {
        self.tracker.touch_up(position, time);
        if self.phase.is_active() {
            self.phase = GesturePhase::Ended;
            return Some(self.update());
        }
        self.phase = GesturePhase::Failed;
        None
    }

    fn on_cancel(&mut self) -> Option<PanUpdate> {
        self.tracker.cancel();
        if self.phase.is_active() {
            self.phase = GesturePhase::Cancelled;
            return Some(self.update());
        }
        self.phase = GesturePhase::Failed;
        None
    }

    /// Take the tracker's phase; emit only if it just became recognized.
    fn adopt_tracker_phase(&mut self) -> Option<PanUpdate> {
        self.phase = self.tracker.phase();
        (self.phase == GesturePhase::Began).then(|| self.update())
    }

    fn update(&self) -> PanUpdate {
        PanUpdate {
            phase: self.phase,
            translation: self.tracker.translation(),
            velocity: self.tracker.velocity(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
