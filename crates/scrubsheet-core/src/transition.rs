#![forbid(unsafe_code)]

//! Interactive open/close transition of the panel.
//!
//! [`TransitionController`] owns the logical [`PanelState`], at most one
//! [`TransitionSession`] and the [`AnimationService`] that renders it. Pan
//! updates scrub the session's animations; the release velocity decides
//! whether they finish toward the target or reverse back to the origin.
//!
//! # State Machine
//!
//! ```text
//!           began                       completion(End)
//! Closed ─────────▶ Closed+session ──────────────────────▶ Open
//!   ▲                    │ completion(Start)                 │
//!   └────────────────────┘                     began         ▼
//! Closed ◀────────────────────────────────── Open+session ◀── Open
//!          completion(End)
//! ```
//!
//! # Invariants
//!
//! 1. At most one session is active; `begin_transition` is a no-op while
//!    one exists.
//! 2. A session's handles and progress snapshots have equal length.
//! 3. After any completion the panel offset is snapped to the resting offset
//!    of the resolved state and the session is gone.
//!
//! # Failure Modes
//!
//! - A cancelled pan leaves the session paused and active. The next `began`
//!   picks it up again; until then the panel stays where the finger left it.
//! - A completion at `Current` keeps the previous logical state.

use std::time::Duration;

use crate::animation::{AnimatingPosition, AnimationEvent, AnimationHandle, AnimationService};
use crate::gesture::{GesturePhase, PanUpdate};
use crate::panel::{PanelConfig, PanelState};

/// An in-flight interactive transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionSession {
    target: PanelState,
    handles: Vec<AnimationHandle>,
    progress: Vec<f64>,
}

impl TransitionSession {
    /// State the session animates toward.
    #[inline]
    #[must_use]
    pub fn target(&self) -> PanelState {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn handles(&self) -> &[AnimationHandle] {
        &self.handles
    }

    /// Fraction-complete of each handle captured when the drag began.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> &[f64] {
        &self.progress
    }

    fn contains(&self, handle: AnimationHandle) -> bool {
        self.handles.contains(&handle)
    }
}

/// Drives the panel between [`PanelState::Closed`] and [`PanelState::Open`].
#[derive(Debug)]
pub struct TransitionController<S> {
    config: PanelConfig,
    state: PanelState,
    session: Option<TransitionSession>,
    service: S,
}

impl<S: AnimationService> TransitionController<S> {
    /// Create a controller resting in `state`.
    ///
    /// The service's surface is snapped to the resting frame of `state`,
    /// offset and corner radius both.
    pub fn new(config: PanelConfig, state: PanelState, mut service: S) -> Self {
        service.set_layout_frame(config.resting_frame(state));
        Self {
            config,
            state,
            session: None,
            service,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&TransitionSession> {
        self.session.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.session.is_some()
    }

    #[inline]
    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Current panel offset as rendered.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.service.surface().frame.offset
    }

    /// Start animating toward `target` unless a session is already active.
    pub fn begin_transition(&mut self, target: PanelState, duration: Duration) {
        if self.session.is_some() {
            return;
        }

        let mut timing = self.config.timing();
        timing.duration = duration;
        let handle = self
            .service
            .create(timing, self.config.resting_frame(target));
        self.service.start(handle);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target_state = target.as_str(),
            handle = handle.id(),
            duration_ms = duration.as_millis() as u64,
            "transition started"
        );

        self.session = Some(TransitionSession {
            target,
            handles: vec![handle],
            progress: vec![0.0],
        });
    }

    /// Route one pan update.
    pub fn on_pan(&mut self, update: &PanUpdate) {
        match update.phase {
            GesturePhase::Began => self.on_pan_began(),
            GesturePhase::Changed => self.on_pan_changed(update.translation.y),
            GesturePhase::Ended => self.on_pan_ended(update.velocity.y),
            GesturePhase::Cancelled => self.on_pan_cancelled(),
            GesturePhase::Possible | GesturePhase::Failed => {}
        }
    }

    fn on_pan_began(&mut self) {
        self.begin_transition(self.state.opposite(), self.config.transition_duration);
        let Some(session) = self.session.as_mut() else {
            return;
        };
        for &handle in &session.handles {
            self.service.pause(handle);
        }
        session.progress = session
            .handles
            .iter()
            .map(|&handle| self.service.fraction_complete(handle))
            .collect();
    }

    fn on_pan_changed(&mut self, translation_y: f64) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let mut fraction = -translation_y / self.config.popup_offset;
        if self.state == PanelState::Open || self.service.is_reversed(session.handles[0]) {
            fraction = -fraction;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(fraction, "scrub");

        for (&handle, &progress) in session.handles.iter().zip(&session.progress) {
            self.service.set_fraction_complete(handle, fraction + progress);
        }
    }

    fn on_pan_ended(&mut self, velocity_y: f64) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        if velocity_y == 0.0 {
            #[cfg(feature = "tracing")]
            tracing::debug!("released without velocity; settling in place");
            for &handle in &session.handles {
                self.service.resume(handle, 0.0);
            }
            return;
        }

        let closing = velocity_y > 0.0;
        let desired_reversed = match self.state {
            PanelState::Open => !closing,
            PanelState::Closed => closing,
        };
        let flip = self.service.is_reversed(session.handles[0]) != desired_reversed;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            state = self.state.as_str(),
            velocity_y,
            closing,
            flip,
            "pan released"
        );

        for &handle in &session.handles {
            if flip {
                let reversed = self.service.is_reversed(handle);
                self.service.set_reversed(handle, !reversed);
            }
            self.service.resume(handle, 0.0);
        }
    }

    fn on_pan_cancelled(&self) {
        if self.session.is_none() {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(
            state = self.state.as_str(),
            "pan cancelled with a transition in flight; session left paused"
        );
    }

    /// Resolve a finished animation.
    pub fn on_animation_event(&mut self, event: AnimationEvent) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if !session.contains(event.handle) {
            return;
        }

        let target = session.target;
        self.state = match event.position {
            AnimatingPosition::Start => target.opposite(),
            AnimatingPosition::End => target,
            AnimatingPosition::Current => self.state,
        };
        self.service
            .set_layout_offset(self.config.resting_offset(self.state));
        self.session = None;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            position = ?event.position,
            state = self.state.as_str(),
            "transition finished"
        );
    }

    /// Stop every in-flight animation where it is.
    ///
    /// The session resolves at `Current` on the next [`advance`](Self::advance).
    pub fn interrupt(&mut self) {
        if let Some(session) = self.session.as_ref() {
            for &handle in &session.handles {
                self.service.stop_at_current(handle);
            }
        }
    }

    /// Advance animations by `dt` and resolve any that finished.
    pub fn advance(&mut self, dt: Duration) {
        for event in self.service.advance(dt) {
            self.on_animation_event(event);
        }
    }
}
