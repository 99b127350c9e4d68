#![forbid(unsafe_code)]

//! The animation capability the transition controller depends on.
//!
//! [`AnimationService`] is the seam between interaction logic and whatever
//! actually moves pixels. [`FrameAnimator`] is the in-process implementation:
//! a set of [`PropertyAnimator`]s advanced by the host's frame loop, each
//! interpolating the [`PanelSurface`] from the frame captured when the
//! animation was created toward its target frame.
//!
//! Completion is reported as data ([`AnimationEvent`]) returned from
//! [`advance`](AnimationService::advance) instead of through stored
//! callbacks; the owner of the service dispatches the events.
//!
//! # Invariants
//!
//! 1. Each handle produces at most one [`AnimationEvent`]; afterwards the
//!    handle is released and every call on it is a no-op.
//! 2. Events from one `advance` are ordered by handle creation.
//! 3. Every applied frame counts as one layout pass.

use std::collections::BTreeMap;
use std::time::Duration;

use super::animator::{AnimatingPosition, PropertyAnimator, TimingParameters};
use crate::panel::{PanelFrame, PanelSurface};

/// Identifies one animation inside a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationHandle(u64);

impl AnimationHandle {
    /// Raw id, for logs.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// A finished animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationEvent {
    pub handle: AnimationHandle,
    pub position: AnimatingPosition,
}

/// Host animation capability.
///
/// Commands on unknown or released handles are ignored; queries on them
/// return `0.0` / `false`.
pub trait AnimationService {
    /// Create an inactive animation from the current surface toward `target`.
    fn create(&mut self, timing: TimingParameters, target: PanelFrame) -> AnimationHandle;
    fn start(&mut self, handle: AnimationHandle);
    fn pause(&mut self, handle: AnimationHandle);
    /// Continue toward the natural endpoint; a zero factor settles on the
    /// next frame.
    fn resume(&mut self, handle: AnimationHandle, duration_factor: f64);
    /// Finish at the current position.
    fn stop_at_current(&mut self, handle: AnimationHandle);
    fn fraction_complete(&self, handle: AnimationHandle) -> f64;
    fn set_fraction_complete(&mut self, handle: AnimationHandle, fraction: f64);
    fn is_reversed(&self, handle: AnimationHandle) -> bool;
    fn set_reversed(&mut self, handle: AnimationHandle, reversed: bool);
    fn is_running(&self, handle: AnimationHandle) -> bool;
    /// Write the panel offset directly and request layout.
    fn set_layout_offset(&mut self, offset: f64);
    /// Write the whole panel frame directly and request layout.
    fn set_layout_frame(&mut self, frame: PanelFrame);
    fn surface(&self) -> &PanelSurface;
    /// Advance every running animation by `dt`.
    fn advance(&mut self, dt: Duration) -> Vec<AnimationEvent>;
}

#[derive(Debug, Clone)]
struct Entry {
    animator: PropertyAnimator,
    from: PanelFrame,
    to: PanelFrame,
}

/// Frame-driven [`AnimationService`].
#[derive(Debug, Clone)]
pub struct FrameAnimator {
    surface: PanelSurface,
    entries: BTreeMap<AnimationHandle, Entry>,
    next_id: u64,
}

impl FrameAnimator {
    /// Create a service whose surface starts at `initial`.
    #[must_use]
    pub fn new(initial: PanelFrame) -> Self {
        Self {
            surface: PanelSurface::new(initial),
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Number of live (not yet released) animations.
    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether `handle` still refers to a live animation.
    #[must_use]
    pub fn is_live(&self, handle: AnimationHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    fn apply(surface: &mut PanelSurface, entry: &Entry) {
        surface.frame = entry.from.lerp(entry.to, entry.animator.progress());
        surface.layout_passes += 1;
    }
}

impl AnimationService for FrameAnimator {
    fn create(&mut self, timing: TimingParameters, target: PanelFrame) -> AnimationHandle {
        let handle = AnimationHandle(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            handle,
            Entry {
                animator: PropertyAnimator::new(timing),
                from: self.surface.frame,
                to: target,
            },
        );
        handle
    }

    fn start(&mut self, handle: AnimationHandle) {
        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.animator.start();
        }
    }

    fn pause(&mut self, handle: AnimationHandle) {
        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.animator.pause();
        }
    }

    fn resume(&mut self, handle: AnimationHandle, duration_factor: f64) {
        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.animator.resume(duration_factor);
        }
    }

    fn stop_at_current(&mut self, handle: AnimationHandle) {
        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.animator.stop_at_current();
        }
    }

    fn fraction_complete(&self, handle: AnimationHandle) -> f64 {
        self.entries
            .get(&handle)
            .map_or(0.0, |entry| entry.animator.fraction_complete())
    }

    fn set_fraction_complete(&mut self, handle: AnimationHandle, fraction: f64) {
        if let Some(entry) = self.entries.get_mut(&handle)
            && entry.animator.set_fraction_complete(fraction)
        {
            Self::apply(&mut self.surface, entry);
        }
    }

    fn is_reversed(&self, handle: AnimationHandle) -> bool {
        self.entries
            .get(&handle)
            .is_some_and(|entry| entry.animator.is_reversed())
    }

    fn set_reversed(&mut self, handle: AnimationHandle, reversed: bool) {
        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.animator.set_reversed(reversed);
        }
    }

    fn is_running(&self, handle: AnimationHandle) -> bool {
        self.entries
            .get(&handle)
            .is_some_and(|entry| entry.animator.is_running())
    }

    fn set_layout_offset(&mut self, offset: f64) {
        self.surface.frame.offset = offset;
        self.surface.layout_passes += 1;
    }

    fn set_layout_frame(&mut self, frame: PanelFrame) {
        self.surface.frame = frame;
        self.surface.layout_passes += 1;
    }

    fn surface(&self) -> &PanelSurface {
        &self.surface
    }

    fn advance(&mut self, dt: Duration) -> Vec<AnimationEvent> {
        let mut events = Vec::new();
        for (&handle, entry) in &mut self.entries {
            let was_running = entry.animator.is_running();
            let finished = entry.animator.tick(dt);
            if was_running {
                Self::apply(&mut self.surface, entry);
            }
            if let Some(position) = finished {
                events.push(AnimationEvent { handle, position });
            }
        }
        self.entries.retain(|_, entry| !entry.animator.is_completed());
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    fn timing() -> TimingParameters {
        TimingParameters::new(Duration::from_secs(1), 1.0)
    }

    fn closed() -> PanelFrame {
        PanelFrame::new(440.0, 0.0)
    }

    fn open() -> PanelFrame {
        PanelFrame::new(0.0, 20.0)
    }

    #[test]
    fn running_animation_moves_surface_toward_target() {
        let mut service = FrameAnimator::new(closed());
        let handle = service.create(timing(), open());
        service.start(handle);
        assert!(service.is_running(handle));

        service.advance(MS_16);
        let offset = service.surface().frame.offset;
        assert!(offset < 440.0 && offset > 0.0, "offset {offset}");
        assert_eq!(service.surface().layout_passes, 1);
    }

    #[test]
    fn scrubbing_paused_animation_updates_surface() {
        let mut service = FrameAnimator::new(closed());
        let handle = service.create(timing(), open());
        service.start(handle);
        service.pause(handle);

        service.set_fraction_complete(handle, 0.25);
        assert_eq!(service.surface().frame, PanelFrame::new(330.0, 5.0));
        assert_eq!(service.fraction_complete(handle), 0.25);
    }

    #[test]
    fn scrub_write_while_running_leaves_surface_alone() {
        let mut service = FrameAnimator::new(closed());
        let handle = service.create(timing(), open());
        service.start(handle);
        service.set_fraction_complete(handle, 0.5);
        assert_eq!(service.surface().frame, closed());
        assert_eq!(service.surface().layout_passes, 0);
    }

    #[test]
    fn completion_reported_once_and_handle_released() {
        let mut service = FrameAnimator::new(closed());
        let handle = service.create(timing(), open());
        service.start(handle);
        service.pause(handle);
        service.resume(handle, 0.0);

        let events = service.advance(Duration::ZERO);
        assert_eq!(
            events,
            vec![AnimationEvent {
                handle,
                position: AnimatingPosition::End
            }]
        );
        assert_eq!(service.surface().frame, open());
        assert!(!service.is_live(handle));
        assert!(service.advance(MS_16).is_empty());
    }

    #[test]
    fn released_handle_queries_are_inert() {
        let mut service = FrameAnimator::new(closed());
        let handle = service.create(timing(), open());
        service.stop_at_current(handle);
        let events = service.advance(MS_16);
        assert_eq!(events[0].position, AnimatingPosition::Current);

        service.set_reversed(handle, true);
        service.set_fraction_complete(handle, 0.5);
        assert!(!service.is_reversed(handle));
        assert!(!service.is_running(handle));
        assert_eq!(service.fraction_complete(handle), 0.0);
        assert_eq!(service.surface().frame, closed());
    }

    #[test]
    fn animation_origin_is_captured_at_create() {
        let mut service = FrameAnimator::new(closed());
        service.set_layout_offset(100.0);
        let handle = service.create(timing(), open());
        service.pause(handle);
        service.set_fraction_complete(handle, 0.5);
        assert_eq!(service.surface().frame.offset, 50.0);
    }

    #[test]
    fn events_follow_creation_order() {
        let mut service = FrameAnimator::new(closed());
        let first = service.create(timing(), open());
        let second = service.create(timing(), open());
        for handle in [second, first] {
            service.pause(handle);
            service.resume(handle, 0.0);
        }
        let handles: Vec<_> = service
            .advance(MS_16)
            .into_iter()
            .map(|event| event.handle)
            .collect();
        assert_eq!(handles, vec![first, second]);
        assert!(first.id() < second.id());
        assert_eq!(service.live_count(), 0);
    }
}
