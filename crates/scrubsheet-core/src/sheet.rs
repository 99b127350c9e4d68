#![forbid(unsafe_code)]

//! The bottom sheet host.
//!
//! [`PopupSheet`] wires the pieces together the way a screen would: pointer
//! events from the host are hit-tested against the panel, recognized by an
//! [`ImmediateStart`] drag recognizer and routed into the
//! [`TransitionController`]. The host drives time with
//! [`advance`](PopupSheet::advance).

use std::time::Duration;

use crate::animation::{AnimationService, FrameAnimator};
use crate::event::{PointerEvent, PointerEventKind};
use crate::geometry::{Rect, Size};
use crate::gesture::{DragRecognizer, GesturePhase, ImmediateStart, PanUpdate};
use crate::panel::{PanelConfig, PanelFrame, PanelState, PanelStyle};
use crate::transition::TransitionController;

/// A draggable panel pinned to the bottom of a viewport.
#[derive(Debug)]
pub struct PopupSheet<S> {
    viewport: Size,
    style: PanelStyle,
    recognizer: DragRecognizer<ImmediateStart>,
    controller: TransitionController<S>,
}

impl PopupSheet<FrameAnimator> {
    /// A sheet animated in-process by a [`FrameAnimator`].
    #[must_use]
    pub fn with_frame_animator(config: PanelConfig, state: PanelState, viewport: Size) -> Self {
        let service = FrameAnimator::new(config.resting_frame(state));
        Self::new(config, state, viewport, service)
    }
}

impl<S: AnimationService> PopupSheet<S> {
    pub fn new(config: PanelConfig, state: PanelState, viewport: Size, service: S) -> Self {
        Self {
            viewport,
            style: PanelStyle::default(),
            recognizer: DragRecognizer::default(),
            controller: TransitionController::new(config, state, service),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: PanelStyle) -> Self {
        self.style = style;
        self
    }

    #[inline]
    #[must_use]
    pub fn style(&self) -> &PanelStyle {
        &self.style
    }

    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.controller.state()
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &TransitionController<S> {
        &self.controller
    }

    #[inline]
    #[must_use]
    pub fn gesture_phase(&self) -> GesturePhase {
        self.recognizer.phase()
    }

    /// The frame currently presented.
    #[must_use]
    pub fn frame(&self) -> PanelFrame {
        self.controller.service().surface().frame
    }

    /// Where the panel currently sits in viewport coordinates.
    #[must_use]
    pub fn panel_rect(&self) -> Rect {
        let height = self.controller.config().panel_height;
        let top = self.viewport.height - height + self.frame().offset;
        Rect::new(0.0, top, self.viewport.width, height)
    }

    /// Feed one pointer sample. Returns the pan update delivered, if any.
    ///
    /// A touch-down outside the panel is dropped unless a drag is already in
    /// progress.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<PanUpdate> {
        if event.kind == PointerEventKind::Down
            && !self.recognizer.is_dragging()
            && !self.panel_rect().contains(event.position)
        {
            return None;
        }
        let update = self.recognizer.process(event)?;
        self.controller.on_pan(&update);
        Some(update)
    }

    /// Advance the frame loop by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.controller.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use web_time::Instant;

    const MS_16: Duration = Duration::from_millis(16);

    fn sheet(state: PanelState) -> PopupSheet<FrameAnimator> {
        PopupSheet::with_frame_animator(PanelConfig::default(), state, Size::new(375.0, 812.0))
    }

    #[test]
    fn closed_panel_peeks_above_bottom_edge() {
        let sheet = sheet(PanelState::Closed);
        let rect = sheet.panel_rect();
        assert_eq!(rect.top(), 752.0);
        assert_eq!(rect.bottom(), 1252.0);
        assert_eq!(rect.size.width, 375.0);
    }

    #[test]
    fn open_panel_is_fully_visible() {
        let sheet = sheet(PanelState::Open);
        assert_eq!(sheet.panel_rect().top(), 312.0);
        assert_eq!(sheet.frame().corner_radius, 20.0);
    }

    #[test]
    fn touch_outside_panel_is_ignored() {
        let mut sheet = sheet(PanelState::Closed);
        let update =
            sheet.handle_pointer(&PointerEvent::down(Point::new(100.0, 300.0), Instant::now()));
        assert!(update.is_none());
        assert!(!sheet.controller().is_transitioning());
        assert_eq!(sheet.gesture_phase(), GesturePhase::Possible);
    }

    #[test]
    fn touch_on_panel_grabs_immediately() {
        let mut sheet = sheet(PanelState::Closed);
        let update =
            sheet.handle_pointer(&PointerEvent::down(Point::new(100.0, 780.0), Instant::now()));
        assert_eq!(update.map(|u| u.phase), Some(GesturePhase::Began));
        assert!(sheet.controller().is_transitioning());
    }

    #[test]
    fn tap_on_closed_panel_opens_it() {
        let t0 = Instant::now();
        let mut sheet = sheet(PanelState::Closed);
        sheet.handle_pointer(&PointerEvent::down(Point::new(100.0, 780.0), t0));
        sheet.handle_pointer(&PointerEvent::up(Point::new(100.0, 780.0), t0 + MS_16));
        sheet.advance(MS_16);

        assert_eq!(sheet.state(), PanelState::Open);
        assert_eq!(sheet.frame().offset, 0.0);
        assert_eq!(sheet.gesture_phase(), GesturePhase::Ended);
    }

    #[test]
    fn drag_follows_finger() {
        let t0 = Instant::now();
        let mut sheet = sheet(PanelState::Closed);
        sheet.handle_pointer(&PointerEvent::down(Point::new(100.0, 780.0), t0));
        sheet.handle_pointer(&PointerEvent::moved(Point::new(100.0, 560.0), t0 + MS_16));

        assert!((sheet.frame().offset - 220.0).abs() < 1e-9);
        assert!((sheet.panel_rect().top() - 532.0).abs() < 1e-9);
    }

    #[test]
    fn style_can_be_replaced() {
        let style = PanelStyle {
            shadow_radius: 4.0,
            ..PanelStyle::default()
        };
        let sheet = sheet(PanelState::Closed).with_style(style);
        assert_eq!(sheet.style().shadow_radius, 4.0);
    }
}
