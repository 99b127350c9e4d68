#![forbid(unsafe_code)]

//! Canonical pointer event types.
//!
//! The panel consumes a single pointer stream: press, move, release, and a
//! host-initiated cancellation. Every event carries its position in window
//! coordinates and the instant it was sampled, which the velocity tracker
//! needs for release-velocity estimation.

use web_time::Instant;

use crate::geometry::Point;

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Contact began (finger down, button pressed).
    Down,
    /// Contact moved while held.
    Moved,
    /// Contact ended normally.
    Up,
    /// The host took the pointer away (system gesture, focus loss).
    Cancelled,
}

/// A single pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    /// Position in window coordinates.
    pub position: Point,
    /// When the sample was taken.
    pub time: Instant,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[inline]
    pub const fn new(kind: PointerEventKind, position: Point, time: Instant) -> Self {
        Self {
            kind,
            position,
            time,
        }
    }

    /// Shorthand for a [`PointerEventKind::Down`] sample.
    #[inline]
    pub const fn down(position: Point, time: Instant) -> Self {
        Self::new(PointerEventKind::Down, position, time)
    }

    /// Shorthand for a [`PointerEventKind::Moved`] sample.
    #[inline]
    pub const fn moved(position: Point, time: Instant) -> Self {
        Self::new(PointerEventKind::Moved, position, time)
    }

    /// Shorthand for a [`PointerEventKind::Up`] sample.
    #[inline]
    pub const fn up(position: Point, time: Instant) -> Self {
        Self::new(PointerEventKind::Up, position, time)
    }

    /// Shorthand for a [`PointerEventKind::Cancelled`] sample.
    #[inline]
    pub const fn cancelled(position: Point, time: Instant) -> Self {
        Self::new(PointerEventKind::Cancelled, position, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthands_set_kind() {
        let t = Instant::now();
        let p = Point::new(4.0, 8.0);
        let kinds = [
            PointerEvent::down(p, t).kind,
            PointerEvent::moved(p, t).kind,
            PointerEvent::up(p, t).kind,
            PointerEvent::cancelled(p, t).kind,
        ];
        assert_eq!(
            kinds,
            [
                PointerEventKind::Down,
                PointerEventKind::Moved,
                PointerEventKind::Up,
                PointerEventKind::Cancelled,
            ]
        );
    }

    #[test]
    fn event_keeps_position_and_time() {
        let t = Instant::now();
        let event = PointerEvent::moved(Point::new(1.5, -2.0), t);
        assert_eq!(event.position, Point::new(1.5, -2.0));
        assert_eq!(event.time, t);
    }
}
