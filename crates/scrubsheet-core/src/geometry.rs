#![forbid(unsafe_code)]

//! Geometric primitives in logical points.
//!
//! All coordinates use a top-left origin with `y` growing downward, so a
//! positive vertical translation or velocity means "toward the bottom edge".

use std::ops::{Add, Neg, Sub};

/// A position in logical points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }
}

/// A displacement or rate in logical points (or points per second).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Create a new vector.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Vector length.
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Sub for Point {
    type Output = Vec2;

    #[inline]
    fn sub(self, rhs: Point) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vec2> for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Vec2) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Width and height in logical points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle used for hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Top edge.
    #[inline]
    pub fn top(&self) -> f64 {
        self.origin.y
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Left edge.
    #[inline]
    pub fn left(&self) -> f64 {
        self.origin.x
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_difference_is_translation() {
        let a = Point::new(10.0, 40.0);
        let b = Point::new(13.0, 36.0);
        assert_eq!(b - a, Vec2::new(3.0, -4.0));
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_plus_vector() {
        let p = Point::ORIGIN + Vec2::new(2.0, 3.0);
        assert_eq!(p, Point::new(2.0, 3.0));
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(0.0, 100.0, 50.0, 20.0);
        assert!(r.contains(Point::new(0.0, 100.0)));
        assert!(r.contains(Point::new(49.9, 119.9)));
        assert!(!r.contains(Point::new(50.0, 110.0)));
        assert!(!r.contains(Point::new(10.0, 120.0)));
        assert!(!r.contains(Point::new(10.0, 99.0)));
    }

    #[test]
    fn negated_vector() {
        assert_eq!(-Vec2::new(1.0, -2.0), Vec2::new(-1.0, 2.0));
    }
}
