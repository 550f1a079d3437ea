#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are in f32 pixel space, origin at the top-left of the
//! viewport. Rectangles come from the rendering collaborator (see
//! [`crate::scene::Scene`]) and are viewport-relative.

use std::ops::{Add, AddAssign, Sub};

/// A 2D point in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Sub for Point {
    type Output = Vec2;

    fn sub(self, rhs: Self) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vec2> for Point {
    type Output = Point;

    fn add(self, rhs: Vec2) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vec2> for Point {
    type Output = Point;

    fn sub(self, rhs: Vec2) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// A 2D offset (scroll amounts, translations, ghost transforms).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Zero offset.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new offset.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether both components are zero.
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Self) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Self) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A viewport-relative rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Right edge.
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if a point is inside the rectangle (right/bottom exclusive).
    #[inline]
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Centroid of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Midpoint of the leading edge: left side when `horizontal`, top side
    /// otherwise.
    #[must_use]
    pub fn leading_edge(&self, horizontal: bool) -> Point {
        if horizontal {
            Point::new(self.x, self.y + self.height / 2.0)
        } else {
            Point::new(self.x + self.width / 2.0, self.y)
        }
    }

    /// Midpoint of the trailing edge: right side when `horizontal`, bottom
    /// side otherwise.
    #[must_use]
    pub fn trailing_edge(&self, horizontal: bool) -> Point {
        if horizontal {
            Point::new(self.right(), self.y + self.height / 2.0)
        } else {
            Point::new(self.x + self.width / 2.0, self.bottom())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect, Vec2};

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert!(rect.contains(Point::new(2.0, 3.0)));
        assert!(rect.contains(Point::new(5.9, 7.9)));
        assert!(!rect.contains(Point::new(6.0, 3.0)));
        assert!(!rect.contains(Point::new(2.0, 8.0)));
    }

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn rect_anchors() {
        let rect = Rect::new(10.0, 20.0, 40.0, 60.0);
        assert_eq!(rect.center(), Point::new(30.0, 50.0));
        assert_eq!(rect.leading_edge(true), Point::new(10.0, 50.0));
        assert_eq!(rect.leading_edge(false), Point::new(30.0, 20.0));
        assert_eq!(rect.trailing_edge(true), Point::new(50.0, 50.0));
        assert_eq!(rect.trailing_edge(false), Point::new(30.0, 80.0));
    }

    #[test]
    fn point_vec_arithmetic() {
        let p = Point::new(5.0, 7.0);
        let q = Point::new(2.0, 3.0);
        assert_eq!(p - q, Vec2::new(3.0, 4.0));
        assert_eq!(q + Vec2::new(3.0, 4.0), p);
        assert_eq!(p - Vec2::new(3.0, 4.0), q);
    }
}
