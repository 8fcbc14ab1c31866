//! Axis-aligned geometry in room pixel space.
//!
//! The origin is the top-left corner of the room rectangle, `x` grows to the
//! right and `y` grows downwards.

use std::fmt;

/// A point or displacement in room space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of half-size `half` centered on `center`.
    pub fn centered(center: Vec2, half: f32) -> Self {
        Self::new(center.x - half, center.y - half, half * 2.0, half * 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Grows the rectangle by `margin` on every side (shrinks if negative).
    pub fn expand(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.w + margin * 2.0,
            self.h + margin * 2.0,
        )
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Length of the shared span on the X axis (negative when disjoint).
    pub fn overlap_x(&self, other: &Rect) -> f32 {
        self.right().min(other.right()) - self.x.max(other.x)
    }

    /// Length of the shared span on the Y axis (negative when disjoint).
    pub fn overlap_y(&self, other: &Rect) -> f32 {
        self.bottom().min(other.bottom()) - self.y.max(other.y)
    }

    /// Distance between the rectangles along Y (negative when they overlap on Y).
    pub fn gap_y(&self, other: &Rect) -> f32 {
        (other.y - self.bottom()).max(self.y - other.bottom())
    }

    /// Distance between the rectangles along X (negative when they overlap on X).
    pub fn gap_x(&self, other: &Rect) -> f32 {
        (other.x - self.right()).max(self.x - other.right())
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.1}, {:.1} {:.1}x{:.1}]",
            self.x, self.y, self.w, self.h
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.expand(0.5).intersects(&b));
    }

    #[test]
    fn gaps_and_overlaps() {
        let a = Rect::new(0.0, 0.0, 50.0, 10.0);
        let b = Rect::new(20.0, 25.0, 50.0, 10.0);
        assert_eq!(a.overlap_x(&b), 30.0);
        assert_eq!(a.gap_y(&b), 15.0);
        assert!(a.gap_x(&b) < 0.0);
    }

    #[test]
    fn centered_square() {
        let r = Rect::centered(Vec2::new(100.0, 50.0), 10.0);
        assert_eq!(r, Rect::new(90.0, 40.0, 20.0, 20.0));
        assert_eq!(r.center(), Vec2::new(100.0, 50.0));
    }
}
