//! Geometric primitives used across the recognition engine.
//!
//! Glyph bounding boxes use integer pixel coordinates; filament samples use
//! floating-point coordinates.

use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    /// X-coordinate of the point.
    pub x: f64,
    /// Y-coordinate of the point.
    pub y: f64,
}

impl Point2 {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in integer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    /// X-coordinate of the left edge.
    pub x: i32,
    /// Y-coordinate of the top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rectangle {
    /// Creates a new rectangle from its top-left corner and dimensions.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns a copy of this rectangle grown by `dx` on the left and right
    /// sides and `dy` on the top and bottom sides.
    pub fn grown(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x - dx,
            y: self.y - dy,
            width: self.width + 2 * dx,
            height: self.height + 2 * dy,
        }
    }

    /// Tells whether this rectangle and `other` overlap on a non-empty area.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Returns the smallest rectangle containing both this one and `other`.
    pub fn union(&self, other: &Rectangle) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Self {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grown() {
        let r = Rectangle::new(10, 20, 30, 40).grown(1, 2);
        assert_eq!(r, Rectangle::new(9, 18, 32, 44));
    }

    #[test]
    fn test_intersects() {
        let a = Rectangle::new(0, 0, 10, 10);
        assert!(a.intersects(&Rectangle::new(5, 5, 10, 10)));
        // Rectangles that only touch do not intersect.
        assert!(!a.intersects(&Rectangle::new(10, 0, 10, 10)));
        assert!(!a.intersects(&Rectangle::new(20, 20, 5, 5)));
    }

    #[test]
    fn test_union() {
        let a = Rectangle::new(0, 0, 10, 10);
        let b = Rectangle::new(5, 15, 10, 10);
        assert_eq!(a.union(&b), Rectangle::new(0, 0, 15, 25));
    }
}
