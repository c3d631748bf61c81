//! Math utilities and types
//!
//! Provides the 2D vector and rectangle types used by the scene tree,
//! the collision clearance query and the camera transforms.
//!
//! Screen convention: -X is left, +X is right, -Y is up, +Y is down.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Edges of a rectangle after normalizing negative sizes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectBounds {
    /// Smallest Y coordinate
    pub top: f32,
    /// Largest Y coordinate
    pub bottom: f32,
    /// Smallest X coordinate
    pub left: f32,
    /// Largest X coordinate
    pub right: f32,
}

/// Axis-aligned rectangle described by a corner and a (possibly negative) size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect2 {
    /// Corner of the rectangle (top-left when both size components are >= 0)
    pub position: Vec2,
    /// Extent of the rectangle; negative components extend left/up
    pub size: Vec2,
}

impl Rect2 {
    /// Create a new rectangle from a corner and size
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// Create a rectangle from `x`, `y`, `width` and `height`
    pub fn xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(width, height))
    }

    /// Normalized edges of the rectangle
    pub fn bounds(&self) -> RectBounds {
        let x0 = self.position.x;
        let x1 = self.position.x + self.size.x;
        let y0 = self.position.y;
        let y1 = self.position.y + self.size.y;
        RectBounds {
            top: y0.min(y1),
            bottom: y0.max(y1),
            left: x0.min(x1),
            right: x0.max(x1),
        }
    }

    /// Copy of this rectangle moved by `offset`
    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(self.position + offset, self.size)
    }

    /// Copy of this rectangle with its size scaled by `factor`
    pub fn scale(&self, factor: f32) -> Self {
        Self::new(self.position, self.size * factor)
    }

    /// Copy of this rectangle grown by `amount` on every side
    pub fn expand(&self, amount: f32) -> Self {
        Self::new(
            self.position - Vec2::new(amount, amount),
            self.size + Vec2::new(amount * 2.0, amount * 2.0),
        )
    }

    /// Signed area (`width * height`)
    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }

    /// Signed perimeter
    pub fn perimeter(&self) -> f32 {
        self.size.x * 2.0 + self.size.y * 2.0
    }

    /// Check if this rectangle overlaps another one; touching edges do not count
    pub fn overlaps(&self, other: &Rect2) -> bool {
        let a = self.bounds();
        let b = other.bounds();
        a.left < b.right && a.right > b.left && a.top < b.bottom && a.bottom > b.top
    }

    /// Check if a point lies inside the rectangle (edges included)
    pub fn contains_point(&self, point: Vec2) -> bool {
        let b = self.bounds();
        point.x >= b.left && point.x <= b.right && point.y >= b.top && point.y <= b.bottom
    }

    /// Pairwise measurements between this rectangle and another one
    pub fn compare(&self, other: &Rect2) -> RectComparison {
        let a = self.bounds();
        let b = other.bounds();

        let closest_x = (a.left - b.left)
            .abs()
            .min((a.left - b.right).abs())
            .min((a.right - b.left).abs())
            .min((a.right - b.right).abs());
        let closest_y = (a.top - b.top)
            .abs()
            .min((a.top - b.bottom).abs())
            .min((a.bottom - b.top).abs())
            .min((a.bottom - b.bottom).abs());

        let x_intersection = a.left < b.right && a.right > b.left;
        let y_intersection = a.top < b.bottom && a.bottom > b.top;

        // A gap only exists when the boxes share the perpendicular axis and
        // `self` already sits on the matching side of `other`.
        let left_space = if y_intersection && a.left >= b.right {
            a.left - b.right
        } else {
            f32::INFINITY
        };
        let right_space = if y_intersection && a.right <= b.left {
            b.left - a.right
        } else {
            f32::INFINITY
        };
        let top_space = if x_intersection && a.top >= b.bottom {
            a.top - b.bottom
        } else {
            f32::INFINITY
        };
        let bottom_space = if x_intersection && a.bottom <= b.top {
            b.top - a.bottom
        } else {
            f32::INFINITY
        };

        RectComparison {
            x_intersection,
            y_intersection,
            closest_x,
            closest_y,
            left_space,
            right_space,
            top_space,
            bottom_space,
        }
    }
}

/// Result of [`Rect2::compare`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectComparison {
    /// The X ranges overlap
    pub x_intersection: bool,
    /// The Y ranges overlap
    pub y_intersection: bool,
    /// Smallest distance between any pair of vertical edges
    pub closest_x: f32,
    /// Smallest distance between any pair of horizontal edges
    pub closest_y: f32,
    /// Room to move left before touching `other` (infinite when unconstrained)
    pub left_space: f32,
    /// Room to move right before touching `other`
    pub right_space: f32,
    /// Room to move up before touching `other`
    pub top_space: f32,
    /// Room to move down before touching `other`
    pub bottom_space: f32,
}

/// Math utility functions
pub mod utils {
    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Move `value` toward zero by `amount` without crossing it
    pub fn approach_zero(value: f32, amount: f32) -> f32 {
        if value > 0.0 {
            (value - amount).max(0.0)
        } else if value < 0.0 {
            (value + amount).min(0.0)
        } else {
            0.0
        }
    }
}
