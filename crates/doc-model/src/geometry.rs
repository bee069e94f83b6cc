//! Geometry value types shared by every coordinate space.
//!
//! A [`Rect`] carries no tag for the space it lives in; callers only compare
//! or intersect rectangles that come from the same space.

use serde::{Deserialize, Serialize};

/// A point in some 2D coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: f32,
    pub y: f32,
}

impl Coord {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }
}

/// Axis-aligned box with a top-left origin.
///
/// Valid boxes have `width >= 0` and `height >= 0`. A zero-sized box is a
/// legal, degenerate rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Normalize two arbitrary corners into a box with non-negative size.
    pub fn from_two_points(a: Coord, b: Coord) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn origin(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_valid(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }

    /// Overlap of two boxes, or `None` when they do not touch.
    ///
    /// Boxes that only share an edge intersect in a zero-sized box.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        debug_assert!(self.is_valid(), "negative-sized box: {self:?}");
        debug_assert!(other.is_valid(), "negative-sized box: {other:?}");

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let width = self.right().min(other.right()) - x;
        let height = self.bottom().min(other.bottom()) - y;

        if width < 0.0 || height < 0.0 {
            return None;
        }

        Some(Rect { x, y, width, height })
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect { x: self.x + dx, y: self.y + dy, ..*self }
    }

    /// Scale all four fields, i.e. change the unit of the coordinate system.
    pub fn scaled(&self, scalar: f32) -> Rect {
        Rect {
            x: self.x * scalar,
            y: self.y * scalar,
            width: self.width * scalar,
            height: self.height * scalar,
        }
    }
}
