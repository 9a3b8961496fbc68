//! Axis-aligned rectangles in world space
//!
//! Positions are `glam::Vec2` (x right, y down, pixels). Sizes are whole
//! pixels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box, anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: i32, h: i32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            w,
            h,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.w as f32
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.h as f32
    }

    /// Zero or negative extent on either axis
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Strict AABB overlap
    ///
    /// Rects that only share an edge do not overlap, and a degenerate rect
    /// overlaps nothing.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}
