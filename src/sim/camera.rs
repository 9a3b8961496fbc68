//! Horizontally scrolling camera
//!
//! The camera only ever scrolls forward: it follows a target moving right
//! once the target passes the follow threshold, and never chases it back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// View bounds in world space
    pub rect: Rect,
    /// Largest camera x
    pub max_scroll: f32,
    /// Distance from the left edge of the view the target may reach before
    /// the camera scrolls
    pub follow_threshold: f32,
}

impl Camera {
    pub fn new(x: f32, y: f32, w: i32, h: i32, max_scroll: f32, follow_threshold: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            max_scroll,
            follow_threshold,
        }
    }

    /// View origin (top-left) in world space
    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.rect.pos
    }

    /// Whether `rect` is at least partially in view
    pub fn contains(&self, rect: &Rect) -> bool {
        self.rect.overlaps(rect)
    }

    /// Scroll to keep a target moving right within the follow threshold
    ///
    /// Targets with negative x velocity never move the camera. The result is
    /// always clamped to `[0, max_scroll]`.
    pub fn update_position(&mut self, target_pos: Vec2, target_vel: Vec2) {
        let mut x = self.rect.pos.x;
        if target_vel.x >= 0.0 {
            let follow_x = target_pos.x - self.follow_threshold;
            if follow_x > x {
                x = follow_x;
            }
        }
        self.rect.pos.x = x.clamp(0.0, self.max_scroll.max(0.0));
    }

    /// World position to view-relative position
    #[inline]
    pub fn to_viewspace(&self, world_pos: Vec2) -> Vec2 {
        world_pos - self.rect.pos
    }
}
