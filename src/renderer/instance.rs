//! GPU instance records for sprite batches

use bytemuck::{Pod, Zeroable};

/// RGBA, 0..1
pub type Color = [f32; 4];

/// 8-bit RGB to an opaque [`Color`]
pub fn rgb(c: [u8; 3]) -> Color {
    [
        f32::from(c[0]) / 255.0,
        f32::from(c[1]) / 255.0,
        f32::from(c[2]) / 255.0,
        1.0,
    ]
}

/// One textured quad in view space
///
/// A negative `size[0]` mirrors the quad horizontally around `offset`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub offset: [f32; 2],
    pub size: [f32; 2],
    pub sprite: u32,
    /// Submission order; later instances draw on top
    pub order: u32,
}

impl SpriteInstance {
    pub const fn new(x: f32, y: f32, w: f32, h: f32, sprite: u32, order: u32) -> Self {
        Self {
            offset: [x, y],
            size: [w, h],
            sprite,
            order,
        }
    }
}

/// Colors for overlays
pub mod colors {
    use super::Color;

    pub const COLLIDER: Color = [1.0, 0.0, 0.0, 1.0];
    pub const ENTITY: Color = [0.2, 0.8, 0.4, 1.0];
}
