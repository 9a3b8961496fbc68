//! Rendering interfaces
//!
//! The scene never touches pixels. It issues draw calls against a
//! [`RenderSurface`] and asks an [`ImageProvider`] for sprite sizes; the
//! presentation layer supplies both. [`DrawList`] is a surface that records
//! the calls, for batching into GPU instance buffers or for inspection.

pub mod draw_list;
pub mod instance;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

pub use draw_list::{DrawCommand, DrawList};
pub use instance::{Color, SpriteInstance, colors, rgb};

/// Opaque handle to a decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

/// Asset collaborator: knows the size of every loaded image
pub trait ImageProvider {
    /// Width and height in pixels, or `None` if the sprite is not loaded
    fn size(&self, sprite: SpriteId) -> Option<(u32, u32)>;
}

impl ImageProvider for HashMap<SpriteId, (u32, u32)> {
    fn size(&self, sprite: SpriteId) -> Option<(u32, u32)> {
        self.get(&sprite).copied()
    }
}

/// Named sprite registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpriteAtlas {
    names: HashMap<String, SpriteId>,
    sizes: HashMap<SpriteId, (u32, u32)>,
    next_id: u32,
}

impl SpriteAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image, returning its id (re-registering a name keeps the id)
    pub fn register(&mut self, name: &str, width: u32, height: u32) -> SpriteId {
        let id = match self.names.get(name) {
            Some(&id) => id,
            None => {
                let id = SpriteId(self.next_id);
                self.next_id += 1;
                self.names.insert(name.to_owned(), id);
                id
            }
        };
        self.sizes.insert(id, (width, height));
        id
    }

    pub fn id(&self, name: &str) -> Option<SpriteId> {
        self.names.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl ImageProvider for SpriteAtlas {
    fn size(&self, sprite: SpriteId) -> Option<(u32, u32)> {
        self.sizes.get(&sprite).copied()
    }
}

/// One image draw in view space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawImage {
    pub sprite: SpriteId,
    pub x: i32,
    pub y: i32,
    /// Explicit size; a negative width mirrors the image horizontally.
    /// `None` draws at the image's own size.
    pub size: Option<(i32, i32)>,
}

impl DrawImage {
    pub fn at(sprite: SpriteId, x: i32, y: i32) -> Self {
        Self {
            sprite,
            x,
            y,
            size: None,
        }
    }

    /// Mirrored draw of a `w`x`h` image whose left edge is at `x`
    pub fn flipped(sprite: SpriteId, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            sprite,
            x: x + w,
            y,
            size: Some((-w, h)),
        }
    }
}

/// Render surface collaborator
pub trait RenderSurface {
    /// Fill the whole surface
    fn clear(&mut self, _color: Color) {}

    fn draw_image(&mut self, cmd: DrawImage) -> Result<(), RenderError>;

    /// Outline a rectangle (debug overlays)
    fn stroke_rect(&mut self, color: Color, x: i32, y: i32, w: i32, h: i32);
}

/// Outcome of one scene render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub drawn: usize,
    /// Draws that failed and were skipped
    pub skipped: usize,
}
