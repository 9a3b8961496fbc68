//! Recording render surface

use std::collections::HashSet;

use super::instance::{Color, SpriteInstance};
use super::{DrawImage, ImageProvider, RenderSurface, SpriteId};
use crate::error::RenderError;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Image(DrawImage),
    StrokeRect {
        color: Color,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    },
}

/// Records draw calls in submission order
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    /// Sprites this surface refuses to draw
    rejected: HashSet<SpriteId>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every draw of `sprite` fail (simulates a broken texture)
    pub fn reject(&mut self, sprite: SpriteId) {
        self.rejected.insert(sprite);
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn images(&self) -> impl Iterator<Item = &DrawImage> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Image(img) => Some(img),
            _ => None,
        })
    }

    /// Image draws as GPU instances, resolving implicit sizes through `images`
    ///
    /// Draws of sprites the provider does not know are dropped.
    pub fn instances(&self, images: &dyn ImageProvider) -> Vec<SpriteInstance> {
        self.images()
            .filter_map(|img| {
                let (w, h) = match img.size {
                    Some(size) => size,
                    None => {
                        let (w, h) = images.size(img.sprite)?;
                        (w as i32, h as i32)
                    }
                };
                Some((img, w, h))
            })
            .enumerate()
            .map(|(order, (img, w, h))| {
                SpriteInstance::new(img.x as f32, img.y as f32, w as f32, h as f32, img.sprite.0, order as u32)
            })
            .collect()
    }

    /// Instance buffer bytes, ready for upload
    pub fn instance_bytes(&self, images: &dyn ImageProvider) -> Vec<u8> {
        bytemuck::cast_slice(&self.instances(images)).to_vec()
    }
}

impl RenderSurface for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_image(&mut self, cmd: DrawImage) -> Result<(), RenderError> {
        if self.rejected.contains(&cmd.sprite) {
            return Err(RenderError::Surface(format!("sprite {} rejected", cmd.sprite.0)));
        }
        self.commands.push(DrawCommand::Image(cmd));
        Ok(())
    }

    fn stroke_rect(&mut self, color: Color, x: i32, y: i32, w: i32, h: i32) {
        self.commands.push(DrawCommand::StrokeRect { color, x, y, w, h });
    }
}
