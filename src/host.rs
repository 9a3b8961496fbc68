//! Scene host
//!
//! Owns the clock and the active scene. After every frame it checks whether
//! the scene requested another one and, if so, builds and swaps it in.

use std::collections::HashMap;

use crate::config::Config;
use crate::error::SceneError;
use crate::renderer::{ImageProvider, RenderStats, RenderSurface, rgb};
use crate::sim::{Clock, Controls, FrameContext, Scene};

/// Builds a fresh scene from the shared configuration
pub type SceneBuilder = Box<dyn Fn(&Config) -> Scene>;

pub struct SceneHost {
    config: Config,
    builders: HashMap<String, SceneBuilder>,
    current: Option<(String, Scene)>,
    clock: Clock,
}

impl SceneHost {
    pub fn new(config: Config) -> Self {
        let clock = Clock::new(config.max_frame_delta_ms);
        Self {
            config,
            builders: HashMap::new(),
            current: None,
            clock,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn register(&mut self, id: impl Into<String>, builder: impl Fn(&Config) -> Scene + 'static) {
        self.builders.insert(id.into(), Box::new(builder));
    }

    /// Discard the current scene and build `id` from scratch
    pub fn switch_to(&mut self, id: &str) -> Result<(), SceneError> {
        let builder = self
            .builders
            .get(id)
            .ok_or_else(|| SceneError::Unknown(id.to_owned()))?;
        let scene = builder(&self.config);
        log::info!(
            "Entering scene '{}' ({} objects, max scroll {})",
            id,
            scene.objects.len(),
            scene.camera.max_scroll
        );
        self.current = Some((id.to_owned(), scene));
        Ok(())
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|(id, _)| id.as_str())
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.current.as_ref().map(|(_, scene)| scene)
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.current.as_mut().map(|(_, scene)| scene)
    }

    /// Run one frame of the current scene, then honor its scene request
    ///
    /// Returns the id of the scene switched to, if any. A request for an
    /// unregistered scene is logged and the current scene keeps running.
    pub fn step(&mut self, ctx: &FrameContext) -> Option<String> {
        let (_, scene) = self.current.as_mut()?;
        scene.update(ctx);
        let next = scene.take_next_scene()?;
        match self.switch_to(&next) {
            Ok(()) => Some(next),
            Err(e) => {
                log::warn!("{e}; staying in '{}'", self.current_id().unwrap_or_default());
                None
            }
        }
    }

    /// Tick the clock at `now_ms` and run a frame
    pub fn frame_at(&mut self, now_ms: f64, controls: Controls) -> Option<String> {
        let ctx = self.clock.tick_at(now_ms).with_controls(controls);
        self.step(&ctx)
    }

    /// Tick the clock with system time and run a frame
    #[cfg(not(target_arch = "wasm32"))]
    pub fn frame(&mut self, controls: Controls) -> Option<String> {
        let ctx = self.clock.tick().with_controls(controls);
        self.step(&ctx)
    }

    /// Clear to the background color and draw the current scene
    pub fn render(&self, surface: &mut dyn RenderSurface, images: &dyn ImageProvider) -> RenderStats {
        surface.clear(rgb(self.config.background_color));
        match self.scene() {
            Some(scene) => scene.render(surface, images),
            None => RenderStats::default(),
        }
    }
}
