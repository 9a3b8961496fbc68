//! Scene: per-frame update, physics and rendering of one level or menu
//!
//! A frame runs two passes over the object list, in list order:
//! 1. behavior: latch activation for objects in view, tick live objects,
//!    stop at the first object that requested a scene
//! 2. physics: accelerate and move every live, unfrozen object one axis at a
//!    time, resolving collisions after each axis; the player also drives the
//!    camera and is kept from walking back out of view
//!
//! Rendering reads the result and never mutates the scene.

use glam::Vec2;

use super::camera::Camera;
use super::clock::FrameContext;
use super::collision;
use super::object::{Body, GameObject};
use crate::config::Config;
use crate::error::RenderError;
use crate::renderer::{DrawImage, ImageProvider, RenderStats, RenderSurface, SpriteId, colors};

pub struct Scene {
    /// Update and draw order
    pub objects: Vec<GameObject>,
    pub camera: Camera,
    pub background: Option<SpriteId>,
    /// Scene requested by an object, for the host to switch to
    pub next_scene: Option<String>,
    /// Tag of the object the camera follows
    player_tag: String,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("objects", &self.objects.len())
            .field("camera", &self.camera)
            .field("next_scene", &self.next_scene)
            .finish()
    }
}

impl Scene {
    pub fn new(camera: Camera, player_tag: impl Into<String>) -> Self {
        Self {
            objects: Vec::new(),
            camera,
            background: None,
            next_scene: None,
            player_tag: player_tag.into(),
        }
    }

    /// Scene with a window-sized camera at the origin
    pub fn from_config(config: &Config, max_scroll: f32) -> Self {
        let camera = Camera::new(
            0.0,
            0.0,
            config.window.width as i32,
            config.window.height as i32,
            max_scroll,
            config.camera_follow_threshold,
        );
        Self::new(camera, config.tags.player.clone())
    }

    pub fn with_background(mut self, background: SpriteId) -> Self {
        self.background = Some(background);
        self
    }

    /// Append an object; returns its index
    pub fn add(&mut self, object: GameObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn player_tag(&self) -> &str {
        &self.player_tag
    }

    /// First object carrying the player tag
    pub fn player(&self) -> Option<&Body> {
        self.objects
            .iter()
            .map(|o| &o.body)
            .find(|b| b.is_tagged(&self.player_tag))
    }

    /// Hand the pending scene request to the host
    pub fn take_next_scene(&mut self) -> Option<String> {
        self.next_scene.take()
    }

    /// Run one frame: behavior pass, then physics pass
    pub fn update(&mut self, ctx: &FrameContext) {
        if let Some(target) = self.update_game_objects(ctx) {
            self.next_scene = Some(target);
        }
        self.physics_update(ctx);
    }

    /// Behavior pass
    ///
    /// Returns the first scene request found in list order, consuming it.
    /// Objects after the requesting one get no behavior tick this frame.
    pub fn update_game_objects(&mut self, ctx: &FrameContext) -> Option<String> {
        for object in &mut self.objects {
            let body = &mut object.body;
            if !body.is_activated() && self.camera.contains(&body.rect) {
                body.activate();
                log::debug!("Activated {} at ({}, {})", body.tag, body.rect.pos.x, body.rect.pos.y);
            }
            if object.body.is_live() {
                object.update(ctx);
            }
            if let Some(target) = object.body.take_triggered_scene() {
                log::info!("{} requested scene '{}'", object.body.tag, target);
                return Some(target);
            }
        }
        None
    }

    /// Physics pass
    pub fn physics_update(&mut self, ctx: &FrameContext) {
        for i in 0..self.objects.len() {
            let body = &self.objects[i].body;
            if !body.is_live() || body.freeze_movement {
                continue;
            }

            self.objects[i].accelerate(ctx);
            self.move_game_object(i, ctx.dt);

            if self.objects[i].body.is_tagged(&self.player_tag) {
                let body = &self.objects[i].body;
                self.camera.update_position(body.rect.pos, body.vel);
                self.prevent_backtrack(i);
            }
        }
    }

    /// Move along x, then along y, checking collisions after each axis
    ///
    /// An axis with exactly zero velocity is not moved and not checked.
    pub fn move_game_object(&mut self, index: usize, dt: f32) {
        let vel_x = self.objects[index].body.vel.x;
        if vel_x != 0.0 {
            self.move_single_axis(index, Vec2::new(vel_x, 0.0), dt);
        }
        // Collision callbacks on the x move may have changed vel.y
        let vel_y = self.objects[index].body.vel.y;
        if vel_y != 0.0 {
            self.move_single_axis(index, Vec2::new(0.0, vel_y), dt);
        }
    }

    fn move_single_axis(&mut self, index: usize, delta: Vec2, dt: f32) {
        let body = &mut self.objects[index].body;
        body.rect.pos += delta * dt;
        if body.has_collider {
            collision::handle_collisions(&mut self.objects, index, delta);
        }
    }

    /// Keep the player from moving left of the scrolled view
    pub fn prevent_backtrack(&mut self, index: usize) {
        let camera_x = self.camera.pos().x;
        let body = &mut self.objects[index].body;
        if body.rect.pos.x < camera_x {
            body.rect.pos.x = camera_x;
            body.vel.x = 0.0;
            body.acceleration = 0.0;
        }
    }

    /// Draw background then live objects, camera-relative, in list order
    ///
    /// A failed draw is logged and skipped; the rest of the frame still
    /// renders.
    pub fn render(&self, surface: &mut dyn RenderSurface, images: &dyn ImageProvider) -> RenderStats {
        let mut stats = RenderStats::default();

        if let Some(background) = self.background {
            let origin = -self.camera.pos();
            match surface.draw_image(DrawImage::at(background, origin.x as i32, origin.y as i32)) {
                Ok(()) => stats.drawn += 1,
                Err(e) => {
                    log::warn!("Skipped background: {e}");
                    stats.skipped += 1;
                }
            }
        }

        for object in &self.objects {
            match self.render_game_object(surface, images, &object.body) {
                Ok(true) => stats.drawn += 1,
                Ok(false) => {}
                Err(e) => {
                    log::warn!("Skipped {}: {e}", object.body.tag);
                    stats.skipped += 1;
                }
            }
        }
        stats
    }

    /// Returns whether anything was drawn
    fn render_game_object(
        &self,
        surface: &mut dyn RenderSurface,
        images: &dyn ImageProvider,
        body: &Body,
    ) -> Result<bool, RenderError> {
        if !body.is_live() {
            return Ok(false);
        }
        let Some(sprite) = body.sprite else {
            return Ok(false);
        };

        let view = self.camera.to_viewspace(body.rect.pos);
        let (x, y) = (view.x as i32, view.y as i32);
        let cmd = if body.flip_sprite {
            let (w, h) = images.size(sprite).ok_or(RenderError::MissingSprite(sprite))?;
            DrawImage::flipped(sprite, x, y, w as i32, h as i32)
        } else {
            images.size(sprite).ok_or(RenderError::MissingSprite(sprite))?;
            DrawImage::at(sprite, x, y)
        };
        surface.draw_image(cmd)?;
        Ok(true)
    }

    /// Outline every live collider in view space, entities in their own color
    pub fn debug_colliders(&self, surface: &mut dyn RenderSurface) {
        for body in self.objects.iter().map(|o| &o.body) {
            if body.is_live() && body.has_collider {
                let color = if body.is_entity { colors::ENTITY } else { colors::COLLIDER };
                let view = self.camera.to_viewspace(body.rect.pos);
                surface.stroke_rect(color, view.x as i32, view.y as i32, body.rect.w, body.rect.h);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, DrawList, SpriteAtlas};
    use crate::sim::object::Behavior;
    use crate::sim::{Controls, Rect, StartPrompt};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Moves at constant velocity; records callbacks and updates
    #[derive(Debug, Default, Clone)]
    struct Probe {
        log: Rc<RefCell<Vec<String>>>,
        trigger_on_update: Option<String>,
    }

    impl Behavior for Probe {
        fn update(&mut self, body: &mut Body, _ctx: &FrameContext) {
            self.log.borrow_mut().push(format!("update {}", body.tag));
            if let Some(target) = &self.trigger_on_update {
                body.trigger_scene(target.clone());
            }
        }

        fn on_collision(&mut self, body: &mut Body, other: &Body, _delta: Vec2) {
            self.log.borrow_mut().push(format!("hit {} {}", body.tag, other.tag));
        }
    }

    fn scene() -> Scene {
        Scene::new(Camera::new(0.0, 0.0, 744, 672, 5000.0, 300.0), "mario")
    }

    fn probe(log: &Rc<RefCell<Vec<String>>>) -> Probe {
        Probe {
            log: log.clone(),
            trigger_on_update: None,
        }
    }

    fn ctx(dt: f32) -> FrameContext {
        FrameContext::with_dt(dt)
    }

    #[test]
    fn test_player_inside_threshold_keeps_camera() {
        let log = Rc::default();
        let mut scene = scene();
        let player = Body::new("mario", Rect::new(250.0, 100.0, 48, 48))
            .as_entity()
            .with_velocity(Vec2::new(0.2, 0.0));
        scene.add(GameObject::new(player, probe(&log)));

        scene.update(&ctx(10.0));
        let player = scene.player().unwrap();
        assert!((player.rect.pos.x - 252.0).abs() < 1e-4);
        assert_eq!(scene.camera.pos().x, 0.0);
    }

    #[test]
    fn test_player_past_threshold_scrolls_camera() {
        let log = Rc::default();
        let mut scene = scene();
        let player = Body::new("mario", Rect::new(299.0, 100.0, 48, 48))
            .as_entity()
            .with_velocity(Vec2::new(0.2, 0.0));
        scene.add(GameObject::new(player, probe(&log)));

        scene.update(&ctx(10.0));
        assert!((scene.camera.pos().x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_non_player_never_moves_camera() {
        let log = Rc::default();
        let mut scene = scene();
        let walker = Body::new("goomba", Rect::new(600.0, 100.0, 48, 48))
            .as_entity()
            .with_velocity(Vec2::new(0.3, 0.0));
        scene.add(GameObject::new(walker, probe(&log)));
        scene.update(&ctx(16.0));
        assert_eq!(scene.camera.pos().x, 0.0);
    }

    #[test]
    fn test_prevent_backtrack_clamps_and_stops() {
        let log = Rc::default();
        let mut scene = scene();
        scene.camera.rect.pos.x = 500.0;
        let mut player = Body::new("mario", Rect::new(505.0, 100.0, 48, 48))
            .as_entity()
            .with_velocity(Vec2::new(-0.3, 0.0));
        player.acceleration = -0.0005;
        scene.add(GameObject::new(player, probe(&log)));

        scene.update(&ctx(20.0));
        let player = scene.player().unwrap();
        assert_eq!(player.rect.pos.x, 500.0);
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.acceleration, 0.0);
        assert_eq!(scene.camera.pos().x, 500.0);
    }

    #[test]
    fn test_axis_separation() {
        let log = Rc::default();
        let mut scene = scene();
        // Wall directly to the right; nothing below
        scene.add(GameObject::new(Body::new("wall", Rect::new(116.0, 0.0, 48, 400)), probe(&log)));
        let mover = Body::new("box", Rect::new(100.0, 100.0, 16, 16))
            .as_entity()
            .with_velocity(Vec2::new(0.5, 0.5));
        scene.add(GameObject::new(mover, probe(&log)));

        scene.update(&ctx(10.0));
        let mover = &scene.objects[1].body;
        // Blocked on x, snapped flush against the wall
        assert_eq!(mover.rect.pos.x, 100.0);
        // Still moved on y in the same frame
        assert!((mover.rect.pos.y - 105.0).abs() < 1e-4);
    }

    #[test]
    fn test_falling_object_lands_on_platform() {
        let log = Rc::default();
        let mut scene = scene();
        scene.add(GameObject::new(Body::new("platform", Rect::new(100.0, 200.0, 50, 20)), probe(&log)));
        let faller = Body::new("faller", Rect::new(110.0, 180.0, 16, 16))
            .as_entity()
            .with_velocity(Vec2::new(0.0, 0.5));
        scene.add(GameObject::new(faller, probe(&log)));

        scene.update(&ctx(10.0));
        let faller = &scene.objects[1].body;
        assert_eq!(faller.rect.pos.y, 184.0);
        // Velocity is left for the behavior to interpret
        assert_eq!(faller.vel.y, 0.5);
        assert!(log.borrow().contains(&"hit faller platform".to_owned()));
        assert!(log.borrow().contains(&"hit platform faller".to_owned()));
    }

    #[test]
    fn test_entity_pair_callbacks_once_each() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut scene = scene();
        let a = Body::new("a", Rect::new(100.0, 100.0, 48, 48))
            .as_entity()
            .with_velocity(Vec2::new(0.1, 0.0));
        let b = Body::new("b", Rect::new(120.0, 100.0, 48, 48)).as_entity();
        scene.add(GameObject::new(a, probe(&log)));
        scene.add(GameObject::new(b, probe(&log)));

        scene.update(&ctx(10.0));
        let hits: Vec<_> = log.borrow().iter().filter(|l| l.starts_with("hit")).cloned().collect();
        assert_eq!(hits, vec!["hit a b".to_owned(), "hit b a".to_owned()]);
        assert!((scene.objects[0].body.rect.pos.x - 101.0).abs() < 1e-4);
        assert_eq!(scene.objects[1].body.rect.pos.x, 120.0);
    }

    #[test]
    fn test_zero_velocity_axis_is_inert() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut scene = scene();
        // Already overlapping, but nothing moves: no collision pass runs
        scene.add(GameObject::new(Body::new("block", Rect::new(100.0, 100.0, 48, 48)), probe(&log)));
        scene.add(GameObject::new(Body::new("box", Rect::new(110.0, 110.0, 16, 16)), probe(&log)));
        scene.update(&ctx(10.0));
        assert!(log.borrow().iter().all(|l| !l.starts_with("hit")));
        assert_eq!(scene.objects[1].body.rect.pos, Vec2::new(110.0, 110.0));
    }

    #[test]
    fn test_activation_latches_and_gates_updates() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut scene = scene();
        scene.add(GameObject::new(Body::new("near", Rect::new(100.0, 100.0, 48, 48)), probe(&log)));
        let far = Body::new("far", Rect::new(2000.0, 100.0, 48, 48)).with_velocity(Vec2::new(0.1, 0.0));
        scene.add(GameObject::new(far, probe(&log)));

        scene.update(&ctx(10.0));
        assert!(scene.objects[0].body.is_activated());
        assert!(!scene.objects[1].body.is_activated());
        // Inactive objects neither update nor move
        assert_eq!(scene.objects[1].body.rect.pos.x, 2000.0);
        assert_eq!(*log.borrow(), vec!["update near".to_owned()]);

        // Scroll far away: the near object stays activated
        scene.camera.rect.pos.x = 1800.0;
        scene.update(&ctx(10.0));
        assert!(scene.objects[0].body.is_activated());
        assert!(scene.objects[1].body.is_activated());
        assert!(log.borrow().contains(&"update near".to_owned()));
        assert!(log.borrow().contains(&"update far".to_owned()));
    }

    #[test]
    fn test_asleep_objects_do_nothing() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut scene = scene();
        let mut body = Body::new("sleeper", Rect::new(100.0, 100.0, 48, 48)).with_velocity(Vec2::new(0.1, 0.0));
        body.is_awake = false;
        scene.add(GameObject::new(body, probe(&log)));
        scene.update(&ctx(10.0));
        assert!(scene.objects[0].body.is_activated());
        assert!(log.borrow().is_empty());
        assert_eq!(scene.objects[0].body.rect.pos.x, 100.0);
    }

    #[test]
    fn test_frozen_object_updates_but_does_not_move() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut scene = scene();
        let body = Body::new("statue", Rect::new(100.0, 100.0, 48, 48))
            .with_velocity(Vec2::new(0.1, 0.1))
            .frozen();
        scene.add(GameObject::new(body, probe(&log)));
        scene.update(&ctx(10.0));
        assert_eq!(*log.borrow(), vec!["update statue".to_owned()]);
        assert_eq!(scene.objects[0].body.rect.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_first_trigger_wins_and_truncates_pass() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut scene = scene();
        scene.add(GameObject::new(Body::new("a", Rect::new(0.0, 0.0, 10, 10)), probe(&log)));
        let first = Probe {
            log: log.clone(),
            trigger_on_update: Some("level_one".to_owned()),
        };
        scene.add(GameObject::new(Body::new("b", Rect::new(20.0, 0.0, 10, 10)), first));
        let second = Probe {
            log: log.clone(),
            trigger_on_update: Some("main_menu".to_owned()),
        };
        scene.add(GameObject::new(Body::new("c", Rect::new(40.0, 0.0, 10, 10)), second));

        scene.update(&ctx(10.0));
        assert_eq!(scene.next_scene.as_deref(), Some("level_one"));
        // "c" never got its behavior tick (and was never activated)
        assert_eq!(*log.borrow(), vec!["update a".to_owned(), "update b".to_owned()]);
        assert!(!scene.objects[2].body.is_activated());

        assert_eq!(scene.take_next_scene().as_deref(), Some("level_one"));
        assert!(scene.next_scene.is_none());
    }

    #[test]
    fn test_scene_request_is_consumed() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut scene = scene();
        scene.add(GameObject::new(
            Body::new("prompt", Rect::new(0.0, 0.0, 10, 10)).without_collider(),
            StartPrompt::new("nowhere"),
        ));
        scene.add(GameObject::new(Body::new("after", Rect::new(20.0, 0.0, 10, 10)), probe(&log)));

        let jump = ctx(16.0).with_controls(Controls {
            jump: true,
            ..Default::default()
        });
        scene.update(&jump);
        assert_eq!(scene.take_next_scene().as_deref(), Some("nowhere"));
        assert!(log.borrow().is_empty());

        // Nobody switched scenes; the pass runs to the end again
        scene.update(&ctx(16.0));
        assert!(scene.next_scene.is_none());
        assert!(!scene.objects[0].body.has_triggered_scene());
        assert_eq!(*log.borrow(), vec!["update after".to_owned()]);
    }

    #[test]
    fn test_physics_runs_after_trigger() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut scene = scene();
        let trig = Probe {
            log: log.clone(),
            trigger_on_update: Some("level_one".to_owned()),
        };
        let body = Body::new("b", Rect::new(20.0, 0.0, 10, 10)).with_velocity(Vec2::new(0.1, 0.0));
        scene.add(GameObject::new(body, trig));
        scene.update(&ctx(10.0));
        assert!((scene.objects[0].body.rect.pos.x - 21.0).abs() < 1e-4);
    }

    fn atlas() -> (SpriteAtlas, SpriteId, SpriteId, SpriteId) {
        let mut atlas = SpriteAtlas::new();
        let bg = atlas.register("background", 3000, 672);
        let block = atlas.register("block", 48, 48);
        let mario = atlas.register("mario", 48, 64);
        (atlas, bg, block, mario)
    }

    #[test]
    fn test_render_camera_relative_with_flip() {
        let (atlas, bg, block, mario) = atlas();
        let log = Rc::default();
        let mut scene = scene().with_background(bg);
        scene.add(GameObject::new(
            Body::new("block", Rect::new(700.0, 400.0, 48, 48)).with_sprite(block),
            probe(&log),
        ));
        let mut player = Body::new("mario", Rect::new(650.5, 336.0, 48, 64)).with_sprite(mario);
        player.flip_sprite = true;
        scene.add(GameObject::new(player, probe(&log)));
        for o in &mut scene.objects {
            o.body.activate();
        }
        scene.camera.rect.pos.x = 400.0;

        let mut list = DrawList::new();
        let stats = scene.render(&mut list, &atlas);
        assert_eq!(stats, RenderStats { drawn: 3, skipped: 0 });

        let images: Vec<_> = list.images().copied().collect();
        assert_eq!(images[0], DrawImage::at(bg, -400, 0));
        assert_eq!(images[1], DrawImage::at(block, 300, 400));
        assert_eq!(images[2], DrawImage::flipped(mario, 250, 336, 48, 64));
    }

    #[test]
    fn test_render_skips_inactive_and_failed_draws() {
        let (atlas, _bg, block, mario) = atlas();
        let log = Rc::default();
        let mut scene = scene();
        // Not activated: not drawn
        scene.add(GameObject::new(
            Body::new("hidden", Rect::new(0.0, 0.0, 48, 48)).with_sprite(block),
            probe(&log),
        ));
        // Unknown sprite: skipped
        scene.add(GameObject::new(
            Body::new("broken", Rect::new(0.0, 0.0, 48, 48)).with_sprite(SpriteId(42)),
            probe(&log),
        ));
        // Surface rejects it: skipped
        scene.add(GameObject::new(
            Body::new("rejected", Rect::new(0.0, 0.0, 48, 48)).with_sprite(mario),
            probe(&log),
        ));
        // No sprite at all: silently nothing
        scene.add(GameObject::new(Body::new("invisible", Rect::new(0.0, 0.0, 48, 48)), probe(&log)));
        // Drawn after all the failures
        scene.add(GameObject::new(
            Body::new("ok", Rect::new(10.0, 0.0, 48, 48)).with_sprite(block),
            probe(&log),
        ));
        for o in scene.objects.iter_mut().skip(1) {
            o.body.activate();
        }

        let mut list = DrawList::new();
        list.reject(mario);
        let stats = scene.render(&mut list, &atlas);
        assert_eq!(stats, RenderStats { drawn: 1, skipped: 2 });
        assert_eq!(list.images().count(), 1);
    }

    #[test]
    fn test_debug_colliders_use_view_space() {
        let log = Rc::default();
        let mut scene = scene();
        scene.add(GameObject::new(Body::new("block", Rect::new(500.0, 300.0, 48, 48)), probe(&log)));
        scene.add(GameObject::new(
            Body::new("deco", Rect::new(500.0, 300.0, 48, 48)).without_collider(),
            probe(&log),
        ));
        scene.add(GameObject::new(
            Body::new("goomba", Rect::new(260.0, 110.0, 48, 48)).as_entity(),
            probe(&log),
        ));
        for o in &mut scene.objects {
            o.body.activate();
        }
        scene.camera.rect.pos = Vec2::new(200.0, 50.0);

        let mut list = DrawList::new();
        scene.debug_colliders(&mut list);
        assert_eq!(
            list.commands(),
            &[
                DrawCommand::StrokeRect {
                    color: colors::COLLIDER,
                    x: 300,
                    y: 250,
                    w: 48,
                    h: 48
                },
                DrawCommand::StrokeRect {
                    color: colors::ENTITY,
                    x: 60,
                    y: 60,
                    w: 48,
                    h: 48
                },
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_activation_is_monotonic(
            camera_xs in prop::collection::vec(0.0f32..5000.0, 1..20),
            object_xs in prop::collection::vec(0.0f32..5000.0, 1..10),
        ) {
            let log = Rc::default();
            let mut scene = scene();
            for (i, x) in object_xs.iter().enumerate() {
                scene.add(GameObject::new(
                    Body::new(format!("o{i}"), Rect::new(*x, 100.0, 48, 48)),
                    probe(&log),
                ));
            }
            let mut seen = vec![false; object_xs.len()];
            for cam_x in camera_xs {
                scene.camera.rect.pos.x = cam_x;
                scene.update(&ctx(16.0));
                for (i, o) in scene.objects.iter().enumerate() {
                    prop_assert!(o.body.is_activated() || !seen[i]);
                    seen[i] = o.body.is_activated();
                }
            }
        }
    }
}
