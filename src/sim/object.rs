//! Game objects
//!
//! A [`GameObject`] is a [`Body`] (physical and render state the scene
//! operates on) plus a boxed [`Behavior`] (what the object does with it).

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::FrameContext;
use super::geom::Rect;
use crate::renderer::SpriteId;

/// Physical state of an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// World-space bounds; both collision volume and draw anchor
    pub rect: Rect,
    pub vel: Vec2,
    /// Driving acceleration along x (gravity is applied by the behavior)
    pub acceleration: f32,
    /// Role identifier
    pub tag: String,
    /// Takes part in simulation and rendering at all
    pub is_awake: bool,
    /// Latched once the camera has seen the object
    is_activated: bool,
    pub has_collider: bool,
    /// Collisions resolved by callbacks only, never by snapping
    pub is_entity: bool,
    /// Skips the physics pass but still gets behavior updates
    pub freeze_movement: bool,
    pub sprite: Option<SpriteId>,
    pub flip_sprite: bool,
    /// Scene this object asked to switch to
    triggered_scene: Option<String>,
}

impl Body {
    /// Awake, not yet activated, static collider without sprite
    pub fn new(tag: impl Into<String>, rect: Rect) -> Self {
        Self {
            rect,
            vel: Vec2::ZERO,
            acceleration: 0.0,
            tag: tag.into(),
            is_awake: true,
            is_activated: false,
            has_collider: true,
            is_entity: false,
            freeze_movement: false,
            sprite: None,
            flip_sprite: false,
            triggered_scene: None,
        }
    }

    pub fn with_sprite(mut self, sprite: SpriteId) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn as_entity(mut self) -> Self {
        self.is_entity = true;
        self
    }

    pub fn without_collider(mut self) -> Self {
        self.has_collider = false;
        self
    }

    pub fn frozen(mut self) -> Self {
        self.freeze_movement = true;
        self
    }

    #[inline]
    pub fn is_activated(&self) -> bool {
        self.is_activated
    }

    /// Set the activation latch. There is no way to clear it.
    pub fn activate(&mut self) {
        self.is_activated = true;
    }

    /// Awake and activated: eligible for behavior, physics and rendering
    #[inline]
    pub fn is_live(&self) -> bool {
        self.is_awake && self.is_activated
    }

    pub fn is_tagged(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Ask the scene host to switch to `scene`
    pub fn trigger_scene(&mut self, scene: impl Into<String>) {
        self.triggered_scene = Some(scene.into());
    }

    pub fn has_triggered_scene(&self) -> bool {
        self.triggered_scene.is_some()
    }

    pub fn triggered_scene(&self) -> Option<&str> {
        self.triggered_scene.as_deref()
    }

    /// Hand over the pending scene request, clearing it
    pub fn take_triggered_scene(&mut self) -> Option<String> {
        self.triggered_scene.take()
    }
}

/// Object-specific behavior
///
/// Every hook has a no-op default, so static geometry can implement the
/// trait with an empty `impl`.
pub trait Behavior: fmt::Debug {
    /// Behavior tick (AI, input). Only called for live objects.
    fn update(&mut self, _body: &mut Body, _ctx: &FrameContext) {}

    /// Advance `body.vel` before movement
    fn accelerate(&mut self, _body: &mut Body, _ctx: &FrameContext) {}

    /// React to a collision with `other`
    ///
    /// `delta` is the velocity of the axis move that produced the overlap
    /// (one component is always zero). Both sides of a pair receive the same
    /// `delta`.
    fn on_collision(&mut self, _body: &mut Body, _other: &Body, _delta: Vec2) {}
}

/// A body driven by a behavior
pub struct GameObject {
    pub body: Body,
    behavior: Box<dyn Behavior>,
}

impl fmt::Debug for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameObject")
            .field("body", &self.body)
            .field("behavior", &self.behavior)
            .finish()
    }
}

impl GameObject {
    pub fn new(body: Body, behavior: impl Behavior + 'static) -> Self {
        Self {
            body,
            behavior: Box::new(behavior),
        }
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        self.behavior.update(&mut self.body, ctx);
    }

    pub fn accelerate(&mut self, ctx: &FrameContext) {
        self.behavior.accelerate(&mut self.body, ctx);
    }

    pub fn on_collision(&mut self, other: &Body, delta: Vec2) {
        self.behavior.on_collision(&mut self.body, other, delta);
    }
}
