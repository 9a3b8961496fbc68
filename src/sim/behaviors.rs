//! Stock object behaviors
//!
//! - [`Solid`]: static level geometry
//! - [`Avatar`]: the controlled character
//! - [`Patrol`]: a walking enemy that can be stomped
//! - [`SceneTrigger`]: requests a scene when touched by a given tag
//! - [`StartPrompt`]: requests a scene when jump is pressed

use glam::Vec2;

use super::clock::FrameContext;
use super::motion::{self, Motion};
use super::object::{Behavior, Body};
use crate::config::{Config, EnemyConfig, PlayerConfig};

/// Below this y a knocked enemy goes to sleep
const KNOCKED_SLEEP_Y: f32 = 2000.0;

/// `upper` lands on `lower`: its feet are within the top half of `lower`
///
/// Purely positional, so both sides of a pair agree regardless of which one
/// gets its callback first.
pub fn stomps(upper: &Body, lower: &Body) -> bool {
    upper.rect.bottom() <= lower.rect.top() + lower.rect.h as f32 / 2.0
}

/// Static geometry: blocks, floors, pipes
#[derive(Debug, Clone, Copy, Default)]
pub struct Solid;

impl Behavior for Solid {}

/// The controlled character
#[derive(Debug, Clone)]
pub struct Avatar {
    tuning: PlayerConfig,
    motion: Motion,
    max_jump_height: f32,
    enemy_tag: String,
    /// Scene requested when hit by an enemy
    on_death: String,
    grounded: bool,
    /// y at take-off while a jump is still rising under power
    jump_origin: Option<f32>,
}

impl Avatar {
    pub fn new(config: &Config, on_death: impl Into<String>) -> Self {
        Self {
            tuning: config.player.clone(),
            motion: config.player.motion(),
            max_jump_height: config.max_jump_height,
            enemy_tag: config.tags.enemy.clone(),
            on_death: on_death.into(),
            grounded: false,
            jump_origin: None,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn end_jump(&mut self, body: &mut Body) {
        if body.vel.y < 0.0 {
            body.vel.y = 0.0;
        }
        self.jump_origin = None;
    }
}

impl Behavior for Avatar {
    fn update(&mut self, body: &mut Body, ctx: &FrameContext) {
        let intent = ctx.controls.horizontal.clamp(-1.0, 1.0);
        body.acceleration = intent * self.tuning.acceleration;
        if intent != 0.0 {
            body.flip_sprite = intent < 0.0;
        }

        if ctx.controls.jump && self.grounded && self.jump_origin.is_none() {
            body.vel.y = self.tuning.jump_velocity;
            self.grounded = false;
            self.jump_origin = Some(body.rect.pos.y);
        }

        // Releasing jump or reaching the height cap ends the powered rise
        if let Some(origin) = self.jump_origin {
            if !ctx.controls.jump || origin - body.rect.pos.y >= self.max_jump_height {
                self.end_jump(body);
            }
        }
    }

    fn accelerate(&mut self, body: &mut Body, ctx: &FrameContext) {
        // Re-established by a landing collision during this physics pass
        self.grounded = false;
        motion::accelerate(body, &self.motion, ctx.dt);
    }

    fn on_collision(&mut self, body: &mut Body, other: &Body, delta: Vec2) {
        if other.is_tagged(&self.enemy_tag) {
            if !other.has_collider {
                return;
            }
            if stomps(body, other) {
                body.vel.y = self.tuning.jump_velocity / 2.0;
                self.jump_origin = None;
            } else {
                log::info!("{} hit by {}", body.tag, other.tag);
                body.trigger_scene(self.on_death.clone());
            }
            return;
        }
        if other.is_entity {
            return;
        }

        if delta.y > 0.0 {
            body.vel.y = 0.0;
            self.grounded = true;
            self.jump_origin = None;
        } else if delta.y < 0.0 {
            body.vel.y = self.tuning.bump_velocity;
            self.jump_origin = None;
        } else if delta.x != 0.0 {
            body.vel.x = 0.0;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatrolState {
    Idle,
    Walking,
    Knocked,
}

/// Walking enemy
///
/// Starts walking left when first updated, turns around on walls and other
/// enemies, and is knocked out of play when stomped by the player.
#[derive(Debug, Clone)]
pub struct Patrol {
    motion: Motion,
    walk_speed: f32,
    knocked_vel: f32,
    player_tag: String,
    state: PatrolState,
}

impl Patrol {
    pub fn new(enemy: &EnemyConfig, player_tag: impl Into<String>) -> Self {
        Self {
            motion: Motion::falling(enemy.gravity, enemy.max_fall_velocity),
            walk_speed: enemy.start_vel_x,
            knocked_vel: enemy.knocked_vel,
            player_tag: player_tag.into(),
            state: PatrolState::Idle,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.enemy, config.tags.player.clone())
    }

    pub fn is_knocked(&self) -> bool {
        self.state == PatrolState::Knocked
    }

    fn knock(&mut self, body: &mut Body) {
        self.state = PatrolState::Knocked;
        body.has_collider = false;
        body.vel = Vec2::new(0.0, self.knocked_vel);
    }
}

impl Behavior for Patrol {
    fn update(&mut self, body: &mut Body, _ctx: &FrameContext) {
        match self.state {
            PatrolState::Idle => {
                body.vel.x = -self.walk_speed;
                self.state = PatrolState::Walking;
            }
            PatrolState::Walking => {}
            PatrolState::Knocked => {
                if body.rect.top() > KNOCKED_SLEEP_Y {
                    body.is_awake = false;
                }
            }
        }
    }

    fn accelerate(&mut self, body: &mut Body, ctx: &FrameContext) {
        motion::accelerate(body, &self.motion, ctx.dt);
    }

    fn on_collision(&mut self, body: &mut Body, other: &Body, delta: Vec2) {
        if self.state == PatrolState::Knocked {
            return;
        }
        if other.is_tagged(&self.player_tag) {
            if stomps(other, body) {
                log::debug!("{} stomped", body.tag);
                self.knock(body);
            }
            return;
        }
        if other.is_entity {
            // Turn away from another walker we are heading into
            let towards = (other.rect.pos.x - body.rect.pos.x).signum();
            if body.vel.x != 0.0 && body.vel.x.signum() == towards {
                body.vel.x = -body.vel.x;
            }
            return;
        }

        if delta.x != 0.0 {
            body.vel.x = -delta.x;
        } else if delta.y != 0.0 {
            body.vel.y = 0.0;
        }
    }
}

/// Requests `target` when an object tagged `activator` touches it
///
/// Give the body `as_entity()` so touching it never snaps the activator.
#[derive(Debug, Clone)]
pub struct SceneTrigger {
    target: String,
    activator: String,
}

impl SceneTrigger {
    pub fn new(target: impl Into<String>, activator: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            activator: activator.into(),
        }
    }
}

impl Behavior for SceneTrigger {
    fn on_collision(&mut self, body: &mut Body, other: &Body, _delta: Vec2) {
        if other.is_tagged(&self.activator) && !body.has_triggered_scene() {
            log::info!("{} touched {}, requesting '{}'", other.tag, body.tag, self.target);
            body.trigger_scene(self.target.clone());
        }
    }
}

/// Requests `target` as soon as jump is pressed
#[derive(Debug, Clone)]
pub struct StartPrompt {
    target: String,
}

impl StartPrompt {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl Behavior for StartPrompt {
    fn update(&mut self, body: &mut Body, ctx: &FrameContext) {
        if ctx.controls.jump {
            body.trigger_scene(self.target.clone());
        }
    }
}
