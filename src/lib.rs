//! Sidescroll - frame simulation core for a side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Per-frame simulation (objects, physics, collisions, camera, scene)
//! - `renderer`: Draw surface abstraction and a recording draw list
//! - `config`: Runtime configuration (physics tuning, tags, scenes)
//! - `host`: Scene registry and scene switching
//! - `levels`: Built-in scene builders

pub mod config;
pub mod error;
pub mod host;
pub mod levels;
pub mod renderer;
pub mod sim;

pub use config::Config;
pub use error::{ConfigError, RenderError, SceneError};
pub use host::SceneHost;

/// Game configuration constants
///
/// These are the defaults baked into [`Config::default`].
pub mod consts {
    /// Window dimensions (pixels)
    pub const FRAME_SIZE: (u32, u32) = (744, 672);
    pub const FRAME_TITLE: &str = "Side Scroller";

    /// Background clear color (RGB)
    pub const BACKGROUND_COLOR: [u8; 3] = [107, 140, 255];

    /// Distance from the left edge of the view at which the camera starts following
    pub const CAMERA_FOLLOW_THRESHOLD: f32 = 300.0;
    pub const MAX_JUMP_HEIGHT: f32 = 140.0;
    pub const TILE_SIZE: i32 = 48;

    /// Player motion (units are pixels and milliseconds)
    pub const PLAYER_ACCELERATION: f32 = 0.0005;
    pub const PLAYER_MAX_VELOCITY: f32 = 0.35;
    pub const GRAVITY: f32 = 0.002;
    pub const DECEL_FRICTION: f32 = 0.95;
    pub const BRAKE_FRICTION: f32 = 0.90;
    pub const MIN_STOP_VELOCITY: f32 = 0.02;
    pub const MAX_FALL_VELOCITY: f32 = 1.0;
    /// Velocity given to the player after bumping the underside of a collider
    pub const BUMP_VEL: f32 = 0.1;
    pub const JUMP_VELOCITY: f32 = -1.0;

    /// Enemy motion
    pub const ENEMY_START_VEL_X: f32 = 0.1;
    pub const ENEMY_KNOCKED_VEL: f32 = -0.8;

    /// Largest frame delta the clock will report (ms)
    pub const MAX_FRAME_DELTA_MS: f32 = 100.0;

    /// Candidates closer than this (subject.x - candidate.x) are collision-checked
    pub const PRUNE_DISTANCE: f32 = 100.0;
    /// Colliders wider than this are always collision-checked
    pub const PRUNE_WIDE_COLLIDER: i32 = 100;

    /// Role tags
    pub const PLAYER_TAG: &str = "mario";
    pub const ENEMY_TAG: &str = "goomba";

    /// Scene identifiers
    pub const SCENE_MAIN_MENU: &str = "main_menu";
    pub const SCENE_LEVEL_ONE: &str = "level_one";
}
