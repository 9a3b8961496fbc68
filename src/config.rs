//! Runtime configuration
//!
//! Read once at startup and shared read-only by every scene. Every field
//! falls back to the matching value in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::Motion;

/// Window settings (consumed by the presentation layer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: FRAME_SIZE.0,
            height: FRAME_SIZE.1,
            title: FRAME_TITLE.to_owned(),
        }
    }
}

/// Motion tuning for the controlled character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub acceleration: f32,
    pub max_velocity: f32,
    pub gravity: f32,
    pub decel_friction: f32,
    pub brake_friction: f32,
    pub min_stop_velocity: f32,
    pub max_fall_velocity: f32,
    pub jump_velocity: f32,
    /// Downward velocity after hitting the underside of a collider
    pub bump_velocity: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            acceleration: PLAYER_ACCELERATION,
            max_velocity: PLAYER_MAX_VELOCITY,
            gravity: GRAVITY,
            decel_friction: DECEL_FRICTION,
            brake_friction: BRAKE_FRICTION,
            min_stop_velocity: MIN_STOP_VELOCITY,
            max_fall_velocity: MAX_FALL_VELOCITY,
            jump_velocity: JUMP_VELOCITY,
            bump_velocity: BUMP_VEL,
        }
    }
}

impl PlayerConfig {
    pub fn motion(&self) -> Motion {
        Motion {
            max_velocity: self.max_velocity,
            gravity: self.gravity,
            decel_friction: self.decel_friction,
            brake_friction: self.brake_friction,
            min_stop_velocity: self.min_stop_velocity,
            max_fall_velocity: self.max_fall_velocity,
        }
    }
}

/// Enemy tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub start_vel_x: f32,
    /// Upward velocity of an enemy knocked out of play
    pub knocked_vel: f32,
    pub gravity: f32,
    pub max_fall_velocity: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            start_vel_x: ENEMY_START_VEL_X,
            knocked_vel: ENEMY_KNOCKED_VEL,
            gravity: GRAVITY,
            max_fall_velocity: MAX_FALL_VELOCITY,
        }
    }
}

/// Role tags used to dispatch by object kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tags {
    pub player: String,
    pub enemy: String,
}

impl Default for Tags {
    fn default() -> Self {
        Self {
            player: PLAYER_TAG.to_owned(),
            enemy: ENEMY_TAG.to_owned(),
        }
    }
}

/// Scene identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneIds {
    pub main_menu: String,
    pub level_one: String,
}

impl Default for SceneIds {
    fn default() -> Self {
        Self {
            main_menu: SCENE_MAIN_MENU.to_owned(),
            level_one: SCENE_LEVEL_ONE.to_owned(),
        }
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub tile_size: i32,
    pub camera_follow_threshold: f32,
    pub max_jump_height: f32,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub tags: Tags,
    pub scenes: SceneIds,
    pub background_color: [u8; 3],
    pub max_frame_delta_ms: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            tile_size: TILE_SIZE,
            camera_follow_threshold: CAMERA_FOLLOW_THRESHOLD,
            max_jump_height: MAX_JUMP_HEIGHT,
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            tags: Tags::default(),
            scenes: SceneIds::default(),
            background_color: BACKGROUND_COLOR,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
        }
    }
}

impl Config {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::Invalid(reason));
        if self.window.width == 0 || self.window.height == 0 {
            return invalid(format!("window size {}x{} is empty", self.window.width, self.window.height));
        }
        if self.tile_size <= 0 {
            return invalid(format!("tile_size {} must be positive", self.tile_size));
        }
        if self.player.max_velocity.is_nan() || self.player.max_velocity < 0.0 {
            return invalid(format!("player.max_velocity {} must not be negative", self.player.max_velocity));
        }
        if self.max_frame_delta_ms.is_nan() || self.max_frame_delta_ms < 0.0 {
            return invalid(format!("max_frame_delta_ms {} must not be negative", self.max_frame_delta_ms));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path`, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using default config");
                Self::default()
            }
        }
    }
}
