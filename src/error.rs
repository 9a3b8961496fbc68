//! Error types
//!
//! Simulation itself never fails; only configuration loading, scene
//! switching and individual draw calls can.

use std::path::PathBuf;

use crate::renderer::SpriteId;

/// Failure while loading a [`Config`](crate::Config)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read config '{path}', reason='{source}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config, reason='{0}'")]
    Parse(#[from] serde_json::Error),
    #[error("Config value out of range, reason='{0}'")]
    Invalid(String),
}

/// Failure of a single draw call
///
/// Never aborts a frame: the scene logs it, counts it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("No image for sprite {0:?}")]
    MissingSprite(SpriteId),
    #[error("Render surface rejected draw, reason='{0}'")]
    Surface(String),
}

/// Failure while switching scenes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("No scene registered as '{0}'")]
    Unknown(String),
}
