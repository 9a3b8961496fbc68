//! Frame simulation module
//!
//! Everything that runs once per frame lives here. This module is pure and
//! single-threaded:
//! - Time and input arrive through an explicit [`FrameContext`]
//! - Stable iteration order (object list order)
//! - No rendering or platform dependencies beyond sprite handles

pub mod behaviors;
pub mod camera;
pub mod clock;
pub mod collision;
pub mod geom;
pub mod motion;
pub mod object;
pub mod scene;

pub use behaviors::{Avatar, Patrol, SceneTrigger, Solid, StartPrompt};
pub use camera::Camera;
pub use clock::{Clock, Controls, FrameContext};
pub use collision::{get_collisions, handle_collisions};
pub use geom::Rect;
pub use motion::Motion;
pub use object::{Behavior, Body, GameObject};
pub use scene::Scene;
