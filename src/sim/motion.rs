//! Velocity integration shared by moving behaviors
//!
//! Velocities are pixels per millisecond, accelerations pixels per
//! millisecond squared. Friction factors are applied once per frame.

use serde::{Deserialize, Serialize};

use super::object::Body;

/// Limits and damping for one kind of moving object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub max_velocity: f32,
    /// Downward acceleration; 0 disables gravity
    pub gravity: f32,
    /// Applied while no driving acceleration is present
    pub decel_friction: f32,
    /// Applied while accelerating against the current direction
    pub brake_friction: f32,
    /// Coasting below this speed snaps to rest
    pub min_stop_velocity: f32,
    pub max_fall_velocity: f32,
}

impl Motion {
    /// Gravity only: no friction, horizontal speed kept as is
    pub fn falling(gravity: f32, max_fall_velocity: f32) -> Self {
        Self {
            max_velocity: f32::INFINITY,
            gravity,
            decel_friction: 1.0,
            brake_friction: 1.0,
            min_stop_velocity: 0.0,
            max_fall_velocity,
        }
    }
}

/// Advance `body.vel` by one frame of `dt` milliseconds
pub fn accelerate(body: &mut Body, motion: &Motion, dt: f32) {
    let vel = &mut body.vel;
    vel.x += body.acceleration * dt;

    if body.acceleration == 0.0 {
        vel.x *= motion.decel_friction;
        if vel.x.abs() < motion.min_stop_velocity {
            vel.x = 0.0;
        }
    } else if vel.x != 0.0 && vel.x.signum() != body.acceleration.signum() {
        vel.x *= motion.brake_friction;
    }
    vel.x = vel.x.clamp(-motion.max_velocity, motion.max_velocity);

    if motion.gravity > 0.0 {
        vel.y = (vel.y + motion.gravity * dt).min(motion.max_fall_velocity);
    }
}
