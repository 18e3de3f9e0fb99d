//! Kinematic body component.
//!
//! Velocity is written by the entity's modules and consumed by the tile
//! collision system, which integrates it into
//! [`MapPosition`](super::mapposition::MapPosition).

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// Velocity in pixels per second.
///
/// The `frozen` flag skips integration for one entity, e.g. while its room
/// is being swapped out.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct RigidBody {
    pub velocity: Vector2,
    pub frozen: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    pub fn new() -> Self {
        Self {
            velocity: Vector2::zero(),
            frozen: false,
        }
    }
}
