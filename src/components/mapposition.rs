//! World-space position component.
//!
//! The position is the center of the entity: both the collision box and the
//! sprite are laid out around it.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// World-space position (center) of an entity, in pixels.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vector2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vector2 { x, y },
        }
    }

    pub fn from_vec(pos: Vector2) -> Self {
        Self { pos }
    }
}
