//! Axis-aligned collision box component.
//!
//! The box is centered on the entity position and spans its full
//! `size`: `[pos - size/2, pos + size/2]`. Tile collision, entity overlap
//! checks and debug drawing all use [`BoxCollider::aabb`].

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    /// Full width and height.
    pub size: Vector2,
}

impl BoxCollider {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vector2::new(width, height),
        }
    }

    pub fn half_width(&self) -> f32 {
        self.size.x * 0.5
    }

    pub fn half_height(&self) -> f32 {
        self.size.y * 0.5
    }

    /// `(min, max)` corners around `position`.
    pub fn aabb(&self, position: Vector2) -> (Vector2, Vector2) {
        let half = Vector2::new(self.half_width(), self.half_height());
        (
            Vector2::new(position.x - half.x, position.y - half.y),
            Vector2::new(position.x + half.x, position.y + half.y),
        )
    }

    /// `(x, y, width, height)` of the box, for drawing.
    pub fn get_aabb(&self, position: Vector2) -> (f32, f32, f32, f32) {
        let (min, _) = self.aabb(position);
        (min.x, min.y, self.size.x, self.size.y)
    }

    /// Strict overlap: boxes that only touch do not overlap.
    pub fn overlaps(&self, position: Vector2, other: &Self, other_position: Vector2) -> bool {
        let (min_a, max_a) = self.aabb(position);
        let (min_b, max_b) = other.aabb(other_position);
        min_a.x < max_b.x && max_a.x > min_b.x && min_a.y < max_b.y && max_a.y > min_b.y
    }
}
