//! Shared 2D camera resource.
//!
//! The camera is a viewport offset: a world point `p` is drawn at screen
//! position `p + position`. Scrolling right therefore means a more negative
//! `position.x`. The offset is clamped to bounds derived from the active room
//! so the view never shows outside the room.

use bevy_ecs::prelude::Resource;
use raylib::prelude::{Camera2D, Vector2};

use crate::resources::screensize::ScreenSize;

/// ECS resource holding the viewport offset and its bounds.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector2,
    pub bound_min: Vector2,
    pub bound_max: Vector2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_axis(value: f32, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    value.clamp(lo, hi)
}

impl Camera {
    /// Camera at the origin with collapsed bounds.
    pub fn new() -> Self {
        Self {
            position: Vector2::zero(),
            bound_min: Vector2::zero(),
            bound_max: Vector2::zero(),
        }
    }

    pub fn set_bounds(&mut self, min: Vector2, max: Vector2) {
        self.bound_min = min;
        self.bound_max = max;
    }

    /// Bounds for a room of `room_size` pixels seen through `screen`:
    /// `[0, screen.w - room.w] x [0, screen.h - room.h]`.
    pub fn reset_bounds_for_room(&mut self, room_size: Vector2, screen: ScreenSize) {
        self.set_bounds(
            Vector2::zero(),
            Vector2::new(screen.w as f32 - room_size.x, screen.h as f32 - room_size.y),
        );
    }

    /// Clamp a desired offset into the bounds. The bounds are interpreted as
    /// an interval per axis regardless of which end is larger, so rooms wider
    /// than the screen (negative `bound_max`) work.
    pub fn clamp(&self, desired: Vector2) -> Vector2 {
        Vector2::new(
            clamp_axis(desired.x, self.bound_min.x, self.bound_max.x),
            clamp_axis(desired.y, self.bound_min.y, self.bound_max.y),
        )
    }

    /// Move to `desired`, clamped.
    pub fn set_position(&mut self, desired: Vector2) {
        self.position = self.clamp(desired);
    }

    /// Re-apply the bounds to the current position.
    pub fn reclamp(&mut self) {
        self.position = self.clamp(self.position);
    }

    /// Put `target` (world space) in the middle of the screen, clamped.
    pub fn center_on(&mut self, target: Vector2, screen: ScreenSize) {
        let desired = Vector2::new(
            screen.w as f32 * 0.5 - target.x,
            screen.h as f32 * 0.5 - target.y,
        );
        self.set_position(desired);
    }

    pub fn world_to_screen(&self, world: Vector2) -> Vector2 {
        Vector2::new(world.x + self.position.x, world.y + self.position.y)
    }

    /// Visible world rectangle as `(min, max)`.
    pub fn view_rect(&self, screen: ScreenSize) -> (Vector2, Vector2) {
        let min = Vector2::new(-self.position.x, -self.position.y);
        let max = Vector2::new(min.x + screen.w as f32, min.y + screen.h as f32);
        (min, max)
    }

    /// raylib camera that applies this offset, scaled by `zoom` when the
    /// window is larger than the game resolution.
    pub fn to_camera2d(&self, zoom: f32) -> Camera2D {
        Camera2D {
            offset: Vector2::new(self.position.x * zoom, self.position.y * zoom),
            target: Vector2::zero(),
            rotation: 0.0,
            zoom,
        }
    }
}
