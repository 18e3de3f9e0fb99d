use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// Sprite is identified by a texture key, its size in world units and an
/// offset into the sprite sheet that selects the current frame.
///
/// The sprite is drawn centered on the entity's
/// [`MapPosition`](super::mapposition::MapPosition). Its size is the visual
/// size and is independent from the [`BoxCollider`](super::boxcollider::BoxCollider).
#[derive(Component, Clone, Debug)]
pub struct Sprite {
    pub tex_key: String,
    pub width: f32,
    pub height: f32,
    pub offset: Vector2,
    pub flip_h: bool,
}

impl Sprite {
    pub fn new(tex_key: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            tex_key: tex_key.into(),
            width,
            height,
            offset: Vector2::zero(),
            flip_h: false,
        }
    }

    /// Top-left corner when centered on `position`.
    pub fn top_left(&self, position: Vector2) -> Vector2 {
        Vector2::new(position.x - self.width * 0.5, position.y - self.height * 0.5)
    }
}
