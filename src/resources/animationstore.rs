//! Animation resource registry.
//!
//! Clip definitions are grouped by set (one set per character sheet) and
//! keyed by [`AnimKey`] inside a set. Systems look up the clip of an entity's
//! [`Animation`](crate::components::animation::Animation) and drive playback
//! from the immutable parameters stored here.

use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use raylib::prelude::Vector2;
use rustc_hash::FxHashMap;

use crate::components::animation::AnimKey;

/// Central registry of reusable animation definitions.
#[derive(Resource, Default)]
pub struct AnimationStore {
    pub animations: FxHashMap<String, FxHashMap<AnimKey, AnimationResource>>,
}

impl AnimationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, set: impl Into<String>, key: AnimKey, clip: AnimationResource) {
        self.animations
            .entry(set.into())
            .or_default()
            .insert(key, clip);
    }

    /// Clip `key` of `set`, falling back to the set's idle clip.
    pub fn get(&self, set: &str, key: AnimKey) -> Option<&AnimationResource> {
        let clips = self.animations.get(set)?;
        clips.get(&key).or_else(|| clips.get(&AnimKey::Idle))
    }
}

/// Immutable data describing a horizontal sprite-sheet strip.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationResource {
    /// Texture key in [`crate::resources::texturestore::TextureStore`].
    pub tex_key: Arc<str>,
    /// Top-left of the first frame in the sheet.
    pub position: Vector2,
    /// Horizontal distance between frames.
    pub displacement: f32,
    /// Number of frames in the animation.
    pub frame_count: usize,
    /// Frames per second playback speed.
    pub fps: f32,
    /// Whether the animation restarts after the last frame.
    pub looped: bool,
}

impl AnimationResource {
    /// Sheet offset of `frame`.
    pub fn frame_offset(&self, frame: usize) -> Vector2 {
        Vector2::new(
            self.position.x + frame as f32 * self.displacement,
            self.position.y,
        )
    }
}
