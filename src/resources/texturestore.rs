//! Loaded textures keyed by string IDs.
//!
//! Owns the GPU textures (tile set atlas, sprite sheets). It must be dropped
//! before the raylib handle; `main` removes it from the world on shutdown.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Texture2D;
use rustc_hash::FxHashMap;

/// Key of the tile set atlas.
pub const TILESET_KEY: &str = "tileset";

#[derive(Resource, Default)]
pub struct TextureStore {
    pub map: FxHashMap<String, Texture2D>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, texture: Texture2D) {
        self.map.insert(key.into(), texture);
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&Texture2D> {
        self.map.get(key.as_ref())
    }

    /// Unload every texture.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
