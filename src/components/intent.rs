//! Per-frame desired actions of an entity.
//!
//! Written by the player controller (from input) or by the patrol system and
//! read by the entity's modules.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intent {
    pub left: bool,
    pub right: bool,
    /// Jump went down this frame.
    pub jump_pressed: bool,
    /// Jump is held.
    pub jump_held: bool,
    pub sprint: bool,
}

impl Intent {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
