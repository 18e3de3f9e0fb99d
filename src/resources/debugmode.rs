//! Debug toggle resource.
//!
//! While [`DebugMode`] is present the renderer outlines colliders and prints
//! the room, layer and player position, and the layer keys move the active
//! collision layer. F11 inserts or removes it through
//! [`SwitchDebugEvent`](crate::events::switchdebug::SwitchDebugEvent).

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct DebugMode {}
