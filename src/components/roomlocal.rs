//! Room ownership marker.
//!
//! Entities spawned from a room's entity list carry [`RoomLocal`] with that
//! room's id. They are despawned when the room is left and spawned again when
//! it is re-entered. Entities without the marker (the player) persist.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomLocal {
    pub room: usize,
}
