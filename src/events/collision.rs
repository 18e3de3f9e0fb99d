//! Entity overlap event and its observer.
//!
//! The collision detector emits [`CollisionEvent`] whenever the boxes of two
//! entities overlap. Tile collisions are resolved separately and never
//! produce events.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::player::Player;

/// Event fired when two entities with a BoxCollider overlap.
///
/// No ordering guarantees are provided between `a` and `b`.
#[derive(Event, Debug, Clone, Copy)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Entity,
}

/// Log contacts involving the player.
pub fn observe_player_contact(trigger: On<CollisionEvent>, players: Query<(), With<Player>>) {
    let CollisionEvent { a, b } = *trigger.event();
    if players.contains(a) || players.contains(b) {
        debug!("Player contact: {:?} <-> {:?}", a, b);
    }
}
