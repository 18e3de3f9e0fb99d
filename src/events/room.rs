//! Room entry event and the observer that keeps room-local entities in sync.
//!
//! [`RoomEnteredEvent`] is triggered when play starts and after every applied
//! room transition. [`observe_room_entered`] despawns the entities owned by
//! other rooms and spawns the entities listed by the entered room.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::roomlocal::RoomLocal;
use crate::game::spawn_room_entity;
use crate::resources::tilemap::TileMap;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomEnteredEvent {
    /// Previous room; `None` when play starts.
    pub from: Option<usize>,
    pub to: usize,
}

pub fn observe_room_entered(
    trigger: On<RoomEnteredEvent>,
    mut commands: Commands,
    tilemap: Res<TileMap>,
    locals: Query<(Entity, &RoomLocal)>,
) {
    let event = *trigger.event();

    let mut despawned = 0;
    let mut present = false;
    for (entity, local) in locals.iter() {
        if local.room == event.to {
            present = true;
        } else {
            commands.entity(entity).despawn();
            despawned += 1;
        }
    }
    debug!("Despawned {} room-local entities", despawned);

    let Some(room) = tilemap.room(event.to) else {
        return;
    };
    if !present {
        for def in room.entities() {
            spawn_room_entity(&mut commands, event.to, def, tilemap.tile_size());
        }
    }

    match (room.zone(), room.location()) {
        (Some(zone), Some(location)) => info!("Entered room {}: {} - {}", event.to, zone, location),
        (Some(name), None) | (None, Some(name)) => info!("Entered room {}: {}", event.to, name),
        (None, None) => info!("Entered room {}", event.to),
    }
}
