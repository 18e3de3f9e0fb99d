//! Room exit detection and the transition hook.
//!
//! [`detect_room_exit`] runs every playing frame after tile collision. When
//! the player's center leaves the room it asks the [`TileMap`] for a matching
//! exit; on a match the transition is recorded and the game moves to
//! [`GameStates::Transitioning`]. Otherwise the player is held inside the
//! room. Nothing is checked while another state change is pending, so a
//! pause or quit requested this frame is kept; the crossing is picked up
//! once play resumes.
//!
//! [`apply_room_transition`] is registered as the
//! [`StateHook::ApplyTransition`](crate::resources::systemsstore::StateHook)
//! one-shot system. It runs when the state observer enters `Transitioning`
//! on the following tick.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::mapposition::MapPosition;
use crate::components::motionstate::MotionState;
use crate::components::player::Player;
use crate::components::rigidbody::RigidBody;
use crate::components::roomlocal::RoomLocal;
use crate::events::room::RoomEnteredEvent;
use crate::resources::camera::Camera;
use crate::resources::gamestate::{GameStates, NextGameState};
use crate::resources::screensize::ScreenSize;
use crate::resources::tilemap::{TileMap, TransitionState};

pub fn detect_room_exit(
    mut tilemap: ResMut<TileMap>,
    mut next_state: ResMut<NextGameState>,
    mut players: Query<(&mut MapPosition, &mut RigidBody), With<Player>>,
) {
    if next_state.is_pending() {
        return;
    }
    for (mut position, mut body) in players.iter_mut() {
        let Some(side) = tilemap.crossed_side(position.pos) else {
            continue;
        };
        if tilemap.state() == TransitionState::Transitioning {
            continue;
        }
        if tilemap.change_map_by_side(side, position.pos.x, position.pos.y) {
            debug!("Player left room {} through the {} side", tilemap.current_room_id(), side);
            body.frozen = true;
            next_state.set(GameStates::Transitioning);
        } else {
            position.pos = tilemap.clamp_to_room(position.pos);
        }
    }
}

/// Room-local entities cannot change rooms; keep them inside.
pub fn contain_room_locals(
    tilemap: Res<TileMap>,
    mut query: Query<&mut MapPosition, (With<RoomLocal>, Without<Player>)>,
) {
    for mut position in query.iter_mut() {
        if tilemap.crossed_side(position.pos).is_some() {
            position.pos = tilemap.clamp_to_room(position.pos);
        }
    }
}

/// Apply the pending room change to the player, the tile map and the camera.
pub fn apply_room_transition(
    mut commands: Commands,
    mut tilemap: ResMut<TileMap>,
    mut camera: ResMut<Camera>,
    screen: Res<ScreenSize>,
    mut next_state: ResMut<NextGameState>,
    mut players: Query<(&mut MapPosition, &mut MotionState, &mut RigidBody), With<Player>>,
) {
    next_state.set(GameStates::Playing);

    let Ok((mut position, mut motion, mut body)) = players.single_mut() else {
        warn!("No single player to move, dropping the room transition");
        tilemap.cancel_transition();
        return;
    };
    body.frozen = false;

    let Some(change) = tilemap.do_transition(&mut position, &mut camera, *screen) else {
        warn!("Transition state entered without a pending room change");
        return;
    };

    motion.facing_left = change.facing.is_left();
    camera.center_on(position.pos, *screen);
    commands.trigger(RoomEnteredEvent {
        from: Some(change.from),
        to: change.to,
    });
}
