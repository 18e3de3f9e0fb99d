//! Input systems.
//!
//! - [`update_input_state`] reads hardware input from Raylib each frame and
//!   writes the results into [`crate::resources::input::InputState`].
//! - [`handle_global_keys`] reacts to keys that are not tied to an entity:
//!   pause, quit, the debug toggle and the debug layer switch.
use bevy_ecs::prelude::*;
use raylib::ffi::KeyboardKey;

use crate::events::switchdebug::SwitchDebugEvent;
use crate::resources::debugmode::DebugMode;
use crate::resources::gamestate::{GameState, GameStates, NextGameState};
use crate::resources::input::InputState;
use crate::resources::tilemap::TileMap;

/// Poll Raylib for keyboard input and update the `InputState` resource.
pub fn update_input_state(mut input: ResMut<InputState>, rl: NonSendMut<raylib::RaylibHandle>) {
    let is_key_down = |key: KeyboardKey| key != KeyboardKey::KEY_NULL && rl.is_key_down(key);

    for action in input.actions_mut() {
        let down = is_key_down(action.key_binding) || is_key_down(action.alt_binding);
        action.update(down);
    }
}

/// Pause, quit, debug toggle and, in debug mode, collision layer switching.
pub fn handle_global_keys(
    mut commands: Commands,
    input: Res<InputState>,
    state: Res<GameState>,
    mut next_state: ResMut<NextGameState>,
    debug_mode: Option<Res<DebugMode>>,
    mut tilemap: ResMut<TileMap>,
) {
    if input.mode_debug.just_pressed {
        commands.trigger(SwitchDebugEvent {});
    }

    if input.quit.just_pressed {
        next_state.set(GameStates::Quitting);
        return;
    }

    if input.pause.just_pressed {
        match state.get() {
            GameStates::Playing => next_state.set(GameStates::Paused),
            GameStates::Paused => next_state.set(GameStates::Playing),
            _ => {}
        }
    }

    if debug_mode.is_some() && matches!(state.get(), GameStates::Playing) {
        if input.layer_up.just_pressed {
            tilemap.set_layer(1);
        }
        if input.layer_down.just_pressed {
            tilemap.set_layer(-1);
        }
    }
}
