//! Game state transition event and observer.
//!
//! Systems request a change to the high-level [`GameStates`] by updating
//! [`NextGameState`]. Emitting a [`GameStateChangedEvent`] then triggers the
//! observer in this module, which applies the transition to [`GameState`]
//! and runs the matching [`StateHook`] registered in
//! [`crate::resources::systemsstore::SystemsStore`].
//!
//! Room transitions use this path: the detector requests
//! [`GameStates::Transitioning`], the observer runs
//! [`StateHook::ApplyTransition`] on the next tick, and that hook requests
//! [`GameStates::Playing`] again.
use crate::resources::gamestate::NextGameStates::{Pending, Unchanged};
use crate::resources::gamestate::{GameState, GameStates, NextGameState};
use crate::resources::systemsstore::{StateHook, SystemsStore};
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, error, info, warn};

/// Event used to indicate that a pending game state transition should be
/// applied.
///
/// Emitting this event causes [`observe_gamestate_change_event`] to read
/// [`NextGameState`]. If it contains [`Pending`], the observer updates the
/// authoritative [`GameState`], runs the enter hook and clears the pending
/// value; if it is [`Unchanged`], nothing happens.
#[derive(Event, Debug, Clone, Copy)]
pub struct GameStateChangedEvent {}

/// Observer that applies a pending game state transition.
///
/// Contract
/// - Reads the intention from [`NextGameState`].
/// - If pending, copies the new value into [`GameState`], resets
///   [`NextGameState`] to [`Unchanged`] and runs the hook for the new state.
/// - If any required resource is missing, logs a diagnostic and returns.
pub fn observe_gamestate_change_event(
    _trigger: On<GameStateChangedEvent>,
    mut commands: Commands,
    mut next_game_state: Option<ResMut<NextGameState>>,
    mut game_state: Option<ResMut<GameState>>,
    systems_store: Res<SystemsStore>,
) {
    debug!("GameStateChangedEvent triggered");

    if let (Some(next_game_state), Some(game_state)) =
        (next_game_state.as_deref_mut(), game_state.as_deref_mut())
    {
        let next_state_value = next_game_state.get().clone();
        match next_state_value {
            Pending(new_state) => {
                let old_state = game_state.get().clone();
                if old_state == new_state {
                    debug!("Already in {:?}", new_state);
                    next_game_state.reset();
                    return;
                }
                info!("Transitioning from {:?} to {:?}", old_state, new_state);
                game_state.set(new_state.clone());
                next_game_state.reset();
                on_state_enter(&old_state, &new_state, &mut commands, &systems_store);
            }
            Unchanged => {
                debug!("No state change pending.");
            }
        }
    } else {
        warn!(
            "One or more resources missing in observe_gamestate_change_event. next_state: {:?}, game_state: {:?}",
            next_game_state.is_some(),
            game_state.is_some()
        );
    }
}

/// Which hook, if any, runs when moving from `old` to `new`.
pub fn hook_for(old: &GameStates, new: &GameStates) -> Option<StateHook> {
    match new {
        GameStates::None => None,
        GameStates::Setup => Some(StateHook::Setup),
        // resuming from a pause or a room change keeps the world as it is
        GameStates::Playing if matches!(old, GameStates::Setup) => Some(StateHook::EnterPlay),
        GameStates::Playing => None,
        GameStates::Transitioning => Some(StateHook::ApplyTransition),
        GameStates::Paused => None,
        GameStates::Quitting => Some(StateHook::Quit),
    }
}

fn on_state_enter(
    old: &GameStates,
    new: &GameStates,
    commands: &mut Commands,
    systems_store: &SystemsStore,
) {
    let Some(hook) = hook_for(old, new) else {
        debug!("Entered {:?} state", new);
        return;
    };
    match systems_store.get(hook) {
        Some(id) => commands.run_system(*id),
        None => error!("{:?} hook not registered in SystemsStore", hook),
    }
}
