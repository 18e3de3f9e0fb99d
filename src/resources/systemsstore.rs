//! Registry for state hook systems.
//!
//! One-shot systems are registered once during startup under a [`StateHook`]
//! key and later run through their [`bevy_ecs::system::SystemId`] by the game
//! state observer. This keeps the state machine unaware of what each hook
//! does.

use bevy_ecs::prelude::Resource;
use bevy_ecs::system::SystemId;
use rustc_hash::FxHashMap;

/// Lifecycle points that run a registered system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateHook {
    /// Entering [`GameStates::Setup`](crate::resources::gamestate::GameStates::Setup).
    Setup,
    /// Entering `Playing` from `Setup`.
    EnterPlay,
    /// Entering `Transitioning`: apply the pending room change.
    ApplyTransition,
    /// Entering `Quitting`.
    Quit,
}

/// Map of hooks to system IDs.
#[derive(Resource, Default)]
pub struct SystemsStore {
    pub map: FxHashMap<StateHook, SystemId>,
}

impl SystemsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        SystemsStore {
            map: FxHashMap::default(),
        }
    }

    /// Register the system run at `hook`, replacing any previous one.
    pub fn insert(&mut self, hook: StateHook, id: SystemId) {
        self.map.insert(hook, id);
    }

    pub fn get(&self, hook: StateHook) -> Option<&SystemId> {
        self.map.get(&hook)
    }
}
