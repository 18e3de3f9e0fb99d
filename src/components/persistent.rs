//! Persistent entity marker component.
//!
//! Observers and registered one-shot systems live in the world as entities.
//! They carry [`Persistent`] so teardown code can tell them apart from game
//! entities.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug)]
pub struct Persistent;
