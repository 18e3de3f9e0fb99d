use bevy_ecs::prelude::Component;

/// Marker for the entity driven by keyboard input. The camera follows it and
/// room transitions are detected on it.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Player;
