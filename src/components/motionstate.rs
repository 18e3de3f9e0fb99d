//! Motion flags shared between modules and collision.
//!
//! Modules write the movement flags each frame; the tile collision system
//! writes `grounded` and the `blocked_*` flags after resolving the move.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionState {
    pub moving_left: bool,
    pub moving_right: bool,
    pub facing_left: bool,
    pub grounded: bool,
    pub jumping: bool,
    pub sprinting: bool,
    /// Horizontal speed cap for this frame, in pixels per second.
    pub max_speed: f32,
    pub blocked_left: bool,
    pub blocked_right: bool,
    pub blocked_top: bool,
    pub blocked_bottom: bool,
}

impl MotionState {
    pub fn facing(facing_left: bool) -> Self {
        Self {
            facing_left,
            ..Self::default()
        }
    }
}
