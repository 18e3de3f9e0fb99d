//! Translate the keyboard state into the player's [`Intent`].
use bevy_ecs::prelude::*;

use crate::components::intent::Intent;
use crate::components::player::Player;
use crate::resources::input::InputState;

pub fn player_intent(input: Res<InputState>, mut query: Query<&mut Intent, With<Player>>) {
    for mut intent in query.iter_mut() {
        intent.left = input.move_left.active;
        intent.right = input.move_right.active;
        intent.jump_pressed = input.jump.just_pressed;
        intent.jump_held = input.jump.active;
        intent.sprint = input.sprint.active;
    }
}
