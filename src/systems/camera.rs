//! Camera follow.
use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::player::Player;
use crate::resources::camera::Camera;
use crate::resources::screensize::ScreenSize;

/// Center the camera on the player, clamped to the room.
pub fn camera_follow(
    mut camera: ResMut<Camera>,
    screen: Res<ScreenSize>,
    query: Query<&MapPosition, With<Player>>,
) {
    if let Ok(position) = query.single() {
        camera.center_on(position.pos, *screen);
    }
}
