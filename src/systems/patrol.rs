//! Patrol behavior: walk until a wall, wait, turn around.
use bevy_ecs::prelude::*;

use crate::components::intent::Intent;
use crate::components::motionstate::MotionState;
use crate::components::patrol::Patrol;
use crate::resources::worldtime::WorldTime;

pub fn patrol_intent(
    time: Res<WorldTime>,
    mut query: Query<(&mut Patrol, &mut Intent, &MotionState)>,
) {
    for (mut patrol, mut intent, motion) in query.iter_mut() {
        intent.clear();

        if patrol.timer > 0.0 {
            patrol.timer -= time.delta;
            continue;
        }

        let blocked = if patrol.going_left {
            motion.blocked_left
        } else {
            motion.blocked_right
        };
        if blocked {
            patrol.going_left = !patrol.going_left;
            patrol.timer = patrol.pause;
            continue;
        }

        intent.left = patrol.going_left;
        intent.right = !patrol.going_left;
    }
}
