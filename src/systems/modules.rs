//! Run each entity's module chain.
use bevy_ecs::prelude::*;

use crate::components::animation::Animation;
use crate::components::intent::Intent;
use crate::components::modules::{ModuleChain, ModuleContext};
use crate::components::motionstate::MotionState;
use crate::components::rigidbody::RigidBody;
use crate::resources::worldtime::WorldTime;

/// Reset the animation request, then run the modules in order. Frozen
/// bodies are skipped.
pub fn run_modules(
    time: Res<WorldTime>,
    mut query: Query<(
        &mut ModuleChain,
        &Intent,
        &mut RigidBody,
        &mut MotionState,
        Option<&mut Animation>,
    )>,
) {
    for (mut chain, intent, mut body, mut motion, animation) in query.iter_mut() {
        if body.frozen {
            continue;
        }
        let mut animation = animation;
        if let Some(animation) = animation.as_deref_mut() {
            animation.reset_request();
        }

        let mut ctx = ModuleContext {
            delta: time.delta,
            intent,
            velocity: &mut body.velocity,
            motion: &mut motion,
            animation: animation.as_deref_mut(),
        };
        chain.update(&mut ctx);
    }
}
