//! Animation playback.
//!
//! [`animation`] switches each entity to the clip its modules requested this
//! frame, advances playback from the clip's `fps` and writes the frame offset
//! and facing into the [`Sprite`].
//!
//! # Related
//!
//! - [`crate::components::animation::Animation`] – per-entity playback state
//! - [`crate::resources::animationstore::AnimationStore`] – clip definitions

use bevy_ecs::prelude::*;

use crate::components::animation::Animation;
use crate::components::motionstate::MotionState;
use crate::components::sprite::Sprite;
use crate::resources::animationstore::{AnimationResource, AnimationStore};
use crate::resources::worldtime::WorldTime;

/// Advance `anim` by `delta` seconds of `clip`.
pub fn advance_frames(anim: &mut Animation, clip: &AnimationResource, delta: f32) {
    if clip.fps <= 0.0 || clip.frame_count == 0 {
        anim.frame_index = 0;
        return;
    }
    anim.elapsed_time += delta;

    let frame_duration = 1.0 / clip.fps;
    while anim.elapsed_time >= frame_duration {
        anim.elapsed_time -= frame_duration;
        anim.frame_index += 1;

        if anim.frame_index >= clip.frame_count {
            if clip.looped {
                anim.frame_index = 0;
            } else {
                // stay on last frame
                anim.frame_index = clip.frame_count - 1;
                anim.elapsed_time = 0.0;
                break;
            }
        }
    }
}

pub fn animation(
    mut query: Query<(&mut Animation, &mut Sprite, Option<&MotionState>)>,
    animation_store: Option<Res<AnimationStore>>,
    time: Res<WorldTime>,
) {
    let Some(animation_store) = animation_store else {
        return;
    };
    for (mut anim, mut sprite, motion) in query.iter_mut() {
        anim.apply_request();
        if let Some(motion) = motion {
            sprite.flip_h = motion.facing_left;
        }

        let Some(clip) = animation_store.get(&anim.set, anim.current) else {
            continue;
        };
        advance_frames(&mut anim, clip, time.delta);
        sprite.offset = clip.frame_offset(anim.frame_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::animation::AnimKey;
    use raylib::prelude::Vector2;
    use std::sync::Arc;

    fn clip(frame_count: usize, fps: f32, looped: bool) -> AnimationResource {
        AnimationResource {
            tex_key: Arc::from("player"),
            position: Vector2::new(0.0, 24.0),
            displacement: 16.0,
            frame_count,
            fps,
            looped,
        }
    }

    #[test]
    fn loops_back_to_first_frame() {
        let mut anim = Animation::new("player");
        let walk = clip(3, 10.0, true);
        advance_frames(&mut anim, &walk, 0.25);
        assert_eq!(anim.frame_index, 2);
        advance_frames(&mut anim, &walk, 0.1);
        assert_eq!(anim.frame_index, 0);
    }

    #[test]
    fn one_shot_holds_last_frame() {
        let mut anim = Animation::new("player");
        let jump = clip(2, 10.0, false);
        advance_frames(&mut anim, &jump, 1.0);
        assert_eq!(anim.frame_index, 1);
    }

    #[test]
    fn system_applies_request_and_offset() {
        let mut world = World::new();
        let mut store = AnimationStore::new();
        store.insert("player", AnimKey::Idle, clip(1, 1.0, true));
        store.insert("player", AnimKey::Walk, clip(4, 10.0, true));
        world.insert_resource(store);
        let mut time = WorldTime::default();
        time.advance(0.05);
        world.insert_resource(time);

        let mut anim = Animation::new("player");
        anim.request(AnimKey::Walk, AnimKey::Walk.priority());
        let motion = MotionState::facing(true);
        let entity = world
            .spawn((anim, Sprite::new("player", 16.0, 24.0), motion))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(animation);
        schedule.run(&mut world);
        schedule.run(&mut world);

        let anim = world.get::<Animation>(entity).unwrap();
        assert_eq!(anim.current, AnimKey::Walk);
        assert_eq!(anim.frame_index, 1);
        let sprite = world.get::<Sprite>(entity).unwrap();
        assert_eq!(sprite.offset, Vector2::new(16.0, 24.0));
        assert!(sprite.flip_h);
    }
}
