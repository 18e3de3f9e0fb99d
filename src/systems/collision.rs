//! Entity overlap detection.
use bevy_ecs::prelude::*;

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::events::collision::CollisionEvent;

/// Emit a [`CollisionEvent`] for each pair of overlapping boxes.
pub fn collision_detector(mut commands: Commands, query: Query<(Entity, &MapPosition, &BoxCollider)>) {
    let mut combos = query.iter_combinations();
    while let Some([(entity_a, position_a, collider_a), (entity_b, position_b, collider_b)]) =
        combos.fetch_next()
    {
        if collider_a.overlaps(position_a.pos, collider_b, position_b.pos) {
            commands.trigger(CollisionEvent {
                a: entity_a,
                b: entity_b,
            });
        }
    }
}
