//! Tile collision and position integration.
//!
//! Each entity's displacement for the frame (`velocity * delta`) is resolved
//! against the active collision layer of the [`TileMap`], one axis at a time:
//! X first, then Y using the already resolved X. For an axis, the leading
//! edge of the moved box is tested against every cell it spans on the other
//! axis. If one of them blocks, the box is snapped flush against that cell
//! and the velocity component is zeroed.
//!
//! Cells outside the grid take the type of the nearest edge cell, so a room
//! with a solid border stays closed and an open border lets entities leave
//! (which the room transition detector then handles).
//!
//! A move longer than one tile is split into equal steps of at most one tile,
//! so the leading edge never skips a cell. Each step checks only the cells
//! the new edge lands in.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::motionstate::MotionState;
use crate::components::rigidbody::RigidBody;
use crate::resources::tilemap::TileMap;
use crate::resources::worldtime::WorldTime;

/// Distance below the box probed for ground.
const GROUND_PROBE: f32 = 1.0;

/// Outcome of resolving one entity's move.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TileCollision {
    pub position: Vector2,
    pub velocity: Vector2,
    pub grounded: bool,
    pub blocked_left: bool,
    pub blocked_right: bool,
    pub blocked_top: bool,
    pub blocked_bottom: bool,
}

/// First and last cell index spanned by `[min, max)` along one axis.
fn span(min: f32, max: f32, tile_size: f32) -> (i32, i32) {
    let first = (min / tile_size).floor() as i32;
    let last = (max / tile_size).ceil() as i32 - 1;
    (first, last.max(first))
}

fn any_blocking_in_row(tilemap: &TileMap, row: i32, cols: (i32, i32)) -> bool {
    (cols.0..=cols.1).any(|col| tilemap.is_blocking(row, col))
}

fn any_blocking_in_col(tilemap: &TileMap, col: i32, rows: (i32, i32)) -> bool {
    (rows.0..=rows.1).any(|row| tilemap.is_blocking(row, col))
}

/// Number of steps of at most one tile covering `distance`.
fn step_count(distance: f32, tile_size: f32) -> u32 {
    ((distance.abs() / tile_size).ceil() as u32).max(1)
}

/// Move a centered box of half extents `half` from `position` by
/// `velocity * delta`, stopping at blocking tiles.
pub fn resolve_tile_collision(
    tilemap: &TileMap,
    position: Vector2,
    half: Vector2,
    velocity: Vector2,
    delta: f32,
) -> TileCollision {
    let ts = tilemap.tile_size();
    let mut out = TileCollision {
        position,
        velocity,
        ..TileCollision::default()
    };

    // X axis
    let dx = velocity.x * delta;
    if dx != 0.0 {
        let rows = span(position.y - half.y, position.y + half.y, ts);
        let steps = step_count(dx, ts);
        let step = dx / steps as f32;
        for _ in 0..steps {
            let x = out.position.x + step;
            out.position.x = x;
            if step > 0.0 {
                let col = ((x + half.x) / ts).ceil() as i32 - 1;
                if any_blocking_in_col(tilemap, col, rows) {
                    out.position.x = col as f32 * ts - half.x;
                    out.velocity.x = 0.0;
                    out.blocked_right = true;
                    break;
                }
            } else {
                let col = ((x - half.x) / ts).floor() as i32;
                if any_blocking_in_col(tilemap, col, rows) {
                    out.position.x = (col + 1) as f32 * ts + half.x;
                    out.velocity.x = 0.0;
                    out.blocked_left = true;
                    break;
                }
            }
        }
    }

    // Y axis, with the resolved X
    let x = out.position.x;
    let cols = span(x - half.x, x + half.x, ts);
    let dy = velocity.y * delta;
    if dy != 0.0 {
        let steps = step_count(dy, ts);
        let step = dy / steps as f32;
        for _ in 0..steps {
            let y = out.position.y + step;
            out.position.y = y;
            if step > 0.0 {
                let row = ((y + half.y) / ts).ceil() as i32 - 1;
                if any_blocking_in_row(tilemap, row, cols) {
                    out.position.y = row as f32 * ts - half.y;
                    out.velocity.y = 0.0;
                    out.blocked_bottom = true;
                    break;
                }
            } else {
                let row = ((y - half.y) / ts).floor() as i32;
                if any_blocking_in_row(tilemap, row, cols) {
                    out.position.y = (row + 1) as f32 * ts + half.y;
                    out.velocity.y = 0.0;
                    out.blocked_top = true;
                    break;
                }
            }
        }
    }

    let probe_row = ((out.position.y + half.y + GROUND_PROBE) / ts).floor() as i32;
    out.grounded = out.velocity.y >= 0.0 && any_blocking_in_row(tilemap, probe_row, cols);
    out
}

/// Integrate velocities and resolve tile collisions for every body.
pub fn tile_collision(
    tilemap: Res<TileMap>,
    time: Res<WorldTime>,
    mut query: Query<(
        &mut MapPosition,
        &BoxCollider,
        &mut RigidBody,
        &mut MotionState,
    )>,
) {
    for (mut position, collider, mut body, mut motion) in query.iter_mut() {
        if body.frozen {
            continue;
        }
        let half = Vector2::new(collider.half_width(), collider.half_height());
        let result = resolve_tile_collision(&tilemap, position.pos, half, body.velocity, time.delta);

        position.pos = result.position;
        body.velocity = result.velocity;
        motion.grounded = result.grounded;
        motion.blocked_left = result.blocked_left;
        motion.blocked_right = result.blocked_right;
        motion.blocked_top = result.blocked_top;
        motion.blocked_bottom = result.blocked_bottom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::gameconfig::PlayerTuning;
    use crate::resources::layer::Layer;
    use crate::resources::room::Room;
    use crate::resources::tileset::{Tile, TileSet, TileType};
    use crate::resources::worldtime::MAX_DELTA;

    const TS: f32 = 16.0;

    fn tilemap(rows: Vec<Vec<u32>>) -> TileMap {
        let tileset = TileSet::from_tiles([(
            1,
            Tile::new(Vector2::zero(), Vector2::new(TS, TS), TileType::Blocking),
        )])
        .unwrap();
        let layer = Layer::from_rows(rows).unwrap();
        let room = Room::new(0, [None, Some(layer), None]).unwrap();
        TileMap::new(TS, tileset, vec![room], 0, 1).unwrap()
    }

    fn ring() -> TileMap {
        tilemap(vec![vec![1, 1, 1], vec![1, 0, 1], vec![1, 1, 1]])
    }

    fn overlaps_blocking(tm: &TileMap, pos: Vector2, half: Vector2) -> bool {
        let rows = span(pos.y - half.y, pos.y + half.y, TS);
        let cols = span(pos.x - half.x, pos.x + half.x, TS);
        (rows.0..=rows.1).any(|row| any_blocking_in_row(tm, row, cols))
    }

    #[test]
    fn moving_up_in_ring_stops_at_ceiling() {
        let tm = ring();
        let half = Vector2::new(4.0, 4.0);
        let r = resolve_tile_collision(
            &tm,
            Vector2::new(24.0, 24.0),
            half,
            Vector2::new(0.0, -200.0),
            0.1,
        );
        assert_eq!(r.velocity.y, 0.0);
        assert_eq!(r.position.y, 16.0 + 4.0);
        assert_eq!(r.position.x, 24.0);
        assert!(r.blocked_top);
        assert!(!r.blocked_left && !r.blocked_right && !r.blocked_bottom);
    }

    #[test]
    fn x_is_unaffected_by_vertical_block() {
        let tm = ring();
        let r = resolve_tile_collision(
            &tm,
            Vector2::new(24.0, 24.0),
            Vector2::new(2.0, 4.0),
            Vector2::new(30.0, -200.0),
            0.1,
        );
        assert_eq!(r.position.x, 27.0);
        assert_eq!(r.velocity.x, 30.0);
        assert_eq!(r.velocity.y, 0.0);
    }

    #[test]
    fn walls_snap_flush() {
        let tm = ring();
        let half = Vector2::new(4.0, 4.0);
        let right = resolve_tile_collision(&tm, Vector2::new(24.0, 24.0), half, Vector2::new(100.0, 0.0), 0.1);
        assert_eq!(right.position.x, 32.0 - 4.0);
        assert!(right.blocked_right);
        let left = resolve_tile_collision(&tm, Vector2::new(24.0, 24.0), half, Vector2::new(-100.0, 0.0), 0.1);
        assert_eq!(left.position.x, 16.0 + 4.0);
        assert!(left.blocked_left);
    }

    #[test]
    fn landing_sets_grounded() {
        let tm = tilemap(vec![vec![0, 0, 0], vec![0, 0, 0], vec![1, 1, 1]]);
        let half = Vector2::new(4.0, 6.0);
        let r = resolve_tile_collision(&tm, Vector2::new(24.0, 20.0), half, Vector2::new(0.0, 150.0), 0.1);
        assert_eq!(r.position.y, 32.0 - 6.0);
        assert!(r.blocked_bottom);
        assert!(r.grounded);

        // standing still on the floor stays grounded
        let still = resolve_tile_collision(&tm, r.position, half, Vector2::zero(), 0.1);
        assert!(still.grounded);
        assert_eq!(still.position, r.position);

        // rising is never grounded
        let rising = resolve_tile_collision(&tm, r.position, half, Vector2::new(0.0, -10.0), 0.1);
        assert!(!rising.grounded);
    }

    #[test]
    fn touching_a_wall_does_not_block_sliding() {
        // floor and a wall on the right; box resting against both
        let tm = tilemap(vec![vec![0, 0, 1], vec![0, 0, 1], vec![1, 1, 1]]);
        let half = Vector2::new(4.0, 4.0);
        let pos = Vector2::new(32.0 - 4.0, 32.0 - 4.0);
        let r = resolve_tile_collision(&tm, pos, half, Vector2::new(-50.0, 0.0), 0.1);
        assert_eq!(r.position.x, pos.x - 5.0);
        assert!(!r.blocked_left);
        assert!(r.grounded);
    }

    #[test]
    fn empty_tiles_never_block() {
        let tm = tilemap(vec![vec![0; 4]; 4]);
        let r = resolve_tile_collision(
            &tm,
            Vector2::new(32.0, 32.0),
            Vector2::new(4.0, 4.0),
            Vector2::new(120.0, -120.0),
            0.1,
        );
        assert_eq!(r.position, Vector2::new(44.0, 20.0));
        assert!(!r.grounded);
    }

    #[test]
    fn single_axis_moves_never_end_inside_blocks() {
        let tm = tilemap(vec![
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 0, 1],
            vec![1, 0, 1, 0, 0, 1],
            vec![1, 0, 0, 0, 1, 1],
            vec![1, 0, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1, 1],
        ]);
        let half = Vector2::new(3.0, 5.0);
        let speeds = [-150.0, -90.0, -31.0, -7.5, 7.5, 31.0, 90.0, 150.0];

        let mut checked = 0;
        for yi in 0..96 {
            for xi in 0..96 {
                let pos = Vector2::new(xi as f32, yi as f32);
                if overlaps_blocking(&tm, pos, half) {
                    continue;
                }
                for speed in speeds {
                    for velocity in [Vector2::new(speed, 0.0), Vector2::new(0.0, speed)] {
                        let r = resolve_tile_collision(&tm, pos, half, velocity, 0.1);
                        assert!(
                            !overlaps_blocking(&tm, r.position, half),
                            "{:?} moving {:?} ended at {:?}",
                            pos,
                            velocity,
                            r.position
                        );
                        checked += 1;
                    }
                }
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn capped_frame_at_max_fall_speed_lands_on_one_tile_platform() {
        let tuning = PlayerTuning::default();
        // one-tile platform in row 2, open space below it
        let mut rows = vec![vec![0, 0, 0]; 8];
        rows[2] = vec![1, 1, 1];
        let tm = tilemap(rows);
        let half = Vector2::new(tuning.collider_width / 2.0, tuning.collider_height / 2.0);
        let start = Vector2::new(24.0, 32.0 - half.y - 2.0);
        let velocity = Vector2::new(0.0, tuning.max_fall_speed);
        assert!(tuning.max_fall_speed * MAX_DELTA > TS);

        let r = resolve_tile_collision(&tm, start, half, velocity, MAX_DELTA);
        assert_eq!(r.position.y, 32.0 - half.y);
        assert_eq!(r.velocity.y, 0.0);
        assert!(r.blocked_bottom);
        assert!(r.grounded);
    }

    #[test]
    fn long_moves_stop_at_the_first_wall() {
        let tm = tilemap(vec![vec![0, 0, 1, 0, 0, 1, 0, 0]; 3]);
        let half = Vector2::new(4.0, 4.0);
        let r = resolve_tile_collision(&tm, Vector2::new(8.0, 24.0), half, Vector2::new(900.0, 0.0), 0.1);
        assert_eq!(r.position.x, 32.0 - 4.0);
        assert!(r.blocked_right);

        let left = resolve_tile_collision(&tm, Vector2::new(56.0, 24.0), half, Vector2::new(-400.0, 0.0), 0.1);
        assert_eq!(left.position.x, 48.0 + 4.0);
        assert!(left.blocked_left);
    }

    #[test]
    fn long_moves_through_open_space_are_exact() {
        let tm = tilemap(vec![vec![0; 8]; 8]);
        let half = Vector2::new(4.0, 4.0);
        let r = resolve_tile_collision(&tm, Vector2::new(8.0, 8.0), half, Vector2::new(0.0, 500.0), 0.1);
        assert!((r.position.y - 58.0).abs() < 1e-3);
        assert!(!r.blocked_bottom);
    }

    #[test]
    fn open_border_lets_entities_leave() {
        let tm = tilemap(vec![vec![0, 0], vec![1, 1]]);
        let r = resolve_tile_collision(
            &tm,
            Vector2::new(28.0, 8.0),
            Vector2::new(3.0, 3.0),
            Vector2::new(100.0, 0.0),
            0.1,
        );
        assert_eq!(r.position.x, 38.0);
        assert!(tm.crossed_side(r.position).is_some());
    }
}
