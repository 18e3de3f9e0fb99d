//! Room manager resource.
//!
//! [`TileMap`] owns every loaded [`Room`], tracks which room and which layer
//! are active, answers tile collision queries against the active collision
//! layer, and sequences room transitions:
//!
//! 1. [`TileMap::crossed_side`] tells whether a position left the room.
//! 2. [`TileMap::change_map_by_side`] looks up an exit interval on that side
//!    and records a [`PendingTransition`] (state becomes
//!    [`TransitionState::Transitioning`]).
//! 3. On a later tick the game-state controller calls
//!    [`TileMap::do_transition`], which moves the traveler, switches rooms and
//!    resets the camera bounds in one step.
//!
//! Rooms are validated once in [`TileMap::new`]; every exit target and arrival
//! point is known to exist afterwards.

use std::borrow::Cow;
use std::ops::Range;

use bevy_ecs::prelude::Resource;
use log::{debug, info, warn};
use raylib::prelude::Vector2;

use crate::components::mapposition::MapPosition;
use crate::resources::camera::Camera;
use crate::resources::layer::Layer;
use crate::resources::levelloader::LevelLoadError;
use crate::resources::room::{Exit, Facing, LAYER_COUNT, Room, Side};
use crate::resources::screensize::ScreenSize;
use crate::resources::tileset::{TileSet, TileType};

/// Layer used for collisions unless the level data says otherwise.
pub const DEFAULT_COLLISION_LAYER: usize = 1;

/// A transition that has been detected but not applied yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingTransition {
    pub target_room: usize,
    /// Arrival position in pixels.
    pub arrival: Vector2,
    pub facing: Facing,
}

/// Result of an applied transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomChange {
    pub from: usize,
    pub to: usize,
    pub position: Vector2,
    pub facing: Facing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    /// Normal play in the current room.
    Active,
    /// A target room is recorded and waits for [`TileMap::do_transition`].
    Transitioning,
}

#[derive(Resource, Debug, Clone)]
pub struct TileMap {
    tile_size: f32,
    tileset: TileSet,
    rooms: Vec<Room>,
    current_room: usize,
    current_layer: usize,
    num_rows: usize,
    num_cols: usize,
    size_x: f32,
    size_y: f32,
    pending: Option<PendingTransition>,
}

impl TileMap {
    /// Validate the rooms against each other and the tile set and build the
    /// manager with `start_room` active.
    pub fn new(
        tile_size: f32,
        tileset: TileSet,
        rooms: Vec<Room>,
        start_room: usize,
        collision_layer: usize,
    ) -> Result<Self, LevelLoadError> {
        if !(tile_size > 0.0) {
            return Err(LevelLoadError::BadTileSize);
        }
        if rooms.is_empty() {
            return Err(LevelLoadError::NoRooms);
        }
        if collision_layer >= LAYER_COUNT {
            return Err(LevelLoadError::BadCollisionLayer(collision_layer));
        }
        if start_room >= rooms.len() {
            return Err(LevelLoadError::BadStart {
                room: start_room,
                spawn: 0,
            });
        }

        for (index, room) in rooms.iter().enumerate() {
            if room.id() != index {
                return Err(LevelLoadError::RoomIdMismatch { index, id: room.id() });
            }
            validate_tiles(room, &tileset)?;
            validate_exits(room, &rooms)?;
        }

        let mut tilemap = Self {
            tile_size,
            tileset,
            rooms,
            current_room: start_room,
            current_layer: collision_layer,
            num_rows: 0,
            num_cols: 0,
            size_x: 0.0,
            size_y: 0.0,
            pending: None,
        };
        tilemap.load_dimensions();
        info!(
            "TileMap ready: {} rooms, starting in room {}",
            tilemap.rooms.len(),
            start_room
        );
        Ok(tilemap)
    }

    fn load_dimensions(&mut self) {
        let room = &self.rooms[self.current_room];
        self.num_cols = room.width();
        self.num_rows = room.height();
        self.size_x = self.num_cols as f32 * self.tile_size;
        self.size_y = self.num_rows as f32 * self.tile_size;
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn tileset(&self) -> &TileSet {
        &self.tileset
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, id: usize) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn current_room_id(&self) -> usize {
        self.current_room
    }

    pub fn current_room(&self) -> &Room {
        &self.rooms[self.current_room]
    }

    pub fn current_layer(&self) -> usize {
        self.current_layer
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Room width in pixels.
    pub fn size_x(&self) -> f32 {
        self.size_x
    }

    /// Room height in pixels.
    pub fn size_y(&self) -> f32 {
        self.size_y
    }

    pub fn size(&self) -> Vector2 {
        Vector2::new(self.size_x, self.size_y)
    }

    pub fn pending(&self) -> Option<&PendingTransition> {
        self.pending.as_ref()
    }

    pub fn state(&self) -> TransitionState {
        if self.pending.is_some() {
            TransitionState::Transitioning
        } else {
            TransitionState::Active
        }
    }

    /// Grid of a layer of the active room; empty grid if the layer is missing.
    pub fn get_map(&self, layer: usize) -> Cow<'_, Layer> {
        self.current_room().get_map(layer)
    }

    /// Tile type at a cell of the active collision layer.
    ///
    /// The cell must be inside the grid; callers clamp with
    /// [`TileMap::clamp_cell`] first. Debug builds assert, release builds
    /// clamp.
    pub fn get_type(&self, row: usize, col: usize) -> TileType {
        debug_assert!(
            row < self.num_rows && col < self.num_cols,
            "cell ({row}, {col}) outside {}x{} room",
            self.num_rows,
            self.num_cols
        );
        let row = row.min(self.num_rows - 1);
        let col = col.min(self.num_cols - 1);
        let id = self
            .current_room()
            .layer(self.current_layer)
            .map(|layer| layer.get(row, col))
            .unwrap_or(0);
        self.tileset.tile_type(id)
    }

    /// Clamp a possibly out-of-grid cell to the nearest valid one.
    pub fn clamp_cell(&self, row: i32, col: i32) -> (usize, usize) {
        let row = row.clamp(0, self.num_rows as i32 - 1) as usize;
        let col = col.clamp(0, self.num_cols as i32 - 1) as usize;
        (row, col)
    }

    /// Whether a cell blocks movement. Cells outside the grid take the type
    /// of the nearest edge cell.
    pub fn is_blocking(&self, row: i32, col: i32) -> bool {
        let (row, col) = self.clamp_cell(row, col);
        self.get_type(row, col).is_blocking()
    }

    /// Side of the active room whose boundary `pos` lies beyond, if any.
    pub fn crossed_side(&self, pos: Vector2) -> Option<Side> {
        if pos.y < 0.0 {
            Some(Side::Top)
        } else if pos.x > self.size_x {
            Some(Side::Right)
        } else if pos.y > self.size_y {
            Some(Side::Bottom)
        } else if pos.x < 0.0 {
            Some(Side::Left)
        } else {
            None
        }
    }

    /// Keep a position inside the room extent.
    pub fn clamp_to_room(&self, pos: Vector2) -> Vector2 {
        Vector2::new(pos.x.clamp(0.0, self.size_x), pos.y.clamp(0.0, self.size_y))
    }

    /// Exit of the active room reached by crossing `side` at world position
    /// (`x`, `y`). `None` when no interval matches.
    pub fn is_map(&self, side: Side, x: f32, y: f32) -> Option<Exit> {
        let col = x / self.tile_size;
        let row = y / self.tile_size;
        self.current_room().find_exit(side, col, row).copied()
    }

    /// Schedule a transition if crossing `side` at (`x`, `y`) leads somewhere.
    ///
    /// Returns `false` when no exit matches or a transition is already
    /// pending.
    pub fn change_map_by_side(&mut self, side: Side, x: f32, y: f32) -> bool {
        if self.pending.is_some() {
            return false;
        }
        match self.is_map(side, x, y) {
            Some(exit) => {
                debug!(
                    "Room {} {} exit matched at ({:.1}, {:.1})",
                    self.current_room, side, x, y
                );
                self.change_map(exit.target_room, exit.arrival_point);
                true
            }
            None => false,
        }
    }

    /// Record a transition to spawn point `point` of room `target`.
    ///
    /// # Panics
    /// If the room or spawn point does not exist. Exits are validated at load
    /// time, so this only happens on a direct call with bad ids.
    pub fn change_map(&mut self, target: usize, point: usize) {
        let spawn = self.rooms[target]
            .spawn(point)
            .copied()
            .unwrap_or_else(|| panic!("room {target} has no spawn point {point}"));
        self.pending = Some(PendingTransition {
            target_room: target,
            arrival: Vector2::new(spawn.x * self.tile_size, spawn.y * self.tile_size),
            facing: spawn.facing,
        });
    }

    /// Apply the pending transition: move `traveler` to the arrival point,
    /// switch the active room, reset the camera bounds to the new room and
    /// re-clamp the camera. Returns `None` when nothing was pending.
    pub fn do_transition(
        &mut self,
        traveler: &mut MapPosition,
        camera: &mut Camera,
        screen: ScreenSize,
    ) -> Option<RoomChange> {
        let pending = self.pending.take()?;
        let from = self.current_room;

        traveler.pos = pending.arrival;
        self.current_room = pending.target_room;
        self.load_dimensions();

        camera.reset_bounds_for_room(self.size(), screen);
        camera.reclamp();

        info!("New room, id: {}", self.current_room);
        Some(RoomChange {
            from,
            to: self.current_room,
            position: pending.arrival,
            facing: pending.facing,
        })
    }

    /// Drop a pending transition without applying it.
    pub fn cancel_transition(&mut self) -> Option<PendingTransition> {
        self.pending.take()
    }

    /// Move the collision layer by `delta`. Ignored if the result is not a
    /// valid layer index.
    pub fn set_layer(&mut self, delta: i32) -> bool {
        let target = self.current_layer as i32 + delta;
        if (0..LAYER_COUNT as i32).contains(&target) {
            self.current_layer = target as usize;
            info!("Change the current layer to {}", self.current_layer);
            true
        } else {
            warn!(
                "Ignoring layer change to {} (valid: 0..{})",
                target, LAYER_COUNT
            );
            false
        }
    }

    /// World position and facing of a spawn point, in pixels.
    pub fn spawn_position(&self, room: usize, point: usize) -> Option<(Vector2, Facing)> {
        let spawn = self.rooms.get(room)?.spawn(point)?;
        Some((
            Vector2::new(spawn.x * self.tile_size, spawn.y * self.tile_size),
            spawn.facing,
        ))
    }

    /// Rows and columns of the active room visible through `camera`, with a
    /// margin of two cells.
    pub fn visible_cells(&self, camera: &Camera, screen: ScreenSize) -> (Range<usize>, Range<usize>) {
        let row_offset = ((-camera.position.y / self.tile_size).floor().max(0.0)) as usize;
        let col_offset = ((-camera.position.x / self.tile_size).floor().max(0.0)) as usize;
        let rows_to_draw = (screen.h as f32 / self.tile_size) as usize + 2;
        let cols_to_draw = (screen.w as f32 / self.tile_size) as usize + 2;

        let max_row = (row_offset + rows_to_draw).min(self.num_rows);
        let max_col = (col_offset + cols_to_draw).min(self.num_cols);
        (row_offset.min(max_row)..max_row, col_offset.min(max_col)..max_col)
    }
}

fn validate_tiles(room: &Room, tileset: &TileSet) -> Result<(), LevelLoadError> {
    for layer_index in 0..LAYER_COUNT {
        let Some(layer) = room.layer(layer_index) else {
            continue;
        };
        if let Some((row, col, id)) = layer.iter().find(|(_, _, id)| !tileset.contains(*id)) {
            return Err(LevelLoadError::UnknownTile {
                room: room.id(),
                layer: layer_index,
                row,
                col,
                id,
            });
        }
    }
    Ok(())
}

fn validate_exits(room: &Room, rooms: &[Room]) -> Result<(), LevelLoadError> {
    for side in Side::ALL {
        for exit in room.exit_points(side) {
            if !(exit.begin < exit.end) {
                return Err(LevelLoadError::EmptyExitInterval {
                    room: room.id(),
                    side,
                    begin: exit.begin,
                    end: exit.end,
                });
            }
            let Some(target) = rooms.get(exit.target_room) else {
                return Err(LevelLoadError::BadExitTarget {
                    room: room.id(),
                    side,
                    target: exit.target_room,
                    count: rooms.len(),
                });
            };
            if target.spawn(exit.arrival_point).is_none() {
                return Err(LevelLoadError::BadArrivalPoint {
                    room: room.id(),
                    side,
                    target: exit.target_room,
                    point: exit.arrival_point,
                    count: target.spawns().len(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::room::SpawnPoint;
    use crate::resources::tileset::Tile;

    const TS: f32 = 16.0;
    const SCREEN: ScreenSize = ScreenSize { w: 160, h: 128 };

    fn tileset() -> TileSet {
        TileSet::from_tiles([
            (
                1,
                Tile::new(Vector2::new(0.0, 0.0), Vector2::new(16.0, 16.0), TileType::Blocking),
            ),
            (
                2,
                Tile::new(Vector2::new(16.0, 0.0), Vector2::new(32.0, 16.0), TileType::Passable),
            ),
        ])
        .unwrap()
    }

    fn room(id: usize, w: usize, h: usize) -> Room {
        Room::new(id, [None, Some(Layer::empty(w, h)), None])
            .unwrap()
            .with_spawn(SpawnPoint::new(2.0, 3.0, Facing::Left))
    }

    /// Four rooms; room 0 has one bottom exit [5, 10) -> room 3, point 0.
    fn world() -> TileMap {
        let rooms = vec![
            room(0, 20, 12).with_exit(Side::Bottom, Exit::new(3, 0, 5.0, 10.0)),
            room(1, 10, 10),
            room(2, 10, 10),
            room(3, 40, 30).with_spawn(SpawnPoint::new(6.5, 1.0, Facing::Right)),
        ];
        TileMap::new(TS, tileset(), rooms, 0, DEFAULT_COLLISION_LAYER).unwrap()
    }

    #[test]
    fn dimensions_follow_current_room() {
        let tm = world();
        assert_eq!(tm.num_cols(), 20);
        assert_eq!(tm.num_rows(), 12);
        assert_eq!(tm.size_x(), 320.0);
        assert_eq!(tm.size_y(), 192.0);
        assert_eq!(tm.state(), TransitionState::Active);
    }

    #[test]
    fn bottom_exit_scenario() {
        let mut tm = world();
        let below = tm.size_y() + 1.0;

        // x = 4 tiles: outside the interval
        assert!(tm.is_map(Side::Bottom, 4.0 * TS, below).is_none());
        assert!(!tm.change_map_by_side(Side::Bottom, 4.0 * TS, below));
        assert_eq!(tm.state(), TransitionState::Active);

        // x = 7 tiles: inside
        let exit = tm.is_map(Side::Bottom, 7.0 * TS, below).unwrap();
        assert_eq!((exit.target_room, exit.arrival_point), (3, 0));
        assert!(tm.change_map_by_side(Side::Bottom, 7.0 * TS, below));
        assert_eq!(tm.state(), TransitionState::Transitioning);
        assert_eq!(tm.pending().unwrap().target_room, 3);
        // nothing changes until the transition is applied
        assert_eq!(tm.current_room_id(), 0);
    }

    #[test]
    fn exit_bounds_in_world_units() {
        let tm = world();
        let y = tm.size_y() + 1.0;
        assert!(tm.is_map(Side::Bottom, 5.0 * TS, y).is_none());
        assert!(tm.is_map(Side::Bottom, 5.0 * TS + 0.01, y).is_some());
        assert!(tm.is_map(Side::Bottom, 10.0 * TS, y).is_none());
    }

    #[test]
    fn transition_round_trip() {
        let mut tm = world();
        let mut traveler = MapPosition::new(7.0 * TS, tm.size_y() + 2.0);
        let mut camera = Camera::new();

        assert!(tm.change_map_by_side(Side::Bottom, traveler.pos.x, traveler.pos.y));
        let change = tm
            .do_transition(&mut traveler, &mut camera, SCREEN)
            .unwrap();

        assert_eq!(change.from, 0);
        assert_eq!(change.to, 3);
        assert_eq!(tm.current_room_id(), 3);
        assert_eq!(traveler.pos, Vector2::new(2.0 * TS, 3.0 * TS));
        assert_eq!(change.facing, Facing::Left);
        assert_eq!(tm.num_cols(), 40);
        assert_eq!(tm.num_rows(), 30);
        assert_eq!(camera.bound_min, Vector2::new(0.0, 0.0));
        assert_eq!(
            camera.bound_max,
            Vector2::new(SCREEN.w as f32 - 40.0 * TS, SCREEN.h as f32 - 30.0 * TS)
        );
        assert_eq!(tm.state(), TransitionState::Active);

        // applying again is a no-op
        assert!(tm.do_transition(&mut traveler, &mut camera, SCREEN).is_none());
    }

    #[test]
    fn crossing_is_ignored_while_pending() {
        let mut tm = world();
        let y = tm.size_y() + 1.0;
        assert!(tm.change_map_by_side(Side::Bottom, 7.0 * TS, y));
        assert!(!tm.change_map_by_side(Side::Bottom, 8.0 * TS, y));
        assert!(tm.cancel_transition().is_some());
        assert_eq!(tm.state(), TransitionState::Active);
    }

    #[test]
    fn crossed_side_reports_boundaries() {
        let tm = world();
        assert_eq!(tm.crossed_side(Vector2::new(10.0, -1.0)), Some(Side::Top));
        assert_eq!(tm.crossed_side(Vector2::new(321.0, 10.0)), Some(Side::Right));
        assert_eq!(tm.crossed_side(Vector2::new(10.0, 193.0)), Some(Side::Bottom));
        assert_eq!(tm.crossed_side(Vector2::new(-0.5, 10.0)), Some(Side::Left));
        assert_eq!(tm.crossed_side(Vector2::new(320.0, 192.0)), None);
    }

    #[test]
    fn empty_tile_never_blocks() {
        let mut rows = vec![vec![0u32; 3]; 3];
        rows[0][0] = 1;
        let layer = Layer::from_rows(rows).unwrap();
        let room = Room::new(0, [None, Some(layer), None]).unwrap();
        let tm = TileMap::new(TS, tileset(), vec![room], 0, 1).unwrap();
        assert_eq!(tm.get_type(0, 0), TileType::Blocking);
        for (row, col) in [(0, 1), (1, 1), (2, 2)] {
            assert_eq!(tm.get_type(row, col), TileType::Passable);
        }
        // out of grid cells take the nearest edge cell
        assert!(tm.is_blocking(-3, -3));
        assert!(!tm.is_blocking(9, 9));
    }

    #[test]
    fn missing_collision_layer_is_empty() {
        let room = Room::new(0, [Some(Layer::empty(4, 4)), None, None]).unwrap();
        let tm = TileMap::new(TS, tileset(), vec![room], 0, 1).unwrap();
        assert_eq!(tm.get_type(1, 1), TileType::Passable);
        assert_eq!(tm.get_map(1).width(), 4);
    }

    #[test]
    fn set_layer_stays_in_range() {
        let mut tm = world();
        assert_eq!(tm.current_layer(), 1);
        assert!(tm.set_layer(1));
        assert_eq!(tm.current_layer(), 2);
        assert!(!tm.set_layer(1));
        assert_eq!(tm.current_layer(), 2);
        assert!(tm.set_layer(-2));
        assert_eq!(tm.current_layer(), 0);
        assert!(!tm.set_layer(-1));
    }

    #[test]
    fn visible_cells_are_clamped_to_grid() {
        let tm = world();
        let mut camera = Camera::new();
        let (rows, cols) = tm.visible_cells(&camera, SCREEN);
        assert_eq!(rows, 0..10);
        assert_eq!(cols, 0..12);

        camera.position = Vector2::new(-200.0, -100.0);
        let (rows, cols) = tm.visible_cells(&camera, SCREEN);
        assert_eq!(rows, 6..12);
        assert_eq!(cols, 12..20);
    }

    #[test]
    fn validation_rejects_bad_exit_target() {
        let rooms = vec![room(0, 4, 4).with_exit(Side::Left, Exit::new(5, 0, 0.0, 2.0))];
        let err = TileMap::new(TS, tileset(), rooms, 0, 1).unwrap_err();
        assert!(matches!(
            err,
            LevelLoadError::BadExitTarget { target: 5, count: 1, .. }
        ));
    }

    #[test]
    fn validation_rejects_bad_arrival_point() {
        let rooms = vec![
            room(0, 4, 4).with_exit(Side::Right, Exit::new(1, 3, 0.0, 2.0)),
            room(1, 4, 4),
        ];
        let err = TileMap::new(TS, tileset(), rooms, 0, 1).unwrap_err();
        assert!(matches!(
            err,
            LevelLoadError::BadArrivalPoint { point: 3, count: 1, .. }
        ));
    }

    #[test]
    fn validation_rejects_unknown_tiles_and_ids() {
        let layer = Layer::from_rows(vec![vec![0, 9]]).unwrap();
        let bad_tile = Room::new(0, [Some(layer), None, None]).unwrap();
        let err = TileMap::new(TS, tileset(), vec![bad_tile], 0, 1).unwrap_err();
        assert!(matches!(err, LevelLoadError::UnknownTile { id: 9, col: 1, .. }));

        let err = TileMap::new(TS, tileset(), vec![room(1, 4, 4)], 0, 1).unwrap_err();
        assert!(matches!(err, LevelLoadError::RoomIdMismatch { index: 0, id: 1 }));
    }

    #[test]
    fn validation_rejects_bad_settings() {
        assert!(matches!(
            TileMap::new(0.0, tileset(), vec![room(0, 4, 4)], 0, 1),
            Err(LevelLoadError::BadTileSize)
        ));
        assert!(matches!(
            TileMap::new(TS, tileset(), vec![], 0, 1),
            Err(LevelLoadError::NoRooms)
        ));
        assert!(matches!(
            TileMap::new(TS, tileset(), vec![room(0, 4, 4)], 0, 3),
            Err(LevelLoadError::BadCollisionLayer(3))
        ));
        assert!(matches!(
            TileMap::new(TS, tileset(), vec![room(0, 4, 4)], 2, 1),
            Err(LevelLoadError::BadStart { room: 2, .. })
        ));
    }
}
