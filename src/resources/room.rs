//! Rooms: the discrete level screens the tile map streams between.
//!
//! A [`Room`] aggregates up to [`LAYER_COUNT`] tile layers, a table of spawn
//! points and, for each [`Side`], a list of exit intervals. Coordinates stored
//! here are in tile units; conversion to pixels happens in
//! [`TileMap`](crate::resources::tilemap::TileMap).

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::resources::layer::Layer;
use crate::resources::levelloader::LevelLoadError;

/// Number of depth layers per room: background, collision, foreground.
pub const LAYER_COUNT: usize = 3;

/// Room boundary. The numeric order is fixed: top, right, bottom, left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Side> {
        Side::ALL.get(index).copied()
    }

    /// Top and bottom exits are matched on the x coordinate.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        };
        f.write_str(name)
    }
}

/// Direction an entity looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn is_left(self) -> bool {
        matches!(self, Facing::Left)
    }
}

/// Arrival position inside a room, in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub facing: Facing,
}

impl SpawnPoint {
    pub fn new(x: f32, y: f32, facing: Facing) -> Self {
        Self { x, y, facing }
    }
}

/// Exit interval on one side of a room.
///
/// Crossing the side with the perpendicular coordinate strictly between
/// `begin` and `end` (tile units) leads to `target_room`, arriving at spawn
/// point `arrival_point`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exit {
    pub target_room: usize,
    pub arrival_point: usize,
    pub begin: f32,
    pub end: f32,
}

impl Exit {
    pub fn new(target_room: usize, arrival_point: usize, begin: f32, end: f32) -> Self {
        Self {
            target_room,
            arrival_point,
            begin,
            end,
        }
    }

    /// Both bounds are excluded.
    pub fn contains(&self, coordinate: f32) -> bool {
        self.begin < coordinate && coordinate < self.end
    }
}

/// Kinds of entities a room can populate on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Walks back and forth, turning at walls.
    Walker,
}

/// Entity placed in a room, position in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomEntity {
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub facing: Facing,
}

type ExitList = SmallVec<[Exit; 2]>;

/// One level screen.
#[derive(Debug, Clone)]
pub struct Room {
    id: usize,
    zone: Option<String>,
    location: Option<String>,
    layers: [Option<Layer>; LAYER_COUNT],
    width: usize,
    height: usize,
    spawns: Vec<SpawnPoint>,
    exits: [ExitList; 4],
    entities: Vec<RoomEntity>,
}

impl Room {
    /// Create a room from its layers. At least one layer must be present and
    /// all present layers must share the same dimensions.
    pub fn new(id: usize, layers: [Option<Layer>; LAYER_COUNT]) -> Result<Self, LevelLoadError> {
        let (width, height) = layers
            .iter()
            .flatten()
            .map(|l| (l.width(), l.height()))
            .next()
            .ok_or(LevelLoadError::NoLayers { room: id })?;

        for (index, layer) in layers.iter().enumerate() {
            let Some(layer) = layer else {
                continue;
            };
            if layer.width() != width || layer.height() != height {
                return Err(LevelLoadError::LayerSizeMismatch {
                    room: id,
                    layer: index,
                    width: layer.width(),
                    height: layer.height(),
                    expected_width: width,
                    expected_height: height,
                });
            }
        }

        Ok(Self {
            id,
            zone: None,
            location: None,
            layers,
            width,
            height,
            spawns: Vec::new(),
            exits: Default::default(),
            entities: Vec::new(),
        })
    }

    pub fn with_spawn(mut self, spawn: SpawnPoint) -> Self {
        self.spawns.push(spawn);
        self
    }

    /// Append an exit to a side. Exits are matched in insertion order.
    pub fn with_exit(mut self, side: Side, exit: Exit) -> Self {
        self.exits[side.index()].push(exit);
        self
    }

    pub fn with_entity(mut self, entity: RoomEntity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_names(mut self, zone: Option<String>, location: Option<String>) -> Self {
        self.zone = zone;
        self.location = location;
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Width in tiles.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// The layer at `index`, if it was authored.
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index).and_then(|l| l.as_ref())
    }

    /// Grid of a layer, or an empty grid of the room's size when the layer is
    /// missing or `index` is out of range.
    pub fn get_map(&self, index: usize) -> Cow<'_, Layer> {
        match self.layer(index) {
            Some(layer) => Cow::Borrowed(layer),
            None => Cow::Owned(Layer::empty(self.width, self.height)),
        }
    }

    pub fn spawns(&self) -> &[SpawnPoint] {
        &self.spawns
    }

    pub fn spawn(&self, point: usize) -> Option<&SpawnPoint> {
        self.spawns.get(point)
    }

    /// All exits of one side, in match order.
    pub fn exit_points(&self, side: Side) -> &[Exit] {
        &self.exits[side.index()]
    }

    /// First exit of `side` whose interval contains the perpendicular
    /// coordinate of the tile-unit position (`col`, `row`).
    pub fn find_exit(&self, side: Side, col: f32, row: f32) -> Option<&Exit> {
        let coordinate = if side.is_horizontal() { col } else { row };
        self.exit_points(side)
            .iter()
            .find(|exit| exit.contains(coordinate))
    }

    pub fn entities(&self) -> &[RoomEntity] {
        &self.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(w: usize, h: usize) -> Layer {
        Layer::empty(w, h)
    }

    #[test]
    fn exit_interval_excludes_both_bounds() {
        let exit = Exit::new(1, 0, 5.0, 10.0);
        assert!(!exit.contains(5.0));
        assert!(exit.contains(5.0 + 1e-3));
        assert!(exit.contains(9.999));
        assert!(!exit.contains(10.0));
    }

    #[test]
    fn missing_layer_degrades_to_empty_grid() {
        let room = Room::new(0, [None, Some(layer(4, 3)), None]).unwrap();
        let background = room.get_map(0);
        assert!(matches!(background, Cow::Owned(_)));
        assert_eq!(background.width(), 4);
        assert_eq!(background.height(), 3);
        assert!(background.iter().all(|(_, _, id)| id == 0));
        assert!(matches!(room.get_map(1), Cow::Borrowed(_)));
        assert_eq!(room.get_map(7).width(), 4);
    }

    #[test]
    fn room_without_layers_is_rejected() {
        let err = Room::new(3, [None, None, None]).unwrap_err();
        assert!(matches!(err, LevelLoadError::NoLayers { room: 3 }));
    }

    #[test]
    fn mismatched_layers_are_rejected() {
        let err = Room::new(0, [Some(layer(4, 3)), Some(layer(5, 3)), None]).unwrap_err();
        assert!(matches!(
            err,
            LevelLoadError::LayerSizeMismatch { layer: 1, .. }
        ));
    }

    #[test]
    fn find_exit_uses_perpendicular_axis() {
        let room = Room::new(0, [None, Some(layer(20, 20)), None])
            .unwrap()
            .with_exit(Side::Bottom, Exit::new(3, 0, 5.0, 10.0))
            .with_exit(Side::Left, Exit::new(2, 1, 5.0, 10.0));

        // bottom: matched on x
        assert!(room.find_exit(Side::Bottom, 7.0, 0.0).is_some());
        assert!(room.find_exit(Side::Bottom, 4.0, 7.0).is_none());
        // left: matched on y
        assert!(room.find_exit(Side::Left, 0.0, 7.0).is_some());
        assert!(room.find_exit(Side::Left, 7.0, 4.0).is_none());
        // other sides have no exits
        assert!(room.find_exit(Side::Top, 7.0, 7.0).is_none());
    }

    #[test]
    fn overlapping_exits_resolve_in_list_order() {
        let room = Room::new(0, [None, Some(layer(20, 20)), None])
            .unwrap()
            .with_exit(Side::Right, Exit::new(1, 0, 2.0, 8.0))
            .with_exit(Side::Right, Exit::new(2, 0, 4.0, 12.0));

        assert_eq!(room.find_exit(Side::Right, 0.0, 5.0).unwrap().target_room, 1);
        assert_eq!(room.find_exit(Side::Right, 0.0, 10.0).unwrap().target_room, 2);
    }

    #[test]
    fn side_indices_are_fixed() {
        assert_eq!(Side::Top.index(), 0);
        assert_eq!(Side::Right.index(), 1);
        assert_eq!(Side::Bottom.index(), 2);
        assert_eq!(Side::Left.index(), 3);
        assert_eq!(Side::from_index(2), Some(Side::Bottom));
        assert_eq!(Side::from_index(4), None);
        assert_eq!(Side::Left.opposite(), Side::Right);
    }
}
