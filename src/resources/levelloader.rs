//! JSON level loader.
//!
//! A level set is a `manifest.json` plus one JSON file per room:
//!
//! ```json
//! {
//!   "tile_size": 16,
//!   "tileset": {
//!     "texture": "tileset.png",
//!     "tiles": [{ "id": 1, "from": [0, 0], "to": [16, 16], "type": "blocking" }]
//!   },
//!   "maps": ["room0.json", "room1.json"],
//!   "start": { "map": 0, "spawn": 0 },
//!   "collision_layer": 1
//! }
//! ```
//!
//! A room file carries its `id` (its index in `maps`), up to three `layers`
//! (`null` for a missing layer, otherwise rows of tile ids), `spawns` in tile
//! units, `exits` keyed by side and an optional list of `entities`.
//!
//! Everything is checked at load time. A [`LevelLoadError`] means the level
//! data is unusable and the game should not start.

use std::path::{Path, PathBuf};

use bevy_ecs::prelude::Resource;
use log::{debug, info};
use raylib::prelude::Vector2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resources::layer::{Layer, LayerShapeError};
use crate::resources::room::{Exit, Facing, LAYER_COUNT, Room, RoomEntity, Side, SpawnPoint};
use crate::resources::tilemap::{DEFAULT_COLLISION_LAYER, TileMap};
use crate::resources::tileset::{Tile, TileSet, TileType};

/// File looked up when the levels path is a directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Error type for level loading failures.
#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("the manifest lists no rooms")]
    NoRooms,
    #[error("tile size must be greater than zero")]
    BadTileSize,
    #[error("tile id {0} is reserved or declared twice")]
    BadTileId(u32),
    #[error("room {room} has {count} layers, at most {max} are allowed")]
    TooManyLayers { room: usize, count: usize, max: usize },
    #[error("room {room} has no layers")]
    NoLayers { room: usize },
    #[error("room {room} layer {layer} is empty")]
    EmptyLayer { room: usize, layer: usize },
    #[error("room {room} layer {layer} row {row} has a different length than row 0")]
    RaggedLayer { room: usize, layer: usize, row: usize },
    #[error(
        "room {room} layer {layer} is {width}x{height}, expected {expected_width}x{expected_height}"
    )]
    LayerSizeMismatch {
        room: usize,
        layer: usize,
        width: usize,
        height: usize,
        expected_width: usize,
        expected_height: usize,
    },
    #[error("room {room} layer {layer} cell ({row}, {col}) uses undeclared tile id {id}")]
    UnknownTile {
        room: usize,
        layer: usize,
        row: usize,
        col: usize,
        id: u32,
    },
    #[error("room file #{index} declares id {id}")]
    RoomIdMismatch { index: usize, id: usize },
    #[error("room {room} {side} exit targets room {target}, only {count} rooms are loaded")]
    BadExitTarget {
        room: usize,
        side: Side,
        target: usize,
        count: usize,
    },
    #[error(
        "room {room} {side} exit arrives at spawn {point} of room {target}, which has {count} spawns"
    )]
    BadArrivalPoint {
        room: usize,
        side: Side,
        target: usize,
        point: usize,
        count: usize,
    },
    #[error("room {room} {side} exit interval ({begin}, {end}) is empty")]
    EmptyExitInterval {
        room: usize,
        side: Side,
        begin: f32,
        end: f32,
    },
    #[error("start position (room {room}, spawn {spawn}) does not exist")]
    BadStart { room: usize, spawn: usize },
    #[error("collision layer {0} is out of range")]
    BadCollisionLayer(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileDef {
    pub id: u32,
    pub from: [f32; 2],
    pub to: [f32; 2],
    #[serde(rename = "type", default)]
    pub kind: TileType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileSetDef {
    /// Atlas image, relative to the manifest.
    pub texture: String,
    pub tiles: Vec<TileDef>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StartDef {
    pub map: usize,
    pub spawn: usize,
}

fn default_collision_layer() -> usize {
    DEFAULT_COLLISION_LAYER
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestDef {
    pub tile_size: u32,
    pub tileset: TileSetDef,
    /// Room files, relative to the manifest. The room id is the list index.
    pub maps: Vec<String>,
    #[serde(default)]
    pub start: StartDef,
    #[serde(default = "default_collision_layer")]
    pub collision_layer: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExitsDef {
    #[serde(default)]
    pub top: Vec<Exit>,
    #[serde(default)]
    pub right: Vec<Exit>,
    #[serde(default)]
    pub bottom: Vec<Exit>,
    #[serde(default)]
    pub left: Vec<Exit>,
}

impl ExitsDef {
    fn side(&self, side: Side) -> &[Exit] {
        match side {
            Side::Top => &self.top,
            Side::Right => &self.right,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDef {
    pub id: usize,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub layers: Vec<Option<Vec<Vec<u32>>>>,
    #[serde(default)]
    pub spawns: Vec<SpawnPoint>,
    #[serde(default)]
    pub exits: ExitsDef,
    #[serde(default)]
    pub entities: Vec<RoomEntity>,
}

impl RoomDef {
    /// Build the room, checking the layer shapes. Cross-room references are
    /// checked by [`TileMap::new`].
    pub fn into_room(self) -> Result<Room, LevelLoadError> {
        let id = self.id;
        if self.layers.len() > LAYER_COUNT {
            return Err(LevelLoadError::TooManyLayers {
                room: id,
                count: self.layers.len(),
                max: LAYER_COUNT,
            });
        }

        let mut layers: [Option<Layer>; LAYER_COUNT] = Default::default();
        for (index, rows) in self.layers.into_iter().enumerate() {
            let Some(rows) = rows else {
                continue;
            };
            let layer = Layer::from_rows(rows).map_err(|e| match e {
                LayerShapeError::Empty => LevelLoadError::EmptyLayer { room: id, layer: index },
                LayerShapeError::Ragged { row } => LevelLoadError::RaggedLayer {
                    room: id,
                    layer: index,
                    row,
                },
            })?;
            layers[index] = Some(layer);
        }

        let mut room = Room::new(id, layers)?.with_names(self.zone, self.location);
        for spawn in self.spawns {
            room = room.with_spawn(spawn);
        }
        for side in Side::ALL {
            for exit in self.exits.side(side) {
                room = room.with_exit(side, *exit);
            }
        }
        for entity in self.entities {
            room = room.with_entity(entity);
        }
        Ok(room)
    }
}

/// Build a tile set from its definition. Id 0 is reserved.
pub fn build_tileset(def: &TileSetDef) -> Result<TileSet, LevelLoadError> {
    TileSet::from_tiles(def.tiles.iter().map(|t| {
        (
            t.id,
            Tile::new(
                Vector2::new(t.from[0], t.from[1]),
                Vector2::new(t.to[0], t.to[1]),
                t.kind,
            ),
        )
    }))
    .map_err(LevelLoadError::BadTileId)
}

/// Where the game starts and which atlas the tile set uses.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LevelStart {
    pub room: usize,
    pub spawn: usize,
    /// Tile set atlas, resolved against the manifest directory.
    pub tileset_texture: PathBuf,
}

/// A validated level set ready to be inserted in the world.
#[derive(Debug, Clone)]
pub struct LevelData {
    pub tilemap: TileMap,
    pub start: LevelStart,
}

impl LevelData {
    /// Pixel position and facing of the start spawn point.
    pub fn start_position(&self) -> Option<(Vector2, Facing)> {
        self.tilemap.spawn_position(self.start.room, self.start.spawn)
    }
}

/// Build a level set from already parsed definitions. `base_dir` is used to
/// resolve the tile set texture.
pub fn build_levels(
    manifest: ManifestDef,
    room_defs: Vec<RoomDef>,
    base_dir: &Path,
) -> Result<LevelData, LevelLoadError> {
    if manifest.tile_size == 0 {
        return Err(LevelLoadError::BadTileSize);
    }
    let tileset = build_tileset(&manifest.tileset)?;
    let rooms = room_defs
        .into_iter()
        .map(RoomDef::into_room)
        .collect::<Result<Vec<_>, _>>()?;

    let start = manifest.start;
    let tilemap = TileMap::new(
        manifest.tile_size as f32,
        tileset,
        rooms,
        start.map,
        manifest.collision_layer,
    )?;
    if tilemap.current_room().spawn(start.spawn).is_none() {
        return Err(LevelLoadError::BadStart {
            room: start.map,
            spawn: start.spawn,
        });
    }

    Ok(LevelData {
        tilemap,
        start: LevelStart {
            room: start.map,
            spawn: start.spawn,
            tileset_texture: base_dir.join(&manifest.tileset.texture),
        },
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LevelLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LevelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LevelLoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve a levels path: a directory means its `manifest.json`.
pub fn manifest_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(MANIFEST_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Load and validate a level set from a manifest file or its directory.
pub fn load_levels(path: impl AsRef<Path>) -> Result<LevelData, LevelLoadError> {
    let manifest_path = manifest_path(path.as_ref());
    let base_dir = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let manifest: ManifestDef = read_json(&manifest_path)?;
    debug!(
        "Manifest {:?}: tile size {}, {} rooms",
        manifest_path,
        manifest.tile_size,
        manifest.maps.len()
    );

    let room_defs = manifest
        .maps
        .iter()
        .map(|file| read_json::<RoomDef>(&base_dir.join(file)))
        .collect::<Result<Vec<_>, _>>()?;

    let levels = build_levels(manifest, room_defs, &base_dir)?;
    info!(
        "Loaded {} rooms from {:?}",
        levels.tilemap.rooms().len(),
        manifest_path
    );
    Ok(levels)
}
