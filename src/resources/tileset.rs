//! Tile descriptors and the shared tile set.
//!
//! A [`Tile`] describes one tile type: the rectangle it occupies in the tile
//! atlas texture and whether entities can pass through it. Tiles are addressed
//! by integer id; id `0` is reserved for "no tile" and is never drawn nor
//! collided against.

use raylib::prelude::{Rectangle, Vector2};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Reserved id for empty cells.
pub const EMPTY_TILE: u32 = 0;

/// Collision behavior of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileType {
    /// Entities move freely through the tile.
    #[default]
    Passable,
    /// Entities are stopped at the tile boundary.
    Blocking,
}

impl TileType {
    pub fn is_blocking(self) -> bool {
        matches!(self, TileType::Blocking)
    }
}

/// Immutable descriptor of one tile type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Top-left corner of the tile in the atlas, in pixels.
    pub atlas_from: Vector2,
    /// Bottom-right corner of the tile in the atlas, in pixels.
    pub atlas_to: Vector2,
    pub kind: TileType,
}

impl Tile {
    pub fn new(atlas_from: Vector2, atlas_to: Vector2, kind: TileType) -> Self {
        Self {
            atlas_from,
            atlas_to,
            kind,
        }
    }

    /// Source rectangle inside the atlas texture.
    pub fn atlas_rect(&self) -> Rectangle {
        Rectangle {
            x: self.atlas_from.x,
            y: self.atlas_from.y,
            width: self.atlas_to.x - self.atlas_from.x,
            height: self.atlas_to.y - self.atlas_from.y,
        }
    }
}

/// Tiles keyed by id.
///
/// Ids need not be contiguous. Ids that were never declared behave like
/// unknown ids: [`TileSet::contains`] reports them as missing, and the level
/// loader refuses layers that reference them.
#[derive(Debug, Clone, Default)]
pub struct TileSet {
    tiles: FxHashMap<u32, Tile>,
}

impl TileSet {
    /// Build a tile set from `(id, tile)` pairs.
    ///
    /// Returns the offending id if it is the reserved [`EMPTY_TILE`] or is
    /// declared twice.
    pub fn from_tiles(tiles: impl IntoIterator<Item = (u32, Tile)>) -> Result<Self, u32> {
        let mut map = FxHashMap::default();
        for (id, tile) in tiles {
            if id == EMPTY_TILE || map.insert(id, tile).is_some() {
                return Err(id);
            }
        }
        Ok(Self { tiles: map })
    }

    /// Get a tile by id. Always `None` for [`EMPTY_TILE`].
    pub fn get(&self, id: u32) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Whether `id` can appear in a layer: either empty or a declared tile.
    pub fn contains(&self, id: u32) -> bool {
        id == EMPTY_TILE || self.get(id).is_some()
    }

    /// Collision type of a tile id. Empty and unknown ids are passable.
    pub fn tile_type(&self, id: u32) -> TileType {
        self.get(id).map(|t| t.kind).unwrap_or(TileType::Passable)
    }

    /// Number of declared tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(kind: TileType) -> Tile {
        Tile::new(Vector2::new(0.0, 0.0), Vector2::new(16.0, 16.0), kind)
    }

    #[test]
    fn empty_tile_is_never_blocking() {
        let set = TileSet::from_tiles([(1, tile(TileType::Blocking))]).unwrap();
        assert_eq!(set.tile_type(EMPTY_TILE), TileType::Passable);
        assert!(set.get(EMPTY_TILE).is_none());
        assert!(set.contains(EMPTY_TILE));
    }

    #[test]
    fn reserved_id_is_rejected() {
        let err = TileSet::from_tiles([(0, tile(TileType::Blocking))]).unwrap_err();
        assert_eq!(err, 0);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let err = TileSet::from_tiles([
            (2, tile(TileType::Passable)),
            (2, tile(TileType::Blocking)),
        ])
        .unwrap_err();
        assert_eq!(err, 2);
    }

    #[test]
    fn gaps_are_unknown() {
        let set = TileSet::from_tiles([(3, tile(TileType::Blocking))]).unwrap();
        assert!(!set.contains(1));
        assert!(set.contains(3));
        assert_eq!(set.tile_type(2), TileType::Passable);
        assert_eq!(set.tile_type(3), TileType::Blocking);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn sparse_ids_are_cheap() {
        let set = TileSet::from_tiles([
            (1, tile(TileType::Passable)),
            (4_000_000_000, tile(TileType::Blocking)),
        ])
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.tile_type(4_000_000_000), TileType::Blocking);
        assert!(!set.contains(3_999_999_999));
    }

    #[test]
    fn atlas_rect_spans_from_to() {
        let t = Tile::new(
            Vector2::new(32.0, 16.0),
            Vector2::new(48.0, 32.0),
            TileType::Passable,
        );
        let r = t.atlas_rect();
        assert_eq!((r.x, r.y, r.width, r.height), (32.0, 16.0, 16.0, 16.0));
    }
}
