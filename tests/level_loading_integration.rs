//! Level loading integration tests against the shipped level set.

use std::path::{Path, PathBuf};

use raylib::prelude::Vector2;

use growth::components::boxcollider::BoxCollider;
use growth::resources::gameconfig::PlayerTuning;
use growth::resources::levelloader::{LevelLoadError, load_levels};
use growth::resources::room::{LAYER_COUNT, Side};
use growth::resources::tilemap::TileMap;

fn levels_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/levels")
}

/// Whether a centered box at `pos` touches a blocking tile of `room`.
fn overlaps_blocking(tilemap: &TileMap, room: usize, pos: Vector2, collider: &BoxCollider) -> bool {
    let ts = tilemap.tile_size();
    let layer = tilemap.room(room).unwrap().get_map(1);
    let (x, y, w, h) = collider.get_aabb(pos);
    let first_col = (x / ts).floor().max(0.0) as usize;
    let last_col = (((x + w) / ts).ceil() as usize).min(layer.width());
    let first_row = (y / ts).floor().max(0.0) as usize;
    let last_row = (((y + h) / ts).ceil() as usize).min(layer.height());
    (first_row..last_row).any(|row| {
        (first_col..last_col).any(|col| tilemap.tileset().tile_type(layer.get(row, col)).is_blocking())
    })
}

#[test]
fn shipped_levels_load_from_the_directory() {
    let levels = load_levels(levels_dir()).unwrap();
    let tilemap = &levels.tilemap;

    assert_eq!(tilemap.rooms().len(), 3);
    assert_eq!(tilemap.tile_size(), 16.0);
    assert_eq!(tilemap.current_room_id(), levels.start.room);
    assert_eq!(tilemap.current_layer(), 1);
    assert!(levels.start.tileset_texture.ends_with("tileset.png"));
    assert!(levels.start_position().is_some());
}

#[test]
fn manifest_file_path_loads_the_same_levels() {
    let from_dir = load_levels(levels_dir()).unwrap();
    let from_file = load_levels(levels_dir().join("manifest.json")).unwrap();
    assert_eq!(from_dir.start, from_file.start);
    assert_eq!(from_dir.tilemap.rooms().len(), from_file.tilemap.rooms().len());
}

#[test]
fn every_spawn_point_is_free_for_the_player() {
    let levels = load_levels(levels_dir()).unwrap();
    let tilemap = &levels.tilemap;
    let tuning = PlayerTuning::default();
    let collider = BoxCollider::new(tuning.collider_width, tuning.collider_height);

    for room in tilemap.rooms() {
        for point in 0..room.spawns().len() {
            let (pos, _) = tilemap.spawn_position(room.id(), point).unwrap();
            assert!(
                !overlaps_blocking(tilemap, room.id(), pos, &collider),
                "room {} spawn {} at {:?} is inside a wall",
                room.id(),
                point,
                pos
            );
        }
    }
}

#[test]
fn every_exit_has_a_way_back() {
    let levels = load_levels(levels_dir()).unwrap();
    let tilemap = &levels.tilemap;

    for room in tilemap.rooms() {
        for side in Side::ALL {
            for exit in room.exit_points(side) {
                let target = tilemap.room(exit.target_room).unwrap();
                let back = target
                    .exit_points(side.opposite())
                    .iter()
                    .any(|e| e.target_room == room.id());
                assert!(
                    back,
                    "room {} has no {} exit back to room {}",
                    target.id(),
                    side.opposite(),
                    room.id()
                );
            }
        }
    }
}

#[test]
fn layers_share_room_dimensions() {
    let levels = load_levels(levels_dir()).unwrap();
    for room in levels.tilemap.rooms() {
        for layer in 0..LAYER_COUNT {
            let grid = room.get_map(layer);
            assert_eq!((grid.width(), grid.height()), (room.width(), room.height()));
        }
    }
}

#[test]
fn broken_room_file_is_reported_with_its_path() {
    let dir = std::env::temp_dir().join(format!("growth-levels-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("manifest.json"),
        r#"{
            "tile_size": 16,
            "tileset": { "texture": "t.png", "tiles": [] },
            "maps": ["broken.json"]
        }"#,
    )
    .unwrap();
    std::fs::write(dir.join("broken.json"), "{ \"id\": 0, \"layers\": [").unwrap();

    let err = load_levels(&dir).unwrap_err();
    std::fs::remove_dir_all(&dir).ok();

    match err {
        LevelLoadError::Json { path, .. } => assert!(path.ends_with("broken.json")),
        other => panic!("unexpected error: {other}"),
    }
}
