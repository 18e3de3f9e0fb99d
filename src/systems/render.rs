//! Rendering.
//!
//! [`render_system`] draws one frame at the game resolution, scaled to the
//! window:
//!
//! 1. Tile layers up to and including the collision layer.
//! 2. Sprites, sorted by [`ZIndex`] and culled against the camera view.
//! 3. The remaining tile layers, in front of the sprites.
//! 4. Debug overlays and the pause banner, in screen space.
//!
//! While a room transition is being applied the screen is cleared to black.
//! Textures that failed to load are drawn as flat placeholder rectangles.

use std::ops::Range;

use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::player::Player;
use crate::components::sprite::Sprite;
use crate::components::zindex::ZIndex;
use crate::resources::camera::Camera;
use crate::resources::debugmode::DebugMode;
use crate::resources::gamestate::{GameState, GameStates};
use crate::resources::room::LAYER_COUNT;
use crate::resources::screensize::ScreenSize;
use crate::resources::texturestore::{TILESET_KEY, TextureStore};
use crate::resources::tilemap::TileMap;
use crate::resources::tileset::TileType;

const PLACEHOLDER_SOLID: Color = Color::new(90, 90, 110, 255);
const PLACEHOLDER_DECOR: Color = Color::new(50, 60, 50, 255);
const PLACEHOLDER_SPRITE: Color = Color::new(220, 120, 40, 255);

/// One tile to draw: atlas source and world-space destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileQuad {
    pub layer: usize,
    pub id: u32,
    pub src: Rectangle,
    pub dest: Rectangle,
}

/// Non-empty tiles of `layers` of the active room that fall inside the view.
pub fn visible_tile_quads(
    tilemap: &TileMap,
    camera: &Camera,
    screen: ScreenSize,
    layers: Range<usize>,
) -> Vec<TileQuad> {
    let ts = tilemap.tile_size();
    let (rows, cols) = tilemap.visible_cells(camera, screen);
    let room = tilemap.current_room();
    let mut quads = Vec::new();

    for layer_index in layers {
        let Some(layer) = room.layer(layer_index) else {
            continue;
        };
        for row in rows.clone() {
            for col in cols.clone() {
                let id = layer.get(row, col);
                let Some(tile) = tilemap.tileset().get(id) else {
                    continue;
                };
                quads.push(TileQuad {
                    layer: layer_index,
                    id,
                    src: tile.atlas_rect(),
                    dest: Rectangle::new(col as f32 * ts, row as f32 * ts, ts, ts),
                });
            }
        }
    }
    quads
}

fn draw_tiles<D: RaylibDraw>(
    d: &mut D,
    quads: &[TileQuad],
    tilemap: &TileMap,
    atlas: Option<&Texture2D>,
) {
    for quad in quads {
        match atlas {
            Some(texture) => {
                d.draw_texture_pro(texture, quad.src, quad.dest, Vector2::zero(), 0.0, Color::WHITE)
            }
            None => {
                let color = match tilemap.tileset().tile_type(quad.id) {
                    TileType::Blocking => PLACEHOLDER_SOLID,
                    TileType::Passable => PLACEHOLDER_DECOR,
                };
                d.draw_rectangle_rec(quad.dest, color);
            }
        }
    }
}

fn overlaps_view(min: Vector2, max: Vector2, view: (Vector2, Vector2)) -> bool {
    !(max.x < view.0.x || min.x > view.1.x || max.y < view.0.y || min.y > view.1.y)
}

#[allow(clippy::too_many_arguments)]
pub fn render_system(
    mut rl: NonSendMut<RaylibHandle>,
    th: NonSend<RaylibThread>,
    tilemap: Res<TileMap>,
    camera: Option<Res<Camera>>,
    screen: Res<ScreenSize>,
    state: Res<GameState>,
    textures: Option<Res<TextureStore>>,
    debug_mode: Option<Res<DebugMode>>,
    sprites: Query<(&Sprite, &MapPosition, &ZIndex)>,
    colliders: Query<(&BoxCollider, &MapPosition)>,
    players: Query<&MapPosition, With<Player>>,
) {
    let zoom = screen.zoom_for_window(rl.get_screen_width(), rl.get_screen_height());
    let fps = rl.get_fps();
    let mut d = rl.begin_drawing(&th);
    d.clear_background(Color::BLACK);

    let Some(camera) = camera else {
        return;
    };
    if matches!(state.get(), GameStates::Transitioning) {
        return;
    }

    let screen = *screen;
    let view = camera.view_rect(screen);
    let atlas = textures.as_ref().and_then(|t| t.get(TILESET_KEY));
    let collision_layer = tilemap.current_layer();

    {
        let mut d2 = d.begin_mode2D(camera.to_camera2d(zoom));

        let back = visible_tile_quads(&tilemap, &camera, screen, 0..collision_layer + 1);
        draw_tiles(&mut d2, &back, &tilemap, atlas);

        let mut to_draw: Vec<(&Sprite, Vector2, ZIndex)> = sprites
            .iter()
            .filter_map(|(sprite, position, z)| {
                let min = sprite.top_left(position.pos);
                let max = Vector2::new(min.x + sprite.width, min.y + sprite.height);
                overlaps_view(min, max, view).then_some((sprite, min, *z))
            })
            .collect();
        to_draw.sort_by_key(|(_, _, z)| *z);

        for (sprite, top_left, _) in to_draw {
            let dest = Rectangle::new(top_left.x, top_left.y, sprite.width, sprite.height);
            match textures.as_ref().and_then(|t| t.get(&sprite.tex_key)) {
                Some(texture) => {
                    // negative source width mirrors the frame
                    let width = if sprite.flip_h { -sprite.width } else { sprite.width };
                    let src = Rectangle::new(sprite.offset.x, sprite.offset.y, width, sprite.height);
                    d2.draw_texture_pro(texture, src, dest, Vector2::zero(), 0.0, Color::WHITE);
                }
                None => d2.draw_rectangle_rec(dest, PLACEHOLDER_SPRITE),
            }
        }

        let front = visible_tile_quads(&tilemap, &camera, screen, collision_layer + 1..LAYER_COUNT);
        draw_tiles(&mut d2, &front, &tilemap, atlas);

        if debug_mode.is_some() {
            for (collider, position) in colliders.iter() {
                let (x, y, w, h) = collider.get_aabb(position.pos);
                d2.draw_rectangle_lines_ex(Rectangle::new(x, y, w, h), 1.0, Color::RED);
            }
        }
    }

    if debug_mode.is_some() {
        let player = players
            .single()
            .map(|p| {
                let on_screen = camera.world_to_screen(p.pos);
                format!(
                    "({:.1}, {:.1}) screen ({:.0}, {:.0})",
                    p.pos.x, p.pos.y, on_screen.x, on_screen.y
                )
            })
            .unwrap_or_else(|_| "-".to_string());
        let text = format!(
            "FPS {} | room {} | layer {} | player {}",
            fps,
            tilemap.current_room_id(),
            collision_layer,
            player
        );
        d.draw_text(&text, 10, 10, 10, Color::WHITE);
    }

    if matches!(state.get(), GameStates::Paused) {
        let w = (screen.w as f32 * zoom) as i32;
        let h = (screen.h as f32 * zoom) as i32;
        d.draw_rectangle(0, 0, w, h, Color::new(0, 0, 0, 140));
        let text = "PAUSED";
        let size = 20;
        let text_w = d.measure_text(text, size);
        d.draw_text(text, (w - text_w) / 2, (h - size) / 2, size, Color::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::layer::Layer;
    use crate::resources::room::Room;
    use crate::resources::tileset::{Tile, TileSet};

    const TS: f32 = 16.0;
    const SCREEN: ScreenSize = ScreenSize { w: 32, h: 32 };

    fn tilemap(width: usize, height: usize) -> TileMap {
        let tileset = TileSet::from_tiles([
            (1, Tile::new(Vector2::zero(), Vector2::new(16.0, 16.0), TileType::Blocking)),
            (2, Tile::new(Vector2::new(16.0, 0.0), Vector2::new(32.0, 16.0), TileType::Passable)),
        ])
        .unwrap();
        let back = Layer::from_rows(vec![vec![2; width]; height]).unwrap();
        let mut solid = vec![vec![0; width]; height];
        solid[height - 1] = vec![1; width];
        let solid = Layer::from_rows(solid).unwrap();
        let room = Room::new(0, [Some(back), Some(solid), None]).unwrap();
        TileMap::new(TS, tileset, vec![room], 0, 1).unwrap()
    }

    #[test]
    fn skips_empty_tiles_and_missing_layers() {
        let tm = tilemap(2, 2);
        let camera = Camera::new();
        let quads = visible_tile_quads(&tm, &camera, SCREEN, 0..LAYER_COUNT);
        // 4 back tiles, 2 floor tiles, nothing from the absent front layer
        assert_eq!(quads.len(), 6);
        assert_eq!(quads.iter().filter(|q| q.layer == 1).count(), 2);
        let floor = quads.iter().find(|q| q.layer == 1).unwrap();
        assert_eq!(floor.dest, Rectangle::new(0.0, 16.0, 16.0, 16.0));
        assert_eq!(floor.src, Rectangle::new(0.0, 0.0, 16.0, 16.0));
    }

    #[test]
    fn culls_to_the_camera_view() {
        let tm = tilemap(20, 4);
        let mut camera = Camera::new();
        camera.reset_bounds_for_room(tm.size(), SCREEN);
        camera.set_position(Vector2::new(-160.0, 0.0));

        let quads = visible_tile_quads(&tm, &camera, SCREEN, 0..1);
        let cols: Vec<f32> = quads.iter().map(|q| q.dest.x / TS).collect();
        assert!(cols.iter().all(|&c| (10.0..14.0).contains(&c)));
        assert!(cols.contains(&10.0));
    }

    #[test]
    fn layer_range_splits_back_and_front() {
        let tm = tilemap(2, 2);
        let camera = Camera::new();
        let back = visible_tile_quads(&tm, &camera, SCREEN, 0..1);
        assert!(back.iter().all(|q| q.layer == 0));
        let front = visible_tile_quads(&tm, &camera, SCREEN, 2..LAYER_COUNT);
        assert!(front.is_empty());
    }

    #[test]
    fn view_overlap() {
        let view = (Vector2::new(0.0, 0.0), Vector2::new(10.0, 10.0));
        assert!(overlaps_view(Vector2::new(5.0, 5.0), Vector2::new(15.0, 15.0), view));
        assert!(!overlaps_view(Vector2::new(11.0, 0.0), Vector2::new(20.0, 5.0), view));
    }
}
