//! State hooks and entity spawners.
//!
//! - [`setup`] loads textures and animation clips and prepares the camera.
//! - [`enter_play`] spawns the player at the start spawn point.
//! - [`quit_game`] tears down the game entities.
//!
//! The hooks are one-shot systems registered in
//! [`SystemsStore`](crate::resources::systemsstore::SystemsStore) by `main`.

use std::sync::Arc;

use bevy_ecs::prelude::*;
use log::{error, info, warn};
use raylib::prelude::*;

use crate::components::animation::{AnimKey, Animation};
use crate::components::boxcollider::BoxCollider;
use crate::components::intent::Intent;
use crate::components::mapposition::MapPosition;
use crate::components::modules::{Jump, Module, ModuleChain, ModuleOrderError, Movement, Sprint};
use crate::components::motionstate::MotionState;
use crate::components::patrol::Patrol;
use crate::components::player::Player;
use crate::components::rigidbody::RigidBody;
use crate::components::roomlocal::RoomLocal;
use crate::components::sprite::Sprite;
use crate::components::zindex::ZIndex;
use crate::events::room::RoomEnteredEvent;
use crate::resources::animationstore::{AnimationResource, AnimationStore};
use crate::resources::camera::Camera;
use crate::resources::gameconfig::{GameConfig, PlayerTuning};
use crate::resources::gamestate::{GameStates, NextGameState};
use crate::resources::levelloader::LevelStart;
use crate::resources::room::{EntityKind, Facing, RoomEntity};
use crate::resources::screensize::ScreenSize;
use crate::resources::texturestore::{TILESET_KEY, TextureStore};
use crate::resources::tilemap::TileMap;

pub const PLAYER_SET: &str = "player";
pub const WALKER_SET: &str = "walker";

const PLAYER_SHEET: &str = "./assets/sprites/player.png";
const WALKER_SHEET: &str = "./assets/sprites/walker.png";

const WALKER_SIZE: (f32, f32) = (16.0, 16.0);
const WALKER_COLLIDER: (f32, f32) = (12.0, 14.0);

fn load_texture(
    rl: &mut RaylibHandle,
    th: &RaylibThread,
    store: &mut TextureStore,
    key: &str,
    path: &str,
) {
    match rl.load_texture(th, path) {
        Ok(texture) => store.insert(key, texture),
        Err(e) => warn!("Texture {:?} not loaded ({}), drawing placeholders", path, e),
    }
}

/// One clip per row of a sheet, frames laid out left to right.
fn sheet_clips(
    store: &mut AnimationStore,
    set: &str,
    frame_width: f32,
    frame_height: f32,
    rows: &[(AnimKey, usize, f32)],
) {
    let tex_key: Arc<str> = Arc::from(set);
    for (row, &(key, frame_count, fps)) in rows.iter().enumerate() {
        store.insert(
            set,
            key,
            AnimationResource {
                tex_key: tex_key.clone(),
                position: Vector2::new(0.0, row as f32 * frame_height),
                displacement: frame_width,
                frame_count,
                fps,
                looped: true,
            },
        );
    }
}

pub fn setup(
    mut commands: Commands,
    mut next_state: ResMut<NextGameState>,
    mut rl: NonSendMut<RaylibHandle>,
    th: NonSend<RaylibThread>,
    level: Res<LevelStart>,
    tilemap: Res<TileMap>,
    config: Res<GameConfig>,
    screen: Res<ScreenSize>,
) {
    let mut textures = TextureStore::new();
    let tileset_path = level.tileset_texture.to_string_lossy().into_owned();
    load_texture(&mut rl, &th, &mut textures, TILESET_KEY, &tileset_path);
    load_texture(&mut rl, &th, &mut textures, PLAYER_SET, PLAYER_SHEET);
    load_texture(&mut rl, &th, &mut textures, WALKER_SET, WALKER_SHEET);
    commands.insert_resource(textures);

    let mut animations = AnimationStore::new();
    let tuning = &config.player;
    sheet_clips(
        &mut animations,
        PLAYER_SET,
        tuning.sprite_width,
        tuning.sprite_height,
        &[
            (AnimKey::Idle, 1, 1.0),
            (AnimKey::Walk, 10, 15.0),
            (AnimKey::Run, 10, 24.0),
            (AnimKey::Jump, 1, 1.0),
            (AnimKey::Fall, 1, 1.0),
        ],
    );
    sheet_clips(
        &mut animations,
        WALKER_SET,
        WALKER_SIZE.0,
        WALKER_SIZE.1,
        &[(AnimKey::Idle, 2, 2.0), (AnimKey::Walk, 4, 8.0)],
    );
    commands.insert_resource(animations);

    let mut camera = Camera::new();
    camera.reset_bounds_for_room(tilemap.size(), *screen);
    commands.insert_resource(camera);

    next_state.set(GameStates::Playing);
    info!("Game setup done, next state set to Playing");
}

pub fn enter_play(
    mut commands: Commands,
    level: Res<LevelStart>,
    tilemap: Res<TileMap>,
    config: Res<GameConfig>,
    screen: Res<ScreenSize>,
    mut camera: ResMut<Camera>,
    mut next_state: ResMut<NextGameState>,
) {
    let Some((position, facing)) = tilemap.spawn_position(level.room, level.spawn) else {
        error!("Start spawn {} of room {} is missing", level.spawn, level.room);
        next_state.set(GameStates::Quitting);
        return;
    };

    if let Err(e) = spawn_player(&mut commands, position, facing, &config.player) {
        error!("Cannot build the player: {}", e);
        next_state.set(GameStates::Quitting);
        return;
    }

    camera.center_on(position, *screen);
    commands.trigger(RoomEnteredEvent {
        from: None,
        to: tilemap.current_room_id(),
    });
}

/// Modules of the player, in run order.
pub fn player_modules(tuning: &PlayerTuning) -> Result<ModuleChain, ModuleOrderError> {
    ModuleChain::new([
        Module::Movement(Movement {
            accel: tuning.walk_accel,
            max_speed: tuning.max_speed,
            decel: tuning.stop_decel,
        }),
        Module::Jump(Jump {
            speed: tuning.jump_speed,
            gravity: tuning.gravity,
            cut: tuning.jump_cut,
            max_fall: tuning.max_fall_speed,
        }),
        Module::Sprint(Sprint {
            factor: tuning.run_factor,
        }),
    ])
}

/// Modules of a walker: slow movement and gravity, no jumping.
pub fn walker_modules() -> Result<ModuleChain, ModuleOrderError> {
    let defaults = PlayerTuning::default();
    ModuleChain::new([
        Module::Movement(Movement {
            accel: 600.0,
            max_speed: 40.0,
            decel: 800.0,
        }),
        Module::Jump(Jump {
            speed: 0.0,
            gravity: defaults.gravity,
            cut: 1.0,
            max_fall: defaults.max_fall_speed,
        }),
    ])
}

pub fn spawn_player(
    commands: &mut Commands,
    position: Vector2,
    facing: Facing,
    tuning: &PlayerTuning,
) -> Result<Entity, ModuleOrderError> {
    let modules = player_modules(tuning)?;
    let entity = commands
        .spawn((
            Player,
            MapPosition::from_vec(position),
            BoxCollider::new(tuning.collider_width, tuning.collider_height),
            Sprite::new(PLAYER_SET, tuning.sprite_width, tuning.sprite_height),
            RigidBody::new(),
            MotionState::facing(facing.is_left()),
            Animation::new(PLAYER_SET),
            Intent::default(),
            modules,
            ZIndex(10),
        ))
        .id();
    info!("Player spawned at ({:.1}, {:.1})", position.x, position.y);
    Ok(entity)
}

/// Spawn an entity listed by room `room`. Positions are in tile units.
pub fn spawn_room_entity(
    commands: &mut Commands,
    room: usize,
    def: &RoomEntity,
    tile_size: f32,
) -> Option<Entity> {
    let position = Vector2::new(def.x * tile_size, def.y * tile_size);
    match def.kind {
        EntityKind::Walker => {
            let modules = match walker_modules() {
                Ok(modules) => modules,
                Err(e) => {
                    error!("Cannot build a walker: {}", e);
                    return None;
                }
            };
            let entity = commands
                .spawn((
                    RoomLocal { room },
                    MapPosition::from_vec(position),
                    BoxCollider::new(WALKER_COLLIDER.0, WALKER_COLLIDER.1),
                    Sprite::new(WALKER_SET, WALKER_SIZE.0, WALKER_SIZE.1),
                    RigidBody::new(),
                    MotionState::facing(def.facing.is_left()),
                    Animation::new(WALKER_SET),
                    Intent::default(),
                    modules,
                    Patrol::new(def.facing.is_left()),
                    ZIndex(5),
                ))
                .id();
            Some(entity)
        }
    }
}

/// Despawn every game entity. Observers and registered systems are not
/// game entities and stay.
pub fn quit_game(mut commands: Commands, query: Query<Entity, With<MapPosition>>) {
    let mut count = 0;
    for entity in query.iter() {
        commands.entity(entity).despawn();
        count += 1;
    }
    info!("Quitting, despawned {} entities", count);
}
