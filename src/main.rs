//! Growth main entry point.
//!
//! A 2D side-scrolling platformer written in Rust using:
//! - **raylib** for windowing, input and drawing
//! - **bevy_ecs** for entity-component-system architecture
//!
//! The level set (tile set, rooms, exits and spawn points) is read from JSON
//! files under `assets/levels/` and validated before the window opens.
//!
//! # Main Loop
//!
//! 1. Parse the command line, load `config.ini` and the level set
//! 2. Initialize the raylib window and the ECS world with its resources
//! 3. Register observers and the state hooks, enter `Setup`
//! 4. Run the main game loop:
//!    - Read input, apply pending state changes and global keys
//!    - While playing: intents, modules, tile collision, room exits,
//!      entity overlaps, camera, animation
//!    - Render the active room
//! 5. Release textures before the window closes
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --levels assets/levels
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod components;
mod events;
mod game;
mod resources;
mod systems;

use std::path::PathBuf;

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use clap::Parser;

use crate::components::persistent::Persistent;
use crate::events::collision::observe_player_contact;
use crate::events::gamestate::{GameStateChangedEvent, observe_gamestate_change_event};
use crate::events::room::observe_room_entered;
use crate::events::switchdebug::switch_debug_observer;
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameState, GameStates, NextGameState};
use crate::resources::input::InputState;
use crate::resources::levelloader::{LevelData, load_levels};
use crate::resources::room::Side;
use crate::resources::screensize::ScreenSize;
use crate::resources::systemsstore::{StateHook, SystemsStore};
use crate::resources::texturestore::TextureStore;
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::animation;
use crate::systems::camera::camera_follow;
use crate::systems::collision::collision_detector;
use crate::systems::gamestate::{check_pending_state, state_is_playing};
use crate::systems::input::{handle_global_keys, update_input_state};
use crate::systems::modules::run_modules;
use crate::systems::patrol::patrol_intent;
use crate::systems::playercontroller::player_intent;
use crate::systems::render::render_system;
use crate::systems::roomtransition::{
    apply_room_transition, contain_room_locals, detect_room_exit,
};
use crate::systems::tilecollision::tile_collision;
use crate::systems::time::update_world_time;

/// Growth, a 2D side-scrolling platformer
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "config.ini")]
    config: PathBuf,

    /// Level manifest, or the directory holding `manifest.json`.
    /// Overrides `[game] levels` from the configuration.
    #[arg(long, value_name = "PATH")]
    levels: Option<PathBuf>,

    /// Load and validate the levels, print a summary and exit.
    #[arg(long)]
    check_levels: bool,
}

fn print_level_summary(levels: &LevelData) {
    let tilemap = &levels.tilemap;
    println!(
        "{} rooms, tile size {}, {} tiles, start room {} spawn {}",
        tilemap.rooms().len(),
        tilemap.tile_size(),
        tilemap.tileset().len(),
        levels.start.room,
        levels.start.spawn
    );
    for room in tilemap.rooms() {
        let exits: Vec<String> = Side::ALL
            .iter()
            .filter(|side| !room.exit_points(**side).is_empty())
            .map(|side| format!("{}:{}", side, room.exit_points(*side).len()))
            .collect();
        println!(
            "  room {} {}x{} zone={} location={} spawns={} entities={} exits=[{}]",
            room.id(),
            room.width(),
            room.height(),
            room.zone().unwrap_or("-"),
            room.location().unwrap_or("-"),
            room.spawns().len(),
            room.entities().len(),
            exits.join(" ")
        );
    }
}

fn register_hook<M>(
    world: &mut World,
    store: &mut SystemsStore,
    hook: StateHook,
    system: impl IntoSystem<(), (), M> + 'static,
) {
    let id = world.register_system(system);
    world.entity_mut(id.entity()).insert(Persistent);
    store.insert(hook, id);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using default settings", e);
    }
    if let Some(levels) = cli.levels {
        config.levels_path = levels;
    }

    let levels = match load_levels(&config.levels_path) {
        Ok(levels) => levels,
        Err(e) => {
            log::error!("Cannot load levels from {:?}: {}", config.levels_path, e);
            std::process::exit(1);
        }
    };

    if cli.check_levels {
        print_level_summary(&levels);
        return;
    }

    // --------------- Raylib window ---------------
    let (window_width, window_height) = config.window_size();
    let mut builder = raylib::init();
    builder
        .size(window_width as i32, window_height as i32)
        .resizable()
        .title("Growth");
    if config.vsync {
        builder.vsync();
    }
    if config.fullscreen {
        builder.fullscreen();
    }
    let (mut rl, thread) = builder.build();
    rl.set_target_fps(config.target_fps);
    // Disable ESC to exit
    rl.set_exit_key(None);

    // --------------- ECS world + resources ---------------
    let (render_width, render_height) = config.render_size();
    let LevelData { tilemap, start } = levels;

    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(ScreenSize {
        w: render_width as i32,
        h: render_height as i32,
    });
    world.insert_resource(tilemap);
    world.insert_resource(start);
    world.insert_resource(config);
    world.insert_resource(InputState::default());
    world.insert_resource(GameState::new());
    world.insert_resource(NextGameState::new());

    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);
    world.spawn((Observer::new(observe_gamestate_change_event), Persistent));

    // State hooks. Registered systems are entities in bevy_ecs 0.18.
    let mut systems_store = SystemsStore::new();
    register_hook(&mut world, &mut systems_store, StateHook::Setup, game::setup);
    register_hook(&mut world, &mut systems_store, StateHook::EnterPlay, game::enter_play);
    register_hook(
        &mut world,
        &mut systems_store,
        StateHook::ApplyTransition,
        apply_room_transition,
    );
    register_hook(&mut world, &mut systems_store, StateHook::Quit, game::quit_game);
    world.insert_resource(systems_store);

    world.spawn((Observer::new(switch_debug_observer), Persistent));
    world.spawn((Observer::new(observe_room_entered), Persistent));
    world.spawn((Observer::new(observe_player_contact), Persistent));
    // Ensure the observers are registered before we run any systems that may trigger events.
    world.flush();

    world.resource_mut::<NextGameState>().set(GameStates::Setup);
    world.trigger(GameStateChangedEvent {}); // enter Setup immediately

    let mut update = Schedule::default();
    update.add_systems(update_input_state);
    update.add_systems(check_pending_state.after(update_input_state));
    update.add_systems(handle_global_keys.after(check_pending_state));
    update.add_systems(
        (
            (player_intent, patrol_intent),
            run_modules,
            tile_collision,
            (detect_room_exit, contain_room_locals),
            collision_detector,
            camera_follow,
            animation,
        )
            .chain()
            .run_if(state_is_playing)
            .after(handle_global_keys),
    );
    update.add_systems(render_system.after(animation).after(handle_global_keys));

    update
        .initialize(&mut world)
        .expect("Failed to initialize schedule");

    // --------------- Main loop ---------------
    while !world
        .non_send_resource::<raylib::RaylibHandle>()
        .window_should_close()
    {
        let dt = world
            .non_send_resource::<raylib::RaylibHandle>()
            .get_frame_time();
        update_world_time(&mut world, dt);

        update.run(&mut world);

        world.clear_trackers(); // Clear changed components for next frame

        if matches!(world.resource::<GameState>().get(), GameStates::Quitting) {
            break;
        }
    }

    // Textures must be unloaded while the window still exists.
    if let Some(mut textures) = world.remove_resource::<TextureStore>() {
        textures.clear();
    }
    log::info!("Bye");
}
