//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: the level data, input state, timing,
//! and asset stores. Each submodule documents the semantics and intended
//! usage of its resource(s).
//!
//! Overview
//! - `animationstore` – clip definitions for sprite animations, grouped by set
//! - `camera` – viewport offset clamped to the active room
//! - `debugmode` – presence toggles optional debug overlays and logs
//! - `gameconfig` – INI-backed window, level and player tuning settings
//! - `gamestate` – authoritative and pending high-level game state
//! - `input` – per-frame keyboard state of keys relevant to the game
//! - `layer`, `tileset`, `room` – level building blocks
//! - `levelloader` – JSON level manifest and room loading
//! - `screensize` – internal game resolution in pixels
//! - `systemsstore` – one-shot systems run on state changes
//! - `texturestore` – loaded textures keyed by string IDs
//! - `tilemap` – rooms, the active room and pending room changes
//! - `worldtime` – simulation time and delta
pub mod animationstore;
pub mod camera;
pub mod debugmode;
pub mod gameconfig;
pub mod gamestate;
pub mod input;
pub mod layer;
pub mod levelloader;
pub mod room;
pub mod screensize;
pub mod systemsstore;
pub mod texturestore;
pub mod tilemap;
pub mod tileset;
pub mod worldtime;
