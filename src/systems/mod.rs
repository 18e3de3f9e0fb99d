//! Engine systems.
//!
//! This module groups all ECS systems that advance simulation, input, and
//! rendering.
//!
//! Submodules overview
//! - [`animation`] – switch to requested clips and advance sprite frames
//! - [`camera`] – keep the camera centered on the player
//! - [`collision`] – entity overlap checks and event emission
//! - [`gamestate`] – check for pending state transitions and trigger events
//! - [`input`] – read hardware input and handle global keys
//! - [`modules`] – run each entity's module chain
//! - [`patrol`] – turn-at-walls behavior for room entities
//! - [`playercontroller`] – translate input state into the player's intent
//! - [`render`] – draw tile layers, sprites and debug overlays using Raylib
//! - [`roomtransition`] – detect room exits and apply room changes
//! - [`tilecollision`] – integrate velocities against the tile grid
//! - [`time`] – update simulation time and delta

pub mod animation;
pub mod camera;
pub mod collision;
pub mod gamestate;
pub mod input;
pub mod modules;
pub mod patrol;
pub mod playercontroller;
pub mod render;
pub mod roomtransition;
pub mod tilecollision;
pub mod time;
