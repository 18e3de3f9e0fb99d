//! Growth platformer library.
//!
//! Exposes the ECS components, resources, systems and events so integration
//! tests can drive the game without a window.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
