//! Event types and observers used by the game.
//!
//! Events provide a decoupled way for systems to communicate without direct
//! dependencies.
//!
//! Submodules:
//! - [`collision`] – entity overlap notifications
//! - [`gamestate`] – state transition notifications for the high-level game flow
//! - [`room`] – room entry, spawning and despawning room-local entities
//! - [`switchdebug`] – toggle debug rendering and diagnostics on/off
pub mod collision;
pub mod gamestate;
pub mod room;
pub mod switchdebug;
