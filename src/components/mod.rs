//! ECS components for entities.
//!
//! Submodules overview:
//! - [`animation`] – playback state and prioritized clip requests
//! - [`boxcollider`] – centered axis-aligned collider
//! - [`intent`] – what an entity wants to do this frame
//! - [`mapposition`] – world-space position (center) of an entity
//! - [`modules`] – ordered behavior modules (movement, jump, sprint)
//! - [`motionstate`] – movement flags shared between modules and collision
//! - [`patrol`] – walk-and-turn behavior state
//! - [`persistent`] – marker for engine entities that are never despawned
//! - [`player`] – marker for the player entity
//! - [`rigidbody`] – velocity and freeze flag
//! - [`roomlocal`] – ties an entity to the room that spawned it
//! - [`sprite`] – sprite sheet frame and size
//! - [`zindex`] – rendering order hint for 2D drawing

pub mod animation;
pub mod boxcollider;
pub mod intent;
pub mod mapposition;
pub mod modules;
pub mod motionstate;
pub mod patrol;
pub mod persistent;
pub mod player;
pub mod rigidbody;
pub mod roomlocal;
pub mod sprite;
pub mod zindex;
