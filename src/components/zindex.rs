//! Z-index component for render ordering.
//!
//! Entities are drawn between the back and front tile layers; within that
//! pass, higher z-index values are drawn on top.

use bevy_ecs::prelude::Component;

/// Rendering order hint among entities. Higher values are drawn later.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ZIndex(pub i32);
