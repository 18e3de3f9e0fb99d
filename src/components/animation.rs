//! Per-entity animation state with request priorities.
//!
//! Several modules may want to pick the animation in the same frame (walking
//! while falling, for instance). The module runner calls
//! [`Animation::reset_request`] before the chain runs; each module then calls
//! [`Animation::request`] and only a strictly higher priority replaces the
//! current request. The animation system applies the winner.

use bevy_ecs::prelude::Component;

/// Clips every animated entity may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimKey {
    Idle,
    Walk,
    Run,
    Jump,
    Fall,
}

impl AnimKey {
    /// Default priority of each clip.
    pub fn priority(self) -> u8 {
        match self {
            AnimKey::Idle => 0,
            AnimKey::Walk => 1,
            AnimKey::Run => 2,
            AnimKey::Jump | AnimKey::Fall => 3,
        }
    }
}

#[derive(Debug, Clone, Component)]
pub struct Animation {
    /// Clip set in the [`AnimationStore`](crate::resources::animationstore::AnimationStore).
    pub set: String,
    pub current: AnimKey,
    pub frame_index: usize,
    pub elapsed_time: f32,
    requested: AnimKey,
    priority: u8,
}

impl Animation {
    pub fn new(set: impl Into<String>) -> Self {
        Self {
            set: set.into(),
            current: AnimKey::Idle,
            frame_index: 0,
            elapsed_time: 0.0,
            requested: AnimKey::Idle,
            priority: 0,
        }
    }

    /// Back to idle at priority 0.
    pub fn reset_request(&mut self) {
        self.requested = AnimKey::Idle;
        self.priority = 0;
    }

    /// Ask for `key`. Returns whether the request won.
    pub fn request(&mut self, key: AnimKey, priority: u8) -> bool {
        if priority > self.priority {
            self.requested = key;
            self.priority = priority;
            true
        } else {
            false
        }
    }

    pub fn requested(&self) -> AnimKey {
        self.requested
    }

    /// Switch to the requested clip, restarting playback if it changed.
    pub fn apply_request(&mut self) -> bool {
        if self.current == self.requested {
            return false;
        }
        self.current = self.requested;
        self.frame_index = 0;
        self.elapsed_time = 0.0;
        true
    }
}
