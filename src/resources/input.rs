//! Per-frame keyboard input resource.
//!
//! Captures the keys the platformer reacts to and exposes them to systems via
//! the [`InputState`] resource. Movement uses the arrow keys with A/D as
//! alternates, jump is Space and sprint is Left Shift.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

#[derive(Debug, Clone, Copy)]
/// Boolean key state with its keyboard bindings.
pub struct BoolState {
    /// Whether the key is currently held this frame.
    pub active: bool,
    /// Whether the key went down this frame.
    pub just_pressed: bool,
    /// Whether the key went up this frame.
    pub just_released: bool,

    /// The key bound to this action.
    pub key_binding: KeyboardKey,
    /// Optional second key for the same action.
    pub alt_binding: KeyboardKey,
}

impl Default for BoolState {
    fn default() -> Self {
        Self::bound(KeyboardKey::KEY_NULL)
    }
}

impl BoolState {
    /// Inactive state bound to `key`.
    pub fn bound(key: KeyboardKey) -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding: key,
            alt_binding: KeyboardKey::KEY_NULL,
        }
    }

    pub fn with_alt(mut self, key: KeyboardKey) -> Self {
        self.alt_binding = key;
        self
    }

    /// Feed whether any binding is down this frame and derive the edges.
    pub fn update(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
    }
}

/// Resource capturing the per-frame keyboard state relevant to gameplay.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub move_left: BoolState,
    pub move_right: BoolState,
    pub jump: BoolState,
    pub sprint: BoolState,
    pub pause: BoolState,
    pub quit: BoolState,
    pub mode_debug: BoolState,
    /// Debug only: move the collision layer.
    pub layer_up: BoolState,
    pub layer_down: BoolState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            move_left: BoolState::bound(KeyboardKey::KEY_LEFT).with_alt(KeyboardKey::KEY_A),
            move_right: BoolState::bound(KeyboardKey::KEY_RIGHT).with_alt(KeyboardKey::KEY_D),
            jump: BoolState::bound(KeyboardKey::KEY_SPACE).with_alt(KeyboardKey::KEY_UP),
            sprint: BoolState::bound(KeyboardKey::KEY_LEFT_SHIFT),
            pause: BoolState::bound(KeyboardKey::KEY_P),
            quit: BoolState::bound(KeyboardKey::KEY_ESCAPE),
            mode_debug: BoolState::bound(KeyboardKey::KEY_F11),
            layer_up: BoolState::bound(KeyboardKey::KEY_PAGE_UP),
            layer_down: BoolState::bound(KeyboardKey::KEY_PAGE_DOWN),
        }
    }
}

impl InputState {
    /// All actions, for polling.
    pub fn actions_mut(&mut self) -> [&mut BoolState; 9] {
        [
            &mut self.move_left,
            &mut self.move_right,
            &mut self.jump,
            &mut self.sprint,
            &mut self.pause,
            &mut self.quit,
            &mut self.mode_debug,
            &mut self.layer_up,
            &mut self.layer_down,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolstate_default() {
        let bs = BoolState::default();
        assert!(!bs.active);
        assert!(!bs.just_pressed);
        assert!(!bs.just_released);
        assert_eq!(bs.key_binding, KeyboardKey::KEY_NULL);
        assert_eq!(bs.alt_binding, KeyboardKey::KEY_NULL);
    }

    #[test]
    fn test_boolstate_edges() {
        let mut bs = BoolState::bound(KeyboardKey::KEY_SPACE);
        bs.update(true);
        assert!(bs.active && bs.just_pressed && !bs.just_released);
        bs.update(true);
        assert!(bs.active && !bs.just_pressed);
        bs.update(false);
        assert!(!bs.active && bs.just_released);
        bs.update(false);
        assert!(!bs.just_released);
    }

    #[test]
    fn test_inputstate_default_key_bindings() {
        let input = InputState::default();
        assert_eq!(input.move_left.key_binding, KeyboardKey::KEY_LEFT);
        assert_eq!(input.move_left.alt_binding, KeyboardKey::KEY_A);
        assert_eq!(input.move_right.key_binding, KeyboardKey::KEY_RIGHT);
        assert_eq!(input.jump.key_binding, KeyboardKey::KEY_SPACE);
        assert_eq!(input.sprint.key_binding, KeyboardKey::KEY_LEFT_SHIFT);
        assert_eq!(input.mode_debug.key_binding, KeyboardKey::KEY_F11);
    }

    #[test]
    fn test_inputstate_default_all_inactive() {
        let mut input = InputState::default();
        assert!(input.actions_mut().iter().all(|a| !a.active));
    }
}
