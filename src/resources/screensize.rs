//! Game resolution resource.
//!
//! Stores the internal game resolution in pixels. Camera bounds and tile
//! culling are computed against this size; the window may be larger and is
//! scaled at draw time.

use bevy_ecs::prelude::Resource;

/// Game resolution in pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl ScreenSize {
    /// Uniform scale that fits this resolution inside a window.
    pub fn zoom_for_window(&self, window_w: i32, window_h: i32) -> f32 {
        let zx = window_w as f32 / self.w.max(1) as f32;
        let zy = window_h as f32 / self.h.max(1) as f32;
        zx.min(zy).max(f32::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_fits_smallest_axis() {
        let screen = ScreenSize { w: 640, h: 360 };
        assert_eq!(screen.zoom_for_window(1280, 720), 2.0);
        assert_eq!(screen.zoom_for_window(1280, 1080), 2.0);
        assert_eq!(screen.zoom_for_window(640, 360), 1.0);
    }
}
