use bevy_ecs::prelude::Resource;

/// Simulation clock. `delta` is the scaled duration of the last frame in
/// seconds and is capped so a stalled frame does not turn into one large
/// jump.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

/// Longest frame step fed to the simulation, in seconds.
pub const MAX_DELTA: f32 = 1.0 / 20.0;

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Advance by a raw frame time.
    pub fn advance(&mut self, frame_time: f32) {
        let scaled = frame_time.max(0.0) * self.time_scale;
        self.delta = scaled.min(MAX_DELTA);
        self.elapsed += self.delta;
        self.frame_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_caps_delta() {
        let mut time = WorldTime::default();
        time.advance(0.01);
        assert_eq!(time.delta, 0.01);
        time.advance(1.0);
        assert_eq!(time.delta, MAX_DELTA);
        assert_eq!(time.frame_count, 2);
        assert!((time.elapsed - (0.01 + MAX_DELTA)).abs() < 1e-6);
    }
}
