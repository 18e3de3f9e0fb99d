use bevy_ecs::prelude::Component;

/// Walk in one direction until blocked, wait `pause` seconds, then walk the
/// other way.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Patrol {
    pub going_left: bool,
    /// Seconds to wait after turning before walking again.
    pub pause: f32,
    pub timer: f32,
}

impl Patrol {
    pub fn new(going_left: bool) -> Self {
        Self {
            going_left,
            pause: 0.4,
            timer: 0.0,
        }
    }
}
