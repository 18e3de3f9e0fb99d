//! Behavior modules composed into an ordered chain per entity.
//!
//! A [`ModuleChain`] is a list of [`Module`]s run in registration order once
//! per frame by [`run_modules`](crate::systems::modules::run_modules). Each
//! module reads the entity's [`Intent`] and shares the velocity, the
//! [`MotionState`] flags and the [`Animation`] request through a
//! [`ModuleContext`].
//!
//! Some modules read flags written earlier in the same frame by another
//! module. [`Sprint`] needs the direction flags and `max_speed` set by
//! [`Movement`], so it declares Movement as a requirement and
//! [`ModuleChain::new`] rejects chains where Movement is missing or comes
//! later.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;
use smallvec::SmallVec;
use thiserror::Error;

use crate::components::animation::{AnimKey, Animation};
use crate::components::intent::Intent;
use crate::components::motionstate::MotionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Movement,
    Jump,
    Sprint,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleOrderError {
    #[error("{module:?} requires {missing:?} to be registered before it")]
    MissingRequirement {
        module: ModuleKind,
        missing: ModuleKind,
    },
    #[error("{0:?} is registered twice")]
    Duplicate(ModuleKind),
}

/// Everything a module may touch for one entity during one frame.
pub struct ModuleContext<'a> {
    /// Frame duration in seconds.
    pub delta: f32,
    pub intent: &'a Intent,
    pub velocity: &'a mut Vector2,
    pub motion: &'a mut MotionState,
    pub animation: Option<&'a mut Animation>,
}

impl ModuleContext<'_> {
    pub fn request_animation(&mut self, key: AnimKey) {
        if let Some(animation) = self.animation.as_deref_mut() {
            animation.request(key, key.priority());
        }
    }
}

pub trait EntityModule {
    fn kind(&self) -> ModuleKind;

    /// Modules that must run earlier in the same chain.
    fn requires(&self) -> &'static [ModuleKind] {
        &[]
    }

    fn update(&mut self, ctx: &mut ModuleContext);
}

/// Move `value` toward `target` by at most `step`.
fn approach(value: f32, target: f32, step: f32) -> f32 {
    if value < target {
        (value + step).min(target)
    } else {
        (value - step).max(target)
    }
}

/// Horizontal walking: accelerate toward the held direction up to
/// `max_speed`, decelerate to a stop when no direction is held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    pub accel: f32,
    pub max_speed: f32,
    pub decel: f32,
}

impl EntityModule for Movement {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Movement
    }

    fn update(&mut self, ctx: &mut ModuleContext) {
        let left = ctx.intent.left && !ctx.intent.right;
        let right = ctx.intent.right && !ctx.intent.left;
        ctx.motion.moving_left = left;
        ctx.motion.moving_right = right;
        ctx.motion.max_speed = self.max_speed;

        let dt = ctx.delta;
        if left || right {
            let dir = if left { -1.0 } else { 1.0 };
            ctx.motion.facing_left = left;
            let vx = ctx.velocity.x + dir * self.accel * dt;
            ctx.velocity.x = vx.clamp(-self.max_speed, self.max_speed);
            ctx.request_animation(AnimKey::Walk);
        } else {
            ctx.velocity.x = approach(ctx.velocity.x, 0.0, self.decel * dt);
        }
    }
}

/// Gravity and jumping. A jump starts only from the ground; releasing the
/// key while still rising keeps `cut` of the upward speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jump {
    pub speed: f32,
    pub gravity: f32,
    pub cut: f32,
    pub max_fall: f32,
}

impl EntityModule for Jump {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Jump
    }

    fn update(&mut self, ctx: &mut ModuleContext) {
        let motion = &mut *ctx.motion;
        let velocity = &mut *ctx.velocity;

        if ctx.intent.jump_pressed && motion.grounded {
            velocity.y = -self.speed;
            motion.jumping = true;
            motion.grounded = false;
        } else if motion.jumping && !ctx.intent.jump_held && velocity.y < 0.0 {
            velocity.y *= self.cut;
            motion.jumping = false;
        }

        velocity.y = (velocity.y + self.gravity * ctx.delta).min(self.max_fall);
        if velocity.y >= 0.0 {
            motion.jumping = false;
        }

        if !motion.grounded {
            let key = if velocity.y < 0.0 {
                AnimKey::Jump
            } else {
                AnimKey::Fall
            };
            ctx.request_animation(key);
        }
    }
}

/// Running: while the sprint key is held and the entity keeps moving in its
/// direction, the horizontal speed becomes `max_speed * factor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprint {
    pub factor: f32,
}

impl EntityModule for Sprint {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Sprint
    }

    fn requires(&self) -> &'static [ModuleKind] {
        &[ModuleKind::Movement]
    }

    fn update(&mut self, ctx: &mut ModuleContext) {
        let run_speed = ctx.motion.max_speed * self.factor;
        let vx = ctx.velocity.x;
        let sprinting = ctx.intent.sprint
            && ((vx > 0.0 && ctx.motion.moving_right) || (vx < 0.0 && ctx.motion.moving_left));

        ctx.motion.sprinting = sprinting;
        if sprinting {
            ctx.velocity.x = run_speed.copysign(vx);
            ctx.request_animation(AnimKey::Run);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Module {
    Movement(Movement),
    Jump(Jump),
    Sprint(Sprint),
}

impl EntityModule for Module {
    fn kind(&self) -> ModuleKind {
        match self {
            Module::Movement(m) => m.kind(),
            Module::Jump(m) => m.kind(),
            Module::Sprint(m) => m.kind(),
        }
    }

    fn requires(&self) -> &'static [ModuleKind] {
        match self {
            Module::Movement(m) => m.requires(),
            Module::Jump(m) => m.requires(),
            Module::Sprint(m) => m.requires(),
        }
    }

    fn update(&mut self, ctx: &mut ModuleContext) {
        match self {
            Module::Movement(m) => m.update(ctx),
            Module::Jump(m) => m.update(ctx),
            Module::Sprint(m) => m.update(ctx),
        }
    }
}

impl From<Movement> for Module {
    fn from(m: Movement) -> Self {
        Module::Movement(m)
    }
}

impl From<Jump> for Module {
    fn from(m: Jump) -> Self {
        Module::Jump(m)
    }
}

impl From<Sprint> for Module {
    fn from(m: Sprint) -> Self {
        Module::Sprint(m)
    }
}

/// Ordered, validated list of modules.
#[derive(Component, Debug, Clone)]
pub struct ModuleChain {
    modules: SmallVec<[Module; 3]>,
}

impl ModuleChain {
    /// Build a chain, checking that every requirement is registered earlier
    /// and that no kind appears twice.
    pub fn new(modules: impl IntoIterator<Item = Module>) -> Result<Self, ModuleOrderError> {
        let modules: SmallVec<[Module; 3]> = modules.into_iter().collect();
        for (index, module) in modules.iter().enumerate() {
            let earlier = &modules[..index];
            if earlier.iter().any(|m| m.kind() == module.kind()) {
                return Err(ModuleOrderError::Duplicate(module.kind()));
            }
            for &required in module.requires() {
                if !earlier.iter().any(|m| m.kind() == required) {
                    return Err(ModuleOrderError::MissingRequirement {
                        module: module.kind(),
                        missing: required,
                    });
                }
            }
        }
        Ok(Self { modules })
    }

    /// Run every module in order.
    pub fn update(&mut self, ctx: &mut ModuleContext) {
        for module in self.modules.iter_mut() {
            module.update(ctx);
        }
    }

    pub fn kinds(&self) -> impl Iterator<Item = ModuleKind> + '_ {
        self.modules.iter().map(|m| m.kind())
    }

    pub fn contains(&self, kind: ModuleKind) -> bool {
        self.kinds().any(|k| k == kind)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
