//! # plume - an educational particle playground
//!
//! A CPU-side particle simulation kept in lockstep with a GPU instance
//! buffer, drawn with one instanced draw call per frame.
//!
//! ## Quick Start
//!
//! ```ignore
//! use plume::prelude::*;
//!
//! let mut emitter = ParticleEmitter::new(500);
//! emitter.spawn_shape = SpawnShape::Disc { radius: 0.3 };
//! emitter.velocity = Vec3::new(0.0, 2.5, 0.0);
//! emitter.gravity = Vec3::new(0.0, -1.0, 0.0);
//! emitter.color0 = Vec3::new(1.0, 0.3, 0.05);
//! emitter.color1 = Vec3::new(1.0, 0.8, 0.2);
//! emitter.lifespan0 = 1.0;
//! emitter.lifespan1 = 3.0;
//!
//! // Per frame, in the driver loop:
//! let dt = time.update();
//! emitter.update(dt);
//! renderer.prepare(&queue, &emitter);
//! // ... begin a render pass ...
//! renderer.draw(&mut render_pass);
//! ```
//!
//! ## Core Concepts
//!
//! ### Fixed pool, in-place respawn
//!
//! A [`ParticleEmitter`] owns exactly `capacity` particle slots for its
//! whole life. Slots are never added, removed or reordered; an expired
//! particle is respawned in place on the next [`ParticleEmitter::update`].
//! The hot per-frame path never allocates.
//!
//! ### Two-bound random ranges
//!
//! Every stochastic spawn attribute is a pair of bounds (`color0`/`color1`,
//! `lifespan0`/`lifespan1`, ...). At spawn time the pair is resolved with a
//! freshly drawn random weight via [`Sampler::blend`] or
//! [`Sampler::uniform`] - never a fixed interpolation parameter.
//!
//! ### Spawn shapes
//!
//! [`SpawnShape`] decides where a respawned particle appears relative to
//! the emitter origin: a point, an area-uniform disc, or a rectangle, all
//! on the horizontal plane.
//!
//! ### Renderer as read-only projection
//!
//! [`InstancedParticleRenderer`] rebuilds per-instance transform and color
//! buffers from the pool each frame and issues a single instanced draw of
//! a fixed quad. It draws every slot - dead particles included - and never
//! mutates particle state. The emitter is the sole source of truth.
//!
//! The update/draw relationship is strictly sequential and single
//! threaded: `update` completes before `prepare` reads the pool, by
//! ordinary call order in the frame loop.

mod emitter;
pub mod error;
mod gpu;
mod particle;
mod random;
mod spawn;
pub mod time;

pub use emitter::ParticleEmitter;
pub use glam::{Vec2, Vec3, Vec4};
pub use gpu::{
    instance_color, instance_transform, write_instances, Camera, GpuContext,
    InstancedParticleRenderer, ParticleShape, Uniforms, DEPTH_FORMAT, SHADER_SOURCE,
};
pub use particle::Particle;
pub use random::Sampler;
pub use spawn::SpawnShape;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use plume::prelude::*;
/// ```
pub mod prelude {
    pub use crate::emitter::ParticleEmitter;
    pub use crate::gpu::{Camera, GpuContext, InstancedParticleRenderer, ParticleShape};
    pub use crate::particle::Particle;
    pub use crate::random::Sampler;
    pub use crate::spawn::SpawnShape;
    pub use crate::time::Time;
    pub use crate::{Vec2, Vec3, Vec4};
}
