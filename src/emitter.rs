//! Particle emitters: fixed pools with in-place respawn.
//!
//! An emitter owns a pool of exactly `capacity` particles, allocated once
//! and never resized. Every [`update`](ParticleEmitter::update) walks every
//! slot: live particles integrate, expired particles respawn in place with
//! freshly sampled attributes. Slot index is stable identity for the whole
//! life of the pool, and the hot path never allocates.
//!
//! Every stochastic attribute is configured as a two-bound range
//! (`color0..color1`, `lifespan0..lifespan1`, ...). At spawn time each
//! range is resolved with a fresh random weight, so no two particles look
//! alike unless the bounds coincide.
//!
//! # Example
//!
//! ```ignore
//! let mut emitter = ParticleEmitter::new(500);
//! emitter.spawn_shape = SpawnShape::Disc { radius: 0.3 };
//! emitter.velocity = Vec3::new(0.0, 2.0, 0.0);
//! emitter.gravity = Vec3::new(0.0, -9.8, 0.0);
//! emitter.lifespan0 = 1.0;
//! emitter.lifespan1 = 3.0;
//!
//! // Per frame:
//! emitter.update(time.delta());
//! ```

use glam::Vec3;

use crate::particle::Particle;
use crate::random::Sampler;
use crate::spawn::SpawnShape;

/// Owner and updater of a fixed pool of particles.
///
/// All distribution parameters are plain public fields so a driver (or a
/// debug panel) can retune them live between frames. The pool itself is
/// only reachable read-only through [`particles`](Self::particles); only
/// `update` mutates it.
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    /// Current spawn origin. Move it to attach the emitter to a moving
    /// source; already-spawned particles keep their world positions.
    pub position: Vec3,

    /// Lower color bound (RGB).
    pub color0: Vec3,
    /// Upper color bound (RGB).
    pub color1: Vec3,

    /// Base velocity given to every spawned particle.
    pub velocity: Vec3,
    /// Lower bound of the per-axis random velocity offset.
    pub delta_velocity0: Vec3,
    /// Upper bound of the per-axis random velocity offset.
    pub delta_velocity1: Vec3,

    /// Acceleration applied to every live particle each tick.
    pub gravity: Vec3,

    /// Lower lifespan bound, seconds.
    pub lifespan0: f32,
    /// Upper lifespan bound, seconds.
    pub lifespan1: f32,

    /// Lower uniform-size bound.
    pub size0: f32,
    /// Upper uniform-size bound.
    pub size1: f32,

    /// Lower per-axis scale bound.
    pub scale0: Vec3,
    /// Upper per-axis scale bound.
    pub scale1: Vec3,

    /// Lower spin bound, radians.
    pub rotation0: f32,
    /// Upper spin bound, radians.
    pub rotation1: f32,

    /// Lower opacity bound.
    pub alpha0: f32,
    /// Upper opacity bound.
    pub alpha1: f32,

    /// Where respawned particles appear relative to `position`.
    pub spawn_shape: SpawnShape,

    /// Driver-facing render toggle. Does not gate `update`; an inactive
    /// emitter keeps simulating so it is warm when re-enabled.
    pub active: bool,

    particles: Vec<Particle>,
    sampler: Sampler,
}

impl ParticleEmitter {
    /// Create an emitter with `capacity` slots, all dead, seeded from
    /// system entropy.
    pub fn new(capacity: usize) -> Self {
        Self::with_sampler(capacity, Sampler::new())
    }

    /// Create a deterministic emitter for reproducible runs and tests.
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_sampler(capacity, Sampler::from_seed(seed))
    }

    fn with_sampler(capacity: usize, sampler: Sampler) -> Self {
        Self {
            position: Vec3::ZERO,
            color0: Vec3::ONE,
            color1: Vec3::ONE,
            velocity: Vec3::ZERO,
            delta_velocity0: Vec3::ZERO,
            delta_velocity1: Vec3::ZERO,
            gravity: Vec3::ZERO,
            lifespan0: 1.0,
            lifespan1: 1.0,
            size0: 1.0,
            size1: 1.0,
            scale0: Vec3::ONE,
            scale1: Vec3::ONE,
            rotation0: 0.0,
            rotation1: 0.0,
            alpha0: 1.0,
            alpha1: 1.0,
            spawn_shape: SpawnShape::Point,
            active: true,
            particles: vec![Particle::dead(); capacity],
            sampler,
        }
    }

    /// Number of pool slots. Fixed at construction.
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the pool has zero slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Read-only view of the pool, in stable slot order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Each slot first loses `dt` of lifetime, then branches on the new
    /// value: expired slots respawn with fresh attributes (exactly once
    /// per call, however large `dt` is), live slots integrate position and
    /// velocity. The decrement-then-branch order means a particle's final
    /// alive tick before death does not move; that quirk is deliberate and
    /// pinned by tests.
    ///
    /// `update(0.0)` moves nothing but still respawns slots that were
    /// already dead going in.
    pub fn update(&mut self, dt: f32) {
        for i in 0..self.particles.len() {
            let mut particle = self.particles[i];
            particle.lifetime -= dt;
            if particle.lifetime < 0.0 {
                self.spawn(&mut particle);
            } else {
                particle.position += particle.velocity * dt;
                particle.velocity += self.gravity * dt;
            }
            self.particles[i] = particle;
        }
    }

    /// Reinitialize one slot with freshly sampled attributes.
    fn spawn(&mut self, particle: &mut Particle) {
        let sampler = &mut self.sampler;
        particle.color = sampler.blend_vec3(self.color0, self.color1);
        particle.scale = sampler.blend_vec3(self.scale0, self.scale1);

        // One independent weight per axis, not one shared weight.
        let dv = Vec3::new(
            sampler.blend(self.delta_velocity0.x, self.delta_velocity1.x),
            sampler.blend(self.delta_velocity0.y, self.delta_velocity1.y),
            sampler.blend(self.delta_velocity0.z, self.delta_velocity1.z),
        );
        particle.velocity = self.velocity + dv;
        particle.acceleration = Vec3::ZERO;

        particle.size = sampler.uniform(self.size0, self.size1);
        particle.rotation = sampler.uniform(self.rotation0, self.rotation1);
        particle.alpha = sampler.uniform(self.alpha0, self.alpha1);

        particle.position = self.position + self.spawn_shape.sample(sampler);

        particle.lifespan = sampler.uniform(self.lifespan0, self.lifespan1);
        particle.lifetime = particle.lifespan;
    }
}
