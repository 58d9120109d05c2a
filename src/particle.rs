//! Per-particle state.

use glam::Vec3;

/// One simulated particle.
///
/// A particle occupies a fixed slot in its emitter's pool for the pool's
/// whole life. It is mutated only by [`ParticleEmitter::update`]; the
/// renderer reads whatever the emitter last wrote, alive or not.
///
/// A particle is dead iff `lifetime < 0`. Dead particles are never removed
/// from the pool - the next `update` respawns them in place.
///
/// [`ParticleEmitter::update`]: crate::ParticleEmitter::update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// World-space location.
    pub position: Vec3,
    /// Units per second.
    pub velocity: Vec3,
    /// Reserved for per-particle forces; reset to zero at spawn.
    pub acceleration: Vec3,
    /// Per-axis visual scale. Final size is `scale * size`.
    pub scale: Vec3,
    /// Uniform visual scale multiplier.
    pub size: f32,
    /// In-plane spin around the Y axis, radians.
    pub rotation: f32,
    /// Blend opacity in `[0, 1]`.
    pub alpha: f32,
    /// RGB color, each channel in `[0, 1]`.
    pub color: Vec3,
    /// Total duration assigned at spawn, seconds.
    pub lifespan: f32,
    /// Remaining time, seconds. Negative means dead.
    pub lifetime: f32,
}

impl Particle {
    /// A dead particle (`lifetime = -1`), as pool slots start out.
    pub fn dead() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            scale: Vec3::ONE,
            size: 1.0,
            rotation: 0.0,
            alpha: 1.0,
            color: Vec3::ONE,
            lifespan: 0.0,
            lifetime: -1.0,
        }
    }

    /// Whether this particle is still alive (`lifetime >= 0`).
    ///
    /// `lifetime == 0` counts as alive; respawn triggers strictly on `< 0`.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.lifetime >= 0.0
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_particle_is_dead() {
        let p = Particle::dead();
        assert!(!p.is_alive());
        assert_eq!(p.lifetime, -1.0);
    }

    #[test]
    fn test_zero_lifetime_is_alive() {
        let p = Particle {
            lifetime: 0.0,
            ..Particle::dead()
        };
        assert!(p.is_alive());
    }
}
