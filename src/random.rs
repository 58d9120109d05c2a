//! Uniform random sampling primitives for particle spawning.
//!
//! All stochastic spawn attributes are drawn through a [`Sampler`], an
//! explicit random source owned by the emitter. Seeding it makes a whole
//! simulation run reproducible, which the tests rely on.
//!
//! The key primitive is [`Sampler::blend`]: a *random-weight* blend between
//! two bounds, drawing a fresh weight on every call. This is how every
//! two-bound attribute range (`color0..color1`, `scale0..scale1`, ...) is
//! resolved at spawn time - it is not a deterministic lerp.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seedable uniform random source for spawn-time sampling.
///
/// ```ignore
/// let mut sampler = Sampler::from_seed(7);
/// let size = sampler.uniform(0.1, 0.4);
/// let color = sampler.blend_vec3(Vec3::X, Vec3::Y);
/// ```
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: SmallRng,
}

impl Sampler {
    /// Create a sampler seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Create a deterministic sampler from an explicit seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform f32 in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Uniform f32 between `low` and `high`, single draw.
    ///
    /// The bounds may be given in either order; the result always lies in
    /// the closed interval they span. `uniform(a, a)` returns exactly `a`.
    #[inline]
    pub fn uniform(&mut self, low: f32, high: f32) -> f32 {
        self.unit() * (high - low) + low
    }

    /// Random-weight blend `a*k + b*(1-k)` with a fresh `k` in `[0, 1)`.
    #[inline]
    pub fn blend(&mut self, a: f32, b: f32) -> f32 {
        let k = self.unit();
        a * k + b * (1.0 - k)
    }

    /// Random-weight blend of two vectors, one shared weight per call.
    #[inline]
    pub fn blend_vec3(&mut self, a: Vec3, b: Vec3) -> Vec3 {
        let k = self.unit();
        a * k + b * (1.0 - k)
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_range() {
        let mut s = Sampler::from_seed(1);
        for _ in 0..1000 {
            let v = s.unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_uniform_degenerate_bounds() {
        let mut s = Sampler::from_seed(2);
        for _ in 0..100 {
            assert_eq!(s.uniform(2.0, 2.0), 2.0);
        }
    }

    #[test]
    fn test_uniform_reversed_bounds() {
        let mut s = Sampler::from_seed(3);
        for _ in 0..1000 {
            let v = s.uniform(5.0, 1.0);
            assert!((1.0..=5.0).contains(&v), "out of interval: {v}");
        }
    }

    #[test]
    fn test_blend_stays_within_bounds() {
        let mut s = Sampler::from_seed(4);
        for _ in 0..1000 {
            let v = s.blend(-1.0, 3.0);
            assert!((-1.0..=3.0).contains(&v));
        }
    }

    #[test]
    fn test_blend_vec3_shares_weight() {
        // Same weight on every axis: blending (0,0,0) with (1,2,3) must
        // keep the components proportional.
        let mut s = Sampler::from_seed(5);
        for _ in 0..100 {
            let v = s.blend_vec3(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
            assert!((v.y - 2.0 * v.x).abs() < 1e-5);
            assert!((v.z - 3.0 * v.x).abs() < 1e-5);
        }
    }

    #[test]
    fn test_seeded_sampler_is_deterministic() {
        let mut a = Sampler::from_seed(42);
        let mut b = Sampler::from_seed(42);
        for _ in 0..100 {
            assert_eq!(a.unit(), b.unit());
        }
    }
}
