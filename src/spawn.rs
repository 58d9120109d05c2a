//! Spawn distributions: where a respawned particle appears.
//!
//! A [`SpawnShape`] turns an emitter origin into a spawn position by
//! sampling an offset on the horizontal (x, z) plane. Offsets are relative;
//! the emitter adds its own `position`.
//!
//! # Shapes
//!
//! | Shape | Distribution |
//! |-------|--------------|
//! | [`SpawnShape::Point`] | Exactly the origin |
//! | [`SpawnShape::Disc`] | Uniform per unit *area* inside a disc |
//! | [`SpawnShape::Rectangle`] | Uniform inside a centered rectangle |
//!
//! # Example
//!
//! ```ignore
//! emitter.spawn_shape = SpawnShape::Disc { radius: 0.5 };
//! ```

use std::f32::consts::TAU;

use glam::Vec3;

use crate::random::Sampler;

/// Shape-parameterized spawn position distribution.
///
/// Negative shape parameters are treated as zero; a sample is never NaN.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SpawnShape {
    /// Every particle spawns exactly at the emitter origin.
    #[default]
    Point,

    /// Uniform-by-area disc on the horizontal plane, y = 0.
    Disc {
        /// Disc radius.
        radius: f32,
    },

    /// Uniform axis-aligned rectangle on the horizontal plane, y = 0.
    Rectangle {
        /// Extent along x; samples satisfy `|x| <= width / 2`.
        width: f32,
        /// Extent along z; samples satisfy `|z| <= height / 2`.
        height: f32,
    },
}

impl SpawnShape {
    /// Sample an offset from the emitter origin.
    ///
    /// Disc sampling scales the radius by `sqrt(k)` so density is uniform
    /// per unit area; a plain uniform radius would pile samples up near
    /// the center.
    pub fn sample(&self, sampler: &mut Sampler) -> Vec3 {
        match *self {
            SpawnShape::Point => Vec3::ZERO,

            SpawnShape::Disc { radius } => {
                let radius = radius.max(0.0);
                let r = radius * sampler.unit().sqrt();
                let angle = sampler.uniform(0.0, TAU);
                Vec3::new(r * angle.cos(), 0.0, r * angle.sin())
            }

            SpawnShape::Rectangle { width, height } => {
                let half_w = (width.max(0.0)) * 0.5;
                let half_h = (height.max(0.0)) * 0.5;
                Vec3::new(
                    sampler.uniform(-half_w, half_w),
                    0.0,
                    sampler.uniform(-half_h, half_h),
                )
            }
        }
    }
}
