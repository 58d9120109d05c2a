//! Orbit camera for the demo viewport.

use glam::{Mat4, Vec3};

/// Orbit camera: yaw/pitch around a target point at a fixed distance,
/// with a perspective projection.
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
}

impl Camera {
    /// Create a camera with default positioning.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.3,
            distance: 6.0,
            target: Vec3::ZERO,
            fov_y: 45.0_f32.to_radians(),
            near: 0.1,
            far: 100.0,
        }
    }

    /// The camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// View matrix looking at the target.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Combined view-projection matrix for the given aspect ratio.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far) * self.view_matrix()
    }

    /// Apply a mouse drag, clamping pitch short of the poles.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(-1.5, 1.5);
    }

    /// Apply a scroll-wheel zoom.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance - scroll * 0.3).clamp(0.5, 50.0);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
