use glam::{Mat4, Vec3};

/// Perspective projection parameters. `fov` is the vertical field of view
/// in degrees, as scene files write it.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    pub up: Vec3,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov: 60.0,
            aspect_ratio: 16.0 / 9.0, // Standard monitor
            near: 0.2,
            far: 10000.0,
            up: Vec3::Y,
        }
    }
}

impl PerspectiveCamera {
    /// Computes the "Projection Matrix" (View -> Clip)
    pub fn compute_projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect_ratio, self.near, self.far)
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }
}
