use glam::{Mat4, Vec3};
use prism_core::camera::PerspectiveCamera;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4], // View-Projection matrix
    pub position: [f32; 3],
}

impl CameraUniform {
    /// `world` is the camera node's world matrix; the view matrix is its
    /// inverse.
    pub fn new(camera: &PerspectiveCamera, world: Mat4) -> Self {
        let view = world.inverse();
        let view_proj = camera.compute_projection_matrix() * view;
        let position = world.transform_point3(Vec3::ZERO);

        Self {
            view_proj: view_proj.to_cols_array_2d(),
            position: position.to_array(),
        }
    }
}
