use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vec3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    /// Rotates around an axis expressed in local space.
    /// The axis must already be normalized.
    pub fn rotate_on_axis(&mut self, axis: Vec3, angle_radians: f32) {
        let rotation = Quat::from_axis_angle(axis, angle_radians);
        self.rotation = self.rotation * rotation;
    }

    /// Rotates the object around the Y axis (Global Up)
    pub fn rotate_y(&mut self, angle_radians: f32) {
        let rotation = Quat::from_rotation_y(angle_radians);
        self.rotation = rotation * self.rotation;
    }

    /// Points -Z at `target`, keeping `up` as the vertical reference.
    ///
    /// Leaves the rotation untouched when the target sits on the eye or
    /// `up` is parallel to the view direction, since no orientation is
    /// defined there.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = target - self.translation;
        if forward.length_squared() <= f32::EPSILON || forward.cross(up).length_squared() <= f32::EPSILON {
            return;
        }

        // look_at_rh builds a view matrix (moves the world), so invert it
        // to get the object's own orientation.
        let view = Mat4::look_at_rh(self.translation, target, up);
        self.rotation = Quat::from_mat4(&view.inverse()).normalize();
    }

    pub fn looking_at(mut self, target: Vec3, up: Vec3) -> Self {
        self.look_at(target, up);
        self
    }

    // --- Matrices ---

    /// Creates the Model Matrix (Local -> Parent)
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    // --- Directions ---

    /// Returns the "Forward" direction (-Z) relative to current rotation
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Returns the "Right" direction (+X) relative to current rotation
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Returns the "Up" direction (+Y) relative to current rotation
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn look_at_points_forward_at_target() {
        let transform = Transform::from_xyz(0.0, 0.0, 100.0).looking_at(Vec3::ZERO, Vec3::Y);
        let forward = transform.forward();
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn look_at_degenerate_target_keeps_rotation() {
        let mut transform = Transform::default();
        transform.look_at(Vec3::ZERO, Vec3::Y);
        assert_eq!(transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn rotate_on_axis_is_local() {
        let mut transform = Transform::default();
        transform.rotate_on_axis(Vec3::Y, FRAC_PI_2);
        // The second turn happens about the already-rotated X axis.
        transform.rotate_on_axis(Vec3::X, FRAC_PI_2);
        assert!((transform.up() - Vec3::NEG_Z).length() > 0.5);
        assert!((transform.right() - Vec3::NEG_Z).length() < 1e-5);
    }
}
