use glam::Vec3;
use prism_core::transform::Transform;

use crate::{attrs::Attrs, error::SceneError};

/// Applies a node's `translate`, `scale` and `rotate` keys on top of
/// whatever transform the node already has.
///
/// Translation adds and scale multiplies, so the two commute. Rotation is
/// an axis-angle `[ax, ay, az, radians]` composed in local space after the
/// existing orientation, so repeated rotations accumulate.
pub fn apply_transform(attrs: &Attrs, transform: &mut Transform) -> Result<(), SceneError> {
    if let Some(translate) = attrs.vec3_opt("translate")? {
        transform.translation += translate;
    }

    if let Some(scale) = attrs.vec3_opt("scale")? {
        transform.scale *= scale;
    }

    if let Some([x, y, z, radians]) = attrs.axis_angle("rotate")? {
        match Vec3::new(x, y, z).try_normalize() {
            Some(axis) => transform.rotate_on_axis(axis, radians),
            None => attrs.malformed("rotate", "a non-zero rotation axis", ())?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use serde_json::{Value, json};
    use std::f32::consts::PI;

    fn apply(value: Value, transform: &mut Transform) -> Result<(), SceneError> {
        let Value::Object(map) = value else {
            unreachable!()
        };
        apply_transform(&Attrs::new(&map, true), transform)
    }

    #[test]
    fn translate_and_scale_accumulate() {
        let mut transform = Transform::from_xyz(1.0, 0.0, 0.0);
        apply(json!({ "translate": [1, 2, 3], "scale": [2, 2, 2] }), &mut transform).unwrap();
        apply(json!({ "scale": [1, 3, 1] }), &mut transform).unwrap();

        assert_eq!(transform.translation, Vec3::new(2.0, 2.0, 3.0));
        assert_eq!(transform.scale, Vec3::new(2.0, 6.0, 2.0));
    }

    #[test]
    fn two_quarter_turns_make_a_half_turn() {
        let mut transform = Transform::default();
        let quarter = json!({ "rotate": [0, 1, 0, 1.5708] });
        apply(quarter.clone(), &mut transform).unwrap();
        apply(quarter, &mut transform).unwrap();

        let expected = Quat::from_rotation_y(PI);
        assert!(transform.rotation.angle_between(expected) < 1e-3);
    }

    #[test]
    fn rotation_is_local() {
        let mut transform = Transform::from_rotation(Quat::from_rotation_z(PI / 2.0));
        apply(json!({ "rotate": [1, 0, 0, 1.0] }), &mut transform).unwrap();

        let expected = Quat::from_rotation_z(PI / 2.0) * Quat::from_rotation_x(1.0);
        assert!(transform.rotation.angle_between(expected) < 1e-5);
    }

    #[test]
    fn zero_axis_is_rejected_when_strict() {
        let mut transform = Transform::default();
        let err = apply(json!({ "rotate": [0, 0, 0, 1.0] }), &mut transform).unwrap_err();
        assert!(matches!(err, SceneError::InvalidAttribute { .. }));

        let Value::Object(map) = json!({ "rotate": [0, 0, 0, 1.0] }) else {
            unreachable!()
        };
        apply_transform(&Attrs::new(&map, false), &mut transform).unwrap();
        assert_eq!(transform, Transform::default());
    }
}
