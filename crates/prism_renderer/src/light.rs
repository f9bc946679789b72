use glam::{Mat4, Vec3};
use prism_scene::{NodeId, NodeKind, SceneGraph};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionalUniform {
    pub direction: [f32; 3], // Points from the light towards the scene
    pub color: [f32; 4],     // .w = intensity
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointUniform {
    pub position: [f32; 3],
    pub color: [f32; 4], // .w = intensity
    pub range: f32,      // 0 = unbounded
    pub decay: f32,
    /// Cone axis for spot lights, zero for point lights.
    pub direction: [f32; 3],
    /// Cosine of the cone half-angle. Point lights use -1 (full sphere).
    pub cone_cos: f32,
}

/// Every light the frame sees, in world space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightUniforms {
    pub ambient: [f32; 3],
    pub directional: Vec<DirectionalUniform>,
    pub points: Vec<PointUniform>,
}

impl LightUniforms {
    pub fn count(&self) -> usize {
        self.directional.len() + self.points.len()
    }

    /// Folds one node placed at `world` into the set. Non-light nodes are
    /// ignored.
    pub fn push(&mut self, scene: &SceneGraph, kind: &NodeKind, world: Mat4) {
        let position = world.transform_point3(Vec3::ZERO);

        match kind {
            NodeKind::AmbientLight { color, intensity } => self.add_ambient(*color * *intensity),
            NodeKind::HemisphereLight {
                sky_color,
                ground_color,
                intensity,
            } => {
                // No surface normals here, so split the difference
                self.add_ambient((*sky_color + *ground_color) * 0.5 * *intensity);
            }
            NodeKind::DirectionalLight { color, intensity } => {
                // Directional lights aim at the origin
                let direction = (-position).try_normalize().unwrap_or(Vec3::NEG_Y);
                self.directional.push(DirectionalUniform {
                    direction: direction.to_array(),
                    color: color.extend(*intensity).to_array(),
                });
            }
            NodeKind::PointLight {
                color,
                intensity,
                distance,
                decay,
            } => self.points.push(PointUniform {
                position: position.to_array(),
                color: color.extend(*intensity).to_array(),
                range: *distance,
                decay: *decay,
                direction: [0.0; 3],
                cone_cos: -1.0,
            }),
            NodeKind::SpotLight(light) => {
                // Untargeted spot lights aim at the origin
                let target = light
                    .target
                    .map_or(Vec3::ZERO, |id| world_matrix(scene, id).transform_point3(Vec3::ZERO));
                let direction = (target - position).try_normalize().unwrap_or(Vec3::NEG_Y);

                self.points.push(PointUniform {
                    position: position.to_array(),
                    color: light.color.extend(light.intensity).to_array(),
                    range: light.distance,
                    decay: light.decay,
                    direction: direction.to_array(),
                    cone_cos: light.angle.cos(),
                });
            }
            _ => {}
        }
    }

    fn add_ambient(&mut self, color: Vec3) {
        self.ambient = (Vec3::from_array(self.ambient) + color).to_array();
    }
}

/// World matrix of one node, composed from its ancestors' local matrices.
pub fn world_matrix(scene: &SceneGraph, id: NodeId) -> Mat4 {
    let mut matrix = Mat4::IDENTITY;
    let mut current = Some(id);
    while let Some(node) = current.and_then(|id| scene.get(id)) {
        matrix = node.transform.compute_matrix() * matrix;
        current = node.parent();
    }
    matrix
}
