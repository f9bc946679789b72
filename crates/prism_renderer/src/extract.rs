use glam::Mat4;
use prism_core::Handle;
use prism_scene::{Material, NodeId, SceneGraph};

use crate::{
    camera::CameraUniform,
    light::{LightUniforms, world_matrix},
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshUniform {
    // Moves the object from its local space into the world.
    pub model: [[f32; 4]; 4],
    // Transpose(Inverse(Model)), so non-uniform scale doesn't skew normals.
    pub normal_matrix: [[f32; 4]; 4],
}

impl MeshUniform {
    pub fn from_world(world: Mat4) -> Self {
        Self {
            model: world.to_cols_array_2d(),
            normal_matrix: world.inverse().transpose().to_cols_array_2d(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub material: Handle<Material>,
    pub uniform: MeshUniform,
}

/// Everything one frame needs, pulled out of the scene graph.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePacket {
    pub camera: Option<CameraUniform>,
    pub draws: Vec<DrawItem>,
    pub lights: LightUniforms,
}

/// Propagates world matrices (parent * local) down the visible part of the
/// scene and collects drawables and lights in traversal order. A hidden
/// node hides its whole subtree.
pub fn extract(scene: &SceneGraph, camera: NodeId) -> FramePacket {
    let mut draws = Vec::new();
    let mut lights = LightUniforms::default();

    // 1. Walk the visible tree, carrying the parent's world matrix
    let mut stack = vec![(scene.root(), Mat4::IDENTITY)];
    while let Some((id, parent_world)) = stack.pop() {
        let node = &scene[id];
        if !node.visible {
            continue;
        }

        let world = parent_world * node.transform.compute_matrix();

        if let Some(material) = node.kind.material() {
            draws.push(DrawItem {
                node: id,
                material,
                uniform: MeshUniform::from_world(world),
            });
        }
        lights.push(scene, &node.kind, world);

        stack.extend(node.children().iter().rev().map(|child| (*child, world)));
    }

    // 2. The camera may sit anywhere, hidden or not
    let camera = scene
        .get(camera)
        .and_then(|node| node.kind.as_camera())
        .map(|projection| CameraUniform::new(projection, world_matrix(scene, camera)));

    FramePacket {
        camera,
        draws,
        lights,
    }
}
