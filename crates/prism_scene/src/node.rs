use prism_core::{Color, Handle, camera::PerspectiveCamera};

use crate::{geometry::Geometry, graph::NodeId, material::Material};

/// What a scene node is. Everything else (transform, name, visibility,
/// user data) lives on [`crate::SceneNode`].
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Scene,
    /// Plain transform holder (`node`, and the container an `objFile`
    /// loads into).
    Group,
    PerspectiveCamera(PerspectiveCamera),
    DirectionalLight {
        color: Color,
        intensity: f32,
    },
    AmbientLight {
        color: Color,
        intensity: f32,
    },
    PointLight {
        color: Color,
        intensity: f32,
        distance: f32,
        decay: f32,
    },
    HemisphereLight {
        sky_color: Color,
        ground_color: Color,
        intensity: f32,
    },
    SpotLight(SpotLight),
    Mesh {
        geometry: Option<Geometry>,
        material: Handle<Material>,
        cast_shadow: bool,
        receive_shadow: bool,
    },
    Points {
        geometry: Option<Geometry>,
        material: Handle<Material>,
        sort_particles: bool,
    },
    Sprite {
        material: Handle<Material>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpotLight {
    pub color: Color,
    pub intensity: f32,
    pub distance: f32,
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
    pub cast_shadow: bool,
    pub shadow_map_size: u32,
    /// Node the light points at; `None` aims at the default target.
    pub target: Option<NodeId>,
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Scene => "scene",
            NodeKind::Group => "group",
            NodeKind::PerspectiveCamera(_) => "perspectiveCamera",
            NodeKind::DirectionalLight { .. } => "directionalLight",
            NodeKind::AmbientLight { .. } => "ambientLight",
            NodeKind::PointLight { .. } => "pointLight",
            NodeKind::HemisphereLight { .. } => "hemisphereLight",
            NodeKind::SpotLight(_) => "spotLight",
            NodeKind::Mesh { .. } => "mesh",
            NodeKind::Points { .. } => "points",
            NodeKind::Sprite { .. } => "sprite",
        }
    }

    pub fn material(&self) -> Option<Handle<Material>> {
        match self {
            NodeKind::Mesh { material, .. }
            | NodeKind::Points { material, .. }
            | NodeKind::Sprite { material } => Some(*material),
            _ => None,
        }
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match self {
            NodeKind::Mesh { geometry, .. } | NodeKind::Points { geometry, .. } => geometry.as_ref(),
            _ => None,
        }
    }

    pub fn as_camera(&self) -> Option<&PerspectiveCamera> {
        match self {
            NodeKind::PerspectiveCamera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn as_camera_mut(&mut self) -> Option<&mut PerspectiveCamera> {
        match self {
            NodeKind::PerspectiveCamera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn is_drawable(&self) -> bool {
        self.material().is_some()
    }
}
