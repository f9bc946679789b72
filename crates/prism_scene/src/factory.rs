use glam::Vec3;
use prism_core::{camera::PerspectiveCamera, transform::Transform};

use crate::{
    attrs::Attrs,
    builder::Builder,
    error::SceneError,
    geometry::{Geometry, TextParams},
    graph::{NodeId, SceneNode},
    loader::PendingKind,
    material::{Material, MaterialKind, Side},
    node::{NodeKind, SpotLight},
};

/// Outcome of a node constructor.
pub(crate) enum Construct {
    /// Attach now and walk the node's own keys.
    Ready(SceneNode),
    /// Attached later by the pending-load join.
    Deferred,
}

pub(crate) type Constructor =
    fn(&mut Builder<'_>, &Attrs<'_>, NodeId) -> Result<Construct, SceneError>;

/// Every `type` a scene file may use for a child node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Node,
    PerspectiveCamera,
    DirectionalLight,
    AmbientLight,
    PointLight,
    HemisphereLight,
    SpotLight,
    Mesh,
    Sprite,
    SkyBox,
    Text,
    ObjFile,
}

const NODE_TYPES: &[(&str, NodeType, Constructor)] = &[
    ("node", NodeType::Node, group),
    ("perspectiveCamera", NodeType::PerspectiveCamera, perspective_camera),
    ("directionalLight", NodeType::DirectionalLight, directional_light),
    ("ambientLight", NodeType::AmbientLight, ambient_light),
    ("pointLight", NodeType::PointLight, point_light),
    ("hemisphereLight", NodeType::HemisphereLight, hemisphere_light),
    ("spotLight", NodeType::SpotLight, spot_light),
    ("mesh", NodeType::Mesh, mesh),
    ("sprite", NodeType::Sprite, sprite),
    ("skyBox", NodeType::SkyBox, sky_box),
    ("text", NodeType::Text, text),
    ("objFile", NodeType::ObjFile, obj_file),
];

impl NodeType {
    pub fn from_name(name: &str) -> Option<Self> {
        NODE_TYPES
            .iter()
            .find(|(key, ..)| *key == name)
            .map(|(_, node_type, _)| *node_type)
    }

    pub fn name(self) -> &'static str {
        NODE_TYPES
            .iter()
            .find(|(_, node_type, _)| *node_type == self)
            .map_or("", |(key, ..)| *key)
    }

    pub(crate) fn constructor(self) -> Constructor {
        NODE_TYPES
            .iter()
            .find(|(_, node_type, _)| *node_type == self)
            .map(|(.., constructor)| *constructor)
            .unwrap_or(group)
    }
}

fn group(_: &mut Builder<'_>, _: &Attrs<'_>, _: NodeId) -> Result<Construct, SceneError> {
    Ok(Construct::Ready(SceneNode::new(NodeKind::Group)))
}

fn perspective_camera(
    builder: &mut Builder<'_>,
    attrs: &Attrs<'_>,
    _: NodeId,
) -> Result<Construct, SceneError> {
    // Older scene files spell `up` and `lookAt` as `vup` and `center`
    let up = match attrs.vec3_opt("up")? {
        Some(up) => up,
        None => attrs.vec3("vup", Vec3::Y)?,
    };
    let look_at = match attrs.vec3_opt("lookAt")? {
        Some(target) => target,
        None => attrs.vec3("center", Vec3::ZERO)?,
    };
    let eye = attrs.vec3("eye", Vec3::new(0.0, 0.0, 100.0))?;

    let camera = PerspectiveCamera {
        fov: attrs.f32("fov", 60.0)?,
        aspect_ratio: builder.options.aspect_ratio,
        near: attrs.f32("near", 0.2)?,
        far: attrs.f32("far", 10000.0)?,
        up,
    };

    let transform = Transform::from_translation(eye).looking_at(look_at, up);
    Ok(Construct::Ready(
        SceneNode::new(NodeKind::PerspectiveCamera(camera)).with_transform(transform),
    ))
}

fn directional_light(_: &mut Builder<'_>, attrs: &Attrs<'_>, _: NodeId) -> Result<Construct, SceneError> {
    let kind = NodeKind::DirectionalLight {
        color: attrs.color("color", Vec3::ONE)?,
        intensity: attrs.f32("intensity", 1.0)?,
    };
    let position = attrs.vec3("position", Vec3::ONE)?;
    Ok(Construct::Ready(
        SceneNode::new(kind).with_transform(Transform::from_translation(position)),
    ))
}

fn ambient_light(_: &mut Builder<'_>, attrs: &Attrs<'_>, _: NodeId) -> Result<Construct, SceneError> {
    Ok(Construct::Ready(SceneNode::new(NodeKind::AmbientLight {
        color: attrs.color("color", Vec3::ONE)?,
        intensity: attrs.f32("intensity", 1.0)?,
    })))
}

fn point_light(_: &mut Builder<'_>, attrs: &Attrs<'_>, _: NodeId) -> Result<Construct, SceneError> {
    let kind = NodeKind::PointLight {
        color: attrs.color("color", Vec3::ZERO)?,
        intensity: attrs.f32("intensity", 1.0)?,
        distance: attrs.f32("distance", 0.0)?,
        decay: attrs.f32("decay", 1.0)?,
    };
    let position = attrs.vec3("position", Vec3::ONE)?;
    Ok(Construct::Ready(
        SceneNode::new(kind).with_transform(Transform::from_translation(position)),
    ))
}

fn hemisphere_light(_: &mut Builder<'_>, attrs: &Attrs<'_>, _: NodeId) -> Result<Construct, SceneError> {
    Ok(Construct::Ready(SceneNode::new(NodeKind::HemisphereLight {
        sky_color: attrs.color("skyColor", Vec3::ZERO)?,
        ground_color: attrs.color("groundColor", Vec3::ZERO)?,
        intensity: attrs.f32("intensity", 1.0)?,
    })))
}

fn spot_light(builder: &mut Builder<'_>, attrs: &Attrs<'_>, parent: NodeId) -> Result<Construct, SceneError> {
    // Targets are looked up among what the parent already holds, so they
    // must appear earlier in the document than the light.
    let target = match attrs.str("target")? {
        Some(name) => {
            let found = builder.graph.find_in_subtree(parent, name);
            if found.is_none() {
                log::debug!("spot light target {name:?} not found; using default target");
            }
            found
        }
        None => None,
    };

    let light = SpotLight {
        color: attrs.color("color", Vec3::ZERO)?,
        intensity: attrs.f32("intensity", 1.0)?,
        distance: attrs.f32("distance", 0.0)?,
        angle: attrs.f32("angle", 0.0)?,
        penumbra: attrs.f32("penumbra", 0.0)?,
        decay: attrs.f32("decay", 1.0)?,
        cast_shadow: attrs.bool("castShadow", false)?,
        shadow_map_size: attrs.u32("shadowMapSize", attrs.u32("mapSize", 512)?)?,
        target,
    };
    let position = attrs.vec3("position", Vec3::new(0.0, 5.0, 0.0))?;

    Ok(Construct::Ready(
        SceneNode::new(NodeKind::SpotLight(light)).with_transform(Transform::from_translation(position)),
    ))
}

fn mesh(builder: &mut Builder<'_>, attrs: &Attrs<'_>, _: NodeId) -> Result<Construct, SceneError> {
    let material = builder.resolve_material(attrs)?;

    let geometry = match attrs.str("geometry")? {
        Some(kind) => Geometry::from_attrs(kind, attrs)?,
        None => None,
    };

    let kind = if material.kind == MaterialKind::Points {
        NodeKind::Points {
            geometry,
            material: builder.graph.materials.add(material),
            sort_particles: true,
        }
    } else {
        NodeKind::Mesh {
            geometry,
            material: builder.graph.materials.add(material),
            cast_shadow: true,
            receive_shadow: true,
        }
    };
    Ok(Construct::Ready(SceneNode::new(kind)))
}

fn sprite(builder: &mut Builder<'_>, attrs: &Attrs<'_>, _: NodeId) -> Result<Construct, SceneError> {
    let material = builder.resolve_material(attrs)?;
    Ok(Construct::Ready(SceneNode::new(NodeKind::Sprite {
        material: builder.graph.materials.add(material),
    })))
}

fn sky_box(builder: &mut Builder<'_>, attrs: &Attrs<'_>, _: NodeId) -> Result<Construct, SceneError> {
    let map = match attrs.str("map")? {
        Some(url) => Some(builder.request_texture(url)),
        None => None,
    };

    let material = Material {
        side: Side::Back,
        map,
        ..Material::new(MaterialKind::CubeShader)
    };

    Ok(Construct::Ready(SceneNode::new(NodeKind::Mesh {
        geometry: Some(Geometry::cube(500.0, 500.0, 500.0)),
        material: builder.graph.materials.add(material),
        cast_shadow: false,
        receive_shadow: false,
    })))
}

fn text(builder: &mut Builder<'_>, attrs: &Attrs<'_>, parent: NodeId) -> Result<Construct, SceneError> {
    let material = builder.resolve_material(attrs)?;
    let material = builder.graph.materials.add(material);
    let params = TextParams::from_attrs(attrs)?;

    let id = builder.requests.assets.load_font(&params.font);
    builder.requests.track(
        id,
        PendingKind::Text {
            parent,
            material,
            params,
            json: attrs.map().clone(),
        },
    );
    Ok(Construct::Deferred)
}

fn obj_file(builder: &mut Builder<'_>, attrs: &Attrs<'_>, parent: NodeId) -> Result<Construct, SceneError> {
    let Some(url) = attrs.str("url")? else {
        attrs.malformed("url", "a model url", ())?;
        return Ok(Construct::Deferred);
    };

    // Textures are only requested for a model that will be attached
    let material = builder.resolve_material(attrs)?;
    let material = builder.graph.materials.add(material);
    let id = builder.requests.assets.load_model(url);
    builder.requests.track(
        id,
        PendingKind::Model {
            parent,
            material,
            json: attrs.map().clone(),
        },
    );
    Ok(Construct::Deferred)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_round_trips_names() {
        for (name, node_type, _) in NODE_TYPES {
            assert_eq!(NodeType::from_name(name), Some(*node_type));
            assert_eq!(node_type.name(), *name);
        }
        assert_eq!(NodeType::from_name("bogus"), None);
        assert_eq!(NodeType::from_name("Mesh"), None);
    }
}
