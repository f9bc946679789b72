use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use prism_assets::MeshData;

use crate::{attrs::Attrs, error::SceneError};

/// Shape of a mesh or points node. Primitives carry their construction
/// parameters; tessellation is left to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
        arc: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radius_segments: u32,
        height_segments: u32,
        open_ended: bool,
        theta_start: f32,
        theta_length: f32,
    },
    Cone {
        radius: f32,
        height: f32,
        radius_segments: u32,
        height_segments: u32,
        open_ended: bool,
        theta_start: f32,
        theta_length: f32,
    },
    Text(TextGeometry),
    Model(MeshData),
}

impl Geometry {
    pub fn cube(width: f32, height: f32, depth: f32) -> Self {
        Geometry::Box { width, height, depth }
    }

    /// Builds a primitive from a `mesh` node's `geometry` discriminator and
    /// its dimension keys. `Ok(None)` means the name is unknown and the
    /// caller is lenient.
    pub fn from_attrs(kind: &str, attrs: &Attrs) -> Result<Option<Self>, SceneError> {
        let geometry = match kind {
            "cube" => Geometry::Box {
                width: attrs.f32("width", 2.0)?,
                height: attrs.f32("height", 2.0)?,
                depth: attrs.f32("depth", 2.0)?,
            },
            "sphere" => Geometry::Sphere {
                radius: attrs.f32("radius", 1.0)?,
                width_segments: attrs.u32("widthSegments", 8)?,
                height_segments: attrs.u32("heightSegments", 6)?,
            },
            "plane" => Geometry::Plane {
                width: attrs.f32("width", 1.0)?,
                height: attrs.f32("height", 1.0)?,
                width_segments: attrs.u32("widthSegments", 1)?,
                height_segments: attrs.u32("heightSegments", 1)?,
            },
            "torus" => Geometry::Torus {
                radius: attrs.f32("radius", 100.0)?,
                tube: attrs.f32("tube", 40.0)?,
                radial_segments: attrs.u32("radialSegments", 1)?,
                tubular_segments: attrs.u32("tubularSegments", 1)?,
                arc: attrs.f32("arc", TAU)?,
            },
            "cylinder" => Geometry::Cylinder {
                radius_top: attrs.f32("radiusTop", 20.0)?,
                radius_bottom: attrs.f32("radiusBottom", 20.0)?,
                height: attrs.f32("height", 100.0)?,
                radius_segments: attrs.u32("radiusSegments", 8)?,
                height_segments: attrs.u32("heightSegments", 1)?,
                open_ended: attrs.bool("openEnded", false)?,
                theta_start: attrs.f32("thetaStart", 0.0)?,
                theta_length: attrs.f32("thetaLength", TAU)?,
            },
            "cone" => Geometry::Cone {
                radius: attrs.f32("radius", 20.0)?,
                height: attrs.f32("height", 100.0)?,
                radius_segments: attrs.u32("radiusSegments", 8)?,
                height_segments: attrs.u32("heightSegments", 1)?,
                open_ended: attrs.bool("openEnded", false)?,
                theta_start: attrs.f32("thetaStart", 0.0)?,
                theta_length: attrs.f32("thetaLength", TAU)?,
            },
            other if attrs.is_strict() => return Err(SceneError::UnknownGeometry(other.to_owned())),
            other => {
                log::debug!("unknown geometry {other:?}; mesh has no shape");
                return Ok(None);
            }
        };
        Ok(Some(geometry))
    }
}

/// Extrusion settings for a `text` node, read when the node is parsed and
/// kept until the font arrives.
#[derive(Clone, Debug, PartialEq)]
pub struct TextParams {
    pub font: String,
    pub text: String,
    pub size: f32,
    pub depth: f32,
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_segments: u32,
}

impl TextParams {
    pub fn from_attrs(attrs: &Attrs) -> Result<Self, SceneError> {
        let size = attrs.f32("size", 1.0)?;
        Ok(Self {
            font: attrs.str_or("font", "helvetiker_regular")?.to_owned(),
            text: attrs.str_or("text", "")?.to_owned(),
            size,
            depth: attrs.f32("height", size * 0.1)?,
            curve_segments: attrs.u32("curveSegments", 5)?,
            bevel_enabled: attrs.bool("bevelEnabled", true)?,
            bevel_thickness: attrs.f32("bevelThickness", size * 0.03)?,
            bevel_size: attrs.f32("bevelSize", size * 0.03)?,
            bevel_segments: attrs.u32("bevelSegments", 3)?,
        })
    }
}

/// Flattened glyph outlines ready for extrusion, centred on their own
/// bounding box.
#[derive(Clone, Debug, PartialEq)]
pub struct TextGeometry {
    pub params: TextParams,
    /// Closed polylines in the xy plane.
    pub contours: Vec<Vec<Vec2>>,
    /// Extrusion spans `z_range.0..z_range.1`.
    pub z_range: (f32, f32),
    pub bounding_min: Vec3,
    pub bounding_max: Vec3,
}

impl TextGeometry {
    pub fn new(params: TextParams, contours: Vec<Vec<Vec2>>) -> Self {
        let (bevel_size, bevel_thickness) = if params.bevel_enabled {
            (params.bevel_size, params.bevel_thickness)
        } else {
            (0.0, 0.0)
        };

        // 1. Bounds of the raw outlines, grown by the bevel
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for point in contours.iter().flatten() {
            min = min.min(*point);
            max = max.max(*point);
        }
        if contours.iter().all(Vec::is_empty) {
            min = Vec2::ZERO;
            max = Vec2::ZERO;
        }
        let min = (min - Vec2::splat(bevel_size)).extend(-bevel_thickness);
        let max = (max + Vec2::splat(bevel_size)).extend(params.depth + bevel_thickness);

        // 2. Shift everything so the box is centred on the origin
        let center = (min + max) * 0.5;
        let contours = contours
            .into_iter()
            .map(|contour| contour.into_iter().map(|p| p - center.truncate()).collect())
            .collect();

        Self {
            params,
            contours,
            z_range: (min.z - center.z, max.z - center.z),
            bounding_min: min - center,
            bounding_max: max - center,
        }
    }
}
