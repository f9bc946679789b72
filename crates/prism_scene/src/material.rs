use glam::Vec3;
use prism_assets::TextureData;
use prism_core::{Color, Handle};

use crate::{attrs::Attrs, error::SceneError};

/// Alpha cut-off pinned on every material that mentions `transparent`.
pub const ALPHA_TEST_THRESHOLD: f32 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    Lambert,
    Basic,
    Phong,
    Points,
    Sprite,
    /// Skybox shader sampling `map` as a cube texture.
    CubeShader,
}

impl MaterialKind {
    const TABLE: &'static [(&'static str, MaterialKind)] = &[
        ("pointsMaterial", MaterialKind::Points),
        ("points", MaterialKind::Points),
        ("spriteMaterial", MaterialKind::Sprite),
        ("sprite", MaterialKind::Sprite),
        ("meshLambertMaterial", MaterialKind::Lambert),
        ("lambert", MaterialKind::Lambert),
        ("meshBasicMaterial", MaterialKind::Basic),
        ("meshBasic", MaterialKind::Basic),
        ("basic", MaterialKind::Basic),
        ("meshPhongMaterial", MaterialKind::Phong),
        ("phong", MaterialKind::Phong),
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, kind)| *kind)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub name: String,
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
    pub flat_shading: bool,
    /// Point size for points materials.
    pub size: f32,
    pub transparent: bool,
    pub alpha_test: f32,
    pub bump_scale: f32,
    pub side: Side,
    pub map: Option<Handle<Texture>>,
    pub bump_map: Option<Handle<Texture>>,
    pub diffuse_map: Option<Handle<Texture>>,
}

impl Material {
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            kind,
            name: String::new(),
            color: Vec3::ONE,
            specular: Vec3::splat(0x11 as f32 / 255.0),
            shininess: 30.0,
            flat_shading: false,
            size: 1.0,
            transparent: false,
            alpha_test: 0.0,
            bump_scale: 1.0,
            side: Side::Front,
            map: None,
            bump_map: None,
            diffuse_map: None,
        }
    }

    pub fn textures(&self) -> impl Iterator<Item = Handle<Texture>> {
        [self.map, self.bump_map, self.diffuse_map].into_iter().flatten()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(MaterialKind::Lambert)
    }
}

/// Texture placeholder. Lives in the scene's texture store from the moment
/// a material names it; `image` fills in when the load completes.
#[derive(Clone, Debug)]
pub struct Texture {
    pub url: String,
    pub image: Option<TextureData>,
    /// Bumped each time `image` changes, so renderers know to re-upload.
    pub version: u32,
}

impl Texture {
    pub fn placeholder(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            image: None,
            version: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.image.is_some()
    }

    pub fn set_image(&mut self, image: TextureData) {
        self.image = Some(image);
        self.version += 1;
    }
}

/// Which texture slot a url was found under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureSlot {
    Map,
    BumpMap,
    DiffuseMap,
}

/// Reads a material description. Texture keys are reported to `texture`
/// (which creates the placeholder and starts the load) and the returned
/// handle is stored in the slot straight away.
pub fn resolve(
    json: Option<&Attrs>,
    mut texture: impl FnMut(TextureSlot, &str) -> Handle<Texture>,
) -> Result<Material, SceneError> {
    let Some(attrs) = json else {
        return Ok(Material::default());
    };

    let kind = match attrs.str("type")? {
        None => MaterialKind::Lambert,
        Some(name) => match MaterialKind::from_name(name) {
            Some(kind) => kind,
            None if attrs.is_strict() => return Err(SceneError::UnknownMaterial(name.to_owned())),
            None => {
                log::debug!("unknown material type {name:?}; using lambert");
                MaterialKind::Lambert
            }
        },
    };

    let mut material = Material::new(kind);

    // `diffuseColor` is read after `color`, so it wins when both are set
    material.color = attrs.color("color", material.color)?;
    material.color = attrs.color("diffuseColor", material.color)?;
    material.specular = attrs.color("specular", material.specular)?;
    material.shininess = attrs.f32("shininess", material.shininess)?;
    material.flat_shading = attrs.contains("shading");
    material.bump_scale = attrs.f32("bumpScale", material.bump_scale)?;
    material.size = attrs.f32("size", material.size)?;
    if let Some(name) = attrs.str("name")? {
        material.name = name.to_owned();
    }
    if attrs.contains("transparent") {
        material.transparent = attrs.bool("transparent", true)?;
        material.alpha_test = ALPHA_TEST_THRESHOLD;
    }

    if let Some(url) = attrs.str("map")? {
        material.map = Some(texture(TextureSlot::Map, url));
    }
    if let Some(url) = attrs.str("bumpMap")? {
        material.bump_map = Some(texture(TextureSlot::BumpMap, url));
    }
    if let Some(url) = attrs.str("diffuseMap")? {
        material.diffuse_map = Some(texture(TextureSlot::DiffuseMap, url));
    }

    Ok(material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value, json};

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn no_textures(_: TextureSlot, url: &str) -> Handle<Texture> {
        panic!("unexpected texture {url}")
    }

    #[test]
    fn absent_material_is_default_lambert() {
        let material = resolve(None, no_textures).unwrap();
        assert_eq!(material.kind, MaterialKind::Lambert);
        assert_eq!(material.color, Vec3::ONE);
        assert_eq!(material.alpha_test, 0.0);
    }

    #[test]
    fn aliases_and_attributes() {
        let map = object(json!({
            "type": "phong",
            "color": [1, 0, 0],
            "diffuseColor": [0, 1, 0],
            "shininess": 80,
            "shading": "flat",
            "name": "grass",
            "transparent": true,
        }));
        let material = resolve(Some(&Attrs::new(&map, true)), no_textures).unwrap();

        assert_eq!(material.kind, MaterialKind::Phong);
        assert_eq!(material.color, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(material.shininess, 80.0);
        assert!(material.flat_shading);
        assert_eq!(material.name, "grass");
        assert!(material.transparent);
        assert_eq!(material.alpha_test, ALPHA_TEST_THRESHOLD);
    }

    #[test]
    fn transparent_false_still_pins_alpha_test() {
        let map = object(json!({ "transparent": false }));
        let material = resolve(Some(&Attrs::new(&map, false)), no_textures).unwrap();
        assert!(!material.transparent);
        assert_eq!(material.alpha_test, ALPHA_TEST_THRESHOLD);
    }

    #[test]
    fn unknown_type_falls_back_or_errors() {
        let map = object(json!({ "type": "toon", "color": [0, 0, 1] }));

        let material = resolve(Some(&Attrs::new(&map, false)), no_textures).unwrap();
        assert_eq!(material.kind, MaterialKind::Lambert);
        assert_eq!(material.color, Vec3::Z);

        assert!(matches!(
            resolve(Some(&Attrs::new(&map, true)), no_textures),
            Err(SceneError::UnknownMaterial(name)) if name == "toon"
        ));
    }

    #[test]
    fn texture_slots_get_handles_immediately() {
        let map = object(json!({ "map": "wood.png", "bumpMap": "wood_bump.png" }));
        let mut requested = Vec::new();
        let material = resolve(Some(&Attrs::new(&map, false)), |slot, url| {
            requested.push((slot, url.to_owned()));
            Handle::new()
        })
        .unwrap();

        assert!(material.map.is_some());
        assert!(material.bump_map.is_some());
        assert!(material.diffuse_map.is_none());
        assert_eq!(material.textures().count(), 2);
        assert_eq!(
            requested,
            vec![
                (TextureSlot::Map, "wood.png".to_owned()),
                (TextureSlot::BumpMap, "wood_bump.png".to_owned()),
            ]
        );
    }

    #[test]
    fn placeholder_versions_on_image() {
        let mut texture = Texture::placeholder("sky.png");
        assert!(!texture.is_ready());
        texture.set_image(TextureData {
            name: "sky.png".into(),
            pixels: vec![0; 4],
            width: 1,
            height: 1,
            format: prism_assets::TextureFormat::Rgba8UnormSrgb,
        });
        assert!(texture.is_ready());
        assert_eq!(texture.version, 1);
    }
}
