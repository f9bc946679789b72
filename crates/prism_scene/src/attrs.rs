use glam::Vec3;
use serde_json::{Map, Value};

use crate::error::SceneError;

/// Typed, defaulted reads from one JSON object.
///
/// An absent key (or an explicit `null`) yields the caller's default. A key
/// holding the wrong shape also yields the default in lenient mode and an
/// [`SceneError::InvalidAttribute`] in strict mode.
#[derive(Clone, Copy)]
pub struct Attrs<'a> {
    map: &'a Map<String, Value>,
    strict: bool,
}

impl<'a> Attrs<'a> {
    pub fn new(map: &'a Map<String, Value>, strict: bool) -> Self {
        Self { map, strict }
    }

    pub fn map(&self) -> &'a Map<String, Value> {
        self.map
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// Reports a malformed value: the fallback in lenient mode, an error in
    /// strict mode.
    pub fn malformed<T>(&self, key: &str, expected: &'static str, fallback: T) -> Result<T, SceneError> {
        if self.strict {
            return Err(SceneError::InvalidAttribute {
                key: key.to_owned(),
                expected,
            });
        }
        log::debug!("attribute {key:?} is not {expected}; using default");
        Ok(fallback)
    }

    pub fn f32(&self, key: &str, default: f32) -> Result<f32, SceneError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => match value.as_f64() {
                Some(n) => Ok(n as f32),
                None => self.malformed(key, "a number", default),
            },
        }
    }

    /// Counts and sizes. Fractions truncate, negatives clamp to zero.
    pub fn u32(&self, key: &str, default: u32) -> Result<u32, SceneError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => match value.as_f64() {
                Some(n) => Ok(n as u32),
                None => self.malformed(key, "a number", default),
            },
        }
    }

    pub fn bool(&self, key: &str, default: bool) -> Result<bool, SceneError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => match value.as_bool() {
                Some(b) => Ok(b),
                None => self.malformed(key, "a boolean", default),
            },
        }
    }

    pub fn str(&self, key: &str) -> Result<Option<&'a str>, SceneError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => match value.as_str() {
                Some(s) => Ok(Some(s)),
                None => self.malformed(key, "a string", None),
            },
        }
    }

    pub fn str_or(&self, key: &str, default: &'a str) -> Result<&'a str, SceneError> {
        Ok(self.str(key)?.unwrap_or(default))
    }

    pub fn vec3(&self, key: &str, default: Vec3) -> Result<Vec3, SceneError> {
        Ok(self.vec3_opt(key)?.unwrap_or(default))
    }

    /// Three-component vectors (`[x, y, z]`); extra components are ignored.
    pub fn vec3_opt(&self, key: &str) -> Result<Option<Vec3>, SceneError> {
        Ok(self.floats::<3>(key)?.map(Vec3::from_array))
    }

    /// Colors are written `[r, g, b]` with channels in `0..=1`.
    pub fn color(&self, key: &str, default: Vec3) -> Result<Vec3, SceneError> {
        self.vec3(key, default)
    }

    /// Axis-angle rotations: `[ax, ay, az, radians]`.
    pub fn axis_angle(&self, key: &str) -> Result<Option<[f32; 4]>, SceneError> {
        self.floats::<4>(key)
    }

    pub fn object(&self, key: &str) -> Result<Option<&'a Map<String, Value>>, SceneError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => match value.as_object() {
                Some(map) => Ok(Some(map)),
                None => self.malformed(key, "an object", None),
            },
        }
    }

    pub fn array(&self, key: &str) -> Result<Option<&'a [Value]>, SceneError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => match value.as_array() {
                Some(items) => Ok(Some(items.as_slice())),
                None => self.malformed(key, "an array", None),
            },
        }
    }

    fn floats<const N: usize>(&self, key: &str) -> Result<Option<[f32; N]>, SceneError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };

        let parsed = value.as_array().filter(|items| items.len() >= N).and_then(|items| {
            let mut out = [0.0; N];
            for (slot, item) in out.iter_mut().zip(items) {
                *slot = item.as_f64()? as f32;
            }
            Some(out)
        });

        match parsed {
            Some(out) => Ok(Some(out)),
            None => self.malformed(key, "a numeric array", None),
        }
    }
}
