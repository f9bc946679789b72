use thiserror::Error;

/// Problems in a scene description. Only surfaced in strict mode; the
/// lenient builder logs them at debug level and carries on with defaults.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unknown node type {0:?}")]
    UnknownNodeType(String),

    #[error("unknown geometry {0:?}")]
    UnknownGeometry(String),

    #[error("unknown material type {0:?}")]
    UnknownMaterial(String),

    #[error("attribute {key:?}: expected {expected}")]
    InvalidAttribute { key: String, expected: &'static str },

    #[error("scene node is not a JSON object")]
    NotAnObject,

    #[error("invalid scene document: {0}")]
    Document(#[from] serde_json::Error),
}
