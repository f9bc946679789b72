use thiserror::Error;

use crate::font::FontParseError;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{url}: not found")]
    NotFound { url: String },

    #[error("{url}: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{url}: failed to decode image: {source}")]
    Image {
        url: String,
        #[source]
        source: image::ImageError,
    },

    #[error("{url}: failed to parse OBJ: {source}")]
    Obj {
        url: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("{url}: invalid typeface: {source}")]
    Font {
        url: String,
        #[source]
        source: FontParseError,
    },

    #[error("{url}: not valid UTF-8")]
    Utf8 {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("load task for {url} failed: {source}")]
    Join {
        url: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl AssetError {
    pub fn url(&self) -> &str {
        match self {
            AssetError::NotFound { url }
            | AssetError::Io { url, .. }
            | AssetError::Image { url, .. }
            | AssetError::Obj { url, .. }
            | AssetError::Font { url, .. }
            | AssetError::Utf8 { url, .. }
            | AssetError::Join { url, .. } => url,
        }
    }
}
