use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Engine settings. Every field is optional in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Directory relative urls in scene files resolve against.
    pub asset_root: PathBuf,
    /// Directory (under `asset_root`) holding `<name>.typeface.json` fonts.
    pub font_dir: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Surface malformed scene input as errors instead of defaulting.
    pub strict: bool,
    pub io_threads: usize,
    /// Stop the loop after this many ticks (headless runs).
    pub frame_limit: Option<u64>,
    pub debug: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("."),
            font_dir: "fonts".to_owned(),
            canvas_width: 1280,
            canvas_height: 720,
            strict: false,
            io_threads: 2,
            frame_limit: None,
            debug: false,
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.canvas_height == 0 {
            return 1.0;
        }
        self.canvas_width as f32 / self.canvas_height as f32
    }
}
