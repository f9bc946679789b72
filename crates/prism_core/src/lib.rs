pub use glam;

pub mod assets;
pub mod camera;
pub mod config;
pub mod time;
pub mod transform;

pub use assets::{Assets, Handle};
pub use config::{ConfigError, EngineConfig};

/// Linear RGB, each channel nominally in `0..=1`.
pub type Color = glam::Vec3;
