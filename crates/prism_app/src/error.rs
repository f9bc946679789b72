use std::fmt;

use bitflags::bitflags;
use prism_core::ConfigError;
use prism_scene::SceneError;
use thiserror::Error;

bitflags! {
    /// Collaborators a frame needs before anything can be drawn.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Missing: u8 {
        const SCENE = 1 << 0;
        const CAMERA = 1 << 1;
        const RENDERER = 1 << 2;
    }
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            (Missing::SCENE, "no scene."),
            (Missing::CAMERA, "no camera."),
            (Missing::RENDERER, "no renderer."),
        ];

        let mut first = true;
        for (flag, text) in parts {
            if self.contains(flag) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(text)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("nothing rendered: {0}")]
    NotReady(Missing),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not start the io runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_missing_pieces() {
        assert_eq!(Missing::all().to_string(), "no scene. no camera. no renderer.");
        assert_eq!(Missing::CAMERA.to_string(), "no camera.");
        assert_eq!((Missing::SCENE | Missing::RENDERER).to_string(), "no scene. no renderer.");
        assert_eq!(Missing::empty().to_string(), "");
    }
}
