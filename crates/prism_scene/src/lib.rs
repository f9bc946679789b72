//! Builds scene graphs from JSON scene descriptions.
//!
//! A document is a tree of nodes, each with an optional `type`, transform
//! deltas, user data and `children`. [`SceneLoader::parse_scene`] walks it
//! depth-first into a [`SceneGraph`]; textures, external models, fonts and
//! script files load in the background and are spliced in by
//! [`SceneLoader::flush`].

pub mod attrs;
mod builder;
mod error;
mod factory;
pub mod geometry;
pub mod graph;
pub mod loader;
pub mod material;
pub mod node;
pub mod transform;


pub use attrs::Attrs;
pub use error::SceneError;
pub use factory::NodeType;
pub use geometry::{Geometry, TextGeometry, TextParams};
pub use graph::{NodeId, SceneGraph, SceneNode};
pub use loader::{BuildOptions, SceneHost, SceneLoader, SceneState};
pub use material::{Material, MaterialKind, Side, Texture};
pub use node::{NodeKind, SpotLight};
