pub mod asset_server;
mod error;
pub mod font;
pub mod loader;
pub mod model;
pub mod texture;

pub use asset_server::{AssetReceiver, AssetServer, AssetWorkerMessage, RequestId};
pub use error::AssetError;
pub use font::{Font, FontParseError};
pub use loader::{FileLoader, MemoryLoader, ResourceLoader};
pub use model::{MeshData, ModelData, Vertex};
pub use texture::{TextureData, TextureFormat};
