mod camera;
pub mod extract;
mod headless;
mod light;
mod render;

pub use camera::CameraUniform;
pub use extract::{DrawItem, FramePacket, MeshUniform};
pub use headless::HeadlessRenderer;
pub use light::{DirectionalUniform, LightUniforms, PointUniform, world_matrix};
pub use render::{RenderStats, Renderer};
