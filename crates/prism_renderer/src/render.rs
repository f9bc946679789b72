use prism_scene::{NodeId, SceneGraph};

/// Counters a renderer keeps about what it has drawn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderStats {
    pub width: u32,
    pub height: u32,
    pub frames: u64,
    /// Draw calls issued by the last frame.
    pub draw_calls: usize,
    /// Textures referenced by the last frame whose images had arrived.
    pub textures_ready: usize,
    /// Textures referenced by the last frame still waiting on their image.
    pub textures_pending: usize,
    /// Image uploads over the renderer's lifetime, one per texture version.
    pub texture_uploads: u64,
    pub lights: usize,
}

/// Draws a scene graph from one of its cameras.
pub trait Renderer {
    fn render(&mut self, scene: &SceneGraph, camera: NodeId);

    fn set_size(&mut self, width: u32, height: u32);

    fn stats(&self) -> &RenderStats;
}
