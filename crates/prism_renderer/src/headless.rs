use std::collections::HashMap;

use prism_core::Handle;
use prism_scene::{NodeId, SceneGraph, Texture};

use crate::{
    extract::{FramePacket, extract},
    render::{RenderStats, Renderer},
};

/// Renderer without a GPU. Does all the per-frame scene work (transform
/// propagation, light gathering, texture upload tracking) and records the
/// result instead of drawing it.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    stats: RenderStats,
    // Texture version last "uploaded", per placeholder
    texture_cache: HashMap<Handle<Texture>, u32>,
    last_frame: Option<FramePacket>,
}

impl HeadlessRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            stats: RenderStats {
                width,
                height,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn last_frame(&self) -> Option<&FramePacket> {
        self.last_frame.as_ref()
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, scene: &SceneGraph, camera: NodeId) {
        let packet = extract(scene, camera);
        if packet.camera.is_none() {
            log::warn!("node {camera:?} is not a camera; skipping frame");
            return;
        }

        let mut ready = 0;
        let mut pending = 0;

        for draw in &packet.draws {
            let Some(material) = scene.materials.get(draw.material) else {
                continue;
            };

            for handle in material.textures() {
                match scene.textures.get(handle) {
                    Some(texture) if texture.is_ready() => {
                        ready += 1;
                        // Re-upload whenever the placeholder's image changed
                        if self.texture_cache.get(&handle) != Some(&texture.version) {
                            log::trace!("uploading texture {} v{}", texture.url, texture.version);
                            self.texture_cache.insert(handle, texture.version);
                            self.stats.texture_uploads += 1;
                        }
                    }
                    _ => pending += 1,
                }
            }
        }

        self.stats.frames += 1;
        self.stats.draw_calls = packet.draws.len();
        self.stats.textures_ready = ready;
        self.stats.textures_pending = pending;
        self.stats.lights = packet.lights.count();
        self.last_frame = Some(packet);
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.stats.width = width;
        self.stats.height = height;
    }

    fn stats(&self) -> &RenderStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_assets::{TextureData, TextureFormat};
    use prism_core::camera::PerspectiveCamera;
    use prism_scene::{Material, NodeKind, SceneNode};

    fn scene_with_textured_sprite() -> (SceneGraph, NodeId, Handle<Texture>) {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let texture = scene.textures.add(Texture::placeholder("wood.png"));
        let material = scene.materials.add(Material {
            map: Some(texture),
            ..Material::default()
        });
        scene.add_child(root, SceneNode::new(NodeKind::Sprite { material }));
        scene.add_child(
            root,
            SceneNode::new(NodeKind::PointLight {
                color: glam::Vec3::ONE,
                intensity: 1.0,
                distance: 0.0,
                decay: 1.0,
            }),
        );
        let camera = scene.add_child(
            root,
            SceneNode::new(NodeKind::PerspectiveCamera(PerspectiveCamera::default())),
        );
        (scene, camera, texture)
    }

    #[test]
    fn draws_before_and_after_texture_arrives() {
        let (mut scene, camera, texture) = scene_with_textured_sprite();
        let mut renderer = HeadlessRenderer::new(640, 480);

        renderer.render(&scene, camera);
        assert_eq!(renderer.stats().draw_calls, 1);
        assert_eq!(renderer.stats().textures_pending, 1);
        assert_eq!(renderer.stats().lights, 1);

        if let Some(placeholder) = scene.textures.get_mut(texture) {
            placeholder.set_image(TextureData {
                name: "wood.png".into(),
                pixels: vec![255; 4],
                width: 1,
                height: 1,
                format: TextureFormat::Rgba8UnormSrgb,
            });
        }

        renderer.render(&scene, camera);
        renderer.render(&scene, camera);
        let stats = renderer.stats();
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.textures_ready, 1);
        assert_eq!(stats.textures_pending, 0);
        assert_eq!(stats.texture_uploads, 1);
    }

    #[test]
    fn non_camera_draws_nothing() {
        let (scene, _, _) = scene_with_textured_sprite();
        let mut renderer = HeadlessRenderer::new(1, 1);
        renderer.render(&scene, scene.root());
        assert_eq!(renderer.stats().frames, 0);

        renderer.set_size(800, 600);
        assert_eq!((renderer.stats().width, renderer.stats().height), (800, 600));
    }
}
