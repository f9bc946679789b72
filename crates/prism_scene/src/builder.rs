use std::collections::HashMap;

use prism_assets::{AssetServer, RequestId};
use prism_core::Handle;
use serde_json::{Map, Value};

use crate::{
    attrs::Attrs,
    error::SceneError,
    factory::{Construct, NodeType},
    graph::{NodeId, SceneGraph},
    loader::{BuildOptions, PendingKind, PendingResource, SceneHost},
    material::{self, Material, Texture},
    node::NodeKind,
    transform::apply_transform,
};

/// Load requests issued while building, recorded against the scene
/// generation that asked for them.
pub(crate) struct Requests<'a> {
    pub assets: &'a AssetServer,
    pub pending: &'a mut HashMap<RequestId, PendingResource>,
    pub generation: u64,
}

impl Requests<'_> {
    pub fn track(&mut self, id: RequestId, kind: PendingKind) {
        let generation = kind.is_scene_bound().then_some(self.generation);
        self.pending.insert(id, PendingResource { generation, kind });
    }
}

/// The recursive tree walker. One builder lives for one `build` call (a
/// full scene parse, or one deferred subtree once its load completes).
pub(crate) struct Builder<'a> {
    pub graph: &'a mut SceneGraph,
    pub active_camera: &'a mut Option<NodeId>,
    pub requests: Requests<'a>,
    pub host: &'a mut dyn SceneHost,
    pub options: BuildOptions,
}

impl Builder<'_> {
    fn attrs<'j>(&self, json: &'j Map<String, Value>) -> Attrs<'j> {
        Attrs::new(json, self.options.strict)
    }

    /// Populates the already-attached `node` from `json`.
    pub fn build(&mut self, json: &Map<String, Value>, node: NodeId) -> Result<(), SceneError> {
        let attrs = self.attrs(json);
        log::trace!("building {} {:?}", self.graph[node].kind.label(), json.get("name"));

        // 1. Transform deltas
        apply_transform(&attrs, &mut self.graph[node].transform)?;

        // 2. Script files, fire-and-forget
        if let Some(files) = attrs.array("scriptFiles")? {
            for file in files {
                match file.as_str() {
                    Some(url) => {
                        let id = self.requests.assets.load_script(url);
                        self.requests.track(id, PendingKind::Script(url.to_owned()));
                    }
                    None => attrs.malformed("scriptFiles", "a list of urls", ())?,
                }
            }
        }

        // 3. User data, verbatim
        let user_data = attrs.object("userData")?.cloned().unwrap_or_default();
        self.graph[node].user_data = user_data;

        // 4. Name
        if let Some(name) = attrs.str("name")? {
            self.graph.set_name(node, name);
        }

        // 5. Visibility
        if attrs.contains("visible") {
            self.graph[node].visible = attrs.bool("visible", true)?;
        }

        // 6. Background music starts now, whatever else is still loading
        if let Some(url) = attrs.str("backgroundMusic")? {
            log::info!("playing {url}");
            self.host.play_audio(url);
        }

        // 7. Children, depth-first in document order
        if let Some(children) = attrs.array("children")? {
            for child in children {
                self.build_child(child, node)?;
            }
        }

        Ok(())
    }

    fn build_child(&mut self, json: &Value, parent: NodeId) -> Result<(), SceneError> {
        let Some(map) = json.as_object() else {
            return self.reject(SceneError::NotAnObject);
        };
        let attrs = self.attrs(map);

        let type_name = attrs.str("type")?;
        let Some(node_type) = type_name.and_then(NodeType::from_name) else {
            let name = type_name.unwrap_or_default().to_owned();
            return self.reject(SceneError::UnknownNodeType(name));
        };

        match node_type.constructor()(self, &attrs, parent)? {
            Construct::Ready(node) => {
                let is_camera = matches!(node.kind, NodeKind::PerspectiveCamera(_));
                let id = self.graph.add_child(parent, node);

                if is_camera && self.active_camera.is_none() {
                    log::debug!("active camera is {id:?}");
                    *self.active_camera = Some(id);
                }

                self.build(map, id)
            }
            Construct::Deferred => Ok(()),
        }
    }

    fn reject(&self, err: SceneError) -> Result<(), SceneError> {
        if self.options.strict {
            return Err(err);
        }
        log::debug!("skipping child: {err}");
        Ok(())
    }

    /// Builds the material under a node's `material` key. Texture slots
    /// are filled with placeholders whose images load in the background.
    pub fn resolve_material(&mut self, attrs: &Attrs<'_>) -> Result<Material, SceneError> {
        let json = attrs.object("material")?.map(|map| self.attrs(map));
        material::resolve(json.as_ref(), |slot, url| {
            log::trace!("{slot:?} texture {url}");
            self.request_texture(url)
        })
    }

    pub fn request_texture(&mut self, url: &str) -> Handle<Texture> {
        let handle = self.graph.textures.add(Texture::placeholder(url));
        let id = self.requests.assets.load_image(url);
        self.requests.track(id, PendingKind::Texture(handle));
        handle
    }
}
