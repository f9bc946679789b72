use std::collections::HashMap;

use prism_assets::{AssetReceiver, AssetServer, AssetWorkerMessage, RequestId};
use prism_core::{Handle, camera::PerspectiveCamera};
use serde_json::{Map, Value};

use crate::{
    builder::{Builder, Requests},
    error::SceneError,
    geometry::{Geometry, TextGeometry, TextParams},
    graph::{NodeId, SceneGraph, SceneNode},
    material::{Material, Texture},
    node::NodeKind,
};

/// Side effects a scene asks of the engine while it is being built.
pub trait SceneHost {
    /// `backgroundMusic`: start playback immediately.
    fn play_audio(&mut self, url: &str);

    /// A `scriptFiles` entry finished loading.
    fn script_loaded(&mut self, url: &str, source: String);
}

/// A host that ignores audio and scripts.
impl SceneHost for () {
    fn play_audio(&mut self, _: &str) {}

    fn script_loaded(&mut self, _: &str, _: String) {}
}

#[derive(Clone, Copy, Debug)]
pub struct BuildOptions {
    /// Surface the first malformed field or unknown `type` as an error
    /// instead of defaulting or skipping.
    pub strict: bool,
    /// Aspect ratio given to newly built cameras.
    pub aspect_ratio: f32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            strict: false,
            aspect_ratio: 1280.0 / 720.0,
        }
    }
}

/// The scene currently shown, if any.
#[derive(Debug, Default)]
pub struct SceneState {
    pub graph: Option<SceneGraph>,
    /// First camera met while building `graph`.
    pub active_camera: Option<NodeId>,
    generation: u64,
}

impl SceneState {
    /// Bumped every time a scene is parsed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        let graph = self.graph.as_ref()?;
        graph.get(self.active_camera?)?.kind.as_camera()
    }

    pub fn camera_mut(&mut self) -> Option<&mut PerspectiveCamera> {
        let graph = self.graph.as_mut()?;
        graph.get_mut(self.active_camera?)?.kind.as_camera_mut()
    }
}

#[derive(Debug)]
pub(crate) enum PendingKind {
    Texture(Handle<Texture>),
    Model {
        parent: NodeId,
        material: Handle<Material>,
        json: Map<String, Value>,
    },
    Text {
        parent: NodeId,
        material: Handle<Material>,
        params: TextParams,
        json: Map<String, Value>,
    },
    Script(String),
    Document(String),
}

impl PendingKind {
    /// Whether the load splices into one particular scene. Scripts and
    /// documents outlive the scene that asked for them.
    pub fn is_scene_bound(&self) -> bool {
        !matches!(self, PendingKind::Script(_) | PendingKind::Document(_))
    }
}

#[derive(Debug)]
pub(crate) struct PendingResource {
    pub generation: Option<u64>,
    pub kind: PendingKind,
}

/// Turns scene documents into [`SceneGraph`]s and joins asynchronous loads
/// back into them.
///
/// Loads are issued through the [`AssetServer`] while building and never
/// waited on. Their results queue up until [`SceneLoader::flush`] applies
/// them, which the engine does between frames, so the graph is only ever
/// touched from the thread that owns the loader.
pub struct SceneLoader {
    assets: AssetServer,
    receiver: AssetReceiver,
    pending: HashMap<RequestId, PendingResource>,
    options: BuildOptions,
}

impl SceneLoader {
    pub fn new(assets: AssetServer, receiver: AssetReceiver, options: BuildOptions) -> Self {
        Self {
            assets,
            receiver,
            pending: HashMap::new(),
            options,
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut BuildOptions {
        &mut self.options
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Fetches a scene document in the background. It replaces the current
    /// scene when a later flush sees it arrive.
    pub fn load_scene(&mut self, url: &str) -> RequestId {
        log::info!("loading scene {url}");
        let id = self.assets.load_document(url);
        self.pending.insert(
            id,
            PendingResource {
                generation: None,
                kind: PendingKind::Document(url.to_owned()),
            },
        );
        id
    }

    pub fn parse_scene_str(
        &mut self,
        state: &mut SceneState,
        text: &str,
        host: &mut dyn SceneHost,
    ) -> Result<(), SceneError> {
        let document: Value = serde_json::from_str(text)?;
        self.parse_scene(state, &document, host)
    }

    /// Replaces the current scene with one built from `document`.
    ///
    /// The old graph and active camera are dropped first and any loads
    /// still in flight for them are ignored when they land. In strict mode
    /// a malformed document leaves no scene at all.
    pub fn parse_scene(
        &mut self,
        state: &mut SceneState,
        document: &Value,
        host: &mut dyn SceneHost,
    ) -> Result<(), SceneError> {
        log::info!("parsing scene");

        // 1. Forget the previous scene
        state.graph = None;
        state.active_camera = None;
        state.generation += 1;
        let generation = state.generation;

        // 2. Build into a fresh graph
        let mut graph = SceneGraph::new();
        let mut active_camera = None;
        let root = graph.root();

        let result = match document.as_object() {
            Some(json) => Builder {
                graph: &mut graph,
                active_camera: &mut active_camera,
                requests: Requests {
                    assets: &self.assets,
                    pending: &mut self.pending,
                    generation,
                },
                host,
                options: self.options,
            }
            .build(json, root),
            None if self.options.strict => Err(SceneError::NotAnObject),
            None => {
                log::debug!("scene document is not an object; scene is empty");
                Ok(())
            }
        };

        // 3. Install it, or drop what the failed build asked for
        match result {
            Ok(()) => {
                log::debug!("scene built with {} nodes", graph.len());
                state.graph = Some(graph);
                state.active_camera = active_camera;
                Ok(())
            }
            Err(err) => {
                self.pending.retain(|_, pending| pending.generation != Some(generation));
                Err(err)
            }
        }
    }

    /// Applies every load that has finished, without waiting. Returns how
    /// many completions were processed.
    pub fn flush(&mut self, state: &mut SceneState, host: &mut dyn SceneHost) -> usize {
        let mut applied = 0;
        while let Some(message) = self.receiver.try_recv() {
            self.apply(state, host, message);
            applied += 1;
        }
        applied
    }

    /// Blocks until nothing is pending, applying completions as they land.
    /// Loads started by applied completions are waited for too.
    ///
    /// Must not be called from inside the IO runtime.
    pub fn wait_for_loads(&mut self, state: &mut SceneState, host: &mut dyn SceneHost) -> usize {
        let mut applied = 0;
        while !self.pending.is_empty() {
            let Some(message) = self.receiver.blocking_recv() else {
                break;
            };
            self.apply(state, host, message);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, state: &mut SceneState, host: &mut dyn SceneHost, message: AssetWorkerMessage) {
        let Some(pending) = self.pending.remove(&message.id()) else {
            log::debug!("ignoring completion for unknown request {}", message.id());
            return;
        };

        if pending.generation.is_some_and(|generation| generation != state.generation) {
            log::debug!("discarding load for a replaced scene");
            return;
        }

        match (pending.kind, message) {
            (PendingKind::Texture(handle), AssetWorkerMessage::ImageLoaded { url, result, .. }) => {
                match result {
                    Ok(image) => {
                        let texture = state
                            .graph
                            .as_mut()
                            .and_then(|graph| graph.textures.get_mut(handle));
                        if let Some(texture) = texture {
                            log::debug!("texture {url} ready ({}x{})", image.width, image.height);
                            texture.set_image(image);
                        }
                    }
                    Err(err) => log::warn!("could not load texture {url}: {err}"),
                }
            }

            (
                PendingKind::Model {
                    parent,
                    material,
                    json,
                },
                AssetWorkerMessage::ModelLoaded { url, result, .. },
            ) => match result {
                Ok(model) => {
                    log::debug!("model {url} ready ({} meshes)", model.meshes.len());
                    let group = SceneNode::new(NodeKind::Group);
                    let mut meshes = Vec::with_capacity(model.meshes.len());
                    for data in model.meshes {
                        let name = data.name.clone();
                        let mut node = SceneNode::new(NodeKind::Mesh {
                            geometry: Some(Geometry::Model(data)),
                            material,
                            cast_shadow: false,
                            receive_shadow: false,
                        });
                        if !name.is_empty() {
                            node = node.named(name);
                        }
                        meshes.push(node);
                    }
                    self.splice(state, host, parent, group, meshes, &json);
                }
                Err(err) => log::warn!("could not load model {url}: {err}"),
            },

            (
                PendingKind::Text {
                    parent,
                    material,
                    params,
                    json,
                },
                AssetWorkerMessage::FontLoaded { name, result, .. },
            ) => match result {
                Ok(font) => {
                    let contours = font.layout(&params.text, params.size, params.curve_segments);
                    let node = SceneNode::new(NodeKind::Mesh {
                        geometry: Some(Geometry::Text(TextGeometry::new(params, contours))),
                        material,
                        cast_shadow: true,
                        receive_shadow: true,
                    });
                    self.splice(state, host, parent, node, Vec::new(), &json);
                }
                Err(err) => log::warn!("could not load font {name}: {err}"),
            },

            (PendingKind::Script(_), AssetWorkerMessage::ScriptLoaded { url, result, .. }) => {
                match result {
                    Ok(source) => host.script_loaded(&url, source),
                    Err(err) => log::warn!("could not load script {url}: {err}"),
                }
            }

            (PendingKind::Document(_), AssetWorkerMessage::DocumentLoaded { url, result, .. }) => {
                match result {
                    Ok(text) => {
                        if let Err(err) = self.parse_scene_str(state, &text, host) {
                            log::warn!("could not build scene {url}: {err}");
                        }
                    }
                    Err(err) => log::warn!("could not load scene {url}: {err}"),
                }
            }

            (kind, message) => {
                log::debug!("completion {} does not match pending {kind:?}", message.id());
            }
        }
    }

    /// Attaches a deferred node (plus any children it came with) under
    /// `parent` and walks its originating JSON on it.
    fn splice(
        &mut self,
        state: &mut SceneState,
        host: &mut dyn SceneHost,
        parent: NodeId,
        node: SceneNode,
        children: Vec<SceneNode>,
        json: &Map<String, Value>,
    ) {
        let Some(graph) = state.graph.as_mut() else {
            return;
        };

        let id = graph.add_child(parent, node);
        for child in children {
            graph.add_child(id, child);
        }

        let mut builder = Builder {
            graph,
            active_camera: &mut state.active_camera,
            requests: Requests {
                assets: &self.assets,
                pending: &mut self.pending,
                generation: state.generation,
            },
            host,
            options: self.options,
        };
        if let Err(err) = builder.build(json, id) {
            log::warn!("could not build deferred node: {err}");
        }
    }
}
