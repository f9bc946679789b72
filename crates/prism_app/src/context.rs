use std::sync::Arc;

use prism_assets::{AssetServer, FileLoader, RequestId, ResourceLoader};
use prism_core::{EngineConfig, time::Time};
use prism_input::InputState;
use prism_renderer::Renderer;
use prism_scene::{BuildOptions, SceneHost, SceneLoader, SceneState};
use serde_json::Value;

use crate::{
    audio::{AudioBackend, LogAudio},
    error::{EngineError, Missing},
    script::{ScriptArgs, ScriptRegistry},
};

/// Everything one running scene needs, passed around explicitly.
pub struct EngineContext {
    pub config: EngineConfig,
    pub loader: SceneLoader,
    pub scene: SceneState,
    pub renderer: Option<Box<dyn Renderer>>,
    pub audio: Box<dyn AudioBackend>,
    pub input: InputState,
    pub time: Time,
    pub scripts: ScriptRegistry,
    canvas: (u32, u32),
    // Declared last: in-flight loads shut down after the loader is gone
    io_runtime: tokio::runtime::Runtime,
}

/// Routes scene side effects to the context's audio backend and script
/// registry while the loader holds the scene state.
struct Host<'a> {
    audio: &'a mut dyn AudioBackend,
    scripts: &'a mut ScriptRegistry,
}

impl SceneHost for Host<'_> {
    fn play_audio(&mut self, url: &str) {
        self.audio.play(url);
    }

    fn script_loaded(&mut self, url: &str, source: String) {
        log::debug!("script file {url} loaded ({} bytes)", source.len());
        self.scripts.add_source(url, source);
    }
}

impl EngineContext {
    /// Context reading resources from `config.asset_root` on disk.
    pub fn from_config(config: EngineConfig) -> Result<Self, EngineError> {
        let loader = FileLoader::new(config.asset_root.clone(), config.font_dir.clone());
        Self::new(config, Arc::new(loader))
    }

    pub fn new(config: EngineConfig, resources: Arc<dyn ResourceLoader>) -> Result<Self, EngineError> {
        // 1. Dedicated IO pool for resource loads
        let io_runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.io_threads.max(1))
            .enable_all()
            .thread_name("prism-io")
            .build()?;

        // 2. Loader wired to it
        let (assets, receiver) = AssetServer::new(resources, io_runtime.handle().clone());
        let options = BuildOptions {
            strict: config.strict,
            aspect_ratio: config.aspect_ratio(),
        };

        log::debug!(
            "engine context: {}x{} canvas, {} io threads, strict={}",
            config.canvas_width,
            config.canvas_height,
            config.io_threads.max(1),
            config.strict
        );

        Ok(Self {
            canvas: (config.canvas_width, config.canvas_height),
            config,
            loader: SceneLoader::new(assets, receiver, options),
            scene: SceneState::default(),
            renderer: None,
            audio: Box::new(LogAudio::default()),
            input: InputState::default(),
            time: Time::default(),
            scripts: ScriptRegistry::new(),
            io_runtime,
        })
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.set_renderer(Box::new(renderer));
        self
    }

    pub fn with_audio(mut self, audio: impl AudioBackend + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn set_renderer(&mut self, mut renderer: Box<dyn Renderer>) {
        renderer.set_size(self.canvas.0, self.canvas.1);
        self.renderer = Some(renderer);
    }

    pub fn io_handle(&self) -> tokio::runtime::Handle {
        self.io_runtime.handle().clone()
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        self.canvas
    }

    /// Seconds since the current scene was installed.
    pub fn elapsed_seconds(&self) -> f32 {
        self.time.elapsed_seconds()
    }

    /// Starts fetching a scene document; it replaces the current scene on
    /// the flush that sees it arrive.
    pub fn load_scene(&mut self, url: &str) -> RequestId {
        self.loader.load_scene(url)
    }

    pub fn parse_scene_str(&mut self, text: &str) -> Result<(), EngineError> {
        self.with_loader(|loader, scene, host| loader.parse_scene_str(scene, text, host))?;
        Ok(())
    }

    pub fn parse_scene(&mut self, document: &Value) -> Result<(), EngineError> {
        self.with_loader(|loader, scene, host| loader.parse_scene(scene, document, host))?;
        Ok(())
    }

    /// Applies finished loads without blocking.
    pub fn flush(&mut self) -> usize {
        self.with_loader(|loader, scene, host| loader.flush(scene, host))
    }

    /// Blocks until every outstanding load has been applied.
    pub fn wait_for_loads(&mut self) -> usize {
        self.with_loader(|loader, scene, host| loader.wait_for_loads(scene, host))
    }

    // Runs a loader call with the context as its host. A scene installed
    // by the call restarts the clock.
    fn with_loader<R>(
        &mut self,
        call: impl FnOnce(&mut SceneLoader, &mut SceneState, &mut dyn SceneHost) -> R,
    ) -> R {
        let generation = self.scene.generation();
        let Self {
            loader,
            scene,
            audio,
            scripts,
            ..
        } = self;
        let mut host = Host {
            audio: audio.as_mut(),
            scripts,
        };
        let result = call(loader, scene, &mut host);

        if self.scene.generation() != generation && self.scene.graph.is_some() {
            log::debug!("new scene installed; restarting the clock");
            self.time.reset();
        }
        result
    }

    /// One pass of the animation loop: apply finished loads, run scripts,
    /// then draw.
    pub fn tick(&mut self) -> Result<(), EngineError> {
        self.flush();
        self.animate_frame();
        self.render()
    }

    /// Updates the scene for one frame without drawing it.
    pub fn animate_frame(&mut self) {
        self.time.update();

        let (width, height) = self.canvas;
        if let Some(camera) = self.scene.camera_mut() {
            camera.set_aspect(width, height);
        }

        if let Some(graph) = self.scene.graph.as_mut() {
            for id in graph.traverse() {
                let names: Vec<String> = graph[id].scripts().map(str::to_owned).collect();
                for name in &names {
                    // Unregistered names are skipped
                    self.scripts.run(
                        name,
                        ScriptArgs {
                            id,
                            graph: &mut *graph,
                            input: &self.input,
                            time: &self.time,
                        },
                    );
                }
            }
        }

        self.input.end_frame();
    }

    /// Draws the current scene from the active camera. With a piece
    /// missing nothing is drawn and the missing pieces are reported.
    pub fn render(&mut self) -> Result<(), EngineError> {
        let mut missing = Missing::empty();
        missing.set(Missing::SCENE, self.scene.graph.is_none());
        missing.set(Missing::CAMERA, self.scene.camera().is_none());
        missing.set(Missing::RENDERER, self.renderer.is_none());

        match (&self.scene.graph, self.scene.active_camera, self.renderer.as_mut()) {
            (Some(graph), Some(camera), Some(renderer)) if missing.is_empty() => {
                renderer.render(graph, camera);
                Ok(())
            }
            _ => {
                log::warn!("{missing}");
                Err(EngineError::NotReady(missing))
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("resizing canvas to {width}x{height}");
        self.canvas = (width, height);

        if let Some(camera) = self.scene.camera_mut() {
            camera.set_aspect(width, height);
        }
        if height > 0 {
            self.loader.options_mut().aspect_ratio = width as f32 / height as f32;
        }
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_size(width, height);
        }
    }
}
