use std::error::Error;

use prism_app::{EngineContext, EngineError, register_builtin_scripts};
use prism_core::EngineConfig;
use prism_renderer::{HeadlessRenderer, Renderer};

const USAGE: &str = "usage: prism_app <scene.json> [config.json]";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(scene_url) = args.next() else {
        log::error!("{USAGE}");
        return Err(USAGE.into());
    };

    // 1. Configuration
    let config = match args.next() {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let frame_limit = config.frame_limit;
    let debug = config.debug;

    // 2. Context, renderer and scripts
    let renderer = HeadlessRenderer::new(config.canvas_width, config.canvas_height);
    let mut engine = EngineContext::from_config(config)?.with_renderer(renderer);
    register_builtin_scripts(&mut engine.scripts);

    // 3. Scene document arrives on a later flush
    engine.load_scene(&scene_url);

    // 4. Animation loop
    let mut frame = 0u64;
    while frame_limit.is_none_or(|limit| frame < limit) {
        match engine.tick() {
            // Already logged; keep ticking until the scene shows up
            Ok(()) | Err(EngineError::NotReady(_)) => {}
            Err(err) => return Err(err.into()),
        }
        frame += 1;

        if frame_limit.is_none() {
            std::thread::sleep(std::time::Duration::from_millis(16));
        }
    }

    if let Some(renderer) = engine.renderer.as_ref() {
        let stats = renderer.stats();
        log::info!(
            "{} frames, {} draw calls, {} lights, textures {} ready / {} pending",
            stats.frames,
            stats.draw_calls,
            stats.lights,
            stats.textures_ready,
            stats.textures_pending
        );
    }
    if debug {
        if let Some(graph) = engine.scene.graph.as_ref() {
            log::info!("scene:\n{}", graph.outline());
        }
    }

    Ok(())
}
