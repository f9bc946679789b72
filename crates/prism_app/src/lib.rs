//! Engine loop around a declarative scene: an [`EngineContext`] owns the
//! loaded scene, the IO runtime feeding it, input state and the named
//! scripts nodes ask to run every frame.

mod audio;
mod context;
mod error;
mod script;

pub use audio::{AudioBackend, LogAudio};
pub use context::EngineContext;
pub use error::{EngineError, Missing};
pub use script::{Script, ScriptArgs, ScriptRegistry};

/// Scripts the binary ships with, usable from any scene's
/// `userData.scripts`.
pub fn register_builtin_scripts(scripts: &mut ScriptRegistry) {
    scripts.register("spin", |mut args: ScriptArgs<'_>| {
        let delta = args.time.delta_seconds();
        args.node_mut().transform.rotate_y(delta);
    });
    scripts.register("bob", |mut args: ScriptArgs<'_>| {
        let phase = args.time.elapsed_seconds() * std::f32::consts::TAU;
        let step = phase.sin() * args.time.delta_seconds();
        args.node_mut().transform.translation.y += step;
    });
}
