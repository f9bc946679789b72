use std::collections::HashMap;

use prism_core::time::Time;
use prism_input::InputState;
use prism_scene::{NodeId, SceneGraph, SceneNode};

/// What a script sees when it runs for one node: the node's id and the
/// whole graph it lives in.
pub struct ScriptArgs<'a> {
    pub id: NodeId,
    pub graph: &'a mut SceneGraph,
    pub input: &'a InputState,
    pub time: &'a Time,
}

impl ScriptArgs<'_> {
    pub fn node(&self) -> &SceneNode {
        &self.graph[self.id]
    }

    pub fn node_mut(&mut self) -> &mut SceneNode {
        &mut self.graph[self.id]
    }
}

pub type Script = Box<dyn FnMut(ScriptArgs<'_>)>;

/// Named per-node callbacks. Nodes list the names they want run in
/// `userData.scripts`; names nobody registered are skipped.
#[derive(Default)]
pub struct ScriptRegistry {
    scripts: HashMap<String, Script>,
    // Source text of `scriptFiles`, keyed by url
    sources: HashMap<String, String>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `script` under `name`, replacing any earlier one.
    pub fn register(&mut self, name: impl Into<String>, script: impl FnMut(ScriptArgs<'_>) + 'static) {
        self.scripts.insert(name.into(), Box::new(script));
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.scripts.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }

    /// Runs the script called `name`. Returns false when there is none.
    pub fn run(&mut self, name: &str, args: ScriptArgs<'_>) -> bool {
        match self.scripts.get_mut(name) {
            Some(script) => {
                script(args);
                true
            }
            None => false,
        }
    }

    pub fn add_source(&mut self, url: impl Into<String>, source: String) {
        self.sources.insert(url.into(), source);
    }

    pub fn source(&self, url: &str) -> Option<&str> {
        self.sources.get(url).map(String::as_str)
    }
}

impl std::fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptRegistry")
            .field("scripts", &self.scripts.keys().collect::<Vec<_>>())
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_scene::NodeKind;

    #[test]
    fn runs_registered_and_skips_unknown() {
        let mut registry = ScriptRegistry::new();
        registry.register("hide", |mut args: ScriptArgs<'_>| args.node_mut().visible = false);

        let mut graph = SceneGraph::new();
        let root = graph.root();
        let id = graph.add_child(root, SceneNode::new(NodeKind::Group));
        let input = InputState::default();
        let time = Time::default();

        let ran = registry.run(
            "hide",
            ScriptArgs {
                id,
                graph: &mut graph,
                input: &input,
                time: &time,
            },
        );
        assert!(ran);
        assert!(!graph[id].visible);

        let ran = registry.run(
            "missing",
            ScriptArgs {
                id,
                graph: &mut graph,
                input: &input,
                time: &time,
            },
        );
        assert!(!ran);
        assert!(registry.unregister("hide"));
        assert!(!registry.contains("hide"));
    }
}
