use std::{
    collections::HashMap,
    fmt::Write as _,
    ops::{Index, IndexMut},
};

use prism_core::{Assets, transform::Transform};
use serde_json::{Map, Value};

use crate::{
    material::{Material, Texture},
    node::NodeKind,
};

/// Index of a node inside its [`SceneGraph`]. Only meaningful for the graph
/// that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub transform: Transform,
    pub visible: bool,
    pub user_data: Map<String, Value>,
    name: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            transform: Transform::default(),
            visible: true,
            user_data: Map::new(),
            name: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the name the node is registered under once attached.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Names listed under `userData.scripts`. Non-string entries are skipped.
    pub fn scripts(&self) -> impl Iterator<Item = &str> {
        self.user_data
            .get("scripts")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }
}

/// Arena-backed scene graph. Nodes are appended and never removed, so a
/// [`NodeId`] stays valid for the lifetime of the graph.
///
/// The graph owns the per-scene material and texture stores and a name
/// registry that answers name lookups without walking the tree.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    names: HashMap<String, Vec<NodeId>>,
    pub materials: Assets<Material>,
    pub textures: Assets<Texture>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::new(NodeKind::Scene)],
            names: HashMap::new(),
            materials: Assets::default(),
            textures: Assets::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists.
        false
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.index())
    }

    /// Appends `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let name = node.name.take();

        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self[parent].children.push(id);

        if let Some(name) = name {
            self.set_name(id, name);
        }
        id
    }

    /// Names (or renames) a node and records it in the registry.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
        let name = name.into();

        if let Some(previous) = self[id].name.take() {
            if let Some(ids) = self.names.get_mut(&previous) {
                ids.retain(|other| *other != id);
            }
        }

        self.names.entry(name.clone()).or_default().push(id);
        self[id].name = Some(name);
    }

    /// First node called `name` in pre-order traversal.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.find_in_subtree(self.root(), name)
    }

    /// First node called `name` in a pre-order walk of `root`'s subtree,
    /// `root` included.
    pub fn find_in_subtree(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.names
            .get(name)?
            .iter()
            .copied()
            .filter(|id| self.is_ancestor_or_self(root, *id))
            .min_by_key(|id| self.tree_path(*id))
    }

    // Child indices from the root down to `id`. Comparing two paths
    // compares the nodes' pre-order positions.
    fn tree_path(&self, mut id: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        while let Some(parent) = self[id].parent {
            let index = self[parent]
                .children
                .iter()
                .position(|child| *child == id)
                .unwrap_or_default();
            path.push(index);
            id = parent;
        }
        path.reverse();
        path
    }

    pub fn is_ancestor_or_self(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.get(id).and_then(SceneNode::parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Pre-order (parent before children, children in order) walk from the
    /// root.
    pub fn traverse(&self) -> Vec<NodeId> {
        self.traverse_from(self.root())
    }

    pub fn traverse_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self[id].children.iter().rev().copied());
        }
        order
    }

    /// Indented one-line-per-node dump, for logs.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(self.root(), 0, &mut out);
        out
    }

    fn write_outline(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = &self[id];
        let _ = write!(out, "{:indent$}{}", "", node.kind.label(), indent = depth * 2);
        if let Some(name) = node.name() {
            let _ = write!(out, " {name:?}");
        }
        if !node.visible {
            out.push_str(" (hidden)");
        }
        out.push('\n');

        for child in &node.children {
            self.write_outline(*child, depth + 1, out);
        }
    }
}

impl Index<NodeId> for SceneGraph {
    type Output = SceneNode;

    fn index(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for SceneGraph {
    fn index_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> SceneNode {
        SceneNode::new(NodeKind::Group)
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.add_child(root, group());
        let b = graph.add_child(root, group());
        let a1 = graph.add_child(a, group());

        assert_eq!(graph[root].children(), &[a, b]);
        assert_eq!(graph[a1].parent(), Some(a));
        assert_eq!(graph.traverse(), vec![root, a, a1, b]);
        assert_eq!(graph.len(), 4);
    }

    #[test]
    fn name_lookup_tracks_renames() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let first = graph.add_child(root, group());
        let second = graph.add_child(root, group());
        graph.set_name(first, "lamp");
        graph.set_name(second, "lamp");

        assert_eq!(graph.find_by_name("lamp"), Some(first));

        graph.set_name(first, "renamed");
        assert_eq!(graph.find_by_name("lamp"), Some(second));
        assert_eq!(graph[first].name(), Some("renamed"));
    }

    #[test]
    fn name_lookup_prefers_tree_order_over_registration() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let early = graph.add_child(root, group());
        let late = graph.add_child(root, group().named("x"));
        // Attached after `late` but sits before it in the tree
        let nested = graph.add_child(early, group().named("x"));

        assert_eq!(graph.find_by_name("x"), Some(nested));
        assert_eq!(graph.find_in_subtree(root, "x"), Some(nested));
        assert_eq!(graph.find_in_subtree(late, "x"), Some(late));
        assert_eq!(graph.find_in_subtree(early, "x"), Some(nested));
    }

    #[test]
    fn subtree_lookup_ignores_other_branches() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let left = graph.add_child(root, group());
        let right = graph.add_child(root, group());
        let target = graph.add_child(right, group());
        graph.set_name(target, "target");

        assert_eq!(graph.find_in_subtree(left, "target"), None);
        assert_eq!(graph.find_in_subtree(right, "target"), Some(target));
        assert_eq!(graph.find_in_subtree(root, "target"), Some(target));
    }

    #[test]
    fn scripts_reads_string_entries() {
        let mut node = group();
        node.user_data
            .insert("scripts".into(), serde_json::json!(["spin", 3, "bob"]));
        assert_eq!(node.scripts().collect::<Vec<_>>(), vec!["spin", "bob"]);
        assert_eq!(group().scripts().count(), 0);
    }
}
