//! Scene graph consumed by the camera, picking and effects managers.
//!
//! A flat id → node map with parent/child links. The managers only hold
//! [`NodeId`]s; the scene owns every node, its geometry and its material.

mod geometry;
mod node;

use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;
use serde_json::Value;

pub use geometry::{BoundingSphere, Geometry, Topology};
pub use node::{
    BasicMaterial, LightKind, Material, Node, NodeId, NodeKind, Transform,
};

/// Hierarchical node container with a single root group.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: FxHashMap<NodeId, Node>,
    root: NodeId,
    next_id: u32,
    /// Clear color, `None` for transparent (overlay renders clear it).
    pub background: Option<[f32; 4]>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene containing only the root group.
    #[must_use]
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut root_node = Node::group("Scene");
        root_node.id = root;
        let mut nodes = FxHashMap::default();
        let _ = nodes.insert(root, root_node);
        Self {
            nodes,
            root,
            next_id: 1,
            background: Some([0.05, 0.05, 0.07, 1.0]),
        }
    }

    /// Id of the root group.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Insert `node` under `parent`. Returns `None` if the parent does not
    /// exist.
    pub fn add(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = NodeId(self.next_id);
        self.next_id += 1;
        node_attach(&mut self.nodes, parent, id, node);
        Some(id)
    }

    /// Insert `node` directly under the root.
    pub fn add_to_root(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        node_attach(&mut self.nodes, self.root, id, node);
        id
    }

    /// Remove a node and its whole subtree. Returns the removed subtree root.
    ///
    /// The scene root itself cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        if id == self.root {
            return None;
        }
        let node = self.nodes.remove(&id)?;
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }
        let mut stack = node.children.clone();
        while let Some(child) = stack.pop() {
            if let Some(removed) = self.nodes.remove(&child) {
                stack.extend_from_slice(&removed.children);
            }
        }
        Some(node)
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Look up a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Whether `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// First node named `name` in depth-first order.
    #[must_use]
    pub fn object_by_name(&self, name: &str) -> Option<NodeId> {
        self.find(self.root, |n| n.name == name)
    }

    /// First node whose property `key` equals `value`, in depth-first order.
    ///
    /// `"name"` and `"id"` resolve to the built-in fields; any other key is
    /// looked up in the node's user data.
    #[must_use]
    pub fn object_by_property(&self, key: &str, value: &Value) -> Option<NodeId> {
        self.find(self.root, |n| match key {
            "name" => value.as_str() == Some(n.name.as_str()),
            "id" => value.as_u64() == Some(u64::from(n.id.0)),
            _ => n.user_data.get(key) == Some(value),
        })
    }

    /// First node in the subtree of `start` (inclusive) matching `pred`.
    #[must_use]
    pub fn find(
        &self,
        start: NodeId,
        mut pred: impl FnMut(&Node) -> bool,
    ) -> Option<NodeId> {
        let mut found = None;
        self.traverse_while(start, &mut |node| {
            if pred(node) {
                found = Some(node.id);
                false
            } else {
                true
            }
        });
        found
    }

    /// Depth-first pre-order visit of the subtree rooted at `start`.
    pub fn traverse(&self, start: NodeId, mut visitor: impl FnMut(&Node)) {
        self.traverse_while(start, &mut |node| {
            visitor(node);
            true
        });
    }

    /// Depth-first visit that skips invisible nodes and their subtrees.
    pub fn traverse_visible(
        &self,
        start: NodeId,
        mut visitor: impl FnMut(&Node),
    ) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            visitor(node);
            stack.extend(node.children.iter().rev());
        }
    }

    fn traverse_while(
        &self,
        start: NodeId,
        visitor: &mut dyn FnMut(&Node) -> bool,
    ) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if !visitor(node) {
                return;
            }
            stack.extend(node.children.iter().rev());
        }
    }

    /// Local-to-world matrix of a node (identity for unknown ids).
    #[must_use]
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = self.nodes.get(&id);
        while let Some(node) = current {
            matrix = node.transform.matrix() * matrix;
            current = node.parent.and_then(|p| self.nodes.get(&p));
        }
        matrix
    }

    /// World-space position of a node's origin.
    #[must_use]
    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }

    /// Whether the node and every ancestor are visible.
    #[must_use]
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut current = self.nodes.get(&id);
        while let Some(node) = current {
            if !node.visible {
                return false;
            }
            current = node.parent.and_then(|p| self.nodes.get(&p));
        }
        true
    }
}

fn node_attach(
    nodes: &mut FxHashMap<NodeId, Node>,
    parent: NodeId,
    id: NodeId,
    mut node: Node,
) {
    if let Some(parent_node) = nodes.get_mut(&parent) {
        parent_node.children.push(id);
    }
    node.id = id;
    node.parent = Some(parent);
    node.children.clear();
    let _ = nodes.insert(id, node);
}
