//! Tree operations: create, attach, remove, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId};

const EMPTY_CHILDREN: &[NodeId] = &[];

/// The live node tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that node removal is O(subtree size) and lookup is O(1).
/// A node may exist detached (created but not yet attached); the builder
/// relies on that to attach only once a node's type has been validated.
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl Dom {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a parentless node. The first one inserted becomes the root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.create(data);
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a detached node without touching the root.
    pub fn create(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        id
    }

    /// Insert a node and append it under `parent`. When `parent` does not
    /// exist the node stays detached.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.create(data);
        self.append_child(parent, id);
        id
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    ///
    /// Returns `false` (and changes nothing) when either node is missing or
    /// when the move would make a node its own ancestor.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) {
            return false;
        }
        if parent == child || self.ancestors(parent).contains(&child) {
            return false;
        }
        self.detach(child);
        if self.root == Some(child) {
            self.root = None;
        }
        self.parent.insert(child, parent);
        match self.children.get_mut(parent) {
            Some(siblings) => siblings.push(child),
            None => {
                self.children.insert(parent, vec![child]);
            }
        }
        true
    }

    /// Detach `id` from its parent, keeping its subtree.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }
    }

    /// Remove a node and all its descendants.
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        self.detach(id);
        if self.root == Some(id) {
            self.root = None;
        }

        let mut to_remove = VecDeque::from([id]);
        let mut removed = None;
        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed = data;
            }
        }
        removed
    }

    /// The parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Children of a node in order; empty when it has none or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Ancestors of `id`, nearest first. Does not include `id`.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// The current root node, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Explicitly set the root node.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        result
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ```text
    ///       root
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (Dom, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("Container").with_id("root"));
        let a = dom.insert_child(root, NodeData::new("Column").with_id("a"));
        let b = dom.insert_child(root, NodeData::new("Row").with_id("b"));
        let c = dom.insert_child(a, NodeData::new("Button").with_id("c"));
        let d = dom.insert_child(a, NodeData::new("Text").with_id("d"));
        (dom, root, a, b, c, d)
    }

    #[test]
    fn insert_sets_root_once() {
        let mut dom = Dom::new();
        let first = dom.insert(NodeData::new("First"));
        let _second = dom.insert(NodeData::new("Second"));
        assert_eq!(dom.root(), Some(first));
    }

    #[test]
    fn create_is_detached() {
        let mut dom = Dom::new();
        let id = dom.create(NodeData::new("Text"));
        assert_eq!(dom.root(), None);
        assert_eq!(dom.parent(id), None);
        assert!(dom.contains(id));
    }

    #[test]
    fn parent_and_children() {
        let (dom, root, a, b, c, d) = build_tree();
        assert_eq!(dom.parent(a), Some(root));
        assert_eq!(dom.parent(c), Some(a));
        assert_eq!(dom.parent(root), None);
        assert_eq!(dom.children(root), &[a, b]);
        assert_eq!(dom.children(a), &[c, d]);
        assert!(dom.children(c).is_empty());
        assert_eq!(dom.ancestors(c), vec![a, root]);
    }

    #[test]
    fn append_child_moves_between_parents() {
        let (mut dom, root, a, b, c, _d) = build_tree();
        assert!(dom.append_child(b, c));
        assert_eq!(dom.parent(c), Some(b));
        assert!(!dom.children(a).contains(&c));
        assert_eq!(dom.ancestors(c), vec![b, root]);
    }

    #[test]
    fn append_child_rejects_cycles_and_missing_nodes() {
        let (mut dom, root, a, _b, c, _d) = build_tree();
        assert!(!dom.append_child(c, a));
        assert!(!dom.append_child(a, a));
        assert_eq!(dom.parent(a), Some(root));

        let stale = dom.create(NodeData::new("X"));
        dom.remove(stale);
        assert!(!dom.append_child(root, stale));
        assert!(!dom.append_child(stale, c));
    }

    #[test]
    fn remove_subtree() {
        let (mut dom, root, a, b, c, d) = build_tree();
        let removed = dom.remove(a).unwrap();
        assert_eq!(removed.node_type, "Column");
        for gone in [a, c, d] {
            assert!(!dom.contains(gone));
        }
        assert_eq!(dom.children(root), &[b]);
        assert_eq!(dom.len(), 2);
        assert!(dom.remove(a).is_none());
    }

    #[test]
    fn remove_root_clears_root() {
        let (mut dom, root, ..) = build_tree();
        dom.remove(root);
        assert!(dom.is_empty());
        assert_eq!(dom.root(), None);
    }

    #[test]
    fn walk_depth_first() {
        let (dom, root, a, b, c, d) = build_tree();
        assert_eq!(dom.walk_depth_first(root), vec![root, a, c, d, b]);
        assert_eq!(dom.walk_depth_first(a), vec![a, c, d]);
    }
}
