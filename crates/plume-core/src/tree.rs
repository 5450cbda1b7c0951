//! Arena-backed element tree.
//!
//! Nodes live in a single [`SlotMap`] keyed by [`NodeId`]. A parent owns an
//! ordered list of child ids; sibling relations are derived from that list, so
//! there are no hand-maintained next/prev links that can fall out of sync.
//!
//! Child order is stacking order: index 0 is the back, the last child is the
//! front and wins hit-tests.
//!
//! # Key Types
//!
//! - [`Tree`] - The arena and its parent/child relations
//! - [`NodeId`] - Stable handle to a node
//! - [`InsertAt`] - Where a node is attached among its new siblings

use std::fmt;

use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A stable handle to a node in a [`Tree`].
    ///
    /// Ids stay valid while the tree changes shape and become invalid once the
    /// node is removed. A removed id is never reused for a different node.
    pub struct NodeId;
}

impl NodeId {
    /// Convert the id to a raw u64 value, for interop and logging.
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }
}

/// Errors that can occur during tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The node id is invalid or the node has been removed.
    InvalidNode,
    /// Attempted to make a node its own parent or ancestor.
    CircularParentage,
    /// The reference node for a sibling insertion has no parent.
    NotSibling,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNode => write!(f, "Invalid or removed node id"),
            Self::CircularParentage => {
                write!(f, "Cannot set a node as its own parent or ancestor")
            }
            Self::NotSibling => write!(f, "Reference node has no parent to insert beside"),
        }
    }
}

impl std::error::Error for TreeError {}

/// Result type for tree operations.
pub type TreeResult<T> = std::result::Result<T, TreeError>;

/// Where to attach a node among its new siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    /// As the first (back-most) child of the parent.
    First(NodeId),
    /// As the last (front-most) child of the parent.
    Last(NodeId),
    /// Immediately before the given sibling.
    Before(NodeId),
    /// Immediately after the given sibling.
    After(NodeId),
}

struct Node<T> {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: T,
}

/// An arena of nodes with parent/child relations.
pub struct Tree<T> {
    nodes: SlotMap<NodeId, Node<T>>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Add a detached node and return its id.
    pub fn insert(&mut self, name: impl Into<String>, data: T) -> NodeId {
        let id = self.nodes.insert(Node {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            data,
        });
        tracing::trace!(target: targets::TREE, id = id.as_raw(), "inserted node");
        id
    }

    /// Insert a new node directly at the given position.
    ///
    /// If the position is invalid the node is not left in the arena.
    pub fn insert_at(&mut self, name: impl Into<String>, data: T, at: InsertAt) -> TreeResult<NodeId> {
        let id = self.insert(name, data);
        if let Err(err) = self.attach(id, at) {
            self.nodes.remove(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Check if a node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node's data.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id).map(|n| &n.data)
    }

    /// Mutably borrow a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id).map(|n| &mut n.data)
    }

    /// Get the node's name.
    pub fn name(&self, id: NodeId) -> TreeResult<&str> {
        self.nodes
            .get(id)
            .map(|n| n.name.as_str())
            .ok_or(TreeError::InvalidNode)
    }

    /// Set the node's name.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> TreeResult<()> {
        self.nodes
            .get_mut(id)
            .map(|n| n.name = name.into())
            .ok_or(TreeError::InvalidNode)
    }

    /// Get the parent of a node.
    pub fn parent(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        self.nodes
            .get(id)
            .map(|n| n.parent)
            .ok_or(TreeError::InvalidNode)
    }

    /// Get the children of a node in stacking order.
    pub fn children(&self, id: NodeId) -> TreeResult<&[NodeId]> {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .ok_or(TreeError::InvalidNode)
    }

    pub fn first_child(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.children(id)?.first().copied())
    }

    pub fn last_child(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.children(id)?.last().copied())
    }

    /// Attach a detached node at the given position.
    ///
    /// Attaching a node that already has a parent moves it.
    pub fn attach(&mut self, id: NodeId, at: InsertAt) -> TreeResult<()> {
        if !self.nodes.contains_key(id) {
            return Err(TreeError::InvalidNode);
        }

        let parent = match at {
            InsertAt::First(p) | InsertAt::Last(p) => p,
            InsertAt::Before(s) | InsertAt::After(s) => {
                if s == id {
                    return Err(TreeError::CircularParentage);
                }
                self.parent(s)?.ok_or(TreeError::NotSibling)?
            }
        };
        if !self.nodes.contains_key(parent) {
            return Err(TreeError::InvalidNode);
        }
        if self.is_ancestor_of(id, parent) {
            return Err(TreeError::CircularParentage);
        }

        self.detach(id)?;

        let siblings = &mut self.nodes[parent].children;
        let index = match at {
            InsertAt::First(_) => 0,
            InsertAt::Last(_) => siblings.len(),
            InsertAt::Before(s) => siblings.iter().position(|&c| c == s).unwrap_or(0),
            InsertAt::After(s) => siblings
                .iter()
                .position(|&c| c == s)
                .map_or(siblings.len(), |p| p + 1),
        };
        siblings.insert(index, id);
        self.nodes[id].parent = Some(parent);

        tracing::trace!(target: targets::TREE, id = id.as_raw(), parent = parent.as_raw(), index, "attached node");
        Ok(())
    }

    /// Remove a node from its parent's child list, leaving it as a detached root.
    pub fn detach(&mut self, id: NodeId) -> TreeResult<()> {
        let old_parent = self.parent(id)?;
        if let Some(parent_id) = old_parent {
            if let Some(parent) = self.nodes.get_mut(parent_id) {
                parent.children.retain(|&child| child != id);
            }
            self.nodes[id].parent = None;
        }
        Ok(())
    }

    /// Set the parent of a node, appending it as the last child.
    ///
    /// Passing `None` detaches it.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> TreeResult<()> {
        match parent {
            Some(p) => self.attach(id, InsertAt::Last(p)),
            None => self.detach(id),
        }
    }

    /// Check if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == ancestor {
                return true;
            }
            current = self.nodes.get(current_id).and_then(|n| n.parent);
        }
        false
    }

    /// Iterate from a node's parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        std::iter::from_fn(move || {
            let id = current?;
            current = self.nodes.get(id).and_then(|n| n.parent);
            Some(id)
        })
    }

    /// Remove a node and all of its descendants.
    ///
    /// Returns the removed data in post-order: children before parents, and the
    /// node itself last.
    pub fn remove(&mut self, id: NodeId) -> TreeResult<Vec<(NodeId, T)>> {
        let order = self.post_order(id)?;
        self.detach(id)?;
        tracing::trace!(target: targets::TREE, id = id.as_raw(), count = order.len(), "removing subtree");

        Ok(order
            .into_iter()
            .filter_map(|node_id| self.nodes.remove(node_id).map(|n| (node_id, n.data)))
            .collect())
    }

    /// Depth-first pre-order listing of a subtree (parents before children).
    pub fn pre_order(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.nodes.get(current).ok_or(TreeError::InvalidNode)?;
            result.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(result)
    }

    /// Depth-first post-order listing of a subtree (children before parents).
    pub fn post_order(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        let mut result = Vec::new();
        self.post_order_recursive(id, &mut result)?;
        Ok(result)
    }

    fn post_order_recursive(&self, id: NodeId, result: &mut Vec<NodeId>) -> TreeResult<()> {
        let node = self.nodes.get(id).ok_or(TreeError::InvalidNode)?;
        for &child_id in &node.children {
            self.post_order_recursive(child_id, result)?;
        }
        result.push(id);
        Ok(())
    }

    /// Depth of a node, 0 for a root.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Iterate over all nodes with no parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Find a direct child by name.
    pub fn find_child_by_name(&self, id: NodeId, name: &str) -> TreeResult<Option<NodeId>> {
        let children = self.children(id)?;
        Ok(children
            .iter()
            .copied()
            .find(|&c| self.nodes.get(c).is_some_and(|n| n.name == name)))
    }

    // =========================================================================
    // Stacking order
    // =========================================================================

    /// Index of a node among its siblings, `None` for a root.
    pub fn sibling_index(&self, id: NodeId) -> TreeResult<Option<usize>> {
        match self.parent(id)? {
            Some(parent_id) => Ok(self.nodes[parent_id].children.iter().position(|&c| c == id)),
            None => Ok(None),
        }
    }

    /// The sibling just in front of this node.
    pub fn next_sibling(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        let Some(parent_id) = self.parent(id)? else {
            return Ok(None);
        };
        let siblings = &self.nodes[parent_id].children;
        Ok(siblings
            .iter()
            .position(|&c| c == id)
            .and_then(|pos| siblings.get(pos + 1).copied()))
    }

    /// The sibling just behind this node.
    pub fn previous_sibling(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        let Some(parent_id) = self.parent(id)? else {
            return Ok(None);
        };
        let siblings = &self.nodes[parent_id].children;
        Ok(siblings
            .iter()
            .position(|&c| c == id)
            .filter(|&pos| pos > 0)
            .map(|pos| siblings[pos - 1]))
    }

    /// Move a node to the front of its siblings.
    pub fn raise(&mut self, id: NodeId) -> TreeResult<()> {
        if let Some(parent_id) = self.parent(id)? {
            self.attach(id, InsertAt::Last(parent_id))?;
        }
        Ok(())
    }

    /// Move a node to the back of its siblings.
    pub fn lower(&mut self, id: NodeId) -> TreeResult<()> {
        if let Some(parent_id) = self.parent(id)? {
            self.attach(id, InsertAt::First(parent_id))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family() -> (Tree<&'static str>, NodeId, [NodeId; 3]) {
        let mut tree = Tree::new();
        let p = tree.insert("p", "P");
        let a = tree.insert_at("a", "A", InsertAt::Last(p)).unwrap();
        let b = tree.insert_at("b", "B", InsertAt::Last(p)).unwrap();
        let c = tree.insert_at("c", "C", InsertAt::Last(p)).unwrap();
        (tree, p, [a, b, c])
    }

    #[test]
    fn test_children_in_insertion_order() {
        let (tree, p, [a, b, c]) = family();
        assert_eq!(tree.children(p).unwrap(), &[a, b, c]);
        assert_eq!(tree.parent(b).unwrap(), Some(p));
        assert_eq!(tree.first_child(p).unwrap(), Some(a));
        assert_eq!(tree.last_child(p).unwrap(), Some(c));
    }

    #[test]
    fn test_detach_and_reinsert() {
        let (mut tree, p, [a, b, c]) = family();

        tree.detach(b).unwrap();
        assert_eq!(tree.children(p).unwrap(), &[a, c]);
        assert_eq!(tree.parent(b).unwrap(), None);
        assert_eq!(tree.next_sibling(a).unwrap(), Some(c));
        assert_eq!(tree.previous_sibling(c).unwrap(), Some(a));

        tree.attach(b, InsertAt::After(a)).unwrap();
        assert_eq!(tree.children(p).unwrap(), &[a, b, c]);
        assert_eq!(tree.next_sibling(a).unwrap(), Some(b));
        assert_eq!(tree.previous_sibling(c).unwrap(), Some(b));
    }

    #[test]
    fn test_insert_before_and_first() {
        let (mut tree, p, [a, b, c]) = family();
        let d = tree.insert_at("d", "D", InsertAt::Before(b)).unwrap();
        let e = tree.insert_at("e", "E", InsertAt::First(p)).unwrap();
        assert_eq!(tree.children(p).unwrap(), &[e, a, d, b, c]);
        assert_eq!(tree.sibling_index(d).unwrap(), Some(2));
    }

    #[test]
    fn test_circular_parentage_rejected() {
        let (mut tree, p, [a, _, _]) = family();
        assert_eq!(tree.set_parent(p, Some(a)), Err(TreeError::CircularParentage));
        assert_eq!(tree.set_parent(a, Some(a)), Err(TreeError::CircularParentage));
        // Nothing moved.
        assert_eq!(tree.parent(a).unwrap(), Some(p));
    }

    #[test]
    fn test_sibling_insert_on_root_fails_cleanly() {
        let mut tree: Tree<u8> = Tree::new();
        let root = tree.insert("root", 0);
        assert_eq!(tree.insert_at("x", 1, InsertAt::After(root)), Err(TreeError::NotSibling));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_reparent() {
        let (mut tree, p, [a, b, c]) = family();
        tree.set_parent(c, Some(a)).unwrap();
        assert_eq!(tree.children(p).unwrap(), &[a, b]);
        assert_eq!(tree.children(a).unwrap(), &[c]);
        assert_eq!(tree.depth(c), 2);
        assert_eq!(tree.ancestors(c).collect::<Vec<_>>(), vec![a, p]);
    }

    #[test]
    fn test_remove_is_post_order() {
        let (mut tree, p, [a, b, c]) = family();
        let a1 = tree.insert_at("a1", "A1", InsertAt::Last(a)).unwrap();

        let removed: Vec<_> = tree.remove(p).unwrap().into_iter().map(|(_, d)| d).collect();
        assert_eq!(removed, vec!["A1", "A", "B", "C", "P"]);
        for id in [p, a, b, c, a1] {
            assert!(!tree.contains(id));
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_remove_child_repairs_parent() {
        let (mut tree, p, [a, b, c]) = family();
        tree.remove(b).unwrap();
        assert_eq!(tree.children(p).unwrap(), &[a, c]);
        assert_eq!(tree.parent(b), Err(TreeError::InvalidNode));
    }

    #[test]
    fn test_pre_order() {
        let (mut tree, p, [a, b, c]) = family();
        let a1 = tree.insert_at("a1", "A1", InsertAt::Last(a)).unwrap();
        assert_eq!(tree.pre_order(p).unwrap(), vec![p, a, a1, b, c]);
    }

    #[test]
    fn test_raise_lower() {
        let (mut tree, p, [a, b, c]) = family();
        tree.raise(a).unwrap();
        assert_eq!(tree.children(p).unwrap(), &[b, c, a]);
        tree.lower(c).unwrap();
        assert_eq!(tree.children(p).unwrap(), &[c, b, a]);
    }

    #[test]
    fn test_find_child_by_name() {
        let (tree, p, [_, b, _]) = family();
        assert_eq!(tree.find_child_by_name(p, "b").unwrap(), Some(b));
        assert_eq!(tree.find_child_by_name(p, "zzz").unwrap(), None);
    }
}
