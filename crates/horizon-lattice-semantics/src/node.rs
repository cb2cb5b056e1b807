//! Semantics nodes and the per-frame semantics tree.
//!
//! The tree is an arena: nodes live in a [`SlotMap`] addressed by [`NodeKey`],
//! children are ordered key lists, and parent lookups go through a side map.
//! Nodes never hold references to each other.
//!
//! [`SemanticsId`] is the producer-assigned identity that the diff engine keys
//! on. It is distinct from [`NodeKey`]: an id may be reused by an unrelated
//! element once its previous owner is gone, and a producer bug may even put
//! the same id on two live nodes.

use std::fmt;

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::error::{SemanticsError, SemanticsResult};
use crate::geometry::Rect;
use crate::logging::targets;
use crate::property::{
    ActionDescriptor, ActionKind, Axis, PropertyKey, PropertyMap, PropertyValue, ScrollAxisRange,
    TextRange,
};
use crate::role::Role;

new_key_type! {
    /// Arena key of a node within one [`SemanticsTree`].
    ///
    /// Keys are only meaningful for the tree that produced them.
    pub struct NodeKey;
}

/// Producer-assigned identity of a semantics node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SemanticsId(pub i32);

impl fmt::Display for SemanticsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<i32> for SemanticsId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

/// One UI element's accessible properties.
#[derive(Debug, Clone)]
pub struct SemanticsNode {
    id: SemanticsId,
    properties: PropertyMap,
    merges_descendants: bool,
    bounds: Rect,
    placed: bool,
}

impl SemanticsNode {
    /// Create a placed node with no properties and empty bounds.
    pub fn new(id: impl Into<SemanticsId>) -> Self {
        Self {
            id: id.into(),
            properties: PropertyMap::new(),
            merges_descendants: false,
            bounds: Rect::ZERO,
            placed: true,
        }
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_property(mut self, key: PropertyKey, value: PropertyValue) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_property(PropertyKey::Text, PropertyValue::TextList(vec![text.into()]))
    }

    pub fn with_content_description(self, description: impl Into<String>) -> Self {
        self.with_property(
            PropertyKey::ContentDescription,
            PropertyValue::TextList(vec![description.into()]),
        )
    }

    /// Make this node a text field holding `text` with the given selection.
    pub fn with_editable_text(self, text: impl Into<String>, selection: TextRange) -> Self {
        self.with_property(PropertyKey::EditableText, PropertyValue::Text(text.into()))
            .with_property(PropertyKey::TextSelectionRange, PropertyValue::Selection(selection))
    }

    pub fn with_role(self, role: Role) -> Self {
        self.with_property(PropertyKey::Role, PropertyValue::Role(role))
    }

    pub fn with_action(self, kind: ActionKind, action: ActionDescriptor) -> Self {
        self.with_property(PropertyKey::Action(kind), PropertyValue::Action(action))
    }

    pub fn with_scroll_range(self, axis: Axis, range: ScrollAxisRange) -> Self {
        self.with_property(axis.range_key(), PropertyValue::Scroll(range))
    }

    /// Mark this node as exposing its subtree as one combined unit.
    pub fn merging_descendants(mut self) -> Self {
        self.merges_descendants = true;
        self
    }

    /// Mark this node as not placed; the occlusion walker skips it and its
    /// subtree entirely.
    pub fn not_placed(mut self) -> Self {
        self.placed = false;
        self
    }

    #[inline]
    pub fn id(&self) -> SemanticsId {
        self.id
    }

    #[inline]
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    #[inline]
    pub fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }

    #[inline]
    pub fn merges_descendants(&self) -> bool {
        self.merges_descendants
    }

    /// Declared bounds, as produced by layout (possibly malformed).
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        self.placed
    }

    /// Whether this node participates in occlusion.
    pub fn is_important_for_accessibility(&self) -> bool {
        self.merges_descendants || !self.properties.is_empty()
    }
}

/// A frame's semantics tree.
#[derive(Debug, Default)]
pub struct SemanticsTree {
    nodes: SlotMap<NodeKey, SemanticsNode>,
    children: SecondaryMap<NodeKey, Vec<NodeKey>>,
    parents: SecondaryMap<NodeKey, NodeKey>,
    root: Option<NodeKey>,
}

impl SemanticsTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parents: SecondaryMap::new(),
            root: None,
        }
    }

    /// Create a tree holding only `root`.
    pub fn with_root(root: SemanticsNode) -> (Self, NodeKey) {
        let mut tree = Self::new();
        let key = tree.insert_detached(root);
        tree.root = Some(key);
        (tree, key)
    }

    /// Set the root node. Fails if the tree already has one.
    pub fn set_root(&mut self, root: SemanticsNode) -> SemanticsResult<NodeKey> {
        if self.root.is_some() {
            return Err(SemanticsError::RootAlreadySet);
        }
        let key = self.insert_detached(root);
        self.root = Some(key);
        Ok(key)
    }

    /// Append `node` as the last (top-most) child of `parent`.
    pub fn push_child(&mut self, parent: NodeKey, node: SemanticsNode) -> SemanticsResult<NodeKey> {
        if !self.nodes.contains_key(parent) {
            return Err(SemanticsError::InvalidNodeKey);
        }
        let key = self.insert_detached(node);
        self.parents.insert(key, parent);
        if let Some(children) = self.children.get_mut(parent) {
            children.push(key);
        }
        Ok(key)
    }

    fn insert_detached(&mut self, node: SemanticsNode) -> NodeKey {
        let id = node.id();
        let key = self.nodes.insert(node);
        self.children.insert(key, Vec::new());
        tracing::trace!(target: targets::TREE, ?key, %id, "inserted semantics node");
        key
    }

    /// Remove a node and its whole subtree.
    pub fn remove(&mut self, key: NodeKey) -> SemanticsResult<()> {
        if !self.nodes.contains_key(key) {
            return Err(SemanticsError::InvalidNodeKey);
        }

        if let Some(parent) = self.parents.get(key).copied()
            && let Some(siblings) = self.children.get_mut(parent)
        {
            siblings.retain(|&child| child != key);
        }

        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(children) = self.children.remove(current) {
                stack.extend(children);
            }
            self.parents.remove(current);
            self.nodes.remove(current);
        }

        if self.root == Some(key) {
            self.root = None;
        }
        Ok(())
    }

    #[inline]
    pub fn root(&self) -> Option<NodeKey> {
        self.root
    }

    /// The root node, or [`SemanticsError::MissingRoot`].
    pub fn root_node(&self) -> SemanticsResult<&SemanticsNode> {
        self.root
            .and_then(|key| self.nodes.get(key))
            .ok_or(SemanticsError::MissingRoot)
    }

    pub fn get(&self, key: NodeKey) -> Option<&SemanticsNode> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut SemanticsNode> {
        self.nodes.get_mut(key)
    }

    /// Children of `key` in draw order (back to front).
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.children.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.parents.get(key).copied()
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find the key of the node carrying `id`, scanning in pre-order.
    ///
    /// With duplicate ids the last match in pre-order wins.
    pub fn find(&self, id: SemanticsId) -> Option<NodeKey> {
        self.preorder()
            .filter(|&key| self.nodes.get(key).is_some_and(|node| node.id() == id))
            .last()
    }

    /// Pre-order traversal from the root, children in draw order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }
}

/// Pre-order iterator over a [`SemanticsTree`].
pub struct Preorder<'a> {
    tree: &'a SemanticsTree,
    stack: Vec<NodeKey>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let key = self.stack.pop()?;
        self.stack.extend(self.tree.children(key).iter().rev());
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (SemanticsTree, NodeKey, NodeKey, NodeKey) {
        let (mut tree, root) = SemanticsTree::with_root(SemanticsNode::new(1));
        let a = tree.push_child(root, SemanticsNode::new(2)).unwrap();
        let b = tree.push_child(root, SemanticsNode::new(3)).unwrap();
        (tree, root, a, b)
    }

    #[test]
    fn test_parent_and_children() {
        let (tree, root, a, b) = sample();
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_preorder() {
        let (mut tree, _, a, _) = sample();
        tree.push_child(a, SemanticsNode::new(4)).unwrap();
        let ids: Vec<i32> = tree.preorder().map(|k| tree.get(k).unwrap().id().0).collect();
        assert_eq!(ids, vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_remove_cascades() {
        let (mut tree, root, a, b) = sample();
        let grandchild = tree.push_child(a, SemanticsNode::new(4)).unwrap();

        tree.remove(a).unwrap();
        assert!(tree.get(a).is_none());
        assert!(tree.get(grandchild).is_none());
        assert_eq!(tree.children(root), &[b]);
        assert!(matches!(tree.remove(a), Err(SemanticsError::InvalidNodeKey)));
    }

    #[test]
    fn test_root_errors() {
        let mut tree = SemanticsTree::new();
        assert!(matches!(tree.root_node(), Err(SemanticsError::MissingRoot)));
        tree.set_root(SemanticsNode::new(1)).unwrap();
        assert!(matches!(
            tree.set_root(SemanticsNode::new(2)),
            Err(SemanticsError::RootAlreadySet)
        ));
    }

    #[test]
    fn test_find_duplicate_last_wins() {
        let (mut tree, root, _, _) = sample();
        let dup = tree.push_child(root, SemanticsNode::new(2)).unwrap();
        assert_eq!(tree.find(SemanticsId(2)), Some(dup));
        assert_eq!(tree.find(SemanticsId(99)), None);
    }

    #[test]
    fn test_push_child_stale_parent() {
        let (mut tree, _, a, _) = sample();
        tree.remove(a).unwrap();
        assert!(matches!(
            tree.push_child(a, SemanticsNode::new(9)),
            Err(SemanticsError::InvalidNodeKey)
        ));
    }
}
