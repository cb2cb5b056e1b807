//! Occlusion walker: the set of reachable, unobstructed nodes.
//!
//! The walker keeps a region of "unaccounted space" that starts as the root's
//! bounds. Children are visited front to back (last child first). Each node's
//! visible part is its bounds clipped by its ancestors and intersected with
//! the unaccounted space. Once a node's subtree is done, a node that is
//! important for accessibility removes its own bounds from the unaccounted
//! space, hiding whatever is drawn beneath it.
//!
//! The root is always reported, even when it has no visible area, so there is
//! always one addressable id for the host. A reachable node with malformed
//! bounds (non-finite or negative size) is reported too, with empty adjusted
//! bounds: it keeps its identity but never satisfies a hit test.

use std::collections::{HashMap, HashSet};

use crate::geometry::{Rect, Region};
use crate::logging::{span_names, targets};
use crate::node::{NodeKey, SemanticsId, SemanticsNode, SemanticsTree};

/// A node paired with the part of its bounds that is actually visible.
#[derive(Debug, Clone, Copy)]
pub struct AdjustedBoundsNode<'a> {
    key: NodeKey,
    node: &'a SemanticsNode,
    adjusted_bounds: Rect,
}

impl<'a> AdjustedBoundsNode<'a> {
    pub fn new(key: NodeKey, node: &'a SemanticsNode, adjusted_bounds: Rect) -> Self {
        Self {
            key,
            node,
            adjusted_bounds,
        }
    }

    #[inline]
    pub fn key(&self) -> NodeKey {
        self.key
    }

    #[inline]
    pub fn node(&self) -> &'a SemanticsNode {
        self.node
    }

    #[inline]
    pub fn id(&self) -> SemanticsId {
        self.node.id()
    }

    /// Bounding box of the node's visible region. Empty for an uncovered root
    /// and for nodes with malformed bounds.
    #[inline]
    pub fn adjusted_bounds(&self) -> Rect {
        self.adjusted_bounds
    }

    /// Adjusted bounds as an AccessKit rectangle.
    #[cfg(feature = "accessibility")]
    pub fn accesskit_bounds(&self) -> accesskit::Rect {
        let b = self.adjusted_bounds;
        accesskit::Rect {
            x0: b.left() as f64,
            y0: b.top() as f64,
            x1: b.right() as f64,
            y1: b.bottom() as f64,
        }
    }
}

/// Output of one occlusion walk, keyed by id.
///
/// Iteration is pre-order in visit order: the root first, then each subtree
/// front to back. Every entry is reachable from the root through
/// [`visible_children`](Self::visible_children).
#[derive(Debug, Default)]
pub struct VisibleNodes<'a> {
    entries: Vec<AdjustedBoundsNode<'a>>,
    index: HashMap<SemanticsId, usize>,
    root: Option<SemanticsId>,
}

impl<'a> VisibleNodes<'a> {
    pub fn get(&self, id: SemanticsId) -> Option<&AdjustedBoundsNode<'a>> {
        self.index.get(&id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: SemanticsId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn root_id(&self) -> Option<SemanticsId> {
        self.root
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdjustedBoundsNode<'a>> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = SemanticsId> + '_ {
        self.entries.iter().map(AdjustedBoundsNode::id)
    }

    /// Entries as a slice, for the scroll predicate.
    pub fn as_slice(&self) -> &[AdjustedBoundsNode<'a>] {
        &self.entries
    }

    /// Ids of `entry`'s children that are themselves visible, in draw order.
    pub fn visible_children(
        &self,
        tree: &SemanticsTree,
        entry: &AdjustedBoundsNode<'_>,
    ) -> Vec<SemanticsId> {
        tree.children(entry.key())
            .iter()
            .filter_map(|&child| {
                let node = tree.get(child)?;
                let visible = self.get(node.id())?;
                (visible.key() == child).then_some(node.id())
            })
            .collect()
    }

    /// Insert `entry`, overwriting an earlier node with the same id in place.
    ///
    /// Returns `true` if an entry was overwritten.
    fn insert(&mut self, entry: AdjustedBoundsNode<'a>) -> bool {
        let id = entry.id();
        match self.index.get(&id) {
            Some(&i) => {
                tracing::warn!(
                    target: targets::OCCLUSION,
                    %id,
                    "duplicate semantics id in one tree; last node wins"
                );
                self.entries[i] = entry;
                true
            }
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push(entry);
                false
            }
        }
    }

    /// Drop entries no longer reachable from the root.
    ///
    /// Only a duplicate id can orphan entries: the descendants of the
    /// overwritten node stay behind with no visible parent.
    fn retain_reachable(&mut self, tree: &SemanticsTree) {
        let mut reachable = HashSet::new();
        let mut stack: Vec<SemanticsId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            if !reachable.insert(id) {
                continue;
            }
            if let Some(entry) = self.get(id) {
                stack.extend(self.visible_children(tree, entry));
            }
        }

        let before = self.entries.len();
        self.entries.retain(|entry| reachable.contains(&entry.id()));
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.id(), i))
            .collect();

        tracing::debug!(
            target: targets::OCCLUSION,
            dropped = before - self.entries.len(),
            "dropped nodes orphaned by duplicate ids"
        );
    }
}

/// Compute every reachable, unobstructed node of `tree`.
///
/// An empty tree (no root) yields no nodes.
pub fn visible_nodes(tree: &SemanticsTree) -> VisibleNodes<'_> {
    let _span =
        tracing::trace_span!(target: targets::OCCLUSION, "walk", name = span_names::OCCLUSION)
            .entered();

    let mut out = VisibleNodes::default();
    let Some(root_key) = tree.root() else {
        return out;
    };
    let Some(root) = tree.get(root_key) else {
        return out;
    };
    out.root = Some(root.id());

    let root_bounds = root.bounds().sanitized();
    let mut walker = Walker {
        tree,
        unaccounted: Region::from_rect(root_bounds),
        scratch: Region::new(),
        out,
        root: root_key,
        overwrote: false,
    };
    walker.visit(root_key, root_bounds);

    if walker.overwrote {
        walker.out.retain_reachable(tree);
    }

    tracing::trace!(
        target: targets::OCCLUSION,
        visible = walker.out.len(),
        total = tree.len(),
        "occlusion walk done"
    );
    walker.out
}

struct Walker<'a> {
    tree: &'a SemanticsTree,
    unaccounted: Region,
    scratch: Region,
    out: VisibleNodes<'a>,
    root: NodeKey,
    overwrote: bool,
}

impl<'a> Walker<'a> {
    fn visit(&mut self, key: NodeKey, ancestor_clip: Rect) {
        let tree = self.tree;
        let Some(node) = tree.get(key) else {
            return;
        };
        let is_root = key == self.root;

        if !is_root && (!node.is_placed() || self.unaccounted.is_empty()) {
            return;
        }

        let bounds = node.bounds().sanitized();
        let clipped = if is_root {
            Some(bounds)
        } else {
            bounds.intersect(&ancestor_clip)
        };

        let visible = node.is_placed()
            && clipped.is_some_and(|c| self.unaccounted.intersect_rect_into(&c, &mut self.scratch));

        if !visible {
            // Malformed bounds keep the node addressable. Its children are
            // still visited against an empty clip, so only descendants that
            // are malformed themselves survive.
            if is_root || node.bounds().is_malformed() {
                self.insert(AdjustedBoundsNode::new(key, node, Rect::ZERO));
                if !is_root {
                    for &child in tree.children(key).iter().rev() {
                        self.visit(child, Rect::ZERO);
                    }
                }
            }
            return;
        }

        let adjusted = self.scratch.bounds();
        self.insert(AdjustedBoundsNode::new(key, node, adjusted));

        let clip = clipped.unwrap_or(Rect::ZERO);
        for &child in tree.children(key).iter().rev() {
            self.visit(child, clip);
        }

        if node.is_important_for_accessibility() {
            self.unaccounted.subtract(&clip);
        }
    }

    fn insert(&mut self, entry: AdjustedBoundsNode<'a>) {
        self.overwrote |= self.out.insert(entry);
    }
}
