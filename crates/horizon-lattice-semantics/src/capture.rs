//! Structural capture buffers for content-capture consumers.
//!
//! Each frame the delegate compares the full descendant set of the previous
//! root with that of the current root and feeds the difference in here. The
//! buffers cancel opposite notifications for the same id, so an id that
//! disappears and reappears before a flush produces nothing.

use std::collections::{BTreeSet, HashSet};

use crate::logging::targets;
use crate::node::{SemanticsId, SemanticsTree};
use crate::occlusion::VisibleNodes;
use crate::snapshot::SnapshotStore;

/// Appeared and disappeared ids accumulated since the last flush.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureFlush {
    pub appeared: BTreeSet<SemanticsId>,
    pub disappeared: BTreeSet<SemanticsId>,
}

impl CaptureFlush {
    pub fn is_empty(&self) -> bool {
        self.appeared.is_empty() && self.disappeared.is_empty()
    }
}

/// Pending structural notifications.
///
/// An id is never in both sets at once.
#[derive(Debug, Default)]
pub struct StructuralCaptureBuffers {
    pending: CaptureFlush,
}

impl StructuralCaptureBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id` appeared. Cancels a pending disappearance.
    pub fn on_appeared(&mut self, id: SemanticsId) {
        if !self.pending.disappeared.remove(&id) {
            self.pending.appeared.insert(id);
        }
    }

    /// Record that `id` disappeared. Cancels a pending appearance.
    pub fn on_disappeared(&mut self, id: SemanticsId) {
        if !self.pending.appeared.remove(&id) {
            self.pending.disappeared.insert(id);
        }
    }

    pub fn appeared(&self) -> &BTreeSet<SemanticsId> {
        &self.pending.appeared
    }

    pub fn disappeared(&self) -> &BTreeSet<SemanticsId> {
        &self.pending.disappeared
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take everything pending, leaving the buffers empty.
    pub fn flush(&mut self) -> CaptureFlush {
        let flushed = std::mem::take(&mut self.pending);
        tracing::debug!(
            target: targets::CAPTURE,
            appeared = flushed.appeared.len(),
            disappeared = flushed.disappeared.len(),
            "capture buffers flushed"
        );
        flushed
    }

    /// Drop everything pending without delivering it.
    pub fn clear(&mut self) {
        self.pending = CaptureFlush::default();
    }

    /// Feed one frame's structural changes.
    pub fn record(&mut self, changes: &StructuralChanges) {
        for &id in &changes.appeared {
            self.on_appeared(id);
        }
        for &id in &changes.disappeared {
            self.on_disappeared(id);
        }
    }
}

/// Ids that entered or left the subtree between two frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuralChanges {
    /// In current visit order.
    pub appeared: Vec<SemanticsId>,
    /// Ascending.
    pub disappeared: Vec<SemanticsId>,
}

/// Compare the previous frame's subtree with the current one.
///
/// Both sides are full descendant sets, so an id that moved to a different
/// parent is retained rather than reported twice.
pub fn structural_changes(
    previous: &SnapshotStore,
    current: &VisibleNodes<'_>,
    tree: &SemanticsTree,
) -> StructuralChanges {
    let old_ids = previous_descendants(previous);
    let new_ids = current_descendants(current, tree);

    let appeared = new_ids
        .iter()
        .copied()
        .filter(|id| !old_ids.contains(id))
        .collect();
    let mut disappeared: Vec<_> = old_ids
        .into_iter()
        .filter(|id| !new_ids.contains(id))
        .collect();
    disappeared.sort_unstable();

    StructuralChanges {
        appeared,
        disappeared,
    }
}

fn previous_descendants(store: &SnapshotStore) -> HashSet<SemanticsId> {
    let mut seen = HashSet::new();
    let mut stack: Vec<SemanticsId> = store.root().into_iter().collect();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        if let Some(snapshot) = store.get(id) {
            stack.extend(snapshot.children().iter().rev().copied());
        }
    }
    seen
}

/// Descendants of the current root in visit order, deduplicated.
fn current_descendants(current: &VisibleNodes<'_>, tree: &SemanticsTree) -> OrderedIds {
    let mut ids = OrderedIds::default();
    let mut stack: Vec<SemanticsId> = current.root_id().into_iter().collect();
    while let Some(id) = stack.pop() {
        if !ids.insert(id) {
            continue;
        }
        if let Some(entry) = current.get(id) {
            // Push back to front so the frontmost child is popped first.
            stack.extend(current.visible_children(tree, entry));
        }
    }
    ids
}

#[derive(Default)]
struct OrderedIds {
    order: Vec<SemanticsId>,
    set: HashSet<SemanticsId>,
}

impl OrderedIds {
    fn insert(&mut self, id: SemanticsId) -> bool {
        let fresh = self.set.insert(id);
        if fresh {
            self.order.push(id);
        }
        fresh
    }

    fn contains(&self, id: &SemanticsId) -> bool {
        self.set.contains(id)
    }

    fn iter(&self) -> std::slice::Iter<'_, SemanticsId> {
        self.order.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::node::SemanticsNode;
    use crate::occlusion::visible_nodes;
    use crate::snapshot::SemanticsNodeSnapshot;

    #[test]
    fn test_appear_then_disappear_cancels() {
        let mut buffers = StructuralCaptureBuffers::new();
        buffers.on_appeared(SemanticsId(5));
        buffers.on_disappeared(SemanticsId(5));
        assert!(buffers.is_empty());

        buffers.on_disappeared(SemanticsId(6));
        buffers.on_appeared(SemanticsId(6));
        assert!(buffers.flush().is_empty());
    }

    #[test]
    fn test_flush_takes_everything() {
        let mut buffers = StructuralCaptureBuffers::new();
        buffers.on_appeared(SemanticsId(3));
        buffers.on_appeared(SemanticsId(1));
        buffers.on_disappeared(SemanticsId(2));

        let flushed = buffers.flush();
        assert_eq!(
            flushed.appeared.into_iter().collect::<Vec<_>>(),
            vec![SemanticsId(1), SemanticsId(3)]
        );
        assert_eq!(flushed.disappeared.into_iter().collect::<Vec<_>>(), vec![SemanticsId(2)]);
        assert!(buffers.is_empty());
    }

    #[test]
    fn test_no_id_in_both_sets() {
        let mut buffers = StructuralCaptureBuffers::new();
        for _ in 0..3 {
            buffers.on_appeared(SemanticsId(1));
            buffers.on_disappeared(SemanticsId(1));
            buffers.on_disappeared(SemanticsId(1));
        }
        assert!(buffers.appeared().is_disjoint(buffers.disappeared()));
        assert!(buffers.disappeared().contains(&SemanticsId(1)));
    }

    fn store_of(root: i32, edges: &[(i32, &[i32])]) -> SnapshotStore {
        let mut store = SnapshotStore::new();
        store.replace_all(
            Some(SemanticsId(root)),
            edges.iter().map(|(id, children)| {
                SemanticsNodeSnapshot::capture(
                    &SemanticsNode::new(*id),
                    children.iter().copied().map(SemanticsId).collect(),
                )
            }),
        );
        store
    }

    #[test]
    fn test_structural_changes_full_subtree() {
        // Previously 1 -> 2 -> {3, 4}; now 1 -> 4 only.
        let store = store_of(1, &[(1, &[2]), (2, &[3, 4]), (3, &[]), (4, &[])]);
        let (mut tree, root) = SemanticsTree::with_root(
            SemanticsNode::new(1).with_bounds(Rect::new(0.0, 0.0, 50.0, 50.0)),
        );
        tree.push_child(
            root,
            SemanticsNode::new(4)
                .with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0))
                .with_text("x"),
        )
        .unwrap();

        let visible = visible_nodes(&tree);
        let changes = structural_changes(&store, &visible, &tree);

        assert!(changes.appeared.is_empty());
        assert_eq!(changes.disappeared, vec![SemanticsId(2), SemanticsId(3)]);
    }

    #[test]
    fn test_structural_changes_first_frame() {
        let store = SnapshotStore::new();
        let (mut tree, root) = SemanticsTree::with_root(
            SemanticsNode::new(1).with_bounds(Rect::new(0.0, 0.0, 50.0, 50.0)),
        );
        tree.push_child(
            root,
            SemanticsNode::new(2)
                .with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0))
                .with_text("a"),
        )
        .unwrap();
        tree.push_child(
            root,
            SemanticsNode::new(3)
                .with_bounds(Rect::new(20.0, 0.0, 10.0, 10.0))
                .with_text("b"),
        )
        .unwrap();

        let visible = visible_nodes(&tree);
        let changes = structural_changes(&store, &visible, &tree);
        assert_eq!(changes.appeared, vec![SemanticsId(1), SemanticsId(3), SemanticsId(2)]);
        assert!(changes.disappeared.is_empty());
    }
}
