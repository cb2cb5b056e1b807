//! Previous-frame snapshots, keyed by semantics id.

use std::collections::{BTreeSet, HashMap};

use crate::node::{SemanticsId, SemanticsNode};
use crate::property::PropertyMap;

/// Frozen copy of a node's properties as observed in one frame.
///
/// Also records the node's visible children so structural diffs can walk the
/// previous frame's subtree after the tree itself is gone.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticsNodeSnapshot {
    id: SemanticsId,
    properties: PropertyMap,
    merges_descendants: bool,
    children: Vec<SemanticsId>,
}

impl SemanticsNodeSnapshot {
    /// Capture `node` with the given visible child ids.
    pub fn capture(node: &SemanticsNode, children: Vec<SemanticsId>) -> Self {
        Self {
            id: node.id(),
            properties: node.properties().clone(),
            merges_descendants: node.merges_descendants(),
            children,
        }
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
    pub fn merges_descendants(&self) -> bool {
        self.merges_descendants
    }

    #[inline]
    pub fn children(&self) -> &[SemanticsId] {
        &self.children
    }
}

/// Last-observed snapshot per id.
///
/// Replacing an entry is the only mutation; entries are never merged.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshots: HashMap<SemanticsId, SemanticsNodeSnapshot>,
    root: Option<SemanticsId>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: SemanticsId) -> Option<&SemanticsNodeSnapshot> {
        self.snapshots.get(&id)
    }

    /// Store `snapshot` under `id`, replacing any previous entry.
    pub fn put(&mut self, id: SemanticsId, snapshot: SemanticsNodeSnapshot) {
        self.snapshots.insert(id, snapshot);
    }

    pub fn remove(&mut self, id: SemanticsId) -> Option<SemanticsNodeSnapshot> {
        self.snapshots.remove(&id)
    }

    pub fn contains(&self, id: SemanticsId) -> bool {
        self.snapshots.contains_key(&id)
    }

    /// All stored ids, in ascending order.
    pub fn all_ids(&self) -> BTreeSet<SemanticsId> {
        self.snapshots.keys().copied().collect()
    }

    /// The root id of the frame these snapshots came from.
    pub fn root(&self) -> Option<SemanticsId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.root = None;
    }

    /// Replace the whole store with one frame's snapshots.
    pub fn replace_all(
        &mut self,
        root: Option<SemanticsId>,
        snapshots: impl IntoIterator<Item = SemanticsNodeSnapshot>,
    ) {
        self.snapshots.clear();
        self.snapshots
            .extend(snapshots.into_iter().map(|snapshot| (snapshot.id(), snapshot)));
        self.root = root;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: i32, text: &str) -> SemanticsNodeSnapshot {
        SemanticsNodeSnapshot::capture(&SemanticsNode::new(id).with_text(text), Vec::new())
    }

    #[test]
    fn test_put_overwrites() {
        let mut store = SnapshotStore::new();
        store.put(SemanticsId(1), snapshot(1, "a"));
        store.put(SemanticsId(1), snapshot(1, "b"));

        assert_eq!(store.len(), 1);
        let text = store.get(SemanticsId(1)).unwrap().properties().text().unwrap();
        assert_eq!(text, &["b".to_string()]);
    }

    #[test]
    fn test_remove_and_ids() {
        let mut store = SnapshotStore::new();
        store.put(SemanticsId(3), snapshot(3, "c"));
        store.put(SemanticsId(1), snapshot(1, "a"));

        assert_eq!(
            store.all_ids().into_iter().collect::<Vec<_>>(),
            vec![SemanticsId(1), SemanticsId(3)]
        );
        assert!(store.remove(SemanticsId(3)).is_some());
        assert!(!store.contains(SemanticsId(3)));
    }

    #[test]
    fn test_replace_all_and_clear() {
        let mut store = SnapshotStore::new();
        store.put(SemanticsId(9), snapshot(9, "old"));
        store.replace_all(Some(SemanticsId(1)), vec![snapshot(1, "a"), snapshot(2, "b")]);

        assert_eq!(store.len(), 2);
        assert!(!store.contains(SemanticsId(9)));
        assert_eq!(store.root(), Some(SemanticsId(1)));

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.root(), None);
    }
}
