//! The per-host semantics delegate.
//!
//! A [`SemanticsDelegate`] owns everything that outlives a single frame: the
//! previous frame's snapshots and the pending structural capture buffers.
//! Each call to [`check_for_semantics_changes`] runs one full pass:
//!
//! 1. walk the current tree for reachable, unobstructed nodes
//! 2. diff them against the stored snapshots
//! 3. send the resulting events to the sink and record structural changes
//! 4. replace the snapshots with the current frame's copies
//!
//! Passes take `&mut self`, so the caller serializes them.
//!
//! [`check_for_semantics_changes`]: SemanticsDelegate::check_for_semantics_changes

use crate::capability::NodeCapabilities;
use crate::capture::{CaptureFlush, StructuralCaptureBuffers, structural_changes};
use crate::config::DelegateConfig;
use crate::diff::diff_frame;
use crate::event::AccessibilityEventSink;
use crate::geometry::{Point, Rect};
use crate::logging::{PerfSpan, span_names, targets};
use crate::node::{SemanticsId, SemanticsTree};
use crate::occlusion::visible_nodes;
use crate::property::Axis;
use crate::scroll;
use crate::snapshot::{SemanticsNodeSnapshot, SnapshotStore};
use crate::synth::EventSynthesizer;

/// Counts from one frame pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Reachable, unobstructed nodes this frame.
    pub visible: usize,
    pub events_sent: usize,
    pub appeared: usize,
    pub disappeared: usize,
}

/// Capabilities and visible bounds of one reachable node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub id: SemanticsId,
    pub adjusted_bounds: Rect,
    pub capabilities: NodeCapabilities,
}

/// Diffs successive semantics trees and reports the changes.
#[derive(Debug, Default)]
pub struct SemanticsDelegate {
    config: DelegateConfig,
    snapshots: SnapshotStore,
    capture: StructuralCaptureBuffers,
}

impl SemanticsDelegate {
    pub fn new(config: DelegateConfig) -> Self {
        tracing::debug!(target: targets::DELEGATE, ?config, "semantics delegate created");
        Self {
            config,
            snapshots: SnapshotStore::new(),
            capture: StructuralCaptureBuffers::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &DelegateConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next pass.
    pub fn set_config(&mut self, config: DelegateConfig) {
        self.config = config;
    }

    /// Snapshots of the last completed pass.
    #[inline]
    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    #[inline]
    pub fn capture_buffers(&self) -> &StructuralCaptureBuffers {
        &self.capture
    }

    /// Run one frame pass over `tree`, delivering events to `sink`.
    pub fn check_for_semantics_changes<S>(
        &mut self,
        tree: &SemanticsTree,
        sink: &mut S,
    ) -> PassSummary
    where
        S: AccessibilityEventSink + ?Sized,
    {
        let _perf = PerfSpan::new(span_names::FRAME_PASS);

        let visible = visible_nodes(tree);
        let diff = diff_frame(&self.snapshots, &visible, tree, self.config.password_mask_char);

        let mut summary = PassSummary {
            visible: visible.len(),
            appeared: diff.appeared().count(),
            disappeared: diff.disappeared().count(),
            ..Default::default()
        };

        if self.config.accessibility_enabled {
            let mut synth = EventSynthesizer::new(sink, self.config.log_events);
            synth.emit_frame(&diff, &visible, &self.snapshots);
            summary.events_sent = synth.sent();
        }

        if self.config.content_capture_enabled {
            let changes = structural_changes(&self.snapshots, &visible, tree);
            self.capture.record(&changes);
        }

        self.snapshots.replace_all(
            visible.root_id(),
            visible.iter().map(|entry| {
                SemanticsNodeSnapshot::capture(entry.node(), visible.visible_children(tree, entry))
            }),
        );

        tracing::debug!(
            target: targets::DELEGATE,
            visible = summary.visible,
            events = summary.events_sent,
            appeared = summary.appeared,
            disappeared = summary.disappeared,
            "semantics pass complete"
        );
        summary
    }

    /// Drain the structural capture buffers.
    pub fn flush_capture(&mut self) -> CaptureFlush {
        self.capture.flush()
    }

    /// Forget all per-host state. The next pass treats every node as new.
    pub fn detach(&mut self) {
        tracing::debug!(
            target: targets::DELEGATE,
            snapshots = self.snapshots.len(),
            "semantics delegate detached"
        );
        self.snapshots.clear();
        self.capture.clear();
    }

    /// Whether the scroll container under `position` can scroll further.
    ///
    /// Candidates are the reachable nodes of `tree` in visit order, so the
    /// frontmost match wins.
    pub fn can_scroll(
        &self,
        tree: &SemanticsTree,
        axis: Axis,
        direction: i32,
        position: Option<Point>,
    ) -> bool {
        let visible = visible_nodes(tree);
        scroll::can_scroll(visible.as_slice(), axis, direction, position)
    }

    /// Platform-facing description of a reachable node.
    ///
    /// Returns `None` for unknown or occluded ids.
    pub fn node_info(&self, tree: &SemanticsTree, id: SemanticsId) -> Option<NodeInfo> {
        let visible = visible_nodes(tree);
        let entry = visible.get(id)?;
        let node = entry.node();
        Some(NodeInfo {
            id,
            adjusted_bounds: entry.adjusted_bounds(),
            capabilities: NodeCapabilities::from_properties(
                node.properties(),
                node.merges_descendants(),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AccessibilityEvent;
    use crate::node::SemanticsNode;
    use crate::property::ScrollAxisRange;
    use crate::role::Role;

    fn screen(label: &str) -> SemanticsTree {
        let (mut tree, root) = SemanticsTree::with_root(
            SemanticsNode::new(1).with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)),
        );
        tree.push_child(
            root,
            SemanticsNode::new(2)
                .with_bounds(Rect::new(0.0, 0.0, 100.0, 20.0))
                .with_role(Role::Button)
                .with_text(label),
        )
        .unwrap();
        tree
    }

    #[test]
    fn test_first_pass_then_idempotent() {
        let mut delegate = SemanticsDelegate::default();
        let mut sink: Vec<AccessibilityEvent> = Vec::new();

        let first = delegate.check_for_semantics_changes(&screen("OK"), &mut sink);
        assert_eq!(first.appeared, 2);
        assert_eq!(delegate.snapshots().len(), 2);

        sink.clear();
        let second = delegate.check_for_semantics_changes(&screen("OK"), &mut sink);
        assert!(sink.is_empty());
        assert_eq!(second.events_sent, 0);
        assert_eq!(second.appeared, 0);
    }

    #[test]
    fn test_accessibility_disabled_is_silent_but_tracks() {
        let mut delegate = SemanticsDelegate::new(DelegateConfig {
            accessibility_enabled: false,
            ..Default::default()
        });
        let mut sink: Vec<AccessibilityEvent> = Vec::new();
        delegate.check_for_semantics_changes(&screen("OK"), &mut sink);
        delegate.check_for_semantics_changes(&screen("Cancel"), &mut sink);

        assert!(sink.is_empty());
        let text = delegate.snapshots().get(SemanticsId(2)).unwrap().properties().text().unwrap();
        assert_eq!(text, &["Cancel".to_string()]);
    }

    #[test]
    fn test_capture_disabled_leaves_buffers() {
        let mut delegate = SemanticsDelegate::new(DelegateConfig {
            content_capture_enabled: false,
            ..Default::default()
        });
        let mut sink: Vec<AccessibilityEvent> = Vec::new();
        delegate.check_for_semantics_changes(&screen("OK"), &mut sink);
        assert!(delegate.flush_capture().is_empty());
    }

    #[test]
    fn test_detach_resets_state() {
        let mut delegate = SemanticsDelegate::default();
        let mut sink: Vec<AccessibilityEvent> = Vec::new();
        delegate.check_for_semantics_changes(&screen("OK"), &mut sink);
        assert!(!delegate.capture_buffers().is_empty());

        delegate.detach();
        assert!(delegate.snapshots().is_empty());
        assert!(delegate.capture_buffers().is_empty());

        let summary = delegate.check_for_semantics_changes(&screen("OK"), &mut sink);
        assert_eq!(summary.appeared, 2);
    }

    #[test]
    fn test_node_info() {
        let delegate = SemanticsDelegate::default();
        let tree = screen("OK");
        let info = delegate.node_info(&tree, SemanticsId(2)).unwrap();

        assert_eq!(info.capabilities.class_label, "android.widget.Button");
        assert_eq!(info.adjusted_bounds, Rect::new(0.0, 0.0, 100.0, 20.0));
        assert!(delegate.node_info(&tree, SemanticsId(99)).is_none());
    }

    #[test]
    fn test_can_scroll_through_delegate() {
        let (mut tree, root) = SemanticsTree::with_root(
            SemanticsNode::new(1).with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0)),
        );
        tree.push_child(
            root,
            SemanticsNode::new(2)
                .with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0))
                .with_scroll_range(Axis::Horizontal, ScrollAxisRange::new(5.0, 10.0)),
        )
        .unwrap();

        let delegate = SemanticsDelegate::default();
        assert!(delegate.can_scroll(&tree, Axis::Horizontal, 1, Some(Point::new(50.0, 50.0))));
        assert!(!delegate.can_scroll(&tree, Axis::Vertical, 1, Some(Point::new(50.0, 50.0))));
    }
}
