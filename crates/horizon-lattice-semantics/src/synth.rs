//! Event synthesis: turns a [`FrameDiff`] into sink calls.

use crate::diff::{FrameDiff, NodeChangeSet, NodeDiff, TextChange};
use crate::event::{AccessibilityEvent, AccessibilityEventSink, ContentChangeType};
use crate::logging::targets;
use crate::node::SemanticsId;
use crate::occlusion::VisibleNodes;
use crate::property::{Axis, TextRange};
use crate::snapshot::SnapshotStore;

/// Emits the events of one frame to a sink.
pub struct EventSynthesizer<'s, S: AccessibilityEventSink + ?Sized> {
    sink: &'s mut S,
    log_events: bool,
    sent: usize,
}

impl<'s, S: AccessibilityEventSink + ?Sized> EventSynthesizer<'s, S> {
    pub fn new(sink: &'s mut S, log_events: bool) -> Self {
        Self {
            sink,
            log_events,
            sent: 0,
        }
    }

    /// Number of events delivered so far.
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// Emit every event of `diff`, in diff order.
    ///
    /// `current` and `previous` supply pane titles of appeared and
    /// disappeared nodes.
    pub fn emit_frame(
        &mut self,
        diff: &FrameDiff,
        current: &VisibleNodes<'_>,
        previous: &SnapshotStore,
    ) {
        for node_diff in &diff.nodes {
            match node_diff {
                NodeDiff::Appeared(id) => {
                    let has_pane = current
                        .get(*id)
                        .is_some_and(|entry| entry.node().properties().pane_title().is_some());
                    if has_pane {
                        let change = ContentChangeType::PaneAppeared;
                        self.send(AccessibilityEvent::content(*id, change));
                    }
                }
                NodeDiff::Disappeared(id) => {
                    let had_pane = previous
                        .get(*id)
                        .is_some_and(|snapshot| snapshot.properties().pane_title().is_some());
                    if had_pane {
                        let change = ContentChangeType::PaneDisappeared;
                        self.send(AccessibilityEvent::content(*id, change));
                    }
                }
                NodeDiff::Changed(id, changes) => self.emit_node(*id, changes),
            }
        }
    }

    /// Emit the events of one changed id, highest precedence first.
    pub fn emit_node(&mut self, node: SemanticsId, changes: &NodeChangeSet) {
        match &changes.text {
            Some(TextChange::PasswordToggle) => {
                self.send(AccessibilityEvent::SelectionChanged {
                    node,
                    selection: TextRange::default(),
                    item_count: 0,
                });
                if let Some(selection) = changes.selection {
                    self.send(AccessibilityEvent::SelectionChanged {
                        node,
                        selection,
                        item_count: 0,
                    });
                }
            }
            Some(TextChange::Edit(delta)) => {
                let item_count =
                    delta.before_text.chars().count() - delta.removed_count + delta.added_count;
                self.send(AccessibilityEvent::TextChanged {
                    node,
                    delta: delta.clone(),
                });
                if let Some(selection) = changes.selection {
                    self.send(AccessibilityEvent::SelectionChanged {
                        node,
                        selection,
                        item_count,
                    });
                }
            }
            None => {
                if let Some(selection) = changes.selection {
                    self.send(AccessibilityEvent::SelectionChanged {
                        node,
                        selection,
                        item_count: 0,
                    });
                }
            }
        }

        for (axis, scroll) in [
            (Axis::Horizontal, changes.horizontal_scroll),
            (Axis::Vertical, changes.vertical_scroll),
        ] {
            if let Some(scroll) = scroll {
                self.send(AccessibilityEvent::Scrolled { node, axis, scroll });
            }
        }

        if changes.selected {
            self.send(AccessibilityEvent::Selected { node });
        }

        for &change in &changes.content {
            self.send(AccessibilityEvent::content(node, change));
        }

        if changes.generic {
            self.send(AccessibilityEvent::ContentChanged {
                node,
                change: ContentChangeType::Undefined,
                action_label: changes.action_label.clone(),
            });
        }
    }

    fn send(&mut self, event: AccessibilityEvent) {
        if self.log_events {
            tracing::trace!(target: targets::DIFF, ?event, "sending accessibility event");
        }
        self.sink.send_event(event);
        self.sent += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, ScrollDelta, TextDelta};

    fn emit(changes: &NodeChangeSet) -> Vec<AccessibilityEvent> {
        let mut sink: Vec<AccessibilityEvent> = Vec::new();
        EventSynthesizer::new(&mut sink, false).emit_node(SemanticsId(1), changes);
        sink
    }

    #[test]
    fn test_precedence_order() {
        let mut changes = NodeChangeSet {
            text: Some(TextChange::Edit(TextDelta::between("a", "ab"))),
            selection: Some(TextRange::caret(2)),
            vertical_scroll: Some(ScrollDelta {
                value: 1.0,
                max_value: 2.0,
                delta: 1.0,
            }),
            generic: true,
            ..Default::default()
        };
        changes.content.insert(ContentChangeType::Subtree);
        changes.content.insert(ContentChangeType::ContentDescription);

        let kinds: Vec<_> = emit(&changes).iter().map(AccessibilityEvent::kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::TextChanged,
                EventKind::SelectionChanged,
                EventKind::Scrolled,
                EventKind::ContentChanged,
                EventKind::ContentChanged,
                EventKind::ContentChanged,
            ]
        );
        let subtypes: Vec<_> = emit(&changes)
            .iter()
            .filter_map(AccessibilityEvent::content_change)
            .collect();
        assert_eq!(
            subtypes,
            vec![
                ContentChangeType::ContentDescription,
                ContentChangeType::Subtree,
                ContentChangeType::Undefined,
            ]
        );
    }

    #[test]
    fn test_edit_selection_item_count() {
        let changes = NodeChangeSet {
            text: Some(TextChange::Edit(TextDelta::between("héllo", "héllo!"))),
            selection: Some(TextRange::caret(6)),
            ..Default::default()
        };
        let events = emit(&changes);
        assert_eq!(
            events[1],
            AccessibilityEvent::SelectionChanged {
                node: SemanticsId(1),
                selection: TextRange::caret(6),
                item_count: 6,
            }
        );
    }

    #[test]
    fn test_password_toggle_resets_selection() {
        let changes = NodeChangeSet {
            text: Some(TextChange::PasswordToggle),
            selection: Some(TextRange::caret(3)),
            ..Default::default()
        };
        let events = emit(&changes);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind() == EventKind::SelectionChanged));
        assert_eq!(
            events[0],
            AccessibilityEvent::SelectionChanged {
                node: SemanticsId(1),
                selection: TextRange::new(0, 0),
                item_count: 0,
            }
        );
    }

    #[test]
    fn test_generic_carries_action_label() {
        let changes = NodeChangeSet {
            generic: true,
            action_label: Some("Launch".into()),
            ..Default::default()
        };
        let events = emit(&changes);
        assert_eq!(
            events,
            vec![AccessibilityEvent::ContentChanged {
                node: SemanticsId(1),
                change: ContentChangeType::Undefined,
                action_label: Some("Launch".into()),
            }]
        );
    }

    #[test]
    fn test_sent_counter() {
        let mut sink: Vec<AccessibilityEvent> = Vec::new();
        let mut synth = EventSynthesizer::new(&mut sink, true);
        synth.emit_node(
            SemanticsId(2),
            &NodeChangeSet {
                selected: true,
                ..Default::default()
            },
        );
        assert_eq!(synth.sent(), 1);
    }
}
