//! Accessibility events and the sink that receives them.

use crate::node::SemanticsId;
use crate::property::{Axis, TextRange};

/// Event kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ContentChanged,
    TextChanged,
    SelectionChanged,
    Scrolled,
    Selected,
}

/// Why a node's content changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentChangeType {
    Text,
    ContentDescription,
    StateDescription,
    PaneTitle,
    PaneAppeared,
    PaneDisappeared,
    Subtree,
    /// Catch-all for changes with no specific classification.
    Undefined,
}

/// Characters replaced by a text edit, as char offsets into the old text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDelta {
    pub from_index: usize,
    pub removed_count: usize,
    pub added_count: usize,
    pub before_text: String,
}

impl TextDelta {
    /// Infer the edited span from the common prefix and suffix of two texts.
    pub fn between(before: &str, after: &str) -> Self {
        let old: Vec<char> = before.chars().collect();
        let new: Vec<char> = after.chars().collect();
        let min_len = old.len().min(new.len());

        let start = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
        let end = old
            .iter()
            .rev()
            .zip(new.iter().rev())
            .take(min_len - start)
            .take_while(|(a, b)| a == b)
            .count();

        Self {
            from_index: start,
            removed_count: old.len() - start - end,
            added_count: new.len() - start - end,
            before_text: before.to_owned(),
        }
    }
}

/// Scroll position after a scroll, with the signed change since last frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollDelta {
    pub value: f32,
    pub max_value: f32,
    pub delta: f32,
}

/// One platform-visible accessibility event.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessibilityEvent {
    /// A node's content changed. `action_label` carries the new label when
    /// the change was an action relabel.
    ContentChanged {
        node: SemanticsId,
        change: ContentChangeType,
        action_label: Option<String>,
    },
    /// The editable text of a text field changed.
    TextChanged { node: SemanticsId, delta: TextDelta },
    /// The selection of a text field changed.
    SelectionChanged {
        node: SemanticsId,
        selection: TextRange,
        item_count: usize,
    },
    /// A scroll container moved along one axis.
    Scrolled {
        node: SemanticsId,
        axis: Axis,
        scroll: ScrollDelta,
    },
    /// A selectable item (such as a tab) became selected or unselected.
    Selected { node: SemanticsId },
}

impl AccessibilityEvent {
    /// The node the event refers to.
    pub fn node_id(&self) -> SemanticsId {
        match self {
            Self::ContentChanged { node, .. }
            | Self::TextChanged { node, .. }
            | Self::SelectionChanged { node, .. }
            | Self::Scrolled { node, .. }
            | Self::Selected { node } => *node,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::ContentChanged { .. } => EventKind::ContentChanged,
            Self::TextChanged { .. } => EventKind::TextChanged,
            Self::SelectionChanged { .. } => EventKind::SelectionChanged,
            Self::Scrolled { .. } => EventKind::Scrolled,
            Self::Selected { .. } => EventKind::Selected,
        }
    }

    /// Content change subtype, for `ContentChanged` events.
    pub fn content_change(&self) -> Option<ContentChangeType> {
        match self {
            Self::ContentChanged { change, .. } => Some(*change),
            _ => None,
        }
    }

    pub(crate) fn content(node: SemanticsId, change: ContentChangeType) -> Self {
        Self::ContentChanged {
            node,
            change,
            action_label: None,
        }
    }
}

/// Receiver of synthesized events, typically a platform accessibility bridge.
pub trait AccessibilityEventSink {
    /// Deliver one event.
    fn send_event(&mut self, event: AccessibilityEvent);
}

/// Records events in delivery order.
impl AccessibilityEventSink for Vec<AccessibilityEvent> {
    fn send_event(&mut self, event: AccessibilityEvent) {
        self.push(event);
    }
}

impl<S: AccessibilityEventSink + ?Sized> AccessibilityEventSink for &mut S {
    fn send_event(&mut self, event: AccessibilityEvent) {
        (**self).send_event(event);
    }
}
