//! Diff engine: compares the previous frame's snapshots with the current
//! visible nodes and classifies every property change.
//!
//! Classification only decides *what* happened to each id. Turning a
//! [`NodeChangeSet`] into sink calls, in precedence order, is the job of
//! [`crate::synth`].
//!
//! Precedence, highest first:
//!
//! 1. editable text edits on text fields (a password visibility toggle is
//!    reported as a selection reset instead), then selection moves
//! 2. scroll position or extent changes
//! 3. specific content changes (text, description, state, pane, subtree)
//! 4. everything else, including action relabels, as one generic change

use std::collections::BTreeSet;

use crate::event::{ContentChangeType, ScrollDelta, TextDelta};
use crate::node::{SemanticsId, SemanticsTree};
use crate::occlusion::VisibleNodes;
use crate::property::{Axis, PropertyKey, PropertyMap, TextRange};
use crate::role::Role;
use crate::snapshot::{SemanticsNodeSnapshot, SnapshotStore};

/// What happened to a text field's editable text.
#[derive(Debug, Clone, PartialEq)]
pub enum TextChange {
    /// Real edit with the inferred span.
    Edit(TextDelta),
    /// Password shown or hidden; the text itself did not change.
    PasswordToggle,
}

/// Classified changes of one id present in both frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeChangeSet {
    pub text: Option<TextChange>,
    pub selection: Option<TextRange>,
    pub horizontal_scroll: Option<ScrollDelta>,
    pub vertical_scroll: Option<ScrollDelta>,
    pub selected: bool,
    pub content: BTreeSet<ContentChangeType>,
    /// At least one change had no specific classification.
    pub generic: bool,
    /// New label of the first relabelled action, if any.
    pub action_label: Option<String>,
}

impl NodeChangeSet {
    /// Whether nothing at all changed.
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.selection.is_none()
            && self.horizontal_scroll.is_none()
            && self.vertical_scroll.is_none()
            && !self.selected
            && self.content.is_empty()
            && !self.generic
    }

    fn scroll_slot(&mut self, axis: Axis) -> &mut Option<ScrollDelta> {
        match axis {
            Axis::Horizontal => &mut self.horizontal_scroll,
            Axis::Vertical => &mut self.vertical_scroll,
        }
    }

    fn mark_generic(&mut self, action_label: Option<&str>) {
        self.generic = true;
        if self.action_label.is_none() {
            self.action_label = action_label.map(str::to_owned);
        }
    }
}

/// Classification of one id.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeDiff {
    Appeared(SemanticsId),
    Disappeared(SemanticsId),
    Changed(SemanticsId, NodeChangeSet),
}

impl NodeDiff {
    pub fn id(&self) -> SemanticsId {
        match self {
            NodeDiff::Appeared(id) | NodeDiff::Disappeared(id) | NodeDiff::Changed(id, _) => *id,
        }
    }
}

/// All classified differences of one frame, in delivery order: current ids
/// in visit order, then disappeared ids ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameDiff {
    pub nodes: Vec<NodeDiff>,
}

impl FrameDiff {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn appeared(&self) -> impl Iterator<Item = SemanticsId> + '_ {
        self.nodes.iter().filter_map(|d| match d {
            NodeDiff::Appeared(id) => Some(*id),
            _ => None,
        })
    }

    pub fn disappeared(&self) -> impl Iterator<Item = SemanticsId> + '_ {
        self.nodes.iter().filter_map(|d| match d {
            NodeDiff::Disappeared(id) => Some(*id),
            _ => None,
        })
    }
}

/// Diff the current frame against the stored snapshots.
pub fn diff_frame(
    previous: &SnapshotStore,
    current: &VisibleNodes<'_>,
    tree: &SemanticsTree,
    password_mask: char,
) -> FrameDiff {
    let mut nodes = Vec::new();

    for entry in current.iter() {
        let id = entry.id();
        let Some(old) = previous.get(id) else {
            nodes.push(NodeDiff::Appeared(id));
            continue;
        };

        let children = current.visible_children(tree, entry);
        let changes = classify(old, entry.node().properties(), &children, password_mask);
        if !changes.is_empty() {
            nodes.push(NodeDiff::Changed(id, changes));
        }
    }

    nodes.extend(
        previous
            .all_ids()
            .into_iter()
            .filter(|id| !current.contains(*id))
            .map(NodeDiff::Disappeared),
    );

    FrameDiff { nodes }
}

/// Keys whose presence or value differs between `old` and `new`.
///
/// Keys of `new` come first in insertion order, then keys only in `old`.
pub fn changed_keys(old: &PropertyMap, new: &PropertyMap) -> Vec<PropertyKey> {
    let mut keys: Vec<PropertyKey> = new
        .iter()
        .filter(|(key, value)| old.get(*key) != Some(*value))
        .map(|(key, _)| key)
        .collect();
    keys.extend(old.keys().filter(|key| !new.contains(*key)));
    keys
}

/// Classify the changes of one id present in both frames.
pub fn classify(
    old: &SemanticsNodeSnapshot,
    new: &PropertyMap,
    new_children: &[SemanticsId],
    password_mask: char,
) -> NodeChangeSet {
    let old_props = old.properties();
    let mut changes = NodeChangeSet::default();

    for key in changed_keys(old_props, new) {
        classify_key(key, old_props, new, password_mask, &mut changes);
    }

    // A toggle always re-announces the caret, even if it did not move.
    if changes.text == Some(TextChange::PasswordToggle) && changes.selection.is_none() {
        changes.selection = new.selection();
    }

    if old.children() != new_children {
        changes.content.insert(ContentChangeType::Subtree);
    }

    changes
}

fn classify_key(
    key: PropertyKey,
    old: &PropertyMap,
    new: &PropertyMap,
    password_mask: char,
    changes: &mut NodeChangeSet,
) {
    match key {
        PropertyKey::EditableText => {
            if new.is_text_field() {
                changes.text = Some(if is_password_toggle(old, new, password_mask) {
                    TextChange::PasswordToggle
                } else {
                    TextChange::Edit(TextDelta::between(
                        old.editable_text().unwrap_or_default(),
                        new.editable_text().unwrap_or_default(),
                    ))
                });
            } else {
                changes.content.insert(ContentChangeType::Text);
            }
        }
        PropertyKey::TextSelectionRange => match new.selection() {
            Some(range) => changes.selection = Some(range),
            None => changes.mark_generic(None),
        },
        PropertyKey::HorizontalScrollAxisRange | PropertyKey::VerticalScrollAxisRange => {
            let axis = if key == PropertyKey::HorizontalScrollAxisRange {
                Axis::Horizontal
            } else {
                Axis::Vertical
            };
            match (old.scroll_range(axis), new.scroll_range(axis)) {
                (Some(before), Some(after)) if !before.same_position(&after) => {
                    *changes.scroll_slot(axis) = Some(ScrollDelta {
                        value: after.value,
                        max_value: after.max_value,
                        delta: after.value - before.value,
                    });
                }
                _ => changes.mark_generic(None),
            }
        }
        PropertyKey::Text => {
            changes.content.insert(ContentChangeType::Text);
        }
        PropertyKey::ContentDescription => {
            changes.content.insert(ContentChangeType::ContentDescription);
        }
        PropertyKey::StateDescription
        | PropertyKey::ToggleableState
        | PropertyKey::ProgressBarRangeInfo => {
            changes.content.insert(ContentChangeType::StateDescription);
        }
        PropertyKey::Selected => {
            if new.role() == Some(Role::Tab) {
                changes.selected = true;
            } else {
                changes.content.insert(ContentChangeType::StateDescription);
            }
        }
        PropertyKey::PaneTitle => {
            let change = match (old.pane_title(), new.pane_title()) {
                (None, Some(_)) => ContentChangeType::PaneAppeared,
                (Some(_), None) => ContentChangeType::PaneDisappeared,
                _ => ContentChangeType::PaneTitle,
            };
            changes.content.insert(change);
        }
        PropertyKey::Action(kind) => {
            let label = new.action(kind).and_then(|a| a.label.as_deref());
            changes.mark_generic(label);
        }
        PropertyKey::CustomActions => {
            let before = old.custom_actions();
            let label = new
                .custom_actions()
                .iter()
                .enumerate()
                .find(|(i, action)| before.get(*i) != Some(*action))
                .map(|(_, action)| action.label.as_str());
            changes.mark_generic(label);
        }
        PropertyKey::Focused
        | PropertyKey::Disabled
        | PropertyKey::Password
        | PropertyKey::Heading
        | PropertyKey::InvisibleToUser
        | PropertyKey::LiveRegion
        | PropertyKey::Role
        | PropertyKey::TestTag => changes.mark_generic(None),
    }
}

/// Whether `text` is made entirely of mask characters.
fn is_masked(text: &str, mask: char) -> bool {
    !text.is_empty() && text.chars().all(|c| c == mask)
}

/// A password field switching between masked and plain rendering of the same
/// content: same length, exactly one side masked.
fn is_password_toggle(old: &PropertyMap, new: &PropertyMap, mask: char) -> bool {
    if !old.is_password() || !new.is_password() {
        return false;
    }
    let (Some(before), Some(after)) = (old.editable_text(), new.editable_text()) else {
        return false;
    };
    before.chars().count() == after.chars().count()
        && is_masked(before, mask) != is_masked(after, mask)
}
