//! Capability flags and action lists derived from a node's properties.
//!
//! Flags describe what a node *can* do and come from property presence, never
//! from its role. A disabled node keeps its flags but withholds the
//! interactive actions from its action list.

use crate::property::{ActionKind, PropertyKey, PropertyMap, ToggleableState};
use crate::role::{self, Role};

/// What a node is capable of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilityFlags {
    pub clickable: bool,
    pub long_clickable: bool,
    pub editable: bool,
    pub checkable: bool,
    pub checked: bool,
    pub selected: bool,
    pub scrollable: bool,
    pub focusable: bool,
    pub focused: bool,
    pub enabled: bool,
    pub password: bool,
    pub heading: bool,
    pub dismissable: bool,
    pub expandable: bool,
    pub collapsible: bool,
    pub screen_reader_focusable: bool,
}

/// Full classification of a node: class label, role description, flags and
/// the actions it exposes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeCapabilities {
    pub class_label: &'static str,
    pub role_description: Option<&'static str>,
    pub flags: CapabilityFlags,
    pub actions: Vec<ActionKind>,
}

impl NodeCapabilities {
    /// Classify a property set. `merges_descendants` is the node's merge flag.
    ///
    /// Actions registered without a handler still count as capabilities.
    pub fn from_properties(properties: &PropertyMap, merges_descendants: bool) -> Self {
        let disabled = properties.is_disabled();
        let has = |kind: ActionKind| properties.contains(PropertyKey::Action(kind));
        let toggle = properties.toggleable_state();

        let flags = CapabilityFlags {
            clickable: has(ActionKind::OnClick),
            long_clickable: has(ActionKind::OnLongClick),
            editable: properties.contains(PropertyKey::EditableText) || has(ActionKind::SetText),
            checkable: toggle.is_some(),
            checked: toggle == Some(ToggleableState::On),
            selected: properties.flag(PropertyKey::Selected),
            scrollable: properties.contains(PropertyKey::HorizontalScrollAxisRange)
                || properties.contains(PropertyKey::VerticalScrollAxisRange)
                || has(ActionKind::ScrollBy),
            focusable: has(ActionKind::RequestFocus) || properties.contains(PropertyKey::Focused),
            focused: properties.flag(PropertyKey::Focused),
            enabled: !disabled,
            password: properties.is_password(),
            heading: properties.contains(PropertyKey::Heading),
            dismissable: has(ActionKind::Dismiss),
            expandable: has(ActionKind::Expand),
            collapsible: has(ActionKind::Collapse),
            screen_reader_focusable: is_screen_reader_focusable(properties, merges_descendants),
        };

        let mut actions: Vec<ActionKind> = properties
            .keys()
            .filter_map(|key| match key {
                PropertyKey::Action(kind) => Some(kind),
                _ => None,
            })
            .filter(|kind| !(disabled && kind.suppressed_when_disabled()))
            .collect();
        actions.sort_unstable();

        Self {
            class_label: role::class_label(properties),
            role_description: properties.role().and_then(Role::role_description),
            flags,
            actions,
        }
    }
}

/// Whether the node carries content a screen reader would speak.
fn has_readable_content(properties: &PropertyMap) -> bool {
    properties.contains(PropertyKey::Text)
        || properties.contains(PropertyKey::ContentDescription)
        || properties.contains(PropertyKey::EditableText)
        || properties.contains(PropertyKey::StateDescription)
        || properties.contains(PropertyKey::ToggleableState)
        || properties.contains(PropertyKey::ProgressBarRangeInfo)
}

/// Screen-reader focusability.
///
/// Merging nodes and nodes with readable content are focusable; a node with
/// no readable semantics falls back to plain input focusability.
pub fn is_screen_reader_focusable(properties: &PropertyMap, merges_descendants: bool) -> bool {
    if properties.contains(PropertyKey::InvisibleToUser) {
        return false;
    }
    merges_descendants
        || has_readable_content(properties)
        || properties.contains(PropertyKey::Action(ActionKind::RequestFocus))
        || properties.contains(PropertyKey::Focused)
}
