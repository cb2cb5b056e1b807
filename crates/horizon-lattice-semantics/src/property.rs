//! Semantics property keys, values and the insertion-ordered property map.
//!
//! A node's properties are a small ordered list of `(PropertyKey,
//! PropertyValue)` pairs. Keys form a closed vocabulary so the diff engine can
//! classify every change with an exhaustive `match`.
//!
//! Actions are capability descriptors (a label plus a handler-presence flag).
//! Their equality deliberately ignores the handler: two descriptors with the
//! same label compare equal.

use std::fmt;

use crate::role::Role;

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The property key carrying this axis' scroll range.
    pub fn range_key(self) -> PropertyKey {
        match self {
            Axis::Horizontal => PropertyKey::HorizontalScrollAxisRange,
            Axis::Vertical => PropertyKey::VerticalScrollAxisRange,
        }
    }
}

/// Standard actions a node may register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    OnClick,
    OnLongClick,
    SetText,
    SetSelection,
    SetProgress,
    ScrollBy,
    RequestFocus,
    Dismiss,
    Expand,
    Collapse,
    Copy,
    Cut,
    Paste,
}

impl ActionKind {
    /// Whether a disabled node withholds this action from its action list.
    pub fn suppressed_when_disabled(self) -> bool {
        matches!(
            self,
            ActionKind::OnClick
                | ActionKind::OnLongClick
                | ActionKind::SetText
                | ActionKind::Dismiss
                | ActionKind::Expand
                | ActionKind::Collapse
        )
    }
}

/// A registered action: an optional label and whether a handler is attached.
///
/// Equality compares labels only.
#[derive(Debug, Clone, Default)]
pub struct ActionDescriptor {
    pub label: Option<String>,
    pub has_handler: bool,
}

impl ActionDescriptor {
    /// An unlabelled action with a handler.
    pub fn new() -> Self {
        Self {
            label: None,
            has_handler: true,
        }
    }

    /// A labelled action with a handler.
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            has_handler: true,
        }
    }

    /// The same action with no handler attached.
    pub fn without_handler(mut self) -> Self {
        self.has_handler = false;
        self
    }
}

impl PartialEq for ActionDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

/// An application-defined action. Equality compares labels only.
#[derive(Debug, Clone)]
pub struct CustomAction {
    pub label: String,
    pub has_handler: bool,
}

impl CustomAction {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            has_handler: true,
        }
    }
}

impl PartialEq for CustomAction {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

/// A text selection, as char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A collapsed selection (a caret).
    pub const fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

/// Tri-state toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleableState {
    On,
    Off,
    Indeterminate,
}

/// How assistive technologies should announce changes to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveRegionMode {
    Polite,
    Assertive,
}

/// Float equality under which NaN equals NaN.
///
/// Property values are compared frame to frame, so a NaN reported twice is
/// the same value, not a change.
#[inline]
pub(crate) fn same_f32(a: f32, b: f32) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Progress of a determinate or indeterminate indicator.
///
/// Equality treats NaN components as equal to each other.
#[derive(Debug, Clone, Copy)]
pub struct ProgressRange {
    pub current: f32,
    pub min: f32,
    pub max: f32,
    pub steps: u32,
}

impl ProgressRange {
    pub fn new(current: f32, min: f32, max: f32) -> Self {
        Self {
            current,
            min,
            max,
            steps: 0,
        }
    }
}

impl PartialEq for ProgressRange {
    fn eq(&self, other: &Self) -> bool {
        same_f32(self.current, other.current)
            && same_f32(self.min, other.min)
            && same_f32(self.max, other.max)
            && self.steps == other.steps
    }
}

/// Scroll position along one axis. The minimum is always zero.
///
/// Equality treats NaN components as equal to each other.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollAxisRange {
    pub value: f32,
    pub max_value: f32,
    pub reverse_scrolling: bool,
}

impl ScrollAxisRange {
    pub fn new(value: f32, max_value: f32) -> Self {
        Self {
            value,
            max_value,
            reverse_scrolling: false,
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reverse_scrolling = true;
        self
    }

    /// Whether position and extent match, ignoring scroll direction.
    pub fn same_position(&self, other: &Self) -> bool {
        same_f32(self.value, other.value) && same_f32(self.max_value, other.max_value)
    }
}

impl PartialEq for ScrollAxisRange {
    fn eq(&self, other: &Self) -> bool {
        self.same_position(other) && self.reverse_scrolling == other.reverse_scrolling
    }
}

/// Keys of the semantics property vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKey {
    ContentDescription,
    Text,
    EditableText,
    TextSelectionRange,
    StateDescription,
    ToggleableState,
    Selected,
    Focused,
    Disabled,
    Password,
    Heading,
    InvisibleToUser,
    PaneTitle,
    LiveRegion,
    Role,
    TestTag,
    ProgressBarRangeInfo,
    HorizontalScrollAxisRange,
    VerticalScrollAxisRange,
    Action(ActionKind),
    CustomActions,
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Action(kind) => write!(f, "Action({kind:?})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Marker properties (`Disabled`, `Password`, `Heading`, ...).
    Unit,
    Bool(bool),
    Text(String),
    TextList(Vec<String>),
    Selection(TextRange),
    Toggle(ToggleableState),
    LiveRegion(LiveRegionMode),
    Role(Role),
    Progress(ProgressRange),
    Scroll(ScrollAxisRange),
    Action(ActionDescriptor),
    CustomActions(Vec<CustomAction>),
}

/// Insertion-ordered mapping of property key to value.
///
/// Re-inserting an existing key replaces its value in place and keeps its
/// original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    entries: Vec<(PropertyKey, PropertyValue)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a property, returning the previous value.
    pub fn insert(&mut self, key: PropertyKey, value: PropertyValue) -> Option<PropertyValue> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove a property, preserving the order of the rest.
    pub fn remove(&mut self, key: PropertyKey) -> Option<PropertyValue> {
        let index = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, key: PropertyKey) -> Option<&PropertyValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: PropertyKey) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropertyKey, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = PropertyKey> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    // ========================================================================
    // Typed accessors
    // ========================================================================

    pub fn role(&self) -> Option<Role> {
        match self.get(PropertyKey::Role) {
            Some(PropertyValue::Role(role)) => Some(*role),
            _ => None,
        }
    }

    pub fn editable_text(&self) -> Option<&str> {
        match self.get(PropertyKey::EditableText) {
            Some(PropertyValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&[String]> {
        self.text_list(PropertyKey::Text)
    }

    pub fn content_description(&self) -> Option<&[String]> {
        self.text_list(PropertyKey::ContentDescription)
    }

    fn text_list(&self, key: PropertyKey) -> Option<&[String]> {
        match self.get(key) {
            Some(PropertyValue::TextList(list)) => Some(list),
            Some(PropertyValue::Text(text)) => Some(std::slice::from_ref(text)),
            _ => None,
        }
    }

    pub fn selection(&self) -> Option<TextRange> {
        match self.get(PropertyKey::TextSelectionRange) {
            Some(PropertyValue::Selection(range)) => Some(*range),
            _ => None,
        }
    }

    pub fn pane_title(&self) -> Option<&str> {
        match self.get(PropertyKey::PaneTitle) {
            Some(PropertyValue::Text(title)) => Some(title),
            _ => None,
        }
    }

    pub fn toggleable_state(&self) -> Option<ToggleableState> {
        match self.get(PropertyKey::ToggleableState) {
            Some(PropertyValue::Toggle(state)) => Some(*state),
            _ => None,
        }
    }

    pub fn scroll_range(&self, axis: Axis) -> Option<ScrollAxisRange> {
        match self.get(axis.range_key()) {
            Some(PropertyValue::Scroll(range)) => Some(*range),
            _ => None,
        }
    }

    pub fn action(&self, kind: ActionKind) -> Option<&ActionDescriptor> {
        match self.get(PropertyKey::Action(kind)) {
            Some(PropertyValue::Action(action)) => Some(action),
            _ => None,
        }
    }

    pub fn custom_actions(&self) -> &[CustomAction] {
        match self.get(PropertyKey::CustomActions) {
            Some(PropertyValue::CustomActions(actions)) => actions,
            _ => &[],
        }
    }

    /// Reads a boolean property; marker properties read as `true`.
    pub fn flag(&self, key: PropertyKey) -> bool {
        match self.get(key) {
            Some(PropertyValue::Bool(value)) => *value,
            Some(_) => true,
            None => false,
        }
    }

    pub fn is_password(&self) -> bool {
        self.contains(PropertyKey::Password)
    }

    pub fn is_disabled(&self) -> bool {
        self.contains(PropertyKey::Disabled)
    }

    /// A text field exposes both editable text and a selection.
    pub fn is_text_field(&self) -> bool {
        self.contains(PropertyKey::EditableText) && self.contains(PropertyKey::TextSelectionRange)
    }
}

impl FromIterator<(PropertyKey, PropertyValue)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (PropertyKey, PropertyValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
