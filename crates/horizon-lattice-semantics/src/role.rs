//! Semantic roles and the platform class-label table.

#[cfg(feature = "accessibility")]
use accesskit::Role as AccessKitRole;

use crate::property::{ActionKind, PropertyKey, PropertyMap};

/// Platform class label used when nothing more specific applies.
pub const DEFAULT_CLASS_LABEL: &str = "android.view.View";

/// The declared structural role of a semantics node.
///
/// Roles are optional: most nodes carry none and are classified purely from
/// their properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A push button.
    Button,

    /// A two-state switch.
    Switch,

    /// A checkbox that can be checked or unchecked.
    Checkbox,

    /// A radio button (mutually exclusive selection).
    RadioButton,

    /// A single tab.
    Tab,

    /// An image.
    Image,

    /// A dropdown list.
    DropdownList,

    /// A picker for a value within a list of values.
    ValuePicker,
}

impl Role {
    /// Platform class label for nodes carrying this role, if the role
    /// determines one.
    ///
    /// `Tab` does not change the class; it only contributes a role
    /// description.
    pub fn class_label(self) -> Option<&'static str> {
        match self {
            Role::Button => Some("android.widget.Button"),
            Role::Switch => Some("android.widget.Switch"),
            Role::Checkbox => Some("android.widget.CheckBox"),
            Role::RadioButton => Some("android.widget.RadioButton"),
            Role::Tab => None,
            Role::Image => Some("android.widget.ImageView"),
            Role::DropdownList => Some("android.widget.Spinner"),
            Role::ValuePicker => Some("android.widget.NumberPicker"),
        }
    }

    /// Human readable role description announced by screen readers, for roles
    /// the platform has no widget class for.
    pub fn role_description(self) -> Option<&'static str> {
        match self {
            Role::Tab => Some("Tab"),
            _ => None,
        }
    }

    /// Convert to AccessKit's Role enum.
    #[cfg(feature = "accessibility")]
    pub fn to_accesskit_role(self) -> AccessKitRole {
        match self {
            Role::Button => AccessKitRole::Button,
            Role::Switch => AccessKitRole::Switch,
            Role::Checkbox => AccessKitRole::CheckBox,
            Role::RadioButton => AccessKitRole::RadioButton,
            Role::Tab => AccessKitRole::Tab,
            Role::Image => AccessKitRole::Image,
            Role::DropdownList => AccessKitRole::ComboBox,
            Role::ValuePicker => AccessKitRole::SpinButton,
        }
    }
}

#[cfg(feature = "accessibility")]
impl From<Role> for AccessKitRole {
    fn from(role: Role) -> Self {
        role.to_accesskit_role()
    }
}

/// Resolve the platform class label for a property set.
///
/// Later rules override earlier ones: editable text, then plain text, then
/// the declared role, then a progress range.
pub fn class_label(properties: &PropertyMap) -> &'static str {
    let mut label = DEFAULT_CLASS_LABEL;

    if properties.contains(PropertyKey::EditableText) {
        label = "android.widget.EditText";
    } else if properties.contains(PropertyKey::Text) {
        label = "android.widget.TextView";
    }

    if let Some(role_label) = properties.role().and_then(Role::class_label) {
        label = role_label;
    }

    if properties.contains(PropertyKey::ProgressBarRangeInfo) {
        label = if properties.contains(PropertyKey::Action(ActionKind::SetProgress)) {
            "android.widget.SeekBar"
        } else {
            "android.widget.ProgressBar"
        };
    }

    label
}

/// Resolve the AccessKit role for a property set, following the same
/// precedence as [`class_label`].
#[cfg(feature = "accessibility")]
pub fn accesskit_role(properties: &PropertyMap) -> AccessKitRole {
    let mut role = AccessKitRole::GenericContainer;

    if properties.contains(PropertyKey::EditableText) {
        role = AccessKitRole::TextInput;
    } else if properties.contains(PropertyKey::Text) {
        role = AccessKitRole::Label;
    }

    if let Some(declared) = properties.role() {
        role = declared.to_accesskit_role();
    }

    if properties.contains(PropertyKey::ProgressBarRangeInfo) {
        role = if properties.contains(PropertyKey::Action(ActionKind::SetProgress)) {
            AccessKitRole::Slider
        } else {
            AccessKitRole::ProgressIndicator
        };
    }

    role
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{ActionDescriptor, ProgressRange, PropertyValue};

    fn props(entries: Vec<(PropertyKey, PropertyValue)>) -> PropertyMap {
        entries.into_iter().collect()
    }

    #[test]
    fn test_fallback_label() {
        assert_eq!(class_label(&PropertyMap::new()), DEFAULT_CLASS_LABEL);
    }

    #[test]
    fn test_text_and_editable_text() {
        let text = props(vec![(PropertyKey::Text, PropertyValue::TextList(vec!["Hi".into()]))]);
        assert_eq!(class_label(&text), "android.widget.TextView");

        let edit = props(vec![
            (PropertyKey::Text, PropertyValue::TextList(vec!["Hi".into()])),
            (PropertyKey::EditableText, PropertyValue::Text("Hi".into())),
        ]);
        assert_eq!(class_label(&edit), "android.widget.EditText");
    }

    #[test]
    fn test_role_overrides_text() {
        let button = props(vec![
            (PropertyKey::Text, PropertyValue::TextList(vec!["OK".into()])),
            (PropertyKey::Role, PropertyValue::Role(Role::Button)),
        ]);
        assert_eq!(class_label(&button), "android.widget.Button");

        let tab = props(vec![
            (PropertyKey::Text, PropertyValue::TextList(vec!["Home".into()])),
            (PropertyKey::Role, PropertyValue::Role(Role::Tab)),
        ]);
        assert_eq!(class_label(&tab), "android.widget.TextView");
        assert_eq!(Role::Tab.role_description(), Some("Tab"));
    }

    #[test]
    fn test_progress_range_seek_bar() {
        let progress = props(vec![(
            PropertyKey::ProgressBarRangeInfo,
            PropertyValue::Progress(ProgressRange::new(0.5, 0.0, 1.0)),
        )]);
        assert_eq!(class_label(&progress), "android.widget.ProgressBar");

        let mut seek = progress.clone();
        seek.insert(
            PropertyKey::Action(ActionKind::SetProgress),
            PropertyValue::Action(ActionDescriptor::new()),
        );
        assert_eq!(class_label(&seek), "android.widget.SeekBar");
    }

    #[cfg(feature = "accessibility")]
    #[test]
    fn test_accesskit_mapping() {
        assert_eq!(Role::Checkbox.to_accesskit_role(), AccessKitRole::CheckBox);
        assert_eq!(AccessKitRole::from(Role::DropdownList), AccessKitRole::ComboBox);

        let edit = props(vec![(PropertyKey::EditableText, PropertyValue::Text(String::new()))]);
        assert_eq!(accesskit_role(&edit), AccessKitRole::TextInput);
    }
}
