use serde::{Deserialize, Serialize};

/// Structural snapshot of an interacted element, taken by the capture
/// surface at the moment of interaction. Immutable once captured; every
/// locator the generator emits is derived from this snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    pub tag: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_attr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Recognized test-automation attribute (data-testid, data-qa, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_attr: Option<TestAttr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    /// Text of the associated label element, if one was resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Visible text content, truncated by the capture surface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub content_editable: bool,
    /// Position-relative CSS path ("form > div:nth-of-type(2) > input").
    #[serde(default)]
    pub css_path: String,
    /// Full position-absolute XPath, usable as a last-resort locator.
    #[serde(default)]
    pub xpath: String,
    /// 1-based index among elements sharing this element's visible text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_index: Option<u32>,
    /// How many elements on the page share this element's visible text.
    #[serde(default = "default_one")]
    pub text_matches: u32,
}

fn default_one() -> u32 {
    1
}

impl ElementDescriptor {
    /// Minimal descriptor for the given tag; all other fields empty.
    pub fn for_tag(tag: &str) -> Self {
        ElementDescriptor {
            tag: tag.to_string(),
            type_attr: None,
            role: None,
            id: None,
            name: None,
            test_attr: None,
            aria_label: None,
            label: None,
            placeholder: None,
            text: None,
            classes: Vec::new(),
            href: None,
            checked: None,
            content_editable: false,
            css_path: String::new(),
            xpath: String::new(),
            text_index: None,
            text_matches: 1,
        }
    }

    /// Best human-readable label for this element, in preference order:
    /// accessible name, associated label, placeholder, visible text,
    /// name attribute, id, tag.
    pub fn best_label(&self) -> String {
        self.aria_label
            .as_deref()
            .or(self.label.as_deref())
            .or(self.placeholder.as_deref())
            .or(self.text.as_deref())
            .or(self.name.as_deref())
            .or(self.id.as_deref())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.tag.clone())
    }
}

/// A recognized test-automation attribute and its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestAttr {
    pub name: String,
    pub value: String,
}

/// Closed classification of an element's UI role, computed once per
/// descriptor by `control_kind`. Everything downstream switches on this
/// instead of re-deriving tag/type heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Text,
    Checkbox,
    Radio,
    Select,
    Slider,
    Color,
    File,
    DateTime,
    ContentEditable,
    Button,
    Link,
    Unknown,
}

impl ControlKind {
    /// Controls the user types into. Clicks on these are held in the
    /// pending buffer because they usually just focus the field.
    pub fn is_text_entry(self) -> bool {
        matches!(
            self,
            ControlKind::Text
                | ControlKind::DateTime
                | ControlKind::Color
                | ControlKind::ContentEditable
        )
    }

    /// Controls whose value is a boolean on/off state.
    pub fn is_choice(self) -> bool {
        matches!(self, ControlKind::Checkbox | ControlKind::Radio)
    }
}
