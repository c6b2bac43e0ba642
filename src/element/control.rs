use crate::element::element_model::{ControlKind, ElementDescriptor};

/// Derive the `ControlKind` for a descriptor from its tag, type attribute,
/// ARIA role, and class list. Computed once per captured element; every
/// classification site downstream switches on the result.
pub fn control_kind(el: &ElementDescriptor) -> ControlKind {
    if el.content_editable {
        return ControlKind::ContentEditable;
    }

    match el.tag.as_str() {
        "a" => ControlKind::Link,
        "button" => ControlKind::Button,
        "select" => ControlKind::Select,
        "textarea" => ControlKind::Text,
        "input" => input_kind(el.type_attr.as_deref()),
        _ => role_or_class_kind(el),
    }
}

fn input_kind(type_attr: Option<&str>) -> ControlKind {
    match type_attr {
        None | Some("text" | "email" | "password" | "search" | "tel" | "url" | "number") => {
            ControlKind::Text
        }
        Some("checkbox") => ControlKind::Checkbox,
        Some("radio") => ControlKind::Radio,
        Some("range") => ControlKind::Slider,
        Some("color") => ControlKind::Color,
        Some("file") => ControlKind::File,
        Some("date" | "time" | "datetime-local" | "month" | "week") => ControlKind::DateTime,
        Some("submit" | "button" | "reset" | "image") => ControlKind::Button,
        // Unknown input types behave as text fields in browsers
        _ => ControlKind::Text,
    }
}

fn role_or_class_kind(el: &ElementDescriptor) -> ControlKind {
    match el.role.as_deref() {
        Some("button") => ControlKind::Button,
        Some("link") => ControlKind::Link,
        Some("checkbox" | "switch") => ControlKind::Checkbox,
        Some("radio") => ControlKind::Radio,
        Some("slider") => ControlKind::Slider,
        Some("textbox" | "searchbox" | "combobox") => ControlKind::Text,
        Some("listbox") => ControlKind::Select,
        _ => {
            // Last heuristic: class names that mark clickable chrome
            let looks_clickable = el
                .classes
                .iter()
                .any(|c| c.contains("btn") || c.contains("button"));
            if looks_clickable {
                ControlKind::Button
            } else {
                ControlKind::Unknown
            }
        }
    }
}

/// True when activating this element is expected to trigger navigation or
/// form submission (used for wait inference on recorded clicks).
pub fn is_submit_like(el: &ElementDescriptor, control: ControlKind) -> bool {
    if el.type_attr.as_deref() == Some("submit") {
        return true;
    }
    if control == ControlKind::Link {
        return matches!(el.href.as_deref(), Some(h) if !h.is_empty() && h != "#");
    }
    if control != ControlKind::Button {
        return false;
    }

    let keywords = ["submit", "save", "sign", "login", "continue", "next"];
    let label = el.best_label().to_lowercase();
    keywords.iter().any(|k| label.contains(k))
}
