use crate::element::control::control_kind;
use crate::element::element_model::{ControlKind, ElementDescriptor};
use crate::locator::locator_model::{Locator, Strategy};
use crate::locator::ranker::rank;
use crate::locator::scoring::ScoringConfig;

/// Enumerate every structurally valid locator strategy for a descriptor.
///
/// Identifier-family values that the dynamic filter flags are excluded
/// entirely rather than down-scored; a hashed id is not a weaker locator,
/// it is a wrong one. Emission order is strongest-family-first and acts
/// as the tie-break after ranking.
pub fn generate(el: &ElementDescriptor, config: &ScoringConfig) -> Vec<Locator> {
    let mut out = Vec::new();
    let control = control_kind(el);

    // --- Identifier family ---
    if let Some(id) = nonempty(el.id.as_deref()) {
        if !config.is_dynamic(id) {
            out.push(Locator::new(Strategy::Id, id));
        }
    }
    if let Some(attr) = &el.test_attr {
        if !config.is_dynamic(&attr.value) {
            out.push(Locator::new(
                Strategy::TestAttribute,
                format!("[{}='{}']", attr.name, attr.value),
            ));
        }
    }
    if let Some(name) = nonempty(el.name.as_deref()) {
        if !config.is_dynamic(name) {
            out.push(Locator::new(Strategy::Name, name));
        }
    }

    // --- Accessibility family ---
    if let Some(aria) = nonempty(el.aria_label.as_deref()) {
        out.push(Locator::new(Strategy::AriaLabel, aria));
    }
    if let Some(label) = nonempty(el.label.as_deref()) {
        out.push(Locator::new(Strategy::Label, label));
    }
    if let Some(placeholder) = nonempty(el.placeholder.as_deref()) {
        out.push(Locator::new(Strategy::Placeholder, placeholder));
    }
    if let Some(role) = nonempty(el.role.as_deref()) {
        let value = match nonempty(el.aria_label.as_deref()) {
            Some(aria) => format!("{}[name='{}']", role, aria),
            None => role.to_string(),
        };
        out.push(Locator::new(Strategy::Role, value));
    }

    // --- Content family (links and buttons only) ---
    if matches!(control, ControlKind::Link | ControlKind::Button) {
        if let Some(text) = nonempty(el.text.as_deref()) {
            let text = text.trim();
            out.push(Locator::new(Strategy::ContentText, text));
            if el.text_matches > 1 {
                let index = el.text_index.unwrap_or(1);
                out.push(Locator::new(
                    Strategy::IndexedText,
                    format!("{}[{}]", text, index),
                ));
            }
        }
    }

    // --- Structural family ---
    out.push(Locator::new(Strategy::Css, composed_selector(el, control, config)));
    if !el.css_path.is_empty() {
        out.push(Locator::new(Strategy::CssPath, el.css_path.clone()));
    }
    if !el.xpath.is_empty() {
        out.push(Locator::new(Strategy::XPath, el.xpath.clone()));
    }

    out
}

/// Generate and rank in one call; this is what step synthesis uses.
pub fn ranked_locators(el: &ElementDescriptor, config: &ScoringConfig) -> Vec<Locator> {
    rank(generate(el, config), config)
}

/// Compose a selector from the tag, the stable (non-dynamic-looking) class
/// names, and a distinguishing attribute. Degrades to the bare tag when
/// nothing stable is available; the ranker depresses that case.
fn composed_selector(el: &ElementDescriptor, control: ControlKind, config: &ScoringConfig) -> String {
    let mut selector = el.tag.clone();

    for class in el
        .classes
        .iter()
        .filter(|c| !c.is_empty() && !config.is_dynamic(c))
        .take(config.max_composed_classes)
    {
        selector.push('.');
        selector.push_str(class);
    }

    if let Some(type_attr) = nonempty(el.type_attr.as_deref()) {
        selector.push_str(&format!("[type='{}']", type_attr));
    } else if control == ControlKind::Link {
        if let Some(href) = nonempty(el.href.as_deref()) {
            selector.push_str(&format!("[href='{}']", href));
        }
    }

    selector
}

fn nonempty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
