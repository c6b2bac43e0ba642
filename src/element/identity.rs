use sha1::{Digest, Sha1};

use crate::element::element_model::ElementDescriptor;

/// Stable identity key for an element across events in one recording
/// session. Keys the dedup ledger, the pending-click buffer, and the
/// last-text-step index.
pub fn element_key(el: &ElementDescriptor) -> String {
    if let Some(id) = el.id.as_deref().filter(|s| !s.is_empty()) {
        return format!("{}#{}", el.tag, id);
    }
    if let Some(attr) = &el.test_attr {
        return format!("{}[{}={}]", el.tag, attr.name, attr.value);
    }
    if let Some(name) = el.name.as_deref().filter(|s| !s.is_empty()) {
        return format!("{}[name={}]", el.tag, name);
    }

    // No identifying attribute: fall back to a fingerprint of the
    // structural path (plus text, so sibling duplicates stay distinct).
    let basis = format!("{}|{}|{}", el.xpath, el.css_path, el.text.as_deref().unwrap_or(""));
    format!("{}:{}", el.tag, fingerprint(&basis))
}

/// Short SHA-1 fingerprint of arbitrary text.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..12].to_string()
}
