use serde::{Deserialize, Serialize};

use crate::element::element_model::{ControlKind, ElementDescriptor};
use crate::locator::locator_model::Locator;

/// Classified user intent behind a recorded step. Every raw event maps to
/// exactly one of these; `Click` is the generic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Click,
    TypeText,
    SelectOption,
    Toggle,
    RadioSelect,
    SetSlider,
    PickFile,
    Submit,
    Scroll,
    Hover,
    Drag,
    Modal,
    Navigate,
}

/// Condition a replayed step must satisfy before its action is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitCondition {
    /// Element exists in the current tree.
    Present,
    /// Element exists, has non-zero rendered extent, and is not hidden.
    Visible,
    /// Visible and not disabled.
    Clickable,
    /// Page-level: no in-flight network activity.
    NetworkIdle,
    /// Page-level: a navigation completed.
    Navigation,
}

/// Wait condition plus its timeout, inferred once at synthesis time and
/// consumed (never mutated) by the replay resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaitSpec {
    pub condition: WaitCondition,
    pub timeout_ms: u64,
}

/// Typed value extracted from a recorded interaction, matching the
/// control: text fields carry strings, toggles carry flags, sliders carry
/// numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl TestValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TestValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            TestValue::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

/// Sanitized key/value pair a step feeds back into exporters and replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestData {
    pub key: String,
    pub value: TestValue,
}

/// Action-specific payload for steps whose effect is not captured by the
/// test-data value alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepDetail {
    Scroll { dx: i64, dy: i64 },
    Drag { dx: i64, dy: i64 },
    Modal { accept: bool },
}

/// The canonical, persisted unit of recorded user intent.
///
/// Created by the synthesizer; after creation it changes only through the
/// flow store's explicit edit operations (rename, toggle, reorder,
/// delete). `order` is 1-based and contiguous; `locators` are sorted by
/// confidence descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub order: u32,
    pub intent: IntentKind,
    pub description: String,
    pub element: ElementDescriptor,
    pub control: ControlKind,
    pub locators: Vec<Locator>,
    pub test_data: TestData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<StepDetail>,
    pub wait: WaitSpec,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}
