use serde::{Deserialize, Serialize};

use crate::element::element_model::ElementDescriptor;

/// Low-level action kind reported by the capture surface. One user
/// gesture typically produces several of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Click,
    Input,
    Change,
    Select,
    Toggle,
    Submit,
    Scroll,
    Hover,
    Drag,
    Modal,
    Navigate,
}

/// How the interaction was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Pointer,
    Keyboard,
    Programmatic,
}

/// Action-specific metadata carried alongside an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionDetail {
    Scroll {
        dx: i64,
        dy: i64,
    },
    Drag {
        dx: i64,
        dy: i64,
    },
    Modal {
        accept: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    Navigate {
        url: String,
    },
}

/// One raw notification from the capture surface. Transient: consumed by
/// the synthesizer, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInteractionEvent {
    pub action: ActionKind,
    pub element: ElementDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_after: Option<String>,
    /// Page-time milliseconds; events arrive in page-time order.
    pub timestamp_ms: u64,
    #[serde(default = "default_interaction")]
    pub interaction: InteractionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<ActionDetail>,
}

fn default_interaction() -> InteractionType {
    InteractionType::Pointer
}
