use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::locator::locator_model::Locator;

/// What the page reports about a locator's target right now.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementProbe {
    pub found: bool,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Concrete page action derived from a step's intent. The driver owns the
/// transport; the command says exactly what script logic to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionCommand {
    Click {
        locator: Locator,
    },
    /// Clear the field, set the value through the control's real
    /// value-setting path, then re-dispatch input/change so reactive
    /// frameworks observe the edit.
    SetValue {
        locator: Locator,
        value: String,
    },
    /// Set the underlying option and dispatch change.
    SelectOption {
        locator: Locator,
        value: String,
    },
    /// Set through the native setter and dispatch input+change.
    SetSlider {
        locator: Locator,
        value: f64,
    },
    /// Submit the owning form, or click when there is none.
    Submit {
        locator: Locator,
    },
    Hover {
        locator: Locator,
    },
    DragBy {
        locator: Locator,
        dx: i64,
        dy: i64,
    },
    ScrollBy {
        dx: i64,
        dy: i64,
    },
    Modal {
        accept: bool,
    },
}

/// Page-level wait policy applied to navigation steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageWait {
    NetworkIdle { timeout_ms: u64 },
    Navigation { timeout_ms: u64 },
    Settle { delay_ms: u64 },
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to spawn page bridge '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("page bridge i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("page bridge protocol ({command}): {message}")]
    Protocol { command: String, message: String },

    #[error("page bridge JSON ({context}): {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    #[error("action failed: {0}")]
    Action(String),
}

/// The page-execution collaborator: resolves probes and dispatches
/// actions against the live page. The executor decides *what* to run;
/// implementations own the transport.
#[async_trait]
pub trait PageDriver: Send {
    /// Inspect the element a locator currently resolves to. A missing
    /// element is a normal `found: false` probe, not an error.
    async fn probe(&mut self, locator: &Locator) -> Result<ElementProbe, DriverError>;

    async fn apply(&mut self, command: &ActionCommand) -> Result<(), DriverError>;

    async fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    async fn wait_page(&mut self, wait: &PageWait) -> Result<(), DriverError>;
}
