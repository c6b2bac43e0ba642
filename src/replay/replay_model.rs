use serde::{Deserialize, Serialize};

use crate::flow::step_model::Step;
use crate::locator::locator_model::Locator;

/// Replay state machine: `idle → playing → idle` for a full run,
/// `idle/paused → stepping → paused` for manual single-stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayState {
    Idle,
    Playing,
    Paused,
    Stepping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed,
    Skipped,
}

/// One locator that was attempted and did not resolve, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorFailure {
    pub locator: Locator,
    pub error: String,
}

/// Per-step replay result detail. Produced fresh on every attempt and
/// never persisted back onto the step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayDiagnostics {
    /// The locator that finally resolved, if any.
    pub locator_used: Option<Locator>,
    /// Every locator attempted before it, with its failure reason.
    pub failures: Vec<LocatorFailure>,
    /// True when the winning locator was not the top-ranked one.
    pub fallback_used: bool,
    pub duration_ms: u64,
}

impl ReplayDiagnostics {
    pub fn empty() -> Self {
        ReplayDiagnostics {
            locator_used: None,
            failures: Vec::new(),
            fallback_used: false,
            duration_ms: 0,
        }
    }
}

/// Outcome of one step during replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub order: u32,
    pub description: String,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub diagnostics: ReplayDiagnostics,
}

impl StepOutcome {
    pub fn passed(step: &Step, diagnostics: ReplayDiagnostics) -> Self {
        StepOutcome {
            order: step.order,
            description: step.description.clone(),
            status: StepStatus::Passed,
            error: None,
            diagnostics,
        }
    }

    pub fn failed(step: &Step, error: impl ToString, diagnostics: ReplayDiagnostics) -> Self {
        StepOutcome {
            order: step.order,
            description: step.description.clone(),
            status: StepStatus::Failed,
            error: Some(error.to_string()),
            diagnostics,
        }
    }

    pub fn skipped(step: &Step) -> Self {
        StepOutcome {
            order: step.order,
            description: step.description.clone(),
            status: StepStatus::Skipped,
            error: None,
            diagnostics: ReplayDiagnostics::empty(),
        }
    }
}
