use serde::{Deserialize, Serialize};

use crate::replay::replay_model::{StepOutcome, StepStatus};

// ============================================================================
// Replay run report — aggregates the per-step outcomes of one run
// ============================================================================

/// Aggregated result of replaying one flow.
///
/// Built from the executor's `StepOutcome` list via `from_outcomes()` and
/// consumed by the console reporter and the trace log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub flow_name: String,

    /// Steps that produced an outcome (halting leaves the rest unrun)
    pub total: usize,

    pub passed: usize,

    pub failed: usize,

    pub skipped: usize,

    /// Steps that needed a lower-ranked locator to resolve
    pub fallbacks: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// True when a failed step halted the remaining sequence
    #[serde(default)]
    pub halted: bool,

    /// Run-level error (failed start navigation or the halting step)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub outcomes: Vec<StepOutcome>,
}

impl RunReport {
    pub fn from_outcomes(flow_name: &str, outcomes: Vec<StepOutcome>) -> Self {
        let total = outcomes.len();
        let passed = outcomes
            .iter()
            .filter(|o| o.status == StepStatus::Passed)
            .count();
        let failed = outcomes
            .iter()
            .filter(|o| o.status == StepStatus::Failed)
            .count();
        let skipped = outcomes
            .iter()
            .filter(|o| o.status == StepStatus::Skipped)
            .count();
        let fallbacks = outcomes
            .iter()
            .filter(|o| o.diagnostics.fallback_used)
            .count();
        Self {
            flow_name: flow_name.to_string(),
            total,
            passed,
            failed,
            skipped,
            fallbacks,
            duration_ms: None,
            halted: false,
            error: None,
            outcomes,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_halted(mut self, halted: bool) -> Self {
        self.halted = halted;
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Whether the run completed with no failed step and no run error.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.error.is_none()
    }
}
