use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One JSONL trace line. Record-side lines carry the dedup decision for
/// an event; replay-side lines carry the outcome of a step.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub phase: &'static str,

    pub action: Option<String>,
    pub element: Option<String>,
    pub decision: Option<String>,
    pub suppression_reason: Option<String>,

    pub step_order: Option<u32>,
    pub locator: Option<String>,
    pub fallback_used: Option<bool>,
    pub status: Option<String>,
    pub duration_ms: Option<u64>,
}

impl TraceEvent {
    fn now(phase: &'static str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            phase,
            action: None,
            element: None,
            decision: None,
            suppression_reason: None,
            step_order: None,
            locator: None,
            fallback_used: None,
            status: None,
            duration_ms: None,
        }
    }

    pub fn record(action: impl ToString, element: impl ToString) -> Self {
        let mut ev = Self::now("record");
        ev.action = Some(action.to_string());
        ev.element = Some(element.to_string());
        ev
    }

    pub fn replay(step_order: u32) -> Self {
        let mut ev = Self::now("replay");
        ev.step_order = Some(step_order);
        ev
    }

    pub fn with_decision(mut self, decision: impl ToString) -> Self {
        self.decision = Some(decision.to_string());
        self
    }

    pub fn with_suppression(mut self, reason: impl ToString) -> Self {
        self.suppression_reason = Some(reason.to_string());
        self
    }

    pub fn with_step(mut self, order: u32) -> Self {
        self.step_order = Some(order);
        self
    }

    pub fn with_locator(mut self, locator: impl ToString) -> Self {
        self.locator = Some(locator.to_string());
        self
    }

    pub fn with_fallback(mut self, fallback_used: bool) -> Self {
        self.fallback_used = Some(fallback_used);
        self
    }

    pub fn with_status(mut self, status: impl ToString) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}
