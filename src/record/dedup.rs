use std::collections::HashMap;

use crate::flow::step_model::IntentKind;
use crate::record::event_model::{ActionKind, RawInteractionEvent};

/// Last recorded action for an element, kept for the trailing window.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub action: ActionKind,
    pub intent: IntentKind,
    pub at_ms: u64,
}

/// A click on a text-entry control, held until it can be disambiguated
/// (incidental focus click vs. deliberate popup-opening gesture).
#[derive(Debug)]
pub struct PendingClick {
    pub key: String,
    pub event: RawInteractionEvent,
}

/// Transient recording-session state owned by the synthesizer: the
/// trailing-window ledger, the pending-click buffer, and the index of the
/// most recent text step per element. Discarded when recording stops.
#[derive(Debug)]
pub struct DedupState {
    window_ms: u64,
    ledger: HashMap<String, LedgerEntry>,
    pending: Vec<PendingClick>,
    last_text_step: HashMap<String, u32>,
}

impl DedupState {
    pub fn new(window_ms: u64) -> Self {
        DedupState {
            window_ms,
            ledger: HashMap::new(),
            pending: Vec::new(),
            last_text_step: HashMap::new(),
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Record the last action seen for an element.
    pub fn note(&mut self, key: &str, action: ActionKind, intent: IntentKind, at_ms: u64) {
        self.ledger.insert(
            key.to_string(),
            LedgerEntry {
                action,
                intent,
                at_ms,
            },
        );
    }

    /// Ledger entry for an element if it falls inside the trailing window.
    pub fn recent(&self, key: &str, now_ms: u64) -> Option<&LedgerEntry> {
        self.ledger
            .get(key)
            .filter(|e| now_ms.saturating_sub(e.at_ms) <= self.window_ms)
    }

    /// Hold a click for later disambiguation. An element identity has at
    /// most one buffered click; a newer one replaces it.
    pub fn buffer_click(&mut self, key: String, event: RawInteractionEvent) {
        self.pending.retain(|p| p.key != key);
        self.pending.push(PendingClick { key, event });
    }

    pub fn take_pending(&mut self, key: &str) -> Option<PendingClick> {
        let index = self.pending.iter().position(|p| p.key == key)?;
        Some(self.pending.remove(index))
    }

    /// Remove and return every buffered click, in arrival order.
    pub fn drain_pending(&mut self) -> Vec<PendingClick> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_keys(&self) -> Vec<String> {
        self.pending.iter().map(|p| p.key.clone()).collect()
    }

    pub fn note_text_step(&mut self, key: &str, order: u32) {
        self.last_text_step.insert(key.to_string(), order);
    }

    pub fn last_text_step(&self, key: &str) -> Option<u32> {
        self.last_text_step.get(key).copied()
    }
}
