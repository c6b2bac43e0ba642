use serde::{Deserialize, Serialize};

use crate::element::control::{control_kind, is_submit_like};
use crate::element::element_model::{ControlKind, ElementDescriptor};
use crate::element::identity::element_key;
use crate::flow::flow_model::FlowStore;
use crate::flow::step_model::{
    IntentKind, Step, StepDetail, TestData, TestValue, WaitCondition, WaitSpec,
};
use crate::locator::generator::ranked_locators;
use crate::locator::scoring::ScoringConfig;
use crate::record::classifier::classify;
use crate::record::dedup::DedupState;
use crate::record::event_model::{ActionDetail, ActionKind, RawInteractionEvent};

/// Recording-side tunables, loadable from the app config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Trailing window for suppression and pending-click disambiguation.
    #[serde(default = "default_window")]
    pub dedup_window_ms: u64,

    /// Timeout attached to element-level wait conditions.
    #[serde(default = "default_step_timeout")]
    pub step_timeout_ms: u64,

    /// Timeout attached to page-level wait conditions.
    #[serde(default = "default_nav_timeout")]
    pub navigation_timeout_ms: u64,
}

impl Default for RecordConfig {
    fn default() -> Self {
        RecordConfig {
            dedup_window_ms: 600,
            step_timeout_ms: 5_000,
            navigation_timeout_ms: 10_000,
        }
    }
}

fn default_window() -> u64 {
    600
}
fn default_step_timeout() -> u64 {
    5_000
}
fn default_nav_timeout() -> u64 {
    10_000
}

/// Turns the raw event stream into canonical steps.
///
/// Owns the flow store it records into and the transient `DedupState`.
/// Synthesis never fails: malformed or unexpected events degrade to a
/// generic click classification instead of being dropped.
pub struct Synthesizer<S: FlowStore> {
    store: S,
    config: RecordConfig,
    scoring: ScoringConfig,
    dedup: DedupState,
}

impl<S: FlowStore> Synthesizer<S> {
    pub fn new(store: S, config: &RecordConfig) -> Self {
        Synthesizer {
            store,
            config: config.clone(),
            scoring: ScoringConfig::default(),
            dedup: DedupState::new(config.dedup_window_ms),
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Consume one raw event. Returns every step committed to the flow as
    /// a consequence (flushed buffered clicks first, then the step for
    /// this event); empty means the event was suppressed or buffered.
    pub fn process(&mut self, event: RawInteractionEvent) -> Vec<Step> {
        let control = control_kind(&event.element);
        let key = element_key(&event.element);
        let now = event.timestamp_ms;
        let mut emitted = Vec::new();

        // Clicks on text-entry controls are held: usually they just focus
        // the field the user is about to type into.
        if event.action == ActionKind::Click && control.is_text_entry() {
            self.dedup.buffer_click(key, event);
            return emitted;
        }

        let text_edit = matches!(event.action, ActionKind::Input | ActionKind::Change)
            && control.is_text_entry();

        if text_edit {
            // A follow-up edit inside the window proves the buffered click
            // was incidental; outside the window it was deliberate.
            if let Some(pending) = self.dedup.take_pending(&key) {
                if now.saturating_sub(pending.event.timestamp_ms) > self.dedup.window_ms() {
                    emitted.push(self.commit(pending.event));
                }
            }
        } else {
            // Any non-text action flushes every buffered click: no edit
            // followed, so those clicks had their own intended effect.
            for pending in self.dedup.drain_pending() {
                emitted.push(self.commit(pending.event));
            }
        }

        let intent = classify(event.action, control, event.interaction);

        // Trailing-window suppression.
        if let Some(prev) = self.dedup.recent(&key, now) {
            let repeated_choice =
                matches!(intent, IntentKind::Toggle | IntentKind::RadioSelect)
                    && prev.intent == intent;
            // input-then-change or change-then-input carrying the same
            // typed value; whichever was classified first wins.
            let text_duplicate = intent == IntentKind::TypeText
                && prev.intent == IntentKind::TypeText
                && prev.action != event.action;
            if repeated_choice || text_duplicate {
                self.dedup.note(&key, event.action, intent, now);
                return emitted;
            }
        }

        // Debounced typing updates the open text step instead of
        // multiplying steps.
        if intent == IntentKind::TypeText {
            if let Some(updated) = self.update_open_text_step(&key, &event) {
                self.dedup.note(&key, event.action, intent, now);
                emitted.push(updated);
                return emitted;
            }
        }

        emitted.push(self.commit(event));
        emitted
    }

    /// Flush one buffered click (window expired without a follow-up edit).
    pub fn flush_pending(&mut self, key: &str) -> Option<Step> {
        let pending = self.dedup.take_pending(key)?;
        Some(self.commit(pending.event))
    }

    /// Flush every buffered click; called when recording stops.
    pub fn flush_all(&mut self) -> Vec<Step> {
        self.dedup
            .drain_pending()
            .into_iter()
            .map(|p| self.commit(p.event))
            .collect()
    }

    pub fn pending_keys(&self) -> Vec<String> {
        self.dedup.pending_keys()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Rewrite the most recent text step for this element, if it is still
    /// the flow's last step.
    fn update_open_text_step(&mut self, key: &str, event: &RawInteractionEvent) -> Option<Step> {
        let order = self.dedup.last_text_step(key)?;
        let last_order = self.store.steps().last().map(|s| s.order)?;
        if last_order != order {
            return None;
        }

        let mut step = self.store.get(order)?.clone();
        let value = event.value_after.clone().unwrap_or_default();
        step.description = describe(step.intent, &event.element, Some(&value), None);
        step.test_data.value = TestValue::Text(value);
        self.store.update(step.clone());
        Some(step)
    }

    /// Build a step from an event that survived dedup and append it.
    fn commit(&mut self, event: RawInteractionEvent) -> Step {
        let control = control_kind(&event.element);
        let key = element_key(&event.element);
        let intent = classify(event.action, control, event.interaction);

        let order = self.store.next_order();
        let locators = ranked_locators(&event.element, &self.scoring);
        let test_data = extract_test_data(intent, &event);
        let detail = step_detail(&event);
        let shown = display_value(&test_data.value);
        let description = describe(intent, &event.element, Some(&shown), detail.as_ref());
        let wait = infer_wait(intent, control, &event.element, &self.config);

        let step = Step {
            order,
            intent,
            description,
            element: event.element.clone(),
            control,
            locators,
            test_data,
            detail,
            wait,
            enabled: true,
        };

        self.store.add(step.clone());
        self.dedup.note(&key, event.action, intent, event.timestamp_ms);
        if intent == IntentKind::TypeText {
            self.dedup.note_text_step(&key, order);
        }
        step
    }
}

// ============================================================================
// Step construction helpers
// ============================================================================

fn display_value(value: &TestValue) -> String {
    match value {
        TestValue::Text(s) => s.clone(),
        TestValue::Number(n) => format!("{}", n),
        TestValue::Flag(b) => b.to_string(),
    }
}

/// Human-readable description from the element's best available label.
fn describe(
    intent: IntentKind,
    element: &ElementDescriptor,
    value: Option<&str>,
    detail: Option<&StepDetail>,
) -> String {
    let label = element.best_label();
    match intent {
        IntentKind::Click => format!("Click '{}'", label),
        IntentKind::TypeText => {
            format!("Type \"{}\" into '{}'", value.unwrap_or(""), label)
        }
        IntentKind::SelectOption => {
            format!("Select \"{}\" in '{}'", value.unwrap_or(""), label)
        }
        IntentKind::Toggle => format!("Toggle '{}'", label),
        IntentKind::RadioSelect => format!("Choose '{}'", label),
        IntentKind::SetSlider => format!("Set '{}' to {}", label, value.unwrap_or("0")),
        IntentKind::PickFile => {
            format!("Pick file \"{}\" for '{}'", value.unwrap_or(""), label)
        }
        IntentKind::Submit => format!("Submit '{}'", label),
        IntentKind::Scroll => match detail {
            Some(StepDetail::Scroll { dx, dy }) => format!("Scroll by ({}, {})", dx, dy),
            _ => "Scroll".to_string(),
        },
        IntentKind::Hover => format!("Hover over '{}'", label),
        IntentKind::Drag => match detail {
            Some(StepDetail::Drag { dx, dy }) => {
                format!("Drag '{}' by ({}, {})", label, dx, dy)
            }
            _ => format!("Drag '{}'", label),
        },
        IntentKind::Modal => match detail {
            Some(StepDetail::Modal { accept: true }) => "Accept dialog".to_string(),
            Some(StepDetail::Modal { accept: false }) => "Dismiss dialog".to_string(),
            _ => "Handle dialog".to_string(),
        },
        IntentKind::Navigate => format!("Navigate to {}", value.unwrap_or("page")),
    }
}

/// Sanitized key plus a value whose type matches the control: flags for
/// choice controls, numbers for sliders, strings for everything else.
fn extract_test_data(intent: IntentKind, event: &RawInteractionEvent) -> TestData {
    let element = &event.element;
    let key = sanitize_key(&element.best_label(), &element.tag);

    let value = match intent {
        IntentKind::Toggle | IntentKind::RadioSelect => TestValue::Flag(toggled_state(event)),
        IntentKind::SetSlider => TestValue::Number(
            event
                .value_after
                .as_deref()
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(0.0),
        ),
        IntentKind::Modal => match &event.detail {
            Some(ActionDetail::Modal { accept, .. }) => TestValue::Flag(*accept),
            _ => TestValue::Flag(true),
        },
        IntentKind::Navigate => TestValue::Text(navigation_url(event)),
        IntentKind::Scroll | IntentKind::Drag => match &event.detail {
            Some(ActionDetail::Scroll { dx, dy }) | Some(ActionDetail::Drag { dx, dy }) => {
                TestValue::Text(format!("{},{}", dx, dy))
            }
            _ => TestValue::Text("0,0".to_string()),
        },
        _ => {
            // Degrade through value, visible text, then label so even an
            // unexpected event carries a non-empty payload.
            let text = event
                .value_after
                .clone()
                .filter(|v| !v.is_empty())
                .or_else(|| element.text.clone().filter(|t| !t.trim().is_empty()))
                .unwrap_or_else(|| element.best_label());
            TestValue::Text(text)
        }
    };

    TestData { key, value }
}

fn toggled_state(event: &RawInteractionEvent) -> bool {
    match event.value_after.as_deref() {
        Some("true") | Some("checked") | Some("on") => true,
        Some("false") | Some("unchecked") | Some("off") => false,
        // A click flips the captured state
        _ => !event.element.checked.unwrap_or(false),
    }
}

fn navigation_url(event: &RawInteractionEvent) -> String {
    match &event.detail {
        Some(ActionDetail::Navigate { url }) => url.clone(),
        _ => event.value_after.clone().unwrap_or_default(),
    }
}

/// Lowercased snake_case key from a label; falls back to the tag.
fn sanitize_key(label: &str, tag: &str) -> String {
    let mut key = String::new();
    let mut last_underscore = true;
    for c in label.trim().to_lowercase().chars() {
        if c.is_alphanumeric() {
            key.push(c);
            last_underscore = false;
        } else if !last_underscore {
            key.push('_');
            last_underscore = true;
        }
    }
    let key = key.trim_end_matches('_').to_string();
    if key.is_empty() { tag.to_string() } else { key }
}

fn step_detail(event: &RawInteractionEvent) -> Option<StepDetail> {
    match &event.detail {
        Some(ActionDetail::Scroll { dx, dy }) => Some(StepDetail::Scroll { dx: *dx, dy: *dy }),
        Some(ActionDetail::Drag { dx, dy }) => Some(StepDetail::Drag { dx: *dx, dy: *dy }),
        Some(ActionDetail::Modal { accept, .. }) => Some(StepDetail::Modal { accept: *accept }),
        _ => None,
    }
}

/// Wait condition a replayed step must meet, inferred from the intent and
/// the element's role.
fn infer_wait(
    intent: IntentKind,
    control: ControlKind,
    element: &ElementDescriptor,
    config: &RecordConfig,
) -> WaitSpec {
    let (condition, timeout_ms) = match intent {
        IntentKind::Navigate => (WaitCondition::NetworkIdle, config.navigation_timeout_ms),
        IntentKind::Submit => (WaitCondition::Navigation, config.navigation_timeout_ms),
        IntentKind::Click if is_submit_like(element, control) => {
            (WaitCondition::Navigation, config.navigation_timeout_ms)
        }
        IntentKind::Click => (WaitCondition::Clickable, config.step_timeout_ms),
        IntentKind::TypeText
        | IntentKind::SelectOption
        | IntentKind::Toggle
        | IntentKind::RadioSelect
        | IntentKind::SetSlider
        | IntentKind::PickFile => (WaitCondition::Visible, config.step_timeout_ms),
        IntentKind::Scroll | IntentKind::Hover | IntentKind::Drag | IntentKind::Modal => {
            (WaitCondition::Present, config.step_timeout_ms)
        }
    };

    WaitSpec {
        condition,
        timeout_ms,
    }
}
