use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use flow_recorder::element::element_model::{ControlKind, ElementDescriptor};
use flow_recorder::flow::flow_model::{Flow, FlowStore};
use flow_recorder::flow::step_model::{
    IntentKind, Step, TestData, TestValue, WaitCondition, WaitSpec,
};
use flow_recorder::locator::locator_model::{Locator, Strategy};
use flow_recorder::replay::executor::{ReplayConfig, ReplayEngine};
use flow_recorder::replay::page::{
    ActionCommand, DriverError, ElementProbe, PageDriver, PageWait,
};
use flow_recorder::replay::replay_model::{ReplayState, StepStatus};

// =========================================================================
// Scripted page driver
// =========================================================================

#[derive(Default)]
struct MockDriver {
    /// Probe result per locator value; anything else reports not-found.
    probes: HashMap<String, ElementProbe>,
    applied: Vec<ActionCommand>,
    navigations: Vec<String>,
    waits: Vec<PageWait>,
    fail_apply: bool,
}

impl MockDriver {
    fn with_probe(mut self, value: &str, probe: ElementProbe) -> Self {
        self.probes.insert(value.to_string(), probe);
        self
    }
}

fn actionable() -> ElementProbe {
    ElementProbe {
        found: true,
        visible: true,
        enabled: true,
        checked: None,
        value: None,
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn probe(&mut self, locator: &Locator) -> Result<ElementProbe, DriverError> {
        Ok(self.probes.get(&locator.value).cloned().unwrap_or_default())
    }

    async fn apply(&mut self, command: &ActionCommand) -> Result<(), DriverError> {
        if self.fail_apply {
            return Err(DriverError::Action("injected dispatch failure".into()));
        }
        self.applied.push(command.clone());
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.navigations.push(url.to_string());
        Ok(())
    }

    async fn wait_page(&mut self, wait: &PageWait) -> Result<(), DriverError> {
        self.waits.push(wait.clone());
        Ok(())
    }
}

// =========================================================================
// Helpers
// =========================================================================

/// Step with zero timeout so each locator is probed exactly once.
fn step(order: u32, locators: Vec<(Strategy, &str)>) -> Step {
    Step {
        order,
        intent: IntentKind::Click,
        description: format!("Step {}", order),
        element: ElementDescriptor::for_tag("button"),
        control: ControlKind::Button,
        locators: locators
            .into_iter()
            .map(|(strategy, value)| Locator::new(strategy, value))
            .collect(),
        test_data: TestData {
            key: format!("step_{}", order),
            value: TestValue::Text(String::new()),
        },
        detail: None,
        wait: WaitSpec {
            condition: WaitCondition::Clickable,
            timeout_ms: 0,
        },
        enabled: true,
    }
}

fn flow_of(steps: Vec<Step>) -> Flow {
    let mut flow = Flow::new("replay test");
    for s in steps {
        flow.add(s);
    }
    flow
}

fn config() -> ReplayConfig {
    ReplayConfig {
        poll_interval_ms: 10,
        settle_delay_ms: 0,
        start_wait_timeout_ms: 100,
    }
}

// =========================================================================
// Fallback resolution
// =========================================================================

#[tokio::test]
async fn fallback_to_second_locator_passes_with_diagnostics() {
    let driver = MockDriver::default().with_probe("submit-btn", actionable());
    let (mut engine, _abort) = ReplayEngine::new(driver, config());

    let flow = flow_of(vec![step(
        1,
        vec![(Strategy::Css, "button.btn-old"), (Strategy::Id, "submit-btn")],
    )]);

    let report = engine.run(&flow).await;
    assert!(report.all_passed());

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.status, StepStatus::Passed);
    assert!(outcome.diagnostics.fallback_used);
    assert_eq!(outcome.diagnostics.failures.len(), 1);
    assert_eq!(outcome.diagnostics.failures[0].locator.value, "button.btn-old");
    assert_eq!(
        outcome.diagnostics.locator_used.as_ref().map(|l| l.value.as_str()),
        Some("submit-btn")
    );
    assert_eq!(report.fallbacks, 1);
}

#[tokio::test]
async fn top_locator_resolving_sets_no_fallback() {
    let driver = MockDriver::default().with_probe("submit-btn", actionable());
    let (mut engine, _abort) = ReplayEngine::new(driver, config());

    let flow = flow_of(vec![step(1, vec![(Strategy::Id, "submit-btn")])]);
    let report = engine.run(&flow).await;

    assert!(report.all_passed());
    assert!(!report.outcomes[0].diagnostics.fallback_used);
    assert!(report.outcomes[0].diagnostics.failures.is_empty());
}

// =========================================================================
// Failure semantics
// =========================================================================

#[tokio::test]
async fn exhausted_locators_fail_the_step_and_halt_the_run() {
    let driver = MockDriver::default();
    let (mut engine, _abort) = ReplayEngine::new(driver, config());

    let flow = flow_of(vec![
        step(1, vec![(Strategy::Css, ".gone"), (Strategy::XPath, "/html/body/div[1]")]),
        step(2, vec![(Strategy::Id, "never-reached")]),
    ]);

    let report = engine.run(&flow).await;

    assert!(!report.all_passed());
    assert!(report.halted);
    assert_eq!(report.total, 1, "second step must not execute");
    assert_eq!(report.outcomes[0].status, StepStatus::Failed);
    assert_eq!(
        report.outcomes[0].error.as_deref(),
        Some("element not found with any locator")
    );
    assert_eq!(report.outcomes[0].diagnostics.failures.len(), 2);
    assert_eq!(engine.state(), ReplayState::Idle);
}

#[tokio::test]
async fn unmet_visibility_condition_fails_with_reason() {
    let hidden = ElementProbe {
        found: true,
        visible: false,
        enabled: true,
        checked: None,
        value: None,
    };
    let driver = MockDriver::default().with_probe("banner", hidden);
    let (mut engine, _abort) = ReplayEngine::new(driver, config());

    let mut s = step(1, vec![(Strategy::Id, "banner")]);
    s.wait.condition = WaitCondition::Visible;
    let report = engine.run(&flow_of(vec![s])).await;

    assert_eq!(report.outcomes[0].status, StepStatus::Failed);
    assert!(
        report.outcomes[0].diagnostics.failures[0]
            .error
            .contains("not visible")
    );
}

#[tokio::test]
async fn action_dispatch_failure_fails_the_step_without_panicking() {
    let mut driver = MockDriver::default().with_probe("submit-btn", actionable());
    driver.fail_apply = true;
    let (mut engine, _abort) = ReplayEngine::new(driver, config());

    let flow = flow_of(vec![step(1, vec![(Strategy::Id, "submit-btn")])]);
    let report = engine.run(&flow).await;

    assert!(!report.all_passed());
    let outcome = &report.outcomes[0];
    assert_eq!(outcome.status, StepStatus::Failed);
    assert!(outcome.error.as_deref().unwrap().contains("injected dispatch failure"));
    // Resolution succeeded, so the winning locator is still reported
    assert!(outcome.diagnostics.locator_used.is_some());
}

// =========================================================================
// Action dispatch
// =========================================================================

#[tokio::test]
async fn type_step_applies_set_value() {
    let driver = MockDriver::default().with_probe("email", actionable());
    let (mut engine, _abort) = ReplayEngine::new(driver, config());

    let mut s = step(1, vec![(Strategy::Name, "email")]);
    s.intent = IntentKind::TypeText;
    s.control = ControlKind::Text;
    s.test_data.value = TestValue::Text("alice@example.com".into());
    s.wait.condition = WaitCondition::Visible;

    let report = engine.run(&flow_of(vec![s])).await;
    assert!(report.all_passed());

    match &engine.driver().applied[..] {
        [ActionCommand::SetValue { value, .. }] => assert_eq!(value, "alice@example.com"),
        other => panic!("expected one SetValue, got {:?}", other),
    }
}

#[tokio::test]
async fn toggle_in_target_state_is_a_noop() {
    let mut checked = actionable();
    checked.checked = Some(true);
    let driver = MockDriver::default().with_probe("accept", checked);
    let (mut engine, _abort) = ReplayEngine::new(driver, config());

    let mut s = step(1, vec![(Strategy::Name, "accept")]);
    s.intent = IntentKind::Toggle;
    s.control = ControlKind::Checkbox;
    s.test_data.value = TestValue::Flag(true);
    s.wait.condition = WaitCondition::Visible;

    let report = engine.run(&flow_of(vec![s])).await;
    assert!(report.all_passed());
    assert!(engine.driver().applied.is_empty(), "click would undo the state");
}

#[tokio::test]
async fn toggle_in_wrong_state_clicks() {
    let mut unchecked = actionable();
    unchecked.checked = Some(false);
    let driver = MockDriver::default().with_probe("accept", unchecked);
    let (mut engine, _abort) = ReplayEngine::new(driver, config());

    let mut s = step(1, vec![(Strategy::Name, "accept")]);
    s.intent = IntentKind::Toggle;
    s.control = ControlKind::Checkbox;
    s.test_data.value = TestValue::Flag(true);
    s.wait.condition = WaitCondition::Visible;

    let report = engine.run(&flow_of(vec![s])).await;
    assert!(report.all_passed());
    assert!(matches!(
        engine.driver().applied[..],
        [ActionCommand::Click { .. }]
    ));
}

#[tokio::test]
async fn navigation_step_skips_resolution_and_waits_for_the_page() {
    let driver = MockDriver::default();
    let (mut engine, _abort) = ReplayEngine::new(driver, config());

    let mut s = step(1, vec![]);
    s.intent = IntentKind::Navigate;
    s.test_data.value = TestValue::Text("https://app.example.com/next".into());
    s.wait = WaitSpec {
        condition: WaitCondition::NetworkIdle,
        timeout_ms: 8_000,
    };

    let report = engine.run(&flow_of(vec![s])).await;
    assert!(report.all_passed());
    assert_eq!(engine.driver().navigations, vec!["https://app.example.com/next"]);
    assert!(matches!(
        engine.driver().waits[..],
        [PageWait::NetworkIdle { timeout_ms: 8_000 }]
    ));
}

#[tokio::test]
async fn submit_like_click_waits_for_navigation_after_dispatch() {
    let driver = MockDriver::default().with_probe("login-btn", actionable());
    let (mut engine, _abort) = ReplayEngine::new(driver, config());

    let mut s = step(1, vec![(Strategy::Id, "login-btn")]);
    s.wait = WaitSpec {
        condition: WaitCondition::Navigation,
        timeout_ms: 9_000,
    };

    let report = engine.run(&flow_of(vec![s])).await;
    assert!(report.all_passed());
    assert_eq!(engine.driver().applied.len(), 1);
    assert!(matches!(
        engine.driver().waits[..],
        [PageWait::Navigation { timeout_ms: 9_000 }]
    ));
}

// =========================================================================
// Disabled steps, start URL
// =========================================================================

#[tokio::test]
async fn disabled_steps_are_skipped_without_diagnostics() {
    let driver = MockDriver::default().with_probe("ok-btn", actionable());
    let (mut engine, _abort) = ReplayEngine::new(driver, config());

    let mut first = step(1, vec![(Strategy::Id, "ignored")]);
    first.enabled = false;
    let second = step(2, vec![(Strategy::Id, "ok-btn")]);

    let report = engine.run(&flow_of(vec![first, second])).await;

    assert!(report.all_passed());
    assert_eq!(report.skipped, 1);
    assert_eq!(report.passed, 1);
    assert_eq!(report.outcomes[0].status, StepStatus::Skipped);
    assert!(report.outcomes[0].diagnostics.failures.is_empty());
    assert!(report.outcomes[0].diagnostics.locator_used.is_none());
}

#[tokio::test]
async fn start_url_is_opened_before_the_first_step() {
    let driver = MockDriver::default().with_probe("ok-btn", actionable());
    let (mut engine, _abort) = ReplayEngine::new(driver, config());

    let mut flow = flow_of(vec![step(1, vec![(Strategy::Id, "ok-btn")])]);
    flow.start_url = Some("https://app.example.com".into());

    let report = engine.run(&flow).await;
    assert!(report.all_passed());
    assert_eq!(engine.driver().navigations, vec!["https://app.example.com"]);
}

// =========================================================================
// Single-step mode
// =========================================================================

#[tokio::test]
async fn step_over_walks_the_flow_one_step_at_a_time() {
    let driver = MockDriver::default()
        .with_probe("a", actionable())
        .with_probe("b", actionable())
        .with_probe("c", actionable());
    let (mut engine, _abort) = ReplayEngine::new(driver, config());

    let flow = flow_of(vec![
        step(1, vec![(Strategy::Id, "a")]),
        step(2, vec![(Strategy::Id, "b")]),
        step(3, vec![(Strategy::Id, "c")]),
    ]);

    assert_eq!(engine.state(), ReplayState::Idle);

    let mut outcomes = Vec::new();
    for _ in 0..3 {
        let outcome = engine.step_over(&flow).await.expect("step outcome");
        assert_eq!(engine.state(), ReplayState::Paused);
        outcomes.push(outcome);
    }

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.status == StepStatus::Passed));
    assert_eq!(engine.driver().applied.len(), 3);

    // Flow exhausted
    assert!(engine.step_over(&flow).await.is_none());
    assert_eq!(engine.state(), ReplayState::Paused);
}

#[tokio::test]
async fn step_over_reports_failure_and_leaves_continuation_to_the_caller() {
    let driver = MockDriver::default().with_probe("b", actionable());
    let (mut engine, _abort) = ReplayEngine::new(driver, config());

    let flow = flow_of(vec![
        step(1, vec![(Strategy::Id, "missing")]),
        step(2, vec![(Strategy::Id, "b")]),
    ]);

    let first = engine.step_over(&flow).await.expect("outcome");
    assert_eq!(first.status, StepStatus::Failed);

    // Unlike full-run mode, the caller may keep stepping
    let second = engine.step_over(&flow).await.expect("outcome");
    assert_eq!(second.status, StepStatus::Passed);
}

// =========================================================================
// Abort
// =========================================================================

#[tokio::test]
async fn abort_before_run_executes_nothing() {
    let driver = MockDriver::default().with_probe("a", actionable());
    let (mut engine, abort) = ReplayEngine::new(driver, config());
    abort.abort();

    let flow = flow_of(vec![step(1, vec![(Strategy::Id, "a")])]);
    let report = engine.run(&flow).await;

    assert_eq!(report.total, 0);
    assert!(report.outcomes.is_empty());
    assert_eq!(engine.state(), ReplayState::Idle);
}

#[tokio::test]
async fn abort_interrupts_a_polling_wait() {
    let driver = MockDriver::default();
    let (mut engine, abort) = ReplayEngine::new(driver, config());

    let mut s = step(1, vec![(Strategy::Id, "never-appears")]);
    s.wait.timeout_ms = 30_000;
    let flow = flow_of(vec![s]);

    let run = tokio::spawn(async move { engine.run(&flow).await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    abort.abort();

    let report = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("abort must interrupt the poll loop")
        .expect("run task must not panic");

    assert_eq!(report.total, 0, "aborted step leaves no outcome");
}
