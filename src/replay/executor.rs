use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::flow::flow_model::Flow;
use crate::flow::step_model::{IntentKind, Step, WaitCondition};
use crate::replay::actions::command_for;
use crate::replay::page::{PageDriver, PageWait};
use crate::replay::replay_model::{
    ReplayDiagnostics, ReplayState, StepOutcome, StepStatus,
};
use crate::replay::resolver::{resolve_step, ResolveOutcome};
use crate::report::report_model::RunReport;

/// Replay-side tunables, loadable from the app config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Interval between wait-condition probes.
    #[serde(default = "default_poll")]
    pub poll_interval_ms: u64,

    /// Fixed delay applied when a navigation step carries no page-level
    /// wait kind.
    #[serde(default = "default_settle")]
    pub settle_delay_ms: u64,

    /// Network-idle timeout when opening the flow's start URL.
    #[serde(default = "default_start_wait")]
    pub start_wait_timeout_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        ReplayConfig {
            poll_interval_ms: 200,
            settle_delay_ms: 1_000,
            start_wait_timeout_ms: 10_000,
        }
    }
}

fn default_poll() -> u64 {
    200
}
fn default_settle() -> u64 {
    1_000
}
fn default_start_wait() -> u64 {
    10_000
}

/// Requests a cooperative stop: replay abandons remaining steps at the
/// next poll iteration or step boundary. Never fails.
pub struct AbortHandle {
    tx: watch::Sender<bool>,
}

impl AbortHandle {
    pub fn abort(&self) {
        // ignore send error: the engine may already be gone
        let _ = self.tx.send(true);
    }
}

/// Executes a stored flow against a page driver, one step at a time.
///
/// Steps never run concurrently; each depends on DOM state the previous
/// one may have mutated. The only suspension point while playing is the
/// resolver's poll sleep.
pub struct ReplayEngine<D: PageDriver> {
    driver: D,
    config: ReplayConfig,
    state: ReplayState,
    cursor: usize,
    abort_rx: watch::Receiver<bool>,
}

impl<D: PageDriver> ReplayEngine<D> {
    pub fn new(driver: D, config: ReplayConfig) -> (Self, AbortHandle) {
        let (tx, rx) = watch::channel(false);
        (
            ReplayEngine {
                driver,
                config,
                state: ReplayState::Idle,
                cursor: 0,
                abort_rx: rx,
            },
            AbortHandle { tx },
        )
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Hand the driver back, e.g. to shut a bridge down cleanly.
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Reset the single-step cursor to the first step.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    fn aborted(&self) -> bool {
        *self.abort_rx.borrow()
    }

    /// Autonomous full run: `idle → playing → idle`.
    ///
    /// Fail-fast: the first failed step halts the remainder, since later
    /// steps would operate on an unverified page state. Abort stops the
    /// run silently.
    pub async fn run(&mut self, flow: &Flow) -> RunReport {
        self.state = ReplayState::Playing;
        let started = Instant::now();
        let mut outcomes = Vec::new();
        let mut run_error = None;
        let mut halted = false;

        if let Some(url) = &flow.start_url {
            if let Err(e) = self.open_start(url).await {
                self.state = ReplayState::Idle;
                return RunReport::from_outcomes(&flow.name, outcomes)
                    .with_duration(started.elapsed().as_millis() as u64)
                    .with_error(format!("failed to open start url: {}", e));
            }
        }

        for step in &flow.steps {
            if self.aborted() {
                break;
            }
            if !step.enabled {
                outcomes.push(StepOutcome::skipped(step));
                continue;
            }

            match self.execute_step(step).await {
                Some(outcome) => {
                    let failed = outcome.status == StepStatus::Failed;
                    if failed {
                        run_error = outcome.error.clone();
                    }
                    outcomes.push(outcome);
                    if failed {
                        halted = true;
                        break;
                    }
                }
                // Aborted mid-step
                None => break,
            }
        }

        self.state = ReplayState::Idle;
        let mut report = RunReport::from_outcomes(&flow.name, outcomes)
            .with_duration(started.elapsed().as_millis() as u64)
            .with_halted(halted);
        if let Some(error) = run_error {
            report = report.with_error(error);
        }
        report
    }

    /// Manual single-step: `idle/paused → stepping → paused`.
    ///
    /// Executes the step at the cursor and advances it. Returns `None`
    /// when the flow is exhausted or the run was aborted; after a failed
    /// step the caller decides whether to keep stepping.
    pub async fn step_over(&mut self, flow: &Flow) -> Option<StepOutcome> {
        if self.cursor >= flow.steps.len() {
            self.state = ReplayState::Paused;
            return None;
        }
        if self.aborted() {
            self.state = ReplayState::Idle;
            return None;
        }

        self.state = ReplayState::Stepping;
        let step = &flow.steps[self.cursor];
        self.cursor += 1;

        let outcome = if step.enabled {
            self.execute_step(step).await
        } else {
            Some(StepOutcome::skipped(step))
        };

        self.state = match outcome {
            Some(_) => ReplayState::Paused,
            // Aborted mid-step
            None => ReplayState::Idle,
        };
        outcome
    }

    async fn open_start(&mut self, url: &str) -> Result<(), crate::replay::page::DriverError> {
        self.driver.navigate(url).await?;
        self.driver
            .wait_page(&PageWait::NetworkIdle {
                timeout_ms: self.config.start_wait_timeout_ms,
            })
            .await
    }

    /// Execute one enabled step. `None` means the abort signal fired
    /// during resolution.
    async fn execute_step(&mut self, step: &Step) -> Option<StepOutcome> {
        let started = Instant::now();

        if step.intent == IntentKind::Navigate {
            return Some(self.execute_navigation(step, started).await);
        }

        match resolve_step(&mut self.driver, step, &self.config, &self.abort_rx).await {
            ResolveOutcome::Aborted => None,

            ResolveOutcome::NotFound { failures } => {
                let diagnostics = ReplayDiagnostics {
                    locator_used: None,
                    failures,
                    fallback_used: false,
                    duration_ms: started.elapsed().as_millis() as u64,
                };
                Some(StepOutcome::failed(
                    step,
                    "element not found with any locator",
                    diagnostics,
                ))
            }

            ResolveOutcome::Resolved {
                locator,
                probe,
                failures,
                fallback_used,
            } => {
                let mut diagnostics = ReplayDiagnostics {
                    locator_used: Some(locator.clone()),
                    failures,
                    fallback_used,
                    duration_ms: 0,
                };

                let result = match command_for(step, &locator, &probe) {
                    // Page already matches the recorded state
                    None => Ok(()),
                    Some(command) => self.driver.apply(&command).await,
                };

                let outcome = match result {
                    Ok(()) => {
                        // Page-level waits run after the triggering action
                        if let Err(e) = self.after_action_wait(step).await {
                            diagnostics.duration_ms = started.elapsed().as_millis() as u64;
                            return Some(StepOutcome::failed(step, e, diagnostics));
                        }
                        diagnostics.duration_ms = started.elapsed().as_millis() as u64;
                        StepOutcome::passed(step, diagnostics)
                    }
                    Err(e) => {
                        diagnostics.duration_ms = started.elapsed().as_millis() as u64;
                        StepOutcome::failed(step, e, diagnostics)
                    }
                };
                Some(outcome)
            }
        }
    }

    /// Navigation steps skip locator resolution entirely.
    async fn execute_navigation(&mut self, step: &Step, started: Instant) -> StepOutcome {
        let mut diagnostics = ReplayDiagnostics::empty();

        if let Some(url) = step.test_data.value.as_text().filter(|u| !u.is_empty()) {
            if let Err(e) = self.driver.navigate(url).await {
                diagnostics.duration_ms = started.elapsed().as_millis() as u64;
                return StepOutcome::failed(step, e, diagnostics);
            }
        }

        let wait = self.page_wait_for(step);
        let outcome = match self.driver.wait_page(&wait).await {
            Ok(()) => {
                diagnostics.duration_ms = started.elapsed().as_millis() as u64;
                StepOutcome::passed(step, diagnostics)
            }
            Err(e) => {
                diagnostics.duration_ms = started.elapsed().as_millis() as u64;
                StepOutcome::failed(step, e, diagnostics)
            }
        };
        outcome
    }

    async fn after_action_wait(
        &mut self,
        step: &Step,
    ) -> Result<(), crate::replay::page::DriverError> {
        match step.wait.condition {
            WaitCondition::Navigation | WaitCondition::NetworkIdle => {
                let wait = self.page_wait_for(step);
                self.driver.wait_page(&wait).await
            }
            _ => Ok(()),
        }
    }

    fn page_wait_for(&self, step: &Step) -> PageWait {
        match step.wait.condition {
            WaitCondition::NetworkIdle => PageWait::NetworkIdle {
                timeout_ms: step.wait.timeout_ms,
            },
            WaitCondition::Navigation => PageWait::Navigation {
                timeout_ms: step.wait.timeout_ms,
            },
            _ => PageWait::Settle {
                delay_ms: self.config.settle_delay_ms,
            },
        }
    }
}
