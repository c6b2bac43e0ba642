use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::flow::step_model::{Step, WaitCondition};
use crate::locator::locator_model::Locator;
use crate::replay::executor::ReplayConfig;
use crate::replay::page::{ElementProbe, PageDriver};
use crate::replay::replay_model::LocatorFailure;

/// Result of walking a step's ranked locator list against the live page.
#[derive(Debug)]
pub enum ResolveOutcome {
    Resolved {
        locator: Locator,
        probe: ElementProbe,
        /// Locators attempted before the winner.
        failures: Vec<LocatorFailure>,
        fallback_used: bool,
    },
    NotFound {
        failures: Vec<LocatorFailure>,
    },
    Aborted,
}

/// Try each locator in ranked order, polling until the step's wait
/// condition holds or its timeout elapses. Every candidate gets at least
/// one probe; the abort signal is honored at every poll iteration.
pub async fn resolve_step<D: PageDriver + ?Sized>(
    driver: &mut D,
    step: &Step,
    config: &ReplayConfig,
    abort: &watch::Receiver<bool>,
) -> ResolveOutcome {
    let mut failures = Vec::new();
    let poll = Duration::from_millis(config.poll_interval_ms);

    for (rank_index, locator) in step.locators.iter().enumerate() {
        let deadline = Instant::now() + Duration::from_millis(step.wait.timeout_ms);
        let mut reason;

        loop {
            if *abort.borrow() {
                return ResolveOutcome::Aborted;
            }

            match driver.probe(locator).await {
                Ok(probe) => {
                    if condition_met(step.wait.condition, &probe) {
                        return ResolveOutcome::Resolved {
                            locator: locator.clone(),
                            probe,
                            failures,
                            fallback_used: rank_index > 0,
                        };
                    }
                    reason = unmet_reason(step.wait.condition, &probe, step.wait.timeout_ms);
                }
                Err(e) => {
                    // Transport-level failure: give up on this candidate
                    reason = e.to_string();
                    break;
                }
            }

            if Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep(poll).await;
        }

        failures.push(LocatorFailure {
            locator: locator.clone(),
            error: reason,
        });
    }

    ResolveOutcome::NotFound { failures }
}

/// Element-level wait-condition semantics. The page-level kinds degrade
/// to presence here; their real wait runs after the action is applied.
pub fn condition_met(condition: WaitCondition, probe: &ElementProbe) -> bool {
    match condition {
        WaitCondition::Present => probe.found,
        WaitCondition::Visible => probe.found && probe.visible,
        WaitCondition::Clickable => probe.found && probe.visible && probe.enabled,
        WaitCondition::NetworkIdle | WaitCondition::Navigation => probe.found,
    }
}

fn unmet_reason(condition: WaitCondition, probe: &ElementProbe, timeout_ms: u64) -> String {
    if !probe.found {
        return format!("no match within {}ms", timeout_ms);
    }
    match condition {
        WaitCondition::Visible => format!("matched but not visible within {}ms", timeout_ms),
        WaitCondition::Clickable => {
            if probe.visible {
                format!("matched but disabled within {}ms", timeout_ms)
            } else {
                format!("matched but not visible within {}ms", timeout_ms)
            }
        }
        _ => format!("condition not met within {}ms", timeout_ms),
    }
}
