use crate::replay::replay_model::StepStatus;
use crate::report::report_model::RunReport;

// ============================================================================
// Console reporter — formatted terminal output for a replay run
// ============================================================================

/// Format a run report for terminal output.
///
/// Produces output like:
/// ```text
/// === Replay: Login flow ===
///
/// ✓ PASS  1. Type "alice" into 'Email'  [name=email]
/// ✓ PASS  2. Click 'Sign in'  [fallback: id=submit-btn]
///     [MISS] css 'button.btn-old' — no match within 5000ms
/// ✗ FAIL  3. Click 'Dashboard'
///     [ERROR] element not found with any locator
///
/// === Results: 2 passed, 1 failed (3 of 4 steps) in 2.3s ===
/// ```
pub fn format_run_report(report: &RunReport, total_steps: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Replay: {} ===\n\n", report.flow_name));

    for outcome in &report.outcomes {
        let marker = match outcome.status {
            StepStatus::Passed => "\u{2713} PASS",
            StepStatus::Failed => "\u{2717} FAIL",
            StepStatus::Skipped => "- SKIP",
        };

        let locator_note = match &outcome.diagnostics.locator_used {
            Some(locator) if outcome.diagnostics.fallback_used => {
                format!("  [fallback: {}={}]", locator.strategy.label(), locator.value)
            }
            Some(locator) => format!("  [{}={}]", locator.strategy.label(), locator.value),
            None => String::new(),
        };

        out.push_str(&format!(
            "{}  {}. {}{}\n",
            marker, outcome.order, outcome.description, locator_note
        ));

        // Every locator that failed before the step resolved (or didn't)
        for failure in &outcome.diagnostics.failures {
            out.push_str(&format!(
                "    [MISS] {} '{}' — {}\n",
                failure.locator.strategy.label(),
                failure.locator.value,
                failure.error
            ));
        }

        if let Some(ref error) = outcome.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }
    }

    if let Some(ref error) = report.error {
        if report.outcomes.is_empty() {
            out.push_str(&format!("[ERROR] {}\n", error));
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed",
        report.passed, report.failed
    ));
    if report.skipped > 0 {
        out.push_str(&format!(", {} skipped", report.skipped));
    }
    out.push_str(&format!(" ({} of {} steps)", report.total, total_steps));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    if report.halted {
        out.push_str("Run halted at first failure; later steps were not executed.\n");
    }

    out
}
