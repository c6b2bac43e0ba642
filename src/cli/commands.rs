use crate::browser::bridge::PageBridge;
use crate::cli::config::AppConfig;
use crate::flow::flow_model::Flow;
use crate::record::session::RecordingSession;
use crate::record::source::load_events;
use crate::replay::executor::ReplayEngine;
use crate::report::console::format_run_report;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

// ============================================================================
// record subcommand
// ============================================================================

/// Read a captured event stream and synthesize it into a flow file.
pub async fn cmd_record(
    events_path: &str,
    output: &str,
    name: &str,
    start_url: Option<&str>,
    verbose: u8,
    config: &AppConfig,
    tracer: TraceLogger,
) -> Result<(), Box<dyn std::error::Error>> {
    let events = load_events(events_path)?;
    if verbose > 0 {
        eprintln!("Loaded {} events from {}", events.len(), events_path);
    }

    let mut flow = Flow::new(name);
    if let Some(url) = start_url {
        flow = flow.with_start_url(url);
    }

    // The CLI is the capture surface here: it delivers the historical
    // stream over the session channel in original order.
    let handle = RecordingSession::spawn(flow, config.record.clone(), tracer, None);
    for event in events {
        handle.deliver(event).await;
    }
    let flow = handle
        .stop()
        .await
        .ok_or("recording session ended unexpectedly")?;

    flow.save(output)?;
    println!("Wrote {} steps to {}", flow.steps.len(), output);
    Ok(())
}

// ============================================================================
// replay subcommand
// ============================================================================

/// Replay a flow and return whether every step passed.
pub async fn cmd_replay(
    flow_path: &str,
    bridge_override: Option<&str>,
    output: Option<&str>,
    verbose: u8,
    config: &AppConfig,
    tracer: TraceLogger,
) -> Result<bool, Box<dyn std::error::Error>> {
    let flow = Flow::load(flow_path)?;
    let total_steps = flow.steps.len();

    let bridge_command = bridge_override.unwrap_or(config.bridge.command.as_str());
    if verbose > 0 {
        eprintln!("Launching page bridge: {}", bridge_command);
        eprintln!("Replaying '{}' ({} steps)...", flow.name, total_steps);
    }

    let bridge = PageBridge::launch(bridge_command).await?;
    let (mut engine, abort) = ReplayEngine::new(bridge, config.replay.clone());

    // Ctrl-C requests a cooperative stop at the next poll iteration
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            abort.abort();
        }
    });

    let report = engine.run(&flow).await;
    engine.into_driver().quit().await;

    for outcome in &report.outcomes {
        let mut event = TraceEvent::replay(outcome.order)
            .with_status(format!("{:?}", outcome.status))
            .with_fallback(outcome.diagnostics.fallback_used)
            .with_duration(outcome.diagnostics.duration_ms);
        if let Some(locator) = &outcome.diagnostics.locator_used {
            event = event.with_locator(format!(
                "{}={}",
                locator.strategy.label(),
                locator.value
            ));
        }
        tracer.log(&event);
    }

    let content = format_run_report(&report, total_steps);
    match output {
        Some(path) => std::fs::write(path, &content)?,
        None => print!("{}", content),
    }

    Ok(report.all_passed())
}

// ============================================================================
// inspect subcommand
// ============================================================================

/// Print a flow's steps, optionally with every ranked locator.
pub fn cmd_inspect(
    flow_path: &str,
    show_locators: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let flow = Flow::load(flow_path)?;

    println!("Flow: {} ({} steps)", flow.name, flow.steps.len());
    if let Some(url) = &flow.start_url {
        println!("Start URL: {}", url);
    }

    for step in &flow.steps {
        let enabled_marker = if step.enabled { " " } else { "x" };
        println!(
            "{} {:>3}. [{:?}] {}  (wait: {:?} {}ms)",
            enabled_marker,
            step.order,
            step.intent,
            step.description,
            step.wait.condition,
            step.wait.timeout_ms
        );

        if show_locators {
            for locator in &step.locators {
                println!(
                    "        {:.2} {:<11} {}",
                    locator.confidence,
                    locator.strategy.label(),
                    locator.value
                );
            }
        }
    }

    Ok(())
}
