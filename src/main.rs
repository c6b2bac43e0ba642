use clap::Parser;
use flow_recorder::cli::commands::{cmd_inspect, cmd_record, cmd_replay};
use flow_recorder::cli::config::{Cli, Commands, load_config};
use flow_recorder::trace::logger::TraceLogger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    let tracer = match cli.trace.as_deref() {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    match cli.command {
        Commands::Record {
            events,
            output,
            name,
            start_url,
        } => {
            cmd_record(
                &events,
                &output,
                &name,
                start_url.as_deref(),
                cli.verbose,
                &config,
                tracer,
            )
            .await?;
        }
        Commands::Replay {
            flow,
            bridge,
            output,
        } => {
            let all_passed = cmd_replay(
                &flow,
                bridge.as_deref(),
                output.as_deref(),
                cli.verbose,
                &config,
                tracer,
            )
            .await?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Inspect { flow, locators } => {
            cmd_inspect(&flow, locators)?;
        }
    }

    Ok(())
}
