use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::record::synthesizer::RecordConfig;
use crate::replay::executor::ReplayConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "flow-recorder",
    version,
    about = "Record and replay browser interaction flows with resilient locators"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: flow-recorder.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Write a JSONL trace of record/replay decisions to this path
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize a flow from a captured raw-event stream (NDJSON)
    Record {
        /// Path to the captured event stream, one event per line
        #[arg(long)]
        events: String,

        /// Output path for the flow YAML
        #[arg(short, long, default_value = "flow.yaml")]
        output: String,

        /// Flow name
        #[arg(long, default_value = "Recorded flow")]
        name: String,

        /// URL replay should open before the first step
        #[arg(long)]
        start_url: Option<String>,
    },

    /// Replay a recorded flow against a page bridge
    Replay {
        /// Path to the flow YAML
        #[arg(long)]
        flow: String,

        /// Command line for the page bridge subprocess
        #[arg(long)]
        bridge: Option<String>,

        /// Output file path for the report (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print a flow's steps and their ranked locators
    Inspect {
        /// Path to the flow YAML
        #[arg(long)]
        flow: String,

        /// Also print every locator with its confidence
        #[arg(long)]
        locators: bool,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `flow-recorder.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub record: RecordConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Command line used to launch the page bridge subprocess
    #[serde(default = "default_bridge_command")]
    pub command: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            command: default_bridge_command(),
        }
    }
}

fn default_bridge_command() -> String {
    "node page_bridge.js".to_string()
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("flow-recorder.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}
