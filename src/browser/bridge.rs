use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crate::locator::locator_model::Locator;
use crate::replay::page::{ActionCommand, DriverError, ElementProbe, PageDriver, PageWait};

/// Request sent to the page bridge over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum BridgeRequest<'a> {
    Probe { locator: &'a Locator },
    Apply { command: &'a ActionCommand },
    Navigate { url: &'a str },
    WaitPage { wait: &'a PageWait },
    Quit,
}

/// Response received from the page bridge over stdout (one JSON line).
#[derive(Debug, Deserialize)]
struct BridgeResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    probe: Option<ElementProbe>,
    #[serde(default)]
    ready: Option<bool>,
}

/// A persistent page-execution bridge: a long-lived helper process that
/// keeps a browser page open and executes probe/action scripts against
/// it. Requests go out as NDJSON on stdin, responses come back on
/// stdout. This crate decides what to run; the bridge owns the browser.
pub struct PageBridge {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
}

impl PageBridge {
    /// Spawn the bridge process and wait for its ready signal.
    pub async fn launch(command_line: &str) -> Result<Self, DriverError> {
        let mut parts = command_line.split_whitespace();
        let program = parts.next().ok_or_else(|| DriverError::Protocol {
            command: "launch".into(),
            message: "empty bridge command".into(),
        })?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DriverError::Spawn {
                command: command_line.to_string(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| DriverError::Protocol {
            command: "launch".into(),
            message: "failed to capture bridge stdin".into(),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| DriverError::Protocol {
            command: "launch".into(),
            message: "failed to capture bridge stdout".into(),
        })?;

        let mut bridge = PageBridge {
            child,
            stdin,
            reader: BufReader::new(stdout),
        };

        let ready = bridge.read_response("launch").await?;
        if !ready.ok || ready.ready != Some(true) {
            return Err(DriverError::Protocol {
                command: "launch".into(),
                message: "did not receive ready signal from page bridge".into(),
            });
        }

        Ok(bridge)
    }

    /// Send a request and read the matching response line.
    async fn send(
        &mut self,
        request: &BridgeRequest<'_>,
        command_name: &str,
    ) -> Result<BridgeResponse, DriverError> {
        let json = serde_json::to_string(request).map_err(|e| DriverError::Json {
            context: "bridge request".into(),
            source: e,
        })?;

        self.stdin.write_all(json.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;

        let response = self.read_response(command_name).await?;
        if !response.ok {
            return Err(DriverError::Protocol {
                command: command_name.to_string(),
                message: response
                    .error
                    .unwrap_or_else(|| "unknown bridge error".into()),
            });
        }
        Ok(response)
    }

    async fn read_response(&mut self, command_name: &str) -> Result<BridgeResponse, DriverError> {
        let mut line = String::new();
        self.reader.read_line(&mut line).await?;

        if line.trim().is_empty() {
            return Err(DriverError::Protocol {
                command: command_name.to_string(),
                message: "empty response from page bridge (process may have died)".into(),
            });
        }

        serde_json::from_str(line.trim()).map_err(|e| DriverError::Json {
            context: "bridge response".into(),
            source: e,
        })
    }

    /// Ask the bridge to shut down. Best-effort; the child is also killed
    /// on drop.
    pub async fn quit(mut self) {
        let _ = self.send(&BridgeRequest::Quit, "quit").await;
        let _ = self.child.wait().await;
    }
}

#[async_trait]
impl PageDriver for PageBridge {
    async fn probe(&mut self, locator: &Locator) -> Result<ElementProbe, DriverError> {
        let response = self.send(&BridgeRequest::Probe { locator }, "probe").await?;
        Ok(response.probe.unwrap_or_default())
    }

    async fn apply(&mut self, command: &ActionCommand) -> Result<(), DriverError> {
        self.send(&BridgeRequest::Apply { command }, "apply")
            .await
            .map_err(|e| match e {
                // A failed dispatch is an action error, not a transport one
                DriverError::Protocol { message, .. } => DriverError::Action(message),
                other => other,
            })?;
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.send(&BridgeRequest::Navigate { url }, "navigate").await?;
        Ok(())
    }

    async fn wait_page(&mut self, wait: &PageWait) -> Result<(), DriverError> {
        self.send(&BridgeRequest::WaitPage { wait }, "wait_page").await?;
        Ok(())
    }
}
