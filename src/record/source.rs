use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::record::event_model::RawInteractionEvent;

/// A live event subscription. Dropping it (or calling `unsubscribe`)
/// detaches the source from the session.
pub trait Subscription: Send {
    fn unsubscribe(&mut self);
}

/// The capture surface as seen by a recording session: something that can
/// be subscribed to for raw interaction events. Handed to the session as
/// an explicit capability, never toggled through ambient hooks.
pub trait CaptureSource: Send {
    fn subscribe(&mut self, sender: mpsc::Sender<RawInteractionEvent>) -> Box<dyn Subscription>;
}

/// Capture source backed by a pre-recorded NDJSON event stream, one
/// `RawInteractionEvent` per line. Used by the CLI and by tests.
pub struct NdjsonCapture {
    events: Vec<RawInteractionEvent>,
}

impl NdjsonCapture {
    /// Parse an NDJSON file. Malformed lines are skipped with a warning;
    /// a bad line never fails the session.
    pub fn load(path: &str) -> std::io::Result<Self> {
        Ok(Self {
            events: load_events(path)?,
        })
    }

    pub fn from_events(events: Vec<RawInteractionEvent>) -> Self {
        Self { events }
    }
}

/// Read an NDJSON event file into memory, skipping malformed lines.
pub fn load_events(path: &str) -> std::io::Result<Vec<RawInteractionEvent>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_events(&content))
}

/// Parse NDJSON content into events, skipping malformed lines.
pub fn parse_events(content: &str) -> Vec<RawInteractionEvent> {
    let mut events = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawInteractionEvent>(line) {
            Ok(event) => events.push(event),
            Err(e) => eprintln!("Warning: skipping malformed event on line {}: {}", lineno + 1, e),
        }
    }
    events
}

impl CaptureSource for NdjsonCapture {
    fn subscribe(&mut self, sender: mpsc::Sender<RawInteractionEvent>) -> Box<dyn Subscription> {
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            for event in events {
                if sender.send(event).await.is_err() {
                    break;
                }
            }
        });
        Box::new(TaskSubscription {
            handle: Some(handle),
        })
    }
}

/// Subscription backed by a forwarding task; unsubscribing aborts it.
pub struct TaskSubscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription for TaskSubscription {
    fn unsubscribe(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for TaskSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
