use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::element::identity::element_key;
use crate::flow::flow_model::Flow;
use crate::record::event_model::{ActionKind, RawInteractionEvent};
use crate::record::source::{CaptureSource, Subscription};
use crate::record::synthesizer::{RecordConfig, Synthesizer};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

/// Messages crossing the capture boundary. Event delivery is one-way;
/// control operations are request/response.
enum SessionMessage {
    Event(RawInteractionEvent),
    /// A pending-click window expired without a follow-up edit.
    FlushPending { key: String },
    Pause(oneshot::Sender<()>),
    Resume(oneshot::Sender<()>),
    Stop(oneshot::Sender<Flow>),
}

/// Owns the expiry timers for buffered text clicks. Each armed key has
/// one sleep task that posts a flush message back into the session
/// channel; cancelling aborts the task. The capture side never waits
/// synchronously.
struct Coalescer {
    timers: HashMap<String, JoinHandle<()>>,
}

impl Coalescer {
    fn new() -> Self {
        Coalescer {
            timers: HashMap::new(),
        }
    }

    fn arm(&mut self, tx: mpsc::Sender<SessionMessage>, key: String, delay: Duration) {
        self.cancel(&key);
        let flush_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(SessionMessage::FlushPending { key: flush_key }).await;
        });
        self.timers.insert(key, handle);
    }

    fn cancel(&mut self, key: &str) {
        if let Some(handle) = self.timers.remove(key) {
            handle.abort();
        }
    }

    fn cancel_all(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

/// Client half of a recording session.
#[derive(Clone)]
pub struct RecorderHandle {
    tx: mpsc::Sender<SessionMessage>,
}

impl RecorderHandle {
    /// Deliver one raw event (one-way). Returns false once the session is
    /// gone.
    pub async fn deliver(&self, event: RawInteractionEvent) -> bool {
        self.tx.send(SessionMessage::Event(event)).await.is_ok()
    }

    /// Suspend step synthesis; delivered events are dropped until resume.
    pub async fn pause(&self) -> bool {
        self.roundtrip(SessionMessage::Pause).await
    }

    pub async fn resume(&self) -> bool {
        self.roundtrip(SessionMessage::Resume).await
    }

    /// Stop recording: detaches the capture subscription, flushes still-
    /// buffered clicks into steps, and returns the finished flow.
    pub async fn stop(self) -> Option<Flow> {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(SessionMessage::Stop(reply_tx)).await.is_err() {
            return None;
        }
        reply_rx.await.ok()
    }

    async fn roundtrip(
        &self,
        make: impl FnOnce(oneshot::Sender<()>) -> SessionMessage,
    ) -> bool {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(make(reply_tx)).await.is_err() {
            return false;
        }
        reply_rx.await.is_ok()
    }
}

/// One recording session: a spawned task owning the synthesizer, its
/// dedup state, and the capture subscription. Constructed per session;
/// there is no process-wide recorder state.
pub struct RecordingSession;

impl RecordingSession {
    /// Spawn the session task. When a capture source is given, the
    /// session subscribes to it and owns the subscription until stop.
    pub fn spawn(
        flow: Flow,
        config: RecordConfig,
        tracer: TraceLogger,
        source: Option<&mut dyn CaptureSource>,
    ) -> RecorderHandle {
        let (tx, rx) = mpsc::channel(256);

        let subscription = source.map(|source| {
            let (event_tx, mut event_rx) = mpsc::channel::<RawInteractionEvent>(256);
            let subscription = source.subscribe(event_tx);
            let forward_tx = tx.clone();
            tokio::spawn(async move {
                while let Some(event) = event_rx.recv().await {
                    if forward_tx.send(SessionMessage::Event(event)).await.is_err() {
                        break;
                    }
                }
            });
            subscription
        });

        tokio::spawn(session_loop(rx, tx.clone(), flow, config, tracer, subscription));
        RecorderHandle { tx }
    }
}

async fn session_loop(
    mut rx: mpsc::Receiver<SessionMessage>,
    tx: mpsc::Sender<SessionMessage>,
    flow: Flow,
    config: RecordConfig,
    tracer: TraceLogger,
    mut subscription: Option<Box<dyn Subscription>>,
) {
    let window = Duration::from_millis(config.dedup_window_ms);
    let mut synthesizer = Synthesizer::new(flow, &config);
    let mut coalescer = Coalescer::new();
    let mut paused = false;

    while let Some(message) = rx.recv().await {
        match message {
            SessionMessage::Event(event) => {
                let key = element_key(&event.element);
                let action = event.action;

                if paused {
                    tracer.log(
                        &TraceEvent::record(format!("{:?}", action), &key)
                            .with_decision("dropped")
                            .with_suppression("session paused"),
                    );
                    continue;
                }

                let pending_before = synthesizer.pending_keys();
                let steps = synthesizer.process(event);
                let pending_after = synthesizer.pending_keys();

                // Arm the expiry timer for a freshly (re)buffered click;
                // cancel timers whose pending entry was consumed.
                if action == ActionKind::Click && pending_after.iter().any(|k| *k == key) {
                    coalescer.arm(tx.clone(), key.clone(), window);
                }
                for stale in pending_before
                    .iter()
                    .filter(|k| !pending_after.contains(*k))
                {
                    coalescer.cancel(stale);
                }

                if steps.is_empty() {
                    let decision = if pending_after.iter().any(|k| *k == key) {
                        "buffered"
                    } else {
                        "suppressed"
                    };
                    tracer.log(
                        &TraceEvent::record(format!("{:?}", action), &key)
                            .with_decision(decision),
                    );
                } else {
                    for step in &steps {
                        tracer.log(
                            &TraceEvent::record(format!("{:?}", action), &key)
                                .with_decision("committed")
                                .with_step(step.order),
                        );
                    }
                }
            }

            SessionMessage::FlushPending { key } => {
                coalescer.cancel(&key);
                if let Some(step) = synthesizer.flush_pending(&key) {
                    tracer.log(
                        &TraceEvent::record("click", &key)
                            .with_decision("flushed")
                            .with_step(step.order),
                    );
                }
            }

            SessionMessage::Pause(reply) => {
                paused = true;
                let _ = reply.send(());
            }

            SessionMessage::Resume(reply) => {
                paused = false;
                let _ = reply.send(());
            }

            SessionMessage::Stop(reply) => {
                if let Some(mut subscription) = subscription.take() {
                    subscription.unsubscribe();
                }
                coalescer.cancel_all();
                for step in synthesizer.flush_all() {
                    tracer.log(
                        &TraceEvent::record("click", "pending")
                            .with_decision("flushed")
                            .with_step(step.order),
                    );
                }
                let _ = reply.send(synthesizer.into_store());
                break;
            }
        }
    }
}
