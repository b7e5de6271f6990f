// Parlant Widget Core — Event Synchronizer
//
// Long-polls the backend for new session events, delivers agent messages to
// the sink, and advances the watermark offset. The loop runs for the life
// of the session: a failed cycle backs off and retries forever, and a stop
// signal ends the loop at its next iteration boundary.
//
// Invariants:
//   - At most one polling loop per synchronizer (compare-exchange guard).
//   - The watermark is written only by the loop task, once per completed
//     cycle, to max(current, offset + 1) over every parsed event.
//   - No failure terminates the loop; it only delays the next attempt.

use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

use crate::backoff;
use crate::config::{BackoffConfig, WidgetConfig};
use crate::transport::SessionTransport;
use crate::types::{EventKind, SessionEvent};

/// Status line surfaced while the poll loop is retrying.
pub const STATUS_CONNECTION_ERROR: &str = "Connection error - retrying...";

// ── Sink trait ─────────────────────────────────────────────────────────

/// Everything the core reports up to the embedding shell. Implementations
/// are invoked from the polling task and from `ChatWidget::send`, so they
/// must be `Send + Sync` and should return quickly.
pub trait ChatSink: Send + Sync {
    /// An inbound message from the agent side. Customer echoes coming back
    /// through the event stream are never delivered here.
    fn on_agent_message(&self, text: &str, source: &str);

    /// The customer's own message, echoed optimistically before the send.
    fn on_customer_message(&self, text: &str);

    /// Connectivity / lifecycle status text. An empty string clears the
    /// status line.
    fn on_status(&self, text: &str);
}

// ── Synchronizer ───────────────────────────────────────────────────────

/// State shared between the synchronizer handle and its polling task.
struct SyncShared {
    running: AtomicBool,
    stop: AtomicBool,
    last_offset: AtomicU64,
}

pub struct EventSynchronizer {
    transport: Arc<dyn SessionTransport>,
    sink: Arc<dyn ChatSink>,
    wait_for_data_secs: u64,
    backoff: BackoffConfig,
    shared: Arc<SyncShared>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl EventSynchronizer {
    pub fn new(
        transport: Arc<dyn SessionTransport>,
        sink: Arc<dyn ChatSink>,
        config: &WidgetConfig,
    ) -> Self {
        EventSynchronizer {
            transport,
            sink,
            wait_for_data_secs: config.wait_for_data_secs,
            backoff: config.backoff.clone(),
            shared: Arc::new(SyncShared {
                running: AtomicBool::new(false),
                stop: AtomicBool::new(false),
                last_offset: AtomicU64::new(0),
            }),
            handle: Mutex::new(None),
        }
    }

    /// Whether a polling loop is currently active.
    pub fn is_polling(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// The smallest offset not yet observed.
    pub fn last_offset(&self) -> u64 {
        self.shared.last_offset.load(Ordering::SeqCst)
    }

    /// Start the polling loop for `session_id`. Idempotent: if a loop is
    /// already active on this synchronizer the call is a no-op and returns
    /// `false`. The watermark carries over across stop/start cycles.
    pub fn start(&self, session_id: impl Into<String>) -> bool {
        if self
            .shared
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("[sync] Poll loop already running — ignoring start");
            return false;
        }
        self.shared.stop.store(false, Ordering::SeqCst);

        let session_id = session_id.into();
        let transport = Arc::clone(&self.transport);
        let sink = Arc::clone(&self.sink);
        let shared = Arc::clone(&self.shared);
        let wait_for_data_secs = self.wait_for_data_secs;
        let backoff_config = self.backoff.clone();

        info!("[sync] Starting poll loop for session {}", session_id);
        let handle = tokio::spawn(async move {
            run_poll_loop(
                transport,
                sink,
                Arc::clone(&shared),
                session_id,
                wait_for_data_secs,
                backoff_config,
            )
            .await;
            shared.running.store(false, Ordering::SeqCst);
            info!("[sync] Poll loop stopped");
        });
        *self.handle.lock().unwrap() = Some(handle);
        true
    }

    /// Signal the loop to exit at its next iteration boundary. A poll
    /// already in flight is allowed to finish.
    pub fn stop(&self) {
        self.shared.stop.store(true, Ordering::SeqCst);
        debug!("[sync] Stop signal sent");
    }

    /// Stop and wait for the loop task to finish (widget teardown).
    pub async fn shutdown(&self) {
        self.stop();
        let handle = self.handle.lock().unwrap().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

// ── Poll loop ──────────────────────────────────────────────────────────

async fn run_poll_loop(
    transport: Arc<dyn SessionTransport>,
    sink: Arc<dyn ChatSink>,
    shared: Arc<SyncShared>,
    session_id: String,
    wait_for_data_secs: u64,
    backoff_config: BackoffConfig,
) {
    let mut attempt: u32 = 0;
    loop {
        if shared.stop.load(Ordering::SeqCst) {
            debug!("[sync] Stop signal observed — exiting poll loop");
            break;
        }

        let min_offset = shared.last_offset.load(Ordering::SeqCst);
        match transport
            .fetch_events(&session_id, min_offset, wait_for_data_secs)
            .await
        {
            Ok(events) => {
                if !events.is_empty() {
                    process_batch(&events, sink.as_ref(), &shared);
                }
                // Clear the status line once something arrived or after a
                // recovered outage.
                if !events.is_empty() || attempt > 0 {
                    sink.on_status("");
                }
                attempt = 0;
                // No inter-request delay: the long-poll itself is the wait.
            }
            Err(e) => {
                warn!("[sync] Poll cycle failed: {} — retrying", e);
                sink.on_status(STATUS_CONNECTION_ERROR);
                let delay = backoff::delay_for_attempt(&backoff_config, attempt);
                attempt = attempt.saturating_add(1);
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Deliver agent messages in batch order and advance the watermark.
fn process_batch(events: &[SessionEvent], sink: &dyn ChatSink, shared: &SyncShared) {
    let mut watermark = shared.last_offset.load(Ordering::SeqCst);
    for event in events {
        if event.kind == EventKind::Message && !event.source.is_customer() {
            if let Some(text) = event.message_text() {
                sink.on_agent_message(text, event.source.as_str());
            }
        }
        // Batches are not guaranteed sorted; take the max over all offsets.
        watermark = watermark.max(event.offset + 1);
    }
    shared.last_offset.store(watermark, Ordering::SeqCst);
}
