// Parlant Widget Core — Widget Facade
//
// Ties config, session client, and event synchronizer into the lifecycle an
// embedding shell drives: activate → send* → reset. The shell owns all
// rendering; everything visible flows back through the `ChatSink`.

use log::{error, warn};
use std::sync::{Arc, Mutex};

use crate::client::SessionClient;
use crate::config::WidgetConfig;
use crate::error::WidgetResult;
use crate::sync::{ChatSink, EventSynchronizer};
use crate::transport::{RestTransport, SessionTransport};

// Status lines shown in the widget header.
pub const STATUS_STARTING: &str = "Starting chat session...";
pub const STATUS_READY: &str = "Chat ready!";
pub const STATUS_START_FAILED: &str = "Failed to start chat. Please refresh the page.";
pub const STATUS_SEND_FAILED: &str = "Failed to send message";

pub struct ChatWidget {
    client: SessionClient,
    synchronizer: EventSynchronizer,
    sink: Arc<dyn ChatSink>,
    session_id: Mutex<Option<String>>,
}

impl ChatWidget {
    /// Build a widget over the raw REST transport.
    pub fn new(config: WidgetConfig, sink: Arc<dyn ChatSink>) -> WidgetResult<Self> {
        config.validate()?;
        let transport: Arc<dyn SessionTransport> = Arc::new(RestTransport::new(&config)?);
        Ok(Self::with_transport(config, transport, sink))
    }

    /// Build a widget over a caller-supplied transport (an SDK wrapper, a
    /// test double, ...).
    pub fn with_transport(
        config: WidgetConfig,
        transport: Arc<dyn SessionTransport>,
        sink: Arc<dyn ChatSink>,
    ) -> Self {
        let client = SessionClient::new(Arc::clone(&transport), config.agent_id.clone());
        let synchronizer = EventSynchronizer::new(transport, Arc::clone(&sink), &config);
        ChatWidget {
            client,
            synchronizer,
            sink,
            session_id: Mutex::new(None),
        }
    }

    /// The active session id, if the widget has been activated.
    pub fn session_id(&self) -> Option<String> {
        self.session_id.lock().unwrap().clone()
    }

    /// Whether the event synchronizer is currently polling.
    pub fn is_polling(&self) -> bool {
        self.synchronizer.is_polling()
    }

    /// Create the backend session and start polling for events. A second
    /// activation while a session exists is a no-op.
    pub async fn activate(&self) -> WidgetResult<()> {
        if self.session_id.lock().unwrap().is_some() {
            warn!("[widget] Already active — ignoring activate");
            return Ok(());
        }

        self.sink.on_status(STATUS_STARTING);
        let session = match self.client.create_session(None).await {
            Ok(session) => session,
            Err(e) => {
                error!("[widget] Session creation failed: {}", e);
                self.sink.on_status(STATUS_START_FAILED);
                return Err(e);
            }
        };

        *self.session_id.lock().unwrap() = Some(session.id.clone());
        self.sink.on_status(STATUS_READY);
        self.synchronizer.start(session.id);
        Ok(())
    }

    /// Echo the customer bubble, then submit the message. Blank input and
    /// sends before activation are no-ops.
    pub async fn send(&self, text: &str) -> WidgetResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        let session_id = match self.session_id.lock().unwrap().clone() {
            Some(id) => id,
            None => {
                warn!("[widget] send called before activation — ignoring");
                return Ok(());
            }
        };

        // Render before the remote call so the bubble appears immediately,
        // even if the send then fails.
        self.sink.on_customer_message(text);
        if let Err(e) = self.client.send_message(&session_id, text).await {
            error!("[widget] Send failed: {}", e);
            self.sink.on_status(STATUS_SEND_FAILED);
            return Err(e);
        }
        Ok(())
    }

    /// Tear down: stop polling and forget the session. The backend session
    /// itself is left to expire server-side.
    pub async fn reset(&self) {
        self.session_id.lock().unwrap().take();
        self.synchronizer.shutdown().await;
    }
}
