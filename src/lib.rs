// Parlant Widget Core
//
// Headless core of an embeddable chat widget for Parlant-style
// conversational-agent backends. The crate owns the session lifecycle,
// outbound message events, and a long-polling event synchronizer with a
// watermark offset; the embedding shell owns every pixel and feeds through
// the `ChatSink` trait.
//
// Typical wiring:
//
//   let config = WidgetConfig::new("https://chat.example.com", "B6Tepz5r5h");
//   let widget = ChatWidget::new(config, sink)?;
//   widget.activate().await?;         // create session, start polling
//   widget.send("hello").await?;      // echo locally, then POST the event
//   widget.reset().await;             // stop polling, forget the session

pub mod backoff;
pub mod client;
pub mod config;
pub mod error;
pub mod sync;
pub mod transport;
pub mod types;
pub mod widget;

pub use client::SessionClient;
pub use config::{BackoffConfig, WidgetConfig};
pub use error::{WidgetError, WidgetResult};
pub use sync::{ChatSink, EventSynchronizer, STATUS_CONNECTION_ERROR};
pub use transport::{RestTransport, SessionTransport};
pub use types::{EventData, EventKind, EventSource, Session, SessionEvent};
pub use widget::ChatWidget;
