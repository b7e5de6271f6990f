// Parlant Widget Core — Session Client
//
// Establishes the conversation session and submits outbound customer
// messages. No retry lives here: the caller decides whether to re-invoke,
// and the optimistic UI echo happens in the shell before the remote call.

use chrono::Local;
use log::{info, warn};
use std::sync::Arc;

use crate::error::WidgetResult;
use crate::transport::SessionTransport;
use crate::types::Session;

pub struct SessionClient {
    transport: Arc<dyn SessionTransport>,
    agent_id: String,
}

impl SessionClient {
    pub fn new(transport: Arc<dyn SessionTransport>, agent_id: impl Into<String>) -> Self {
        SessionClient {
            transport,
            agent_id: agent_id.into(),
        }
    }

    /// Create a session for this client's agent. A `None` title falls back
    /// to a timestamped default.
    pub async fn create_session(&self, title: Option<&str>) -> WidgetResult<Session> {
        let title = match title {
            Some(t) => t.to_string(),
            None => format!("New Session - {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
        };
        let session = self.transport.create_session(&self.agent_id, &title).await?;
        info!("[session] Created session {}", session.id);
        Ok(session)
    }

    /// Submit one customer message event. Preconditions (non-empty session
    /// id, non-blank text) are the caller's to uphold; violations here are
    /// warned-and-ignored rather than turned into hard errors.
    pub async fn send_message(&self, session_id: &str, text: &str) -> WidgetResult<()> {
        if session_id.is_empty() {
            warn!("[session] send_message called with no session — ignoring");
            return Ok(());
        }
        if text.trim().is_empty() {
            warn!("[session] Refusing to send a blank message");
            return Ok(());
        }
        self.transport.post_message(session_id, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{WidgetError, WidgetResult};
    use crate::types::SessionEvent;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        created: Mutex<Vec<(String, String)>>,
        posted: Mutex<Vec<(String, String)>>,
        fail_posts: bool,
    }

    #[async_trait]
    impl SessionTransport for RecordingTransport {
        async fn create_session(&self, agent_id: &str, title: &str) -> WidgetResult<Session> {
            self.created
                .lock()
                .unwrap()
                .push((agent_id.to_string(), title.to_string()));
            Ok(Session {
                id: "S1".into(),
                agent_id: Some(agent_id.to_string()),
                title: Some(title.to_string()),
            })
        }

        async fn post_message(&self, session_id: &str, text: &str) -> WidgetResult<()> {
            if self.fail_posts {
                return Err(WidgetError::backend(502, "bad gateway"));
            }
            self.posted
                .lock()
                .unwrap()
                .push((session_id.to_string(), text.to_string()));
            Ok(())
        }

        async fn fetch_events(
            &self,
            _session_id: &str,
            _min_offset: u64,
            _wait_for_data: u64,
        ) -> WidgetResult<Vec<SessionEvent>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn create_session_uses_timestamped_default_title() {
        let transport = Arc::new(RecordingTransport::default());
        let client = SessionClient::new(transport.clone(), "agent-1");
        let session = client.create_session(None).await.unwrap();
        assert_eq!(session.id, "S1");
        let created = transport.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].0, "agent-1");
        assert!(created[0].1.starts_with("New Session - "));
    }

    #[tokio::test]
    async fn create_session_honors_explicit_title() {
        let transport = Arc::new(RecordingTransport::default());
        let client = SessionClient::new(transport.clone(), "agent-1");
        client.create_session(Some("Support")).await.unwrap();
        assert_eq!(transport.created.lock().unwrap()[0].1, "Support");
    }

    #[tokio::test]
    async fn send_message_posts_text() {
        let transport = Arc::new(RecordingTransport::default());
        let client = SessionClient::new(transport.clone(), "agent-1");
        client.send_message("S1", "hello").await.unwrap();
        let posted = transport.posted.lock().unwrap();
        assert_eq!(posted.as_slice(), &[("S1".to_string(), "hello".to_string())]);
    }

    #[tokio::test]
    async fn send_message_without_session_is_a_no_op() {
        let transport = Arc::new(RecordingTransport::default());
        let client = SessionClient::new(transport.clone(), "agent-1");
        client.send_message("", "hello").await.unwrap();
        assert!(transport.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_message_refuses_blank_text() {
        let transport = Arc::new(RecordingTransport::default());
        let client = SessionClient::new(transport.clone(), "agent-1");
        client.send_message("S1", "   \n").await.unwrap();
        assert!(transport.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_message_surfaces_backend_failure() {
        let transport = Arc::new(RecordingTransport {
            fail_posts: true,
            ..RecordingTransport::default()
        });
        let client = SessionClient::new(transport, "agent-1");
        let err = client.send_message("S1", "hello").await.unwrap_err();
        assert!(err.is_backend_unavailable());
    }
}
