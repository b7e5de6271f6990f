// Parlant Widget Core — Backend Transport
//
// The REST surface the widget consumes, behind a trait so the session and
// sync layers never depend on how requests are issued. `RestTransport` is
// the raw-HTTP implementation; an SDK wrapper or an in-process mock slots
// in behind the same three operations.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::config::WidgetConfig;
use crate::error::{WidgetError, WidgetResult};
use crate::types::{parse_event_batch, Session, SessionEvent};

// ── Transport trait ────────────────────────────────────────────────────

#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// `POST /sessions` — create a conversation session against an agent.
    async fn create_session(&self, agent_id: &str, title: &str) -> WidgetResult<Session>;

    /// `POST /sessions/{id}/events` — submit one customer message event.
    async fn post_message(&self, session_id: &str, text: &str) -> WidgetResult<()>;

    /// `GET /sessions/{id}/events` — fetch events at or above `min_offset`,
    /// letting the server hold the request open up to `wait_for_data`
    /// seconds when nothing new exists.
    async fn fetch_events(
        &self,
        session_id: &str,
        min_offset: u64,
        wait_for_data: u64,
    ) -> WidgetResult<Vec<SessionEvent>>;
}

// ── Raw-HTTP implementation ────────────────────────────────────────────

/// Transport issuing raw HTTP requests against a Parlant REST backend.
pub struct RestTransport {
    client: Client,
    base_url: String,
}

impl RestTransport {
    pub fn new(config: &WidgetConfig) -> WidgetResult<Self> {
        // The request timeout must outlive the server-side long-poll hold.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.wait_for_data_secs + 30))
            .build()?;
        Ok(RestTransport {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    fn events_url(&self, session_id: &str) -> String {
        format!(
            "{}/sessions/{}/events",
            self.base_url,
            urlencoding::encode(session_id)
        )
    }
}

/// Map a non-success response to `WidgetError::Backend`, carrying whatever
/// body text the server sent.
async fn check_status(response: reqwest::Response) -> WidgetResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(WidgetError::backend(status.as_u16(), message))
}

#[async_trait]
impl SessionTransport for RestTransport {
    async fn create_session(&self, agent_id: &str, title: &str) -> WidgetResult<Session> {
        let url = format!("{}/sessions", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "agent_id": agent_id, "title": title }))
            .send()
            .await?;
        let session: Session = check_status(response).await?.json().await?;
        Ok(session)
    }

    async fn post_message(&self, session_id: &str, text: &str) -> WidgetResult<()> {
        let response = self
            .client
            .post(self.events_url(session_id))
            .json(&json!({
                "kind": "message",
                "source": "customer",
                "message": text,
            }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn fetch_events(
        &self,
        session_id: &str,
        min_offset: u64,
        wait_for_data: u64,
    ) -> WidgetResult<Vec<SessionEvent>> {
        let url = format!(
            "{}?min_offset={}&wait_for_data={}",
            self.events_url(session_id),
            min_offset,
            wait_for_data
        );
        let response = self.client.get(&url).send().await?;
        let raw: Vec<serde_json::Value> = check_status(response).await?.json().await?;
        debug!("[sync] Fetched {} raw events", raw.len());
        Ok(parse_event_batch(raw))
    }
}
