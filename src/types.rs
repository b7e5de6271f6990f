// Parlant Widget Core — Wire Types
// Serde model of the backend's session/event REST surface. Parsing is
// lenient where the backend may grow: unknown event kinds and sources
// deserialize to catch-all variants, and a malformed element never fails
// the batch it arrived in.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Session ────────────────────────────────────────────────────────────

/// A conversation session, identified by a backend-assigned opaque id.
/// Immutable after creation; extra response fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

// ── Events ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Message,
    /// Any kind this widget does not understand (status changes, tool
    /// events, ...). Still counts for the watermark.
    #[serde(other)]
    Other,
}

/// Who produced an event. Unknown wire strings are preserved verbatim so
/// the sink sees exactly what the backend sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventSource {
    Customer,
    AiAgent,
    HumanAgent,
    System,
    Other(String),
}

impl EventSource {
    pub fn as_str(&self) -> &str {
        match self {
            EventSource::Customer => "customer",
            EventSource::AiAgent => "ai_agent",
            EventSource::HumanAgent => "human_agent",
            EventSource::System => "system",
            EventSource::Other(s) => s,
        }
    }

    pub fn is_customer(&self) -> bool {
        matches!(self, EventSource::Customer)
    }
}

impl From<String> for EventSource {
    fn from(s: String) -> Self {
        match s.as_str() {
            "customer" => EventSource::Customer,
            "ai_agent" => EventSource::AiAgent,
            "human_agent" => EventSource::HumanAgent,
            "system" => EventSource::System,
            _ => EventSource::Other(s),
        }
    }
}

impl From<EventSource> for String {
    fn from(source: EventSource) -> Self {
        source.as_str().to_string()
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One offset-numbered occurrence within a session. Offsets strictly
/// increase in delivery order and are unique within the session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionEvent {
    pub offset: u64,
    pub kind: EventKind,
    pub source: EventSource,
    #[serde(default)]
    pub data: EventData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub message: Option<String>,
}

impl SessionEvent {
    pub fn message_text(&self) -> Option<&str> {
        self.data.message.as_deref()
    }
}

// ── Lenient batch parsing ──────────────────────────────────────────────

/// Parse a raw events array element by element. Entries that fail to
/// deserialize (missing offset, wrong field types) are logged and dropped;
/// they never advance the watermark and never abort the rest of the batch.
pub fn parse_event_batch(raw: Vec<serde_json::Value>) -> Vec<SessionEvent> {
    let mut events = Vec::with_capacity(raw.len());
    for value in raw {
        match serde_json::from_value::<SessionEvent>(value) {
            Ok(event) => events.push(event),
            Err(e) => warn!("[sync] Skipping malformed event: {}", e),
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_message_event() {
        let event: SessionEvent = serde_json::from_value(json!({
            "offset": 3,
            "kind": "message",
            "source": "ai_agent",
            "data": { "message": "hi" }
        }))
        .unwrap();
        assert_eq!(event.offset, 3);
        assert_eq!(event.kind, EventKind::Message);
        assert_eq!(event.source, EventSource::AiAgent);
        assert_eq!(event.message_text(), Some("hi"));
    }

    #[test]
    fn unknown_kind_and_source_are_preserved() {
        let event: SessionEvent = serde_json::from_value(json!({
            "offset": 0,
            "kind": "status",
            "source": "agent"
        }))
        .unwrap();
        assert_eq!(event.kind, EventKind::Other);
        assert_eq!(event.source, EventSource::Other("agent".into()));
        assert_eq!(event.source.as_str(), "agent");
        assert_eq!(event.message_text(), None);
    }

    #[test]
    fn session_ignores_extra_fields() {
        let session: Session = serde_json::from_value(json!({
            "id": "S1",
            "agent_id": "a",
            "title": "t",
            "creation_utc": "2025-01-01T00:00:00Z",
            "consumption_offsets": { "client": 0 }
        }))
        .unwrap();
        assert_eq!(session.id, "S1");
        assert_eq!(session.agent_id.as_deref(), Some("a"));
    }

    #[test]
    fn batch_parsing_skips_malformed_entries() {
        let events = parse_event_batch(vec![
            json!({ "offset": 0, "kind": "message", "source": "customer" }),
            json!({ "kind": "message", "source": "ai_agent" }), // no offset
            json!("not even an object"),
            json!({ "offset": 2, "kind": "message", "source": "ai_agent", "data": { "message": "ok" } }),
        ]);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].offset, 0);
        assert_eq!(events[1].offset, 2);
    }

    #[test]
    fn source_display_matches_wire_string() {
        assert_eq!(EventSource::Customer.to_string(), "customer");
        assert_eq!(EventSource::from("agent".to_string()).to_string(), "agent");
        assert!(EventSource::Customer.is_customer());
        assert!(!EventSource::AiAgent.is_customer());
    }
}
