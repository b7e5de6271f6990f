// Parlant Widget Core — Configuration
//
// Externally supplied knobs for one widget instance: backend address, agent
// id, the server-side long-poll wait hint, and the retry backoff policy.
// The embedding shell decides where these come from (embedded constants,
// query parameters, a settings store) — the core only validates them.

use serde::{Deserialize, Serialize};

use crate::error::{WidgetError, WidgetResult};

// ── Widget Config ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Base URL of the Parlant server (e.g. "https://chat.example.com")
    pub server_address: String,
    /// Agent the session is created against
    pub agent_id: String,
    /// How long the server may hold an event fetch open waiting for new
    /// data, in seconds
    #[serde(default = "default_wait_for_data_secs")]
    pub wait_for_data_secs: u64,
    /// Delay policy for failed poll cycles
    #[serde(default)]
    pub backoff: BackoffConfig,
}

fn default_wait_for_data_secs() -> u64 {
    60
}

impl Default for WidgetConfig {
    fn default() -> Self {
        WidgetConfig {
            server_address: String::new(),
            agent_id: String::new(),
            wait_for_data_secs: default_wait_for_data_secs(),
            backoff: BackoffConfig::default(),
        }
    }
}

impl WidgetConfig {
    /// Build a config with default polling knobs.
    pub fn new(server_address: impl Into<String>, agent_id: impl Into<String>) -> Self {
        WidgetConfig {
            server_address: server_address.into(),
            agent_id: agent_id.into(),
            ..WidgetConfig::default()
        }
    }

    /// Reject configs that cannot possibly reach a backend.
    pub fn validate(&self) -> WidgetResult<()> {
        if self.server_address.trim().is_empty() {
            return Err(WidgetError::Config("server address is required".into()));
        }
        if self.agent_id.trim().is_empty() {
            return Err(WidgetError::Config("agent id is required".into()));
        }
        Ok(())
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.server_address.trim_end_matches('/')
    }
}

// ── Backoff Config ─────────────────────────────────────────────────────

/// Single backoff policy for the poll loop: delay doubles per consecutive
/// failure from `initial_delay_ms` up to `max_delay_ms`, and resets on the
/// first successful cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// First retry delay in milliseconds
    pub initial_delay_ms: u64,
    /// Upper bound for the exponential growth, in milliseconds
    pub max_delay_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        BackoffConfig {
            initial_delay_ms: 2_000,
            max_delay_ms: 30_000,
        }
    }
}
