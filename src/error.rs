// Parlant Widget Core — Error Types
// Single canonical error enum for the widget core, built with `thiserror`.
//
// Design rules:
//   • Variants are coarse-grained by domain (network, backend, config).
//   • The `#[from]` attribute wires reqwest/serde_json conversions automatically.
//   • `WidgetError` → `String` conversion is provided via `Display` so that
//     embedding shells with string-typed boundaries can call
//     `.map_err(|e| e.to_string())` without boilerplate.

use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum WidgetError {
    /// HTTP / network failure (reqwest layer).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend error: HTTP {status}: {message}")]
    Backend { status: u16, message: String },

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Widget configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catch-all for errors that do not yet have a dedicated variant.
    /// Prefer adding a specific variant over using this in new code.
    #[error("{0}")]
    Other(String),
}

// ── Convenience constructors ───────────────────────────────────────────────

impl WidgetError {
    /// Create a backend error from a response status and body text.
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend { status, message: message.into() }
    }

    /// True for the failure class the widget surfaces as "backend
    /// unavailable": network-level errors and non-success responses.
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Backend { .. })
    }
}

// ── String bridges ─────────────────────────────────────────────────────────

impl From<String> for WidgetError {
    fn from(s: String) -> Self {
        WidgetError::Other(s)
    }
}

impl From<&str> for WidgetError {
    fn from(s: &str) -> Self {
        WidgetError::Other(s.to_string())
    }
}

impl From<WidgetError> for String {
    fn from(e: WidgetError) -> Self {
        e.to_string()
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All widget-core operations return this type.
pub type WidgetResult<T> = Result<T, WidgetError>;
