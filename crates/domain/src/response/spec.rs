//! Normalized response of a send attempt.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::state::FailureKind;

/// Uniform result of a send, whether or not an HTTP exchange happened.
///
/// `status == 0` marks a transport failure rather than a real status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResponseState {
    /// Response text exactly as received (or synthesized on transport failure).
    pub raw: String,
    /// Parsed body, when the text is valid JSON.
    pub json: Option<Value>,
    /// HTTP status code, or 0.
    pub status: u16,
    /// Elapsed time in milliseconds.
    pub duration_ms: u64,
    /// Operator-facing error message for failed attempts.
    pub error: Option<String>,
}

impl ResponseState {
    /// Builds the state for a completed HTTP exchange.
    #[must_use]
    pub fn from_exchange(status: u16, status_text: &str, raw: String, duration_ms: u64) -> Self {
        let json = parse_body(&raw);
        let error = (!is_success_status(status))
            .then(|| error_message(json.as_ref(), status, status_text));
        Self {
            raw,
            json,
            status,
            duration_ms,
            error,
        }
    }

    /// Builds the state for a send where no HTTP exchange happened.
    #[must_use]
    pub fn transport_failure(message: &str, duration_ms: u64) -> Self {
        let body = json!({ "error": message });
        let raw = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
        Self {
            raw,
            json: Some(body),
            status: 0,
            duration_ms,
            error: Some(message.to_string()),
        }
    }

    /// Rebuilds a state from a stored status and response text.
    #[must_use]
    pub fn restore(status: u16, raw: &str, duration_ms: u64) -> Self {
        if status == 0 {
            let json = parse_body(raw);
            let error = json
                .as_ref()
                .and_then(|v| v.get("error"))
                .and_then(Value::as_str)
                .map_or_else(|| raw.to_string(), str::to_string);
            return Self {
                raw: raw.to_string(),
                json,
                status,
                duration_ms,
                error: Some(error),
            };
        }
        Self::from_exchange(status, "", raw.to_string(), duration_ms)
    }

    /// Returns true for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        is_success_status(self.status)
    }

    /// Returns true if no HTTP exchange happened.
    #[must_use]
    pub const fn is_transport_failure(&self) -> bool {
        self.status == 0
    }

    /// Classifies the state, `None` for a successful JSON response.
    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        if self.is_transport_failure() {
            Some(FailureKind::Transport)
        } else if !self.is_success() {
            Some(FailureKind::Http)
        } else if self.json.is_none() && !self.raw.is_empty() {
            Some(FailureKind::Parse)
        } else {
            None
        }
    }

    /// Pretty-printed JSON when parsed, the raw text otherwise.
    #[must_use]
    pub fn structured_view(&self) -> String {
        self.json
            .as_ref()
            .and_then(|v| serde_json::to_string_pretty(v).ok())
            .unwrap_or_else(|| self.raw.clone())
    }

    /// Returns the duration formatted for display.
    #[must_use]
    pub fn duration_display(&self) -> String {
        format_duration(self.duration_ms)
    }
}

/// Parses response text as JSON, `None` when it is not JSON.
#[must_use]
pub fn parse_body(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

/// Returns true for statuses in `[200, 300)`.
#[must_use]
pub const fn is_success_status(status: u16) -> bool {
    status >= 200 && status < 300
}

/// Picks the message of an error payload, falling back to the status line.
///
/// Recognizes `{"error": {"message": ..}}`, `{"error": ".."}` and
/// `{"message": ..}`.
#[must_use]
pub fn error_message(json: Option<&Value>, status: u16, status_text: &str) -> String {
    json.and_then(|body| {
        body.pointer("/error/message")
            .or_else(|| body.get("error").filter(|e| e.is_string()))
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    })
    .unwrap_or_else(|| format!("HTTP {status} {status_text}").trim_end().to_string())
}

/// Formats milliseconds as `150ms` or `1.5s`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}
