//! Request History Domain Model
//!
//! Bounded, most-recent-first log of completed send attempts.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::HttpMethod;
use crate::response::{ResponseState, format_duration};

/// Number of entries kept before the oldest is evicted.
pub const HISTORY_CAPACITY: usize = 30;

/// What was sent, captured when the send starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSnapshot {
    /// Display name of the endpoint the request was composed for.
    pub endpoint_name: String,
    /// HTTP method used.
    pub method: HttpMethod,
    /// Path as sent, after normalization.
    pub path: String,
    /// Query string without the leading `?`.
    pub query: String,
    /// Body text exactly as sent; empty when no body was transmitted.
    pub body: String,
}

/// A single, immutable entry in the request history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier for this entry.
    pub id: String,
    /// When the send completed.
    pub timestamp: DateTime<Utc>,
    /// Endpoint display name.
    pub endpoint_name: String,
    /// HTTP method used.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Query string without the leading `?`.
    pub query: String,
    /// Response status code, 0 for transport failures.
    pub status: u16,
    /// Request duration in milliseconds.
    pub duration_ms: u64,
    /// Request body text sent.
    pub request_body: String,
    /// Response body text received.
    pub response_body: String,
}

impl HistoryEntry {
    /// Creates an entry from the sent request and its normalized response.
    #[must_use]
    pub fn new(
        request: RequestSnapshot,
        response: &ResponseState,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: crate::generate_id(),
            timestamp,
            endpoint_name: request.endpoint_name,
            method: request.method,
            path: request.path,
            query: request.query,
            status: response.status,
            duration_ms: response.duration_ms,
            request_body: request.body,
            response_body: response.raw.clone(),
        }
    }

    /// Rebuilds the response pane recorded by this entry.
    #[must_use]
    pub fn response_state(&self) -> ResponseState {
        ResponseState::restore(self.status, &self.response_body, self.duration_ms)
    }

    /// Returns a human-readable "time ago" string.
    #[must_use]
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        let duration = now.signed_duration_since(self.timestamp);

        if duration.num_seconds() < 60 {
            "just now".to_string()
        } else if duration.num_minutes() < 60 {
            let mins = duration.num_minutes();
            format!("{mins}m ago")
        } else if duration.num_hours() < 24 {
            let hours = duration.num_hours();
            format!("{hours}h ago")
        } else {
            self.timestamp.format("%Y-%m-%d").to_string()
        }
    }

    /// Returns the duration as a display string.
    #[must_use]
    pub fn duration_display(&self) -> String {
        format_duration(self.duration_ms)
    }

    /// Returns the status, or `ERR` for transport failures.
    #[must_use]
    pub fn status_display(&self) -> String {
        match self.status {
            0 => "ERR".to_string(),
            code => code.to_string(),
        }
    }
}

/// Request history with a maximum size limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestHistory {
    /// History entries (newest first).
    entries: VecDeque<HistoryEntry>,
    /// Maximum number of entries to keep.
    max_entries: usize,
}

impl RequestHistory {
    /// Creates a new empty history.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries + 1),
            max_entries,
        }
    }

    /// Adds an entry to the history (at the front).
    pub fn add(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);

        // Trim to max size
        while self.entries.len() > self.max_entries {
            self.entries.pop_back();
        }
    }

    /// Returns all entries (newest first).
    #[must_use]
    pub const fn entries(&self) -> &VecDeque<HistoryEntry> {
        &self.entries
    }

    /// Returns an entry by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Returns the entry at `index`, 0 being the newest.
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Clears all history entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the capacity.
    #[must_use]
    pub const fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl Default for RequestHistory {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}
