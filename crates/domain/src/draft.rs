//! Per-endpoint draft bodies.

use std::collections::HashMap;

use crate::catalog::EndpointId;
use crate::error::{DomainError, DomainResult};
use crate::template::template_text;

/// Session-scoped store of draft bodies keyed by endpoint.
///
/// Switching endpoints never discards another endpoint's draft. Drafts are
/// only replaced by an explicit reset or a history replay.
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    drafts: HashMap<EndpointId, String>,
}

impl DraftStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the draft for `id`, seeding it from the template on first visit.
    pub fn get_or_seed(&mut self, id: EndpointId, model_hint: &str) -> &str {
        self.drafts
            .entry(id)
            .or_insert_with(|| template_text(id, model_hint))
    }

    /// Returns the cached draft, if the endpoint was visited.
    #[must_use]
    pub fn get(&self, id: EndpointId) -> Option<&str> {
        self.drafts.get(&id).map(String::as_str)
    }

    /// Overwrites the draft for `id`.
    pub fn set(&mut self, id: EndpointId, text: impl Into<String>) {
        self.drafts.insert(id, text.into());
    }

    /// Regenerates the draft from the template, discarding edits.
    pub fn reset(&mut self, id: EndpointId, model_hint: &str) -> &str {
        self.drafts.insert(id, template_text(id, model_hint));
        self.drafts.get(&id).map_or("", String::as_str)
    }

    /// Number of endpoints with a cached draft.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    /// Returns true if no draft has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Drops every draft. Called when the session ends.
    pub fn clear(&mut self) {
        self.drafts.clear();
    }
}

/// Pretty-prints JSON draft text with two-space indentation.
///
/// # Errors
///
/// Returns [`DomainError::InvalidBody`] if the text is not valid JSON.
pub fn format_json(text: &str) -> DomainResult<String> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DomainError::InvalidBody(e.to_string()))?;
    serde_json::to_string_pretty(&value).map_err(|e| DomainError::InvalidBody(e.to_string()))
}
