//! Final URL assembly and path placeholder validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::HttpMethod;

/// Matches `{token}` anywhere, or a `:token` path segment.
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^/{}]+)\}|(?:^|/):([A-Za-z_][A-Za-z0-9_-]*)").expect("valid regex")
});

/// A request ready to be dispatched or exported as a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Fully resolved URL (base + path + query).
    pub url: String,
    /// Body text. Always `None` for GET.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// A path placeholder left unresolved by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderWarning {
    /// Placeholder name without braces or colon.
    pub name: String,
    /// The literal text found in the path.
    pub literal: String,
}

impl std::fmt::Display for PlaceholderWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "path placeholder '{}' is unresolved and will be sent literally",
            self.literal
        )
    }
}

/// Builds final request URLs against a single base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestComposer {
    base_url: String,
}

impl RequestComposer {
    /// Creates a composer for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Returns the base URL requests are addressed to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Composes a request from the editable path, query and body panes.
    ///
    /// The body is dropped for GET regardless of what the draft holds.
    #[must_use]
    pub fn compose(
        &self,
        method: HttpMethod,
        path: &str,
        query: &str,
        body_text: &str,
    ) -> ComposedRequest {
        ComposedRequest {
            method,
            url: compose_url(&self.base_url, path, query),
            body: method.carries_body().then(|| body_text.to_string()),
        }
    }
}

/// Ensures the path starts with exactly one `/`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim().trim_start_matches('/'))
}

/// Strips surrounding whitespace and a leading `?` typed by the user.
#[must_use]
pub fn normalize_query(query: &str) -> &str {
    let trimmed = query.trim();
    trimmed.strip_prefix('?').unwrap_or(trimmed)
}

/// Concatenates base URL, normalized path and (if non-empty) query.
#[must_use]
pub fn compose_url(base_url: &str, path: &str, query: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = normalize_path(path);
    match normalize_query(query) {
        "" => format!("{base}{path}"),
        query => format!("{base}{path}?{query}"),
    }
}

/// Returns one warning per unresolved `{name}` or `:name` placeholder.
#[must_use]
pub fn unresolved_placeholders(path: &str) -> Vec<PlaceholderWarning> {
    PLACEHOLDER
        .captures_iter(path)
        .filter_map(|caps| {
            let (literal, name) = match (caps.get(1), caps.get(2)) {
                (Some(name), _) => (format!("{{{}}}", name.as_str()), name.as_str()),
                (None, Some(name)) => (format!(":{}", name.as_str()), name.as_str()),
                (None, None) => return None,
            };
            Some(PlaceholderWarning {
                name: name.to_string(),
                literal,
            })
        })
        .collect()
}
