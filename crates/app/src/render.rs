//! Text rendering for console output.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use snapdeck_domain::{
    ComposedRequest, Endpoint, EndpointCategory, FailureKind, HistoryEntry, PlaceholderWarning,
    ResponseState,
};

/// One line per endpoint: key, method, path and name.
#[must_use]
pub fn catalog_table(endpoints: &[&Endpoint]) -> String {
    if endpoints.is_empty() {
        return "No endpoints match.".to_string();
    }
    endpoints
        .iter()
        .map(|e| {
            format!(
                "{:<24} {:<6} {:<40} {}",
                e.id.key(),
                e.method.as_str(),
                e.path,
                e.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Endpoint counts per category.
#[must_use]
pub fn category_counts(counts: &BTreeMap<EndpointCategory, usize>) -> String {
    counts
        .iter()
        .map(|(category, count)| format!("{:<10} {count}", category.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Request line, warnings and body of what `send` would dispatch.
#[must_use]
pub fn request_preview(
    endpoint: &Endpoint,
    request: &ComposedRequest,
    warnings: &[PlaceholderWarning],
) -> String {
    let mut out = format!(
        "{} ({})\n{} {}",
        endpoint.name, endpoint.id, request.method, request.url
    );
    for warning in warnings {
        out.push_str(&format!("\nwarning: {warning}"));
    }
    if !request.method.carries_body() {
        out.push_str(&format!("\n(no body: {})", request.method));
    } else if let Some(body) = request.body.as_deref().filter(|b| !b.trim().is_empty()) {
        out.push_str("\n\n");
        out.push_str(body);
    }
    out
}

/// Status line, failure details and body of a response.
#[must_use]
pub fn response(state: &ResponseState) -> String {
    let status = match state.status {
        0 => "ERR".to_string(),
        code => code.to_string(),
    };
    let mut out = format!("{status} in {}", state.duration_display());

    if let Some(kind) = state.failure_kind() {
        out.push_str(&format!("\n{}", kind.title()));
        if let Some(error) = &state.error {
            out.push_str(&format!(": {error}"));
        }
        if kind != FailureKind::Parse {
            for suggestion in kind.suggestions() {
                out.push_str(&format!("\n  - {suggestion}"));
            }
        }
    }

    let body = state.structured_view();
    if !body.is_empty() {
        out.push_str("\n\n");
        out.push_str(&body);
    }
    out
}

/// Validation failure for a draft that was not sent.
#[must_use]
pub fn validation_error(message: &str) -> String {
    let kind = FailureKind::Validation;
    let mut out = format!("{}: {message}", kind.title());
    for suggestion in kind.suggestions() {
        out.push_str(&format!("\n  - {suggestion}"));
    }
    out
}

/// Numbered history listing, newest first.
#[must_use]
pub fn history<'a>(
    entries: impl IntoIterator<Item = &'a HistoryEntry>,
    now: DateTime<Utc>,
) -> String {
    let lines: Vec<_> = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let target = if entry.query.is_empty() {
                entry.path.clone()
            } else {
                format!("{}?{}", entry.path, entry.query)
            };
            format!(
                "{:>2}. {:<3} {:<6} {:<40} {:>7}  {}",
                i + 1,
                entry.status_display(),
                entry.method.as_str(),
                target,
                entry.duration_display(),
                entry.time_ago(now)
            )
        })
        .collect();

    if lines.is_empty() {
        "History is empty.".to_string()
    } else {
        lines.join("\n")
    }
}
