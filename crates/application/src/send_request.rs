//! Send Request Use Case
//!
//! Validates the draft, dispatches a single attempt, and normalizes success
//! and failure alike into a history entry plus a response state.

use std::sync::Arc;
use std::time::Instant;

use snapdeck_domain::{DomainError, format_json};
use snapdeck_domain::history::{HistoryEntry, RequestSnapshot};
use snapdeck_domain::request::ComposedRequest;
use snapdeck_domain::response::ResponseState;
use thiserror::Error;

use crate::ports::{Clock, HttpClient};

/// Rejection raised before anything is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendRequestError {
    /// The draft of a body-bearing request is not valid JSON.
    #[error("invalid JSON body: {0}")]
    InvalidBody(String),
}

/// A request captured at send time, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    /// Monotonic per-session send number.
    pub seq: u64,
    /// Request to dispatch.
    pub request: ComposedRequest,
    /// Endpoint display name for the history entry.
    pub endpoint_name: String,
    /// Normalized path.
    pub path: String,
    /// Normalized query string.
    pub query: String,
}

/// Result of a completed attempt: always recorded in history.
#[derive(Debug, Clone, PartialEq)]
pub struct SendOutcome {
    /// Immutable history record of the attempt.
    pub entry: HistoryEntry,
    /// Response pane contents.
    pub response: ResponseState,
}

/// Use case for sending composed requests.
pub struct SendRequest<C: HttpClient, K: Clock> {
    client: Arc<C>,
    clock: Arc<K>,
}

impl<C: HttpClient, K: Clock> SendRequest<C, K> {
    /// Creates the use case with the given HTTP client and clock.
    pub const fn new(client: Arc<C>, clock: Arc<K>) -> Self {
        Self { client, clock }
    }

    /// Validates and dispatches the request.
    ///
    /// Transport failures and non-2xx statuses are not errors: they come
    /// back as an outcome with status 0 or the real status.
    ///
    /// # Errors
    ///
    /// Returns [`SendRequestError::InvalidBody`] when a body-bearing
    /// request has a draft that is not JSON. Nothing is sent in that case.
    pub async fn execute(&self, pending: &PendingSend) -> Result<SendOutcome, SendRequestError> {
        let request = prepare_request(&pending.request)?;

        tracing::info!(
            seq = pending.seq,
            method = %request.method,
            url = %request.url,
            "dispatching request"
        );

        let started = Instant::now();
        let result = self.client.execute(&request).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let response = match result {
            Ok(exchange) => {
                tracing::info!(
                    seq = pending.seq,
                    status = exchange.status,
                    duration_ms,
                    "request completed"
                );
                ResponseState::from_exchange(
                    exchange.status,
                    &exchange.status_text,
                    exchange.body,
                    duration_ms,
                )
            }
            Err(error) => {
                tracing::warn!(seq = pending.seq, %error, duration_ms, "transport failure");
                ResponseState::transport_failure(&error.to_string(), duration_ms)
            }
        };

        let snapshot = RequestSnapshot {
            endpoint_name: pending.endpoint_name.clone(),
            method: request.method,
            path: pending.path.clone(),
            query: pending.query.clone(),
            body: request.body.unwrap_or_default(),
        };
        let entry = HistoryEntry::new(snapshot, &response, self.clock.now());

        Ok(SendOutcome { entry, response })
    }
}

/// Checks the body of `request` and drops it when blank.
///
/// # Errors
///
/// Returns [`SendRequestError::InvalidBody`] when a body-bearing request
/// carries text that is not JSON.
pub fn prepare_request(request: &ComposedRequest) -> Result<ComposedRequest, SendRequestError> {
    let body = request
        .body
        .as_deref()
        .filter(|body| request.method.carries_body() && !body.trim().is_empty());

    if let Some(body) = body {
        check_json(body)?;
    }

    Ok(ComposedRequest {
        method: request.method,
        url: request.url.clone(),
        body: body.map(str::to_string),
    })
}

fn check_json(body: &str) -> Result<(), SendRequestError> {
    match format_json(body) {
        Ok(_) => Ok(()),
        Err(DomainError::InvalidBody(reason)) => Err(SendRequestError::InvalidBody(reason)),
        Err(other) => Err(SendRequestError::InvalidBody(other.to_string())),
    }
}
