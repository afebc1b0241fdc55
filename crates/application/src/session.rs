//! Console Session
//!
//! Owns everything an operator mutates while exploring the API: the active
//! endpoint, per-endpoint drafts, path and query overrides, the response
//! pane and the bounded history. Nothing here outlives the session.
//!
//! Overlapping sends are allowed. Each send takes a sequence number from
//! [`ConsoleSession::begin_send`]; every completion is recorded in history,
//! but only a completion newer than the displayed one replaces the response
//! pane. A slow response that resolves after a newer one is discarded.

use std::sync::Arc;

use snapdeck_domain::request::{normalize_path, normalize_query, unresolved_placeholders};
use snapdeck_domain::{
    ComposedRequest, DraftStore, Endpoint, EndpointCatalog, EndpointId, HistoryEntry,
    PlaceholderWarning, RequestComposer, RequestHistory, ResponseInspector, ResponseState,
    format_json,
};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{Clock, HttpClient};
use crate::send_request::{PendingSend, SendOutcome, SendRequest, prepare_request};

/// How a replay was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayTarget {
    /// The entry matched a catalog endpoint, which became active.
    Endpoint(EndpointId),
    /// No endpoint matched; only the editor and response panes changed.
    TextOnly,
}

/// Interactive state of one console session.
pub struct ConsoleSession<C: HttpClient, K: Clock> {
    catalog: EndpointCatalog,
    composer: RequestComposer,
    inspector: ResponseInspector,
    sender: Arc<SendRequest<C, K>>,
    model_hint: String,
    active: &'static Endpoint,
    drafts: DraftStore,
    path: String,
    query: String,
    editor: String,
    response: Option<ResponseState>,
    history: RequestHistory,
    validation_error: Option<String>,
    last_issued: u64,
    displayed: u64,
}

impl<C: HttpClient, K: Clock> ConsoleSession<C, K> {
    /// Starts a session with the first catalog endpoint selected.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::EmptyCatalog`] if the catalog has no
    /// endpoints to select.
    pub fn new(
        catalog: EndpointCatalog,
        base_url: impl Into<String>,
        model_hint: impl Into<String>,
        sender: SendRequest<C, K>,
    ) -> ApplicationResult<Self> {
        let first = catalog.list().first().ok_or(ApplicationError::EmptyCatalog)?;
        let mut session = Self {
            catalog,
            composer: RequestComposer::new(base_url),
            inspector: ResponseInspector::new(),
            sender: Arc::new(sender),
            model_hint: model_hint.into(),
            active: first,
            drafts: DraftStore::new(),
            path: String::new(),
            query: String::new(),
            editor: String::new(),
            response: None,
            history: RequestHistory::default(),
            validation_error: None,
            last_issued: 0,
            displayed: 0,
        };
        session.activate(first);
        Ok(session)
    }

    /// Replaces the image classification rule.
    #[must_use]
    pub fn with_inspector(mut self, inspector: ResponseInspector) -> Self {
        self.inspector = inspector;
        self
    }

    /// The catalog this session browses.
    #[must_use]
    pub const fn catalog(&self) -> &EndpointCatalog {
        &self.catalog
    }

    /// Base URL requests are addressed to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.composer.base_url()
    }

    /// Model hint used to seed new drafts.
    #[must_use]
    pub fn model_hint(&self) -> &str {
        &self.model_hint
    }

    /// Changes the hint for drafts seeded from now on. Existing drafts keep
    /// their text until reset.
    pub fn set_model_hint(&mut self, hint: impl Into<String>) {
        self.model_hint = hint.into();
    }

    /// Makes `id` the active endpoint.
    ///
    /// The endpoint's draft is seeded from its template on first visit and
    /// restored verbatim afterwards. The path override resets to the
    /// endpoint's path and the query override is cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not in the catalog.
    pub fn select(&mut self, id: EndpointId) -> ApplicationResult<&'static Endpoint> {
        let endpoint = self
            .catalog
            .get(id)
            .ok_or_else(|| snapdeck_domain::DomainError::UnknownEndpoint(id.key().to_string()))?;
        self.activate(endpoint);
        tracing::debug!(endpoint = id.key(), "endpoint selected");
        Ok(endpoint)
    }

    fn activate(&mut self, endpoint: &'static Endpoint) {
        self.active = endpoint;
        self.editor = self
            .drafts
            .get_or_seed(endpoint.id, &self.model_hint)
            .to_string();
        self.path = endpoint.path.to_string();
        self.query.clear();
        self.validation_error = None;
    }

    /// The endpoint currently being composed.
    #[must_use]
    pub const fn active_endpoint(&self) -> &'static Endpoint {
        self.active
    }

    /// Text in the body editor.
    #[must_use]
    pub fn editor_text(&self) -> &str {
        &self.editor
    }

    /// Replaces the editor text and the active endpoint's draft.
    pub fn edit_draft(&mut self, text: impl Into<String>) {
        self.editor = text.into();
        self.drafts.set(self.active.id, self.editor.clone());
        self.validation_error = None;
    }

    /// Regenerates the active draft from its template, discarding edits.
    pub fn reset_draft(&mut self) -> &str {
        self.editor = self
            .drafts
            .reset(self.active.id, &self.model_hint)
            .to_string();
        self.validation_error = None;
        &self.editor
    }

    /// Pretty-prints the editor text in place.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the text untouched, if it is not JSON.
    pub fn format_draft(&mut self) -> ApplicationResult<&str> {
        let formatted = format_json(&self.editor)?;
        self.edit_draft(formatted);
        Ok(&self.editor)
    }

    /// Path that will be sent, possibly edited by the operator.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Overrides the path of the next request.
    pub fn set_path(&mut self, path: &str) {
        self.path = normalize_path(path);
    }

    /// Query string without the leading `?`.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Overrides the query string of the next request.
    pub fn set_query(&mut self, query: &str) {
        self.query = normalize_query(query).to_string();
    }

    /// The request as it would be sent now.
    #[must_use]
    pub fn composed(&self) -> ComposedRequest {
        self.composer
            .compose(self.active.method, &self.path, &self.query, &self.editor)
    }

    /// Placeholders left in the path. Sending is still allowed.
    #[must_use]
    pub fn placeholder_warnings(&self) -> Vec<PlaceholderWarning> {
        unresolved_placeholders(&self.path)
    }

    /// Validates the current request and issues a sequence number for it.
    ///
    /// # Errors
    ///
    /// Returns a validation error, also kept for display, when a
    /// body-bearing request has a draft that is not JSON. No sequence
    /// number is consumed in that case.
    pub fn begin_send(&mut self) -> ApplicationResult<PendingSend> {
        let request = match prepare_request(&self.composed()) {
            Ok(request) => request,
            Err(error) => {
                self.record_validation_error(error.to_string());
                return Err(error.into());
            }
        };

        for warning in self.placeholder_warnings() {
            tracing::warn!(placeholder = %warning.literal, "sending with unresolved placeholder");
        }

        self.validation_error = None;
        self.last_issued += 1;
        Ok(PendingSend {
            seq: self.last_issued,
            request,
            endpoint_name: self.active.name.to_string(),
            path: self.path.clone(),
            query: self.query.clone(),
        })
    }

    /// Keeps a validation message for display. History is not touched.
    pub fn record_validation_error(&mut self, message: impl Into<String>) {
        self.validation_error = Some(message.into());
    }

    /// Last validation message, cleared by the next edit or send.
    #[must_use]
    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    /// Records a finished attempt.
    ///
    /// The entry always goes to history. The response pane only changes
    /// when `seq` is newer than the response currently shown; returns
    /// whether it did.
    pub fn complete_send(&mut self, seq: u64, outcome: SendOutcome) -> bool {
        self.history.add(outcome.entry);
        if seq <= self.displayed {
            tracing::debug!(seq, displayed = self.displayed, "discarding stale response");
            return false;
        }
        self.displayed = seq;
        self.response = Some(outcome.response);
        true
    }

    /// Handle for dispatching pending sends outside the session borrow.
    #[must_use]
    pub fn sender(&self) -> Arc<SendRequest<C, K>> {
        Arc::clone(&self.sender)
    }

    /// Validates, dispatches and records the current request.
    ///
    /// Returns the sequence number of the attempt.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the body is not JSON. Transport
    /// and HTTP failures are recorded like any other outcome.
    pub async fn send(&mut self) -> ApplicationResult<u64> {
        let pending = self.begin_send()?;
        let outcome = self.sender.execute(&pending).await?;
        self.complete_send(pending.seq, outcome);
        Ok(pending.seq)
    }

    /// Response pane contents, if anything was sent or replayed.
    #[must_use]
    pub const fn response(&self) -> Option<&ResponseState> {
        self.response.as_ref()
    }

    /// Image URLs found in the displayed response.
    #[must_use]
    pub fn image_urls(&self) -> Vec<String> {
        self.response
            .as_ref()
            .and_then(|r| r.json.as_ref())
            .map(|json| self.inspector.extract_image_urls(json, self.base_url()))
            .unwrap_or_default()
    }

    /// Completed attempts, newest first.
    #[must_use]
    pub const fn history(&self) -> &RequestHistory {
        &self.history
    }

    /// Restores the request and response of a history entry.
    ///
    /// When the entry's method and path match a catalog endpoint exactly,
    /// that endpoint becomes active and its draft is overwritten with the
    /// stored body. Otherwise only the editor and response panes change.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::UnknownHistoryEntry`] for unknown ids.
    pub fn replay(&mut self, entry_id: &str) -> ApplicationResult<ReplayTarget> {
        let entry = self
            .history
            .get(entry_id)
            .cloned()
            .ok_or_else(|| ApplicationError::UnknownHistoryEntry(entry_id.to_string()))?;
        Ok(self.apply_replay(&entry))
    }

    /// Replays the entry at `index`, 0 being the most recent.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::UnknownHistoryEntry`] if out of range.
    pub fn replay_nth(&mut self, index: usize) -> ApplicationResult<ReplayTarget> {
        let entry = self
            .history
            .nth(index)
            .cloned()
            .ok_or_else(|| ApplicationError::UnknownHistoryEntry(format!("#{index}")))?;
        Ok(self.apply_replay(&entry))
    }

    fn apply_replay(&mut self, entry: &HistoryEntry) -> ReplayTarget {
        let target = match self.catalog.find_by_route(entry.method, &entry.path) {
            Some(endpoint) => {
                self.active = endpoint;
                self.drafts.set(endpoint.id, entry.request_body.clone());
                self.path.clone_from(&entry.path);
                self.query.clone_from(&entry.query);
                ReplayTarget::Endpoint(endpoint.id)
            }
            None => ReplayTarget::TextOnly,
        };

        tracing::debug!(entry = %entry.id, ?target, "replaying history entry");
        self.editor.clone_from(&entry.request_body);
        self.response = Some(entry.response_state());
        self.validation_error = None;
        self.displayed = self.last_issued;
        target
    }

    /// Empties the history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Drops all drafts, history and the response pane.
    pub fn end(&mut self) {
        self.drafts.clear();
        self.history.clear();
        self.response = None;
        self.validation_error = None;
        tracing::debug!("session ended");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use snapdeck_domain::{HISTORY_CAPACITY, HttpMethod, build_template};

    use crate::send_request::tests::{FixedClock, MockHttpClient, fixed_clock};

    fn session_with(client: MockHttpClient) -> ConsoleSession<MockHttpClient, FixedClock> {
        let sender = SendRequest::new(Arc::new(client), fixed_clock());
        ConsoleSession::new(
            EndpointCatalog::builtin(),
            "http://localhost:6930/",
            "llama-7b",
            sender,
        )
        .unwrap()
    }

    fn session() -> ConsoleSession<MockHttpClient, FixedClock> {
        session_with(MockHttpClient::responding(200, r#"{"ok":true}"#))
    }

    #[test]
    fn chat_template_is_seeded_with_model_hint() {
        let mut session = session();
        session.select(EndpointId::ChatCompletions).unwrap();

        let draft: Value = serde_json::from_str(session.editor_text()).unwrap();
        assert_eq!(draft["model"], "llama-7b");
        assert_eq!(draft["messages"].as_array().unwrap().len(), 1);
        assert_eq!(draft["messages"][0]["role"], "user");
        assert_eq!(draft["messages"][0]["content"], "Hello from SnapLLM.");
        assert_eq!(draft["max_tokens"], 256);
    }

    #[test]
    fn every_template_seeds_an_equal_draft() {
        let mut session = session();
        for endpoint in EndpointCatalog::builtin().list() {
            session.select(endpoint.id).unwrap();
            match build_template(endpoint.id, "llama-7b") {
                Some(template) => {
                    let draft: Value = serde_json::from_str(session.editor_text()).unwrap();
                    assert_eq!(draft, template, "{}", endpoint.id.key());
                }
                None => assert_eq!(session.editor_text(), ""),
            }
        }
    }

    #[test]
    fn drafts_survive_endpoint_switches() {
        let mut session = session();
        session.select(EndpointId::Generate).unwrap();
        session.edit_draft(r#"{"prompt":"mine"}"#);
        session.select(EndpointId::Messages).unwrap();
        session.set_model_hint("other");
        session.select(EndpointId::Generate).unwrap();

        assert_eq!(session.editor_text(), r#"{"prompt":"mine"}"#);

        let reset = session.reset_draft().to_string();
        let draft: Value = serde_json::from_str(&reset).unwrap();
        assert_eq!(draft, build_template(EndpointId::Generate, "other").unwrap());
    }

    #[test]
    fn get_requests_never_carry_a_body() {
        let mut session = session();
        session.select(EndpointId::Health).unwrap();
        session.edit_draft(r#"{"ignored":true}"#);

        let request = session.composed();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "http://localhost:6930/health");
        assert_eq!(request.body, None);
    }

    #[test]
    fn path_and_query_overrides() {
        let mut session = session();
        session.select(EndpointId::ContextGet).unwrap();
        assert_eq!(session.placeholder_warnings().len(), 1);

        session.set_path("api/v1/contexts/ctx-1");
        session.set_query("?verbose=true");

        assert!(session.placeholder_warnings().is_empty());
        assert_eq!(
            session.composed().url,
            "http://localhost:6930/api/v1/contexts/ctx-1?verbose=true"
        );
    }

    #[test]
    fn format_draft_rejects_invalid_json() {
        let mut session = session();
        session.select(EndpointId::Generate).unwrap();
        session.edit_draft("{\"a\":1}");
        assert_eq!(session.format_draft().unwrap(), "{\n  \"a\": 1\n}");

        session.edit_draft("{broken");
        assert!(session.format_draft().is_err());
        assert_eq!(session.editor_text(), "{broken");
    }

    #[tokio::test]
    async fn invalid_body_is_reported_and_not_recorded() {
        let mut session = session();
        session.select(EndpointId::ChatCompletions).unwrap();
        session.edit_draft("{\"model\": ");

        let result = session.send().await;

        assert!(matches!(result, Err(ApplicationError::Send(_))));
        assert!(session.validation_error().is_some());
        assert!(session.history().is_empty());
        assert_eq!(session.response(), None);
    }

    #[tokio::test]
    async fn history_keeps_the_thirty_most_recent_sends() {
        let mut session = session();
        session.select(EndpointId::Health).unwrap();

        for i in 0..31 {
            session.set_query(&format!("n={i}"));
            session.send().await.unwrap();
        }

        let history = session.history();
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.entries()[0].query, "n=30");
        assert!(history.entries().iter().all(|e| e.query != "n=0"));
    }

    #[tokio::test]
    async fn transport_failures_are_recorded() {
        let mut session = session_with(MockHttpClient::failing(
            crate::ports::HttpClientError::ConnectionFailed("unreachable".to_string()),
        ));
        session.send().await.unwrap();

        let response = session.response().unwrap();
        assert_eq!(response.status, 0);
        assert_eq!(response.error.as_deref(), Some("connection failed: unreachable"));
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn stale_responses_do_not_replace_newer_ones() {
        let mut session = session();
        session.select(EndpointId::Health).unwrap();

        let first = session.begin_send().unwrap();
        session.set_query("second=1");
        let second = session.begin_send().unwrap();
        assert!(second.seq > first.seq);

        let sender = session.sender();
        let second_outcome = sender.execute(&second).await.unwrap();
        let first_outcome = sender.execute(&first).await.unwrap();

        assert!(session.complete_send(second.seq, second_outcome));
        assert!(!session.complete_send(first.seq, first_outcome));

        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history().entries()[1].query, "second=1");
        assert_eq!(session.response().unwrap().status, 200);
    }

    #[tokio::test]
    async fn replay_with_catalog_match_switches_endpoint() {
        let mut session = session();
        session.select(EndpointId::Generate).unwrap();
        session.edit_draft(r#"{"prompt":"replayed"}"#);
        session.send().await.unwrap();
        let id = session.history().entries()[0].id.clone();

        session.select(EndpointId::Health).unwrap();
        let target = session.replay(&id).unwrap();

        assert_eq!(target, ReplayTarget::Endpoint(EndpointId::Generate));
        assert_eq!(session.active_endpoint().id, EndpointId::Generate);
        assert_eq!(session.editor_text(), r#"{"prompt":"replayed"}"#);
        assert_eq!(session.response().unwrap().raw, r#"{"ok":true}"#);

        session.select(EndpointId::Health).unwrap();
        session.select(EndpointId::Generate).unwrap();
        assert_eq!(session.editor_text(), r#"{"prompt":"replayed"}"#);
    }

    #[tokio::test]
    async fn replay_without_catalog_match_restores_text_only() {
        let mut session = session();
        session.select(EndpointId::ContextGet).unwrap();
        session.set_path("/api/v1/contexts/ctx-1");
        session.send().await.unwrap();

        session.select(EndpointId::Generate).unwrap();
        let draft_before = session.editor_text().to_string();
        let path_before = session.path().to_string();

        let target = session.replay_nth(0).unwrap();

        assert_eq!(target, ReplayTarget::TextOnly);
        assert_eq!(session.active_endpoint().id, EndpointId::Generate);
        assert_eq!(session.path(), path_before);
        assert_eq!(session.editor_text(), "");
        assert_eq!(session.response().unwrap().status, 200);

        session.select(EndpointId::Health).unwrap();
        session.select(EndpointId::Generate).unwrap();
        assert_eq!(session.editor_text(), draft_before);
    }

    #[tokio::test]
    async fn replay_marks_in_flight_sends_stale() {
        let mut session = session();
        session.send().await.unwrap();
        let pending = session.begin_send().unwrap();

        session.replay_nth(0).unwrap();
        let outcome = session.sender().execute(&pending).await.unwrap();

        assert!(!session.complete_send(pending.seq, outcome));
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn unknown_history_entry() {
        let mut session = session();
        assert!(matches!(
            session.replay("missing"),
            Err(ApplicationError::UnknownHistoryEntry(_))
        ));
    }

    #[tokio::test]
    async fn image_urls_resolve_against_base_url() {
        let mut session = session_with(MockHttpClient::responding(
            200,
            r#"{"images":["/api/v1/images/a.png","http://cdn/b.png"]}"#,
        ));
        session.select(EndpointId::DiffusionGenerate).unwrap();
        session.send().await.unwrap();

        assert_eq!(
            session.image_urls(),
            vec![
                "http://localhost:6930/api/v1/images/a.png".to_string(),
                "http://cdn/b.png".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn end_clears_session_state() {
        let mut session = session();
        session.send().await.unwrap();
        session.end();

        assert!(session.history().is_empty());
        assert_eq!(session.response(), None);
    }
}
