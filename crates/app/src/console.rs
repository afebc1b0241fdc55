//! Executes parsed commands against a console session.
//!
//! `send` dispatches in the background and returns at once, so the
//! operator keeps editing while a request is outstanding. Completions come
//! back over a channel and are applied by [`Console::drain`] or
//! [`Console::wait`].

use chrono::Utc;
use snapdeck_application::{
    ApplicationError, Clock, ConsoleSession, HttpClient, ReplayTarget, SendOutcome,
    SendRequestError,
};
use snapdeck_domain::SnippetTarget;
use snapdeck_infrastructure::CodeGenerator;
use tokio::sync::mpsc;

use crate::commands::{BodyArg, EntryRef, HELP, ReplCommand};
use crate::render;

/// What the console prints after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text for the operator.
    Text(String),
    /// Nothing to print.
    Silent,
    /// Leave the console.
    Quit,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

type Completion = (u64, Result<SendOutcome, SendRequestError>);

/// Command executor wrapping one session.
pub struct Console<C: HttpClient, K: Clock> {
    session: ConsoleSession<C, K>,
    snippet_target: SnippetTarget,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl<C: HttpClient + 'static, K: Clock + 'static> Console<C, K> {
    /// Creates a console over `session`.
    pub fn new(session: ConsoleSession<C, K>, snippet_target: SnippetTarget) -> Self {
        let (completions_tx, completions) = mpsc::unbounded_channel();
        Self {
            session,
            snippet_target,
            completions_tx,
            completions,
            in_flight: 0,
        }
    }

    /// The underlying session.
    pub const fn session(&self) -> &ConsoleSession<C, K> {
        &self.session
    }

    /// Sends dispatched but not yet applied.
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Whether the active endpoint sends a body.
    pub const fn accepts_body(&self) -> bool {
        self.session.active_endpoint().method.carries_body()
    }

    /// Prompt showing the active endpoint and outstanding sends.
    pub fn prompt(&self) -> String {
        let id = self.session.active_endpoint().id;
        match self.in_flight {
            0 => format!("{id}> "),
            n => format!("{id} [{n} pending]> "),
        }
    }

    /// Ends the session, dropping drafts and history.
    pub fn end(&mut self) {
        self.session.end();
    }

    /// Runs one command.
    pub async fn execute(&mut self, command: ReplCommand) -> Reply {
        match command {
            ReplCommand::Empty => Reply::Silent,
            ReplCommand::List { category, search } => {
                let endpoints = self.session.catalog().filter(category, &search);
                Reply::Text(render::catalog_table(&endpoints))
            }
            ReplCommand::Counts => Reply::Text(render::category_counts(
                &self.session.catalog().counts_by_category(),
            )),
            ReplCommand::Use(id) => match self.session.select(id) {
                Ok(_) => self.preview(),
                Err(e) => Reply::Text(e.to_string()),
            },
            ReplCommand::Show => self.preview(),
            ReplCommand::Body(arg) => self.body(arg),
            ReplCommand::Reset => Reply::text(self.session.reset_draft()),
            ReplCommand::Format => match self.session.format_draft() {
                Ok(text) => Reply::text(text),
                Err(e) => Reply::Text(render::validation_error(&e.to_string())),
            },
            ReplCommand::Path(path) => {
                let path = path.unwrap_or_else(|| self.session.active_endpoint().path.to_string());
                self.session.set_path(&path);
                self.warnings()
            }
            ReplCommand::Query(query) => {
                self.session.set_query(&query);
                Reply::Silent
            }
            ReplCommand::Send => self.send(),
            ReplCommand::Wait => self.wait().await,
            ReplCommand::Images => self.images(),
            ReplCommand::History => Reply::Text(render::history(
                self.session.history().entries(),
                Utc::now(),
            )),
            ReplCommand::Replay(entry) => self.replay(entry),
            ReplCommand::ClearHistory => {
                self.session.clear_history();
                Reply::text("History cleared.")
            }
            ReplCommand::Snippet(target) => {
                let target = target.unwrap_or(self.snippet_target);
                let snippet = CodeGenerator::new(target).generate_for(&self.session.composed());
                Reply::Text(snippet.full_code())
            }
            ReplCommand::Model(None) => Reply::text(self.session.model_hint()),
            ReplCommand::Model(Some(hint)) => {
                self.session.set_model_hint(hint);
                Reply::text("Model updated; use 'reset' to apply it to an existing draft.")
            }
            ReplCommand::Help => Reply::text(HELP),
            ReplCommand::Quit => Reply::Quit,
        }
    }

    /// Applies every completion that has already arrived.
    pub fn drain(&mut self) -> Vec<Reply> {
        let mut replies = Vec::new();
        while let Ok((seq, result)) = self.completions.try_recv() {
            replies.push(self.complete(seq, result));
        }
        replies
    }

    /// Waits until every outstanding send has completed.
    pub async fn wait(&mut self) -> Reply {
        let mut replies: Vec<String> = self
            .drain()
            .into_iter()
            .filter_map(|reply| match reply {
                Reply::Text(text) => Some(text),
                _ => None,
            })
            .collect();

        while self.in_flight > 0 {
            let Some((seq, result)) = self.completions.recv().await else {
                break;
            };
            if let Reply::Text(text) = self.complete(seq, result) {
                replies.push(text);
            }
        }

        if replies.is_empty() {
            Reply::text("No sends outstanding.")
        } else {
            Reply::Text(replies.join("\n\n"))
        }
    }

    fn preview(&self) -> Reply {
        Reply::Text(render::request_preview(
            self.session.active_endpoint(),
            &self.session.composed(),
            &self.session.placeholder_warnings(),
        ))
    }

    fn warnings(&self) -> Reply {
        let warnings = self.session.placeholder_warnings();
        if warnings.is_empty() {
            return Reply::Silent;
        }
        Reply::Text(
            warnings
                .iter()
                .map(|w| format!("warning: {w}"))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    fn body(&mut self, arg: BodyArg) -> Reply {
        if !self.accepts_body() {
            let method = self.session.active_endpoint().method;
            return match arg {
                BodyArg::Show => Reply::Text(format!("(no body: {method})")),
                BodyArg::Set(_) | BodyArg::Multiline => Reply::Text(format!(
                    "{method} requests are sent without a body; the draft was not changed."
                )),
            };
        }
        match arg {
            BodyArg::Show if self.session.editor_text().is_empty() => Reply::text("(empty body)"),
            BodyArg::Show => Reply::text(self.session.editor_text()),
            BodyArg::Set(text) => {
                self.session.edit_draft(text);
                Reply::Silent
            }
            BodyArg::Multiline => Reply::text("multi-line bodies need an interactive console"),
        }
    }

    fn send(&mut self) -> Reply {
        let pending = match self.session.begin_send() {
            Ok(pending) => pending,
            Err(ApplicationError::Send(e)) => {
                return Reply::Text(render::validation_error(&e.to_string()));
            }
            Err(e) => return Reply::Text(e.to_string()),
        };

        let seq = pending.seq;
        let line = format!("Sent #{seq}: {} {}", pending.request.method, pending.request.url);
        let sender = self.session.sender();
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = sender.execute(&pending).await;
            if completions.send((pending.seq, result)).is_err() {
                tracing::debug!(seq = pending.seq, "console closed before the response arrived");
            }
        });
        self.in_flight += 1;
        Reply::Text(line)
    }

    fn complete(&mut self, seq: u64, result: Result<SendOutcome, SendRequestError>) -> Reply {
        self.in_flight = self.in_flight.saturating_sub(1);
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                self.session.record_validation_error(e.to_string());
                return Reply::Text(render::validation_error(&e.to_string()));
            }
        };

        if !self.session.complete_send(seq, outcome) {
            return Reply::Text(format!(
                "#{seq} finished after a newer response; it is in history only."
            ));
        }
        let Some(state) = self.session.response() else {
            return Reply::Silent;
        };
        let mut text = format!("#{seq} {}", render::response(state));
        let images = self.session.image_urls().len();
        if images > 0 {
            text.push_str(&format!("\n\n{images} image(s) found, type 'images' to list"));
        }
        Reply::Text(text)
    }

    fn images(&self) -> Reply {
        let urls = self.session.image_urls();
        if urls.is_empty() {
            return Reply::text("No images in the last response.");
        }
        Reply::Text(urls.join("\n"))
    }

    fn replay(&mut self, entry: EntryRef) -> Reply {
        let result = match entry {
            EntryRef::Position(n) => self.session.replay_nth(n - 1),
            EntryRef::Id(id) => self.session.replay(&id),
        };
        match result {
            Ok(target) => {
                let restored = match target {
                    ReplayTarget::Endpoint(id) => format!("Restored {id}."),
                    ReplayTarget::TextOnly => {
                        "Restored body and response; no endpoint matches that route.".to_string()
                    }
                };
                let response = self
                    .session
                    .response()
                    .map(render::response)
                    .unwrap_or_default();
                Reply::Text(format!("{restored}\n{response}"))
            }
            Err(e) => Reply::Text(e.to_string()),
        }
    }
}
