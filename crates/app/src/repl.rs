//! Line-editing loop around the console.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use snapdeck_application::{Clock, HttpClient};

use crate::commands::{self, BodyArg, ReplCommand};
use crate::console::{Console, Reply};

/// Interactive read-eval-print loop.
///
/// Reading blocks, so each line is read on the blocking pool while sends
/// keep running. Responses that arrived meanwhile print before the next
/// prompt.
pub struct Repl<C: HttpClient, K: Clock> {
    editor: Option<DefaultEditor>,
    console: Console<C, K>,
}

impl<C: HttpClient + 'static, K: Clock + 'static> Repl<C, K> {
    /// Creates the loop with a fresh line editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be set up.
    pub fn new(console: Console<C, K>) -> Result<Self, ReadlineError> {
        Ok(Self {
            editor: Some(DefaultEditor::new()?),
            console,
        })
    }

    /// Reads and runs commands until `quit`, Ctrl-C or Ctrl-D.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    pub async fn run(&mut self) -> Result<(), ReadlineError> {
        println!(
            "SnapDeck {} on {}. Type 'help' for commands.",
            env!("CARGO_PKG_VERSION"),
            self.console.session().base_url()
        );

        loop {
            for reply in self.console.drain() {
                print_reply(&reply);
            }

            let Some(line) = self.read_line(self.console.prompt(), true).await? else {
                break;
            };

            let command = match commands::parse(&line) {
                Ok(ReplCommand::Body(BodyArg::Multiline)) if self.console.accepts_body() => {
                    match self.read_multiline().await? {
                        Some(text) => ReplCommand::Body(BodyArg::Set(text)),
                        None => continue,
                    }
                }
                Ok(command) => command,
                Err(e) => {
                    eprintln!("error: {e}");
                    continue;
                }
            };

            let reply = self.console.execute(command).await;
            if reply == Reply::Quit {
                break;
            }
            print_reply(&reply);
        }

        self.console.end();
        Ok(())
    }

    /// Reads one line on the blocking pool; `None` on Ctrl-C or Ctrl-D.
    async fn read_line(
        &mut self,
        prompt: String,
        remember: bool,
    ) -> Result<Option<String>, ReadlineError> {
        let Some(mut editor) = self.editor.take() else {
            return Ok(None);
        };

        let (editor, line) = tokio::task::spawn_blocking(move || {
            let line = editor.readline(&prompt);
            if let Ok(line) = &line
                && remember
                && !line.trim().is_empty()
            {
                let _ = editor.add_history_entry(line.as_str());
            }
            (editor, line)
        })
        .await
        .map_err(|e| ReadlineError::Io(std::io::Error::other(e)))?;
        self.editor = Some(editor);

        match line {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Collects lines until one holding only `.`; `None` if interrupted.
    async fn read_multiline(&mut self) -> Result<Option<String>, ReadlineError> {
        let mut lines = Vec::new();
        loop {
            match self.read_line("... ".to_string(), false).await? {
                Some(line) if line.trim() == "." => return Ok(Some(lines.join("\n"))),
                Some(line) => lines.push(line),
                None => return Ok(None),
            }
        }
    }
}

fn print_reply(reply: &Reply) {
    if let Reply::Text(text) = reply {
        println!("{text}");
    }
}
