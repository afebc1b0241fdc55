//! Console command parsing.

use snapdeck_domain::{CategoryFilter, DomainError, EndpointId, SnippetTarget};
use thiserror::Error;

/// Help text printed by `help`.
pub const HELP: &str = "\
Commands:
  list [category] [search]   List endpoints (category: all, health, config, models,
                             inference, vision, diffusion, contexts)
  counts                     Endpoint count per category
  use <endpoint>             Select an endpoint by key
  show                       Show the request that would be sent
  body                       Print the body draft
  body <json>                Replace the body draft
  body <<                    Enter a multi-line body, end with a line holding '.'
  reset                      Restore the endpoint's template body
  format                     Pretty-print the body draft
  path [path]                Set the request path (no argument restores the default)
  query [query]              Set the query string (no argument clears it)
  send                       Send the request in the background
  wait                       Wait for outstanding sends and show their responses
  images                     List image URLs found in the last response
  history                    List recent requests
  replay <n|id>              Restore a history entry (1 is the most recent)
  clear-history              Forget all history entries
  snippet [curl|python|fetch] Print the request as code
  model [name]               Show or change the model used by new drafts
  help                       Show this help
  quit                       Leave the console";

/// How the body command was invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyArg {
    /// Print the draft.
    Show,
    /// Replace the draft with inline text.
    Set(String),
    /// Read the draft from the following lines.
    Multiline,
}

/// A history entry reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRef {
    /// 1-based position, newest first.
    Position(usize),
    /// Entry id.
    Id(String),
}

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Blank line.
    Empty,
    /// `list`
    List {
        /// Category filter.
        category: CategoryFilter,
        /// Search term.
        search: String,
    },
    /// `counts`
    Counts,
    /// `use`
    Use(EndpointId),
    /// `show`
    Show,
    /// `body`
    Body(BodyArg),
    /// `reset`
    Reset,
    /// `format`
    Format,
    /// `path`; `None` restores the endpoint's path.
    Path(Option<String>),
    /// `query`
    Query(String),
    /// `send`
    Send,
    /// `wait`
    Wait,
    /// `images`
    Images,
    /// `history`
    History,
    /// `replay`
    Replay(EntryRef),
    /// `clear-history`
    ClearHistory,
    /// `snippet`
    Snippet(Option<SnippetTarget>),
    /// `model`
    Model(Option<String>),
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Errors raised while parsing a command line.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command word is not known.
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    /// A required argument is missing.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// An argument could not be parsed.
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Parses one console line.
///
/// # Errors
///
/// Returns an error for unknown commands or malformed arguments.
pub fn parse(line: &str) -> Result<ReplCommand, CommandError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    let command = match word.to_lowercase().as_str() {
        "" => ReplCommand::Empty,
        "list" | "ls" => parse_list(rest),
        "counts" => ReplCommand::Counts,
        "use" | "select" => {
            let key = arg.ok_or(CommandError::Usage("use <endpoint>"))?;
            ReplCommand::Use(key.parse()?)
        }
        "show" => ReplCommand::Show,
        "body" => ReplCommand::Body(match rest {
            "" => BodyArg::Show,
            "<<" => BodyArg::Multiline,
            text => BodyArg::Set(text.to_string()),
        }),
        "reset" => ReplCommand::Reset,
        "format" | "fmt" => ReplCommand::Format,
        "path" => ReplCommand::Path(arg),
        "query" => ReplCommand::Query(rest.to_string()),
        "send" => ReplCommand::Send,
        "wait" => ReplCommand::Wait,
        "images" => ReplCommand::Images,
        "history" => ReplCommand::History,
        "replay" => {
            let entry = arg.ok_or(CommandError::Usage("replay <n|id>"))?;
            ReplCommand::Replay(match entry.parse::<usize>() {
                Ok(position) if position > 0 => EntryRef::Position(position),
                Ok(_) => return Err(CommandError::Usage("replay <n|id>, n starts at 1")),
                Err(_) => EntryRef::Id(entry),
            })
        }
        "clear-history" => ReplCommand::ClearHistory,
        "snippet" => ReplCommand::Snippet(arg.map(|t| t.parse()).transpose()?),
        "model" => ReplCommand::Model(arg),
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

/// `list [category] [search]`: the first word is a category only if it
/// names one.
fn parse_list(rest: &str) -> ReplCommand {
    let (first, tail) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(first, tail)| (first, tail.trim()));

    match first.parse::<CategoryFilter>() {
        Ok(category) => ReplCommand::List {
            category,
            search: tail.to_string(),
        },
        Err(_) => ReplCommand::List {
            category: CategoryFilter::All,
            search: rest.to_string(),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use snapdeck_domain::EndpointCategory;

    #[test]
    fn blank_lines_are_empty() {
        assert_eq!(parse("   ").unwrap(), ReplCommand::Empty);
    }

    #[test]
    fn list_with_category_and_search() {
        assert_eq!(
            parse("list inference chat").unwrap(),
            ReplCommand::List {
                category: CategoryFilter::Only(EndpointCategory::Inference),
                search: "chat".to_string(),
            }
        );
        assert_eq!(
            parse("list context cache").unwrap(),
            ReplCommand::List {
                category: CategoryFilter::All,
                search: "context cache".to_string(),
            }
        );
        assert_eq!(
            parse("list").unwrap(),
            ReplCommand::List {
                category: CategoryFilter::All,
                search: String::new(),
            }
        );
    }

    #[test]
    fn use_requires_a_known_endpoint() {
        assert_eq!(
            parse("use chat_completions").unwrap(),
            ReplCommand::Use(EndpointId::ChatCompletions)
        );
        assert!(matches!(parse("use"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("use nope"), Err(CommandError::Invalid(_))));
    }

    #[test]
    fn body_variants() {
        assert_eq!(parse("body").unwrap(), ReplCommand::Body(BodyArg::Show));
        assert_eq!(parse("body <<").unwrap(), ReplCommand::Body(BodyArg::Multiline));
        assert_eq!(
            parse(r#"body {"prompt": "a b"}"#).unwrap(),
            ReplCommand::Body(BodyArg::Set(r#"{"prompt": "a b"}"#.to_string()))
        );
    }

    #[test]
    fn path_and_query() {
        assert_eq!(parse("path").unwrap(), ReplCommand::Path(None));
        assert_eq!(
            parse("path /api/v1/contexts/abc").unwrap(),
            ReplCommand::Path(Some("/api/v1/contexts/abc".to_string()))
        );
        assert_eq!(parse("query").unwrap(), ReplCommand::Query(String::new()));
    }

    #[test]
    fn replay_by_position_or_id() {
        assert_eq!(
            parse("replay 2").unwrap(),
            ReplCommand::Replay(EntryRef::Position(2))
        );
        assert_eq!(
            parse("replay 0190-abc").unwrap(),
            ReplCommand::Replay(EntryRef::Id("0190-abc".to_string()))
        );
        assert!(matches!(parse("replay 0"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn snippet_target_is_optional() {
        assert_eq!(parse("snippet").unwrap(), ReplCommand::Snippet(None));
        assert_eq!(
            parse("snippet fetch").unwrap(),
            ReplCommand::Snippet(Some(SnippetTarget::BrowserFetch))
        );
        assert!(parse("snippet cobol").is_err());
    }

    #[test]
    fn unknown_commands() {
        assert!(matches!(parse("launch"), Err(CommandError::Unknown(w)) if w == "launch"));
        assert_eq!(parse("QUIT").unwrap(), ReplCommand::Quit);
        assert_eq!(parse("wait").unwrap(), ReplCommand::Wait);
    }
}
