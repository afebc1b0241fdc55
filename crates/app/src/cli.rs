//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use snapdeck_domain::{CategoryFilter, ConsoleSettings, EndpointId, SnippetTarget};

/// Interactive console for exploring and replaying SnapLLM API calls.
#[derive(Debug, Parser)]
#[command(name = "snapdeck", version, about)]
pub struct Cli {
    /// Base URL of the SnapLLM server.
    #[arg(long, env = "SNAPDECK_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Model name substituted into request templates.
    #[arg(long, env = "SNAPDECK_MODEL", global = true)]
    pub model: Option<String>,

    /// Settings file to read instead of the platform default.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// What to run; defaults to the console.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands. Without one the interactive console starts.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Start the interactive console.
    Console,

    /// Print the endpoint catalog.
    Catalog {
        /// Category to show, or `all`.
        #[arg(long, default_value = "all")]
        category: CategoryFilter,

        /// Case-insensitive text to look for in name, path or description.
        #[arg(long, default_value = "")]
        search: String,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print a snippet for an endpoint's template request.
    Snippet {
        /// Endpoint key, as shown by `catalog`.
        endpoint: EndpointId,

        /// `curl`, `python` or `fetch`.
        #[arg(long)]
        target: Option<SnippetTarget>,

        /// Path to use instead of the endpoint's.
        #[arg(long)]
        path: Option<String>,

        /// Query string to append.
        #[arg(long, default_value = "")]
        query: String,
    },
}

impl Cli {
    /// Applies flag and environment overrides on top of file settings.
    #[must_use]
    pub fn apply(&self, mut settings: ConsoleSettings) -> ConsoleSettings {
        if let Some(base_url) = &self.base_url {
            settings.base_url.clone_from(base_url);
        }
        if let Some(model) = &self.model {
            settings.model_hint.clone_from(model);
        }
        settings
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use snapdeck_domain::EndpointCategory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_file_settings() {
        let cli = Cli::try_parse_from([
            "snapdeck",
            "--base-url",
            "http://gpu-box:6930",
            "--model",
            "llama-7b",
        ])
        .unwrap();

        let settings = cli.apply(ConsoleSettings::default());

        assert_eq!(settings.base_url, "http://gpu-box:6930");
        assert_eq!(settings.model_hint, "llama-7b");
        assert_eq!(cli.command, None);
    }

    #[test]
    fn flag_replaces_an_invalid_file_base_url() {
        let file = ConsoleSettings {
            base_url: "ftp://example.com".to_string(),
            ..ConsoleSettings::default()
        };
        let cli = Cli::try_parse_from(["snapdeck", "--base-url", "http://gpu-box:6930"]).unwrap();

        let settings = cli.apply(file);

        assert_eq!(settings.base_url, "http://gpu-box:6930");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn catalog_subcommand_parses_category() {
        let cli =
            Cli::try_parse_from(["snapdeck", "catalog", "--category", "vision", "--json"]).unwrap();

        assert_eq!(
            cli.command,
            Some(Command::Catalog {
                category: CategoryFilter::Only(EndpointCategory::Vision),
                search: String::new(),
                json: true,
            })
        );
    }

    #[test]
    fn snippet_subcommand_rejects_unknown_endpoint() {
        assert!(Cli::try_parse_from(["snapdeck", "snippet", "nope"]).is_err());

        let cli = Cli::try_parse_from(["snapdeck", "snippet", "generate", "--target", "python"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Snippet {
                endpoint: EndpointId::Generate,
                target: Some(SnippetTarget::ScriptHttpClient),
                ..
            })
        ));
    }
}
