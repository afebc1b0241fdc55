//! SnapDeck - Main Entry Point
//!
//! Loads settings, then runs the interactive console or one of the
//! one-shot subcommands.

mod cli;
mod commands;
mod console;
mod render;
mod repl;

use std::sync::Arc;

use clap::Parser;
use snapdeck_application::{ConsoleSession, SendRequest};
use snapdeck_domain::{EndpointCatalog, RequestComposer, SnippetTarget, template_text};
use snapdeck_infrastructure::{
    CodeGenerator, ReqwestHttpClient, SettingsRepository, SystemClock, to_json_stable,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::console::Console;
use crate::repl::Repl;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let repository = cli
        .config
        .as_ref()
        .map_or_else(SettingsRepository::new, |path| SettingsRepository::with_path(path.clone()));
    let settings = cli.apply(repository.load().await?);
    settings.validate()?;

    let catalog = EndpointCatalog::builtin();

    match cli.command.clone().unwrap_or(Command::Console) {
        Command::Console => {
            tracing::info!(base_url = %settings.base_url, "starting console");
            let sender = SendRequest::new(
                Arc::new(ReqwestHttpClient::new()?),
                Arc::new(SystemClock::new()),
            );
            let session =
                ConsoleSession::new(catalog, &settings.base_url, &settings.model_hint, sender)?;
            let mut repl = Repl::new(Console::new(session, settings.snippet_target))?;
            repl.run().await?;
        }
        Command::Catalog {
            category,
            search,
            json,
        } => {
            let endpoints = catalog.filter(category, &search);
            if json {
                print!("{}", to_json_stable(&endpoints)?);
            } else {
                println!("{}", render::catalog_table(&endpoints));
            }
        }
        Command::Snippet {
            endpoint,
            target,
            path,
            query,
        } => {
            let endpoint = catalog.get(endpoint).ok_or_else(|| {
                snapdeck_domain::DomainError::UnknownEndpoint(endpoint.to_string())
            })?;
            let request = RequestComposer::new(&settings.base_url).compose(
                endpoint.method,
                path.as_deref().unwrap_or(endpoint.path),
                &query,
                &template_text(endpoint.id, &settings.model_hint),
            );
            let target: SnippetTarget = target.unwrap_or(settings.snippet_target);
            println!("{}", CodeGenerator::new(target).generate_for(&request).full_code());
        }
    }

    Ok(())
}
