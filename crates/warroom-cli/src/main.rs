//! War Room CLI - register voters into a shared registry from the terminal
//!
//! Every client keeps a local cache and reconciles it with one shared
//! snapshot in a public object store.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;
use warroom_core::config::{AnalysisConfig, SyncConfig};
use warroom_core::models::NewVoteRecord;

use crate::cli::{Cli, Commands};
use crate::commands::actors::run_actors;
use crate::commands::add::{run_add, AddArgs};
use crate::commands::analyze::{run_analyze, AnalyzeArgs};
use crate::commands::card::run_card;
use crate::commands::common::resolve_cache_path;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::export::run_export;
use crate::commands::list::run_list;
use crate::commands::stats::run_stats;
use crate::commands::sync::run_sync;
use crate::commands::watch::run_watch;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warroom=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cache_path = resolve_cache_path(cli.cache_path);

    match cli.command {
        Some(Commands::Add {
            actor,
            name,
            id_number,
            phone,
            no_sync,
            analyze,
        }) => {
            let args = AddArgs {
                draft: NewVoteRecord {
                    actor_id: actor,
                    voter_name: name,
                    id_number,
                    phone_number: phone,
                },
                no_sync,
                analyze,
            };
            let analysis = AnalysisConfig::from_env()?;
            run_add(args, &cache_path, &SyncConfig::from_env()?, analysis.as_ref()).await?;
        }
        Some(Commands::List { limit, json }) => run_list(limit, json, &cache_path)?,
        Some(Commands::Delete { id }) => {
            run_delete(&id, &cache_path, &SyncConfig::from_env()?).await?;
        }
        Some(Commands::Sync) => run_sync(&cache_path, &SyncConfig::from_env()?).await?,
        Some(Commands::Watch) => run_watch(&cache_path, &SyncConfig::from_env()?).await?,
        Some(Commands::Export { format, output }) => {
            run_export(format, output.as_deref(), &cache_path)?;
        }
        Some(Commands::Card { id, output }) => run_card(&id, output.as_deref(), &cache_path)?,
        Some(Commands::Actors { json }) => run_actors(json)?,
        Some(Commands::Stats { json }) => run_stats(json, &cache_path)?,
        Some(Commands::Analyze {
            mode,
            actor,
            metric,
            json,
        }) => {
            let analysis = AnalysisConfig::from_env()?;
            let args = AnalyzeArgs {
                mode,
                actor,
                metric,
                json,
            };
            run_analyze(args, &cache_path, analysis.as_ref()).await?;
        }
        Some(Commands::Config) => {
            let analysis = AnalysisConfig::from_env()?;
            run_config(&cache_path, &SyncConfig::from_env()?, analysis.as_ref());
        }
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
        }
    }

    Ok(())
}
