use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod api;
mod cache;
mod cli;
mod command;
mod domain;
mod heuristic;
mod source;
mod suggest;

use cli::{resolve_cache_dir, CacheAction, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Suggest(args)) => {
            let cache_dir = resolve_cache_dir(cli.cache_dir)?;
            command::run_suggest(&cache_dir, args).await?;
        }
        Some(Commands::Cache { action }) => {
            let cache_dir = resolve_cache_dir(cli.cache_dir)?;
            match action {
                CacheAction::List { limit } => command::run_cache_list(&cache_dir, limit)?,
                CacheAction::Clear => command::run_cache_clear(&cache_dir)?,
            }
        }
        None => {
            // No command specified, show help
            eprintln!("No command specified. Use --help for usage information.");
            eprintln!("Use 'git diff | commitwise suggest' to get a commit message suggestion.");
        }
    }

    Ok(())
}
