use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Commitwise - suggest commit messages from diffs
#[derive(Parser)]
#[command(name = "commitwise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the suggestion cache. Defaults to ~/.commitwise
    #[arg(long, global = true, env = "COMMITWISE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Suggest an intent and message for a diff
    Suggest(SuggestArgs),
    /// Inspect or clear cached suggestions
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Read the diff from this file instead of stdin
    #[arg(short = 'f', long)]
    pub diff_file: Option<PathBuf>,

    /// Number of changed files (derived from diff headers if absent)
    #[arg(long)]
    pub files: Option<u32>,

    /// Number of renamed files (derived from diff headers if absent)
    #[arg(long)]
    pub renamed: Option<u32>,

    /// Classification endpoint URL
    #[arg(long, env = "COMMITWISE_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for the classification endpoint
    #[arg(long, env = "COMMITWISE_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Skip the remote classifier and use local heuristics only
    #[arg(long)]
    pub offline: bool,

    /// Print the suggestion as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// List cached suggestions, most recent first
    List {
        /// Show at most this many entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Remove all cached suggestions
    Clear,
}
