use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::api::{ClassifierClient, ClassifierConfig, RetryPolicy, DEFAULT_TIMEOUT_SECS};
use crate::cache::ResultCache;
use crate::cli::{current_folder_name, SuggestArgs};
use crate::domain::{normalize_diff, ChangeSummary};
use crate::source::{open_diff_source, DiffSource};
use crate::suggest::SuggestionEngine;

pub async fn run_suggest(cache_dir: &Path, args: SuggestArgs) -> Result<()> {
    let explicit = ChangeSummary {
        total_files: args.files,
        renamed_files: args.renamed,
    };
    let mut source = open_diff_source(args.diff_file.as_deref(), explicit)?;
    let diff_text = source.diff_text()?;
    if normalize_diff(&diff_text).is_empty() {
        anyhow::bail!("No changes to describe: the diff is empty");
    }
    let summary = source.change_summary();
    debug!("Change summary: {:?}", summary);

    let client = if args.offline {
        ClassifierClient::offline()?
    } else {
        ClassifierClient::new(ClassifierConfig {
            endpoint: args.api_url,
            api_token: args.api_token,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        })?
    };
    if !client.is_configured() {
        debug!("Remote classifier disabled");
    }

    let origin_folder = current_folder_name().unwrap_or_else(|e| {
        debug!("Could not determine folder name: {:#}", e);
        "unknown".to_string()
    });

    let cache = ResultCache::open(cache_dir);
    let mut engine = SuggestionEngine::new(client, cache, origin_folder);
    let suggestion = engine.generate_suggestion(&diff_text, summary.as_ref()).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestion)?);
    } else {
        println!("{}", suggestion);
    }

    Ok(())
}
