use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use std::path::Path;
use tracing::{debug, info};

use crate::cache::{CacheEntry, ResultCache};

fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown time".to_string())
}

fn format_entry(entry: &CacheEntry) -> String {
    format!(
        "{}  [{}]  {}: {}",
        format_timestamp(entry.timestamp),
        entry.origin_folder,
        entry.intent,
        entry.message
    )
}

pub fn run_cache_list(cache_dir: &Path, limit: Option<usize>) -> Result<()> {
    let cache = ResultCache::open(cache_dir);
    debug!("Loaded {} cache entries from {}", cache.len(), cache.path().display());
    let entries = cache.snapshot_ordered_by_recency();

    if entries.is_empty() {
        println!("No cached suggestions.");
        return Ok(());
    }

    let shown = limit.unwrap_or(entries.len()).min(entries.len());
    for entry in &entries[..shown] {
        println!("{}", format_entry(entry));
    }
    if shown < entries.len() {
        println!("... and {} more", entries.len() - shown);
    }

    Ok(())
}

pub fn run_cache_clear(cache_dir: &Path) -> Result<()> {
    let mut cache = ResultCache::open(cache_dir);
    let removed = cache.clear();
    info!("Cleared suggestion cache at {}", cache.path().display());

    match removed {
        0 => println!("Cache was already empty."),
        1 => println!("✅ Removed 1 cached suggestion."),
        n => println!("✅ Removed {} cached suggestions.", n),
    }

    Ok(())
}
