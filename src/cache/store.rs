//! Suggestion cache keyed by diff digest.
//!
//! Entries are persisted as one pretty-printed JSON array in
//! `<cache_dir>/cache.json`, loaded once per process and rewritten after
//! every mutation.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::domain::{CommitSuggestion, DigestKey};

/// Name of the cache file inside the cache directory
pub const CACHE_FILE_NAME: &str = "cache.json";

/// Entries older than this are treated as absent (30 days)
pub const CACHE_TTL_MILLIS: i64 = 30 * 24 * 60 * 60 * 1000;

/// A previously produced suggestion for one diff digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub digest: String,
    pub intent: String,
    pub message: String,
    /// Creation time (milliseconds since epoch)
    pub timestamp: i64,
    /// Name of the working directory the suggestion was produced in
    pub origin_folder: String,
}

impl CacheEntry {
    pub fn suggestion(&self) -> CommitSuggestion {
        CommitSuggestion {
            intent: self.intent.clone(),
            message: self.message.clone(),
        }
    }

    fn is_expired(&self, now: i64) -> bool {
        now.saturating_sub(self.timestamp) > CACHE_TTL_MILLIS
    }
}

/// Current time in milliseconds since epoch
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// File-backed result cache.
///
/// One instance owns the in-memory map for the lifetime of the process.
/// Persistence failures are logged and swallowed; they never reach callers.
pub struct ResultCache {
    path: PathBuf,
    entries: HashMap<String, CacheEntry>,
}

impl ResultCache {
    /// Open the cache stored in `cache_dir`.
    ///
    /// A missing, unreadable or corrupt file yields an empty cache.
    pub fn open(cache_dir: &Path) -> Self {
        Self::open_at(cache_dir, now_millis())
    }

    pub(super) fn open_at(cache_dir: &Path, now: i64) -> Self {
        let path = cache_dir.join(CACHE_FILE_NAME);
        let stored = match read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to load suggestion cache, starting empty: {:#}", e);
                Vec::new()
            }
        };

        let loaded = stored.len();
        let entries: HashMap<String, CacheEntry> = stored
            .into_iter()
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| (entry.digest.clone(), entry))
            .collect();

        let cache = Self { path, entries };
        if cache.entries.len() < loaded {
            debug!(
                "Dropped {} expired cache entries on load",
                loaded - cache.entries.len()
            );
            cache.persist();
        }
        cache
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up the entry for a digest, evicting it if it has expired.
    pub fn lookup(&mut self, digest: &DigestKey) -> Option<CacheEntry> {
        self.lookup_at(digest, now_millis())
    }

    pub(super) fn lookup_at(&mut self, digest: &DigestKey, now: i64) -> Option<CacheEntry> {
        let expired = self.entries.get(digest.as_str())?.is_expired(now);
        if expired {
            debug!("Evicting expired cache entry {}", digest);
            self.entries.remove(digest.as_str());
            self.persist();
            return None;
        }
        self.entries.get(digest.as_str()).cloned()
    }

    /// Create or replace the entry for a digest.
    pub fn store(&mut self, digest: &DigestKey, intent: &str, message: &str, origin_folder: &str) {
        self.store_at(digest, intent, message, origin_folder, now_millis());
    }

    pub(super) fn store_at(
        &mut self,
        digest: &DigestKey,
        intent: &str,
        message: &str,
        origin_folder: &str,
        now: i64,
    ) {
        let entry = CacheEntry {
            digest: digest.as_str().to_string(),
            intent: intent.to_string(),
            message: message.to_string(),
            timestamp: now,
            origin_folder: origin_folder.to_string(),
        };
        self.entries.insert(entry.digest.clone(), entry);
        self.persist();
    }

    /// Remove every entry, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.persist();
        removed
    }

    /// All live entries, in no particular order.
    #[allow(dead_code)]
    pub fn snapshot(&self) -> Vec<CacheEntry> {
        self.snapshot_at(now_millis())
    }

    pub(super) fn snapshot_at(&self, now: i64) -> Vec<CacheEntry> {
        self.entries
            .values()
            .filter(|entry| !entry.is_expired(now))
            .cloned()
            .collect()
    }

    /// All live entries, most recent first.
    pub fn snapshot_ordered_by_recency(&self) -> Vec<CacheEntry> {
        self.snapshot_ordered_by_recency_at(now_millis())
    }

    pub(super) fn snapshot_ordered_by_recency_at(&self, now: i64) -> Vec<CacheEntry> {
        let mut entries = self.snapshot_at(now);
        sort_by_recency(&mut entries);
        entries
    }

    /// Number of entries held in memory
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!("Failed to save suggestion cache: {:#}", e);
        }
    }

    fn save(&self) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let mut entries: Vec<CacheEntry> = self.entries.values().cloned().collect();
        sort_by_recency(&mut entries);
        let content = serde_json::to_string_pretty(&entries)
            .context("Failed to serialize suggestion cache")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write suggestion cache to {}", self.path.display()))
    }
}

fn read_entries(path: &Path) -> Result<Vec<CacheEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read suggestion cache from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse suggestion cache from {}", path.display()))
}

fn sort_by_recency(entries: &mut [CacheEntry]) {
    entries.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.digest.cmp(&b.digest))
    });
}
