//! Domain types shared across modules.
//!
//! The cache, the remote classifier, the heuristic classifier and the
//! command layer all speak in these types. Keeping them here avoids
//! circular dependencies between those modules.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Maximum length of a suggestion message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 70;

/// Marker appended to messages cut down to [`MAX_MESSAGE_CHARS`].
const ELLIPSIS: &str = "...";

/// Coarse category of a change, as produced by the heuristic classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentCategory {
    BugFix,
    Feature,
    Refactor,
    Test,
    Documentation,
    Style,
    Chore,
    Update,
}

impl IntentCategory {
    /// Label used in the `intent: message` rendering.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::BugFix => "fix",
            IntentCategory::Feature => "feat",
            IntentCategory::Refactor => "refactor",
            IntentCategory::Test => "test",
            IntentCategory::Documentation => "docs",
            IntentCategory::Style => "style",
            IntentCategory::Chore => "chore",
            IntentCategory::Update => "update",
        }
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File-level statistics computed by whoever produced the diff.
///
/// Both counts are optional; downstream logic treats a missing count the
/// same as an absent summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_files: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed_files: Option<u32>,
}

/// A categorized commit suggestion.
///
/// The remote classifier may return any non-empty intent string, so the
/// intent is kept as text rather than an [`IntentCategory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSuggestion {
    pub intent: String,
    pub message: String,
}

impl CommitSuggestion {
    /// Build a suggestion, fitting the message into [`MAX_MESSAGE_CHARS`].
    pub fn new(intent: impl Into<String>, message: impl AsRef<str>) -> Self {
        Self {
            intent: intent.into(),
            message: fit_message(message.as_ref()),
        }
    }
}

impl fmt::Display for CommitSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.intent, self.message)
    }
}

/// Truncate a message longer than [`MAX_MESSAGE_CHARS`] to 67 characters
/// plus a three character ellipsis.
pub fn fit_message(message: &str) -> String {
    if message.chars().count() <= MAX_MESSAGE_CHARS {
        return message.to_string();
    }
    let keep = MAX_MESSAGE_CHARS - ELLIPSIS.len();
    let mut truncated: String = message.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Normalize diff text before it is hashed or analysed.
pub fn normalize_diff(diff_text: &str) -> &str {
    diff_text.trim()
}

/// SHA-256 digest of normalized diff text, used as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DigestKey(String);

impl DigestKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DigestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the digest of a diff, rendered as 64 lowercase hex characters.
pub fn compute_digest(diff_text: &str) -> DigestKey {
    let mut hasher = Sha256::new();
    hasher.update(normalize_diff(diff_text).as_bytes());
    let result = hasher.finalize();
    DigestKey(format!("{:x}", result))
}
