//! Where diff text and change summaries come from.
//!
//! The suggestion pipeline never talks to version control. The command
//! layer hands it text read from a file or stdin, plus file counts
//! either passed on the command line or derived from the diff headers.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::domain::ChangeSummary;

/// Supplies the diff to classify and optional file statistics
pub trait DiffSource {
    fn diff_text(&mut self) -> Result<String>;
    fn change_summary(&self) -> Option<ChangeSummary>;
}

/// Derive file and rename counts from per-file diff headers.
///
/// Returns `None` when the text has no `diff --git` headers.
pub fn summarize_diff(diff_text: &str) -> Option<ChangeSummary> {
    let mut files = HashSet::new();
    let mut renamed = 0u32;

    for line in diff_text.lines() {
        if let Some(rest) = line.strip_prefix("diff --git ") {
            files.insert(rest);
        } else if line.starts_with("rename to ") {
            renamed += 1;
        }
    }

    if files.is_empty() {
        return None;
    }
    Some(ChangeSummary {
        total_files: Some(files.len() as u32),
        renamed_files: Some(renamed),
    })
}

/// Reads the whole diff from any reader, once.
pub struct ReaderSource<R> {
    reader: R,
    text: Option<String>,
    explicit: ChangeSummary,
}

impl<R: Read> ReaderSource<R> {
    /// Counts in `explicit` take precedence over ones derived from the diff
    pub fn new(reader: R, explicit: ChangeSummary) -> Self {
        Self {
            reader,
            text: None,
            explicit,
        }
    }
}

impl<R: Read> DiffSource for ReaderSource<R> {
    fn diff_text(&mut self) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        let mut text = String::new();
        self.reader
            .read_to_string(&mut text)
            .context("Failed to read diff text")?;
        self.text = Some(text.clone());
        Ok(text)
    }

    fn change_summary(&self) -> Option<ChangeSummary> {
        let derived = self.text.as_deref().and_then(summarize_diff);
        let merged = ChangeSummary {
            total_files: self
                .explicit
                .total_files
                .or_else(|| derived.and_then(|d| d.total_files)),
            renamed_files: self
                .explicit
                .renamed_files
                .or_else(|| derived.and_then(|d| d.renamed_files)),
        };
        (merged != ChangeSummary::default()).then_some(merged)
    }
}

/// Open a diff file, or stdin when no path is given
pub fn open_diff_source(
    path: Option<&Path>,
    explicit: ChangeSummary,
) -> Result<ReaderSource<Box<dyn Read>>> {
    let reader: Box<dyn Read> = match path {
        Some(path) => Box::new(
            File::open(path)
                .with_context(|| format!("Failed to open diff file: {}", path.display()))?,
        ),
        None => Box::new(io::stdin()),
    };
    Ok(ReaderSource::new(reader, explicit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const RENAME_DIFF: &str = "\
diff --git a/src/a.rs b/src/b.rs
similarity index 95%
rename from src/a.rs
rename to src/b.rs
diff --git a/README.md b/README.md
--- a/README.md
+++ b/README.md
@@ -1 +1 @@
-x
+y
";

    #[test]
    fn test_summarize_diff() {
        let summary = summarize_diff(RENAME_DIFF).unwrap();
        assert_eq!(summary.total_files, Some(2));
        assert_eq!(summary.renamed_files, Some(1));

        assert!(summarize_diff("+just a line").is_none());
    }

    #[test]
    fn test_reader_source_derives_summary() {
        let mut source = ReaderSource::new(Cursor::new(RENAME_DIFF), ChangeSummary::default());
        assert!(source.change_summary().is_none()); // nothing read yet

        assert_eq!(source.diff_text().unwrap(), RENAME_DIFF);
        assert_eq!(
            source.change_summary(),
            Some(ChangeSummary {
                total_files: Some(2),
                renamed_files: Some(1),
            })
        );

        // Second read is served from memory
        assert_eq!(source.diff_text().unwrap(), RENAME_DIFF);
    }

    #[test]
    fn test_explicit_counts_win() {
        let explicit = ChangeSummary {
            total_files: Some(7),
            renamed_files: None,
        };
        let mut source = ReaderSource::new(Cursor::new(RENAME_DIFF), explicit);
        source.diff_text().unwrap();

        let summary = source.change_summary().unwrap();
        assert_eq!(summary.total_files, Some(7));
        assert_eq!(summary.renamed_files, Some(1));
    }

    #[test]
    fn test_headerless_text_has_no_summary() {
        let mut source = ReaderSource::new(Cursor::new("+x\n-y"), ChangeSummary::default());
        source.diff_text().unwrap();
        assert!(source.change_summary().is_none());
    }

    #[test]
    fn test_open_diff_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("change.diff");
        std::fs::write(&path, RENAME_DIFF).unwrap();

        let mut source = open_diff_source(Some(&path), ChangeSummary::default()).unwrap();
        assert_eq!(source.diff_text().unwrap(), RENAME_DIFF);

        let missing = tmp.path().join("missing.diff");
        assert!(open_diff_source(Some(&missing), ChangeSummary::default()).is_err());
    }
}
