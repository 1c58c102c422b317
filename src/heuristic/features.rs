//! Feature extraction from diff text.

use std::collections::HashSet;
use tracing::trace;

use super::patterns::{compiled_rules, is_trivial_line, Scope, Signal};
use crate::domain::{normalize_diff, ChangeSummary};

/// Predicates and counts derived from one diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureVector {
    pub bug_fix: bool,
    pub test_fix: bool,
    pub docs: bool,
    pub test: bool,
    pub config: bool,
    pub dependency: bool,
    pub new_function: bool,
    pub new_class: bool,
    pub new_component: bool,
    pub new_endpoint: bool,
    pub refactor: bool,
    pub moved_code: bool,
    pub style: bool,
    pub whitespace_only: bool,
    pub added_lines: usize,
    pub removed_lines: usize,
}

impl FeatureVector {
    pub fn has_changes(&self) -> bool {
        self.added_lines + self.removed_lines > 0
    }
}

/// One changed line with the file it belongs to
struct ChangedLine<'a> {
    path: Option<&'a str>,
    content: &'a str,
    added: bool,
}

/// Diff text split into file paths and changed lines
#[derive(Default)]
struct ParsedDiff<'a> {
    paths: Vec<&'a str>,
    lines: Vec<ChangedLine<'a>>,
}

fn strip_path_prefix(path: &str) -> &str {
    path.strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path)
}

/// Take the destination path from a `diff --git a/x b/y` header
fn git_header_path(rest: &str) -> Option<&str> {
    match rest.rfind(" b/") {
        Some(idx) => Some(&rest[idx + 3..]),
        None => rest.split_whitespace().last().map(strip_path_prefix),
    }
}

/// Path named by a `---`/`+++` header, if it is not `/dev/null`
fn marker_path(rest: &str) -> Option<&str> {
    // Headers may carry a tab-separated timestamp
    let path = rest.split('\t').next().unwrap_or(rest).trim();
    if path.is_empty() || path == "/dev/null" {
        return None;
    }
    Some(strip_path_prefix(path))
}

fn is_file_marker(line: &str) -> bool {
    line.starts_with("--- a/")
        || line.starts_with("+++ b/")
        || line.starts_with("--- /dev/null")
        || line.starts_with("+++ /dev/null")
}

fn parse(diff_text: &str) -> ParsedDiff<'_> {
    let mut parsed = ParsedDiff::default();
    let mut current: Option<&str> = None;
    let mut in_hunk = false;

    for line in diff_text.lines() {
        if let Some(rest) = line.strip_prefix("diff --git ") {
            in_hunk = false;
            current = git_header_path(rest);
        } else if line.starts_with("diff ") {
            // Plain `diff -ru old new`: the last operand names the new file
            in_hunk = false;
            current = line.split_whitespace().last().map(strip_path_prefix);
        } else if line.starts_with("@@") {
            in_hunk = true;
        } else if (!in_hunk && (line.starts_with("--- ") || line.starts_with("+++ ")))
            || is_file_marker(line)
        {
            in_hunk = false;
            if let Some(path) = marker_path(&line[4..]) {
                // The destination path wins over the source path
                if line.starts_with("+++") || current.is_none() {
                    current = Some(path);
                }
            }
        } else if let Some(content) = line.strip_prefix('+') {
            parsed.lines.push(ChangedLine {
                path: current,
                content,
                added: true,
            });
        } else if let Some(content) = line.strip_prefix('-') {
            parsed.lines.push(ChangedLine {
                path: current,
                content,
                added: false,
            });
        }

        if let Some(path) = current {
            if !parsed.paths.contains(&path) {
                parsed.paths.push(path);
            }
        }
    }

    parsed
}

/// Compute the feature vector for a diff and optional change summary.
pub fn extract(diff_text: &str, summary: Option<&ChangeSummary>) -> FeatureVector {
    let parsed = parse(normalize_diff(diff_text));
    let mut signals: HashSet<Signal> = HashSet::new();

    for compiled in compiled_rules() {
        let fired = match compiled.rule.scope {
            Scope::Path => parsed.paths.iter().any(|path| compiled.matches(path)),
            Scope::AddedLine => parsed
                .lines
                .iter()
                .filter(|line| line.added && compiled.applies_to(line.path))
                .any(|line| compiled.matches(line.content)),
            Scope::ChangedLine => parsed
                .lines
                .iter()
                .filter(|line| compiled.applies_to(line.path))
                .any(|line| compiled.matches(line.content)),
        };
        if fired {
            trace!("Pattern {} raised {:?}", compiled.rule.name, compiled.rule.signal);
            signals.insert(compiled.rule.signal);
        }
    }

    let added_lines = parsed.lines.iter().filter(|line| line.added).count();
    let removed_lines = parsed.lines.len() - added_lines;
    let renamed_files = summary.and_then(|s| s.renamed_files).unwrap_or(0);

    let bug_fix = signals.contains(&Signal::BugVocabulary);
    let test = signals.contains(&Signal::TestFile);

    FeatureVector {
        bug_fix,
        test_fix: bug_fix && test,
        docs: signals.contains(&Signal::DocsFile),
        test,
        config: signals.contains(&Signal::ConfigFile),
        dependency: signals.contains(&Signal::DependencyManifest),
        new_function: signals.contains(&Signal::NewFunction),
        new_class: signals.contains(&Signal::NewClass),
        new_component: signals.contains(&Signal::NewComponent),
        new_endpoint: signals.contains(&Signal::NewEndpoint),
        refactor: signals.contains(&Signal::RefactorVocabulary),
        moved_code: renamed_files > 0 && added_lines > 0 && removed_lines > 0,
        style: signals.contains(&Signal::StyleVocabulary),
        whitespace_only: !parsed.lines.is_empty()
            && parsed.lines.iter().all(|line| is_trivial_line(line.content)),
        added_lines,
        removed_lines,
    }
}
