//! Category precedence and message templates.

use super::features::FeatureVector;
use crate::domain::{ChangeSummary, IntentCategory};

/// The sub-signal that decided the category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    NoChanges,
    TestFix,
    BugFix,
    Tests,
    Docs,
    RefactorVocabulary,
    MovedCode,
    RemovalHeavy,
    NewEndpoint,
    NewComponent,
    NewClass,
    NewFunction,
    Dependency,
    Config,
    WhitespaceOnly,
    StyleVocabulary,
    General,
}

impl Trigger {
    pub fn category(&self) -> IntentCategory {
        match self {
            Trigger::TestFix | Trigger::BugFix => IntentCategory::BugFix,
            Trigger::Tests => IntentCategory::Test,
            Trigger::Docs => IntentCategory::Documentation,
            Trigger::RefactorVocabulary | Trigger::MovedCode | Trigger::RemovalHeavy => {
                IntentCategory::Refactor
            }
            Trigger::NewEndpoint
            | Trigger::NewComponent
            | Trigger::NewClass
            | Trigger::NewFunction => IntentCategory::Feature,
            Trigger::NoChanges | Trigger::Dependency | Trigger::Config => IntentCategory::Chore,
            Trigger::WhitespaceOnly | Trigger::StyleVocabulary => IntentCategory::Style,
            Trigger::General => IntentCategory::Update,
        }
    }
}

/// Pick the first matching trigger in precedence order.
pub fn decide(features: &FeatureVector) -> Trigger {
    if !features.has_changes() {
        return Trigger::NoChanges;
    }
    if features.test_fix {
        return Trigger::TestFix;
    }
    if features.bug_fix {
        return Trigger::BugFix;
    }
    if features.test {
        return Trigger::Tests;
    }
    if features.docs {
        return Trigger::Docs;
    }
    if features.refactor {
        return Trigger::RefactorVocabulary;
    }
    if features.moved_code {
        return Trigger::MovedCode;
    }
    if features.removed_lines > 2 * features.added_lines {
        return Trigger::RemovalHeavy;
    }
    if features.new_endpoint {
        return Trigger::NewEndpoint;
    }
    if features.new_component {
        return Trigger::NewComponent;
    }
    if features.new_class {
        return Trigger::NewClass;
    }
    if features.new_function {
        return Trigger::NewFunction;
    }
    if features.dependency {
        return Trigger::Dependency;
    }
    if features.config {
        return Trigger::Config;
    }
    if features.whitespace_only {
        return Trigger::WhitespaceOnly;
    }
    if features.style {
        return Trigger::StyleVocabulary;
    }
    Trigger::General
}

/// Append ` in N file(s)` when the summary carries a positive file count
fn with_file_count(base: &str, summary: Option<&ChangeSummary>) -> String {
    match summary.and_then(|s| s.total_files) {
        Some(1) => format!("{} in 1 file", base),
        Some(n) if n > 1 => format!("{} in {} files", base, n),
        _ => base.to_string(),
    }
}

/// Render the message for a trigger.
pub fn describe(
    trigger: Trigger,
    features: &FeatureVector,
    summary: Option<&ChangeSummary>,
) -> String {
    match trigger {
        Trigger::NoChanges => "update project files".to_string(),
        Trigger::TestFix => with_file_count("fix failing tests", summary),
        Trigger::BugFix => with_file_count("fix bugs", summary),
        Trigger::Tests => {
            let base = if features.removed_lines == 0 {
                "add tests"
            } else {
                "update tests"
            };
            with_file_count(base, summary)
        }
        Trigger::Docs => with_file_count("update documentation", summary),
        Trigger::RefactorVocabulary => with_file_count("refactor code", summary),
        Trigger::MovedCode => with_file_count("restructure code", summary),
        Trigger::RemovalHeavy => with_file_count("remove unused code", summary),
        Trigger::NewEndpoint => "add new API endpoints".to_string(),
        Trigger::NewComponent => "add new UI components".to_string(),
        Trigger::NewClass => with_file_count("add new types", summary),
        Trigger::NewFunction => with_file_count("add new functionality", summary),
        Trigger::Dependency => "update dependencies".to_string(),
        Trigger::Config => with_file_count("update configuration", summary),
        Trigger::WhitespaceOnly => "format and style code".to_string(),
        Trigger::StyleVocabulary => with_file_count("apply code style fixes", summary),
        Trigger::General => with_file_count("update code", summary),
    }
}
