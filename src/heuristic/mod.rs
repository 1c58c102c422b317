//! Deterministic local classifier.
//!
//! Used when the remote classifier is unavailable. Classification runs in
//! two stages: [`features::extract`] turns the diff into a
//! `FeatureVector` by walking the pattern table, then
//! [`decision::decide`] applies a fixed precedence and
//! [`decision::describe`] renders the message from a template.
//!
//! No I/O happens here; the same input always yields the same suggestion.

mod decision;
mod features;
mod patterns;

use crate::domain::{ChangeSummary, CommitSuggestion};

/// Classify a diff without contacting any service.
pub fn classify(diff_text: &str, summary: Option<&ChangeSummary>) -> CommitSuggestion {
    let features = features::extract(diff_text, summary);
    let trigger = decision::decide(&features);
    let message = decision::describe(trigger, &features, summary);
    CommitSuggestion::new(trigger.category().as_str(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MAX_MESSAGE_CHARS;

    #[test]
    fn test_bug_vocabulary_without_tests_is_bug_fix() {
        let diff = "\
diff --git a/src/parser.rs b/src/parser.rs
--- a/src/parser.rs
+++ b/src/parser.rs
@@ -10,2 +10,3 @@
-    let end = input.len();
+    // fix crash on empty input
+    let end = input.len().max(1);
";
        let suggestion = classify(diff, None);
        assert_eq!(suggestion.intent, "fix");
        assert_eq!(suggestion.message, "fix bugs");
    }

    #[test]
    fn test_bug_in_test_file_is_test_fix() {
        let diff = "\
diff --git a/tests/math_test.py b/tests/math_test.py
--- a/tests/math_test.py
+++ b/tests/math_test.py
@@ -1 +1 @@
-assert add(1, 1) == 3  # bug
+assert add(1, 1) == 2
";
        let summary = ChangeSummary {
            total_files: Some(2),
            renamed_files: None,
        };
        let suggestion = classify(diff, Some(&summary));
        assert_eq!(suggestion.intent, "fix");
        assert_eq!(suggestion.message, "fix failing tests in 2 files");
    }

    #[test]
    fn test_new_exported_function_is_feature() {
        let diff = "\
diff --git a/src/utils.js b/src/utils.js
--- a/src/utils.js
+++ b/src/utils.js
@@ -1,0 +1,3 @@
+export function slugify(title) {
+  return title.toLowerCase().replace(/ /g, '-');
+}
";
        let suggestion = classify(diff, None);
        assert_eq!(suggestion.intent, "feat");
        assert!(suggestion.message.contains("functionality"));
    }

    #[test]
    fn test_new_route_is_endpoint_feature() {
        let diff = "\
diff --git a/server/routes.js b/server/routes.js
--- a/server/routes.js
+++ b/server/routes.js
@@ -3,0 +4 @@
+app.post('/api/orders', createOrder);
";
        let summary = ChangeSummary {
            total_files: Some(1),
            renamed_files: None,
        };
        let suggestion = classify(diff, Some(&summary));
        assert_eq!(suggestion.intent, "feat");
        assert_eq!(suggestion.message, "add new API endpoints");
    }

    #[test]
    fn test_whitespace_only_is_style() {
        let diff = "\
diff --git a/src/main.rs b/src/main.rs
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,4 +1,4 @@
-    }
+}
-
+
";
        let suggestion = classify(diff, None);
        assert_eq!(suggestion.intent, "style");
        assert_eq!(suggestion.message, "format and style code");
    }

    #[test]
    fn test_docs_change() {
        let diff = "\
diff --git a/README.md b/README.md
--- a/README.md
+++ b/README.md
@@ -1 +1,2 @@
 # Project
+Install with cargo.
";
        let suggestion = classify(diff, None);
        assert_eq!(suggestion.intent, "docs");
        assert_eq!(suggestion.message, "update documentation");
    }

    #[test]
    fn test_dependency_bump_is_chore() {
        let diff = "\
diff --git a/Cargo.toml b/Cargo.toml
--- a/Cargo.toml
+++ b/Cargo.toml
@@ -8 +8 @@
-serde = \"1.0.100\"
+serde = \"1.0.200\"
";
        let suggestion = classify(diff, None);
        assert_eq!(suggestion.intent, "chore");
        assert_eq!(suggestion.message, "update dependencies");
    }

    #[test]
    fn test_renames_with_edits_restructure() {
        let diff = "\
diff --git a/src/old/mod.rs b/src/core/mod.rs
similarity index 90%
rename from src/old/mod.rs
rename to src/core/mod.rs
--- a/src/old/mod.rs
+++ b/src/core/mod.rs
@@ -1 +1 @@
-use crate::old::Thing;
+use crate::core::Thing;
";
        let summary = ChangeSummary {
            total_files: Some(3),
            renamed_files: Some(1),
        };
        let suggestion = classify(diff, Some(&summary));
        assert_eq!(suggestion.intent, "refactor");
        assert_eq!(suggestion.message, "restructure code in 3 files");
    }

    #[test]
    fn test_empty_diff_is_chore() {
        let suggestion = classify("", None);
        assert_eq!(suggestion.intent, "chore");
        assert!(!suggestion.message.is_empty());
    }

    #[test]
    fn test_plain_edit_is_update() {
        let suggestion = classify("-let total = a + b;\n+let total = a + b + c;", None);
        assert_eq!(suggestion.intent, "update");
        assert_eq!(suggestion.message, "update code");
    }

    #[test]
    fn test_deterministic_and_bounded() {
        let diff = "+pub struct Widget;\n+impl Widget {}\n";
        let first = classify(diff, None);
        let second = classify(diff, None);
        assert_eq!(first, second);
        assert!(first.message.chars().count() <= MAX_MESSAGE_CHARS);
    }
}
