//! Suggestion pipeline: cache lookup, remote classification, heuristic
//! fallback, cache write.

use tracing::{debug, warn};

use crate::api::{ClassifierClient, ClassifyError};
use crate::cache::ResultCache;
use crate::domain::{compute_digest, ChangeSummary, CommitSuggestion};
use crate::heuristic;

/// Something that can classify a diff remotely
#[allow(async_fn_in_trait)]
pub trait Classifier {
    async fn classify(&self, diff_text: &str) -> Result<CommitSuggestion, ClassifyError>;
}

impl Classifier for ClassifierClient {
    async fn classify(&self, diff_text: &str) -> Result<CommitSuggestion, ClassifyError> {
        ClassifierClient::classify(self, diff_text).await
    }
}

/// Every fallback is reported except one the user asked for.
fn warrants_warning(err: &ClassifyError) -> bool {
    !matches!(err, ClassifyError::Offline)
}

/// Produces one suggestion per diff, reusing cached results.
pub struct SuggestionEngine<C> {
    classifier: C,
    cache: ResultCache,
    origin_folder: String,
}

impl<C: Classifier> SuggestionEngine<C> {
    /// `origin_folder` is recorded with every cache write for display.
    pub fn new(classifier: C, cache: ResultCache, origin_folder: impl Into<String>) -> Self {
        Self {
            classifier,
            cache,
            origin_folder: origin_folder.into(),
        }
    }

    /// Suggest an intent and message for a diff.
    ///
    /// Always yields a suggestion: when the remote classifier fails for any
    /// reason the heuristic classifier answers instead. Either result is
    /// cached under the digest of the diff.
    pub async fn generate_suggestion(
        &mut self,
        diff_text: &str,
        summary: Option<&ChangeSummary>,
    ) -> CommitSuggestion {
        let digest = compute_digest(diff_text);
        if let Some(entry) = self.cache.lookup(&digest) {
            debug!("Cache hit for {}", digest);
            return entry.suggestion();
        }

        let suggestion = match self.classifier.classify(diff_text).await {
            Ok(suggestion) => suggestion,
            Err(e) if !warrants_warning(&e) => {
                debug!("Remote classification disabled; using local heuristics");
                heuristic::classify(diff_text, summary)
            }
            Err(e) => {
                warn!("Remote classification unavailable ({}); using local heuristics", e);
                heuristic::classify(diff_text, summary)
            }
        };

        self.cache.store(
            &digest,
            &suggestion.intent,
            &suggestion.message,
            &self.origin_folder,
        );
        suggestion
    }

    #[allow(dead_code)]
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClassifierConfig, RetryPolicy};
    use crate::domain::MAX_MESSAGE_CHARS;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEATURE_DIFF: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1 +1,3 @@
+pub fn total(items: &[u32]) -> u32 {
+    items.iter().sum()
+}
";

    /// Replays canned results and counts calls
    #[derive(Default)]
    struct ScriptedClassifier {
        responses: RefCell<VecDeque<Result<CommitSuggestion, ClassifyError>>>,
        calls: Cell<usize>,
    }

    impl ScriptedClassifier {
        fn with(responses: Vec<Result<CommitSuggestion, ClassifyError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                calls: Cell::new(0),
            }
        }
    }

    impl Classifier for &ScriptedClassifier {
        async fn classify(&self, _diff_text: &str) -> Result<CommitSuggestion, ClassifyError> {
            self.calls.set(self.calls.get() + 1);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(ClassifyError::Server { status: 503 }))
        }
    }

    #[tokio::test]
    async fn test_remote_result_is_cached() {
        let temp_dir = TempDir::new().unwrap();
        let classifier = ScriptedClassifier::with(vec![Ok(CommitSuggestion::new(
            "feat",
            "add total helper",
        ))]);
        let mut engine =
            SuggestionEngine::new(&classifier, ResultCache::open(temp_dir.path()), "repo");

        let first = engine.generate_suggestion(FEATURE_DIFF, None).await;
        let second = engine.generate_suggestion(FEATURE_DIFF, None).await;

        assert_eq!(first, CommitSuggestion::new("feat", "add total helper"));
        assert_eq!(first, second);
        assert_eq!(classifier.calls.get(), 1);

        let entry = engine.cache().snapshot_ordered_by_recency().remove(0);
        assert_eq!(entry.origin_folder, "repo");
        assert_eq!(entry.digest, compute_digest(FEATURE_DIFF).as_str());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_classifier() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = ResultCache::open(temp_dir.path());
        cache.store(&compute_digest(FEATURE_DIFF), "chore", "cached", "elsewhere");

        let classifier = ScriptedClassifier::default();
        let mut engine = SuggestionEngine::new(&classifier, cache, "repo");

        // Surrounding whitespace does not change the digest
        let padded = format!("\n\n{}\n   ", FEATURE_DIFF);
        let suggestion = engine.generate_suggestion(&padded, None).await;

        assert_eq!(suggestion.to_string(), "chore: cached");
        assert_eq!(classifier.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_and_caches() {
        let temp_dir = TempDir::new().unwrap();
        let classifier = ScriptedClassifier::with(vec![Err(ClassifyError::Malformed(
            "missing Intent line".to_string(),
        ))]);
        let mut engine =
            SuggestionEngine::new(&classifier, ResultCache::open(temp_dir.path()), "repo");

        let first = engine.generate_suggestion(FEATURE_DIFF, None).await;
        assert_eq!(first, heuristic::classify(FEATURE_DIFF, None));
        assert_eq!(first.intent, "feat");

        let second = engine.generate_suggestion(FEATURE_DIFF, None).await;
        assert_eq!(first, second);
        assert_eq!(classifier.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_cached_results_survive_restart() {
        let temp_dir = TempDir::new().unwrap();
        let classifier = ScriptedClassifier::with(vec![Ok(CommitSuggestion::new(
            "feat",
            "add total helper",
        ))]);
        {
            let mut engine =
                SuggestionEngine::new(&classifier, ResultCache::open(temp_dir.path()), "repo");
            engine.generate_suggestion(FEATURE_DIFF, None).await;
        }

        let idle = ScriptedClassifier::default();
        let mut engine = SuggestionEngine::new(&idle, ResultCache::open(temp_dir.path()), "repo");
        let suggestion = engine.generate_suggestion(FEATURE_DIFF, None).await;

        assert_eq!(suggestion.message, "add total helper");
        assert_eq!(idle.calls.get(), 0);
    }

    #[test]
    fn test_only_offline_fallback_is_quiet() {
        assert!(!warrants_warning(&ClassifyError::Offline));
        assert!(warrants_warning(&ClassifyError::NotConfigured));
        assert!(warrants_warning(&ClassifyError::RateLimited));
        assert!(warrants_warning(&ClassifyError::Exhausted {
            attempts: 3,
            last: Box::new(ClassifyError::Server { status: 502 }),
        }));
    }

    #[tokio::test]
    async fn test_missing_endpoint_uses_heuristics() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = SuggestionEngine::new(
            ClassifierClient::new(ClassifierConfig::default()).unwrap(),
            ResultCache::open(temp_dir.path()),
            "repo",
        );

        let suggestion = engine.generate_suggestion(FEATURE_DIFF, None).await;
        assert_eq!(suggestion, heuristic::classify(FEATURE_DIFF, None));
        assert_eq!(engine.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_client_uses_heuristics() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = SuggestionEngine::new(
            ClassifierClient::offline().unwrap(),
            ResultCache::open(temp_dir.path()),
            "repo",
        );
        let summary = ChangeSummary {
            total_files: Some(1),
            renamed_files: None,
        };

        let suggestion = engine.generate_suggestion(FEATURE_DIFF, Some(&summary)).await;
        assert_eq!(suggestion.intent, "feat");
        assert_eq!(suggestion.message, "add new functionality in 1 file");
    }

    #[tokio::test]
    async fn test_server_errors_fall_back_to_heuristics() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let client = ClassifierClient::new(ClassifierConfig {
            endpoint: Some(format!("{}/classify", server.uri())),
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(1),
            },
            ..ClassifierConfig::default()
        })
        .unwrap();

        let temp_dir = TempDir::new().unwrap();
        let mut engine = SuggestionEngine::new(client, ResultCache::open(temp_dir.path()), "repo");

        let suggestion = engine.generate_suggestion(FEATURE_DIFF, None).await;
        assert_eq!(suggestion, heuristic::classify(FEATURE_DIFF, None));
        assert!(suggestion.message.chars().count() <= MAX_MESSAGE_CHARS);

        // Served from cache without touching the server again
        let again = engine.generate_suggestion(FEATURE_DIFF, None).await;
        assert_eq!(suggestion, again);
    }
}
