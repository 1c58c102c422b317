use reqwest::Response;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use super::types::ClassifyError;

/// Default retry schedule: 3 attempts in total, backoff doubling from 500ms.
const DEFAULT_MAX_ATTEMPTS: usize = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 500;

/// How many attempts to make and how long to wait between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt `attempt` (0-based): `base * 2^attempt`
    pub fn backoff(&self, attempt: usize) -> Duration {
        let multiplier = 1u32.checked_shl(attempt as u32).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(multiplier)
    }
}

/// Result of a single request attempt
pub(super) enum AttemptOutcome {
    Success(Response),
    Retryable(ClassifyError),
    Terminal(ClassifyError),
}

async fn assess(result: Result<Response, reqwest::Error>) -> AttemptOutcome {
    let error = match result {
        Ok(response) if response.status().is_success() => {
            return AttemptOutcome::Success(response);
        }
        Ok(response) => {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            ClassifyError::from_status(status, body)
        }
        Err(err) => ClassifyError::Network(err),
    };

    if error.is_retryable() {
        AttemptOutcome::Retryable(error)
    } else {
        AttemptOutcome::Terminal(error)
    }
}

/// Send a request, retrying rate limits, server errors and connection
/// failures with exponential backoff.
///
/// Returns the first successful response. A terminal failure is returned
/// as-is; running out of attempts yields [`ClassifyError::Exhausted`].
pub(super) async fn send_with_retry(
    policy: &RetryPolicy,
    mut make_request: impl FnMut() -> reqwest::RequestBuilder,
) -> Result<Response, ClassifyError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let outcome = assess(make_request().send().await).await;
        attempt += 1;

        match outcome {
            AttemptOutcome::Success(response) => return Ok(response),
            AttemptOutcome::Terminal(err) => {
                debug!(
                    "HTTP request failed permanently: {} (attempt {}/{})",
                    err, attempt, max_attempts
                );
                return Err(err);
            }
            AttemptOutcome::Retryable(err) if attempt >= max_attempts => {
                debug!("HTTP request failed: {}; no attempts left", err);
                return Err(ClassifyError::Exhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }
            AttemptOutcome::Retryable(err) => {
                let delay = policy.backoff(attempt - 1);
                debug!(
                    "HTTP request failed: {}; retrying in {:?} (attempt {}/{})",
                    err, delay, attempt, max_attempts
                );
                sleep(delay).await;
            }
        }
    }
}
