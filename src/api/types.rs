use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::CommitSuggestion;

// ============================================================================
// Classify API Types
// ============================================================================

/// Request body for the classification endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyRequest<'a> {
    pub diff: &'a str,
}

/// Response body from the classification endpoint.
///
/// `intent` holds the whole labeled payload, e.g.
/// `"Intent: feat\nMessage: add login form"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifyResponse {
    #[serde(default)]
    pub intent: Option<String>,
}

// ============================================================================
// Error Types
// ============================================================================

/// Why a remote classification did not produce a suggestion
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classification endpoint is not configured")]
    NotConfigured,

    #[error("remote classification is disabled for this run")]
    Offline,

    #[error("rate limited by classification endpoint (HTTP 429)")]
    RateLimited,

    #[error("classification endpoint failed (HTTP {status})")]
    Server { status: u16 },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("classification request rejected (HTTP {status}): {body}")]
    Client { status: u16, body: String },

    #[error("malformed classification response: {0}")]
    Malformed(String),

    #[error("classification failed after {attempts} attempt(s): {last}")]
    Exhausted {
        attempts: usize,
        #[source]
        last: Box<ClassifyError>,
    },
}

impl ClassifyError {
    /// Map a non-success HTTP status to an error
    pub fn from_status(status: StatusCode, body: String) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            ClassifyError::RateLimited
        } else if status.is_server_error() {
            ClassifyError::Server {
                status: status.as_u16(),
            }
        } else {
            ClassifyError::Client {
                status: status.as_u16(),
                body,
            }
        }
    }

    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ClassifyError::RateLimited | ClassifyError::Server { .. } => true,
            ClassifyError::Network(err) => err.is_timeout() || err.is_connect(),
            ClassifyError::NotConfigured
            | ClassifyError::Offline
            | ClassifyError::Client { .. }
            | ClassifyError::Malformed(_)
            | ClassifyError::Exhausted { .. } => false,
        }
    }
}

// ============================================================================
// Response Parsing
// ============================================================================

/// Parse a raw response body into a suggestion.
pub fn parse_response(body: &str) -> Result<CommitSuggestion, ClassifyError> {
    if body.trim().is_empty() {
        return Err(ClassifyError::Malformed("empty response body".to_string()));
    }
    let response: ClassifyResponse = serde_json::from_str(body)
        .map_err(|e| ClassifyError::Malformed(format!("invalid JSON: {}", e)))?;
    let payload = response
        .intent
        .filter(|payload| !payload.trim().is_empty())
        .ok_or_else(|| ClassifyError::Malformed("missing intent payload".to_string()))?;
    parse_labeled_payload(&payload)
}

/// Extract the `Intent:` and `Message:` lines from a payload.
///
/// Labels are matched case-insensitively, in any order; other lines are
/// ignored and the first non-empty value for each label wins.
pub fn parse_labeled_payload(payload: &str) -> Result<CommitSuggestion, ClassifyError> {
    let mut intent = None;
    let mut message = None;

    for line in payload.lines() {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let label = label.trim();
        if label.eq_ignore_ascii_case("intent") && intent.is_none() {
            intent = Some(value);
        } else if label.eq_ignore_ascii_case("message") && message.is_none() {
            message = Some(value);
        }
    }

    match (intent, message) {
        (Some(intent), Some(message)) => Ok(CommitSuggestion::new(intent, message)),
        (None, _) => Err(ClassifyError::Malformed("missing Intent line".to_string())),
        (_, None) => Err(ClassifyError::Malformed("missing Message line".to_string())),
    }
}
