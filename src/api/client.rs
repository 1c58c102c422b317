use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use super::http::{send_with_retry, RetryPolicy};
use super::types::{parse_response, ClassifyError, ClassifyRequest};
use crate::domain::CommitSuggestion;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default CLI version (from Cargo.toml)
const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the User-Agent string
fn build_user_agent() -> String {
    format!("commitwise/{}", DEFAULT_VERSION)
}

/// Settings for the remote classifier
#[derive(Clone)]
pub struct ClassifierConfig {
    /// Full URL of the classification endpoint; `None` disables remote calls
    pub endpoint: Option<String>,
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

impl std::fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("endpoint", &self.endpoint)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Client for the remote classification endpoint
pub struct ClassifierClient {
    client: Client,
    endpoint: Option<Url>,
    api_token: Option<String>,
    user_agent: String,
    retry: RetryPolicy,
    offline: bool,
}

impl ClassifierClient {
    /// Create a new classifier client
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(|raw| Url::parse(raw).with_context(|| format!("Invalid endpoint URL: {}", raw)))
            .transpose()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            api_token: config.api_token.filter(|token| !token.is_empty()),
            user_agent: build_user_agent(),
            retry: config.retry,
            offline: false,
        })
    }

    /// A client that never contacts a service
    pub fn offline() -> Result<Self> {
        let mut client = Self::new(ClassifierConfig::default())?;
        client.offline = true;
        Ok(client)
    }

    pub fn is_configured(&self) -> bool {
        !self.offline && self.endpoint.is_some()
    }

    /// Ask the endpoint to classify a diff.
    pub async fn classify(&self, diff_text: &str) -> Result<CommitSuggestion, ClassifyError> {
        if self.offline {
            return Err(ClassifyError::Offline);
        }
        let url = self.endpoint.as_ref().ok_or(ClassifyError::NotConfigured)?;
        let request_id = Uuid::new_v4().to_string();
        let body = ClassifyRequest { diff: diff_text };

        debug!("=== Classify Request ===");
        debug!("URL: {}", url);
        debug!("Request ID: {}", request_id);

        let response = send_with_retry(&self.retry, || {
            let mut request = self
                .client
                .post(url.clone())
                .header("Content-Type", "application/json")
                .header("User-Agent", &self.user_agent)
                .header("x-request-id", &request_id);

            if let Some(token) = &self.api_token {
                request = request.header("Authorization", format!("Bearer {}", token));
            }

            request.json(&body)
        })
        .await?;

        debug!("=== Classify Response ===");
        debug!("Status: {}", response.status());

        let text = response
            .text()
            .await
            .map_err(|e| ClassifyError::Malformed(format!("failed to read body: {}", e)))?;
        parse_response(&text)
    }
}

impl std::fmt::Debug for ClassifierClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierClient")
            .field("endpoint", &self.endpoint.as_ref().map(Url::as_str))
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("retry", &self.retry)
            .field("offline", &self.offline)
            .finish()
    }
}
