//! Client for the remote classification service.
//!
//! A single POST endpoint receives `{ "diff": ... }` and answers with a
//! labeled `Intent:`/`Message:` payload. Rate limits, server errors and
//! connection failures are retried with exponential backoff; everything
//! else fails on the first attempt.

mod client;
mod http;
mod types;

pub use client::{ClassifierClient, ClassifierConfig, DEFAULT_TIMEOUT_SECS};
pub use http::RetryPolicy;
pub use types::ClassifyError;
