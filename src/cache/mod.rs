//! Content-addressed suggestion cache.
//!
//! Maps the digest of a diff to the suggestion produced for it, so that
//! repeated runs over the same change skip the remote classifier.
//! Entries expire after 30 days and are evicted lazily.

mod store;

// Re-exports
pub use store::{CacheEntry, ResultCache};
