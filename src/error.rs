//! Error types for the response cache
//!
//! The cache itself invents no failures: absence is `Option::None`, eviction
//! never fails, and the only error a caller can see is its own fetcher's.

use std::sync::Arc;

use thiserror::Error;

// == Cache Error Enum ==
/// Failure surfaced by a cache operation.
///
/// `Clone` on purpose: a deduplicated fetch is awaited through a shared
/// future, so the one underlying failure must be deliverable to every
/// concurrent waiter.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// The caller-supplied fetcher failed. Never cached; propagated verbatim
    /// to every waiter of the deduplicated fetch.
    #[error("fetch failed: {0}")]
    Fetch(Arc<anyhow::Error>),
}

impl CacheError {
    /// Wraps a fetcher error for shared delivery.
    pub fn fetch(err: anyhow::Error) -> Self {
        Self::Fetch(Arc::new(err))
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = CacheError::fetch(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "fetch failed: connection refused");
    }

    #[test]
    fn test_fetch_error_clones_share_source() {
        let err = CacheError::fetch(anyhow::anyhow!("boom"));
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
