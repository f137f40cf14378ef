//! fetch_cache - An in-memory response cache
//!
//! Sits between application call sites and a remote data source, treating
//! the actual fetch as an opaque async function supplied by the caller.
//! Provides TTL expiry, stale-while-revalidate background refresh, request
//! deduplication across concurrent callers, LRU-bounded capacity,
//! pattern-based invalidation and usage statistics.
//!
//! # Example
//!
//! ```no_run
//! use fetch_cache::{CacheConfig, FetchOptions, ResponseCache};
//!
//! # async fn example() -> fetch_cache::Result<()> {
//! let cache: ResponseCache<String> = ResponseCache::new(CacheConfig::default());
//!
//! let value = cache
//!     .get(
//!         "user:42",
//!         || async { Ok("fetched from the network".to_string()) },
//!         FetchOptions::new().stale_while_revalidate(),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{
    generate_key, CacheEntry, CacheReport, CacheStats, EntryReport, EntryStore, EvictionPolicy,
    FetchOptions, ParamValue, PendingFetches, ResponseCache,
};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
