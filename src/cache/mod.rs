//! Cache Module
//!
//! In-memory response caching with TTL expiry, stale-while-revalidate,
//! request deduplication and LRU eviction.

mod entry;
mod key;
mod lru;
mod pending;
mod response;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use key::{generate_key, ParamValue};
pub use lru::EvictionPolicy;
pub use pending::{PendingFetches, SharedFetch};
pub use response::{FetchOptions, ResponseCache};
pub use stats::{format_bytes, CacheReport, CacheStats, EntryReport};
pub use store::EntryStore;
