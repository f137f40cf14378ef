//! Cache Statistics Module
//!
//! Usage counters (hits, misses, evictions, background refreshes) and the
//! read-only snapshot report.

use serde::Serialize;

// == Cache Stats ==
/// Running usage counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of reads served from the cache (fresh or stale)
    pub hits: u64,
    /// Number of reads that found nothing servable
    pub misses: u64,
    /// Number of entries evicted by the LRU policy
    pub evictions: u64,
    /// Number of stale-while-revalidate background refreshes started
    pub refreshes: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates stats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing was requested yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Refresh ==
    /// Increments the background-refresh counter.
    pub fn record_refresh(&mut self) {
        self.refreshes += 1;
    }
}

// == Entry Report ==
/// Per-entry line of the snapshot report.
#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    /// The entry's key
    pub key: String,
    /// Configured TTL in milliseconds
    pub ttl_ms: u64,
    /// Whether the entry has hard-expired
    pub is_expired: bool,
}

// == Cache Report ==
/// Read-only snapshot of the cache's current state.
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    /// Number of entries currently stored (expired-but-unswept included)
    pub total_entries: usize,
    /// Number of in-flight deduplicated fetches
    pub pending_requests: usize,
    /// Best-effort memory estimate of stored values, in bytes
    pub memory_usage_bytes: u64,
    /// The same estimate with a human-readable unit
    pub memory_usage: String,
    /// One line per stored entry
    pub entries: Vec<EntryReport>,
    /// Usage counters at snapshot time
    pub stats: CacheStats,
}

// == Format Bytes ==
/// Formats a byte count with a human-readable unit.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
