//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and
//! staleness tracking.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cached value with its timing metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds); reset on overwrite
    pub created_at: u64,
    /// Time-to-live in milliseconds
    pub ttl_ms: u64,
    /// Last successful read timestamp (Unix milliseconds); drives LRU order
    pub last_accessed_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with the given TTL.
    ///
    /// Both timestamps are set to the current time.
    pub fn new(value: V, ttl_ms: u64) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            created_at: now,
            ttl_ms,
            last_accessed_at: now,
        }
    }

    // == Expiry Instant ==
    /// Returns the instant (Unix milliseconds) at which the entry expires.
    pub fn expires_at(&self) -> u64 {
        self.created_at.saturating_add(self.ttl_ms)
    }

    // == Is Expired ==
    /// Checks whether the entry has hard-expired at `now`.
    ///
    /// Boundary condition: an entry is expired when `now >= created_at + ttl_ms`,
    /// so a zero TTL expires immediately.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.expires_at()
    }

    /// Checks whether the entry has hard-expired at the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    // == Is Stale ==
    /// Checks whether the entry is in the stale window at `now`.
    ///
    /// The stale window is the tail of the TTL lifetime: the entry is stale
    /// once `stale_threshold` (a fraction in `[0, 1]`) of the TTL has elapsed,
    /// and stops being stale at hard expiry. A stale entry is still servable;
    /// it is merely a candidate for background revalidation.
    pub fn is_stale_at(&self, now: u64, stale_threshold: f64) -> bool {
        if self.is_expired_at(now) {
            return false;
        }
        let stale_after = self
            .created_at
            .saturating_add((self.ttl_ms as f64 * stale_threshold) as u64);
        now >= stale_after
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or 0 if the entry has expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at().saturating_sub(current_timestamp_ms())
    }

    // == Touch ==
    /// Marks the entry as accessed at `now` for LRU ordering.
    pub fn touch_at(&mut self, now: u64) {
        self.last_accessed_at = now;
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
