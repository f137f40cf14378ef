//! Response Cache Module
//!
//! The public cache surface. Combines the entry store, pending-fetch tracker
//! and eviction policy into TTL expiry, stale-while-revalidate, forced
//! refresh, deduplicated fetching, and invalidation.
//!
//! All shared state (entries, pending fetches, counters) lives behind one
//! mutex so every check-then-act sequence is atomic. The lock is never held
//! across an await: the only suspension points are the fetch future itself
//! and the detached background-refresh task.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::cache::stats::format_bytes;
use crate::cache::{
    current_timestamp_ms, CacheReport, CacheStats, EntryReport, EntryStore, EvictionPolicy,
    PendingFetches, SharedFetch,
};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Fetch Options ==
/// Per-call options for [`ResponseCache::get`].
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// TTL for the fetched entry; the config default applies when `None`
    pub ttl_ms: Option<u64>,
    /// Fetch even if a fresh cached value exists, and overwrite it
    pub force_refresh: bool,
    /// Serve a stale (not yet expired) value immediately and refresh it in
    /// the background
    pub stale_while_revalidate: bool,
}

impl FetchOptions {
    /// Creates the default options: config TTL, no forced refresh, no SWR.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit TTL for the entry written by this call.
    #[must_use]
    pub fn with_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = Some(ttl_ms);
        self
    }

    /// Forces a fetch regardless of the cached entry's freshness.
    #[must_use]
    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }

    /// Enables stale-while-revalidate for this call.
    #[must_use]
    pub fn stale_while_revalidate(mut self) -> Self {
        self.stale_while_revalidate = true;
        self
    }
}

// == Cache Inner ==
/// Mutable state guarded by the single cache lock.
struct CacheInner<V> {
    store: EntryStore<V>,
    pending: PendingFetches<V>,
    stats: CacheStats,
}

// == Response Cache ==
/// In-memory response cache with TTL expiry, stale-while-revalidate,
/// request deduplication and LRU eviction.
///
/// Cloning yields another handle to the same cache; clones share state.
pub struct ResponseCache<V> {
    inner: Arc<Mutex<CacheInner<V>>>,
    policy: EvictionPolicy,
    default_ttl_ms: u64,
    stale_threshold: f64,
}

impl<V> Clone for ResponseCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            policy: self.policy,
            default_ttl_ms: self.default_ttl_ms,
            stale_threshold: self.stale_threshold,
        }
    }
}

impl<V> ResponseCache<V> {
    // == Constructor ==
    /// Creates a cache from the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner {
                store: EntryStore::new(),
                pending: PendingFetches::new(),
                stats: CacheStats::new(),
            })),
            policy: EvictionPolicy::new(config.max_entries),
            default_ttl_ms: config.default_ttl_ms,
            stale_threshold: config.stale_threshold,
        }
    }

    // == Set ==
    /// Writes a value directly, bypassing any fetch.
    ///
    /// Used for values obtained out of band. Resets the entry's timestamps
    /// and evicts one LRU entry first if the write would exceed capacity.
    pub fn set(&self, key: impl Into<String>, value: V, ttl_ms: Option<u64>) {
        let key = key.into();
        let ttl_ms = ttl_ms.unwrap_or(self.default_ttl_ms);

        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if self.policy.evict_if_needed(&mut inner.store, &key).is_some() {
            inner.stats.record_eviction();
        }
        inner.store.insert(key, value, ttl_ms);
    }

    // == Has ==
    /// Checks whether a non-expired value exists for `key`.
    ///
    /// Side-effect free: no recency touch, no counters. Always agrees with
    /// what `get_cached` would return at the same instant.
    pub fn has(&self, key: &str) -> bool {
        let now = current_timestamp_ms();
        let guard = self.inner.lock();
        guard
            .store
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    // == Invalidate ==
    /// Removes one entry. Returns `true` if it existed.
    pub fn invalidate(&self, key: &str) -> bool {
        self.inner.lock().store.remove(key)
    }

    // == Invalidate Pattern ==
    /// Removes every entry whose key matches `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_pattern(&self, pattern: &Regex) -> usize {
        self.inner.lock().store.remove_matching(pattern)
    }

    // == Clear ==
    /// Removes all entries and drops all pending-fetch bookkeeping.
    ///
    /// In-flight fetches are not cancelled; they run to completion and their
    /// write-back lands in the (now empty) store, which is harmless. Their
    /// settle-time cleanup identifies records by generation, so a fetch
    /// started after the clear is never clobbered by one started before it.
    pub fn clear(&self) {
        let mut guard = self.inner.lock();
        guard.store.clear();
        guard.pending.clear();
    }

    // == Cleanup ==
    /// Sweeps every hard-expired entry out of the store.
    ///
    /// Returns the number of entries removed. Intended to be driven by a
    /// periodic task owned by the composition root (see
    /// [`crate::tasks::spawn_cleanup_task`]); the cache never schedules its
    /// own sweeps.
    pub fn cleanup(&self) -> usize {
        let now = current_timestamp_ms();
        EvictionPolicy::sweep_expired(&mut self.inner.lock().store, now)
    }

    // == Stats ==
    /// Returns a copy of the usage counters.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats.clone()
    }

    /// Returns the number of in-flight deduplicated fetches.
    pub fn pending_requests(&self) -> usize {
        self.inner.lock().pending.len()
    }

    // == Length ==
    /// Returns the number of stored entries (expired-but-unswept included).
    pub fn len(&self) -> usize {
        self.inner.lock().store.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().store.is_empty()
    }
}

impl<V> ResponseCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Get ==
    /// Returns the value for `key`, fetching it if necessary.
    ///
    /// Per-key state machine:
    /// - fresh entry: returned immediately, no fetch
    /// - stale entry with `stale_while_revalidate`: returned immediately
    ///   while a background refresh updates the store; refresh errors are
    ///   logged and swallowed
    /// - absent or expired entry, or `force_refresh`: a deduplicated fetch
    ///   runs and its result is stored and returned
    ///
    /// Concurrent callers for the same key share one underlying fetch and
    /// observe the same value or the same error. Failed fetches are never
    /// cached and leave the key exactly as it was.
    pub async fn get<F, Fut>(&self, key: &str, fetcher: F, options: FetchOptions) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let now = current_timestamp_ms();
        let ttl_ms = options.ttl_ms.unwrap_or(self.default_ttl_ms);

        let shared = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;

            if !options.force_refresh {
                let mut hit = None;
                if let Some(entry) = inner.store.get_mut(key) {
                    if !entry.is_expired_at(now) {
                        let stale = entry.is_stale_at(now, self.stale_threshold);
                        entry.touch_at(now);
                        hit = Some((entry.value.clone(), stale));
                    }
                }

                if let Some((value, stale)) = hit {
                    inner.stats.record_hit();
                    if stale && options.stale_while_revalidate {
                        self.start_background_refresh(inner, key, fetcher, ttl_ms);
                    }
                    return Ok(value);
                }

                // Absent or hard-expired
                inner.stats.record_miss();
            }

            match inner.pending.get(key) {
                Some(existing) => existing,
                None => self.start_fetch(inner, key, fetcher, ttl_ms),
            }
        };

        shared.await
    }

    // == Get Cached ==
    /// Synchronous peek: returns the value only if present and not expired.
    ///
    /// Expired entries behave as absent and are removed opportunistically.
    /// A successful peek counts as a hit and updates recency.
    pub fn get_cached(&self, key: &str) -> Option<V> {
        let now = current_timestamp_ms();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let expired = match inner.store.get(key) {
            Some(entry) => entry.is_expired_at(now),
            None => {
                inner.stats.record_miss();
                return None;
            }
        };

        if expired {
            debug!(key = %key, "entry expired, removing");
            inner.store.remove(key);
            inner.stats.record_miss();
            return None;
        }

        let entry = inner.store.get_mut(key)?;
        entry.touch_at(now);
        let value = entry.value.clone();
        inner.stats.record_hit();
        Some(value)
    }

    // -- private helpers ---------------------------------------------------

    /// Starts a deduplicated fetch for `key` and records it as pending.
    ///
    /// Called with the cache lock held; the caller has already checked that
    /// no fetch is pending for this key. The returned shared future removes
    /// its own pending record and writes the fetched value back to the store
    /// when it settles, in both cases before any waiter sees the result.
    fn start_fetch<F, Fut>(
        &self,
        inner: &mut CacheInner<V>,
        key: &str,
        fetcher: F,
        ttl_ms: u64,
    ) -> SharedFetch<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let fetch_fut = fetcher();
        let generation = inner.pending.allocate_generation();
        let cache_inner = Arc::clone(&self.inner);
        let policy = self.policy;
        let key_owned = key.to_string();

        let shared = async move {
            let result = fetch_fut.await;

            let mut guard = cache_inner.lock();
            let inner = &mut *guard;
            inner.pending.remove_if_current(&key_owned, generation);
            match result {
                Ok(value) => {
                    if policy.evict_if_needed(&mut inner.store, &key_owned).is_some() {
                        inner.stats.record_eviction();
                    }
                    inner.store.insert(key_owned, value.clone(), ttl_ms);
                    Ok(value)
                }
                // Failed fetches are never cached; the store stays untouched.
                Err(err) => Err(CacheError::fetch(err)),
            }
        }
        .boxed()
        .shared();

        inner
            .pending
            .insert(key.to_string(), generation, shared.clone());
        shared
    }

    /// Kicks off a detached refresh for a stale entry.
    ///
    /// No-op when a fetch for the key is already in flight. The refresh
    /// writes back through the normal fetch path; its errors are logged and
    /// discarded because the caller already received the stale value.
    fn start_background_refresh<F, Fut>(
        &self,
        inner: &mut CacheInner<V>,
        key: &str,
        fetcher: F,
        ttl_ms: u64,
    ) where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        if inner.pending.contains(key) {
            return;
        }

        inner.stats.record_refresh();
        let shared = self.start_fetch(inner, key, fetcher, ttl_ms);
        let key = key.to_string();
        tokio::spawn(async move {
            if let Err(err) = shared.await {
                debug!(key = %key, error = %err, "background refresh failed; keeping stale entry");
            }
        });
    }
}

impl<V: Serialize> ResponseCache<V> {
    // == Report ==
    /// Read-only snapshot: entry count, pending fetches, a best-effort
    /// memory estimate (summed serialized value sizes), per-entry status and
    /// the usage counters.
    ///
    /// Entries are sorted by key so the report is stable across calls.
    pub fn report(&self) -> CacheReport {
        let guard = self.inner.lock();

        let mut memory_usage_bytes = 0u64;
        let mut entries = Vec::with_capacity(guard.store.len());
        for (key, entry) in guard.store.iter() {
            memory_usage_bytes += serde_json::to_vec(&entry.value)
                .map(|bytes| bytes.len() as u64)
                .unwrap_or(0);
            entries.push(EntryReport {
                key: key.clone(),
                ttl_ms: entry.ttl_ms,
                is_expired: entry.is_expired(),
            });
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        CacheReport {
            total_entries: guard.store.len(),
            pending_requests: guard.pending.len(),
            memory_usage_bytes,
            memory_usage: format_bytes(memory_usage_bytes),
            entries,
            stats: guard.stats.clone(),
        }
    }
}
