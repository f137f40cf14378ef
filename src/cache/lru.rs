//! Eviction Policy Module
//!
//! Least-recently-used capacity enforcement and expired-entry sweeping.

use tracing::debug;

use crate::cache::EntryStore;

// == Eviction Policy ==
/// Enforces a maximum entry count using LRU ordering.
///
/// Victim order is ascending `(last_accessed_at, created_at, key)`: the entry
/// that has gone longest without a read loses; ties fall to the earliest
/// creation, then to the lexicographically smallest key so eviction is fully
/// deterministic even when timestamps collide.
///
/// Selection is a linear scan. The capacity is small and bounded (default
/// 100 entries), so the scan stays cheap; no ordered index is kept.
#[derive(Debug, Clone, Copy)]
pub struct EvictionPolicy {
    max_entries: usize,
}

impl EvictionPolicy {
    // == Constructor ==
    /// Creates a policy with the given capacity.
    ///
    /// `max_entries` is clamped to a minimum of 1 so a misconfigured cap can
    /// never wedge the insert path.
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries: max_entries.max(1),
        }
    }

    /// Returns the configured capacity.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    // == Evict If Needed ==
    /// Makes room for `incoming_key` if inserting it would exceed capacity.
    ///
    /// Overwrites never evict: if the key is already present the store size
    /// does not grow. Otherwise, at capacity, exactly one LRU victim is
    /// removed and its key returned. An empty store is a no-op; eviction
    /// never fails.
    pub fn evict_if_needed<V>(
        &self,
        store: &mut EntryStore<V>,
        incoming_key: &str,
    ) -> Option<String> {
        if store.contains_key(incoming_key) || store.len() < self.max_entries {
            return None;
        }

        let victim = store
            .iter()
            .min_by(|(ka, ea), (kb, eb)| {
                (ea.last_accessed_at, ea.created_at, ka.as_str())
                    .cmp(&(eb.last_accessed_at, eb.created_at, kb.as_str()))
            })
            .map(|(key, _)| key.clone())?;

        store.remove(&victim);
        debug!(key = %victim, "evicted least-recently-used entry");
        Some(victim)
    }

    // == Sweep Expired ==
    /// Removes every entry whose hard TTL has elapsed at `now`.
    ///
    /// Returns the number of entries removed. Safe to call opportunistically;
    /// a sweep of an empty or all-fresh store is a no-op.
    pub fn sweep_expired<V>(store: &mut EntryStore<V>, now: u64) -> usize {
        let before = store.len();
        store.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - store.len();
        if removed > 0 {
            debug!(removed, "swept expired entries");
        }
        removed
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::current_timestamp_ms;

    fn store_with_keys(keys: &[&str]) -> EntryStore<String> {
        let mut store = EntryStore::new();
        for key in keys {
            store.insert(key.to_string(), format!("value_{key}"), 60_000);
        }
        store
    }

    fn set_access(store: &mut EntryStore<String>, key: &str, at: u64) {
        store.get_mut(key).unwrap().last_accessed_at = at;
    }

    #[test]
    fn test_policy_clamps_zero_capacity() {
        let policy = EvictionPolicy::new(0);
        assert_eq!(policy.max_entries(), 1);
    }

    #[test]
    fn test_no_eviction_under_capacity() {
        let policy = EvictionPolicy::new(3);
        let mut store = store_with_keys(&["k1", "k2"]);

        assert_eq!(policy.evict_if_needed(&mut store, "k3"), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_no_eviction_on_overwrite() {
        let policy = EvictionPolicy::new(2);
        let mut store = store_with_keys(&["k1", "k2"]);

        // k1 already exists, so replacing it does not grow the store
        assert_eq!(policy.evict_if_needed(&mut store, "k1"), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_evicts_least_recently_accessed() {
        let policy = EvictionPolicy::new(3);
        let mut store = store_with_keys(&["k1", "k2", "k3"]);

        set_access(&mut store, "k1", 1_000);
        set_access(&mut store, "k2", 100);
        set_access(&mut store, "k3", 500);

        let evicted = policy.evict_if_needed(&mut store, "k4");

        assert_eq!(evicted, Some("k2".to_string()));
        assert_eq!(store.len(), 2);
        assert!(store.contains_key("k1"));
        assert!(store.contains_key("k3"));
    }

    #[test]
    fn test_evicts_exactly_one() {
        let policy = EvictionPolicy::new(3);
        let mut store = store_with_keys(&["k1", "k2", "k3"]);

        set_access(&mut store, "k1", 100);
        set_access(&mut store, "k2", 200);
        set_access(&mut store, "k3", 300);

        policy.evict_if_needed(&mut store, "k4");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_tie_break_on_created_at() {
        let policy = EvictionPolicy::new(2);
        let mut store = store_with_keys(&["k1", "k2"]);

        // Equal access times; k2 was created earlier
        set_access(&mut store, "k1", 500);
        set_access(&mut store, "k2", 500);
        store.get_mut("k1").unwrap().created_at = 400;
        store.get_mut("k2").unwrap().created_at = 300;

        let evicted = policy.evict_if_needed(&mut store, "k3");
        assert_eq!(evicted, Some("k2".to_string()));
    }

    #[test]
    fn test_tie_break_on_key() {
        let policy = EvictionPolicy::new(2);
        let mut store = store_with_keys(&["kb", "ka"]);

        // Identical timestamps all around; the smaller key loses
        for key in ["ka", "kb"] {
            let entry = store.get_mut(key).unwrap();
            entry.last_accessed_at = 500;
            entry.created_at = 500;
        }

        let evicted = policy.evict_if_needed(&mut store, "kc");
        assert_eq!(evicted, Some("ka".to_string()));
    }

    #[test]
    fn test_eviction_on_empty_store_is_noop() {
        let policy = EvictionPolicy::new(1);
        let mut store: EntryStore<String> = EntryStore::new();

        // Empty but "at capacity" per len() >= max is false; force the
        // degenerate path by asking with capacity 1 and no entries.
        assert_eq!(policy.evict_if_needed(&mut store, "k1"), None);
    }

    #[test]
    fn test_sweep_expired() {
        let mut store = store_with_keys(&["fresh", "dead1", "dead2"]);
        let now = current_timestamp_ms();

        store.get_mut("dead1").unwrap().created_at = now - 120_000;
        store.get_mut("dead2").unwrap().created_at = now - 120_000;

        let removed = EvictionPolicy::sweep_expired(&mut store, now);

        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert!(store.contains_key("fresh"));
    }

    #[test]
    fn test_sweep_nothing_expired() {
        let mut store = store_with_keys(&["k1", "k2"]);
        let now = current_timestamp_ms();

        assert_eq!(EvictionPolicy::sweep_expired(&mut store, now), 0);
        assert_eq!(store.len(), 2);
    }
}
