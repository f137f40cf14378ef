//! Entry Store Module
//!
//! The keyed entry map underlying the cache. This layer is deliberately
//! simple: raw lookups never mutate recency and expiry is never interpreted
//! here. Freshness decisions and LRU touches belong to the layers above.

use std::collections::HashMap;

use regex::Regex;

use crate::cache::CacheEntry;

// == Entry Store ==
/// Keyed storage for cache entries.
#[derive(Debug)]
pub struct EntryStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V> EntryStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    // == Insert ==
    /// Inserts or replaces an entry.
    ///
    /// Replacing an existing key resets both `created_at` and
    /// `last_accessed_at`, exactly as if the entry were new.
    pub fn insert(&mut self, key: String, value: V, ttl_ms: u64) {
        self.entries.insert(key, CacheEntry::new(value, ttl_ms));
    }

    // == Get ==
    /// Pure lookup; does not update recency.
    pub fn get(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    /// Mutable lookup, for the orchestrator's recency updates.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut CacheEntry<V>> {
        self.entries.get_mut(key)
    }

    // == Contains ==
    /// Checks whether a key is present (expired or not).
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Remove ==
    /// Idempotent removal. Returns `true` if an entry was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Remove Matching ==
    /// Removes every entry whose key matches `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn remove_matching(&mut self, pattern: &Regex) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pattern.is_match(key));
        before - self.entries.len()
    }

    // == Retain ==
    /// Keeps only the entries for which the predicate returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&String, &CacheEntry<V>) -> bool) {
        self.entries.retain(|key, entry| f(key, entry));
    }

    // == Clear ==
    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Iter ==
    /// Iterates over all entries, expired ones included.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CacheEntry<V>)> {
        self.entries.iter()
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for EntryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_new() {
        let store: EntryStore<String> = EntryStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_insert_and_get() {
        let mut store = EntryStore::new();

        store.insert("key1".to_string(), "value1".to_string(), 60_000);

        let entry = store.get("key1").unwrap();
        assert_eq!(entry.value, "value1");
        assert_eq!(entry.ttl_ms, 60_000);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store: EntryStore<String> = EntryStore::new();
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_get_does_not_touch_recency() {
        let mut store = EntryStore::new();
        store.insert("key1".to_string(), "value1".to_string(), 60_000);

        let before = store.get("key1").unwrap().last_accessed_at;
        let _ = store.get("key1");
        let after = store.get("key1").unwrap().last_accessed_at;

        assert_eq!(before, after);
    }

    #[test]
    fn test_store_overwrite_resets_timestamps() {
        let mut store = EntryStore::new();
        store.insert("key1".to_string(), "value1".to_string(), 60_000);

        // Backdate the original entry, then overwrite
        {
            let entry = store.get_mut("key1").unwrap();
            entry.created_at -= 10_000;
            entry.last_accessed_at -= 10_000;
        }
        let old_created = store.get("key1").unwrap().created_at;

        store.insert("key1".to_string(), "value2".to_string(), 30_000);

        let entry = store.get("key1").unwrap();
        assert_eq!(entry.value, "value2");
        assert_eq!(entry.ttl_ms, 30_000);
        assert!(entry.created_at > old_created, "overwrite must reset created_at");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_remove() {
        let mut store = EntryStore::new();
        store.insert("key1".to_string(), "value1".to_string(), 60_000);

        assert!(store.remove("key1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_remove_is_idempotent() {
        let mut store: EntryStore<String> = EntryStore::new();
        assert!(!store.remove("nonexistent"));
        assert!(!store.remove("nonexistent"));
    }

    #[test]
    fn test_store_remove_matching() {
        let mut store = EntryStore::new();
        store.insert("user:1".to_string(), "alice".to_string(), 60_000);
        store.insert("user:2".to_string(), "bob".to_string(), 60_000);
        store.insert("post:1".to_string(), "hello".to_string(), 60_000);

        let pattern = Regex::new("^user:").unwrap();
        let removed = store.remove_matching(&pattern);

        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert!(store.get("post:1").is_some());
        assert!(store.get("user:1").is_none());
        assert!(store.get("user:2").is_none());
    }

    #[test]
    fn test_store_remove_matching_no_match() {
        let mut store = EntryStore::new();
        store.insert("post:1".to_string(), "hello".to_string(), 60_000);

        let pattern = Regex::new("^user:").unwrap();
        assert_eq!(store.remove_matching(&pattern), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_clear() {
        let mut store = EntryStore::new();
        store.insert("key1".to_string(), "value1".to_string(), 60_000);
        store.insert("key2".to_string(), "value2".to_string(), 60_000);

        store.clear();

        assert!(store.is_empty());
    }

    #[test]
    fn test_store_retain() {
        let mut store = EntryStore::new();
        store.insert("keep".to_string(), "a".to_string(), 60_000);
        store.insert("drop".to_string(), "b".to_string(), 60_000);

        store.retain(|key, _| key == "keep");

        assert_eq!(store.len(), 1);
        assert!(store.contains_key("keep"));
    }
}
