//! Pending Fetch Module
//!
//! Bookkeeping for in-flight fetches. Each key holds at most one shared
//! future; every concurrent caller for that key awaits the same future, so
//! the underlying fetch runs exactly once and its result (or error) reaches
//! all of them.

use std::collections::HashMap;

use futures::future::{BoxFuture, Shared};

use crate::error::CacheError;

// == Shared Fetch ==
/// An in-flight fetch observable by any number of waiters.
pub type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, CacheError>>>;

/// One in-flight fetch record.
struct PendingFetch<V> {
    /// Distinguishes this fetch from any successor under the same key, so a
    /// fetch that settles after `clear()` cannot remove its replacement.
    generation: u64,
    shared: SharedFetch<V>,
}

// == Pending Fetches ==
/// Per-key records of in-flight fetches.
///
/// The tracker is plain bookkeeping; atomicity of "check, then start" comes
/// from the single cache lock its owner holds around every call.
pub struct PendingFetches<V> {
    in_flight: HashMap<String, PendingFetch<V>>,
    next_generation: u64,
}

impl<V> PendingFetches<V> {
    // == Constructor ==
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            in_flight: HashMap::new(),
            next_generation: 0,
        }
    }

    // == Get ==
    /// Returns the in-flight fetch for `key`, if any.
    pub fn get(&self, key: &str) -> Option<SharedFetch<V>> {
        self.in_flight.get(key).map(|p| p.shared.clone())
    }

    // == Contains ==
    /// Checks whether a fetch is in flight for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.in_flight.contains_key(key)
    }

    // == Allocate Generation ==
    /// Hands out the next generation token.
    ///
    /// Allocated before the fetch future is built so the future can identify
    /// its own record when it settles.
    pub fn allocate_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    // == Insert ==
    /// Records an in-flight fetch under its generation token.
    ///
    /// The caller must have checked `get` first (under the same lock);
    /// inserting over an existing record would orphan it.
    pub fn insert(&mut self, key: String, generation: u64, shared: SharedFetch<V>) {
        self.in_flight.insert(key, PendingFetch { generation, shared });
    }

    // == Remove ==
    /// Removes the record for `key` if it still carries `generation`.
    ///
    /// Returns `true` if a record was removed. A stale generation (the record
    /// was cleared and a successor fetch started) leaves the map untouched.
    pub fn remove_if_current(&mut self, key: &str, generation: u64) -> bool {
        match self.in_flight.get(key) {
            Some(p) if p.generation == generation => {
                self.in_flight.remove(key);
                true
            }
            _ => false,
        }
    }

    // == Clear ==
    /// Drops all records. In-flight fetches keep running; only the
    /// bookkeeping is discarded.
    pub fn clear(&mut self) {
        self.in_flight.clear();
    }

    // == Length ==
    /// Returns the number of in-flight fetches.
    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    // == Is Empty ==
    /// Returns true if nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }
}

impl<V> Default for PendingFetches<V> {
    fn default() -> Self {
        Self::new()
    }
}
