// SPDX-License-Identifier: LGPL-3.0-only

//! Bounded associative store with least-recently-used eviction.
//!
//! [LruStore] maps a key to a value and holds at most `capacity` entries.
//! Reads that hit and every write refresh an entry's recency; inserting a new
//! key into a full store evicts exactly one entry, the least recently used.
//! There is no time based expiry.

use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;

use super::stats::{CacheStats, Counters};
use crate::error::{CacheError, CacheResult};

/// A bounded LRU map with O(1) lookups and inserts.
///
/// This store does no locking of its own; see
/// [BoundedMemo](super::memo::BoundedMemo) for the shareable version.
pub struct LruStore<K: Hash + Eq, V> {
    entries: LruCache<K, V>,
    counters: Counters,
}

impl<K: Hash + Eq, V> LruStore<K, V> {
    /// Create a store holding at most `capacity` entries.
    ///
    /// Fails with [CacheError::InvalidCapacity] if `capacity` is zero.
    pub fn new(capacity: usize) -> CacheResult<Self> {
        let capacity =
            NonZeroUsize::new(capacity).ok_or_else(|| CacheError::invalid_capacity(capacity))?;
        Ok(Self {
            entries: LruCache::new(capacity),
            counters: Counters::default(),
        })
    }

    /// Look up an entry, marking it as most recently used on a hit.
    ///
    /// A miss leaves the recency order untouched.
    pub fn try_get(&mut self, key: &K) -> Option<&V> {
        match self.entries.get(key) {
            Some(value) => {
                self.counters.hits += 1;
                Some(value)
            }
            None => {
                self.counters.misses += 1;
                None
            }
        }
    }

    /// Insert or overwrite an entry and mark it as most recently used.
    ///
    /// Returns the evicted entry if a new key pushed the store over capacity.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.entries.contains(&key) {
            self.entries.put(key, value);
            return None;
        }

        let evicted = self.entries.push(key, value);
        if evicted.is_some() {
            self.counters.evictions += 1;
        }
        evicted
    }

    /// Look up an entry without touching its recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.peek(key)
    }

    /// Check if a key is present without touching its recency.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Remove every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get store statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats::from_counters(self.counters, self.len(), Some(self.capacity()))
    }
}
