// SPDX-License-Identifier: LGPL-3.0-only

//! Get-or-create memoizers shared between threads.
//!
//! Both memoizers own their store behind a mutex and hold it for the whole
//! lookup, build and insert sequence. Concurrent misses on the same key
//! therefore build the value exactly once, and the recency list of the bounded
//! store is only ever touched under the lock.
//!
//! A builder that fails (or panics) leaves the store exactly as it was, so the
//! next request for the key runs the builder again. Builders must not call back
//! into the memoizer that is running them.
//!
//! Holding the lock during the build serializes the memoizer: while one
//! thread builds, lookups of every key block, hits included. A builder that
//! reaches into a second memoizer takes a second lock; callers combining
//! memoizers that way must always take them in the same order.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::convert::Infallible;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::bounded::LruStore;
use super::stats::{CacheStats, Counters};
use crate::error::CacheResult;

fn never<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// A memoizer that never evicts.
///
/// Used for style palettes, which are small and finite in practice.
pub struct UnboundedMemo<K, V> {
    state: Mutex<UnboundedState<K, V>>,
}

struct UnboundedState<K, V> {
    entries: HashMap<K, V>,
    counters: Counters,
}

impl<K: Hash + Eq, V: Clone> UnboundedMemo<K, V> {
    /// Create an empty memoizer.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(UnboundedState {
                entries: HashMap::new(),
                counters: Counters::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, UnboundedState<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the value stored under `key`, building and storing it on a miss.
    pub fn get_or_create(&self, key: K, build: impl FnOnce(&K) -> V) -> V {
        never(self.try_get_or_create(key, |key| Ok(build(key))))
    }

    /// Like [get_or_create](Self::get_or_create), with a fallible builder.
    ///
    /// A builder error is returned as is and nothing is stored.
    pub fn try_get_or_create<E>(
        &self,
        key: K,
        build: impl FnOnce(&K) -> Result<V, E>,
    ) -> Result<V, E> {
        let mut guard = self.lock();
        let state = &mut *guard;

        match state.entries.entry(key) {
            Entry::Occupied(entry) => {
                state.counters.hits += 1;
                Ok(entry.get().clone())
            }
            Entry::Vacant(entry) => {
                state.counters.misses += 1;
                let value = build(entry.key())?;
                Ok(entry.insert(value).clone())
            }
        }
    }

    /// Look up a value without building it.
    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().entries.get(key).cloned()
    }

    /// Check if a key is present.
    pub fn contains(&self, key: &K) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Check if the memoizer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get memoizer statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats::from_counters(state.counters, state.entries.len(), None)
    }
}

impl<K: Hash + Eq, V: Clone> Default for UnboundedMemo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A memoizer backed by a [LruStore].
pub struct BoundedMemo<K: Hash + Eq, V> {
    store: Mutex<LruStore<K, V>>,
}

impl<K: Hash + Eq, V: Clone> BoundedMemo<K, V> {
    /// Create a memoizer holding at most `capacity` entries.
    pub fn new(capacity: usize) -> CacheResult<Self> {
        Ok(Self {
            store: Mutex::new(LruStore::new(capacity)?),
        })
    }

    fn lock(&self) -> MutexGuard<'_, LruStore<K, V>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the value stored under `key`, building and storing it on a miss.
    pub fn get_or_create(&self, key: K, build: impl FnOnce(&K) -> V) -> V {
        never(self.try_get_or_create(key, |key| Ok(build(key))))
    }

    /// Like [get_or_create](Self::get_or_create), with a fallible builder.
    ///
    /// A builder error is returned as is; nothing is stored and nothing is
    /// evicted.
    pub fn try_get_or_create<E>(
        &self,
        key: K,
        build: impl FnOnce(&K) -> Result<V, E>,
    ) -> Result<V, E> {
        let mut store = self.lock();
        if let Some(value) = store.try_get(&key) {
            return Ok(value.clone());
        }

        let value = build(&key)?;
        if store.set(key, value.clone()).is_some() {
            log::trace!(
                "evicted least recently used entry (capacity {})",
                store.capacity()
            );
        }
        Ok(value)
    }

    /// Look up a value without building it. A hit refreshes its recency.
    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().try_get(key).cloned()
    }

    /// Check if a key is present without touching its recency.
    pub fn contains(&self, key: &K) -> bool {
        self.lock().contains(key)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if the memoizer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Get memoizer statistics.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }
}
