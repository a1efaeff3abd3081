// SPDX-License-Identifier: LGPL-3.0-only

//! Hit, miss and eviction statistics of the cache stores.

/// Running counters of a single store.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Statistics about a single store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries currently stored.
    pub len: usize,
    /// Maximum number of entries, or `None` for unbounded stores.
    pub capacity: Option<usize>,
    /// Number of lookups that found an entry.
    pub hits: u64,
    /// Number of lookups that found nothing.
    pub misses: u64,
    /// Number of entries evicted to make room.
    pub evictions: u64,
}

impl CacheStats {
    pub(crate) fn from_counters(counters: Counters, len: usize, capacity: Option<usize>) -> Self {
        Self {
            len,
            capacity,
            hits: counters.hits,
            misses: counters.misses,
            evictions: counters.evictions,
        }
    }

    /// Calculate the hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Statistics of every store of a [VectorCache](super::VectorCache).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VectorCacheStats {
    /// The stroke paint store.
    pub stroke_paints: CacheStats,
    /// The fill paint store.
    pub fill_paints: CacheStats,
    /// The viewport rectangle store.
    pub viewports: CacheStats,
    /// The path store.
    pub paths: CacheStats,
}

impl VectorCacheStats {
    fn all(&self) -> [&CacheStats; 4] {
        [
            &self.stroke_paints,
            &self.fill_paints,
            &self.viewports,
            &self.paths,
        ]
    }

    /// Hits across all stores.
    pub fn total_hits(&self) -> u64 {
        self.all().iter().map(|stats| stats.hits).sum()
    }

    /// Misses across all stores.
    pub fn total_misses(&self) -> u64 {
        self.all().iter().map(|stats| stats.misses).sum()
    }
}
