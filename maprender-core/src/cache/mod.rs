// SPDX-License-Identifier: LGPL-3.0-only

//! # Resource Caches
//!
//! The stores behind [VectorCache]: an LRU bounded [LruStore], the two
//! thread-safe memoizers built on top of it, the cache key types and the
//! statistics they report.

/// Contains the [LruStore] with least-recently-used eviction.
pub mod bounded;
/// Contains the composite cache keys.
pub mod keys;
/// Contains the [BoundedMemo] and [UnboundedMemo] memoizers.
pub mod memo;
/// Contains the cache statistics.
pub mod stats;

mod vector;

pub use bounded::LruStore;
pub use keys::{FillKey, GeometryRef, PaintKey, PathKey};
pub use memo::{BoundedMemo, UnboundedMemo};
pub use stats::{CacheStats, VectorCacheStats};
pub use vector::VectorCache;
