// SPDX-License-Identifier: LGPL-3.0-only

//! Symbol and texture lookup used by fill paint builders.
//!
//! The [VectorCache](crate::cache::VectorCache) never reads symbols itself; it
//! only hands its [SymbolCache] to fill builders, which use it to resolve
//! bitmap patterns.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Identifier of a symbol or texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolId(Arc<str>);

impl SymbolId {
    /// Create a symbol id.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SymbolId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SymbolId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded symbol image data.
#[derive(Debug, Clone)]
pub struct SymbolImage {
    /// Raw RGBA pixel data.
    pub pixels: Arc<Vec<u8>>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl SymbolImage {
    /// Create a symbol image from RGBA pixels.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            pixels: Arc::new(pixels),
            width,
            height,
        }
    }
}

/// Provides symbol and texture resources by identifier.
pub trait SymbolCache: Send + Sync {
    /// Look up a symbol.
    fn get(&self, id: &SymbolId) -> Option<Arc<SymbolImage>>;

    /// Check if a symbol is available.
    fn contains(&self, id: &SymbolId) -> bool {
        self.get(id).is_some()
    }
}

/// An in-memory [SymbolCache] filled by the embedder.
#[derive(Default)]
pub struct MemorySymbolCache {
    symbols: RwLock<HashMap<SymbolId, Arc<SymbolImage>>>,
}

impl MemorySymbolCache {
    /// Create an empty symbol cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a symbol, replacing any previous image with the same id.
    pub fn insert(&self, id: impl Into<SymbolId>, image: SymbolImage) -> Option<Arc<SymbolImage>> {
        self.symbols
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.into(), Arc::new(image))
    }

    /// Remove a symbol.
    pub fn remove(&self, id: &SymbolId) -> Option<Arc<SymbolImage>> {
        self.symbols
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    /// Get the number of registered symbols.
    pub fn len(&self) -> usize {
        self.symbols.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if no symbols are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SymbolCache for MemorySymbolCache {
    fn get(&self, id: &SymbolId) -> Option<Arc<SymbolImage>> {
        self.symbols
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn contains(&self, id: &SymbolId) -> bool {
        self.symbols
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }
}
