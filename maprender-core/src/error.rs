// SPDX-License-Identifier: LGPL-3.0-only

//! # Cache Error Types
//!
//! Errors raised while configuring or constructing the resource caches, and
//! by the reference paint builders.
//!
//! A builder's own error type is handed back to the caller of
//! `try_get_or_create_*` untouched; it is never wrapped in [CacheError].

use std::path::PathBuf;
use thiserror::Error;

use crate::symbol::SymbolId;

/// Errors that can occur while setting up the resource caches.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A bounded store was asked to hold fewer than one entry.
    #[error("cache capacity must be at least 1, got {capacity}")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },

    /// The configuration file could not be read.
    #[error("failed to read cache config {path:?}: {source}")]
    ConfigIo {
        /// The path that failed to load.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [CacheConfig](crate::config::CacheConfig).
    #[error("failed to parse cache config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration file has an extension other than `.toml`.
    #[error("unsupported cache config format: {path:?} (use .toml)")]
    UnsupportedConfigFormat {
        /// The offending path.
        path: PathBuf,
    },
}

/// Result type alias for cache setup operations.
pub type CacheResult<T> = Result<T, CacheError>;

impl CacheError {
    /// Create an invalid capacity error.
    pub fn invalid_capacity(capacity: usize) -> Self {
        Self::InvalidCapacity { capacity }
    }

    /// Create a config I/O error.
    pub fn config_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }

    /// Create an unsupported config format error.
    pub fn unsupported_format(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedConfigFormat { path: path.into() }
    }
}

/// Errors raised by the reference paint builders.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaintError {
    /// A bitmap fill names a symbol the symbol cache does not have.
    #[error("symbol {id} is not in the symbol cache")]
    MissingSymbol {
        /// The missing symbol.
        id: SymbolId,
    },
}
