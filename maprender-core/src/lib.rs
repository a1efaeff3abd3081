// SPDX-License-Identifier: LGPL-3.0-only
#![warn(missing_docs)]

//! Core library for maprender => See `maprender` crate.
//!
//! Contains the rendering resource caches and the descriptors they are keyed by.

pub use vello as vg;

/// Contains the [VectorCache](cache::VectorCache) and the stores behind it.
pub mod cache;

/// Contains the [CacheConfig](config::CacheConfig) struct.
pub mod config;

/// Contains the error types.
pub mod error;

/// Contains the default [Paint](paint::Paint) type and its builders.
pub mod paint;

/// Contains stroke and fill style descriptors.
pub mod style;

/// Contains the symbol provider used by fill builders.
pub mod symbol;

/// Contains the [Viewport](viewport::Viewport) descriptor.
pub mod viewport;
