// SPDX-License-Identifier: LGPL-3.0-only
#![warn(missing_docs)]

//! Resource caching for vector map renderers.
//!
//! The [VectorCache](core::cache::VectorCache) memoizes the paints, paths and
//! viewport rectangles a renderer rebuilds every frame; the services crate
//! carries the log plumbing around it.

pub use nalgebra as math;
pub use vello::kurbo as geom;
pub use vello::peniko as color;

pub use maprender_core as core;
pub use maprender_services as services;

/// A "prelude" for users of maprender.
///
/// Importing this module brings into scope the most common types
/// needed to set up a cache and draw with it.
///
/// ```rust
/// use maprender::prelude::*;
///
/// let cache: VectorCache<Vec<(f64, f64)>> =
///     VectorCache::from_config(Arc::new(MemorySymbolCache::new()), &CacheConfig::new()).unwrap();
/// let view = Viewport::new(0.0, 0.0, 1.0, 0.0, 800.0, 600.0);
///
/// assert_eq!(cache.get_or_create_rect(&view, Viewport::screen_rect).width(), 800.0);
/// ```
pub mod prelude {
    pub use std::sync::Arc;

    pub use crate::core::cache::{CacheStats, VectorCache, VectorCacheStats};
    pub use crate::core::config::CacheConfig;
    pub use crate::core::error::{CacheError, CacheResult, PaintError};
    pub use crate::core::paint::{fill_paint, stroke_paint, Paint};
    pub use crate::core::style::{FillPattern, FillStyle, LineCap, LineJoin, StrokeStyle};
    pub use crate::core::symbol::{MemorySymbolCache, SymbolCache, SymbolId, SymbolImage};
    pub use crate::core::viewport::Viewport;

    // Logging
    pub use crate::services::{LogBuffer, LogDispatcher, LogEvent, LogListener, PanelLayout};

    // Math
    pub use nalgebra::{Point2, Vector2};

    // Color and geometry
    pub use vello::kurbo::{BezPath, Rect};
    pub use vello::peniko::Color;
}
