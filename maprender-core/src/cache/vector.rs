// SPDX-License-Identifier: LGPL-3.0-only

//! The [VectorCache] facade used by the renderer.

use std::fmt;
use std::sync::Arc;
use vello::kurbo::{BezPath, Rect};

use super::keys::{FillKey, PaintKey, PathKey};
use super::memo::{BoundedMemo, UnboundedMemo};
use super::stats::VectorCacheStats;
use crate::config::CacheConfig;
use crate::error::CacheResult;
use crate::paint::Paint;
use crate::style::{FillStyle, StrokeStyle};
use crate::symbol::SymbolCache;
use crate::viewport::Viewport;

/// Memoizes paints, paths and viewport rectangles for a renderer.
///
/// The cache is made of four stores:
///
/// - stroke paints keyed by `(stroke style, opacity)`, never evicted
/// - fill paints keyed by `(fill style, opacity, rotation)`, never evicted
/// - viewport rectangles keyed by the [Viewport], LRU bounded at
///   `max(1, capacity / 100)`
/// - paths keyed by a [PathKey] derived from viewport, geometry and line
///   width, LRU bounded at `capacity`
///
/// `G` is the geometry type (compared by [Arc] identity), `P` the paint type
/// and `T` the path type. Every key space stores exactly one value type.
///
/// All operations take `&self` and may be called from several threads. Each
/// store keeps its lock while a builder runs, so a slow build delays every
/// other lookup in that store, hits on unrelated keys included. Builders must
/// not call back into the same store. A builder that uses another store of
/// this cache must do so in a fixed order: paint stores, then the viewport
/// store, then the path store. Two builders taking stores in opposite orders
/// on different threads deadlock.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use maprender_core::cache::VectorCache;
/// use maprender_core::paint::stroke_paint;
/// use maprender_core::style::StrokeStyle;
/// use maprender_core::symbol::MemorySymbolCache;
/// use maprender_core::vg::peniko::Color;
///
/// let cache: VectorCache<Vec<(f64, f64)>> =
///     VectorCache::new(Arc::new(MemorySymbolCache::new()), 1000).unwrap();
///
/// let style = Arc::new(StrokeStyle::new(Color::from_rgb8(200, 30, 30), 2.0));
/// let paint = cache.get_or_create_stroke_paint(Some(&style), 0.8, stroke_paint);
/// let again = cache.get_or_create_stroke_paint(Some(&style), 0.8, stroke_paint);
/// assert!(Arc::ptr_eq(&paint, &again));
/// ```
pub struct VectorCache<G: ?Sized, P = Paint, T = BezPath> {
    stroke_paints: UnboundedMemo<PaintKey, Arc<P>>,
    fill_paints: UnboundedMemo<FillKey, Arc<P>>,
    viewports: BoundedMemo<Viewport, Rect>,
    paths: BoundedMemo<PathKey<G>, Arc<T>>,
    symbols: Arc<dyn SymbolCache>,
    capacity: usize,
    rotation_sensitive_paths: bool,
}

impl<G: ?Sized, P, T> VectorCache<G, P, T> {
    /// Create a cache with the default configuration and the given capacity.
    ///
    /// Fails with [InvalidCapacity](crate::error::CacheError::InvalidCapacity)
    /// if `capacity` is zero.
    pub fn new(symbols: Arc<dyn SymbolCache>, capacity: usize) -> CacheResult<Self> {
        Self::from_config(symbols, &CacheConfig::new().with_capacity(capacity))
    }

    /// Create a cache from a [CacheConfig].
    pub fn from_config(symbols: Arc<dyn SymbolCache>, config: &CacheConfig) -> CacheResult<Self> {
        config.validate()?;
        let viewport_capacity = config.viewport_capacity();

        log::debug!(
            "creating vector cache: paths {}, viewports {}, rotation sensitive paths {}",
            config.capacity,
            viewport_capacity,
            config.rotation_sensitive_paths
        );

        Ok(Self {
            stroke_paints: UnboundedMemo::new(),
            fill_paints: UnboundedMemo::new(),
            viewports: BoundedMemo::new(viewport_capacity)?,
            paths: BoundedMemo::new(config.capacity)?,
            symbols,
            capacity: config.capacity,
            rotation_sensitive_paths: config.rotation_sensitive_paths,
        })
    }

    /// Get the stroke paint for `style` and `opacity`, building it on a miss.
    pub fn get_or_create_stroke_paint(
        &self,
        style: Option<&Arc<StrokeStyle>>,
        opacity: f32,
        build: impl FnOnce(Option<&StrokeStyle>, f32) -> P,
    ) -> Arc<P> {
        let key = PaintKey::new(style, opacity);
        self.stroke_paints.get_or_create(key, |key| {
            log::trace!("stroke paint miss (opacity {})", key.opacity());
            Arc::new(build(key.style().map(|style| &**style), key.opacity()))
        })
    }

    /// Like [get_or_create_stroke_paint](Self::get_or_create_stroke_paint), with
    /// a fallible builder. Errors are returned unchanged and not cached.
    pub fn try_get_or_create_stroke_paint<E>(
        &self,
        style: Option<&Arc<StrokeStyle>>,
        opacity: f32,
        build: impl FnOnce(Option<&StrokeStyle>, f32) -> Result<P, E>,
    ) -> Result<Arc<P>, E> {
        let key = PaintKey::new(style, opacity);
        self.stroke_paints.try_get_or_create(key, |key| {
            log::trace!("stroke paint miss (opacity {})", key.opacity());
            build(key.style().map(|style| &**style), key.opacity()).map(Arc::new)
        })
    }

    /// Get the fill paint for `style`, `opacity` and `rotation`, building it
    /// on a miss. The builder receives this cache's [SymbolCache].
    pub fn get_or_create_fill_paint(
        &self,
        style: Option<&Arc<FillStyle>>,
        opacity: f32,
        rotation: f64,
        build: impl FnOnce(Option<&FillStyle>, f32, f64, &dyn SymbolCache) -> P,
    ) -> Arc<P> {
        let key = FillKey::new(style, opacity, rotation);
        self.fill_paints.get_or_create(key, |key| {
            log::trace!(
                "fill paint miss (opacity {}, rotation {})",
                key.opacity(),
                key.rotation()
            );
            Arc::new(build(
                key.style().map(|style| &**style),
                key.opacity(),
                key.rotation(),
                self.symbols.as_ref(),
            ))
        })
    }

    /// Like [get_or_create_fill_paint](Self::get_or_create_fill_paint), with a
    /// fallible builder. Errors are returned unchanged and not cached.
    pub fn try_get_or_create_fill_paint<E>(
        &self,
        style: Option<&Arc<FillStyle>>,
        opacity: f32,
        rotation: f64,
        build: impl FnOnce(Option<&FillStyle>, f32, f64, &dyn SymbolCache) -> Result<P, E>,
    ) -> Result<Arc<P>, E> {
        let key = FillKey::new(style, opacity, rotation);
        self.fill_paints.try_get_or_create(key, |key| {
            log::trace!(
                "fill paint miss (opacity {}, rotation {})",
                key.opacity(),
                key.rotation()
            );
            build(
                key.style().map(|style| &**style),
                key.opacity(),
                key.rotation(),
                self.symbols.as_ref(),
            )
            .map(Arc::new)
        })
    }

    /// Get the rectangle derived from `viewport`, building it on a miss.
    pub fn get_or_create_rect(&self, viewport: &Viewport, build: impl FnOnce(&Viewport) -> Rect) -> Rect {
        self.viewports.get_or_create(*viewport, |viewport| {
            log::trace!("viewport rect miss for {:?}", viewport);
            build(viewport)
        })
    }

    /// Like [get_or_create_rect](Self::get_or_create_rect), with a fallible
    /// builder. Errors are returned unchanged and not cached.
    pub fn try_get_or_create_rect<E>(
        &self,
        viewport: &Viewport,
        build: impl FnOnce(&Viewport) -> Result<Rect, E>,
    ) -> Result<Rect, E> {
        self.viewports.try_get_or_create(*viewport, |viewport| {
            log::trace!("viewport rect miss for {:?}", viewport);
            build(viewport)
        })
    }

    /// Get the path of `geometry` as seen through `viewport` at `line_width`,
    /// building it on a miss.
    ///
    /// The geometry is keyed by identity: reuse the same [Arc] across frames
    /// to hit the cache.
    pub fn get_or_create_path(
        &self,
        viewport: &Viewport,
        geometry: &Arc<G>,
        line_width: f32,
        build: impl FnOnce(&G, &Viewport, f32) -> T,
    ) -> Arc<T> {
        let key = PathKey::new(viewport, geometry, line_width, self.rotation_sensitive_paths);
        self.paths.get_or_create(key, |key| {
            log::trace!("path miss for {:?}", key.geometry());
            Arc::new(build(&**geometry, viewport, line_width))
        })
    }

    /// Like [get_or_create_path](Self::get_or_create_path), with a fallible
    /// builder. Errors are returned unchanged and not cached.
    pub fn try_get_or_create_path<E>(
        &self,
        viewport: &Viewport,
        geometry: &Arc<G>,
        line_width: f32,
        build: impl FnOnce(&G, &Viewport, f32) -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        let key = PathKey::new(viewport, geometry, line_width, self.rotation_sensitive_paths);
        self.paths.try_get_or_create(key, |key| {
            log::trace!("path miss for {:?}", key.geometry());
            build(&**geometry, viewport, line_width).map(Arc::new)
        })
    }

    /// The symbol cache handed to fill builders.
    pub fn symbols(&self) -> &Arc<dyn SymbolCache> {
        &self.symbols
    }

    /// Capacity of the path store.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Capacity of the viewport rectangle store.
    pub fn viewport_capacity(&self) -> usize {
        self.viewports.capacity()
    }

    /// Whether the viewport rotation is part of the path key.
    pub fn rotation_sensitive_paths(&self) -> bool {
        self.rotation_sensitive_paths
    }

    /// Get statistics of every store.
    pub fn stats(&self) -> VectorCacheStats {
        VectorCacheStats {
            stroke_paints: self.stroke_paints.stats(),
            fill_paints: self.fill_paints.stats(),
            viewports: self.viewports.stats(),
            paths: self.paths.stats(),
        }
    }
}

impl<G: ?Sized, P, T> fmt::Debug for VectorCache<G, P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorCache")
            .field("capacity", &self.capacity)
            .field("rotation_sensitive_paths", &self.rotation_sensitive_paths)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
