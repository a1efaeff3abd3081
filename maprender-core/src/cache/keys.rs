// SPDX-License-Identifier: LGPL-3.0-only

//! Cache keys for the individual stores of the [VectorCache](super::VectorCache).
//!
//! Every key space has its own key type with an explicit equality contract:
//!
//! | Key          | Compared by value                                | Compared by identity |
//! |--------------|--------------------------------------------------|----------------------|
//! | [PaintKey]   | stroke style, opacity                            | -                    |
//! | [FillKey]    | fill style, opacity, rotation                    | -                    |
//! | [PathKey]    | viewport extent, resolution, rotation, line width | geometry             |
//! | `Viewport`   | center, resolution, rotation, screen size        | -                    |
//!
//! Floating point components are compared by bit pattern after folding
//! `-0.0` into `0.0`, which makes every key `Eq + Hash`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::style::{FillStyle, StrokeStyle};
use crate::viewport::Viewport;

/// Bit pattern of an `f32`, with `-0.0` folded into `0.0`.
pub(crate) fn f32_bits(value: f32) -> u32 {
    if value == 0.0 {
        0.0f32.to_bits()
    } else {
        value.to_bits()
    }
}

/// Bit pattern of an `f64`, with `-0.0` folded into `0.0`.
pub(crate) fn f64_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// A geometry reference compared by pointer identity.
///
/// Two geometries with identical coordinates but separate allocations are
/// different keys. Holding the [Arc] keeps the allocation alive for as long as
/// the key exists, so its address cannot be handed to another geometry.
pub struct GeometryRef<G: ?Sized>(Arc<G>);

impl<G: ?Sized> GeometryRef<G> {
    /// Wrap a shared geometry.
    pub fn new(geometry: &Arc<G>) -> Self {
        Self(Arc::clone(geometry))
    }

    /// The referenced geometry.
    pub fn geometry(&self) -> &Arc<G> {
        &self.0
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl<G: ?Sized> Clone for GeometryRef<G> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<G: ?Sized> PartialEq for GeometryRef<G> {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<G: ?Sized> Eq for GeometryRef<G> {}

impl<G: ?Sized> Hash for GeometryRef<G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<G: ?Sized> fmt::Debug for GeometryRef<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeometryRef({:#x})", self.addr())
    }
}

/// Key of the stroke paint store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaintKey {
    style: Option<Arc<StrokeStyle>>,
    opacity_bits: u32,
}

impl PaintKey {
    /// Create a stroke paint key.
    pub fn new(style: Option<&Arc<StrokeStyle>>, opacity: f32) -> Self {
        Self {
            style: style.cloned(),
            opacity_bits: f32_bits(opacity),
        }
    }

    /// The stroke style of this key.
    pub fn style(&self) -> Option<&Arc<StrokeStyle>> {
        self.style.as_ref()
    }

    /// The opacity of this key.
    pub fn opacity(&self) -> f32 {
        f32::from_bits(self.opacity_bits)
    }
}

/// Key of the fill paint store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FillKey {
    style: Option<Arc<FillStyle>>,
    opacity_bits: u32,
    rotation_bits: u64,
}

impl FillKey {
    /// Create a fill paint key.
    pub fn new(style: Option<&Arc<FillStyle>>, opacity: f32, rotation: f64) -> Self {
        Self {
            style: style.cloned(),
            opacity_bits: f32_bits(opacity),
            rotation_bits: f64_bits(rotation),
        }
    }

    /// The fill style of this key.
    pub fn style(&self) -> Option<&Arc<FillStyle>> {
        self.style.as_ref()
    }

    /// The opacity of this key.
    pub fn opacity(&self) -> f32 {
        f32::from_bits(self.opacity_bits)
    }

    /// The rotation of this key in degrees.
    pub fn rotation(&self) -> f64 {
        f64::from_bits(self.rotation_bits)
    }
}

/// Key of the path store.
///
/// The viewport is reduced to its world extent and resolution. Its rotation is
/// part of the key only when the cache was built with rotation sensitive paths;
/// otherwise viewports whose rotated extents coincide share a path.
pub struct PathKey<G: ?Sized> {
    extent_bits: [u64; 4],
    resolution_bits: u64,
    rotation_bits: Option<u64>,
    geometry: GeometryRef<G>,
    line_width_bits: u32,
}

impl<G: ?Sized> PathKey<G> {
    /// Derive a path key from a viewport, a geometry and a line width.
    pub fn new(
        viewport: &Viewport,
        geometry: &Arc<G>,
        line_width: f32,
        rotation_sensitive: bool,
    ) -> Self {
        let extent = viewport.to_extent();
        Self {
            extent_bits: [
                f64_bits(extent.x0),
                f64_bits(extent.y0),
                f64_bits(extent.x1),
                f64_bits(extent.y1),
            ],
            resolution_bits: f64_bits(viewport.resolution),
            rotation_bits: rotation_sensitive.then(|| f64_bits(viewport.rotation)),
            geometry: GeometryRef::new(geometry),
            line_width_bits: f32_bits(line_width),
        }
    }

    /// The geometry of this key.
    pub fn geometry(&self) -> &GeometryRef<G> {
        &self.geometry
    }

    /// The line width of this key.
    pub fn line_width(&self) -> f32 {
        f32::from_bits(self.line_width_bits)
    }
}

impl<G: ?Sized> Clone for PathKey<G> {
    fn clone(&self) -> Self {
        Self {
            extent_bits: self.extent_bits,
            resolution_bits: self.resolution_bits,
            rotation_bits: self.rotation_bits,
            geometry: self.geometry.clone(),
            line_width_bits: self.line_width_bits,
        }
    }
}

impl<G: ?Sized> PartialEq for PathKey<G> {
    fn eq(&self, other: &Self) -> bool {
        self.extent_bits == other.extent_bits
            && self.resolution_bits == other.resolution_bits
            && self.rotation_bits == other.rotation_bits
            && self.geometry == other.geometry
            && self.line_width_bits == other.line_width_bits
    }
}

impl<G: ?Sized> Eq for PathKey<G> {}

impl<G: ?Sized> Hash for PathKey<G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.extent_bits.hash(state);
        self.resolution_bits.hash(state);
        self.rotation_bits.hash(state);
        self.geometry.hash(state);
        self.line_width_bits.hash(state);
    }
}

impl<G: ?Sized> fmt::Debug for PathKey<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathKey")
            .field("extent_bits", &self.extent_bits)
            .field("resolution", &f64::from_bits(self.resolution_bits))
            .field("rotation", &self.rotation_bits.map(f64::from_bits))
            .field("geometry", &self.geometry)
            .field("line_width", &self.line_width())
            .finish()
    }
}
