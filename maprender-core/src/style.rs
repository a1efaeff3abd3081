// SPDX-License-Identifier: LGPL-3.0-only

//! # Style Descriptors
//!
//! Immutable descriptions of how vector features are stroked and filled.
//!
//! Descriptors are shared as `Arc<StrokeStyle>` / `Arc<FillStyle>` and define
//! structural equality themselves: two descriptors with the same color, width,
//! dashes and pattern are the same cache key, no matter where they were
//! allocated. Colors and lengths are compared by bit pattern.

use std::hash::{Hash, Hasher};
use std::sync::Arc;
use vello::kurbo::{Cap, Join};
use vello::peniko::Color;

use crate::cache::keys::{f32_bits, f64_bits};
use crate::symbol::SymbolId;

/// Bit patterns of a color's components.
fn color_bits(color: &Color) -> [u32; 4] {
    color.components.map(f32_bits)
}

/// How the ends of stroked lines are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineCap {
    /// Flat end at the end point.
    #[default]
    Butt,
    /// Rounded end.
    Round,
    /// Square end extending past the end point.
    Square,
}

impl From<LineCap> for Cap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => Cap::Butt,
            LineCap::Round => Cap::Round,
            LineCap::Square => Cap::Square,
        }
    }
}

/// How the corners of stroked lines are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineJoin {
    /// Sharp corner.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Cut-off corner.
    Bevel,
}

impl From<LineJoin> for Join {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => Join::Miter,
            LineJoin::Round => Join::Round,
            LineJoin::Bevel => Join::Bevel,
        }
    }
}

/// A dash pattern: alternating on/off lengths, starting at `offset`.
#[derive(Debug, Clone)]
pub struct DashPattern {
    /// Offset into the pattern where drawing starts.
    pub offset: f64,
    /// Alternating dash and gap lengths.
    pub intervals: Vec<f64>,
}

impl PartialEq for DashPattern {
    fn eq(&self, other: &Self) -> bool {
        f64_bits(self.offset) == f64_bits(other.offset)
            && self.intervals.len() == other.intervals.len()
            && self
                .intervals
                .iter()
                .zip(&other.intervals)
                .all(|(a, b)| f64_bits(*a) == f64_bits(*b))
    }
}

impl Eq for DashPattern {}

impl Hash for DashPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        f64_bits(self.offset).hash(state);
        self.intervals.len().hash(state);
        for interval in &self.intervals {
            f64_bits(*interval).hash(state);
        }
    }
}

/// Describes how a line or an outline is stroked.
#[derive(Debug, Clone)]
pub struct StrokeStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f64,
    /// Optional dash pattern. `None` draws a continuous line.
    pub dash: Option<DashPattern>,
    /// Line cap.
    pub cap: LineCap,
    /// Line join.
    pub join: LineJoin,
}

impl StrokeStyle {
    /// Create a continuous stroke with butt caps and miter joins.
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
            cap: LineCap::default(),
            join: LineJoin::default(),
        }
    }

    /// Set a dash pattern.
    pub fn with_dash(mut self, offset: f64, intervals: impl Into<Vec<f64>>) -> Self {
        self.dash = Some(DashPattern {
            offset,
            intervals: intervals.into(),
        });
        self
    }

    /// Set the line cap.
    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    /// Set the line join.
    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }
}

impl PartialEq for StrokeStyle {
    fn eq(&self, other: &Self) -> bool {
        color_bits(&self.color) == color_bits(&other.color)
            && f64_bits(self.width) == f64_bits(other.width)
            && self.dash == other.dash
            && self.cap == other.cap
            && self.join == other.join
    }
}

impl Eq for StrokeStyle {}

impl Hash for StrokeStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        color_bits(&self.color).hash(state);
        f64_bits(self.width).hash(state);
        self.dash.hash(state);
        self.cap.hash(state);
        self.join.hash(state);
    }
}

/// The pattern used to fill an area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FillPattern {
    /// Uniform color.
    #[default]
    Solid,
    /// Nothing is filled.
    Hollow,
    /// Horizontal hatch lines.
    Horizontal,
    /// Vertical hatch lines.
    Vertical,
    /// Horizontal and vertical hatch lines.
    Cross,
    /// Both diagonal hatch directions.
    DiagonalCross,
    /// Hatch lines from bottom left to top right.
    ForwardDiagonal,
    /// Hatch lines from top left to bottom right.
    BackwardDiagonal,
    /// Regular dots.
    Dotted,
    /// A bitmap from the symbol cache, tiled across the area.
    Bitmap(SymbolId),
}

impl FillPattern {
    /// Whether the pattern is one of the hatch patterns.
    pub fn is_hatch(&self) -> bool {
        matches!(
            self,
            Self::Horizontal
                | Self::Vertical
                | Self::Cross
                | Self::DiagonalCross
                | Self::ForwardDiagonal
                | Self::BackwardDiagonal
                | Self::Dotted
        )
    }
}

/// Describes how an area is filled.
#[derive(Debug, Clone, Default)]
pub struct FillStyle {
    /// Fill color. `None` means transparent for color based patterns and
    /// untinted for bitmaps.
    pub color: Option<Color>,
    /// Fill pattern.
    pub pattern: FillPattern,
    /// Optional outline drawn around the area.
    pub outline: Option<Arc<StrokeStyle>>,
}

impl FillStyle {
    /// A solid fill.
    pub fn solid(color: Color) -> Self {
        Self {
            color: Some(color),
            pattern: FillPattern::Solid,
            outline: None,
        }
    }

    /// A bitmap fill from the symbol cache.
    pub fn bitmap(symbol: impl Into<SymbolId>) -> Self {
        Self {
            color: None,
            pattern: FillPattern::Bitmap(symbol.into()),
            outline: None,
        }
    }

    /// Set the fill pattern.
    pub fn with_pattern(mut self, pattern: FillPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Set the outline.
    pub fn with_outline(mut self, outline: Arc<StrokeStyle>) -> Self {
        self.outline = Some(outline);
        self
    }
}

impl PartialEq for FillStyle {
    fn eq(&self, other: &Self) -> bool {
        self.color.as_ref().map(color_bits) == other.color.as_ref().map(color_bits)
            && self.pattern == other.pattern
            && self.outline == other.outline
    }
}

impl Eq for FillStyle {}

impl Hash for FillStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.color.as_ref().map(color_bits).hash(state);
        self.pattern.hash(state);
        self.outline.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_equality_is_structural() {
        let a = StrokeStyle::new(Color::from_rgb8(255, 0, 0), 1.5).with_dash(0.0, [4.0, 2.0]);
        let b = StrokeStyle::new(Color::from_rgb8(255, 0, 0), 1.5).with_dash(0.0, [4.0, 2.0]);
        let c = b.clone().with_cap(LineCap::Round);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_fill_equality_includes_outline() {
        let outline = Arc::new(StrokeStyle::new(Color::BLACK, 1.0));
        let plain = FillStyle::solid(Color::WHITE);
        let outlined = FillStyle::solid(Color::WHITE).with_outline(outline);

        assert_ne!(plain, outlined);
        assert_eq!(plain, FillStyle::solid(Color::WHITE));
    }

    #[test]
    fn test_hatch_patterns() {
        assert!(FillPattern::Cross.is_hatch());
        assert!(!FillPattern::Solid.is_hatch());
        assert!(!FillPattern::Bitmap(SymbolId::from("grass")).is_hatch());
    }
}
