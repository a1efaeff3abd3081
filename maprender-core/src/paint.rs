// SPDX-License-Identifier: LGPL-3.0-only

//! # Paints
//!
//! The default paint type cached by [VectorCache](crate::cache::VectorCache)
//! and the builders turning style descriptors into it.
//!
//! [stroke_paint] and [fill_paint] have the exact shape of the cache's
//! builder arguments, so they can be passed directly:
//!
//! ```
//! use std::sync::Arc;
//! use maprender_core::cache::VectorCache;
//! use maprender_core::paint::fill_paint;
//! use maprender_core::style::FillStyle;
//! use maprender_core::symbol::MemorySymbolCache;
//!
//! let cache: VectorCache<()> =
//!     VectorCache::new(Arc::new(MemorySymbolCache::new()), 100).unwrap();
//!
//! // The symbol cache is empty, so the bitmap cannot be resolved.
//! let grass = Arc::new(FillStyle::bitmap("grass"));
//! assert!(cache.try_get_or_create_fill_paint(Some(&grass), 1.0, 0.0, fill_paint).is_err());
//! ```

use std::sync::Arc;
use vello::kurbo::Stroke;
use vello::peniko::{Brush, Color};

use crate::error::PaintError;
use crate::style::{FillPattern, FillStyle, StrokeStyle};
use crate::symbol::{SymbolCache, SymbolImage};

/// A renderable paint: a brush and optional stroke and pattern settings.
#[derive(Debug, Clone)]
pub struct Paint {
    /// The brush to draw with.
    pub brush: Brush,
    /// Stroke settings. For fill paints this is the outline, if any.
    pub stroke: Option<Stroke>,
    /// Pattern drawn on top of the brush.
    pub pattern: Option<PatternFill>,
}

impl Paint {
    /// A paint that draws nothing.
    pub fn transparent() -> Self {
        Self {
            brush: Brush::Solid(Color::TRANSPARENT),
            stroke: None,
            pattern: None,
        }
    }

    /// Whether drawing with this paint has no visible effect.
    pub fn is_transparent(&self) -> bool {
        self.pattern.is_none()
            && match &self.brush {
                Brush::Solid(color) => color.components[3] == 0.0,
                _ => false,
            }
    }
}

/// A hatch or bitmap pattern of a fill paint.
#[derive(Debug, Clone)]
pub struct PatternFill {
    /// The pattern kind.
    pub kind: FillPattern,
    /// The resolved bitmap for [FillPattern::Bitmap].
    pub image: Option<Arc<SymbolImage>>,
    /// Rotation of the pattern in degrees.
    pub rotation: f64,
}

fn stroke_of(style: &StrokeStyle) -> Stroke {
    let stroke = Stroke::new(style.width)
        .with_caps(style.cap.into())
        .with_join(style.join.into());

    match &style.dash {
        Some(dash) => stroke.with_dashes(dash.offset, dash.intervals.iter().copied()),
        None => stroke,
    }
}

/// Build the paint of a stroke style at the given opacity.
///
/// A missing style yields a [transparent](Paint::transparent) paint.
pub fn stroke_paint(style: Option<&StrokeStyle>, opacity: f32) -> Paint {
    let Some(style) = style else {
        return Paint::transparent();
    };

    Paint {
        brush: Brush::Solid(style.color.multiply_alpha(opacity)),
        stroke: Some(stroke_of(style)),
        pattern: None,
    }
}

/// Build the paint of a fill style at the given opacity and rotation.
///
/// Bitmap patterns are resolved through `symbols`; the fill color, if set,
/// tints the bitmap. Fails with [PaintError::MissingSymbol] if the bitmap is
/// not available.
pub fn fill_paint(
    style: Option<&FillStyle>,
    opacity: f32,
    rotation: f64,
    symbols: &dyn SymbolCache,
) -> Result<Paint, PaintError> {
    let Some(style) = style else {
        return Ok(Paint::transparent());
    };

    let color = style.color.unwrap_or(Color::TRANSPARENT);
    let stroke = style.outline.as_deref().map(stroke_of);

    let (color, pattern) = match &style.pattern {
        FillPattern::Solid => (color, None),
        FillPattern::Hollow => (Color::TRANSPARENT, None),
        FillPattern::Bitmap(id) => {
            let image = symbols
                .get(id)
                .ok_or_else(|| PaintError::MissingSymbol { id: id.clone() })?;
            let tint = style.color.unwrap_or(Color::WHITE);
            let pattern = PatternFill {
                kind: style.pattern.clone(),
                image: Some(image),
                rotation,
            };
            (tint, Some(pattern))
        },
        hatch => {
            let pattern = PatternFill {
                kind: hatch.clone(),
                image: None,
                rotation,
            };
            (color, Some(pattern))
        },
    };

    Ok(Paint {
        brush: Brush::Solid(color.multiply_alpha(opacity)),
        stroke,
        pattern,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::MemorySymbolCache;
    use vello::kurbo::Cap;

    fn solid_color(paint: &Paint) -> Color {
        match &paint.brush {
            Brush::Solid(color) => *color,
            other => panic!("expected a solid brush, got {other:?}"),
        }
    }

    #[test]
    fn test_stroke_paint() {
        let style = StrokeStyle::new(Color::from_rgb8(0, 0, 255), 3.0)
            .with_dash(1.0, [4.0, 2.0])
            .with_cap(crate::style::LineCap::Round);

        let paint = stroke_paint(Some(&style), 0.5);
        let stroke = paint.stroke.as_ref().unwrap();

        assert_eq!(stroke.width, 3.0);
        assert_eq!(stroke.start_cap, Cap::Round);
        assert_eq!(stroke.dash_offset, 1.0);
        assert_eq!(stroke.dash_pattern.as_slice(), &[4.0, 2.0]);
        assert_eq!(solid_color(&paint).components[3], 0.5);
    }

    #[test]
    fn test_missing_style_is_transparent() {
        assert!(stroke_paint(None, 1.0).is_transparent());

        let symbols = MemorySymbolCache::new();
        assert!(fill_paint(None, 1.0, 0.0, &symbols).unwrap().is_transparent());
    }

    #[test]
    fn test_fill_paint_patterns() {
        let symbols = MemorySymbolCache::new();
        let red = Color::from_rgb8(255, 0, 0);

        let solid = fill_paint(Some(&FillStyle::solid(red)), 1.0, 0.0, &symbols).unwrap();
        assert!(solid.pattern.is_none());
        assert!(solid.stroke.is_none());

        let hollow = FillStyle::solid(red).with_pattern(FillPattern::Hollow);
        assert!(fill_paint(Some(&hollow), 1.0, 0.0, &symbols).unwrap().is_transparent());

        let hatch = FillStyle::solid(red)
            .with_pattern(FillPattern::Cross)
            .with_outline(Arc::new(StrokeStyle::new(Color::BLACK, 1.0)));
        let paint = fill_paint(Some(&hatch), 1.0, 30.0, &symbols).unwrap();
        let pattern = paint.pattern.as_ref().unwrap();

        assert_eq!(pattern.kind, FillPattern::Cross);
        assert_eq!(pattern.rotation, 30.0);
        assert!(pattern.image.is_none());
        assert!(paint.stroke.is_some());
    }

    #[test]
    fn test_fill_paint_bitmap() {
        let symbols = MemorySymbolCache::new();
        let style = FillStyle::bitmap("grass");

        assert_eq!(
            fill_paint(Some(&style), 1.0, 0.0, &symbols).unwrap_err(),
            PaintError::MissingSymbol {
                id: "grass".into()
            }
        );

        symbols.insert("grass", SymbolImage::new(vec![0; 4 * 8 * 8], 8, 8));
        let paint = fill_paint(Some(&style), 1.0, 45.0, &symbols).unwrap();
        let pattern = paint.pattern.unwrap();

        assert_eq!(pattern.image.map(|image| image.width), Some(8));
        assert_eq!(pattern.rotation, 45.0);
    }
}
