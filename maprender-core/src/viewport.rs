// SPDX-License-Identifier: LGPL-3.0-only

//! The viewport descriptor of a map view.

use nalgebra::{Point2, Vector2};
use std::hash::{Hash, Hasher};
use vello::kurbo::Rect;

use crate::cache::keys::f64_bits;

/// The parameters defining the current map view.
///
/// Equality and hashing are structural over every field, comparing floats by
/// bit pattern (with `-0.0` folded into `0.0`), so a viewport can key a cache
/// directly.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    /// Center of the view in world coordinates.
    pub center: Point2<f64>,
    /// World units per screen pixel.
    pub resolution: f64,
    /// Clockwise rotation of the map in degrees.
    pub rotation: f64,
    /// Screen size in pixels.
    pub size: Vector2<f64>,
}

impl Viewport {
    /// Create a viewport.
    pub fn new(
        center_x: f64,
        center_y: f64,
        resolution: f64,
        rotation: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            center: Point2::new(center_x, center_y),
            resolution,
            rotation,
            size: Vector2::new(width, height),
        }
    }

    /// Screen width in pixels.
    pub fn width(&self) -> f64 {
        self.size.x
    }

    /// Screen height in pixels.
    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Whether the map is rotated at all.
    pub fn is_rotated(&self) -> bool {
        self.rotation % 360.0 != 0.0
    }

    /// The screen rectangle `(0, 0, width, height)`.
    pub fn screen_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.x, self.size.y)
    }

    /// The axis aligned world bounding box of the (possibly rotated) screen.
    pub fn to_extent(&self) -> Rect {
        let half_width = self.size.x * self.resolution / 2.0;
        let half_height = self.size.y * self.resolution / 2.0;

        let (half_x, half_y) = if self.is_rotated() {
            let (sin, cos) = sin_cos_degrees(self.rotation);
            let (sin, cos) = (sin.abs(), cos.abs());
            (
                half_width * cos + half_height * sin,
                half_width * sin + half_height * cos,
            )
        } else {
            (half_width, half_height)
        };

        Rect::new(
            self.center.x - half_x,
            self.center.y - half_y,
            self.center.x + half_x,
            self.center.y + half_y,
        )
    }
}

/// `sin_cos` of an angle in degrees, exact at multiples of 90 degrees.
fn sin_cos_degrees(degrees: f64) -> (f64, f64) {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        (0.0, 1.0)
    } else if normalized == 90.0 {
        (1.0, 0.0)
    } else if normalized == 180.0 {
        (0.0, -1.0)
    } else if normalized == 270.0 {
        (-1.0, 0.0)
    } else {
        normalized.to_radians().sin_cos()
    }
}

impl PartialEq for Viewport {
    fn eq(&self, other: &Self) -> bool {
        f64_bits(self.center.x) == f64_bits(other.center.x)
            && f64_bits(self.center.y) == f64_bits(other.center.y)
            && f64_bits(self.resolution) == f64_bits(other.resolution)
            && f64_bits(self.rotation) == f64_bits(other.rotation)
            && f64_bits(self.size.x) == f64_bits(other.size.x)
            && f64_bits(self.size.y) == f64_bits(other.size.y)
    }
}

impl Eq for Viewport {}

impl Hash for Viewport {
    fn hash<H: Hasher>(&self, state: &mut H) {
        f64_bits(self.center.x).hash(state);
        f64_bits(self.center.y).hash(state);
        f64_bits(self.resolution).hash(state);
        f64_bits(self.rotation).hash(state);
        f64_bits(self.size.x).hash(state);
        f64_bits(self.size.y).hash(state);
    }
}
