//! Rotated label rectangles.
//!
//! A border label is a rectangle whose baseline follows the local direction
//! of a border. It is stored by its four corners so that renderers can use
//! the baseline (`bl` -> `br`) as a text path directly.

use super::{Rect, RectId};
use crate::primitives::{Point2, Vec2};

/// A rectangle with arbitrary orientation.
///
/// `bl -> br` is the text baseline, `bl -> tl` points towards the top of
/// the glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedRect {
    pub bl: Point2<f64>,
    pub br: Point2<f64>,
    pub tl: Point2<f64>,
    pub tr: Point2<f64>,
}

impl OrientedRect {
    /// Builds a rectangle from its baseline start, the unit baseline
    /// direction, the unit "up" direction and the extents.
    pub fn from_baseline(
        origin: Point2<f64>,
        along: Vec2<f64>,
        up: Vec2<f64>,
        width: f64,
        height: f64,
    ) -> Self {
        let br = origin + along * width;
        Self {
            bl: origin,
            br,
            tl: origin + up * height,
            tr: br + up * height,
        }
    }

    /// Builds an unrotated rectangle from a top-left corner in screen space.
    pub fn axis_aligned(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            bl: Point2::new(x, y + height),
            br: Point2::new(x + width, y + height),
            tl: Point2::new(x, y),
            tr: Point2::new(x + width, y),
        }
    }

    /// Corners in drawing order (bl, br, tr, tl).
    #[inline]
    pub fn corners(&self) -> [Point2<f64>; 4] {
        [self.bl, self.br, self.tr, self.tl]
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.bl.distance(self.br)
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bl.distance(self.tl)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    #[inline]
    pub fn center(&self) -> Point2<f64> {
        self.bl.midpoint(self.tr)
    }

    /// Angle of the baseline in radians.
    #[inline]
    pub fn angle(&self) -> f64 {
        (self.br - self.bl).angle()
    }

    /// Axis-aligned bounds of the four corners.
    pub fn aabb(&self, id: RectId) -> Rect {
        // Four corners always yield a rectangle.
        Rect::bounding(self.corners(), id)
            .unwrap_or(Rect::new(self.bl.x, self.bl.y, 0.0, 0.0, id))
    }

    /// Returns `true` if every corner lies inside `bounds`.
    pub fn is_inside(&self, bounds: &Rect) -> bool {
        self.corners().iter().all(|c| bounds.contains_point(*c))
    }

    /// Returns `true` if the point lies inside or on the rectangle.
    pub fn contains_point(&self, p: Point2<f64>) -> bool {
        let u = self.br - self.bl;
        let v = self.tl - self.bl;
        let d = p - self.bl;
        let du = d.dot(u);
        let dv = d.dot(v);
        du >= 0.0 && du <= u.magnitude_squared() && dv >= 0.0 && dv <= v.magnitude_squared()
    }

    /// Separating axis test against another rotated rectangle.
    ///
    /// Touching rectangles intersect, matching [`Rect::intersects`].
    pub fn intersects(&self, other: &OrientedRect) -> bool {
        let axes = [
            self.br - self.bl,
            self.tl - self.bl,
            other.br - other.bl,
            other.tl - other.bl,
        ];

        let corners_a = self.corners();
        let corners_b = other.corners();

        for axis in axes {
            if axis.magnitude_squared() <= f64::EPSILON {
                continue;
            }
            let (min_a, max_a) = project_corners(&corners_a, axis);
            let (min_b, max_b) = project_corners(&corners_b, axis);
            if max_a < min_b || max_b < min_a {
                return false;
            }
        }

        true
    }
}

/// Projects corners onto an axis and returns (min, max).
fn project_corners(corners: &[Point2<f64>; 4], axis: Vec2<f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for c in corners {
        let proj = c.x * axis.x + c.y * axis.y;
        min = min.min(proj);
        max = max.max(proj);
    }

    (min, max)
}
