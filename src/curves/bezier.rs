//! Cubic Bézier segments and their flattening.
//!
//! Smoothed border edges are cubic segments. Label placement walks them by
//! arc length, so each segment can be flattened into a polyline with a
//! bounded deviation.

use crate::primitives::{Point2, Segment2};
use num_traits::Float;

/// A cubic Bézier curve defined by 4 control points.
///
/// The curve starts at `p0`, is influenced by `p1` and `p2`, and ends at `p3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier2<F> {
    /// Start point
    pub p0: Point2<F>,
    /// First control point
    pub p1: Point2<F>,
    /// Second control point
    pub p2: Point2<F>,
    /// End point
    pub p3: Point2<F>,
}

impl<F: Float> CubicBezier2<F> {
    /// Creates a new cubic Bézier curve.
    #[inline]
    pub fn new(p0: Point2<F>, p1: Point2<F>, p2: Point2<F>, p3: Point2<F>) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Creates a degenerate cubic that traces the straight segment `p0`-`p3`.
    #[inline]
    pub fn straight(p0: Point2<F>, p3: Point2<F>) -> Self {
        Self::new(p0, p0, p3, p3)
    }

    /// Evaluates the curve at parameter `t` (0 to 1).
    #[inline]
    pub fn eval(&self, t: F) -> Point2<F> {
        let one = F::one();
        let mt = one - t;
        let mt2 = mt * mt;
        let t2 = t * t;
        let three = one + one + one;

        let a = mt2 * mt;
        let b = three * mt2 * t;
        let c = three * mt * t2;
        let d = t2 * t;

        Point2::new(
            a * self.p0.x + b * self.p1.x + c * self.p2.x + d * self.p3.x,
            a * self.p0.y + b * self.p1.y + c * self.p2.y + d * self.p3.y,
        )
    }

    /// Splits the curve at parameter `t` with de Casteljau's algorithm.
    pub fn split(&self, t: F) -> (Self, Self) {
        let p01 = self.p0.lerp(self.p1, t);
        let p12 = self.p1.lerp(self.p2, t);
        let p23 = self.p2.lerp(self.p3, t);

        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);

        let p0123 = p012.lerp(p123, t);

        (
            Self::new(self.p0, p01, p012, p0123),
            Self::new(p0123, p123, p23, self.p3),
        )
    }

    /// Maximum distance of the inner control points from the chord `p0`-`p3`.
    #[inline]
    pub fn flatness(&self) -> F {
        let chord = Segment2::new(self.p0, self.p3);
        chord
            .distance_to_point(self.p1)
            .max(chord.distance_to_point(self.p2))
    }

    /// Converts the curve to a polyline by adaptive subdivision.
    ///
    /// The result starts with `p0` and ends with `p3`; no point of the curve
    /// lies further than `tolerance` from it.
    pub fn to_polyline(&self, tolerance: F) -> Vec<Point2<F>> {
        let mut points = vec![self.p0];
        self.subdivide_into(tolerance, 0, &mut points);
        points
    }

    fn subdivide_into(&self, tolerance: F, depth: usize, points: &mut Vec<Point2<F>>) {
        // Depth cap guards against non-finite input.
        if depth >= 16 || self.flatness() <= tolerance {
            points.push(self.p3);
        } else {
            let half = F::from(0.5).unwrap_or_else(F::zero);
            let (left, right) = self.split(half);
            left.subdivide_into(tolerance, depth + 1, points);
            right.subdivide_into(tolerance, depth + 1, points);
        }
    }

    /// Approximate arc length from the flattened polyline.
    pub fn arc_length(&self, tolerance: F) -> F {
        self.to_polyline(tolerance)
            .windows(2)
            .fold(F::zero(), |acc, w| acc + w[0].distance(w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn arch() -> CubicBezier2<f64> {
        CubicBezier2::new(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(3.0, 2.0),
            Point2::new(4.0, 0.0),
        )
    }

    #[test]
    fn test_eval_endpoints_and_middle() {
        let c = arch();
        assert_eq!(c.eval(0.0), c.p0);
        assert_eq!(c.eval(1.0), c.p3);
        let mid = c.eval(0.5);
        assert_relative_eq!(mid.x, 2.0);
        assert_relative_eq!(mid.y, 1.5);
    }

    #[test]
    fn test_split_is_continuous() {
        let (left, right) = arch().split(0.3);
        assert_eq!(left.p3, right.p0);
        let p = arch().eval(0.3);
        assert_relative_eq!(left.p3.x, p.x, epsilon = 1e-12);
        assert_relative_eq!(left.p3.y, p.y, epsilon = 1e-12);
    }

    #[test]
    fn test_straight_curve_length() {
        let c = CubicBezier2::straight(Point2::new(0.0_f64, 0.0), Point2::new(3.0, 4.0));
        assert_eq!(c.flatness(), 0.0);
        assert_eq!(c.to_polyline(0.1).len(), 2);
        assert_relative_eq!(c.arc_length(0.1), 5.0);
    }

    #[test]
    fn test_polyline_bounds_arc_length() {
        let c = arch();
        let coarse = c.arc_length(0.5);
        let fine = c.arc_length(0.001);
        // Chord length is a lower bound, control polygon an upper bound.
        assert!(fine > 4.0 && fine < 5.0_f64.sqrt() * 2.0 + 2.0);
        assert!(coarse <= fine + 1e-9);
    }
}
