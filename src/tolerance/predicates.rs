//! Geometric predicates with explicit tolerance.

use crate::primitives::{Point2, Segment2};
use num_traits::Float;

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Positive signed area (counter-clockwise in a y-up frame).
    CounterClockwise,
    /// Negative signed area.
    Clockwise,
    /// Collinear within tolerance.
    Collinear,
}

/// Computes the orientation of `c` relative to the directed line `a -> b`.
///
/// `eps` is compared against the absolute cross product (twice the signed
/// area of the triangle).
#[inline]
pub fn orient2d<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, eps: F) -> Orientation {
    let cross = (b - a).cross(c - a);

    if cross > eps {
        Orientation::CounterClockwise
    } else if cross < -eps {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Result of a segment intersection test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection<F> {
    /// Segments do not intersect.
    None,
    /// Segments meet at a single point.
    Point {
        /// The intersection point.
        point: Point2<F>,
        /// Parameter along the first segment.
        t1: F,
        /// Parameter along the second segment.
        t2: F,
    },
    /// Segments are collinear and share a stretch.
    Overlapping {
        /// Start of the shared stretch.
        start: Point2<F>,
        /// End of the shared stretch.
        end: Point2<F>,
    },
}

/// Intersects two segments.
///
/// `eps` widens every test: segments closer than `eps` touch, and
/// directions whose cross product is within `eps` count as parallel.
pub fn segments_intersect<F: Float>(
    s1: Segment2<F>,
    s2: Segment2<F>,
    eps: F,
) -> SegmentIntersection<F> {
    let d1 = s1.direction();
    let d2 = s2.direction();
    let denom = d1.cross(d2);
    let offset = s2.start - s1.start;

    if denom.abs() > eps {
        let t1 = offset.cross(d2) / denom;
        let t2 = offset.cross(d1) / denom;
        let inside = |t: F| t >= -eps && t <= F::one() + eps;
        if !(inside(t1) && inside(t2)) {
            return SegmentIntersection::None;
        }
        let clamp = |t: F| t.max(F::zero()).min(F::one());
        let t1 = clamp(t1);
        return SegmentIntersection::Point {
            point: s1.start.lerp(s1.end, t1),
            t1,
            t2: clamp(t2),
        };
    }

    let len_sq = d1.magnitude_squared();
    if len_sq <= eps * eps {
        // `s1` is a point.
        return if s2.distance_to_point(s1.start) <= eps {
            SegmentIntersection::Point {
                point: s1.start,
                t1: F::zero(),
                t2: s2.project(s1.start),
            }
        } else {
            SegmentIntersection::None
        };
    }
    if d1.cross(offset).abs() / len_sq.sqrt() > eps {
        // Parallel on different lines.
        return SegmentIntersection::None;
    }

    // Collinear: clip the projection of `s2` onto `s1` to `[0, 1]`.
    let ta = offset.dot(d1) / len_sq;
    let tb = (s2.end - s1.start).dot(d1) / len_sq;
    let lo = ta.min(tb).max(F::zero());
    let hi = ta.max(tb).min(F::one());
    if lo > hi + eps {
        SegmentIntersection::None
    } else if hi - lo <= eps {
        let point = s1.start.lerp(s1.end, lo);
        SegmentIntersection::Point {
            point,
            t1: lo,
            t2: s2.project(point),
        }
    } else {
        SegmentIntersection::Overlapping {
            start: s1.start.lerp(s1.end, lo),
            end: s1.start.lerp(s1.end, hi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment2<f64> {
        Segment2::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    #[test]
    fn test_orient2d() {
        let a: Point2<f64> = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        assert_eq!(
            orient2d(a, b, Point2::new(0.5, 1.0), 1e-10),
            Orientation::CounterClockwise
        );
        assert_eq!(
            orient2d(a, b, Point2::new(0.5, -1.0), 1e-10),
            Orientation::Clockwise
        );
        assert_eq!(
            orient2d(a, b, Point2::new(0.5, 1e-12), 1e-10),
            Orientation::Collinear
        );
    }

    #[test]
    fn test_crossing_segments() {
        match segments_intersect(seg(0.0, 0.0, 2.0, 2.0), seg(0.0, 2.0, 2.0, 0.0), 1e-10) {
            SegmentIntersection::Point { point, t1, t2 } => {
                assert_relative_eq!(point.x, 1.0);
                assert_relative_eq!(point.y, 1.0);
                assert_relative_eq!(t1, 0.5);
                assert_relative_eq!(t2, 0.5);
            }
            other => panic!("expected a point, got {:?}", other),
        }
    }

    #[test]
    fn test_disjoint_segments() {
        assert_eq!(
            segments_intersect(seg(0.0, 0.0, 1.0, 0.0), seg(0.0, 1.0, 1.0, 1.0), 1e-10),
            SegmentIntersection::None
        );
        assert_eq!(
            segments_intersect(seg(0.0, 0.0, 1.0, 1.0), seg(3.0, 0.0, 2.0, 1.0), 1e-10),
            SegmentIntersection::None
        );
    }

    #[test]
    fn test_collinear_overlap() {
        match segments_intersect(seg(0.0, 0.0, 4.0, 0.0), seg(2.0, 0.0, 6.0, 0.0), 1e-10) {
            SegmentIntersection::Overlapping { start, end } => {
                assert_relative_eq!(start.x, 2.0);
                assert_relative_eq!(end.x, 4.0);
            }
            other => panic!("expected overlap, got {:?}", other),
        }
    }

    #[test]
    fn test_point_segment() {
        assert!(matches!(
            segments_intersect(seg(1.0, 0.0, 1.0, 0.0), seg(0.0, 0.0, 2.0, 0.0), 1e-10),
            SegmentIntersection::Point { t2, .. } if (t2 - 0.5).abs() < 1e-12
        ));
    }

    #[test]
    fn test_touching_endpoints() {
        assert!(matches!(
            segments_intersect(seg(0.0, 0.0, 1.0, 0.0), seg(1.0, 0.0, 1.0, 5.0), 1e-10),
            SegmentIntersection::Point { .. }
        ));
    }
}
