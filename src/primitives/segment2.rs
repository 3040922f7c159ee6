//! Straight pieces between two points.

use super::{Point2, Vec2};
use num_traits::Float;

/// The segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2<F> {
    pub start: Point2<F>,
    pub end: Point2<F>,
}

impl<F: Float> Segment2<F> {
    #[inline]
    pub fn new(start: Point2<F>, end: Point2<F>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn direction(self) -> Vec2<F> {
        self.end - self.start
    }

    /// Parameter of the point of the segment nearest to `p`, in `[0, 1]`.
    /// Zero for a segment of (near) zero length.
    pub fn project(self, p: Point2<F>) -> F {
        let d = self.direction();
        let len_sq = d.magnitude_squared();
        if len_sq <= F::epsilon() {
            return F::zero();
        }
        let t = (p - self.start).dot(d) / len_sq;
        t.max(F::zero()).min(F::one())
    }

    /// The point of the segment nearest to `p`.
    #[inline]
    pub fn closest_point(self, p: Point2<F>) -> Point2<F> {
        self.start.lerp(self.end, self.project(p))
    }

    #[inline]
    pub fn distance_to_point(self, p: Point2<F>) -> F {
        p.distance(self.closest_point(p))
    }
}
