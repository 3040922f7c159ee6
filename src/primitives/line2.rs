//! 2D infinite line type and triangle centers.

use super::{Point2, Vec2};
use num_traits::Float;

/// A 2D infinite line defined by a point and direction.
///
/// # Example
///
/// ```
/// use starborders::primitives::{Line2, Point2};
///
/// let a = Line2::perpendicular_bisector(Point2::new(0.0, 0.0), Point2::new(4.0, 0.0));
/// let b = Line2::perpendicular_bisector(Point2::new(0.0, 0.0), Point2::new(0.0, 2.0));
/// let hit = a.intersect_line(&b).unwrap();
/// assert_eq!((hit.x, hit.y), (2.0, 1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2<F> {
    /// A point on the line
    pub origin: Point2<F>,
    /// Direction vector of the line (not necessarily normalized)
    pub direction: Vec2<F>,
}

impl<F: Float> Line2<F> {
    /// Creates a new line from a point and direction.
    #[inline]
    pub fn new(origin: Point2<F>, direction: Vec2<F>) -> Self {
        Self { origin, direction }
    }

    /// Creates a line passing through two points.
    #[inline]
    pub fn from_points(p1: Point2<F>, p2: Point2<F>) -> Self {
        Self {
            origin: p1,
            direction: p2 - p1,
        }
    }

    /// Creates the perpendicular bisector of the segment `a`-`b`.
    #[inline]
    pub fn perpendicular_bisector(a: Point2<F>, b: Point2<F>) -> Self {
        Self {
            origin: a.midpoint(b),
            direction: (b - a).perpendicular(),
        }
    }

    /// Returns the point on the line at parameter `t`.
    #[inline]
    pub fn point_at(&self, t: F) -> Point2<F> {
        self.origin + self.direction * t
    }

    /// Returns which side of the line a point lies on, as the cross product
    /// of the direction with the offset to the point.
    ///
    /// Positive is left of the direction in a y-up frame.
    #[inline]
    pub fn side(&self, point: Point2<F>) -> F {
        self.direction.cross(point - self.origin)
    }

    /// Returns `true` if `point` lies strictly left of the line.
    #[inline]
    pub fn is_left(&self, point: Point2<F>) -> bool {
        self.side(point) > F::zero()
    }

    /// Returns the unsigned distance from a point to the line.
    pub fn distance(&self, point: Point2<F>) -> F {
        let len = self.direction.magnitude();
        if len < F::epsilon() {
            return self.origin.distance(point);
        }
        (self.side(point) / len).abs()
    }

    /// Intersects this line with another line.
    ///
    /// Returns `None` if the lines are parallel.
    pub fn intersect_line(&self, other: &Line2<F>) -> Option<Point2<F>> {
        let cross = self.direction.cross(other.direction);

        let scale = self.direction.magnitude() * other.direction.magnitude();
        if cross.abs() <= F::epsilon() * scale.max(F::one()) {
            return None;
        }

        let delta = other.origin - self.origin;
        let t = delta.cross(other.direction) / cross;
        Some(self.point_at(t))
    }
}

/// Computes the circumcenter of a triangle as the intersection of two
/// perpendicular bisectors.
///
/// Returns `None` when the vertices are collinear (parallel bisectors).
pub fn circumcenter<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>) -> Option<Point2<F>> {
    let ab = Line2::perpendicular_bisector(a, b);
    let bc = Line2::perpendicular_bisector(b, c);
    ab.intersect_line(&bc).filter(|p| p.is_finite())
}

/// Computes the centroid of a triangle.
///
/// Returns `None` for zero-area triangles.
pub fn centroid<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>) -> Option<Point2<F>> {
    let area2 = (b - a).cross(c - a);
    if area2.abs() <= F::epsilon() {
        return None;
    }
    let three = F::one() + F::one() + F::one();
    let x = (a.x + b.x + c.x) / three;
    let y = (a.y + b.y + c.y) / three;
    Some(Point2::new(x, y))
}
