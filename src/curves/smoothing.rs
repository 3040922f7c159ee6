//! Tension-based control points for smoothing polylines into cubic curves.
//!
//! For an interior vertex `p1` with neighbors `p0` and `p2`, both control
//! points lie on a line through `p1` parallel to `p0 -> p2`. Their distances
//! from `p1` are proportional to the lengths of the adjoining segments, so a
//! short segment next to a long one does not overshoot. This is the cardinal
//! (Catmull-Rom-like) spline construction with chord-length weighting.

use crate::primitives::Point2;
use num_traits::Float;

/// Default curve tension for border smoothing.
pub const DEFAULT_TENSION: f64 = 0.65;

/// Computes the incoming and outgoing control points at `p1`.
///
/// Returns `(before, after)`: `before` is the second control point of the
/// curve ending at `p1`, `after` the first control point of the curve
/// starting at `p1`. Both collapse onto `p1` when `p0` and `p2` coincide
/// with it.
///
/// # Example
///
/// ```
/// use starborders::curves::control_points;
/// use starborders::Point2;
///
/// let (before, after) = control_points(
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(2.0, 0.0),
///     0.5,
/// );
/// assert_eq!(before, Point2::new(0.5, 1.0));
/// assert_eq!(after, Point2::new(1.5, 1.0));
/// ```
pub fn control_points<F: Float>(
    p0: Point2<F>,
    p1: Point2<F>,
    p2: Point2<F>,
    tension: F,
) -> (Point2<F>, Point2<F>) {
    let d01 = p0.distance(p1);
    let d12 = p1.distance(p2);
    let total = d01 + d12;

    if total <= F::epsilon() {
        return (p1, p1);
    }

    let fa = tension * d01 / total;
    let fb = tension * d12 / total;
    let span = p2 - p0;

    (p1 - span * fa, p1 + span * fb)
}
