//! Area and containment of closed rings, such as enclosed border loops.

use crate::primitives::Point2;
use num_traits::Float;

/// Consecutive vertex pairs of a ring, including the closing pair.
fn ring_edges<F: Float>(
    vertices: &[Point2<F>],
) -> impl Iterator<Item = (Point2<F>, Point2<F>)> + '_ {
    vertices
        .iter()
        .copied()
        .zip(vertices.iter().copied().cycle().skip(1))
}

/// Shoelace area, positive for rings that run clockwise on screen
/// (counter-clockwise with y up). Rings with fewer than three vertices have
/// no area.
pub fn polygon_signed_area<F: Float>(vertices: &[Point2<F>]) -> F {
    if vertices.len() < 3 {
        return F::zero();
    }
    let twice = ring_edges(vertices)
        .fold(F::zero(), |acc, (a, b)| acc + a.x * b.y - b.x * a.y);
    twice / (F::one() + F::one())
}

#[inline]
pub fn polygon_area<F: Float>(vertices: &[Point2<F>]) -> F {
    polygon_signed_area(vertices).abs()
}

/// Even-odd test of `point` against the ring. Boundary points may land on
/// either side.
pub fn polygon_contains<F: Float>(vertices: &[Point2<F>], point: Point2<F>) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    ring_edges(vertices)
        .filter(|(a, b)| {
            (a.y > point.y) != (b.y > point.y)
                && point.x < a.x + (b.x - a.x) * (point.y - a.y) / (b.y - a.y)
        })
        .count()
        % 2
        == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ]
    }

    #[test]
    fn test_signed_area_follows_winding() {
        let mut ring = square();
        assert_eq!(polygon_signed_area(&ring), 16.0);
        ring.reverse();
        assert_eq!(polygon_signed_area(&ring), -16.0);
        assert_eq!(polygon_area(&ring), 16.0);
    }

    #[test]
    fn test_degenerate_ring_has_no_area() {
        let ring = vec![Point2::new(0.0_f64, 0.0), Point2::new(1.0, 1.0)];
        assert_eq!(polygon_area(&ring), 0.0);
        assert!(!polygon_contains(&ring, Point2::new(0.5, 0.5)));
    }

    #[test]
    fn test_contains() {
        let ring = square();
        assert!(polygon_contains(&ring, Point2::new(2.0, 2.0)));
        assert!(!polygon_contains(&ring, Point2::new(5.0, 2.0)));
        assert!(!polygon_contains(&ring, Point2::new(2.0, -0.1)));
    }
}
