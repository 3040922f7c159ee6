//! Triangulation of site positions.
//!
//! Border extraction only needs a list of triangles as index triples into
//! its input points. The [`Triangulate`] trait is that seam; the
//! [`SpadeTriangulator`] implementation computes a Delaunay triangulation with
//! the `spade` crate.

use crate::primitives::Point2;
use spade::{DelaunayTriangulation, Triangulation};

/// Produces triangles over a point set.
pub trait Triangulate {
    /// Returns triangles as index triples into `points`.
    ///
    /// Indices must refer to `points`; triangles with out-of-range indices
    /// are skipped by consumers.
    fn triangulate(&self, points: &[Point2<f64>]) -> Vec<[usize; 3]>;
}

/// Delaunay triangulation backed by `spade`.
///
/// Duplicate points collapse onto the first occurrence, so no triangle
/// references a later duplicate. Points `spade` refuses (non-finite or out of
/// its coordinate range) are skipped with a warning.
///
/// # Example
///
/// ```
/// use starborders::triangulation::{SpadeTriangulator, Triangulate};
/// use starborders::Point2;
///
/// let points = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(4.0, 0.0),
///     Point2::new(0.0, 4.0),
///     Point2::new(4.0, 4.0),
/// ];
/// let triangles = SpadeTriangulator.triangulate(&points);
/// assert_eq!(triangles.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SpadeTriangulator;

impl Triangulate for SpadeTriangulator {
    fn triangulate(&self, points: &[Point2<f64>]) -> Vec<[usize; 3]> {
        let mut delaunay: DelaunayTriangulation<spade::Point2<f64>> = DelaunayTriangulation::new();
        // spade vertex index -> input point index
        let mut input_index: Vec<usize> = Vec::with_capacity(points.len());

        for (i, p) in points.iter().enumerate() {
            match delaunay.insert(spade::Point2::new(p.x, p.y)) {
                Ok(handle) if handle.index() == input_index.len() => input_index.push(i),
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(
                        index = i,
                        x = p.x,
                        y = p.y,
                        %err,
                        "point rejected by triangulation"
                    );
                }
            }
        }

        let triangles: Vec<[usize; 3]> = delaunay
            .inner_faces()
            .map(|face| {
                let [a, b, c] = face.vertices();
                [
                    input_index[a.fix().index()],
                    input_index[b.fix().index()],
                    input_index[c.fix().index()],
                ]
            })
            .collect();

        tracing::debug!(
            points = points.len(),
            vertices = input_index.len(),
            triangles = triangles.len(),
            "triangulated sites"
        );
        triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut t: [usize; 3]) -> [usize; 3] {
        t.sort_unstable();
        t
    }

    #[test]
    fn test_single_triangle() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(5.0, 8.0),
        ];
        let triangles = SpadeTriangulator.triangulate(&points);
        assert_eq!(triangles.len(), 1);
        assert_eq!(sorted(triangles[0]), [0, 1, 2]);
    }

    #[test]
    fn test_collinear_points_have_no_triangles() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        ];
        assert!(SpadeTriangulator.triangulate(&points).is_empty());
    }

    #[test]
    fn test_duplicates_map_to_first_occurrence() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 8.0),
        ];
        let triangles = SpadeTriangulator.triangulate(&points);
        assert_eq!(triangles.len(), 1);
        assert_eq!(sorted(triangles[0]), [0, 1, 3]);
    }

    #[test]
    fn test_non_finite_point_is_skipped() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(f64::NAN, 3.0),
            Point2::new(10.0, 0.0),
            Point2::new(5.0, 8.0),
        ];
        let triangles = SpadeTriangulator.triangulate(&points);
        assert_eq!(triangles.len(), 1);
        assert_eq!(sorted(triangles[0]), [0, 2, 3]);
    }
}
