//! Political borders from a triangulation of colored sites.
//!
//! The borders are edges of the Voronoi diagram of the sites, obtained as the
//! dual of a Delaunay triangulation:
//! - Each triangle becomes a Voronoi node (its circumcenter or centroid)
//! - Two triangles sharing a side are neighboring nodes
//! - A shared side whose two sites belong to different factions yields a
//!   border edge between the two nodes
//!
//! Each faction's edges are then chained into [`BorderLoop`]s and smoothed
//! with cubic control points.
//!
//! # Example
//!
//! ```
//! use starborders::borders::{BorderExtractor, ColoredSite, NodeMode};
//! use starborders::faction::FactionId;
//! use starborders::Point2;
//!
//! let a = FactionId(1);
//! let b = FactionId(2);
//! let sites = vec![
//!     ColoredSite::new(Point2::new(0.0, 0.0), a),
//!     ColoredSite::new(Point2::new(10.0, 0.0), b),
//!     ColoredSite::new(Point2::new(5.0, 8.0), a),
//!     ColoredSite::new(Point2::new(5.0, -8.0), a),
//! ];
//! let triangles = vec![[0, 1, 2], [0, 3, 1]];
//!
//! let map = BorderExtractor::new(NodeMode::Circumcenters, 0.65).extract(&sites, &triangles);
//! assert_eq!(map.edges.len(), 1);
//! assert_eq!(map.loops_for(a).count(), 1);
//! ```

mod extract;
mod loops;

pub use extract::{BorderExtractor, NodeMode};
pub use loops::{BorderLoop, LoopEdge};

use crate::faction::FactionId;
use crate::primitives::Point2;

/// A site ready for triangulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredSite {
    pub position: Point2<f64>,
    pub faction: FactionId,
    /// Generated filler rather than a real system.
    pub filler: bool,
}

impl ColoredSite {
    /// A real (non-filler) site.
    pub fn new(position: Point2<f64>, faction: FactionId) -> Self {
        Self {
            position,
            faction,
            filler: false,
        }
    }

    pub fn filler(position: Point2<f64>, faction: FactionId) -> Self {
        Self {
            position,
            faction,
            filler: true,
        }
    }
}

/// The Voronoi node of one triangle. Node `i` belongs to triangle `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiNode {
    /// Site indices of the triangle.
    pub triangle: [usize; 3],
    /// `None` for degenerate triangles; such nodes take part in no edge.
    pub position: Option<Point2<f64>>,
    /// Nodes of the triangles sharing a side with this one.
    pub neighbors: Vec<usize>,
    /// Distinct factions among the triangle's sites, sorted. Empty when all
    /// three sites share a faction.
    pub border_colors: Vec<FactionId>,
}

impl VoronoiNode {
    /// Returns `true` if at least two factions meet at this node.
    #[inline]
    pub fn is_border(&self) -> bool {
        !self.border_colors.is_empty()
    }
}

/// A Voronoi edge separating two factions.
///
/// Oriented so that `left` is the faction of the site to the left of
/// `n1 -> n2` (positive cross product).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderEdge {
    pub n1: usize,
    pub n2: usize,
    pub left: FactionId,
    pub right: FactionId,
    /// Site to the left of the edge.
    pub left_site: usize,
    /// Site to the right of the edge.
    pub right_site: usize,
}

/// Everything border extraction produces.
#[derive(Debug, Clone, Default)]
pub struct BorderMap {
    pub nodes: Vec<VoronoiNode>,
    pub edges: Vec<BorderEdge>,
    /// Loops of every faction, grouped by faction in ascending id order.
    pub loops: Vec<BorderLoop>,
}

impl BorderMap {
    /// The loops of one faction.
    pub fn loops_for(&self, faction: FactionId) -> impl Iterator<Item = &BorderLoop> {
        self.loops.iter().filter(move |l| l.faction == faction)
    }

    /// Factions that have at least one loop, ascending.
    pub fn factions(&self) -> Vec<FactionId> {
        let mut factions: Vec<FactionId> = self.loops.iter().map(|l| l.faction).collect();
        factions.dedup();
        factions
    }
}
