//! Voronoi dual construction and border edge detection.

use super::loops::{chain_edges, smooth_loop, LoopEdge};
use super::{BorderEdge, BorderMap, ColoredSite, VoronoiNode};
use crate::curves::DEFAULT_TENSION;
use crate::faction::FactionId;
use crate::primitives::{centroid, circumcenter};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// How a triangle's Voronoi node coordinate is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeMode {
    /// Intersection of the perpendicular bisectors; the true Voronoi vertex.
    #[default]
    Circumcenters,
    /// Average of the three sites. Keeps nodes inside their triangle.
    Centroids,
}

/// Turns a triangulation of colored sites into border loops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderExtractor {
    mode: NodeMode,
    tension: f64,
}

impl Default for BorderExtractor {
    fn default() -> Self {
        Self::new(NodeMode::default(), DEFAULT_TENSION)
    }
}

impl BorderExtractor {
    pub fn new(mode: NodeMode, tension: f64) -> Self {
        Self { mode, tension }
    }

    /// Runs the whole extraction.
    ///
    /// Never fails: degenerate triangles and triangles referring to missing
    /// sites produce nodes without a position, and edges touching such nodes
    /// are left out.
    pub fn extract(&self, sites: &[ColoredSite], triangles: &[[usize; 3]]) -> BorderMap {
        let mut nodes = self.build_nodes(sites, triangles);
        let pairs = adjacent_pairs(triangles, sites.len());
        for &(a, b) in &pairs {
            nodes[a].neighbors.push(b);
            nodes[b].neighbors.push(a);
        }

        let edges = border_edges(sites, &nodes, &pairs);

        // Oriented copies of every edge, per faction, in edge order.
        let mut by_faction: BTreeMap<FactionId, Vec<LoopEdge>> = BTreeMap::new();
        for (index, edge) in edges.iter().enumerate() {
            let (Some(p1), Some(p2)) = (nodes[edge.n1].position, nodes[edge.n2].position) else {
                continue;
            };
            let forward = LoopEdge {
                edge: index,
                n1: edge.n1,
                n2: edge.n2,
                from: p1,
                to: p2,
                neighbor: edge.right,
                inner_site: sites[edge.left_site].position,
                ctrl1: None,
                ctrl2: None,
            };
            // The right-hand faction walks the edge backwards to keep
            // itself on the left.
            let backward = LoopEdge {
                n1: edge.n2,
                n2: edge.n1,
                from: p2,
                to: p1,
                neighbor: edge.left,
                inner_site: sites[edge.right_site].position,
                ..forward
            };
            by_faction.entry(edge.left).or_default().push(forward);
            by_faction.entry(edge.right).or_default().push(backward);
        }

        let mut loops = Vec::new();
        for (faction, faction_edges) in &by_faction {
            for mut border_loop in chain_edges(*faction, faction_edges) {
                smooth_loop(&mut border_loop, &nodes, self.tension);
                loops.push(border_loop);
            }
        }

        tracing::debug!(
            sites = sites.len(),
            nodes = nodes.len(),
            edges = edges.len(),
            loops = loops.len(),
            "extracted borders"
        );

        BorderMap {
            nodes,
            edges,
            loops,
        }
    }

    /// One node per triangle, with its coordinate and border colors.
    fn build_nodes(&self, sites: &[ColoredSite], triangles: &[[usize; 3]]) -> Vec<VoronoiNode> {
        triangles
            .iter()
            .enumerate()
            .map(|(t, &triangle)| {
                let mut node = VoronoiNode {
                    triangle,
                    position: None,
                    neighbors: Vec::new(),
                    border_colors: Vec::new(),
                };
                if !is_valid_triangle(triangle, sites.len()) {
                    tracing::warn!(
                        index = t,
                        sites = ?triangle,
                        "skipping triangle with invalid site indices"
                    );
                    return node;
                }

                let [a, b, c] = triangle.map(|i| sites[i].position);
                node.position = match self.mode {
                    NodeMode::Circumcenters => {
                        let center = circumcenter(a, b, c);
                        if center.is_none() {
                            tracing::warn!(
                                index = t,
                                "circumcenter undefined, bisectors are parallel"
                            );
                        }
                        center
                    }
                    NodeMode::Centroids => centroid(a, b, c),
                };

                let mut colors = triangle.map(|i| sites[i].faction).to_vec();
                colors.sort_unstable();
                colors.dedup();
                if colors.len() > 1 {
                    node.border_colors = colors;
                }
                node
            })
            .collect()
    }
}

fn is_valid_triangle([a, b, c]: [usize; 3], site_count: usize) -> bool {
    a < site_count && b < site_count && c < site_count && a != b && b != c && a != c
}

/// Pairs of triangles sharing exactly two sites, in triangle order.
fn adjacent_pairs(triangles: &[[usize; 3]], site_count: usize) -> Vec<(usize, usize)> {
    let mut first_owner: HashMap<(usize, usize), usize> = HashMap::new();
    let mut pairs = Vec::new();

    for (t, &triangle) in triangles.iter().enumerate() {
        if !is_valid_triangle(triangle, site_count) {
            continue;
        }
        let [a, b, c] = triangle;
        for (i, j) in [(a, b), (b, c), (c, a)] {
            let key = (i.min(j), i.max(j));
            match first_owner.get(&key) {
                Some(&other) if other != t => pairs.push((other, t)),
                Some(_) => {}
                None => {
                    first_owner.insert(key, t);
                }
            }
        }
    }
    pairs
}

/// Emits one edge per adjacent pair whose shared sites differ in faction.
fn border_edges(
    sites: &[ColoredSite],
    nodes: &[VoronoiNode],
    pairs: &[(usize, usize)],
) -> Vec<BorderEdge> {
    let mut edges = Vec::new();
    for &(t1, t2) in pairs {
        let [s, t] = shared_sites(&nodes[t1].triangle, &nodes[t2].triangle);
        if sites[s].faction == sites[t].faction {
            continue;
        }
        let (Some(p1), Some(p2)) = (nodes[t1].position, nodes[t2].position) else {
            continue;
        };

        let dir = p2 - p1;
        let side_s = dir.cross(sites[s].position - p1);
        let side_t = dir.cross(sites[t].position - p1);
        let (left_site, right_site) = if side_s >= side_t { (s, t) } else { (t, s) };

        edges.push(BorderEdge {
            n1: t1,
            n2: t2,
            left: sites[left_site].faction,
            right: sites[right_site].faction,
            left_site,
            right_site,
        });
    }
    edges
}

/// The two site indices two adjacent triangles have in common.
fn shared_sites(a: &[usize; 3], b: &[usize; 3]) -> [usize; 2] {
    let mut shared = a.iter().copied().filter(|i| b.contains(i));
    let first = shared.next().unwrap_or(a[0]);
    let second = shared.next().unwrap_or(a[1]);
    [first, second]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Point2;
    use crate::triangulation::{SpadeTriangulator, Triangulate};
    use approx::assert_relative_eq;

    const A: FactionId = FactionId(1);
    const B: FactionId = FactionId(2);
    const C: FactionId = FactionId(3);

    fn site(x: f64, y: f64, f: FactionId) -> ColoredSite {
        ColoredSite::new(Point2::new(x, y), f)
    }

    fn side_of(from: Point2<f64>, to: Point2<f64>, p: Point2<f64>) -> f64 {
        (to - from).cross(p - from)
    }

    fn extractor() -> BorderExtractor {
        BorderExtractor::default()
    }

    #[test]
    fn test_three_sites_have_no_edges() {
        let sites = vec![site(0.0, 0.0, A), site(10.0, 0.0, A), site(5.0, 8.0, B)];
        let map = extractor().extract(&sites, &[[0, 1, 2]]);

        assert_eq!(map.nodes.len(), 1);
        assert_eq!(map.nodes[0].border_colors, vec![A, B]);
        assert!(map.nodes[0].neighbors.is_empty());
        assert!(map.edges.is_empty());
        assert!(map.loops.is_empty());
    }

    #[test]
    fn test_four_sites_one_edge_open_loops() {
        let sites = vec![
            site(0.0, 0.0, A),
            site(10.0, 0.0, B),
            site(5.0, 8.0, A),
            site(5.0, -8.0, A),
        ];
        let map = extractor().extract(&sites, &[[0, 1, 2], [0, 3, 1]]);

        assert_eq!(map.edges.len(), 1);
        let e = map.edges[0];
        let p1 = map.nodes[e.n1].position.unwrap();
        let p2 = map.nodes[e.n2].position.unwrap();
        assert_relative_eq!(p1.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(p1.y.abs(), 39.0 / 16.0, epsilon = 1e-9);
        assert!(side_of(p1, p2, sites[e.left_site].position) > 0.0);
        assert_eq!(e.left, sites[e.left_site].faction);
        assert_ne!(e.left, e.right);

        for faction in [A, B] {
            let loops: Vec<_> = map.loops_for(faction).collect();
            assert_eq!(loops.len(), 1);
            assert!(!loops[0].closed);
            assert_eq!(loops[0].len(), 1);
        }
        assert_eq!(map.factions(), vec![A, B]);
    }

    #[test]
    fn test_loop_edges_keep_faction_on_the_left() {
        let sites = vec![
            site(0.0, 0.0, A),
            site(10.0, 0.0, B),
            site(5.0, 8.0, A),
            site(5.0, -8.0, A),
        ];
        let map = extractor().extract(&sites, &[[0, 1, 2], [0, 3, 1]]);
        for l in &map.loops {
            for e in &l.edges {
                assert!(side_of(e.from, e.to, e.inner_site) > 0.0);
                assert_ne!(e.neighbor, l.faction);
            }
        }
    }

    fn enclave() -> Vec<ColoredSite> {
        let mut sites = vec![site(0.0, 0.0, B)];
        for k in 0..6 {
            let a = k as f64 * std::f64::consts::TAU / 6.0;
            sites.push(site(10.0 * a.cos(), 10.0 * a.sin(), A));
        }
        for k in 0..12 {
            let a = (k as f64 + 0.3) * std::f64::consts::TAU / 12.0;
            sites.push(site(25.0 * a.cos(), 25.0 * a.sin(), A));
        }
        sites
    }

    #[test]
    fn test_enclave_forms_closed_loops() {
        let sites = enclave();
        let points: Vec<Point2<f64>> = sites.iter().map(|s| s.position).collect();
        let triangles = SpadeTriangulator.triangulate(&points);
        let map = extractor().extract(&sites, &triangles);

        assert_eq!(map.edges.len(), 6);
        for faction in [A, B] {
            let loops: Vec<_> = map.loops_for(faction).collect();
            assert_eq!(loops.len(), 1);
            assert!(loops[0].closed);
            assert_eq!(loops[0].len(), 6);
            assert!(loops[0].is_chained());
        }
    }

    #[test]
    fn test_closed_loop_is_smooth_at_every_vertex() {
        let sites = enclave();
        let points: Vec<Point2<f64>> = sites.iter().map(|s| s.position).collect();
        let triangles = SpadeTriangulator.triangulate(&points);
        let map = extractor().extract(&sites, &triangles);

        let l = map.loops_for(B).next().unwrap();
        let n = l.len();
        for i in 0..n {
            let prev = &l.edges[(i + n - 1) % n];
            let cur = &l.edges[i];
            let v = cur.from;
            let before = prev.ctrl2.unwrap() - v;
            let after = cur.ctrl1.unwrap() - v;
            // Control points straddle the vertex on one line.
            assert_relative_eq!(before.cross(after), 0.0, epsilon = 1e-9);
            assert!(before.dot(after) < 0.0);
        }
    }

    #[test]
    fn test_three_color_corner_is_sharp() {
        let sites = vec![
            site(0.0, 0.0, A),
            site(10.0, 0.0, B),
            site(5.0, 8.0, C),
            site(5.0, -8.0, A),
            site(-3.0, 6.0, B),
        ];
        let triangles = [[0, 1, 2], [0, 3, 1], [0, 2, 4]];
        let map = extractor().extract(&sites, &triangles);
        assert_eq!(map.nodes[0].border_colors, vec![A, B, C]);

        let loops: Vec<_> = map.loops_for(A).collect();
        assert_eq!(loops.len(), 1);
        let l = loops[0];
        assert_eq!(l.len(), 2);
        assert!(!l.closed);
        assert_eq!(l.edges[0].n2, 0);
        assert_eq!(l.edges[1].n1, 0);

        let corner = map.nodes[0].position.unwrap();
        assert_eq!(l.edges[0].ctrl2, Some(corner));
        assert_eq!(l.edges[1].ctrl1, Some(corner));
        assert_eq!(l.edges[0].ctrl1, Some(l.edges[0].from));
        assert_eq!(l.edges[1].ctrl2, Some(l.edges[1].to));
    }

    #[test]
    fn test_degenerate_triangles_are_skipped() {
        let sites = vec![
            site(0.0, 0.0, A),
            site(10.0, 0.0, B),
            site(20.0, 0.0, A),
            site(5.0, 8.0, A),
        ];
        let triangles = [[0, 1, 3], [0, 1, 2], [0, 1, 99]];
        let map = extractor().extract(&sites, &triangles);

        assert_eq!(map.nodes.len(), 3);
        assert!(map.nodes[0].position.is_some());
        assert!(map.nodes[1].position.is_none());
        assert!(map.nodes[2].position.is_none());
        // Adjacent through the A-B side, but the collinear node has no position.
        assert_eq!(map.nodes[0].neighbors, vec![1]);
        assert!(map.edges.is_empty());
        assert!(map.loops.is_empty());
    }

    #[test]
    fn test_centroid_mode() {
        let sites = vec![site(0.0, 0.0, A), site(6.0, 0.0, A), site(0.0, 3.0, B)];
        let extractor = BorderExtractor::new(NodeMode::Centroids, 0.65);
        let map = extractor.extract(&sites, &[[0, 1, 2]]);
        assert_eq!(map.nodes[0].position, Some(Point2::new(2.0, 1.0)));
    }

    #[test]
    fn test_interior_node_has_no_border_colors() {
        let sites = vec![site(0.0, 0.0, A), site(6.0, 0.0, A), site(0.0, 3.0, A)];
        let map = extractor().extract(&sites, &[[0, 1, 2]]);
        assert!(!map.nodes[0].is_border());
    }
}
