//! Ordering border edges into loops and smoothing them.

use super::VoronoiNode;
use crate::curves::{control_points, CubicBezier2};
use crate::faction::FactionId;
use crate::primitives::Point2;
use std::collections::HashMap;

/// A border edge as seen from one faction, oriented along its loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopEdge {
    /// Index into [`BorderMap::edges`](super::BorderMap::edges).
    pub edge: usize,
    /// Start node.
    pub n1: usize,
    /// End node.
    pub n2: usize,
    pub from: Point2<f64>,
    pub to: Point2<f64>,
    /// Faction on the other side of the edge.
    pub neighbor: FactionId,
    /// Position of the site on the loop's own side of the edge.
    pub inner_site: Point2<f64>,
    /// Control point leaving `from`.
    pub ctrl1: Option<Point2<f64>>,
    /// Control point arriving at `to`.
    pub ctrl2: Option<Point2<f64>>,
}

impl LoopEdge {
    /// Traverses the edge the other way.
    fn flipped(self) -> Self {
        Self {
            n1: self.n2,
            n2: self.n1,
            from: self.to,
            to: self.from,
            ctrl1: self.ctrl2,
            ctrl2: self.ctrl1,
            ..self
        }
    }

    /// The cubic segment drawn for this edge. Missing control points fall
    /// back to the endpoints.
    pub fn curve(&self) -> CubicBezier2<f64> {
        CubicBezier2::new(
            self.from,
            self.ctrl1.unwrap_or(self.from),
            self.ctrl2.unwrap_or(self.to),
            self.to,
        )
    }
}

/// An ordered chain of one faction's border edges.
///
/// Consecutive edges share a node: `edges[i].n2 == edges[i + 1].n1`. A
/// closed loop also satisfies it between its last and first edge.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderLoop {
    pub faction: FactionId,
    pub edges: Vec<LoopEdge>,
    pub closed: bool,
}

impl BorderLoop {
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Vertex positions along the loop. A closed loop does not repeat its
    /// first vertex.
    pub fn points(&self) -> Vec<Point2<f64>> {
        let mut points: Vec<Point2<f64>> = self.edges.iter().map(|e| e.from).collect();
        if !self.closed {
            if let Some(last) = self.edges.last() {
                points.push(last.to);
            }
        }
        points
    }

    /// Returns `true` if the edge list satisfies the chaining invariant.
    pub fn is_chained(&self) -> bool {
        let chained = self.edges.windows(2).all(|w| w[0].n2 == w[1].n1);
        let wraps = match (self.edges.first(), self.edges.last()) {
            (Some(first), Some(last)) => last.n2 == first.n1,
            _ => false,
        };
        chained && (wraps == self.closed)
    }
}

/// Greedily chains one faction's edges into loops.
///
/// Edges arrive oriented with `faction` on their left, so forward matches
/// (`tail.n2 == next.n1`) are the normal case. A reversed match flips the
/// edge. An open chain is extended backwards from its head before a new
/// chain starts, so each open run of edges ends up in a single loop.
pub(super) fn chain_edges(faction: FactionId, edges: &[LoopEdge]) -> Vec<BorderLoop> {
    let mut by_start: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut by_end: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, e) in edges.iter().enumerate() {
        by_start.entry(e.n1).or_default().push(i);
        by_end.entry(e.n2).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let take = |index: &HashMap<usize, Vec<usize>>, node: usize, used: &[bool]| {
        index
            .get(&node)
            .and_then(|list| list.iter().copied().find(|&i| !used[i]))
    };

    let mut loops = Vec::new();
    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut chain = std::collections::VecDeque::from([edges[start]]);
        let mut closed = false;

        // Forward from the tail.
        while let (Some(h), Some(t)) = (chain.front(), chain.back()) {
            let (head, tail) = (h.n1, t.n2);
            if tail == head {
                closed = true;
                break;
            }
            if let Some(i) = take(&by_start, tail, &used) {
                used[i] = true;
                chain.push_back(edges[i]);
            } else if let Some(i) = take(&by_end, tail, &used) {
                used[i] = true;
                chain.push_back(edges[i].flipped());
            } else {
                break;
            }
        }

        // Backward from the head.
        while !closed {
            let Some(head) = chain.front().map(|h| h.n1) else {
                break;
            };
            if let Some(i) = take(&by_end, head, &used) {
                used[i] = true;
                chain.push_front(edges[i]);
            } else if let Some(i) = take(&by_start, head, &used) {
                used[i] = true;
                chain.push_front(edges[i].flipped());
            } else {
                break;
            }
            if chain.back().map(|t| t.n2) == chain.front().map(|h| h.n1) {
                closed = true;
            }
        }

        loops.push(BorderLoop {
            faction,
            edges: chain.into_iter().collect(),
            closed,
        });
    }
    loops
}

/// Fills in the control points of every edge in the loop.
///
/// Interior vertices get tension-based control points. At vertices where
/// three or more factions meet both adjoining control points sit on the
/// vertex. The two ends of an open loop stay straight.
pub(super) fn smooth_loop(border_loop: &mut BorderLoop, nodes: &[VoronoiNode], tension: f64) {
    let n = border_loop.edges.len();
    if n == 0 {
        return;
    }

    let edges = &mut border_loop.edges;
    if !border_loop.closed {
        edges[0].ctrl1 = Some(edges[0].from);
        edges[n - 1].ctrl2 = Some(edges[n - 1].to);
    }

    let junctions = if border_loop.closed { 0..n } else { 1..n };
    for i in junctions {
        let prev = (i + n - 1) % n;
        let p0 = edges[prev].from;
        let p1 = edges[i].from;
        let p2 = edges[i].to;

        let corner = nodes
            .get(edges[i].n1)
            .is_some_and(|node| node.border_colors.len() > 2);

        let (before, after) = if corner {
            (p1, p1)
        } else {
            control_points(p0, p1, p2, tension)
        };
        edges[prev].ctrl2 = Some(before);
        edges[i].ctrl1 = Some(after);
    }
}
