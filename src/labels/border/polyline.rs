//! Runs of border edges that can carry a label.

use crate::borders::{BorderMap, LoopEdge};
use crate::bounds::Rect;
use crate::faction::FactionId;
use crate::polygon::polygon_contains;
use crate::primitives::Point2;

/// A contiguous, visible run of one faction's border, flattened for
/// arc-length queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub faction: FactionId,
    /// Index of the source loop in [`BorderMap::loops`].
    pub loop_index: usize,
    /// The loop edges of the run, in order.
    pub edges: Vec<LoopEdge>,
    /// Covers a whole closed loop, ending where it starts.
    pub closed: bool,
    /// Flattened curve.
    pub points: Vec<Point2<f64>>,
    /// Arc length at each point.
    cumulative: Vec<f64>,
    /// Own-side site of each segment of `points`.
    inner: Vec<Point2<f64>>,
}

impl Polyline {
    pub(super) fn new(
        faction: FactionId,
        loop_index: usize,
        edges: Vec<LoopEdge>,
        closed: bool,
        tolerance: f64,
    ) -> Self {
        let mut points = Vec::new();
        let mut inner = Vec::new();
        if let Some(first) = edges.first() {
            points.push(first.from);
        }
        for edge in &edges {
            for p in edge.curve().to_polyline(tolerance).into_iter().skip(1) {
                points.push(p);
                inner.push(edge.inner_site);
            }
        }

        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += points[i - 1].distance(*p);
            }
            cumulative.push(total);
        }

        Self {
            faction,
            loop_index,
            edges,
            closed,
            points,
            cumulative,
            inner,
        }
    }

    /// Arc length of the whole run.
    #[inline]
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Returns `true` for a closed run around the faction's own sites,
    /// as opposed to one around an enclave of another faction.
    pub fn encloses_territory(&self) -> bool {
        match self.inner.first() {
            Some(site) => self.closed && polygon_contains(&self.points, *site),
            None => false,
        }
    }

    /// Neighbor factions along the run, consecutive duplicates removed.
    pub fn neighbors(&self) -> Vec<FactionId> {
        let mut n: Vec<FactionId> = self.edges.iter().map(|e| e.neighbor).collect();
        n.dedup();
        n
    }

    fn first_node(&self) -> Option<usize> {
        self.edges.first().map(|e| e.n1)
    }

    fn last_node(&self) -> Option<usize> {
        self.edges.last().map(|e| e.n2)
    }

    /// Index of the segment containing arc length `s`.
    fn segment_at(&self, s: f64) -> usize {
        let last = self.points.len().saturating_sub(2);
        let i = self.cumulative.partition_point(|&c| c <= s);
        i.saturating_sub(1).min(last)
    }

    /// Point at arc length `s`, clamped to the run.
    pub fn point_at(&self, s: f64) -> Point2<f64> {
        match self.points.len() {
            0 => Point2::origin(),
            1 => self.points[0],
            _ => {
                let i = self.segment_at(s);
                let len = self.cumulative[i + 1] - self.cumulative[i];
                let t = if len > 0.0 {
                    ((s - self.cumulative[i]) / len).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                self.points[i].lerp(self.points[i + 1], t)
            }
        }
    }

    /// Own-side site of the segment at arc length `s`.
    pub fn inner_site_at(&self, s: f64) -> Option<Point2<f64>> {
        self.inner.get(self.segment_at(s)).copied()
    }

    /// Flattened points with arc length in `[s0, s1]`.
    pub fn points_between(&self, s0: f64, s1: f64) -> impl Iterator<Item = Point2<f64>> + '_ {
        self.points
            .iter()
            .zip(&self.cumulative)
            .filter(move |&(_, &c)| c >= s0 && c <= s1)
            .map(|(p, _)| *p)
    }

    /// Arc distance between two positions, wrapping around closed runs.
    pub fn arc_distance(&self, a: f64, b: f64) -> f64 {
        let d = (a - b).abs();
        if self.closed {
            d.min(self.length() - d)
        } else {
            d
        }
    }

    /// Arc length at flattened point `index`.
    pub(super) fn arc_at(&self, index: usize) -> f64 {
        self.cumulative.get(index).copied().unwrap_or(0.0)
    }
}

/// Splits one faction's loops into labelable runs.
///
/// A run ends where an edge leaves `viewport`, where the neighboring faction
/// changes, or where consecutive edges do not share a node. A run that wraps
/// past the end of a closed loop is joined to the loop's first run. A
/// closed loop that is fully visible with a single neighbor becomes one
/// closed polyline starting at its leftmost, then topmost, vertex.
pub fn extract_polylines(
    map: &BorderMap,
    faction: FactionId,
    viewport: &Rect,
    tolerance: f64,
) -> Vec<Polyline> {
    let mut polylines = Vec::new();

    for (loop_index, border_loop) in map.loops.iter().enumerate() {
        if border_loop.faction != faction || border_loop.is_empty() {
            continue;
        }
        let edges = &border_loop.edges;
        let n = edges.len();

        let mut runs: Vec<Vec<usize>> = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        for (k, e) in edges.iter().enumerate() {
            if !(viewport.contains_point(e.from) && viewport.contains_point(e.to)) {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
                continue;
            }
            if let Some(&last) = current.last() {
                if edges[last].neighbor != e.neighbor || edges[last].n2 != e.n1 {
                    runs.push(std::mem::take(&mut current));
                }
            }
            current.push(k);
        }
        if !current.is_empty() {
            runs.push(current);
        }

        if border_loop.closed && runs.len() >= 2 {
            let wraps = runs[0][0] == 0
                && runs.last().and_then(|r| r.last()) == Some(&(n - 1))
                && edges[n - 1].neighbor == edges[0].neighbor
                && edges[n - 1].n2 == edges[0].n1;
            if wraps {
                if let Some(mut tail) = runs.pop() {
                    tail.append(&mut runs[0]);
                    runs[0] = tail;
                }
            }
        }

        let whole = border_loop.closed && runs.len() == 1 && runs[0].len() == n;
        if whole {
            let seam = leftmost_topmost(edges);
            let rotated: Vec<LoopEdge> = (0..n).map(|k| edges[(seam + k) % n]).collect();
            polylines.push(Polyline::new(faction, loop_index, rotated, true, tolerance));
            continue;
        }

        for run in runs {
            let run_edges: Vec<LoopEdge> = run.iter().map(|&k| edges[k]).collect();
            let polyline = Polyline::new(faction, loop_index, run_edges, false, tolerance);
            polylines.push(polyline);
        }
    }
    polylines
}

fn leftmost_topmost(edges: &[LoopEdge]) -> usize {
    let mut best = 0;
    for (k, e) in edges.iter().enumerate().skip(1) {
        let b = edges[best].from;
        let p = e.from;
        if p.x < b.x || (p.x == b.x && p.y < b.y) {
            best = k;
        }
    }
    best
}

/// Joins runs of the same loop while `width` does not fit on them.
///
/// A short run is merged with the following run, or failing that with the
/// preceding one, as long as the two share a node. A requested merge of
/// runs that do not touch is abandoned and the run stays short.
pub fn premerge(polylines: Vec<Polyline>, width: f64, tolerance: f64) -> Vec<Polyline> {
    let mut out: Vec<Polyline> = polylines;
    let mut i = 0;
    while i < out.len() {
        while out[i].length() < width && !out[i].closed {
            let next_ok = i + 1 < out.len()
                && out[i + 1].loop_index == out[i].loop_index
                && out[i].last_node().is_some()
                && out[i].last_node() == out[i + 1].first_node();
            let prev_ok = i > 0
                && out[i - 1].loop_index == out[i].loop_index
                && out[i - 1].last_node().is_some()
                && out[i - 1].last_node() == out[i].first_node();

            if next_ok {
                let next = out.remove(i + 1);
                out[i] = join(&out[i], &next, tolerance);
            } else if prev_ok {
                let cur = out.remove(i);
                i -= 1;
                out[i] = join(&out[i], &cur, tolerance);
            } else {
                if i + 1 < out.len() && out[i + 1].loop_index == out[i].loop_index {
                    tracing::debug!(
                        loop_index = out[i].loop_index,
                        length = out[i].length(),
                        width,
                        "runs do not touch, merge abandoned"
                    );
                }
                break;
            }
        }
        i += 1;
    }
    out
}

fn join(a: &Polyline, b: &Polyline, tolerance: f64) -> Polyline {
    let mut edges = a.edges.clone();
    edges.extend_from_slice(&b.edges);
    Polyline::new(a.faction, a.loop_index, edges, false, tolerance)
}
