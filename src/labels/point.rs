//! Tabu search placement of system and cluster labels.
//!
//! Every anchor gets one label in one of eight clock positions around it.
//! The search starts with every label due east and repeatedly moves the
//! label whose move lowers the total cost the most:
//!
//! ```text
//! cost = overlap_weight * overlaps + position_weight * position_cost
//! ```
//!
//! Recently moved labels are tabu for a while; they are only reconsidered
//! when no other label can improve. Only strictly improving moves are made,
//! so the search always terminates, at the latest after `max_iterations`.

use super::glyphs::GlyphMetrics;
use crate::bounds::{Rect, RectId, RectKind};
use crate::config::PointLabelConfig;
use crate::primitives::Point2;
use crate::spatial::OverlapGrid;
use std::collections::VecDeque;

/// Clock position of a label relative to its anchor, in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelPosition {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl LabelPosition {
    /// All positions, N first, clockwise.
    pub const ALL: [LabelPosition; 8] = [
        LabelPosition::N,
        LabelPosition::NE,
        LabelPosition::E,
        LabelPosition::SE,
        LabelPosition::S,
        LabelPosition::SW,
        LabelPosition::W,
        LabelPosition::NW,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Screen direction as `(dx, dy)` with components in `{-1, 0, 1}`.
    fn direction(self) -> (f64, f64) {
        match self {
            LabelPosition::N => (0.0, -1.0),
            LabelPosition::NE => (1.0, -1.0),
            LabelPosition::E => (1.0, 0.0),
            LabelPosition::SE => (1.0, 1.0),
            LabelPosition::S => (0.0, 1.0),
            LabelPosition::SW => (-1.0, 1.0),
            LabelPosition::W => (-1.0, 0.0),
            LabelPosition::NW => (-1.0, -1.0),
        }
    }
}

/// Something drawn on the map that carries a label: a star system (circle)
/// or a cluster of systems (ellipse).
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAnchor {
    pub center: Point2<f64>,
    pub rx: f64,
    pub ry: f64,
    pub text: String,
    pub cluster: bool,
}

impl LabelAnchor {
    pub fn system(center: Point2<f64>, radius: f64, text: impl Into<String>) -> Self {
        Self {
            center,
            rx: radius,
            ry: radius,
            text: text.into(),
            cluster: false,
        }
    }

    pub fn cluster(center: Point2<f64>, rx: f64, ry: f64, text: impl Into<String>) -> Self {
        Self {
            center,
            rx,
            ry,
            text: text.into(),
            cluster: true,
        }
    }

    fn body_id(&self, index: usize) -> RectId {
        let kind = if self.cluster {
            RectKind::Cluster
        } else {
            RectKind::Site
        };
        RectId::new(kind, index)
    }

    fn label_id(&self, index: usize) -> RectId {
        let kind = if self.cluster {
            RectKind::ClusterLabel
        } else {
            RectKind::SiteLabel
        };
        RectId::new(kind, index)
    }

    /// Bounding box of the drawn circle or ellipse.
    pub fn body_rect(&self, index: usize) -> Rect {
        Rect::new(
            self.center.x - self.rx,
            self.center.y - self.ry,
            2.0 * self.rx,
            2.0 * self.ry,
            self.body_id(index),
        )
    }

    /// The label rectangle at `position`, touching the outline at the point
    /// in that direction and kept `padding` away from it.
    pub fn label_rect(
        &self,
        index: usize,
        position: LabelPosition,
        (w, h): (f64, f64),
        padding: f64,
    ) -> Rect {
        let (dx, dy) = position.direction();
        let norm = (dx * dx + dy * dy).sqrt();
        let ax = self.center.x + self.rx * dx / norm;
        let ay = self.center.y + self.ry * dy / norm;

        let x = ax + dx * padding + (dx - 1.0) * w / 2.0;
        let y = ay + dy * padding + (dy - 1.0) * h / 2.0;
        Rect::new(x, y, w, h, self.label_id(index))
    }
}

/// Final placement of one anchor's label.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    pub anchor: usize,
    pub position: LabelPosition,
    pub rect: Rect,
    /// Rectangles the label still overlaps.
    pub overlaps: usize,
    /// `overlap_weight * overlaps + position_weight * position_cost`.
    pub cost: f64,
}

/// Result of a point label search.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLabelLayout {
    /// One label per anchor, in anchor order.
    pub labels: Vec<PlacedLabel>,
    /// Sum over labels of the rectangles each overlaps, after the search.
    pub total_overlaps: usize,
    /// The same sum with every label due east.
    pub initial_overlaps: usize,
    /// Moves made.
    pub iterations: usize,
}

/// Places system and cluster labels by tabu search.
#[derive(Debug, Clone, Copy)]
pub struct PointLabelPlacer<'a> {
    config: &'a PointLabelConfig,
    glyphs: &'a GlyphMetrics,
}

/// Mutable state of one search.
struct Search<'a> {
    config: &'a PointLabelConfig,
    anchors: &'a [LabelAnchor],
    /// The eight candidate rectangles of every anchor.
    rects: Vec<[Rect; 8]>,
    position: Vec<usize>,
    overlaps: Vec<usize>,
    total_overlaps: usize,
}

impl<'a> PointLabelPlacer<'a> {
    pub fn new(config: &'a PointLabelConfig, glyphs: &'a GlyphMetrics) -> Self {
        Self { config, glyphs }
    }

    /// Places one label per anchor.
    ///
    /// Anchor bodies and labels are added to `grid` and stay there, so the
    /// border label placer can avoid them afterwards.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use starborders::config::PointLabelConfig;
    /// use starborders::labels::{GlyphMetrics, LabelAnchor, PointLabelPlacer};
    /// use starborders::spatial::OverlapGrid;
    /// use starborders::{Point2, Rect, RectId, RectKind};
    ///
    /// let glyphs = GlyphMetrics::new(HashMap::from([(' ', 4.0)]), 6.0, 10.0)?;
    /// let bounds = Rect::new(0.0, 0.0, 400.0, 300.0, RectId::new(RectKind::Obstacle, 0));
    /// let mut grid = OverlapGrid::new(bounds, 50.0)?;
    /// let anchors = vec![
    ///     LabelAnchor::system(Point2::new(100.0, 100.0), 3.0, "Tharkad"),
    ///     LabelAnchor::system(Point2::new(104.0, 100.0), 3.0, "Donegal"),
    /// ];
    ///
    /// let config = PointLabelConfig::default();
    /// let layout = PointLabelPlacer::new(&config, &glyphs).place(&anchors, &mut grid);
    /// assert_eq!(layout.labels.len(), 2);
    /// assert!(layout.iterations <= config.max_iterations);
    /// // Two markers and two labels.
    /// assert_eq!(grid.len(), 4);
    /// # Ok::<(), starborders::MapError>(())
    /// ```
    pub fn place(&self, anchors: &[LabelAnchor], grid: &mut OverlapGrid) -> PointLabelLayout {
        let padding = self.config.padding;
        let rects: Vec<[Rect; 8]> = anchors
            .iter()
            .enumerate()
            .map(|(i, anchor)| {
                let size = self.glyphs.block_size(&[anchor.text.as_str()]);
                LabelPosition::ALL.map(|p| anchor.label_rect(i, p, size, padding))
            })
            .collect();

        for (i, anchor) in anchors.iter().enumerate() {
            grid.place(anchor.body_rect(i));
        }

        let mut search = Search {
            config: self.config,
            anchors,
            rects,
            position: vec![LabelPosition::E.index(); anchors.len()],
            overlaps: vec![0; anchors.len()],
            total_overlaps: 0,
        };
        search.seed(grid);
        let initial_overlaps = search.total_overlaps;
        let iterations = search.run(grid);

        tracing::debug!(
            anchors = anchors.len(),
            initial_overlaps,
            total_overlaps = search.total_overlaps,
            iterations,
            "placed point labels"
        );

        let labels = (0..anchors.len())
            .map(|i| PlacedLabel {
                anchor: i,
                position: LabelPosition::ALL[search.position[i]],
                rect: search.rects[i][search.position[i]],
                overlaps: search.overlaps[i],
                cost: search.cost(i),
            })
            .collect();

        PointLabelLayout {
            labels,
            total_overlaps: search.total_overlaps,
            initial_overlaps,
            iterations,
        }
    }
}

impl Search<'_> {
    fn position_cost(&self, position: usize) -> f64 {
        self.config.position_costs[position]
    }

    fn cost(&self, i: usize) -> f64 {
        self.config.overlap_weight * self.overlaps[i] as f64
            + self.config.position_weight * self.position_cost(self.position[i])
    }

    /// Everything a label conflicts with except its own anchor body.
    fn conflicts<'g>(&self, i: usize, rect: &Rect, grid: &'g OverlapGrid) -> Vec<&'g Rect> {
        let body = self.anchors[i].body_id(i);
        grid.overlaps_where(rect, |r| r.id != body)
    }

    /// Returns `true` for the label of one of the searched anchors. Labels
    /// left in the grid by earlier searches are plain obstacles.
    fn is_label(&self, id: RectId) -> bool {
        self.anchors
            .get(id.index)
            .is_some_and(|anchor| anchor.label_id(id.index) == id)
    }

    /// Change of the summed overlap count if label `i` sat at `rect`.
    /// Label-label conflicts count for both labels.
    fn overlap_weight_at(&self, i: usize, rect: &Rect, grid: &OverlapGrid) -> usize {
        self.conflicts(i, rect, grid)
            .iter()
            .map(|r| if self.is_label(r.id) { 2 } else { 1 })
            .sum()
    }

    /// Places every label due east and counts the initial overlaps.
    fn seed(&mut self, grid: &mut OverlapGrid) {
        for i in 0..self.anchors.len() {
            grid.place(self.rects[i][self.position[i]]);
        }
        for i in 0..self.anchors.len() {
            let rect = self.rects[i][self.position[i]];
            self.overlaps[i] = self.conflicts(i, &rect, grid).len();
        }
        self.total_overlaps = self.overlaps.iter().sum();
    }

    /// Best position for label `i` and the change in total cost it brings.
    fn best_move(&self, i: usize, grid: &OverlapGrid) -> Option<(usize, f64)> {
        let current = self.position[i];
        let w1 = self.config.overlap_weight;
        let w2 = self.config.position_weight;
        let now = w1 * self.overlap_weight_at(i, &self.rects[i][current], grid) as f64
            + w2 * self.position_cost(current);

        let mut best: Option<(usize, f64)> = None;
        for p in 0..8 {
            if p == current {
                continue;
            }
            let cost = w1 * self.overlap_weight_at(i, &self.rects[i][p], grid) as f64
                + w2 * self.position_cost(p);
            let delta = cost - now;
            if delta < -1e-12 && best.is_none_or(|(_, d)| delta < d) {
                best = Some((p, delta));
            }
        }
        best
    }

    /// Sites ordered by cost descending, then index ascending.
    fn ranked(&self, sites: impl Iterator<Item = usize>) -> Vec<usize> {
        let mut ranked: Vec<(usize, f64)> = sites
            .map(|i| (i, self.cost(i)))
            .filter(|&(_, c)| c > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.into_iter().map(|(i, _)| i).collect()
    }

    /// Best improving move among `sites`; ties keep the earlier site.
    fn pick(&self, sites: &[usize], grid: &OverlapGrid) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for &i in sites {
            if let Some((p, delta)) = self.best_move(i, grid) {
                if best.is_none_or(|(_, _, d)| delta < d) {
                    best = Some((i, p, delta));
                }
            }
        }
        best.map(|(i, p, _)| (i, p))
    }

    fn apply(&mut self, i: usize, p: usize, grid: &mut OverlapGrid) {
        let old = self.rects[i][self.position[i]];
        let removed: Vec<RectId> = self.conflicts(i, &old, grid).iter().map(|r| r.id).collect();
        grid.unplace(old.id);
        for id in removed {
            if self.is_label(id) {
                self.overlaps[id.index] -= 1;
                self.total_overlaps -= 1;
            }
        }
        self.total_overlaps -= self.overlaps[i];
        self.overlaps[i] = 0;

        self.position[i] = p;
        let new = self.rects[i][p];
        let added: Vec<RectId> = self.conflicts(i, &new, grid).iter().map(|r| r.id).collect();
        grid.place(new);
        for id in &added {
            if self.is_label(*id) {
                self.overlaps[id.index] += 1;
                self.total_overlaps += 1;
            }
        }
        self.overlaps[i] = added.len();
        self.total_overlaps += added.len();
    }

    /// Runs the search and returns the number of moves made.
    fn run(&mut self, grid: &mut OverlapGrid) -> usize {
        let n = self.anchors.len();
        let mut tabu: VecDeque<usize> = VecDeque::new();
        let mut tabu_limit = 0;
        let mut candidate_limit = 0;
        let mut iterations = 0;

        while iterations < self.config.max_iterations && self.total_overlaps > 0 {
            if iterations % self.config.limit_refresh_interval.max(1) == 0 {
                tabu_limit = (7 + self.total_overlaps / 4).min(n.saturating_sub(1));
                candidate_limit = 1 + (self.total_overlaps as f64 * 0.15).floor() as usize;
            }

            let mut candidates = self.ranked((0..n).filter(|i| !tabu.contains(i)));
            candidates.truncate(candidate_limit);

            let mut choice = self.pick(&candidates, grid);
            if choice.is_none() {
                let pool = self.ranked(tabu.iter().copied());
                choice = self.pick(&pool, grid);
            }
            let Some((i, p)) = choice else {
                break;
            };

            self.apply(i, p, grid);
            iterations += 1;

            tabu.retain(|&t| t != i);
            tabu.push_back(i);
            while tabu.len() > tabu_limit {
                tabu.pop_front();
            }
        }
        iterations
    }
}
