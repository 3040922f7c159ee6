//! Faction names drawn along their borders.
//!
//! Each faction's loops are cut into polylines: visible runs of edges
//! against one neighbor. A window of the label's width slides along every
//! polyline; at each stop the label is laid on the chord between the window
//! ends, pushed off the curve to the faction's own side and rated. The best
//! candidates are taken greedily while they rate above
//! `candidate_quality_threshold`, keeping a distance from each other.
//!
//! A faction that gets no label this way first accepts its best candidate at
//! a relaxed threshold, then retries with its short name. If that fails too
//! the faction stays unlabeled, which is logged and not an error.

mod candidate;
mod polyline;

pub use polyline::{extract_polylines, premerge, Polyline};

use self::candidate::{Candidate, CandidateGenerator, LabelText};
use super::glyphs::GlyphMetrics;
use crate::borders::BorderMap;
use crate::bounds::{OrientedRect, Rect, RectId, RectKind};
use crate::config::BorderLabelConfig;
use crate::error::{MapError, Result};
use crate::faction::{FactionId, FactionRegistry};
use crate::spatial::OverlapGrid;

/// A placed border label.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderLabel {
    pub rect: OrientedRect,
    /// One or two lines of text.
    pub lines: Vec<String>,
    pub rating: f64,
    /// How far the border reaches into the label.
    pub pl_int_max: f64,
    /// Index into [`FactionBorderLabels::polylines`].
    pub polyline: usize,
    /// Arc length of the label's center along its polyline.
    pub mid_pos: f64,
}

/// The border labels of one faction.
#[derive(Debug, Clone, PartialEq)]
pub struct FactionBorderLabels {
    pub faction: FactionId,
    pub labels: Vec<BorderLabel>,
    pub polylines: Vec<Polyline>,
    /// The long name did not fit and the short name was used.
    pub used_short_name: bool,
    /// The label was admitted at the relaxed threshold.
    pub relaxed: bool,
}

/// Places the border labels of every registered faction.
pub struct BorderLabelPlacer<'a> {
    config: &'a BorderLabelConfig,
    glyphs: &'a GlyphMetrics,
    viewport: Rect,
    flatten_tolerance: f64,
}

impl<'a> BorderLabelPlacer<'a> {
    /// Fails with [`MapError::InvalidConfig`] on settings no candidate can
    /// be rated under, such as a non-positive `label_polyline_tolerance` or
    /// a negative rating weight.
    pub fn new(
        config: &'a BorderLabelConfig,
        glyphs: &'a GlyphMetrics,
        viewport: Rect,
        flatten_tolerance: f64,
    ) -> Result<Self> {
        config.validate()?;
        if !(flatten_tolerance.is_finite() && flatten_tolerance > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "flatten tolerance {flatten_tolerance} must be positive"
            )));
        }
        Ok(Self {
            config,
            glyphs,
            viewport,
            flatten_tolerance,
        })
    }

    /// Labels the loops of `map` in ascending faction order.
    ///
    /// Accepted labels are added to `grid` as [`RectKind::BorderLabel`]
    /// rectangles, so they count as obstacles for every later candidate.
    /// Unclaimed territory, unregistered factions and factions with a
    /// `skip` override get no entry.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use starborders::borders::{BorderExtractor, ColoredSite, NodeMode};
    /// use starborders::config::BorderLabelConfig;
    /// use starborders::labels::{BorderLabelPlacer, GlyphMetrics};
    /// use starborders::spatial::OverlapGrid;
    /// use starborders::{Faction, FactionRegistry, Point2, Rect, RectId, RectKind};
    ///
    /// let mut registry = FactionRegistry::new();
    /// let a = registry.register("A", Faction::new("A", "Alpha", "#ff0000"))?;
    /// let b = registry.register("B", Faction::new("B", "Beta", "#0000ff"))?;
    /// let sites = vec![
    ///     ColoredSite::new(Point2::new(0.0, 0.0), a),
    ///     ColoredSite::new(Point2::new(10.0, 0.0), b),
    ///     ColoredSite::new(Point2::new(5.0, 8.0), a),
    ///     ColoredSite::new(Point2::new(5.0, -8.0), a),
    /// ];
    /// let triangles = vec![[0, 1, 2], [0, 3, 1]];
    /// let map = BorderExtractor::new(NodeMode::Circumcenters, 0.65).extract(&sites, &triangles);
    ///
    /// let viewport = Rect::new(-20.0, -20.0, 50.0, 40.0, RectId::new(RectKind::Obstacle, 0));
    /// let mut grid = OverlapGrid::new(viewport, 10.0)?;
    /// let glyphs = GlyphMetrics::new(HashMap::from([(' ', 1.0)]), 1.0, 2.0)?;
    /// let config = BorderLabelConfig::default();
    ///
    /// let placer = BorderLabelPlacer::new(&config, &glyphs, viewport, 0.5)?;
    /// let result = placer.place(&map, &registry, &mut grid);
    /// assert!(result.iter().any(|f| f.faction == a));
    /// let labels: usize = result.iter().map(|f| f.labels.len()).sum();
    /// assert_eq!(grid.len(), labels);
    /// # Ok::<(), starborders::MapError>(())
    /// ```
    pub fn place(
        &self,
        map: &BorderMap,
        registry: &FactionRegistry,
        grid: &mut OverlapGrid,
    ) -> Vec<FactionBorderLabels> {
        let mut placed: Vec<OrientedRect> = Vec::new();
        let mut out = Vec::new();

        for faction in map.factions() {
            if faction.is_unclaimed() {
                continue;
            }
            let (Some(code), Some(info)) = (registry.code(faction), registry.get(faction)) else {
                tracing::debug!(%faction, "unregistered faction left unlabeled");
                continue;
            };
            let adjust = self.config.overrides.get(code);
            if adjust.is_some_and(|o| o.skip) {
                tracing::debug!(faction = code, "border labels skipped");
                continue;
            }
            let long = adjust
                .and_then(|o| o.text.as_deref())
                .unwrap_or(&info.long_name);

            let short = &info.short_name;
            let labels = self.place_faction(map, faction, code, long, short, grid, &mut placed);
            out.push(labels);
        }
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn place_faction(
        &self,
        map: &BorderMap,
        faction: FactionId,
        code: &str,
        long: &str,
        short: &str,
        grid: &mut OverlapGrid,
        placed: &mut Vec<OrientedRect>,
    ) -> FactionBorderLabels {
        let long_text = self.measure(vec![long.to_string()]);
        let polylines = extract_polylines(map, faction, &self.viewport, self.flatten_tolerance);
        let polylines = premerge(polylines, long_text.width, self.flatten_tolerance);

        let mut texts = vec![long_text];
        if let Some(lines) = self.glyphs.wrap_two_lines(long) {
            texts.push(self.measure(lines.to_vec()));
        }
        let candidates = self.candidates(&polylines, &texts);
        let candidate_count = candidates.len();
        let (mut labels, mut relaxed) = self.select(&polylines, candidates, grid, placed);

        let mut used_short_name = false;
        if labels.is_empty() && !short.is_empty() && short != long {
            let candidates = self.candidates(&polylines, &[self.measure(vec![short.to_string()])]);
            (labels, relaxed) = self.select(&polylines, candidates, grid, placed);
            used_short_name = !labels.is_empty();
        }

        if labels.is_empty() {
            tracing::info!(
                faction = code,
                polylines = polylines.len(),
                candidates = candidate_count,
                "border left unlabeled"
            );
        } else {
            tracing::debug!(
                faction = code,
                labels = labels.len(),
                candidates = candidate_count,
                relaxed,
                used_short_name,
                "border labels placed"
            );
        }

        FactionBorderLabels {
            faction,
            labels,
            polylines,
            used_short_name,
            relaxed,
        }
    }

    fn measure(&self, lines: Vec<String>) -> LabelText {
        let (width, height) = self.glyphs.block_size(&lines);
        LabelText {
            lines,
            width,
            height,
        }
    }

    fn candidates(&self, polylines: &[Polyline], texts: &[LabelText]) -> Vec<Candidate> {
        let generator = CandidateGenerator {
            config: self.config,
            viewport: self.viewport,
        };
        let mut out = Vec::new();
        for (i, polyline) in polylines.iter().enumerate() {
            for text in texts {
                out.extend(generator.generate(i, polyline, text));
            }
        }
        out
    }

    /// Greedy selection, then the relaxed threshold if nothing qualified.
    fn select(
        &self,
        polylines: &[Polyline],
        mut candidates: Vec<Candidate>,
        grid: &mut OverlapGrid,
        placed: &mut Vec<OrientedRect>,
    ) -> (Vec<BorderLabel>, bool) {
        let threshold = self.config.candidate_quality_threshold;
        let mut taboo = vec![false; candidates.len()];
        let mut labels: Vec<BorderLabel> = Vec::new();

        loop {
            self.mark_taboo(polylines, &candidates, &mut taboo, &labels, placed);
            for (c, _) in candidates.iter_mut().zip(&taboo).filter(|(_, t)| !**t) {
                c.rerate(&self.config.weights, grid);
            }
            let Some(best) = best_index(&candidates, &taboo) else {
                break;
            };
            if candidates[best].rating < threshold {
                break;
            }
            labels.push(accept(&candidates[best], grid, placed));
            taboo[best] = true;
        }

        if labels.is_empty() {
            let relaxed = threshold * self.config.relaxed_threshold_factor;
            if let Some(best) = best_index(&candidates, &taboo) {
                if candidates[best].rating >= relaxed {
                    labels.push(accept(&candidates[best], grid, placed));
                    return (labels, true);
                }
            }
        }
        (labels, false)
    }

    /// Rules out candidates crossing any accepted label and those too close
    /// to a label of the same faction.
    fn mark_taboo(
        &self,
        polylines: &[Polyline],
        candidates: &[Candidate],
        taboo: &mut [bool],
        labels: &[BorderLabel],
        placed: &[OrientedRect],
    ) {
        for (c, t) in candidates.iter().zip(taboo.iter_mut()) {
            if *t {
                continue;
            }
            let center = c.rect.center();
            *t = placed.iter().any(|p| p.intersects(&c.rect))
                || labels.iter().any(|l| {
                    let same_run = l.polyline == c.polyline
                        && polylines[c.polyline].arc_distance(l.mid_pos, c.mid_pos)
                            < self.config.min_pos_dist;
                    same_run || l.rect.center().distance(center) < self.config.min_true_dist
                });
        }
    }
}

/// Highest rated candidate that is not taboo. Ties go to the lower index.
fn best_index(candidates: &[Candidate], taboo: &[bool]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, c) in candidates.iter().enumerate() {
        if taboo[i] {
            continue;
        }
        if best.is_none_or(|b| c.rating > candidates[b].rating) {
            best = Some(i);
        }
    }
    best
}

fn accept(c: &Candidate, grid: &mut OverlapGrid, placed: &mut Vec<OrientedRect>) -> BorderLabel {
    let id = RectId::new(RectKind::BorderLabel, placed.len());
    grid.place(c.rect.aabb(id));
    placed.push(c.rect);
    BorderLabel {
        rect: c.rect,
        lines: c.lines.clone(),
        rating: c.rating,
        pl_int_max: c.pl_int_max,
        polyline: c.polyline,
        mid_pos: c.mid_pos,
    }
}
