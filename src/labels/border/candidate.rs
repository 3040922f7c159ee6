//! Candidate label rectangles along a polyline and their ratings.

use super::polyline::Polyline;
use crate::bounds::{OrientedRect, Rect, RectId, RectKind};
use crate::config::{BorderLabelConfig, RatingWeights};
use crate::primitives::{Point2, Vec2};
use crate::spatial::OverlapGrid;
use crate::tolerance::{orient2d, Orientation};

/// Identity used for grid queries of a candidate that is not placed.
const QUERY_ID: RectId = RectId {
    kind: RectKind::BorderLabel,
    index: usize::MAX,
};

/// Lines of a label and their measured block.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct LabelText {
    pub lines: Vec<String>,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub(super) struct Candidate {
    pub polyline: usize,
    pub rect: OrientedRect,
    pub lines: Vec<String>,
    pub mid_pos: f64,
    pub pl_int_max: f64,
    /// Weighted sum of every criterion except overlap.
    pub base_rating: f64,
    pub rating: f64,
}

impl Candidate {
    /// Adds the overlap criterion against the current grid contents.
    pub fn rerate(&mut self, weights: &RatingWeights, grid: &OverlapGrid) {
        self.rating = self.base_rating + weights.overlap * overlap_rating(&self.rect, grid);
    }
}

pub(super) struct CandidateGenerator<'a> {
    pub config: &'a BorderLabelConfig,
    pub viewport: Rect,
}

impl CandidateGenerator<'_> {
    /// Slides a window of the label's width along `polyline`, retrying at
    /// half the step when nothing fits. Small enclosed loops also get a
    /// candidate under their lowest point.
    pub fn generate(&self, index: usize, polyline: &Polyline, text: &LabelText) -> Vec<Candidate> {
        let step = self.config.candidate_dist_factor * text.width;
        let mut out = self.slide(index, polyline, text, step);
        if out.is_empty() {
            out = self.slide(index, polyline, text, step / 2.0);
        }
        let small = out.is_empty() || polyline.length() < 2.0 * text.width;
        if small && polyline.encloses_territory() {
            out.extend(self.below_loop(index, polyline, text));
        }
        out
    }

    fn slide(
        &self,
        index: usize,
        polyline: &Polyline,
        text: &LabelText,
        step: f64,
    ) -> Vec<Candidate> {
        let mut out = Vec::new();
        let length = polyline.length();
        if !(step > 0.0 && text.width > 0.0) || length < text.width {
            return out;
        }
        let mut s = 0.0;
        while s + text.width <= length + 1e-9 {
            out.extend(self.window(index, polyline, text, s));
            s += step;
        }
        out
    }

    fn window(
        &self,
        index: usize,
        polyline: &Polyline,
        text: &LabelText,
        s: f64,
    ) -> Option<Candidate> {
        let (w, h) = (text.width, text.height);
        let a = polyline.point_at(s);
        let b = polyline.point_at(s + w);

        // Text never reads right to left.
        let mut along = (b - a).normalize()?;
        if along.x < 0.0 {
            along = -along;
        }
        let up = along.up_normal();

        let mid = a.midpoint(b);
        let inner = polyline.inner_site_at(s + w / 2.0)?;
        // Screen y points down: clockwise of the baseline is above it.
        let above = orient2d(mid, mid + along, inner, 0.0) != Orientation::CounterClockwise;
        let side = if above { up } else { -up };

        let bulge = polyline
            .points_between(s, s + w)
            .chain([a, b])
            .map(|p| (p - a).dot(side))
            .fold(0.0, f64::max);
        let offset = bulge + self.config.label_gap;

        let start = mid - along * (w / 2.0);
        let origin = if above {
            start + up * offset
        } else {
            start - up * (offset + h)
        };
        let rect = OrientedRect::from_baseline(origin, along, up, w, h);
        self.rate(index, polyline, text, rect, s + w / 2.0, bulge)
    }

    fn below_loop(&self, index: usize, polyline: &Polyline, text: &LabelText) -> Option<Candidate> {
        let (k, lowest) = polyline
            .points
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.y.total_cmp(&b.1.y))?;
        let origin = Point2::new(
            lowest.x - text.width / 2.0,
            lowest.y + self.config.label_gap + text.height,
        );
        let rect = OrientedRect::from_baseline(
            origin,
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, -1.0),
            text.width,
            text.height,
        );
        self.rate(index, polyline, text, rect, polyline.arc_at(k), 0.0)
    }

    fn rate(
        &self,
        index: usize,
        polyline: &Polyline,
        text: &LabelText,
        rect: OrientedRect,
        mid_pos: f64,
        bulge: f64,
    ) -> Option<Candidate> {
        if !rect.is_inside(&self.viewport) {
            return None;
        }
        let tolerance = self.config.label_polyline_tolerance;
        let pl_int_max = penetration(polyline, &rect);
        if pl_int_max > tolerance {
            return None;
        }

        let half = polyline.length() / 2.0;
        let centeredness = if polyline.closed || half <= 0.0 {
            1.0
        } else {
            (1.0 - (mid_pos - half).abs() / half).clamp(0.0, 1.0)
        };
        let multiline = if text.lines.len() > 1 { 1.0 } else { 0.0 };

        let weights = &self.config.weights;
        let base_rating = weights.angle * angle_rating(rect.angle())
            + weights.vertical_distance / (1.0 + bulge / text.height)
            + weights.polyline_intersection * (1.0 - pl_int_max / tolerance)
            + weights.centeredness * centeredness
            + weights.multiline * multiline;

        Some(Candidate {
            polyline: index,
            rect,
            lines: text.lines.clone(),
            mid_pos,
            pl_int_max,
            base_rating,
            rating: base_rating,
        })
    }
}

/// 1 for horizontal or vertical baselines, 0 for diagonals.
#[inline]
fn angle_rating(angle: f64) -> f64 {
    (2.0 * angle).cos().abs()
}

/// 1 minus the share of the bounding box already covered in `grid`.
pub(super) fn overlap_rating(rect: &OrientedRect, grid: &OverlapGrid) -> f64 {
    let aabb = rect.aabb(QUERY_ID);
    let area = aabb.area();
    if area <= 0.0 {
        return 1.0;
    }
    let covered: f64 = grid
        .overlaps(&aabb, None)
        .iter()
        .map(|r| r.intersection_area(&aabb))
        .sum();
    1.0 - (covered / area).min(1.0)
}

/// Deepest reach of the polyline into `rect`, measured from the nearer of
/// its baseline and top edge. Zero if the polyline stays outside.
pub(super) fn penetration(polyline: &Polyline, rect: &OrientedRect) -> f64 {
    let (w, h) = (rect.width(), rect.height());
    let along = (rect.br - rect.bl).normalize();
    let up = (rect.tl - rect.bl).normalize();
    let (Some(along), Some(up)) = (along, up) else {
        return 0.0;
    };
    let local = |p: Point2<f64>| {
        let d = p - rect.bl;
        (d.dot(along), d.dot(up))
    };

    let mut deepest: f64 = 0.0;
    for seg in polyline.points.windows(2) {
        let (u0, v0) = local(seg[0]);
        let (u1, v1) = local(seg[1]);
        let Some((t0, t1)) = clip(u0, u1 - u0, 0.0, w, 0.0, 1.0)
            .and_then(|(a, b)| clip(v0, v1 - v0, 0.0, h, a, b))
        else {
            continue;
        };
        let va = v0 + (v1 - v0) * t0;
        let vb = v0 + (v1 - v0) * t1;
        let depth = if (va - h / 2.0) * (vb - h / 2.0) <= 0.0 {
            h / 2.0
        } else {
            va.min(h - va).max(vb.min(h - vb))
        };
        deepest = deepest.max(depth);
    }
    deepest
}

/// Restricts the parameter range `[t0, t1]` of `start + t * delta` to
/// `[lo, hi]`.
fn clip(start: f64, delta: f64, lo: f64, hi: f64, t0: f64, t1: f64) -> Option<(f64, f64)> {
    if delta.abs() < 1e-12 {
        return (start >= lo && start <= hi).then_some((t0, t1));
    }
    let a = (lo - start) / delta;
    let b = (hi - start) / delta;
    let (enter, exit) = if a < b { (a, b) } else { (b, a) };
    let t0 = t0.max(enter);
    let t1 = t1.min(exit);
    (t0 <= t1).then_some((t0, t1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::borders::LoopEdge;
    use crate::faction::FactionId;
    use approx::assert_relative_eq;

    fn straight(from: (f64, f64), to: (f64, f64), inner: (f64, f64)) -> Polyline {
        let from = Point2::new(from.0, from.1);
        let to = Point2::new(to.0, to.1);
        let edge = LoopEdge {
            edge: 0,
            n1: 0,
            n2: 1,
            from,
            to,
            neighbor: FactionId(2),
            inner_site: Point2::new(inner.0, inner.1),
            ctrl1: None,
            ctrl2: None,
        };
        Polyline::new(FactionId(1), 0, vec![edge], false, 0.5)
    }

    /// A closed loop through `corners` around `inner`.
    fn ring(corners: &[(f64, f64)], inner: (f64, f64)) -> Polyline {
        let n = corners.len();
        let edges = (0..n)
            .map(|k| {
                let (a, b) = (corners[k], corners[(k + 1) % n]);
                LoopEdge {
                    edge: k,
                    n1: k,
                    n2: (k + 1) % n,
                    from: Point2::new(a.0, a.1),
                    to: Point2::new(b.0, b.1),
                    neighbor: FactionId(2),
                    inner_site: Point2::new(inner.0, inner.1),
                    ctrl1: None,
                    ctrl2: None,
                }
            })
            .collect();
        Polyline::new(FactionId(1), 0, edges, true, 0.5)
    }

    fn text(width: f64, height: f64) -> LabelText {
        LabelText {
            lines: vec!["x".to_string()],
            width,
            height,
        }
    }

    fn view() -> Rect {
        Rect::new(0.0, 0.0, 500.0, 500.0, RectId::new(RectKind::Obstacle, 0))
    }

    #[test]
    fn test_labels_sit_on_the_inner_side() {
        let config = BorderLabelConfig::default();
        let generator = CandidateGenerator {
            config: &config,
            viewport: view(),
        };

        let line = straight((50.0, 200.0), (450.0, 200.0), (250.0, 100.0));
        let above = generator.generate(0, &line, &text(100.0, 10.0));
        assert_eq!(above.len(), 13);
        for c in &above {
            assert_relative_eq!(c.rect.bl.y, 198.0);
            assert_relative_eq!(c.rect.tl.y, 188.0);
            assert_relative_eq!(c.pl_int_max, 0.0);
        }

        let line = straight((50.0, 200.0), (450.0, 200.0), (250.0, 300.0));
        for c in generator.generate(0, &line, &text(100.0, 10.0)) {
            assert_relative_eq!(c.rect.tl.y, 202.0);
            assert_relative_eq!(c.rect.bl.y, 212.0);
        }
    }

    #[test]
    fn test_text_is_never_upside_down() {
        let config = BorderLabelConfig::default();
        let generator = CandidateGenerator {
            config: &config,
            viewport: view(),
        };
        let line = straight((450.0, 200.0), (50.0, 200.0), (250.0, 100.0));
        let candidates = generator.generate(0, &line, &text(100.0, 10.0));
        assert!(!candidates.is_empty());
        for c in &candidates {
            assert!(c.rect.br.x > c.rect.bl.x);
            assert!(c.rect.tl.y < c.rect.bl.y);
        }
    }

    #[test]
    fn test_rating_of_a_straight_border() {
        let config = BorderLabelConfig::default();
        let generator = CandidateGenerator {
            config: &config,
            viewport: view(),
        };
        let line = straight((100.0, 200.0), (300.0, 200.0), (200.0, 100.0));
        let mut candidates = generator.generate(0, &line, &text(100.0, 10.0));
        // Windows at 0, 25, 50, 75 and 100.
        assert_eq!(candidates.len(), 5);

        let grid = OverlapGrid::new(view(), 50.0).unwrap();
        let centered = &mut candidates[2];
        centered.rerate(&config.weights, &grid);
        assert_relative_eq!(centered.mid_pos, 100.0);
        assert_relative_eq!(centered.rating, 0.95, epsilon = 1e-9);

        let edge = &candidates[0];
        assert!(edge.base_rating < candidates[2].base_rating);
    }

    #[test]
    fn test_candidates_leave_the_viewport_out() {
        let config = BorderLabelConfig::default();
        let generator = CandidateGenerator {
            config: &config,
            viewport: view(),
        };
        // The label would sit above y = 0.
        let line = straight((50.0, 5.0), (450.0, 5.0), (250.0, -100.0));
        assert!(generator.generate(0, &line, &text(100.0, 10.0)).is_empty());
    }

    #[test]
    fn test_overlap_rating() {
        let mut grid = OverlapGrid::new(view(), 50.0).unwrap();
        let rect = OrientedRect::axis_aligned(100.0, 100.0, 20.0, 10.0);
        assert_relative_eq!(overlap_rating(&rect, &grid), 1.0);

        let site = Rect::new(110.0, 90.0, 50.0, 50.0, RectId::new(RectKind::Site, 0));
        grid.place(site);
        assert_relative_eq!(overlap_rating(&rect, &grid), 0.5);
    }

    #[test]
    fn test_penetration_depth() {
        let line = straight((0.0, 105.0), (200.0, 105.0), (0.0, 0.0));
        let centered = OrientedRect::axis_aligned(50.0, 100.0, 20.0, 10.0);
        assert_relative_eq!(penetration(&line, &centered), 5.0);

        let shallow = OrientedRect::axis_aligned(50.0, 96.0, 20.0, 10.0);
        assert_relative_eq!(penetration(&line, &shallow), 1.0);

        let clear = OrientedRect::axis_aligned(50.0, 80.0, 20.0, 10.0);
        assert_relative_eq!(penetration(&line, &clear), 0.0);
    }

    #[test]
    fn test_bottom_of_loop_candidate() {
        let config = BorderLabelConfig::default();
        let generator = CandidateGenerator {
            config: &config,
            viewport: view(),
        };
        let mut line = straight((100.0, 100.0), (140.0, 120.0), (120.0, 100.0));
        line.closed = true;
        let c = generator.below_loop(0, &line, &text(60.0, 10.0)).unwrap();
        assert_relative_eq!(c.rect.tl.y, 122.0);
        assert_relative_eq!(c.rect.center().x, 140.0);
    }

    #[test]
    fn test_small_enclosed_loop_falls_back_below_it() {
        let config = BorderLabelConfig::default();
        let generator = CandidateGenerator {
            config: &config,
            viewport: view(),
        };
        let diamond = [
            (220.0, 200.0),
            (260.0, 240.0),
            (220.0, 280.0),
            (180.0, 240.0),
        ];
        let loop_line = ring(&diamond, (220.0, 240.0));
        assert!(loop_line.encloses_territory());
        assert!(loop_line.length() < 300.0);

        let candidates = generator.generate(0, &loop_line, &text(300.0, 10.0));
        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_relative_eq!(c.rect.tl.y, 282.0);
        assert_relative_eq!(c.rect.bl.y, 292.0);
        assert_relative_eq!(c.rect.center().x, 220.0);
        assert_relative_eq!(c.mid_pos, loop_line.arc_at(2), epsilon = 1e-9);
        assert_relative_eq!(c.pl_int_max, 0.0);
    }

    #[test]
    fn test_open_run_never_falls_back_below() {
        let config = BorderLabelConfig::default();
        let generator = CandidateGenerator {
            config: &config,
            viewport: view(),
        };
        let line = straight((200.0, 200.0), (260.0, 200.0), (230.0, 100.0));
        assert!(generator.generate(0, &line, &text(300.0, 10.0)).is_empty());
    }

    #[test]
    fn test_second_line_adds_the_multiline_weight() {
        let config = BorderLabelConfig::default();
        let generator = CandidateGenerator {
            config: &config,
            viewport: view(),
        };
        let line = straight((100.0, 200.0), (300.0, 200.0), (200.0, 100.0));
        let two = LabelText {
            lines: vec!["x".to_string(), "y".to_string()],
            width: 100.0,
            height: 10.0,
        };
        let one = generator.generate(0, &line, &text(100.0, 10.0));
        let wrapped = generator.generate(0, &line, &two);
        assert_eq!(one.len(), wrapped.len());
        for (a, b) in one.iter().zip(&wrapped) {
            assert_relative_eq!(
                b.base_rating - a.base_rating,
                config.weights.multiline,
                epsilon = 1e-12
            );
        }
    }
}
