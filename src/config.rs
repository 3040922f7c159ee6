//! Tunable parameters of the map pipeline.
//!
//! Every struct deserializes with `#[serde(default)]`, so a caller's config
//! file only needs the values it changes. [`MapConfig::validate`] runs when a
//! [`MapContext`](crate::pipeline::MapContext) is created.

use crate::borders::NodeMode;
use crate::curves::DEFAULT_TENSION;
use crate::error::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderConfig {
    pub node_mode: NodeMode,
    pub tension: f64,
    /// Maximum deviation when flattening border curves for label placement.
    pub flatten_tolerance: f64,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            node_mode: NodeMode::Circumcenters,
            tension: DEFAULT_TENSION,
            flatten_tolerance: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoissonConfig {
    /// Minimum spacing of filler sites.
    pub radius: f64,
    /// Candidate attempts around an active sample before it is retired.
    pub max_samples: usize,
    pub seed: u64,
}

impl Default for PoissonConfig {
    fn default() -> Self {
        Self {
            radius: 30.0,
            max_samples: 30,
            seed: 0x5EED,
        }
    }
}

/// Filler sites keep borders from running off to infinity between sparse
/// systems and outside the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillerConfig {
    pub enabled: bool,
    /// Distance the filler area extends beyond the viewport on every side.
    pub margin: f64,
    /// A filler within this distance of a real site takes its faction.
    pub territory_radius: f64,
}

impl Default for FillerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            margin: 60.0,
            territory_radius: 45.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLabelConfig {
    /// Weight of each overlapping rectangle.
    pub overlap_weight: f64,
    /// Weight of the position preference.
    pub position_weight: f64,
    pub max_iterations: usize,
    /// Iterations between recomputations of the tabu and candidate limits.
    pub limit_refresh_interval: usize,
    /// Gap between a site's outline and its label.
    pub padding: f64,
    /// Preference cost per clock position, N first, clockwise.
    pub position_costs: [f64; 8],
}

impl Default for PointLabelConfig {
    fn default() -> Self {
        Self {
            overlap_weight: 1.0,
            position_weight: 1.0,
            max_iterations: 300,
            limit_refresh_interval: 50,
            padding: 2.0,
            position_costs: [1.0, 0.8, 0.0, 0.9, 1.2, 1.1, 0.6, 1.0],
        }
    }
}

/// Weights of the border label rating criteria. They must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingWeights {
    pub overlap: f64,
    pub angle: f64,
    pub vertical_distance: f64,
    pub polyline_intersection: f64,
    pub centeredness: f64,
    pub multiline: f64,
}

impl RatingWeights {
    pub fn sum(&self) -> f64 {
        self.overlap
            + self.angle
            + self.vertical_distance
            + self.polyline_intersection
            + self.centeredness
            + self.multiline
    }
}

impl Default for RatingWeights {
    fn default() -> Self {
        Self {
            overlap: 0.55,
            angle: 0.05,
            vertical_distance: 0.2,
            polyline_intersection: 0.125,
            centeredness: 0.025,
            multiline: 0.05,
        }
    }
}

/// Manual per-faction adjustments of its border labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelOverride {
    /// Replaces the faction's long name.
    pub text: Option<String>,
    /// Leaves the faction's borders unlabeled.
    pub skip: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderLabelConfig {
    pub weights: RatingWeights,
    pub candidate_quality_threshold: f64,
    /// Fraction of the threshold accepted for a faction with no label.
    pub relaxed_threshold_factor: f64,
    /// Window step as a fraction of the label width.
    pub candidate_dist_factor: f64,
    /// How far the border may reach into a label before it is rejected.
    pub label_polyline_tolerance: f64,
    /// Minimum arc-length distance between labels of one faction.
    pub min_pos_dist: f64,
    /// Minimum straight-line distance between labels of one faction.
    pub min_true_dist: f64,
    /// Gap between the border curve and the label baseline.
    pub label_gap: f64,
    /// Overrides by faction code.
    pub overrides: BTreeMap<String, LabelOverride>,
}

impl BorderLabelConfig {
    /// Checks the rating weights and the placement ranges.
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        for (name, weight) in [
            ("overlap", w.overlap),
            ("angle", w.angle),
            ("vertical_distance", w.vertical_distance),
            ("polyline_intersection", w.polyline_intersection),
            ("centeredness", w.centeredness),
            ("multiline", w.multiline),
        ] {
            check_range(&format!("border_labels.weights.{name}"), weight, 0.0, 1.0)?;
        }
        let sum = w.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(MapError::InvalidWeights { sum });
        }

        check_range(
            "border_labels.candidate_quality_threshold",
            self.candidate_quality_threshold,
            0.0,
            1.0,
        )?;
        check_range(
            "border_labels.relaxed_threshold_factor",
            self.relaxed_threshold_factor,
            0.0,
            1.0,
        )?;
        check_positive(
            "border_labels.candidate_dist_factor",
            self.candidate_dist_factor,
        )?;
        check_positive(
            "border_labels.label_polyline_tolerance",
            self.label_polyline_tolerance,
        )?;
        for (name, value) in [
            ("border_labels.min_pos_dist", self.min_pos_dist),
            ("border_labels.min_true_dist", self.min_true_dist),
            ("border_labels.label_gap", self.label_gap),
        ] {
            check_range(name, value, 0.0, f64::MAX)?;
        }
        Ok(())
    }
}

impl Default for BorderLabelConfig {
    fn default() -> Self {
        Self {
            weights: RatingWeights::default(),
            candidate_quality_threshold: 0.55,
            relaxed_threshold_factor: 0.75,
            candidate_dist_factor: 0.25,
            label_polyline_tolerance: 3.0,
            min_pos_dist: 400.0,
            min_true_dist: 200.0,
            label_gap: 2.0,
            overrides: BTreeMap::new(),
        }
    }
}

/// Configuration of a whole map run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub borders: BorderConfig,
    pub poisson: PoissonConfig,
    pub filler: FillerConfig,
    pub point_labels: PointLabelConfig,
    pub border_labels: BorderLabelConfig,
    /// Cell size of the shared overlap grid.
    pub grid_cell_size: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            borders: BorderConfig::default(),
            poisson: PoissonConfig::default(),
            filler: FillerConfig::default(),
            point_labels: PointLabelConfig::default(),
            border_labels: BorderLabelConfig::default(),
            grid_cell_size: 50.0,
        }
    }
}

impl MapConfig {
    /// Checks ranges and the rating weight sum.
    pub fn validate(&self) -> Result<()> {
        if !(self.grid_cell_size.is_finite() && self.grid_cell_size > 0.0) {
            return Err(MapError::InvalidCellSize(self.grid_cell_size));
        }
        if !(self.poisson.radius.is_finite() && self.poisson.radius > 0.0) {
            return Err(MapError::InvalidRadius(self.poisson.radius));
        }

        check_range("borders.tension", self.borders.tension, 0.0, 1.0)?;
        check_positive("borders.flatten_tolerance", self.borders.flatten_tolerance)?;
        self.border_labels.validate()?;

        let p = &self.point_labels;
        if p.limit_refresh_interval == 0 {
            return Err(MapError::InvalidConfig(
                "point_labels.limit_refresh_interval must be at least 1".to_string(),
            ));
        }
        check_range("point_labels.padding", p.padding, 0.0, f64::MAX)?;
        for (i, cost) in p.position_costs.iter().enumerate() {
            let name = format!("point_labels.position_costs[{i}]");
            check_range(&name, *cost, 0.0, f64::MAX)?;
        }

        let f = &self.filler;
        if f.enabled {
            check_range("filler.margin", f.margin, 0.0, f64::MAX)?;
            check_range("filler.territory_radius", f.territory_radius, 0.0, f64::MAX)?;
        }
        Ok(())
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(MapError::InvalidConfig(format!(
            "{name} = {value} outside [{min}, {max}]"
        )))
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MapError::InvalidConfig(format!(
            "{name} = {value} must be positive"
        )))
    }
}
