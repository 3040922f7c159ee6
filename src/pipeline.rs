//! One map invocation, from systems to borders and labels.
//!
//! A [`MapContext`] owns everything a run needs: configuration, viewport,
//! glyph metrics, faction metadata and the overlap grid shared by both label
//! placers. Create one per era and viewport. Nothing is global, so contexts
//! on different threads never interfere.
//!
//! ```text
//! sites ─┬─ fillers ─ triangulation ─ BorderExtractor ──── loops ─┐
//!        └─ anchors ─ PointLabelPlacer ─┬─ point labels           │
//!                                       └─ grid ─ BorderLabelPlacer ─ border labels
//! ```

use crate::borders::{BorderExtractor, BorderMap, ColoredSite};
use crate::bounds::Rect;
use crate::config::MapConfig;
use crate::error::{MapError, Result};
use crate::faction::{FactionId, FactionRegistry};
use crate::labels::{
    BorderLabelPlacer, FactionBorderLabels, GlyphMetrics, LabelAnchor, PointLabelLayout,
    PointLabelPlacer,
};
use crate::primitives::Point2;
use crate::sampling::PoissonDiskSampler;
use crate::spatial::OverlapGrid;
use crate::triangulation::Triangulate;

/// A star system.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub position: Point2<f64>,
    pub faction: FactionId,
    pub name: String,
    /// Radius of the drawn marker.
    pub radius: f64,
}

impl Site {
    pub fn new(
        position: Point2<f64>,
        faction: FactionId,
        name: impl Into<String>,
        radius: f64,
    ) -> Self {
        Self {
            position,
            faction,
            name: name.into(),
            radius,
        }
    }
}

/// A named group of systems drawn as an ellipse.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub center: Point2<f64>,
    pub rx: f64,
    pub ry: f64,
    pub name: String,
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct MapLayout {
    /// Real sites followed by filler sites, as triangulated.
    pub sites: Vec<ColoredSite>,
    pub borders: BorderMap,
    /// Site labels first, then cluster labels.
    pub point_labels: PointLabelLayout,
    pub border_labels: Vec<FactionBorderLabels>,
}

/// State of one map invocation.
#[derive(Debug)]
pub struct MapContext {
    config: MapConfig,
    viewport: Rect,
    glyphs: GlyphMetrics,
    registry: FactionRegistry,
    grid: OverlapGrid,
}

impl MapContext {
    /// Validates `config` and sets up the overlap grid over `viewport`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use starborders::labels::GlyphMetrics;
    /// use starborders::{Faction, FactionRegistry, MapConfig, MapContext, MapError};
    /// use starborders::{Rect, RectId, RectKind};
    ///
    /// let glyphs = GlyphMetrics::new(HashMap::from([(' ', 4.0)]), 7.0, 12.0)?;
    /// let mut registry = FactionRegistry::new();
    /// registry.register("LC", Faction::new("Lyrans", "Lyran Commonwealth", "#3050c0"))?;
    /// let viewport = Rect::new(0.0, 0.0, 800.0, 600.0, RectId::new(RectKind::Obstacle, 0));
    ///
    /// let ctx = MapContext::new(MapConfig::default(), viewport, glyphs.clone(), registry)?;
    /// assert!(ctx.grid().is_empty());
    /// assert_eq!(ctx.registry().len(), 1);
    ///
    /// let broken = MapConfig {
    ///     grid_cell_size: 0.0,
    ///     ..MapConfig::default()
    /// };
    /// let err = MapContext::new(broken, viewport, glyphs, FactionRegistry::new());
    /// assert!(matches!(err, Err(MapError::InvalidCellSize(_))));
    /// # Ok::<(), MapError>(())
    /// ```
    pub fn new(
        config: MapConfig,
        viewport: Rect,
        glyphs: GlyphMetrics,
        registry: FactionRegistry,
    ) -> Result<Self> {
        config.validate()?;
        let grid = OverlapGrid::new(viewport, config.grid_cell_size)?;
        tracing::debug!(
            x = viewport.x,
            y = viewport.y,
            width = viewport.w,
            height = viewport.h,
            factions = registry.len(),
            "created map context"
        );
        Ok(Self {
            config,
            viewport,
            glyphs,
            registry,
            grid,
        })
    }

    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    #[inline]
    pub fn viewport(&self) -> &Rect {
        &self.viewport
    }

    #[inline]
    pub fn registry(&self) -> &FactionRegistry {
        &self.registry
    }

    /// The shared overlap grid as left by the last [`run`](Self::run).
    #[inline]
    pub fn grid(&self) -> &OverlapGrid {
        &self.grid
    }

    /// The real sites followed by blue-noise filler sites.
    ///
    /// Fillers cover the viewport grown by `filler.margin`, keeping the
    /// Poisson radius to every real site. A filler takes the faction of the
    /// nearest real site within `filler.territory_radius`, and is unclaimed
    /// otherwise.
    pub fn filler_sites(&self, sites: &[Site]) -> Result<Vec<ColoredSite>> {
        let mut out: Vec<ColoredSite> = sites
            .iter()
            .map(|s| ColoredSite::new(s.position, s.faction))
            .collect();
        let filler = &self.config.filler;
        if !filler.enabled {
            return Ok(out);
        }

        let area = self.viewport.inflate(filler.margin);
        let poisson = &self.config.poisson;
        let mut sampler = PoissonDiskSampler::new(
            Point2::new(area.x, area.y),
            area.w,
            area.h,
            poisson.radius,
            poisson.seed,
        )?;
        sampler.generate(poisson.max_samples);

        let fixed: Vec<Point2<f64>> = sites.iter().map(|s| s.position).collect();
        let merged = sampler.replace_reserved_points(&fixed);

        let reach = filler.territory_radius * filler.territory_radius;
        let mut claimed = 0;
        for &p in &merged[fixed.len()..] {
            let faction = sites
                .iter()
                .map(|s| (s.position.distance_squared(p), s.faction))
                .filter(|(d, _)| *d <= reach)
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .map_or(FactionId::UNCLAIMED, |(_, f)| f);
            if !faction.is_unclaimed() {
                claimed += 1;
            }
            out.push(ColoredSite::filler(p, faction));
        }

        tracing::debug!(
            sites = sites.len(),
            fillers = out.len() - sites.len(),
            claimed,
            "generated filler sites"
        );
        Ok(out)
    }

    /// Runs the whole pipeline.
    ///
    /// Fails if a site belongs to a faction missing from the registry. The
    /// grid is cleared first, so a context can run repeatedly.
    pub fn run<T>(
        &mut self,
        sites: &[Site],
        clusters: &[Cluster],
        triangulator: &T,
    ) -> Result<MapLayout>
    where
        T: Triangulate + ?Sized,
    {
        let registered = |f: FactionId| f.is_unclaimed() || self.registry.get(f).is_some();
        if let Some(site) = sites.iter().find(|s| !registered(s.faction)) {
            return Err(MapError::UnknownFaction(site.faction.to_string()));
        }
        self.grid.clear();

        let colored = self.filler_sites(sites)?;
        let points: Vec<Point2<f64>> = colored.iter().map(|s| s.position).collect();
        let triangles = triangulator.triangulate(&points);

        let b = &self.config.borders;
        let borders = BorderExtractor::new(b.node_mode, b.tension)
            .extract(&colored, &triangles);

        let systems = sites
            .iter()
            .map(|s| LabelAnchor::system(s.position, s.radius, &s.name));
        let groups = clusters
            .iter()
            .map(|c| LabelAnchor::cluster(c.center, c.rx, c.ry, &c.name));
        let anchors: Vec<LabelAnchor> = systems.chain(groups).collect();
        let point_labels = PointLabelPlacer::new(&self.config.point_labels, &self.glyphs)
            .place(&anchors, &mut self.grid);

        let border_labels = BorderLabelPlacer::new(
            &self.config.border_labels,
            &self.glyphs,
            self.viewport,
            self.config.borders.flatten_tolerance,
        )?
        .place(&borders, &self.registry, &mut self.grid);

        tracing::info!(
            sites = sites.len(),
            clusters = clusters.len(),
            fillers = colored.len() - sites.len(),
            triangles = triangles.len(),
            edges = borders.edges.len(),
            loops = borders.loops.len(),
            point_overlaps = point_labels.total_overlaps,
            border_labels = border_labels.iter().map(|f| f.labels.len()).sum::<usize>(),
            "map layout complete"
        );

        Ok(MapLayout {
            sites: colored,
            borders,
            point_labels,
            border_labels,
        })
    }
}
