//! Poisson disk sampling.
//!
//! Generates blue noise point distributions where no two points are closer
//! than a specified minimum distance. Uses Bridson's fast algorithm with
//! O(n) time complexity.
//!
//! The map pipeline uses the samples as inert filler sites: after the real
//! sites are known, [`PoissonDiskSampler::replace_reserved_points`] drops every
//! generated point that crowds one of them.

use crate::error::{MapError, Result};
use crate::primitives::Point2;
use num_traits::Float;

/// Fallback state for a zero seed, which xorshift would never leave.
const ZERO_SEED_REPLACEMENT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Generates a Poisson disk sample in the rectangle `[0, width) x [0, height)`.
///
/// # Example
///
/// ```
/// use starborders::sampling::poisson_disk;
///
/// let points = poisson_disk(10.0, 10.0, 1.0, 30, 7).unwrap();
///
/// for i in 0..points.len() {
///     for j in (i + 1)..points.len() {
///         assert!(points[i].distance(points[j]) >= 0.99);
///     }
/// }
/// ```
pub fn poisson_disk<F: Float>(
    width: F,
    height: F,
    min_distance: F,
    max_attempts: usize,
    seed: u64,
) -> Result<Vec<Point2<F>>> {
    let mut sampler = PoissonDiskSampler::new(Point2::origin(), width, height, min_distance, seed)?;
    Ok(sampler.generate(max_attempts).to_vec())
}

/// A Poisson disk sampler that can be configured and reused.
///
/// The sampler keeps its last generated set so that reserved points can be
/// merged into it afterwards.
#[derive(Debug, Clone)]
pub struct PoissonDiskSampler<F> {
    origin: Point2<F>,
    width: F,
    height: F,
    min_distance: F,
    cell_size: F,
    grid_width: usize,
    grid_height: usize,
    grid: Vec<Option<usize>>,
    points: Vec<Point2<F>>,
    active: Vec<usize>,
    rng_state: u64,
}

impl<F: Float> PoissonDiskSampler<F> {
    /// Creates a sampler over the rectangle starting at `origin`.
    ///
    /// Fails if `min_distance` is not a positive finite number.
    pub fn new(origin: Point2<F>, width: F, height: F, min_distance: F, seed: u64) -> Result<Self> {
        if !(min_distance.is_finite() && min_distance > F::zero()) {
            return Err(MapError::InvalidRadius(
                min_distance.to_f64().unwrap_or(f64::NAN),
            ));
        }
        if !(width.is_finite() && height.is_finite() && width > F::zero() && height > F::zero()) {
            return Err(MapError::InvalidViewport {
                width: width.to_f64().unwrap_or(f64::NAN),
                height: height.to_f64().unwrap_or(f64::NAN),
            });
        }

        // Cell size = r / sqrt(2) ensures at most one point per cell
        let sqrt2 = F::from(std::f64::consts::SQRT_2).unwrap_or_else(F::one);
        let cell_size = min_distance / sqrt2;

        let grid_width = (width / cell_size).ceil().to_usize().unwrap_or(1).max(1);
        let grid_height = (height / cell_size).ceil().to_usize().unwrap_or(1).max(1);

        Ok(Self {
            origin,
            width,
            height,
            min_distance,
            cell_size,
            grid_width,
            grid_height,
            grid: vec![None; grid_width * grid_height],
            points: Vec::new(),
            active: Vec::new(),
            rng_state: if seed == 0 {
                ZERO_SEED_REPLACEMENT
            } else {
                seed
            },
        })
    }

    /// Minimum spacing between samples.
    #[inline]
    pub fn min_distance(&self) -> F {
        self.min_distance
    }

    /// Generates a fresh sample, replacing any previous one.
    ///
    /// An active sample is retired after `max_attempts` consecutive rejected
    /// candidates; generation ends when no active sample is left.
    pub fn generate(&mut self, max_attempts: usize) -> &[Point2<F>] {
        self.points.clear();
        self.active.clear();
        for cell in &mut self.grid {
            *cell = None;
        }

        let first = self.random_point_in_domain();
        self.add_point(first);

        while !self.active.is_empty() {
            let active_idx = self.random_usize(self.active.len());
            let center = self.points[self.active[active_idx]];

            let mut found = false;
            for _ in 0..max_attempts {
                let candidate = self.random_point_in_annulus(center);
                if self.is_valid(&candidate) {
                    self.add_point(candidate);
                    found = true;
                    break;
                }
            }

            if !found {
                self.active.swap_remove(active_idx);
            }
        }

        &self.points
    }

    /// The generated points that survived the last merge (or all generated
    /// points if no merge happened yet).
    #[inline]
    pub fn filler_points(&self) -> &[Point2<F>] {
        &self.points
    }

    /// Merges a fixed point set into the last generated sample.
    ///
    /// The fixed points are always kept, even when they lie outside the
    /// domain or closer than the minimum distance to each other. Every
    /// generated point closer than the minimum distance to a fixed point is
    /// dropped. Returns the fixed points followed by the surviving generated
    /// points.
    pub fn replace_reserved_points(&mut self, fixed: &[Point2<F>]) -> Vec<Point2<F>> {
        // Fixed points are not spaced, so a cell may hold several.
        let mut reserved: Vec<Vec<usize>> = vec![Vec::new(); self.grid_width * self.grid_height];
        for (i, p) in fixed.iter().enumerate() {
            let (gx, gy) = self.grid_coords(*p);
            reserved[gy * self.grid_width + gx].push(i);
        }

        let min_dist_sq = self.min_distance * self.min_distance;
        let before = self.points.len();
        let survivors: Vec<Point2<F>> = self
            .points
            .iter()
            .copied()
            .filter(|p| {
                self.neighborhood(*p)
                    .flat_map(|cell| reserved[cell].iter())
                    .all(|&i| p.distance_squared(fixed[i]) >= min_dist_sq)
            })
            .collect();

        tracing::debug!(
            reserved = fixed.len(),
            generated = before,
            kept = survivors.len(),
            "merged reserved points into blue-noise sample"
        );

        self.points = survivors;
        self.active.clear();

        let mut merged = Vec::with_capacity(fixed.len() + self.points.len());
        merged.extend_from_slice(fixed);
        merged.extend_from_slice(&self.points);
        merged
    }

    fn add_point(&mut self, p: Point2<F>) {
        let idx = self.points.len();
        self.points.push(p);
        self.active.push(idx);

        let (gx, gy) = self.grid_coords(p);
        self.grid[gy * self.grid_width + gx] = Some(idx);
    }

    /// Checks that a candidate lies inside the domain and far enough from
    /// every accepted point.
    fn is_valid(&self, p: &Point2<F>) -> bool {
        let local_x = p.x - self.origin.x;
        let local_y = p.y - self.origin.y;
        let inside_x = local_x >= F::zero() && local_x < self.width;
        let inside_y = local_y >= F::zero() && local_y < self.height;
        if !(inside_x && inside_y) {
            return false;
        }

        let min_dist_sq = self.min_distance * self.min_distance;
        self.neighborhood(*p)
            .filter_map(|cell| self.grid[cell])
            .all(|idx| p.distance_squared(self.points[idx]) >= min_dist_sq)
    }

    /// Indices of the 5x5 block of cells centred on the cell of `p`.
    fn neighborhood(&self, p: Point2<F>) -> impl Iterator<Item = usize> + '_ {
        let (gx, gy) = self.grid_coords(p);
        let search_radius = 2;

        let min_gx = gx.saturating_sub(search_radius);
        let max_gx = (gx + search_radius + 1).min(self.grid_width);
        let min_gy = gy.saturating_sub(search_radius);
        let max_gy = (gy + search_radius + 1).min(self.grid_height);

        (min_gy..max_gy).flat_map(move |cy| {
            let row = cy * self.grid_width;
            (min_gx..max_gx).map(move |cx| row + cx)
        })
    }

    /// Grid cell of a point, clamped onto the grid for points outside the
    /// domain.
    fn grid_coords(&self, p: Point2<F>) -> (usize, usize) {
        let fx = ((p.x - self.origin.x) / self.cell_size).floor();
        let fy = ((p.y - self.origin.y) / self.cell_size).floor();
        let cell = |f: F| f.max(F::zero()).to_usize().unwrap_or(0);
        let gx = cell(fx).min(self.grid_width - 1);
        let gy = cell(fy).min(self.grid_height - 1);
        (gx, gy)
    }

    fn random_point_in_domain(&mut self) -> Point2<F> {
        let x = self.origin.x + self.random_f() * self.width;
        let y = self.origin.y + self.random_f() * self.height;
        Point2::new(x, y)
    }

    /// Generates a random point in the annulus [r, 2r] around center.
    fn random_point_in_annulus(&mut self, center: Point2<F>) -> Point2<F> {
        let one = F::one();
        let tau = F::from(std::f64::consts::TAU).unwrap_or_else(F::zero);

        let angle = self.random_f() * tau;
        let r = self.min_distance * (one + self.random_f());

        Point2::new(center.x + r * angle.cos(), center.y + r * angle.sin())
    }

    fn next_u64(&mut self) -> u64 {
        // xorshift64
        self.rng_state ^= self.rng_state << 13;
        self.rng_state ^= self.rng_state >> 7;
        self.rng_state ^= self.rng_state << 17;
        self.rng_state
    }

    /// Uniform value in [0, 1).
    fn random_f(&mut self) -> F {
        let bits = self.next_u64() >> 11;
        let unit = bits as f64 / (1u64 << 53) as f64;
        F::from(unit).unwrap_or_else(F::zero)
    }

    /// Returns a random usize in [0, max).
    fn random_usize(&mut self, max: usize) -> usize {
        (self.next_u64() % max as u64) as usize
    }
}
