//! Uniform grid index over axis-aligned rectangles.
//!
//! The grid covers a fixed viewport split into square cells. Every placed
//! rectangle is registered in each cell its bounds touch, so an overlap query
//! only inspects the cells under the query rectangle.
//!
//! # Example
//!
//! ```
//! use starborders::bounds::{Rect, RectId, RectKind};
//! use starborders::spatial::OverlapGrid;
//!
//! let view = Rect::new(0.0, 0.0, 200.0, 200.0, RectId::new(RectKind::Obstacle, 0));
//! let mut grid = OverlapGrid::new(view, 25.0).unwrap();
//!
//! let a = Rect::new(0.0, 0.0, 10.0, 10.0, RectId::new(RectKind::Site, 0));
//! grid.place(a);
//!
//! let query = Rect::new(5.0, 5.0, 10.0, 10.0, RectId::new(RectKind::SiteLabel, 0));
//! let hits = grid.overlaps(&query, None);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].id, a.id);
//! ```

use crate::bounds::{Rect, RectId, RectKind};
use crate::error::{MapError, Result};
use std::collections::HashMap;

/// Inclusive cell index range `(col_min, col_max, row_min, row_max)`.
type CellRange = (usize, usize, usize, usize);

/// A uniform grid of rectangle references.
///
/// Rectangles are identified by their [`RectId`]: placing an id that is
/// already present replaces its geometry instead of adding a second entry.
#[derive(Debug, Clone)]
pub struct OverlapGrid {
    bounds: Rect,
    cell_size: f64,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<usize>>,
    slots: Vec<Option<Rect>>,
    lookup: HashMap<RectId, usize>,
    placed: usize,
}

impl OverlapGrid {
    /// Creates an empty grid over `bounds` with square cells of `cell_size`.
    pub fn new(bounds: Rect, cell_size: f64) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(MapError::InvalidCellSize(cell_size));
        }
        let finite = bounds.right().is_finite() && bounds.bottom().is_finite();
        if !(finite && bounds.w > 0.0 && bounds.h > 0.0) {
            return Err(MapError::InvalidViewport {
                width: bounds.w,
                height: bounds.h,
            });
        }

        let cols = ((bounds.w / cell_size).ceil() as usize).max(1);
        let rows = ((bounds.h / cell_size).ceil() as usize).max(1);

        Ok(Self {
            bounds,
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
            slots: Vec::new(),
            lookup: HashMap::new(),
            placed: 0,
        })
    }

    /// The area covered by the grid.
    #[inline]
    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    /// Number of rectangles currently placed.
    #[inline]
    pub fn len(&self) -> usize {
        self.placed
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.placed == 0
    }

    /// Returns the placed rectangle with the given id.
    pub fn get(&self, id: RectId) -> Option<&Rect> {
        self.lookup
            .get(&id)
            .and_then(|&slot| self.slots[slot].as_ref())
    }

    /// Iterates over placed rectangles in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.slots.iter().flatten()
    }

    /// Registers a rectangle in every cell its bounds touch.
    ///
    /// A rectangle outside the grid touches no cell: it is remembered (so it
    /// can be unplaced) but no query will ever report it.
    pub fn place(&mut self, rect: Rect) {
        let slot = match self.lookup.get(&rect.id) {
            Some(&slot) => {
                self.remove_from_cells(slot);
                slot
            }
            None => {
                let slot = self.slots.len();
                self.slots.push(None);
                self.lookup.insert(rect.id, slot);
                slot
            }
        };

        if self.slots[slot].is_none() {
            self.placed += 1;
        }
        self.slots[slot] = Some(rect);

        if let Some((c0, c1, r0, r1)) = self.cell_range(&rect) {
            for row in r0..=r1 {
                for col in c0..=c1 {
                    self.cells[row * self.cols + col].push(slot);
                }
            }
        }
    }

    /// Removes the rectangle with the given id, returning it if it was placed.
    pub fn unplace(&mut self, id: RectId) -> Option<Rect> {
        let slot = *self.lookup.get(&id)?;
        self.remove_from_cells(slot);
        let removed = self.slots[slot].take();
        if removed.is_some() {
            self.placed -= 1;
        }
        removed
    }

    /// Returns every distinct placed rectangle intersecting `rect`.
    ///
    /// The query's own id is never reported, and rectangles of kind
    /// `exclude` are skipped. Results are in placement-slot order.
    pub fn overlaps(&self, rect: &Rect, exclude: Option<RectKind>) -> Vec<&Rect> {
        self.overlaps_where(rect, |other| Some(other.id.kind) != exclude)
    }

    /// Counts the rectangles [`overlaps`](Self::overlaps) would return,
    /// without allocating.
    pub fn count(&self, rect: &Rect, exclude: Option<RectKind>) -> usize {
        self.count_where(rect, |other| Some(other.id.kind) != exclude)
    }

    /// Like [`overlaps`](Self::overlaps), keeping only rectangles accepted by
    /// `keep`.
    pub fn overlaps_where<P>(&self, rect: &Rect, keep: P) -> Vec<&Rect>
    where
        P: Fn(&Rect) -> bool,
    {
        let mut found: Vec<usize> = Vec::new();
        self.visit(rect, keep, |slot| found.push(slot));
        found.sort_unstable();
        found
            .into_iter()
            .filter_map(|slot| self.slots[slot].as_ref())
            .collect()
    }

    /// Like [`count`](Self::count), keeping only rectangles accepted by
    /// `keep`.
    pub fn count_where<P>(&self, rect: &Rect, keep: P) -> usize
    where
        P: Fn(&Rect) -> bool,
    {
        let mut n = 0;
        self.visit(rect, keep, |_| n += 1);
        n
    }

    /// Removes every rectangle.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.slots.clear();
        self.lookup.clear();
        self.placed = 0;
    }

    /// Calls `f` once per distinct matching slot.
    ///
    /// A rectangle sharing several cells with the query is only reported from
    /// the first shared cell (lowest row, then lowest column), which
    /// deduplicates without a scratch set.
    fn visit<P, G>(&self, rect: &Rect, keep: P, mut f: G)
    where
        P: Fn(&Rect) -> bool,
        G: FnMut(usize),
    {
        let Some((c0, c1, r0, r1)) = self.cell_range(rect) else {
            return;
        };

        for row in r0..=r1 {
            for col in c0..=c1 {
                for &slot in &self.cells[row * self.cols + col] {
                    let Some(other) = self.slots[slot].as_ref() else {
                        continue;
                    };
                    if other.id == rect.id || !keep(other) {
                        continue;
                    }
                    if !other.intersects(rect) {
                        continue;
                    }
                    let Some((oc0, _, or0, _)) = self.cell_range(other) else {
                        continue;
                    };
                    if col == c0.max(oc0) && row == r0.max(or0) {
                        f(slot);
                    }
                }
            }
        }
    }

    fn remove_from_cells(&mut self, slot: usize) {
        let Some(rect) = self.slots[slot] else {
            return;
        };
        if let Some((c0, c1, r0, r1)) = self.cell_range(&rect) {
            for row in r0..=r1 {
                for col in c0..=c1 {
                    self.cells[row * self.cols + col].retain(|&s| s != slot);
                }
            }
        }
    }

    fn cell_range(&self, rect: &Rect) -> Option<CellRange> {
        if !rect.intersects(&self.bounds) {
            return None;
        }
        let col = |x: f64| {
            let c = ((x - self.bounds.x) / self.cell_size).floor();
            (c.max(0.0) as usize).min(self.cols - 1)
        };
        let row = |y: f64| {
            let r = ((y - self.bounds.y) / self.cell_size).floor();
            (r.max(0.0) as usize).min(self.rows - 1)
        };
        let (c0, c1) = (col(rect.x), col(rect.right()));
        let (r0, r1) = (row(rect.y), row(rect.bottom()));
        Some((c0, c1, r0, r1))
    }
}
