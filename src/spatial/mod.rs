//! Spatial indexing of label and site rectangles.
//!
//! [`OverlapGrid`] is the one structure shared by both label placers: point
//! labels are placed into it first, border labels query it and add their own
//! bounds as they are accepted.

mod grid;

pub use grid::OverlapGrid;
