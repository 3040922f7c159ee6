//! Label placement for systems, clusters and faction borders.
//!
//! Both placers share one [`OverlapGrid`](crate::spatial::OverlapGrid):
//! point labels are placed first, then border labels avoid them.

mod border;
mod glyphs;
mod point;

pub use border::{
    extract_polylines, premerge, BorderLabel, BorderLabelPlacer, FactionBorderLabels, Polyline,
};
pub use glyphs::GlyphMetrics;
pub use point::{LabelAnchor, LabelPosition, PlacedLabel, PointLabelLayout, PointLabelPlacer};
