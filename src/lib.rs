//! starborders - Political borders and labels for star maps
//!
//! Systems are points in the plane, each owned by a faction. This library
//! draws the borders between factions as smoothed Voronoi cell boundaries
//! and places two kinds of labels without overlaps: system and cluster names
//! next to their markers, and faction names along their borders.
//!
//! The pieces can be used on their own ([`spatial::OverlapGrid`],
//! [`sampling::PoissonDiskSampler`], [`borders::BorderExtractor`], the
//! placers in [`labels`]) or wired together by [`pipeline::MapContext`].

pub mod borders;
pub mod bounds;
pub mod config;
pub mod curves;
pub mod error;
pub mod faction;
pub mod labels;
pub mod pipeline;
pub mod polygon;
pub mod primitives;
pub mod sampling;
pub mod spatial;
pub mod tolerance;
pub mod triangulation;

pub use bounds::{OrientedRect, Rect, RectId, RectKind};
pub use config::MapConfig;
pub use error::{MapError, Result};
pub use faction::{Faction, FactionId, FactionRegistry};
pub use pipeline::{Cluster, MapContext, MapLayout, Site};
pub use primitives::{Point2, Segment2, Vec2};
pub use tolerance::{orient2d, segments_intersect, Orientation, SegmentIntersection};
