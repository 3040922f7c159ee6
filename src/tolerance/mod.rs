//! Epsilon-aware geometric predicates.
//!
//! All functions in this module take explicit tolerance parameters.

mod predicates;

pub use predicates::{orient2d, segments_intersect, Orientation, SegmentIntersection};
