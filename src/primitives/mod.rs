//! Floating-point geometric primitives.

mod line2;
mod point2;
mod segment2;
mod vec2;

pub use line2::{centroid, circumcenter, Line2};
pub use point2::Point2;
pub use segment2::Segment2;
pub use vec2::Vec2;
