//! Curve evaluation and smoothing.

mod bezier;
mod smoothing;

pub use bezier::CubicBezier2;
pub use smoothing::{control_points, DEFAULT_TENSION};
