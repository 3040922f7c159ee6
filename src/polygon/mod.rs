//! Polygon measures used on closed border loops.

mod core;

pub use self::core::{polygon_area, polygon_contains, polygon_signed_area};
