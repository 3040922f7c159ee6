//! Rectangles used for overlap tests.

mod oriented;
mod rect;

pub use oriented::OrientedRect;
pub use rect::{Rect, RectId, RectKind};
