//! Error types for map construction.
//!
//! Only caller contract violations are errors. Heuristic outcomes such as a
//! faction that cannot be labeled are reported through the returned data and
//! the log, never through `MapError`.

use thiserror::Error;

/// Errors raised when a map context or one of its components is set up with
/// invalid input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// The glyph width table has no entries.
    #[error("glyph width table is empty")]
    EmptyGlyphTable,

    /// The line height used to size labels is not a positive finite number.
    #[error("invalid line height {0}")]
    InvalidLineHeight(f64),

    /// The viewport has no area or non-finite bounds.
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport {
        /// Viewport width.
        width: f64,
        /// Viewport height.
        height: f64,
    },

    /// The overlap grid cell size is not a positive finite number.
    #[error("invalid grid cell size {0}")]
    InvalidCellSize(f64),

    /// The blue-noise radius is not a positive finite number.
    #[error("invalid sampling radius {0}")]
    InvalidRadius(f64),

    /// Border label rating weights do not sum to one.
    #[error("rating weights sum to {sum}, expected 1")]
    InvalidWeights {
        /// Actual sum of the weights.
        sum: f64,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A faction code was looked up but never registered.
    #[error("unknown faction code {0:?}")]
    UnknownFaction(String),

    /// A faction code was registered twice.
    #[error("faction code {0:?} registered twice")]
    DuplicateFaction(String),
}

/// Result alias used by fallible constructors in this crate.
pub type Result<T> = std::result::Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            MapError::InvalidViewport {
                width: 0.0,
                height: 10.0
            }
            .to_string(),
            "invalid viewport 0x10"
        );
        assert_eq!(
            MapError::UnknownFaction("FS".into()).to_string(),
            "unknown faction code \"FS\""
        );
    }
}
