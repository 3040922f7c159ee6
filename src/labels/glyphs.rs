//! Text measurement from a glyph advance table.

use crate::error::{MapError, Result};
use std::collections::HashMap;

/// Advance widths per character plus a line height.
///
/// Characters missing from the table use `default_width`.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMetrics {
    widths: HashMap<char, f64>,
    default_width: f64,
    line_height: f64,
}

impl GlyphMetrics {
    /// Fails on an empty table or a non-positive line height.
    pub fn new(widths: HashMap<char, f64>, default_width: f64, line_height: f64) -> Result<Self> {
        if widths.is_empty() {
            return Err(MapError::EmptyGlyphTable);
        }
        if !(line_height.is_finite() && line_height > 0.0) {
            return Err(MapError::InvalidLineHeight(line_height));
        }
        if !(default_width.is_finite() && default_width >= 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "default glyph width {default_width}"
            )));
        }
        Ok(Self {
            widths,
            default_width,
            line_height,
        })
    }

    #[inline]
    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    /// Advance width of one character.
    pub fn advance(&self, c: char) -> f64 {
        self.widths.get(&c).copied().unwrap_or(self.default_width)
    }

    /// Sum of the advance widths of `text`.
    pub fn text_width(&self, text: &str) -> f64 {
        text.chars().map(|c| self.advance(c)).sum()
    }

    /// Width and height of a block of lines.
    pub fn block_size<S: AsRef<str>>(&self, lines: &[S]) -> (f64, f64) {
        let width = lines
            .iter()
            .map(|l| self.text_width(l.as_ref()))
            .fold(0.0, f64::max);
        (width, lines.len() as f64 * self.line_height)
    }

    /// Splits `text` into two lines at the space that minimizes the wider
    /// line. Ties go to the earlier space. Returns `None` if the text has no
    /// inner space.
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use starborders::labels::GlyphMetrics;
    ///
    /// let glyphs = GlyphMetrics::new(HashMap::from([(' ', 1.0)]), 1.0, 2.0).unwrap();
    /// let lines = glyphs.wrap_two_lines("Federated Commonwealth of Suns").unwrap();
    /// assert_eq!(lines, ["Federated".to_string(), "Commonwealth of Suns".to_string()]);
    /// ```
    pub fn wrap_two_lines(&self, text: &str) -> Option<[String; 2]> {
        let text = text.trim();
        let mut best: Option<(f64, usize)> = None;

        for (i, c) in text.char_indices() {
            if c != ' ' {
                continue;
            }
            let head = text[..i].trim_end();
            let tail = text[i + 1..].trim_start();
            if head.is_empty() || tail.is_empty() {
                continue;
            }
            let wider = self.text_width(head).max(self.text_width(tail));
            if best.is_none_or(|(w, _)| wider < w) {
                best = Some((wider, i));
            }
        }

        best.map(|(_, i)| {
            [
                text[..i].trim_end().to_string(),
                text[i + 1..].trim_start().to_string(),
            ]
        })
    }
}
