//! Text width measurement: pluggable strategy plus a memoizing cache.
//!
//! The pagination engine only needs one capability — the pixel width of a
//! token set in a font. A host embedding this crate next to a real rendering
//! surface implements [`TextMeasurer`] over that surface; everywhere else the
//! deterministic [`FixedAdvance`] model keeps layout reproducible without
//! any platform text machinery.

use std::collections::HashMap;

use unicode_width::UnicodeWidthChar;

/// Default pixel advance per cell, sized for a 16px face.
pub const DEFAULT_ADVANCE_PER_CELL: f32 = 8.0;

/// Measures the rendered pixel width of text set in a font.
///
/// Implementations must be deterministic: the same `(text, font)` pair
/// always yields the same width, since layout output is snapshot-tested.
pub trait TextMeasurer {
    /// Width in pixels of `text` rendered in `font`.
    fn measure_width(&self, text: &str, font: &str) -> f32;
}

/// Deterministic synthetic width model: a fixed pixel advance per
/// character cell.
///
/// Cell counts follow UAX #11 (CJK and most emoji occupy two cells), so the
/// model degrades gracefully on wide scripts while remaining pure
/// arithmetic. The font string is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance {
    advance_per_cell: f32,
}

impl FixedAdvance {
    /// Create a model with the given pixel advance per cell.
    pub fn new(advance_per_cell: f32) -> Self {
        Self { advance_per_cell }
    }

    /// The width-per-cell = 1 model, convenient for tests that reason in
    /// character counts.
    pub fn unit() -> Self {
        Self::new(1.0)
    }
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self::new(DEFAULT_ADVANCE_PER_CELL)
    }
}

impl TextMeasurer for FixedAdvance {
    fn measure_width(&self, text: &str, _font: &str) -> f32 {
        let cells: usize = text
            .chars()
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(1))
            .sum();
        cells as f32 * self.advance_per_cell
    }
}

/// Memoizing width cache wrapping a [`TextMeasurer`].
///
/// Widths are keyed by `(font, text)`, so switching fonts never invalidates
/// entries measured under another font. The empty string measures 0 without
/// consulting the underlying measurer.
pub struct MeasurementCache<M: TextMeasurer> {
    measurer: M,
    /// font -> text -> width; nested so cache hits allocate nothing.
    widths: HashMap<String, HashMap<String, f32>>,
}

impl<M: TextMeasurer> MeasurementCache<M> {
    /// Create an empty cache over `measurer`.
    pub fn new(measurer: M) -> Self {
        Self {
            measurer,
            widths: HashMap::new(),
        }
    }

    /// Width in pixels of `text` in `font`, memoized.
    pub fn width(&mut self, text: &str, font: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        if let Some(per_font) = self.widths.get(font)
            && let Some(width) = per_font.get(text)
        {
            return *width;
        }

        let width = self.measurer.measure_width(text, font);
        self.widths
            .entry(font.to_string())
            .or_default()
            .insert(text.to_string(), width);
        width
    }

    /// Number of cached entries across all fonts.
    pub fn len(&self) -> usize {
        self.widths.values().map(|per_font| per_font.len()).sum()
    }

    /// Returns `true` if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached entries.
    pub fn clear(&mut self) {
        self.widths.clear();
    }
}
