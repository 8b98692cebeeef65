//! Deterministic pagination engine.
//!
//! Re-flows document text into fixed-size pages under width/height/margin/
//! font constraints. The walk is greedy: tokens fill the current line until
//! a newline or an overflowing word closes it, and lines fill the current
//! page until the page's line budget closes that. Output is a list of
//! character-offset slices that partition the text exactly, so the same
//! `(text, options)` pair always produces bit-identical results.

use log::warn;
use thiserror::Error;

use crate::measure::{FixedAdvance, MeasurementCache, TextMeasurer};
use crate::tokenize::{TokenKind, tokenize};

/// Hard ceiling on emitted pages.
///
/// Pathological input (e.g. a flood of newlines against a one-line page)
/// truncates here instead of producing unbounded output; truncation is a
/// deliberate safety bound, not an error.
pub const MAX_PAGES: usize = 10_000;

/// Page geometry and font configuration for one layout call.
///
/// All dimensions are pixels. Supplied fresh on every call; the engine never
/// retains it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Full page width.
    pub page_width: f32,
    /// Full page height.
    pub page_height: f32,
    /// Top margin.
    pub margin_top: f32,
    /// Bottom margin.
    pub margin_bottom: f32,
    /// Left margin.
    pub margin_left: f32,
    /// Right margin.
    pub margin_right: f32,
    /// Height of one text line.
    pub line_height: f32,
    /// Font identifier (family and size) handed to the measurer.
    pub font: String,
    /// Font size in pixels.
    pub font_size: f32,
}

impl Default for LayoutOptions {
    /// US Letter at 96 dpi with one-inch margins.
    fn default() -> Self {
        Self {
            page_width: 816.0,
            page_height: 1056.0,
            margin_top: 96.0,
            margin_bottom: 96.0,
            margin_left: 96.0,
            margin_right: 96.0,
            line_height: 24.0,
            font: "16px serif".to_string(),
            font_size: 16.0,
        }
    }
}

/// One page's share of the document: a contiguous character-offset range.
///
/// Across a layout result, slices are contiguous and non-overlapping, cover
/// `[0, text_len)` exactly, and `page_index` increases by one per slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    /// Sequential page number, starting at 0.
    pub page_index: usize,
    /// Inclusive start character offset into the full text.
    pub start: usize,
    /// Exclusive end character offset into the full text.
    pub end: usize,
}

/// Errors produced by layout configuration validation.
///
/// Validation runs before any layout work; a failing configuration never
/// yields partial output.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// Margins consume the entire page width.
    #[error("page width too small for margins")]
    PageWidthTooSmall,
    /// Margins consume the entire page height.
    #[error("page height too small for margins")]
    PageHeightTooSmall,
    /// Line height is zero or negative.
    #[error("line height must be positive")]
    NonPositiveLineHeight,
}

/// Pagination engine owning its measurement cache.
///
/// Reusing one paginator across edits keeps token widths warm between
/// layout passes; a fresh paginator gives identical output, just colder.
pub struct Paginator<M: TextMeasurer> {
    cache: MeasurementCache<M>,
}

impl Default for Paginator<FixedAdvance> {
    fn default() -> Self {
        Self::new(FixedAdvance::default())
    }
}

impl<M: TextMeasurer> Paginator<M> {
    /// Create a paginator measuring text with `measurer`.
    pub fn new(measurer: M) -> Self {
        Self {
            cache: MeasurementCache::new(measurer),
        }
    }

    /// The paginator's measurement cache.
    pub fn cache(&self) -> &MeasurementCache<M> {
        &self.cache
    }

    /// Partition `text` into page slices under `options`.
    ///
    /// Deterministic: identical `(text, options)` always produce an
    /// identical slice sequence. Empty text yields exactly one empty slice
    /// for page 0.
    pub fn paginate(
        &mut self,
        text: &str,
        options: &LayoutOptions,
    ) -> Result<Vec<PageSlice>, LayoutError> {
        validate(options)?;

        let max_line_width = options.page_width - options.margin_left - options.margin_right;
        let usable_height = options.page_height - options.margin_top - options.margin_bottom;
        // A page always fits at least one line, even when the arithmetic
        // floor says zero.
        let max_lines_per_page = ((usable_height / options.line_height).floor() as usize).max(1);

        if text.is_empty() {
            return Ok(vec![PageSlice {
                page_index: 0,
                start: 0,
                end: 0,
            }]);
        }

        let mut pages: Vec<PageSlice> = Vec::new();
        let mut char_index = 0usize;
        let mut line_width = 0f32;
        let mut lines_on_page = 0usize;
        let mut page_start = 0usize;
        let mut page_index = 0usize;

        for token in tokenize(text) {
            let kind = TokenKind::classify(token);

            if kind == TokenKind::Newline {
                // A newline closes the line unconditionally and consumes
                // one character.
                line_width = 0.0;
                lines_on_page += 1;
                char_index += 1;

                if lines_on_page >= max_lines_per_page {
                    pages.push(PageSlice {
                        page_index,
                        start: page_start,
                        end: char_index,
                    });
                    page_start = char_index;
                    page_index += 1;
                    lines_on_page = 0;

                    if pages.len() >= MAX_PAGES {
                        warn!("page ceiling of {MAX_PAGES} reached; truncating pagination");
                        return Ok(pages);
                    }
                }
                continue;
            }

            let width = self.cache.width(token, &options.font);

            // An overflowing word forces a line break; whitespace runs are
            // allowed to extend past the nominal line width instead (soft
            // wrap never breaks on trailing space). The break consumes no
            // characters but closes lines and pages exactly like a newline.
            if kind == TokenKind::Word && line_width > 0.0 && line_width + width > max_line_width {
                line_width = 0.0;
                lines_on_page += 1;

                if lines_on_page >= max_lines_per_page {
                    pages.push(PageSlice {
                        page_index,
                        start: page_start,
                        end: char_index,
                    });
                    page_start = char_index;
                    page_index += 1;
                    lines_on_page = 0;

                    if pages.len() >= MAX_PAGES {
                        warn!("page ceiling of {MAX_PAGES} reached; truncating pagination");
                        return Ok(pages);
                    }
                }
            }

            line_width += width;
            char_index += token.chars().count();
        }

        // Whatever remains after the last page close becomes the trailing
        // page.
        if pages.last().map(|p| p.end) != Some(char_index) {
            pages.push(PageSlice {
                page_index,
                start: page_start,
                end: char_index,
            });
        }

        Ok(pages)
    }
}

/// Partition `text` into page slices using the deterministic
/// [`FixedAdvance`] width model.
///
/// Convenience entry point over a fresh [`Paginator`]; hosts with a real
/// text-measurement surface construct a [`Paginator`] around it instead.
pub fn layout(text: &str, options: &LayoutOptions) -> Result<Vec<PageSlice>, LayoutError> {
    Paginator::default().paginate(text, options)
}

fn validate(options: &LayoutOptions) -> Result<(), LayoutError> {
    if options.page_width <= options.margin_left + options.margin_right {
        return Err(LayoutError::PageWidthTooSmall);
    }
    if options.page_height <= options.margin_top + options.margin_bottom {
        return Err(LayoutError::PageHeightTooSmall);
    }
    if options.line_height <= 0.0 {
        return Err(LayoutError::NonPositiveLineHeight);
    }
    Ok(())
}
