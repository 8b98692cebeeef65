#![warn(missing_docs)]
//! Document Core - Headless Paginated Document Editor Engine
//!
//! # Overview
//!
//! `document-core` is the engine of a paginated rich-document editor, focused on text storage,
//! minimal edit diffs, and deterministic page layout.
//! It does not involve the rendering process, assuming the upper layer provides the views,
//! networking, and persistence; the engine exposes plain synchronous operations over in-memory data.
//!
//! # Core Features
//!
//! - **Efficient Text Storage**: Piece Table over an immutable original buffer and an
//!   append-only add buffer, with amortized O(1) backing-store growth
//! - **Minimal Diffs**: one contiguous splice computed from before/after text snapshots
//! - **Deterministic Pagination**: greedy line/page breaking under width/height/margin/font
//!   constraints, bit-identical output for identical input
//! - **Pluggable Measurement**: width measurement behind a trait, with a pure arithmetic
//!   fallback so layout reproduces without any platform text surface
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Pagination Engine (Paginator)              │  ← Page Slices
//! ├─────────────────────────────────────────────┤
//! │  Tokenizer + Measurement Cache              │  ← Layout Inputs
//! ├─────────────────────────────────────────────┤
//! │  Diff Computer (TextChange)                 │  ← Edit Bridging
//! ├─────────────────────────────────────────────┤
//! │  Piece Table Storage                        │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Editing through diffs
//!
//! ```rust
//! use document_core::{PieceTable, compute_change};
//!
//! let mut buffer = PieceTable::new("hello world");
//!
//! // The UI reports whole-text snapshots; the diff reduces them to one splice.
//! let change = compute_change("hello world", "hello brave world");
//! change.apply_to(&mut buffer).unwrap();
//!
//! assert_eq!(buffer.get_text(), "hello brave world");
//! assert_eq!(buffer.get_slice(6, 11).unwrap(), "brave");
//! ```
//!
//! ## Paginating a document
//!
//! ```rust
//! use document_core::{LayoutOptions, layout};
//!
//! let text = "The quick brown fox jumps over the lazy dog.\n".repeat(100);
//! let pages = layout(&text, &LayoutOptions::default()).unwrap();
//!
//! // Slices partition the text: contiguous, non-overlapping, in page order.
//! assert_eq!(pages[0].start, 0);
//! assert_eq!(pages.last().unwrap().end, text.chars().count());
//! ```
//!
//! # Module Description
//!
//! - [`storage`] - Piece Table text storage layer
//! - [`diff`] - minimal single-splice diff between text snapshots
//! - [`tokenize`] - word/whitespace/newline tokenizer
//! - [`measure`] - width measurement strategy and memoizing cache
//! - [`layout`] - deterministic pagination engine
//!
//! # Unicode Support
//!
//! - UTF-8 internal encoding; all public offsets are character offsets
//!   (Unicode scalar values)
//! - The fallback width model follows UAX #11 (CJK double-width characters)
//! - Grapheme clusters are not treated as units (single-character tokens only)

pub mod diff;
pub mod layout;
pub mod measure;
pub mod storage;
pub mod tokenize;

pub use diff::{TextChange, compute_change};
pub use layout::{LayoutError, LayoutOptions, MAX_PAGES, PageSlice, Paginator, layout};
pub use measure::{DEFAULT_ADVANCE_PER_CELL, FixedAdvance, MeasurementCache, TextMeasurer};
pub use storage::{BufferError, BufferSource, Piece, PieceTable};
pub use tokenize::{TokenKind, tokenize};
