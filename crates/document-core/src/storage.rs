//! Piece-table text storage layer.
//!
//! The document is stored as an ordered list of [`Piece`]s, each referencing a
//! contiguous run inside one of two backing stores: the immutable original
//! snapshot and an append-only add buffer. Edits never rewrite stored text;
//! they only split, drop, or add piece references.
//!
//! All public offsets are character offsets (Unicode scalar values). Pieces
//! carry both byte and character lengths so slicing stays byte-accurate
//! without rescanning the whole document.

use log::debug;
use thiserror::Error;

/// Identifies which backing store a [`Piece`] references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferSource {
    /// The read-only snapshot the table was constructed from.
    Original,
    /// The append-only store holding all text inserted during the session.
    Add,
}

/// Errors produced by out-of-range buffer operations.
///
/// Validation happens before any state change: a failed call leaves the
/// buffer exactly as it was. Negative offsets are unrepresentable (`usize`);
/// every remaining violation gets its own variant and message.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// The range start exceeds the range end.
    #[error("range start {start} exceeds range end {end}")]
    InvertedRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// The range start lies past the end of the document.
    #[error("range start {start} is out of bounds (length {len})")]
    StartOutOfBounds {
        /// Inclusive start character offset.
        start: usize,
        /// Document length in characters.
        len: usize,
    },
    /// The range end lies past the end of the document.
    #[error("range end {end} is out of bounds (length {len})")]
    EndOutOfBounds {
        /// Exclusive end character offset.
        end: usize,
        /// Document length in characters.
        len: usize,
    },
    /// The insert position lies past the end of the document.
    #[error("insert position {pos} is out of bounds (length {len})")]
    PositionOutOfBounds {
        /// Requested insert position in characters.
        pos: usize,
        /// Document length in characters.
        len: usize,
    },
}

/// Piece structure: references a fragment in a backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// Which backing store the fragment lives in.
    pub source: BufferSource,
    /// Start position in that store (byte offset, always a char boundary).
    pub start: usize,
    /// Byte length of the fragment.
    pub byte_length: usize,
    /// Character count of the fragment.
    pub char_count: usize,
}

impl Piece {
    /// Create a new piece.
    pub fn new(source: BufferSource, start: usize, byte_length: usize, char_count: usize) -> Self {
        Self {
            source,
            start,
            byte_length,
            char_count,
        }
    }
}

/// Piece table: the main storage structure.
///
/// Created once per editing session from an initial string and mutated in
/// place for the session's lifetime.
pub struct PieceTable {
    /// Read-only original snapshot.
    original: String,
    /// Append-only add buffer; grows on every insert, compacted only by GC.
    add: String,
    /// Ordered list of pieces; concatenated in order they form the document.
    pieces: Vec<Piece>,
    /// Mutation counter, drives automatic GC.
    operation_count: usize,
    /// Number of mutations between automatic GC passes.
    gc_threshold: usize,
}

const DEFAULT_GC_THRESHOLD: usize = 1000;

impl PieceTable {
    /// Create a piece table holding `text`.
    pub fn new(text: &str) -> Self {
        let char_count = text.chars().count();
        let pieces = if text.is_empty() {
            Vec::new()
        } else {
            vec![Piece::new(BufferSource::Original, 0, text.len(), char_count)]
        };

        Self {
            original: text.to_string(),
            add: String::new(),
            pieces,
            operation_count: 0,
            gc_threshold: DEFAULT_GC_THRESHOLD,
        }
    }

    /// Create an empty piece table.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Total character count of the document.
    pub fn char_count(&self) -> usize {
        self.pieces.iter().map(|p| p.char_count).sum()
    }

    /// Total byte count of the document.
    pub fn byte_count(&self) -> usize {
        self.pieces.iter().map(|p| p.byte_length).sum()
    }

    /// Current size of the add buffer in bytes (observable for memory tests).
    pub fn add_buffer_size(&self) -> usize {
        self.add.len()
    }

    /// Materialize the entire document.
    pub fn get_text(&self) -> String {
        let mut result = String::with_capacity(self.byte_count());
        for piece in &self.pieces {
            result.push_str(self.resolve(piece));
        }
        result
    }

    /// Return the characters in `[start, end)`.
    ///
    /// On success the result contains exactly `end - start` characters.
    pub fn get_slice(&self, start: usize, end: usize) -> Result<String, BufferError> {
        self.check_range(start, end)?;

        let mut result = String::new();
        let mut current_offset = 0;

        for piece in &self.pieces {
            let piece_end = current_offset + piece.char_count;

            if current_offset >= end {
                break;
            }

            if piece_end > start {
                let piece_text = self.resolve(piece);
                let skip_chars = start.saturating_sub(current_offset);
                let take_chars = end.min(piece_end) - start.max(current_offset);

                let from = byte_offset_of_char(piece_text, skip_chars);
                let to = byte_offset_of_char(piece_text, skip_chars + take_chars);
                result.push_str(&piece_text[from..to]);
            }

            current_offset = piece_end;
        }

        Ok(result)
    }

    /// Insert `text` so that it begins at character offset `pos`.
    ///
    /// Inserting an empty string is a legal no-op (the position is still
    /// validated).
    pub fn insert(&mut self, pos: usize, text: &str) -> Result<(), BufferError> {
        let len = self.char_count();
        if pos > len {
            return Err(BufferError::PositionOutOfBounds { pos, len });
        }
        if text.is_empty() {
            return Ok(());
        }

        let add_start = self.add.len();
        self.add.push_str(text);
        let new_piece = Piece::new(BufferSource::Add, add_start, text.len(), text.chars().count());

        let (piece_index, char_offset_in_piece) = self.find_piece_at_offset(pos);

        if let Some(piece_idx) = piece_index {
            let piece = self.pieces[piece_idx];

            if char_offset_in_piece == 0 {
                self.pieces.insert(piece_idx, new_piece);
            } else if char_offset_in_piece == piece.char_count {
                self.pieces.insert(piece_idx + 1, new_piece);
            } else {
                // Insert in the middle of the piece: split into three.
                let (left, right) = self.split_piece(&piece, char_offset_in_piece);
                self.pieces
                    .splice(piece_idx..=piece_idx, [left, new_piece, right]);
            }
        } else {
            // Empty document.
            self.pieces.push(new_piece);
        }

        self.try_merge_adjacent_pieces();
        self.check_gc();
        Ok(())
    }

    /// Remove the characters in `[start, end)`.
    ///
    /// `start == end` is a legal no-op (the range is still validated).
    pub fn delete(&mut self, start: usize, end: usize) -> Result<(), BufferError> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(());
        }

        let ((start_idx, start_char_offset), (end_idx, end_char_offset)) =
            match (self.find_piece_at_offset(start), self.find_piece_at_offset(end)) {
                ((Some(s), so), (Some(e), eo)) => ((s, so), (e, eo)),
                // A validated non-empty range always resolves to pieces.
                _ => return Ok(()),
            };

        if start_idx == end_idx {
            let piece = self.pieces[start_idx];

            if start_char_offset == 0 && end_char_offset == piece.char_count {
                self.pieces.remove(start_idx);
            } else if start_char_offset == 0 {
                let (_, right) = self.split_piece(&piece, end_char_offset);
                self.pieces[start_idx] = right;
            } else if end_char_offset == piece.char_count {
                let (left, _) = self.split_piece(&piece, start_char_offset);
                self.pieces[start_idx] = left;
            } else {
                // Deletion strictly inside one piece: keep both flanks.
                let (left, rest) = self.split_piece(&piece, start_char_offset);
                let (_, right) = self.split_piece(&rest, end_char_offset - start_char_offset);
                self.pieces.splice(start_idx..=start_idx, [left, right]);
            }
        } else {
            let start_piece = self.pieces[start_idx];
            let end_piece = self.pieces[end_idx];

            let mut survivors = Vec::new();
            if start_char_offset > 0 {
                let (left, _) = self.split_piece(&start_piece, start_char_offset);
                survivors.push(left);
            }
            if end_char_offset < end_piece.char_count {
                let (_, right) = self.split_piece(&end_piece, end_char_offset);
                survivors.push(right);
            }

            self.pieces.splice(start_idx..=end_idx, survivors);
        }

        self.check_gc();
        Ok(())
    }

    /// Garbage collection: compact the add buffer, dropping unreferenced
    /// bytes and rewriting piece offsets.
    pub fn gc(&mut self) {
        let mut referenced: Vec<(usize, usize)> = self
            .pieces
            .iter()
            .filter(|p| p.source == BufferSource::Add)
            .map(|p| (p.start, p.start + p.byte_length))
            .collect();

        if referenced.is_empty() {
            self.add.clear();
            self.operation_count = 0;
            return;
        }

        referenced.sort_by_key(|r| r.0);

        // Merge overlapping or adjacent ranges.
        let mut merged = vec![referenced[0]];
        for range in referenced.iter().skip(1) {
            let last_idx = merged.len() - 1;
            if range.0 <= merged[last_idx].1 {
                merged[last_idx].1 = merged[last_idx].1.max(range.1);
            } else {
                merged.push(*range);
            }
        }

        let old_size = self.add.len();
        let mut new_add = String::new();
        let mut mappings: Vec<(usize, usize, usize)> = Vec::new(); // (old_start, old_end, new_start)

        for (old_start, old_end) in merged {
            let new_start = new_add.len();
            new_add.push_str(&self.add[old_start..old_end]);
            mappings.push((old_start, old_end, new_start));
        }

        // Rewrite add-buffer piece offsets (piece.start may fall inside a
        // merged range, not only at its beginning).
        for piece in &mut self.pieces {
            if piece.source != BufferSource::Add {
                continue;
            }

            let idx = match mappings.binary_search_by_key(&piece.start, |(s, _, _)| *s) {
                Ok(exact) => exact,
                Err(insert_pos) => insert_pos.saturating_sub(1),
            };

            if let Some((old_start, old_end, new_start)) = mappings.get(idx).copied()
                && piece.start < old_end
            {
                piece.start = new_start + (piece.start - old_start);
            }
        }

        debug!(
            "compacted add buffer: {} -> {} bytes",
            old_size,
            new_add.len()
        );
        self.add = new_add;
        self.operation_count = 0;
    }

    /// Set the number of mutations between automatic GC passes.
    pub fn set_gc_threshold(&mut self, threshold: usize) {
        self.gc_threshold = threshold;
    }

    /// Number of pieces currently in the table (observable for tests).
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    fn resolve(&self, piece: &Piece) -> &str {
        let buffer = match piece.source {
            BufferSource::Original => &self.original,
            BufferSource::Add => &self.add,
        };
        &buffer[piece.start..piece.start + piece.byte_length]
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), BufferError> {
        let len = self.char_count();
        if start > end {
            return Err(BufferError::InvertedRange { start, end });
        }
        if start > len {
            return Err(BufferError::StartOutOfBounds { start, len });
        }
        if end > len {
            return Err(BufferError::EndOutOfBounds { end, len });
        }
        Ok(())
    }

    /// Find the piece covering `offset` and the character offset within it.
    ///
    /// Returns `(piece_index, char_offset_in_piece)`. An offset on a piece
    /// boundary resolves to the earlier piece with `char_offset_in_piece`
    /// equal to that piece's character count.
    fn find_piece_at_offset(&self, offset: usize) -> (Option<usize>, usize) {
        let mut current_offset = 0;

        for (idx, piece) in self.pieces.iter().enumerate() {
            let next_offset = current_offset + piece.char_count;
            if offset <= next_offset {
                return (Some(idx), offset - current_offset);
            }
            current_offset = next_offset;
        }

        if self.pieces.is_empty() {
            (None, 0)
        } else {
            (
                Some(self.pieces.len() - 1),
                self.pieces[self.pieces.len() - 1].char_count,
            )
        }
    }

    /// Split a piece at the given character offset into `(left, right)`.
    fn split_piece(&self, piece: &Piece, char_offset: usize) -> (Piece, Piece) {
        let piece_text = self.resolve(piece);
        let byte_offset = byte_offset_of_char(piece_text, char_offset);

        let left = Piece::new(piece.source, piece.start, byte_offset, char_offset);
        let right = Piece::new(
            piece.source,
            piece.start + byte_offset,
            piece.byte_length - byte_offset,
            piece.char_count - char_offset,
        );

        (left, right)
    }

    /// Two pieces merge when both reference the add buffer back to back.
    fn can_merge(p1: &Piece, p2: &Piece) -> bool {
        p1.source == BufferSource::Add
            && p2.source == BufferSource::Add
            && p1.start + p1.byte_length == p2.start
    }

    fn try_merge_adjacent_pieces(&mut self) {
        let mut i = 0;
        while i + 1 < self.pieces.len() {
            if Self::can_merge(&self.pieces[i], &self.pieces[i + 1]) {
                let p2 = self.pieces[i + 1];
                let p1 = &mut self.pieces[i];
                p1.byte_length += p2.byte_length;
                p1.char_count += p2.char_count;
                self.pieces.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }

    fn check_gc(&mut self) {
        self.operation_count += 1;
        if self.operation_count >= self.gc_threshold {
            self.gc();
        }
    }
}

/// Convert a character offset within `s` to a byte offset.
///
/// `char_offset` past the last character maps to `s.len()`.
fn byte_offset_of_char(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
