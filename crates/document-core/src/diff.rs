//! Minimal single-splice diff between two document snapshots.
//!
//! A host UI typically reports edits as whole-text snapshots (the content of
//! a text area before and after a keystroke). [`compute_change`] reduces the
//! pair to one contiguous replacement, which [`TextChange::apply_to`] replays
//! against the piece table as a delete followed by an insert.

use crate::storage::{BufferError, PieceTable};

/// A single contiguous text replacement expressed in character offsets.
///
/// Applying the change to a document equal to the `prev` snapshot — deleting
/// `removed_count` characters at `start`, then inserting `inserted_text`
/// there — yields the `next` snapshot exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    /// Character offset where the replacement begins.
    ///
    /// For identical snapshots this is the snapshot length (a canonical
    /// end-of-document no-op), not a meaningful position.
    pub start: usize,
    /// How many characters to delete at `start` (may be zero).
    pub removed_count: usize,
    /// The replacement text inserted at `start` (may be empty).
    pub inserted_text: String,
}

impl TextChange {
    /// Returns `true` if this change neither deletes nor inserts anything.
    pub fn is_noop(&self) -> bool {
        self.removed_count == 0 && self.inserted_text.is_empty()
    }

    /// Replay this change against a buffer holding the `prev` snapshot:
    /// delete first, then insert.
    pub fn apply_to(&self, buffer: &mut PieceTable) -> Result<(), BufferError> {
        if self.removed_count > 0 {
            buffer.delete(self.start, self.start + self.removed_count)?;
        }
        if !self.inserted_text.is_empty() {
            buffer.insert(self.start, &self.inserted_text)?;
        }
        Ok(())
    }
}

/// Compute the minimal single contiguous replacement turning `prev` into
/// `next`.
///
/// Scans for the longest common prefix, then for the longest common suffix
/// bounded so it never overlaps the matched prefix; everything in between is
/// the replacement. Pure and total.
pub fn compute_change(prev: &str, next: &str) -> TextChange {
    if prev == next {
        return TextChange {
            start: prev.chars().count(),
            removed_count: 0,
            inserted_text: String::new(),
        };
    }

    let mut prefix_chars = 0usize;
    let mut prefix_bytes = 0usize;
    for (pc, nc) in prev.chars().zip(next.chars()) {
        if pc != nc {
            break;
        }
        prefix_chars += 1;
        prefix_bytes += pc.len_utf8();
    }

    // Both remainders start past the matched prefix, so scanning them from
    // the back can never re-match prefix characters.
    let prev_rest = &prev[prefix_bytes..];
    let next_rest = &next[prefix_bytes..];

    let mut suffix_bytes_prev = 0usize;
    let mut suffix_bytes_next = 0usize;
    for (pc, nc) in prev_rest.chars().rev().zip(next_rest.chars().rev()) {
        if pc != nc {
            break;
        }
        suffix_bytes_prev += pc.len_utf8();
        suffix_bytes_next += nc.len_utf8();
    }

    let removed = &prev_rest[..prev_rest.len() - suffix_bytes_prev];
    let inserted = &next_rest[..next_rest.len() - suffix_bytes_next];

    TextChange {
        start: prefix_chars,
        removed_count: removed.chars().count(),
        inserted_text: inserted.to_string(),
    }
}
