//! Word/whitespace/newline tokenizer feeding the pagination walk.
//!
//! Tokens are maximal runs of the input: every `'\n'` stands alone, runs of
//! other whitespace merge, runs of non-whitespace merge. Tokens borrow from
//! the input, and concatenating them in order reconstructs it exactly.

/// Classification of a token produced by [`tokenize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of non-whitespace characters.
    Word,
    /// A run of whitespace characters other than `'\n'`.
    Whitespace,
    /// A single `'\n'` character.
    Newline,
}

impl TokenKind {
    /// Classify a token by its first character.
    ///
    /// Valid for [`tokenize`] output because classification only switches at
    /// character boundaries: a token's first character decides its kind.
    pub fn classify(token: &str) -> TokenKind {
        match token.chars().next() {
            Some('\n') => TokenKind::Newline,
            Some(ch) if ch.is_whitespace() => TokenKind::Whitespace,
            _ => TokenKind::Word,
        }
    }
}

/// Split `text` into word, whitespace, and newline tokens.
///
/// Total: never fails, returns an empty vec for empty input.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut run_start = 0usize;
    let mut run_kind: Option<TokenKind> = None;

    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            if run_kind.is_some() {
                tokens.push(&text[run_start..idx]);
                run_kind = None;
            }
            tokens.push(&text[idx..idx + 1]);
            run_start = idx + 1;
            continue;
        }

        let kind = if ch.is_whitespace() {
            TokenKind::Whitespace
        } else {
            TokenKind::Word
        };

        match run_kind {
            Some(k) if k == kind => {}
            Some(_) => {
                tokens.push(&text[run_start..idx]);
                run_start = idx;
                run_kind = Some(kind);
            }
            None => {
                run_start = idx;
                run_kind = Some(kind);
            }
        }
    }

    if run_kind.is_some() {
        tokens.push(&text[run_start..]);
    }

    tokens
}
