//! Token kinds produced by the tokenizer.

/// Classification of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A character no rule claimed. Advanced one position at a time.
    Unknown,
    /// Identifier: letter or `_` head, alphanumeric/`_` tail.
    Ident,
    /// An identifier found in the language's keyword table.
    Keyword,
    /// Single-line string literal (escape-aware when the language says so).
    Str,
    /// Multi-line string literal; may continue onto following lines.
    MultilineStr,
    /// Numeric literal: integer, fraction, exponent, `_` separators.
    Number,
    /// Operator from the 1/2/3-character tables, or an operator word.
    Operator,
    /// Single-character punctuation.
    Symbol,
    /// Comment running to the end of the line.
    LineComment,
    /// Block comment; may continue onto following lines.
    BlockComment,
    /// Run of tabs and Unicode whitespace.
    Whitespace,
    /// The synthetic token covering the line's terminal newline.
    Newline,
}

/// One token on a line.
///
/// `start..end` is a half-open character-index range into the line's
/// content. Tokens tile the content without gaps; the final token is always
/// a [`Newline`](TokenKind::Newline) covering the position just past the
/// content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    /// For [`BlockComment`](TokenKind::BlockComment) and
    /// [`MultilineStr`](TokenKind::MultilineStr): whether the closing
    /// sequence was found on this line. Always `true` for other kinds.
    pub terminated: bool,
}

impl Token {
    /// A token whose closing delimiter is on the same line (the common case).
    #[must_use]
    pub const fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            terminated: true,
        }
    }

    /// Number of characters covered.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the token covers no characters.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }
}
