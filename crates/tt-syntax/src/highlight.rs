//! Highlighters — from tokens to per-character colors.
//!
//! A highlighter consumes one line of content plus the carry state left by
//! the previous line, and produces a [`LineAttribute`]: one color slot per
//! character plus the carry state for the next line. The screen stores one
//! attribute per buffer line and re-runs the highlighter only over the
//! region an edit could have changed.

use crate::language::{LanguageSpec, GO, PYTHON};
use crate::theme::Theme;
use crate::token::TokenKind;
use crate::tokenizer::{Carry, Tokenizer};

pub use crate::tokenizer::CarryFlags;

// ---------------------------------------------------------------------------
// LineAttribute
// ---------------------------------------------------------------------------

/// Highlight state of one buffer line.
///
/// `colors` is parallel to the line's content characters; `colors[i]` is
/// the 256-color index of character `i`, or `None` for the default
/// foreground. The slot for the terminal newline is always `None`. The
/// no-op highlighter leaves `colors` empty, which renders the same as
/// all-`None`.
///
/// `carry` is the tokenizer state this line leaves for its successor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineAttribute {
    pub colors: Vec<Option<u8>>,
    pub carry: Carry,
}

impl LineAttribute {
    /// Color of character `idx`, tolerating the no-op highlighter's empty
    /// color array.
    #[inline]
    #[must_use]
    pub fn color_at(&self, idx: usize) -> Option<u8> {
        self.colors.get(idx).copied().flatten()
    }
}

// ---------------------------------------------------------------------------
// Highlighter
// ---------------------------------------------------------------------------

/// The single capability a screen needs from its syntax engine.
pub trait Highlighter {
    /// Compute colors and outgoing carry for one line of content
    /// (terminal newline excluded).
    fn highlight_line(&self, chars: &[char], prev: &Carry) -> LineAttribute;
}

/// Token-driven highlighter: tokenize, then paint each token's range with
/// the theme color for its kind.
pub struct TokenHighlighter {
    tokenizer: Tokenizer,
    theme: Theme,
}

impl TokenHighlighter {
    #[must_use]
    pub const fn new(spec: &'static LanguageSpec, theme: Theme) -> Self {
        Self {
            tokenizer: Tokenizer::new(spec),
            theme,
        }
    }
}

impl Highlighter for TokenHighlighter {
    fn highlight_line(&self, chars: &[char], prev: &Carry) -> LineAttribute {
        let (tokens, carry) = self.tokenizer.tokenize(chars, prev);

        // One slot per content character plus the newline cell, which
        // stays uncolored.
        let mut colors = vec![None; chars.len() + 1];
        for token in &tokens {
            if token.kind == TokenKind::Newline {
                continue;
            }
            if let Some(color) = self.theme.token_color(token.kind) {
                for slot in &mut colors[token.start..token.end.min(chars.len())] {
                    *slot = Some(color);
                }
            }
        }

        LineAttribute { colors, carry }
    }
}

/// Highlighter for files with no recognized extension: no colors, no carry.
pub struct NoopHighlighter;

impl Highlighter for NoopHighlighter {
    fn highlight_line(&self, _chars: &[char], _prev: &Carry) -> LineAttribute {
        LineAttribute::default()
    }
}

/// Pick a highlighter from a file name's extension.
///
/// `.go` / `.go_` get the Go tables, `.py` / `.pyi` the Python tables,
/// everything else the no-op highlighter.
#[must_use]
pub fn highlighter_for(filename: &str, theme: Theme) -> Box<dyn Highlighter> {
    let lang: Option<&'static LanguageSpec> = if filename.ends_with(".go") || filename.ends_with(".go_") {
        Some(&GO)
    } else if filename.ends_with(".py") || filename.ends_with(".pyi") {
        Some(&PYTHON)
    } else {
        None
    };

    match lang {
        Some(spec) => Box::new(TokenHighlighter::new(spec, theme)),
        None => Box::new(NoopHighlighter),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
