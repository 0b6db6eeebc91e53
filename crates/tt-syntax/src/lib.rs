//! tt-syntax — incremental syntax highlighting for turtle.
//!
//! A configurable single-pass tokenizer drives everything. One
//! [`LanguageSpec`](language::LanguageSpec) table per supported language
//! describes comments, string delimiters, keywords, and operators; the
//! [`Tokenizer`](tokenizer::Tokenizer) walks a single line and reports the
//! cross-line state (inside a block comment, inside a multi-line string) it
//! leaves behind. That carry state is what makes highlighting incremental:
//! after an edit, only the lines whose incoming state could have changed are
//! re-tokenized.
//!
//! The [`Highlighter`](highlight::Highlighter) trait maps tokens to theme
//! colors; the no-op implementation backs files with no recognized
//! extension.

pub mod highlight;
pub mod language;
pub mod theme;
pub mod token;
pub mod tokenizer;

pub use highlight::{highlighter_for, Highlighter, LineAttribute, NoopHighlighter, TokenHighlighter};
pub use theme::Theme;
pub use tokenizer::{Carry, CarryFlags, Tokenizer};
