// SPDX-License-Identifier: MIT
//
// Key identities.
//
// The decoded form of one keypress. Printable characters use `Char`;
// control bytes 0x01..=0x1A map to `Ctrl('a'..='z')` except CR and TAB,
// which are their own keys. Escape sequences the reader cannot classify
// become `Unknown`, which dispatchers ignore.

use std::fmt;

/// A single decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable Unicode character.
    Char(char),
    /// Ctrl plus a letter, `Ctrl('a')` through `Ctrl('z')`.
    Ctrl(char),
    Enter,
    Tab,
    Backspace,
    Esc,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Insert,
    Delete,
    PageUp,
    PageDown,
    /// An escape sequence we could not classify.
    Unknown,
}

impl Key {
    /// The decimal value of this key when it is an ASCII digit.
    #[must_use]
    pub const fn digit(self) -> Option<usize> {
        match self {
            Self::Char(c @ '0'..='9') => Some(c as usize - '0' as usize),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::Ctrl(c) => write!(f, "Ctrl+{c}"),
            Self::Enter => f.write_str("CR"),
            Self::Tab => f.write_str("TAB"),
            Self::Backspace => f.write_str("BackSpace"),
            Self::Esc => f.write_str("ESC"),
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
            Self::Home => f.write_str("Home"),
            Self::End => f.write_str("End"),
            Self::Insert => f.write_str("Insert"),
            Self::Delete => f.write_str("Delete"),
            Self::PageUp => f.write_str("PageUp"),
            Self::PageDown => f.write_str("PageDown"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
