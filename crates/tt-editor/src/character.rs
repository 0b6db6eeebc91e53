//! Character — one displayable unit.
//!
//! Tabs and newlines are materialized as real characters with fixed
//! display behavior: a tab always shows as four spaces, a newline as a
//! single space at the end of its line. Everything else is a Unicode
//! scalar whose display width comes from the East-Asian width tables
//! (ambiguous code points count as wide, matching CJK terminals).

use unicode_width::UnicodeWidthChar;

/// A single character with its display width.
///
/// Immutable value type; build one with [`new`](Self::new) and copy it
/// around freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    code: char,
    width: usize,
    tab: bool,
    nl: bool,
}

impl Character {
    /// Build a character from a rune, classifying tabs and newlines.
    #[must_use]
    pub fn new(code: char) -> Self {
        if code == '\t' {
            // A raw tab changes size depending on its column; rendering it
            // as four spaces keeps cursor arithmetic simple.
            return Self { code, width: 4, tab: true, nl: false };
        }

        if code == '\n' {
            // Rendered as a single space cell at the line tail.
            return Self { code, width: 1, tab: false, nl: true };
        }

        let width = code.width_cjk().unwrap_or(1).max(1);
        Self { code, width, tab: false, nl: false }
    }

    /// The materialized newline that terminates every line.
    #[must_use]
    pub fn newline() -> Self {
        Self::new('\n')
    }

    /// The underlying rune (`'\t'` for tabs, `'\n'` for newlines).
    #[inline]
    #[must_use]
    pub const fn code(&self) -> char {
        self.code
    }

    /// Display width in cells: 4 for tabs, 2 for wide runes, otherwise 1.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn is_tab(&self) -> bool {
        self.tab
    }

    #[inline]
    #[must_use]
    pub const fn is_newline(&self) -> bool {
        self.nl
    }

    /// True for spaces and tabs (used by first-non-space motions).
    #[inline]
    #[must_use]
    pub const fn is_space(&self) -> bool {
        self.code == ' ' || self.tab
    }

    /// Append this character's display form to `out`.
    pub fn push_display(&self, out: &mut String) {
        if self.tab {
            out.push_str("    ");
        } else if self.nl {
            out.push(' ');
        } else {
            out.push(self.code);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_narrow() {
        let c = Character::new('a');
        assert_eq!(c.width(), 1);
        assert!(!c.is_tab());
        assert!(!c.is_newline());
    }

    #[test]
    fn tab_is_four_cells() {
        let c = Character::new('\t');
        assert!(c.is_tab());
        assert_eq!(c.width(), 4);
        let mut s = String::new();
        c.push_display(&mut s);
        assert_eq!(s, "    ");
    }

    #[test]
    fn newline_is_one_space_cell() {
        let c = Character::newline();
        assert!(c.is_newline());
        assert_eq!(c.width(), 1);
        let mut s = String::new();
        c.push_display(&mut s);
        assert_eq!(s, " ");
    }

    #[test]
    fn cjk_is_wide() {
        assert_eq!(Character::new('あ').width(), 2);
        assert_eq!(Character::new('漢').width(), 2);
        assert_eq!(Character::new('ー').width(), 2);
    }

    #[test]
    fn ambiguous_counts_as_wide() {
        // East-Asian ambiguous code points render wide on CJK terminals.
        assert_eq!(Character::new('§').width(), 2);
        assert_eq!(Character::new('α').width(), 2);
    }

    #[test]
    fn is_space() {
        assert!(Character::new(' ').is_space());
        assert!(Character::new('\t').is_space());
        assert!(!Character::new('x').is_space());
        assert!(!Character::newline().is_space());
    }

    #[test]
    fn equality_by_identity() {
        assert_eq!(Character::new('a'), Character::new('a'));
        assert_ne!(Character::new('a'), Character::new('b'));
        assert_eq!(Character::new('\t'), Character::new('\t'));
        assert_eq!(Character::newline(), Character::new('\n'));
    }
}
