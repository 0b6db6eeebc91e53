//! Line — an ordered sequence of characters ending in a newline.
//!
//! The invariant every operation preserves: a line is never empty, and its
//! last element is always a materialized newline character. An "empty"
//! line is exactly one newline. Display columns and character indices are
//! different coordinate systems; [`char_index`](Line::char_index) and
//! [`width_to`](Line::width_to) convert between them by accumulating
//! character widths left to right.

use crate::character::Character;

/// One buffer line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    buffer: Vec<Character>,
}

impl Line {
    /// A line holding only its terminal newline.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            buffer: vec![Character::newline()],
        }
    }

    /// Build a line from text content (no trailing newline expected; one is
    /// appended).
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        let mut buffer: Vec<Character> = s.chars().map(Character::new).collect();
        buffer.push(Character::newline());
        Self { buffer }
    }

    /// Element count, including the terminal newline.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.buffer.len()
    }

    /// Sum of all character widths, including the newline's single cell.
    #[must_use]
    pub fn width(&self) -> usize {
        self.buffer.iter().map(Character::width).sum()
    }

    /// Display column of the terminal newline — the rightmost position a
    /// cursor can occupy.
    #[must_use]
    pub fn right_edge(&self) -> usize {
        self.width_to(self.length() - 1)
    }

    /// The character index covering display column `x`, with the viewport
    /// shifted left by `offset` columns.
    ///
    /// Callers must pass a column inside the line (`x < width() - offset`);
    /// anything else is a cursor-bookkeeping bug.
    #[must_use]
    pub fn char_index(&self, x: usize, offset: usize) -> usize {
        let mut acc = -(offset as isize);
        for (i, c) in self.buffer.iter().enumerate() {
            acc += c.width() as isize;
            if acc >= x as isize + 1 {
                return i;
            }
        }
        unreachable!("display column {x} is beyond the line width");
    }

    /// Total width of the first `idx` characters — the display column where
    /// character `idx` starts.
    #[must_use]
    pub fn width_to(&self, idx: usize) -> usize {
        self.buffer[..idx].iter().map(Character::width).sum()
    }

    /// The character at `at`.
    #[inline]
    #[must_use]
    pub fn get(&self, at: usize) -> Character {
        self.buffer[at]
    }

    /// All characters, trailing newline included.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &[Character] {
        &self.buffer
    }

    /// Insert characters starting at index `at`.
    pub fn insert_chars(&mut self, at: usize, chars: &[Character]) {
        for (i, &ch) in chars.iter().enumerate() {
            self.buffer.insert(at + i, ch);
        }
    }

    /// Delete the character at `at`.
    pub fn delete_char(&mut self, at: usize) {
        self.buffer.remove(at);
    }

    /// Drop the terminal newline. Only valid as the first step of a join,
    /// which restores the invariant by appending another line.
    pub fn delete_newline(&mut self) {
        self.buffer.pop();
    }

    /// Overwrite the character at `at`.
    pub fn replace_char(&mut self, at: usize, ch: Character) {
        self.buffer[at] = ch;
    }

    /// Reset to a single newline.
    pub fn clear(&mut self) {
        self.buffer = vec![Character::newline()];
    }

    /// Split at character index `at`: this line keeps `[0, at)` plus a
    /// newline, the returned line gets the rest of the content plus a
    /// newline.
    #[must_use]
    pub fn split_off(&mut self, at: usize) -> Self {
        let mut rest: Vec<Character> = self.buffer[at..self.buffer.len() - 1].to_vec();
        rest.push(Character::newline());
        self.buffer.truncate(at);
        self.buffer.push(Character::newline());
        Self { buffer: rest }
    }

    /// Append another line's characters, replacing this line's newline with
    /// the other line's content. The result ends with the other line's
    /// newline.
    pub fn extend(&mut self, other: &Self) {
        self.delete_newline();
        self.buffer.extend_from_slice(&other.buffer);
    }

    /// True when the line is just its terminal newline.
    #[must_use]
    pub fn is_empty_line(&self) -> bool {
        self.length() == 1 && self.buffer[0].is_newline()
    }

    /// Display column of the first non-space character (the line tail if
    /// the whole line is blank).
    #[must_use]
    pub fn first_non_space_width(&self) -> usize {
        let mut x = 0;
        for c in &self.buffer {
            if !c.is_space() {
                break;
            }
            x += c.width();
        }
        x
    }

    /// The content runes (tabs as `'\t'`), terminal newline excluded. This
    /// is the tokenizer's input.
    #[must_use]
    pub fn content_chars(&self) -> Vec<char> {
        self.buffer[..self.buffer.len() - 1]
            .iter()
            .map(Character::code)
            .collect()
    }

    /// The content as a string, terminal newline excluded.
    #[must_use]
    pub fn text(&self) -> String {
        self.content_chars().into_iter().collect()
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
