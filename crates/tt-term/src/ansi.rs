// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — callers own that. All cursor positions
// are 0-indexed in our API and converted to 1-indexed for the terminal.
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a
// Vec).

use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: usize, y: usize) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Colors and attributes ──────────────────────────────────────────────────

/// Set the foreground to a 256-color palette index.
#[inline]
pub fn fg(w: &mut impl Write, color: u8) -> io::Result<()> {
    write!(w, "\x1b[38;5;{color}m")
}

/// Enable reverse video (SGR 7).
#[inline]
pub fn reverse_on(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[7m")
}

/// Disable reverse video (SGR 27).
#[inline]
pub fn reverse_off(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[27m")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn cursor_to_is_one_indexed() {
        assert_eq!(capture(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(capture(|w| cursor_to(w, 7, 2)), "\x1b[3;8H");
    }

    #[test]
    fn fg_uses_256_color_format() {
        assert_eq!(capture(|w| fg(w, 243)), "\x1b[38;5;243m");
    }

    #[test]
    fn reverse_pair() {
        assert_eq!(capture(reverse_on), "\x1b[7m");
        assert_eq!(capture(reverse_off), "\x1b[27m");
    }

    #[test]
    fn screen_sequences() {
        assert_eq!(capture(clear_screen), "\x1b[2J");
        assert_eq!(capture(cursor_hide), "\x1b[?25l");
        assert_eq!(capture(cursor_show), "\x1b[?25h");
        assert_eq!(capture(reset), "\x1b[0m");
    }
}
