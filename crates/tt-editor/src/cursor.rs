//! Cursor — a desired display column, a line index, and the column the
//! renderer last placed it at.
//!
//! `x` is the column the user wants; vertical movement through short lines
//! does not shrink it, so the cursor snaps back out on a long line.
//! `actualx` is the absolute on-screen column from the last paint, used to
//! recover the character index under the cursor on the next keystroke.
//!
//! The cursor set of a screen is never empty, and the *main* cursor — the
//! one that drives scrolling — is the last element. After every handler
//! the set is sorted by `(y, x)` and de-duplicated, so converging edits
//! merge cursors instead of stacking them.

/// One cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Desired display column. May exceed the current line's width.
    pub x: usize,
    /// Line index.
    pub y: usize,
    /// Absolute screen column from the last render.
    pub actualx: usize,
}

impl Cursor {
    /// A cursor at the buffer origin.
    #[must_use]
    pub const fn new() -> Self {
        Self { x: 0, y: 0, actualx: 0 }
    }

    /// A cursor at a specific buffer position.
    #[must_use]
    pub const fn at(x: usize, y: usize) -> Self {
        Self { x, y, actualx: 0 }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Restore the cursor-set invariant: sorted by `(y, x)`, no duplicates.
pub fn cleanup(cursors: &mut Vec<Cursor>) {
    cursors.sort_by_key(|c| (c.y, c.x));
    cursors.dedup_by_key(|c| (c.y, c.x));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
