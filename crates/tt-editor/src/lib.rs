//! tt-editor — the text model and editing core of turtle.
//!
//! The model is deliberately simple: a buffer is a vector of [`Line`]s,
//! a line is a vector of [`Character`]s, and the last character of every
//! line is always a materialized newline. All cursor arithmetic is
//! display-width aware, so wide characters and tabs (rendered as four
//! spaces) behave correctly without a separate layout pass.
//!
//! A [`Screen`] is one buffer view: lines, attributes, a non-empty cursor
//! set, a viewport, and the dirty-line bookkeeping that keeps terminal
//! writes minimal. Screens live in the leaves of a [`Window`] tree that
//! splits the terminal recursively.
//!
//! [`Line`]: line::Line
//! [`Character`]: character::Character
//! [`Screen`]: screen::Screen
//! [`Window`]: window::Window

pub mod character;
pub mod cursor;
pub mod line;
pub mod mode;
pub mod screen;
pub mod window;

pub use character::Character;
pub use cursor::Cursor;
pub use line::Line;
pub use mode::Mode;
pub use screen::Screen;
pub use window::{SplitDir, Window};

/// Movement and window-navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}
