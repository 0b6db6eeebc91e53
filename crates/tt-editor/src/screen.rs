//! Screen — one buffer view.
//!
//! A screen owns the lines of one open file, the per-line highlight
//! attributes, a non-empty cursor set, and the viewport into the text. It
//! is also where keystroke semantics live: the editor routes keys here and
//! the screen mutates lines and cursors, recording which lines need to be
//! redrawn.
//!
//! # Dirty model
//!
//! Two line sets accumulate between renders: `lines_to_render` (content
//! changed) and `hl_updated` (highlighting recomputed). A render touches
//! only the visible rows in their union unless the viewport scrolled, in
//! which case everything is redrawn. Both sets are cleared afterwards.
//!
//! # Incremental highlighting
//!
//! Before painting, the screen re-tokenizes from the smallest dirty line
//! downward. Each line stores the carry state it leaves behind; the rescan
//! stops at the first line past the dirty set whose recomputed carry flags
//! match the stored ones, because nothing below it can have changed.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};

use log::debug;

use tt_syntax::theme::LINE_NUMBER_COLOR;
use tt_syntax::{Carry, Highlighter, LineAttribute};
use tt_term::ansi;
use tt_term::key::Key;
use tt_term::output::OutputBuffer;
use tt_term::reader::KeyReader;

use crate::character::Character;
use crate::cursor::{self, Cursor};
use crate::line::Line;
use crate::mode::Mode;
use crate::Direction;

/// Horizontal scroll padding in cells.
const XPAD: usize = 4;
/// Vertical scroll padding in rows.
const YPAD: usize = 4;

/// One buffer view: lines, cursors, viewport, and dirty bookkeeping.
pub struct Screen {
    lines: Vec<Line>,
    attrs: Vec<LineAttribute>,
    cursors: Vec<Cursor>,
    hl: Box<dyn Highlighter>,
    file: File,
    name: String,

    // Placement on the terminal.
    termx: usize,
    termy: usize,
    width: usize,
    height: usize,

    linenumber_width: usize,
    xoffset: usize,
    yoffset: usize,

    yanked: Option<Character>,
    scrolled: bool,
    lines_to_render: Vec<usize>,
    hl_updated: Vec<usize>,
    dirty: bool,
}

impl Screen {
    /// Read `file` into a new screen at the given terminal rectangle.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn new(
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        mut file: File,
        name: String,
        hl: Box<dyn Highlighter>,
    ) -> io::Result<Self> {
        let mut lines = Vec::new();
        for l in BufReader::new(&mut file).lines() {
            lines.push(Line::from_str(&l?));
        }
        if lines.is_empty() {
            lines.push(Line::empty());
        }

        let attrs = vec![LineAttribute::default(); lines.len()];
        let lines_to_render: Vec<usize> = (0..lines.len()).collect();

        let mut screen = Self {
            lines,
            attrs,
            cursors: vec![Cursor::new()],
            hl,
            file,
            name,
            termx: x,
            termy: y,
            width,
            height,
            linenumber_width: 4,
            xoffset: 0,
            yoffset: 0,
            yanked: None,
            scrolled: false,
            lines_to_render,
            hl_updated: Vec::new(),
            dirty: false,
        };
        screen.update_linenumber_width();
        Ok(screen)
    }

    // -- Accessors ----------------------------------------------------------

    /// The file name shown on the status line.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when the buffer has unsaved changes.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.dirty
    }

    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    #[must_use]
    pub fn line(&self, y: usize) -> &Line {
        &self.lines[y]
    }

    /// The cursor set, sorted by `(y, x)`. The last element is the main
    /// cursor.
    #[inline]
    #[must_use]
    pub fn cursors(&self) -> &[Cursor] {
        &self.cursors
    }

    fn main_cursor(&self) -> Cursor {
        self.cursors[self.cursors.len() - 1]
    }

    /// Move this screen to a new terminal rectangle (window resize).
    pub fn set_placement(&mut self, x: usize, y: usize, width: usize, height: usize) {
        self.termx = x;
        self.termy = y;
        self.width = width;
        self.height = height;
    }

    /// Absolute terminal position of the main cursor after the last render.
    #[must_use]
    pub fn actual_cursor(&self) -> (usize, usize) {
        let main = self.main_cursor();
        (
            self.termx + main.actualx,
            self.termy + main.y.saturating_sub(self.yoffset),
        )
    }

    // -- Coordinate helpers -------------------------------------------------

    /// Character index under a cursor, clamping its desired column to the
    /// line width first. This makes behavior well-defined on wide
    /// characters and on cursors whose desired column overshoots the line.
    fn xidx_at(&self, c: Cursor) -> usize {
        let line = &self.lines[c.y];
        line.char_index(c.x.min(line.width() - 1), 0)
    }

    /// Snap cursor `i`'s column to the head of the character under it.
    fn align_x(&mut self, i: usize) {
        let c = self.cursors[i];
        let idx = self.xidx_at(c);
        self.cursors[i].x = self.lines[c.y].width_to(idx);
    }

    fn inner_width(&self) -> usize {
        self.width
            .saturating_sub(self.linenumber_width + 1)
            .max(1)
    }

    fn update_linenumber_width(&mut self) {
        self.linenumber_width = if self.lines.len() < 10_000 {
            4
        } else {
            digits(self.lines.len())
        };
    }

    // -- Dirty bookkeeping --------------------------------------------------

    fn mark_line(&mut self, y: usize) {
        self.lines_to_render.push(y);
    }

    /// Mark `from` and everything below it, including rows freed by a
    /// deletion (`old_len` is the line count before the edit).
    fn mark_from(&mut self, from: usize, old_len: usize) {
        let to = old_len.max(self.lines.len());
        for y in from..to {
            self.lines_to_render.push(y);
        }
    }

    // -- Key handling -------------------------------------------------------

    /// Process one keystroke in the given mode.
    ///
    /// A leading decimal count in normal mode is consumed here by reading
    /// ahead; a count of zero is coerced to one. Returns the mode the
    /// editor should switch to, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if reading a follow-up key fails.
    pub fn handle<R: Read>(
        &mut self,
        mode: Mode,
        key: Key,
        keys: &mut KeyReader<R>,
    ) -> io::Result<Option<Mode>> {
        let mut key = key;
        let mut count: Option<usize> = None;

        if mode == Mode::Normal {
            if let Some(d) = key.digit() {
                let mut n = d;
                loop {
                    let next = keys.read_key()?;
                    match next.digit() {
                        Some(d2) => n = n * 10 + d2,
                        None => {
                            key = next;
                            break;
                        }
                    }
                }
                count = Some(n.max(1));
            }
        }

        let n = count.unwrap_or(1);

        let next_mode = match mode {
            Mode::Normal => self.handle_normal(key, n, count.is_some(), keys)?,
            Mode::Insert => self.handle_insert(key),
            // Command-mode keys never reach a screen.
            Mode::Command => None,
        };

        cursor::cleanup(&mut self.cursors);
        Ok(next_mode)
    }

    fn handle_normal<R: Read>(
        &mut self,
        key: Key,
        n: usize,
        has_count: bool,
        keys: &mut KeyReader<R>,
    ) -> io::Result<Option<Mode>> {
        match key {
            Key::Char('h') | Key::Left => self.move_cursors(Direction::Left, n),
            Key::Char('j') | Key::Down => self.move_cursors(Direction::Down, n),
            Key::Char('k') | Key::Up => self.move_cursors(Direction::Up, n),
            Key::Char('l') | Key::Right => self.move_cursors(Direction::Right, n),

            Key::Ctrl('u') => self.scroll_half(Direction::Up),
            Key::Ctrl('d') => self.scroll_half(Direction::Down),

            Key::Char('d') => self.delete_current_chars(),

            Key::Char('o') => {
                self.insert_line_below_cursors();
                return Ok(Some(Mode::Insert));
            }
            Key::Char('O') => {
                self.insert_line_above_cursors();
                return Ok(Some(Mode::Insert));
            }

            Key::Char('G') => {
                if has_count {
                    self.goto_line(n);
                } else {
                    self.goto_line(self.lines.len());
                }
            }

            Key::Char('g') => match keys.read_key()? {
                Key::Char('g') => self.goto_top_left(),
                Key::Char('e') => self.goto_bottom_left(),
                Key::Char('l') => self.goto_line_tail(),
                Key::Char('s') => self.goto_first_non_space(),
                Key::Char('h') => self.goto_line_head(),
                _ => {}
            },

            Key::Char('f') => {
                if let Key::Char(c) = keys.read_key()? {
                    self.move_to_next_char(Character::new(c));
                }
            }
            Key::Char('F') => {
                if let Key::Char(c) = keys.read_key()? {
                    self.move_to_prev_char(Character::new(c));
                }
            }

            Key::Char('r') => {
                if let Key::Char(c) = keys.read_key()? {
                    self.replace_chars(Character::new(c));
                }
            }

            Key::Char('y') => self.yank_char(),
            Key::Char('p') => self.paste_char(),

            Key::Char('C') => self.add_cursor_below(),
            Key::Char(',') => self.collapse_cursors(),

            _ => {}
        }

        Ok(None)
    }

    fn handle_insert(&mut self, key: Key) -> Option<Mode> {
        match key {
            Key::Esc => return Some(Mode::Normal),

            Key::Left => self.move_cursors(Direction::Left, 1),
            Key::Down => self.move_cursors(Direction::Down, 1),
            Key::Up => self.move_cursors(Direction::Up, 1),
            Key::Right => self.move_cursors(Direction::Right, 1),

            Key::Enter => self.split_lines_at_cursors(),
            Key::Backspace => self.delete_prev_chars(),
            Key::Tab => self.insert_chars(&[Character::new('\t')]),
            Key::Char(c) => self.insert_chars(&[Character::new(c)]),

            _ => {}
        }
        None
    }

    // -- Movement -----------------------------------------------------------

    /// Move every cursor by `n` rows or character cells.
    pub fn move_cursors(&mut self, dir: Direction, n: usize) {
        for i in 0..self.cursors.len() {
            let mut c = self.cursors[i];
            match dir {
                Direction::Up => c.y = c.y.saturating_sub(n),
                Direction::Down => c.y = (c.y + n).min(self.lines.len() - 1),
                Direction::Left => {
                    let idx = self.xidx_at(c).saturating_sub(n);
                    c.x = self.lines[c.y].width_to(idx);
                }
                Direction::Right => {
                    let line = &self.lines[c.y];
                    let idx = (self.xidx_at(c) + n).min(line.length() - 1);
                    c.x = line.width_to(idx);
                }
            }
            self.cursors[i] = c;
        }
    }

    /// Shift the viewport and every cursor by half a screen.
    pub fn scroll_half(&mut self, dir: Direction) {
        let mv = (self.height - 1) / 2;
        match dir {
            Direction::Up => {
                for c in &mut self.cursors {
                    c.y = c.y.saturating_sub(mv);
                }
                self.yoffset = self.yoffset.saturating_sub(mv);
            }
            Direction::Down => {
                let last = self.lines.len() - 1;
                for c in &mut self.cursors {
                    c.y = (c.y + mv).min(last);
                }
                self.yoffset = (self.yoffset + mv).min(last);
            }
            Direction::Left | Direction::Right => {}
        }
        self.scrolled = true;
    }

    pub fn goto_top_left(&mut self) {
        for c in &mut self.cursors {
            c.x = 0;
            c.y = 0;
        }
    }

    pub fn goto_bottom_left(&mut self) {
        let last = self.lines.len() - 1;
        for c in &mut self.cursors {
            c.x = 0;
            c.y = last;
        }
    }

    pub fn goto_line_tail(&mut self) {
        for i in 0..self.cursors.len() {
            let y = self.cursors[i].y;
            self.cursors[i].x = self.lines[y].width() - 1;
        }
    }

    pub fn goto_first_non_space(&mut self) {
        for i in 0..self.cursors.len() {
            let y = self.cursors[i].y;
            self.cursors[i].x = self.lines[y].first_non_space_width();
        }
    }

    pub fn goto_line_head(&mut self) {
        for c in &mut self.cursors {
            c.x = 0;
        }
    }

    /// Go to a 1-based line number, clamped to the buffer.
    pub fn goto_line(&mut self, line: usize) {
        let y = line.clamp(1, self.lines.len()) - 1;
        for c in &mut self.cursors {
            c.y = y;
        }
    }

    /// `f<c>` — move each cursor to the next occurrence of `target` on its
    /// line. Cursors with no match stay put.
    pub fn move_to_next_char(&mut self, target: Character) {
        for i in 0..self.cursors.len() {
            let c = self.cursors[i];
            let line = &self.lines[c.y];
            for j in self.xidx_at(c) + 1..line.length() {
                if line.get(j) == target {
                    self.cursors[i].x = line.width_to(j);
                    break;
                }
            }
        }
    }

    /// `F<c>` — move each cursor to the previous occurrence of `target`.
    pub fn move_to_prev_char(&mut self, target: Character) {
        for i in 0..self.cursors.len() {
            let c = self.cursors[i];
            let line = &self.lines[c.y];
            for j in (0..self.xidx_at(c)).rev() {
                if line.get(j) == target {
                    self.cursors[i].x = line.width_to(j);
                    break;
                }
            }
        }
    }

    // -- Editing ------------------------------------------------------------

    /// `o` — open a line below each cursor and land on it.
    pub fn insert_line_below_cursors(&mut self) {
        for i in 0..self.cursors.len() {
            let y = self.cursors[i].y;
            self.lines.insert(y + 1, Line::empty());
            self.attrs.insert(y + 1, LineAttribute::default());
            self.cursors[i].y = y + 1;
            self.cursors[i].x = 0;
            for j in i + 1..self.cursors.len() {
                self.cursors[j].y += 1;
            }
            let len = self.lines.len();
            self.mark_from(y, len);
        }
        self.dirty = true;
        self.update_linenumber_width();
    }

    /// `O` — open a line above each cursor and land on it.
    pub fn insert_line_above_cursors(&mut self) {
        for i in 0..self.cursors.len() {
            let y = self.cursors[i].y;
            self.lines.insert(y, Line::empty());
            self.attrs.insert(y, LineAttribute::default());
            self.cursors[i].x = 0;
            for j in i + 1..self.cursors.len() {
                self.cursors[j].y += 1;
            }
            let len = self.lines.len();
            self.mark_from(y, len);
        }
        self.dirty = true;
        self.update_linenumber_width();
    }

    /// `d` — delete the character under each cursor. At a trailing newline
    /// this joins the next line up instead.
    pub fn delete_current_chars(&mut self) {
        for i in 0..self.cursors.len() {
            let c = self.cursors[i];
            let idx = self.xidx_at(c);
            if idx == self.lines[c.y].length() - 1 {
                if c.y + 1 < self.lines.len() {
                    self.join_lines(c.y, c.y + 1);
                    for j in i + 1..self.cursors.len() {
                        self.cursors[j].y = self.cursors[j].y.saturating_sub(1);
                    }
                }
            } else {
                self.lines[c.y].delete_char(idx);
                self.mark_line(c.y);
                self.dirty = true;
                self.align_x(i);
            }
        }
    }

    /// Backspace — delete before each cursor, joining with the previous
    /// line at a line head.
    pub fn delete_prev_chars(&mut self) {
        for i in 0..self.cursors.len() {
            let c = self.cursors[i];
            let idx = self.xidx_at(c);
            if idx == 0 {
                if c.y > 0 {
                    // The cursor lands on the previous line's old right edge.
                    let nextx = self.lines[c.y - 1].right_edge();
                    self.join_lines(c.y - 1, c.y);
                    self.cursors[i].y -= 1;
                    self.cursors[i].x = nextx;
                    for j in i + 1..self.cursors.len() {
                        self.cursors[j].y = self.cursors[j].y.saturating_sub(1);
                    }
                }
            } else {
                // Move left first so the cursor never points past the edit.
                self.cursors[i].x = self.lines[c.y].width_to(idx - 1);
                self.lines[c.y].delete_char(idx - 1);
                self.mark_line(c.y);
                self.dirty = true;
            }
        }
    }

    /// `r<c>` — overwrite the character under each cursor.
    pub fn replace_chars(&mut self, ch: Character) {
        for i in 0..self.cursors.len() {
            let c = self.cursors[i];
            let idx = self.xidx_at(c);
            self.lines[c.y].replace_char(idx, ch);
            self.mark_line(c.y);
            self.dirty = true;
        }
    }

    /// Insert a character sequence at every cursor and advance each past
    /// the insertion.
    pub fn insert_chars(&mut self, chars: &[Character]) {
        for i in 0..self.cursors.len() {
            self.align_x(i);
            let c = self.cursors[i];
            let idx = self.xidx_at(c);
            self.lines[c.y].insert_chars(idx, chars);
            self.cursors[i].x = self.lines[c.y].width_to(idx + chars.len());
            self.mark_line(c.y);
            self.dirty = true;
        }
    }

    /// Enter in insert mode — split the line at every cursor; each cursor
    /// lands at column 0 of its new line.
    pub fn split_lines_at_cursors(&mut self) {
        for i in 0..self.cursors.len() {
            let c = self.cursors[i];
            let idx = self.xidx_at(c);
            let rest = self.lines[c.y].split_off(idx);
            self.lines.insert(c.y + 1, rest);
            self.attrs.insert(c.y + 1, LineAttribute::default());
            self.cursors[i].y = c.y + 1;
            self.cursors[i].x = 0;
            for j in i + 1..self.cursors.len() {
                self.cursors[j].y += 1;
            }
            let len = self.lines.len();
            self.mark_from(c.y, len);
            self.dirty = true;
        }
        self.update_linenumber_width();
    }

    /// `y` — remember the character under the main cursor.
    pub fn yank_char(&mut self) {
        let main = self.main_cursor();
        self.yanked = Some(self.lines[main.y].get(self.xidx_at(main)));
    }

    /// `p` — insert the yanked character at every cursor.
    pub fn paste_char(&mut self) {
        if let Some(ch) = self.yanked {
            self.insert_chars(&[ch]);
        }
    }

    /// `C` — add a cursor below the main one, at the first line wide
    /// enough to hold its column. No-op when no such line exists.
    pub fn add_cursor_below(&mut self) {
        let main = self.main_cursor();
        for y in main.y + 1..self.lines.len() {
            if main.x < self.lines[y].width() {
                self.cursors.push(Cursor {
                    x: main.x,
                    y,
                    actualx: main.actualx,
                });
                break;
            }
        }
    }

    /// `,` — collapse to the main cursor.
    pub fn collapse_cursors(&mut self) {
        let main = self.main_cursor();
        self.cursors = vec![main];
    }

    /// Append lines `from+1..=to` into line `from` and delete them. Both
    /// bounds are inclusive.
    pub fn join_lines(&mut self, from: usize, to: usize) {
        let old_len = self.lines.len();
        let tail: Vec<Line> = self.lines.drain(from + 1..=to).collect();
        self.attrs.drain(from + 1..=to);
        for l in &tail {
            self.lines[from].extend(l);
        }
        self.mark_from(from, old_len);
        self.dirty = true;
        self.update_linenumber_width();
        debug!("joined lines {from}..={to} in '{}'", self.name);
    }

    // -- Persistence --------------------------------------------------------

    /// The buffer serialized for disk: tabs as `\t`, newlines as `\n`,
    /// everything else as UTF-8.
    #[must_use]
    pub fn content(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut tmp = [0u8; 4];
        for line in &self.lines {
            for ch in line.chars() {
                if ch.is_tab() {
                    buf.push(b'\t');
                } else if ch.is_newline() {
                    buf.push(b'\n');
                } else {
                    buf.extend_from_slice(ch.code().encode_utf8(&mut tmp).as_bytes());
                }
            }
        }
        buf
    }

    /// Truncate the file and write the whole buffer back.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&mut self) -> io::Result<()> {
        let content = self.content();
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&content)?;
        self.file.flush()?;
        self.dirty = false;
        debug!("saved '{}' ({} bytes)", self.name, content.len());
        Ok(())
    }

    // -- Highlighting -------------------------------------------------------

    /// Re-tokenize from the smallest dirty line downward, stopping once the
    /// carry state stabilizes past the dirty region.
    fn rehighlight(&mut self) {
        if self.lines_to_render.is_empty() {
            return;
        }
        let start = *self.lines_to_render.iter().min().unwrap_or(&0);
        let maxdirty = *self.lines_to_render.iter().max().unwrap_or(&0);
        if start >= self.lines.len() {
            return;
        }

        let mut carry = if start == 0 {
            Carry::none()
        } else {
            self.attrs[start - 1].carry.clone()
        };

        for y in start..self.lines.len() {
            let attr = self.hl.highlight_line(&self.lines[y].content_chars(), &carry);
            let stop = y > maxdirty && attr.carry.flags == self.attrs[y].carry.flags;
            carry = attr.carry.clone();
            self.attrs[y] = attr;
            self.hl_updated.push(y);
            if stop {
                break;
            }
        }
    }

    // -- Viewport -----------------------------------------------------------

    fn xscroll_needed(&self, x: usize, curw: usize) -> Option<Direction> {
        let inner = self.inner_width();

        // Too far left.
        if x < self.xoffset + XPAD {
            if x < XPAD && self.xoffset <= x {
                return None; // not enough line to honor the pad
            }
            return Some(Direction::Left);
        }

        // Too far right.
        if self.xoffset + inner - 1 < x + XPAD {
            if curw - 1 < x + XPAD && x <= self.xoffset + inner - 1 {
                return None;
            }
            return Some(Direction::Right);
        }

        None
    }

    fn yscroll_needed(&self, y: usize) -> Option<Direction> {
        let ypad = YPAD as isize;
        let padup = y as isize - self.yoffset as isize;
        let paddown = self.yoffset as isize + self.height as isize - 2 - y as isize;

        if padup >= ypad && paddown >= ypad {
            return None;
        }

        if padup < ypad {
            // A cursor above the viewport (after a goto) always scrolls.
            if padup < 0 {
                return Some(Direction::Up);
            }
            if self.yoffset == 0 {
                return None;
            }
            return Some(Direction::Up);
        }

        if paddown < ypad {
            if paddown < 0 {
                return Some(Direction::Down);
            }
            if self.yoffset + self.height - 1 == self.lines.len() {
                return None;
            }
            return Some(Direction::Down);
        }

        None
    }

    // -- Rendering ----------------------------------------------------------

    /// Paint this screen into the frame buffer.
    ///
    /// `first` forces a full redraw (initial paint, window layout change).
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to the frame buffer fails.
    pub fn render(&mut self, out: &mut OutputBuffer, first: bool) -> io::Result<()> {
        self.rehighlight();

        let main = self.main_cursor();
        let curw = self.lines[main.y].width();
        // Clamp to the line tail for display without losing the desired
        // column for later vertical moves.
        let x = main.x.min(curw - 1);

        let mut scrolled = false;

        // The loops are bounded so a pathologically small window cannot
        // oscillate between the two pads forever.
        let mut guard = self.width + self.lines.len() + self.height;
        while let Some(dir) = self.xscroll_needed(x, curw) {
            match dir {
                Direction::Left => self.xoffset -= 1,
                Direction::Right => self.xoffset += 1,
                Direction::Up | Direction::Down => {}
            }
            scrolled = true;
            guard -= 1;
            if guard == 0 {
                break;
            }
        }

        let mut guard = self.lines.len() + self.height;
        while let Some(dir) = self.yscroll_needed(main.y) {
            match dir {
                Direction::Up => self.yoffset -= 1,
                Direction::Down => self.yoffset += 1,
                Direction::Left | Direction::Right => {}
            }
            scrolled = true;
            guard -= 1;
            if guard == 0 {
                break;
            }
        }

        let text_rows = self.height - 1;

        if scrolled || self.scrolled || first {
            for row in 0..text_rows {
                self.clear_row(out, row)?;
                if self.yoffset + row < self.lines.len() {
                    self.draw_line(out, row, self.yoffset + row)?;
                }
            }
        } else {
            let mut dirty: Vec<usize> = self
                .lines_to_render
                .iter()
                .chain(self.hl_updated.iter())
                .copied()
                .collect();
            dirty.sort_unstable();
            dirty.dedup();
            for y in dirty {
                // Skip lines outside the viewport.
                if y < self.yoffset || y > self.yoffset + text_rows - 1 {
                    continue;
                }
                let row = y - self.yoffset;
                self.clear_row(out, row)?;
                if y < self.lines.len() {
                    self.draw_line(out, row, y)?;
                }
            }
        }

        // The status line is always redrawn.
        self.clear_row(out, self.height - 1)?;
        let status: String = format!(" {}", self.name)
            .chars()
            .take(self.width)
            .collect();
        write!(out, "{status}")?;

        // Record rendered columns and park the hardware cursor on the main
        // cursor.
        for i in 0..self.cursors.len() {
            let c = self.cursors[i];
            let cx = c.x.min(self.lines[c.y].width() - 1);
            self.cursors[i].actualx =
                cx.saturating_sub(self.xoffset) + self.linenumber_width + 1;
        }
        let (ax, ay) = self.actual_cursor();
        ansi::cursor_to(out, ax, ay)?;

        self.lines_to_render.clear();
        self.hl_updated.clear();
        self.scrolled = false;
        Ok(())
    }

    fn clear_row(&self, out: &mut OutputBuffer, row: usize) -> io::Result<()> {
        ansi::cursor_to(out, self.termx, self.termy + row)?;
        write!(out, "{:w$}", "", w = self.width)?;
        ansi::cursor_to(out, self.termx, self.termy + row)
    }

    /// Draw the gutter and the visible slice of buffer line `y` at screen
    /// row `row`.
    fn draw_line(&self, out: &mut OutputBuffer, row: usize, y: usize) -> io::Result<()> {
        ansi::cursor_to(out, self.termx, self.termy + row)?;

        // Right-aligned line number in the gutter color, one space after.
        let number = y + 1;
        let pad = self.linenumber_width.saturating_sub(digits(number));
        write!(out, "{:p$}", "", p = pad)?;
        ansi::fg(out, LINE_NUMBER_COLOR)?;
        write!(out, "{number}")?;
        ansi::reset(out)?;
        write!(out, " ")?;

        let cells = self.project_line(y);
        let inner = self.inner_width();
        let end = (self.xoffset + inner).min(cells.len());
        let mut i = self.xoffset;
        while i < end {
            let cell = cells[i];
            if cell.continuation {
                // A wide character sliced in half at the left edge.
                emit_cell(out, ' ', cell.color, cell.cursor)?;
                i += 1;
                continue;
            }
            let wide = cells.get(i + 1).is_some_and(|c| c.continuation);
            if wide && i + 1 >= end {
                // A wide character sliced in half at the right edge.
                emit_cell(out, ' ', cell.color, cell.cursor)?;
                i += 1;
                continue;
            }
            emit_cell(out, cell.ch, cell.color, cell.cursor)?;
            i += if wide { 2 } else { 1 };
        }

        Ok(())
    }

    /// Expand line `y` into display cells: tabs to four spaces, the
    /// newline to one uncolored space, wide characters to a head cell plus
    /// a continuation cell. Cursor cells are flagged for reverse video.
    fn project_line(&self, y: usize) -> Vec<Cell> {
        let line = &self.lines[y];
        let attr = &self.attrs[y];
        let mut cells = Vec::with_capacity(line.width());

        for (idx, ch) in line.chars().iter().enumerate() {
            let cursor = self
                .cursors
                .iter()
                .any(|c| c.y == y && self.xidx_at(*c) == idx);
            let color = if ch.is_newline() {
                None
            } else {
                attr.color_at(idx)
            };

            if ch.is_tab() {
                for _ in 0..4 {
                    cells.push(Cell { ch: ' ', color, cursor, continuation: false });
                }
            } else if ch.is_newline() {
                cells.push(Cell { ch: ' ', color, cursor, continuation: false });
            } else {
                cells.push(Cell { ch: ch.code(), color, cursor, continuation: false });
                if ch.width() == 2 {
                    cells.push(Cell { ch: ' ', color, cursor, continuation: true });
                }
            }
        }

        cells
    }
}

/// One display cell of a projected line.
#[derive(Debug, Clone, Copy)]
struct Cell {
    ch: char,
    color: Option<u8>,
    cursor: bool,
    /// The second column of a wide character.
    continuation: bool,
}

fn emit_cell(
    out: &mut OutputBuffer,
    ch: char,
    color: Option<u8>,
    cursor: bool,
) -> io::Result<()> {
    if cursor {
        ansi::reverse_on(out)?;
    }
    if let Some(c) = color {
        ansi::fg(out, c)?;
    }
    write!(out, "{ch}")?;
    if color.is_some() {
        ansi::reset(out)?;
    }
    if cursor {
        ansi::reverse_off(out)?;
    }
    Ok(())
}

/// Decimal digit count.
fn digits(mut n: usize) -> usize {
    let mut d = 0;
    loop {
        n /= 10;
        d += 1;
        if n == 0 {
            return d;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tt_syntax::highlight::{NoopHighlighter, TokenHighlighter};
    use tt_syntax::language::GO;
    use tt_syntax::theme::DORAEMON;

    fn screen_named(content: &str, name: &str) -> Screen {
        let mut f = tempfile::tempfile().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.seek(SeekFrom::Start(0)).unwrap();
        let hl: Box<dyn Highlighter> = if name.ends_with(".go") {
            Box::new(TokenHighlighter::new(&GO, DORAEMON))
        } else {
            Box::new(NoopHighlighter)
        };
        Screen::new(0, 0, 80, 24, f, name.to_string(), hl).unwrap()
    }

    fn screen(content: &str) -> Screen {
        screen_named(content, "test.txt")
    }

    fn no_keys() -> KeyReader<&'static [u8]> {
        KeyReader::new(&[])
    }

    fn keys_of(bytes: &'static [u8]) -> KeyReader<&'static [u8]> {
        KeyReader::new(bytes)
    }

    fn texts(s: &Screen) -> Vec<String> {
        (0..s.line_count()).map(|y| s.line(y).text()).collect()
    }

    fn main_pos(s: &Screen) -> (usize, usize) {
        let m = s.main_cursor();
        (m.x, m.y)
    }

    /// Every handler must leave the invariants intact.
    fn assert_invariants(s: &Screen) {
        assert!(!s.lines.is_empty());
        for line in &s.lines {
            assert!(line.length() >= 1);
            assert!(line.get(line.length() - 1).is_newline());
        }
        assert_eq!(s.attrs.len(), s.lines.len());
        assert!(!s.cursors.is_empty());
        for c in &s.cursors {
            assert!(c.y < s.lines.len());
        }
        for pair in s.cursors.windows(2) {
            assert!((pair[0].y, pair[0].x) < (pair[1].y, pair[1].x));
        }
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn empty_file_gets_one_empty_line() {
        let s = screen("");
        assert_eq!(s.line_count(), 1);
        assert!(s.line(0).is_empty_line());
        assert_invariants(&s);
    }

    #[test]
    fn reads_lines() {
        let s = screen("foo\nbar\n");
        assert_eq!(texts(&s), ["foo", "bar"]);
        assert!(!s.is_modified());
    }

    #[test]
    fn gutter_width_grows_at_ten_thousand_lines() {
        let mut s = screen("x\n");
        assert_eq!(s.linenumber_width, 4);
        s.lines = (0..10_000).map(|_| Line::from_str("y")).collect();
        s.attrs = vec![LineAttribute::default(); 10_000];
        s.update_linenumber_width();
        assert_eq!(s.linenumber_width, 5);
    }

    // -- Movement -----------------------------------------------------------

    #[test]
    fn move_left_at_origin_is_noop() {
        let mut s = screen("ab\n");
        s.move_cursors(Direction::Left, 1);
        assert_eq!(main_pos(&s), (0, 0));
    }

    #[test]
    fn move_right_stops_at_line_tail() {
        let mut s = screen("ab\n");
        s.move_cursors(Direction::Right, 10);
        // the newline's cell at column 2
        assert_eq!(main_pos(&s), (2, 0));
        s.move_cursors(Direction::Right, 1);
        assert_eq!(main_pos(&s), (2, 0));
    }

    #[test]
    fn vertical_clamps() {
        let mut s = screen("a\nb\nc\n");
        s.move_cursors(Direction::Up, 5);
        assert_eq!(main_pos(&s).1, 0);
        s.move_cursors(Direction::Down, 99);
        assert_eq!(main_pos(&s).1, 2);
    }

    #[test]
    fn desired_column_survives_short_lines() {
        let mut s = screen("abcdef\nx\nabcdef\n");
        s.move_cursors(Direction::Right, 4);
        assert_eq!(main_pos(&s), (4, 0));
        s.move_cursors(Direction::Down, 1);
        // desired x is kept even though line 1 is short
        assert_eq!(main_pos(&s), (4, 1));
        s.move_cursors(Direction::Down, 1);
        assert_eq!(main_pos(&s), (4, 2));
    }

    #[test]
    fn horizontal_movement_counts_wide_chars() {
        let mut s = screen("漢字x\n");
        s.move_cursors(Direction::Right, 1);
        assert_eq!(main_pos(&s), (2, 0));
        s.move_cursors(Direction::Right, 1);
        assert_eq!(main_pos(&s), (4, 0));
        s.move_cursors(Direction::Left, 2);
        assert_eq!(main_pos(&s), (0, 0));
    }

    #[test]
    fn goto_line_clamps_past_end() {
        let mut s = screen("a\nb\n");
        s.goto_line(99);
        assert_eq!(main_pos(&s).1, 1);
        s.goto_line(1);
        assert_eq!(main_pos(&s).1, 0);
    }

    #[test]
    fn goto_positions() {
        let mut s = screen("  abc\nxyz\n");
        s.goto_bottom_left();
        assert_eq!(main_pos(&s), (0, 1));
        s.goto_top_left();
        assert_eq!(main_pos(&s), (0, 0));
        s.goto_line_tail();
        assert_eq!(main_pos(&s), (5, 0));
        s.goto_first_non_space();
        assert_eq!(main_pos(&s), (2, 0));
        s.goto_line_head();
        assert_eq!(main_pos(&s), (0, 0));
    }

    #[test]
    fn find_char_forward_and_backward() {
        let mut s = screen("abcabc\n");
        s.move_to_next_char(Character::new('c'));
        assert_eq!(main_pos(&s), (2, 0));
        s.move_to_next_char(Character::new('c'));
        assert_eq!(main_pos(&s), (5, 0));
        // absent character: no move
        s.move_to_next_char(Character::new('z'));
        assert_eq!(main_pos(&s), (5, 0));
        s.move_to_prev_char(Character::new('a'));
        assert_eq!(main_pos(&s), (3, 0));
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn insert_chars_advances_cursor() {
        let mut s = screen("");
        s.insert_chars(&[Character::new('h'), Character::new('i')]);
        assert_eq!(texts(&s), ["hi"]);
        assert_eq!(main_pos(&s), (2, 0));
        assert!(s.is_modified());
        assert_invariants(&s);
    }

    #[test]
    fn tab_inserts_one_four_cell_character() {
        let mut s = screen("");
        s.insert_chars(&[Character::new('\t')]);
        assert_eq!(main_pos(&s), (4, 0));
        assert_eq!(s.line(0).length(), 2);
    }

    #[test]
    fn delete_current_char() {
        let mut s = screen("abc\n");
        s.delete_current_chars();
        assert_eq!(texts(&s), ["bc"]);
        assert_invariants(&s);
    }

    #[test]
    fn delete_at_newline_joins_lines() {
        let mut s = screen("ab\ncd\n");
        s.move_cursors(Direction::Right, 2); // on the newline cell
        s.delete_current_chars();
        assert_eq!(texts(&s), ["abcd"]);
        assert_invariants(&s);
    }

    #[test]
    fn delete_at_last_line_newline_is_noop() {
        let mut s = screen("ab\n");
        s.move_cursors(Direction::Right, 2);
        s.delete_current_chars();
        assert_eq!(texts(&s), ["ab"]);
    }

    #[test]
    fn backspace_deletes_previous() {
        let mut s = screen("abc\n");
        s.move_cursors(Direction::Right, 2);
        s.delete_prev_chars();
        assert_eq!(texts(&s), ["ac"]);
        assert_eq!(main_pos(&s), (1, 0));
    }

    #[test]
    fn backspace_at_origin_is_noop() {
        let mut s = screen("abc\n");
        s.delete_prev_chars();
        assert_eq!(texts(&s), ["abc"]);
        assert_eq!(main_pos(&s), (0, 0));
    }

    #[test]
    fn backspace_at_line_head_joins_upward() {
        let mut s = screen("ab\ncd\n");
        s.move_cursors(Direction::Down, 1);
        s.delete_prev_chars();
        assert_eq!(texts(&s), ["abcd"]);
        // cursor at the previous line's old right edge
        assert_eq!(main_pos(&s), (2, 0));
        assert_invariants(&s);
    }

    #[test]
    fn replace_overwrites_in_place() {
        let mut s = screen("abc\n");
        s.move_cursors(Direction::Right, 1);
        s.replace_chars(Character::new('X'));
        assert_eq!(texts(&s), ["aXc"]);
    }

    #[test]
    fn open_line_below_enters_at_column_zero() {
        let mut s = screen("ab\n");
        s.insert_line_below_cursors();
        assert_eq!(texts(&s), ["ab", ""]);
        assert_eq!(main_pos(&s), (0, 1));
        assert_invariants(&s);
    }

    #[test]
    fn open_line_above_stays_on_new_line() {
        let mut s = screen("ab\n");
        s.insert_line_above_cursors();
        assert_eq!(texts(&s), ["", "ab"]);
        assert_eq!(main_pos(&s), (0, 0));
        assert_invariants(&s);
    }

    #[test]
    fn split_line_at_cursor() {
        let mut s = screen("hello\n");
        s.move_cursors(Direction::Right, 2);
        s.split_lines_at_cursors();
        assert_eq!(texts(&s), ["he", "llo"]);
        assert_eq!(main_pos(&s), (0, 1));
        assert_invariants(&s);
    }

    #[test]
    fn split_then_join_restores_line() {
        let mut s = screen("hello world\n");
        s.move_cursors(Direction::Right, 4);
        s.split_lines_at_cursors();
        s.join_lines(0, 1);
        assert_eq!(texts(&s), ["hello world"]);
        assert_invariants(&s);
    }

    #[test]
    fn join_lines_merges_range() {
        let mut s = screen("a\nb\nc\nd\n");
        s.join_lines(0, 2);
        assert_eq!(texts(&s), ["abc", "d"]);
        assert_invariants(&s);
    }

    #[test]
    fn yank_and_paste() {
        let mut s = screen("ab\n");
        s.yank_char();
        s.move_cursors(Direction::Right, 1);
        s.paste_char();
        assert_eq!(texts(&s), ["aab"]);
    }

    // -- Multi-cursor -------------------------------------------------------

    #[test]
    fn add_cursor_below_skips_short_lines() {
        let mut s = screen("abcdef\nx\nabcdef\n");
        s.move_cursors(Direction::Right, 3);
        s.add_cursor_below();
        // line 1 has width 2, cannot hold column 3 — lands on line 2
        assert_eq!(s.cursors().len(), 2);
        assert_eq!(s.cursors()[1].y, 2);
        assert_eq!(s.cursors()[1].x, 3);
    }

    #[test]
    fn add_cursor_below_without_candidate_is_noop() {
        let mut s = screen("abcdef\nx\n");
        s.move_cursors(Direction::Right, 3);
        s.add_cursor_below();
        assert_eq!(s.cursors().len(), 1);
    }

    #[test]
    fn collapse_keeps_main() {
        let mut s = screen("ab\nab\nab\n");
        s.add_cursor_below();
        s.add_cursor_below();
        assert_eq!(s.cursors().len(), 3);
        let main = s.main_cursor();
        s.collapse_cursors();
        assert_eq!(s.cursors().len(), 1);
        assert_eq!(s.cursors()[0], main);
    }

    #[test]
    fn multi_cursor_insert_hits_every_line() {
        let mut s = screen("aa\nbb\ncc\n");
        s.add_cursor_below();
        s.add_cursor_below();
        s.insert_chars(&[Character::new('X')]);
        assert_eq!(texts(&s), ["Xaa", "Xbb", "Xcc"]);
        assert_invariants(&s);
    }

    #[test]
    fn multi_cursor_open_below_shifts_following() {
        let mut s = screen("aa\nbb\n");
        s.add_cursor_below();
        s.insert_line_below_cursors();
        assert_eq!(texts(&s), ["aa", "", "bb", ""]);
        let ys: Vec<usize> = s.cursors().iter().map(|c| c.y).collect();
        assert_eq!(ys, [1, 3]);
        assert_invariants(&s);
    }

    #[test]
    fn multi_cursor_split_shifts_following() {
        let mut s = screen("aXa\nbXb\n");
        s.move_cursors(Direction::Right, 1);
        s.add_cursor_below();
        s.split_lines_at_cursors();
        assert_eq!(texts(&s), ["a", "Xa", "b", "Xb"]);
        assert_invariants(&s);
    }

    #[test]
    fn converging_cursors_are_merged() {
        let mut s = screen("ab\nab\n");
        s.add_cursor_below();
        assert_eq!(s.cursors().len(), 2);
        // a goto converges every cursor onto one position
        s.goto_top_left();
        cursor::cleanup(&mut s.cursors);
        assert_eq!(s.cursors().len(), 1);
        assert_invariants(&s);
    }

    // -- Key handling -------------------------------------------------------

    #[test]
    fn count_prefix_multiplies_movement() {
        let mut s = screen("abcdef\n");
        let mut keys = keys_of(b"l");
        s.handle(Mode::Normal, Key::Char('3'), &mut keys).unwrap();
        assert_eq!(main_pos(&s), (3, 0));
    }

    #[test]
    fn zero_count_is_coerced_to_one() {
        let mut s = screen("abcdef\n");
        let mut keys = keys_of(b"l");
        s.handle(Mode::Normal, Key::Char('0'), &mut keys).unwrap();
        assert_eq!(main_pos(&s), (1, 0));
    }

    #[test]
    fn bare_g_goes_to_last_line() {
        let mut s = screen("foo\nbar\n");
        s.handle(Mode::Normal, Key::Char('G'), &mut no_keys()).unwrap();
        assert_eq!(main_pos(&s), (0, 1));
        let mut keys = keys_of(b"g");
        s.handle(Mode::Normal, Key::Char('g'), &mut keys).unwrap();
        assert_eq!(main_pos(&s), (0, 0));
    }

    #[test]
    fn counted_g_goes_to_that_line() {
        let mut s = screen("a\nb\nc\nd\n");
        let mut keys = keys_of(b"G");
        s.handle(Mode::Normal, Key::Char('3'), &mut keys).unwrap();
        assert_eq!(main_pos(&s).1, 2);
    }

    #[test]
    fn o_enters_insert_mode() {
        let mut s = screen("x\n");
        let next = s.handle(Mode::Normal, Key::Char('o'), &mut no_keys()).unwrap();
        assert_eq!(next, Some(Mode::Insert));
        assert_eq!(texts(&s), ["x", ""]);
    }

    #[test]
    fn escape_returns_to_normal() {
        let mut s = screen("x\n");
        let next = s.handle(Mode::Insert, Key::Esc, &mut no_keys()).unwrap();
        assert_eq!(next, Some(Mode::Normal));
    }

    #[test]
    fn f_key_reads_target() {
        let mut s = screen("hello\n");
        let mut keys = keys_of(b"l");
        s.handle(Mode::Normal, Key::Char('f'), &mut keys).unwrap();
        assert_eq!(main_pos(&s), (2, 0));
    }

    #[test]
    fn r_key_replaces() {
        let mut s = screen("abc\n");
        let mut keys = keys_of(b"Z");
        s.handle(Mode::Normal, Key::Char('r'), &mut keys).unwrap();
        assert_eq!(texts(&s), ["Zbc"]);
    }

    // -- Scenarios ----------------------------------------------------------

    #[test]
    fn scenario_insert_then_delete_leaves_empty_dirty_buffer() {
        // i a b c Esc, three lefts, three deletes.
        let mut s = screen("");
        for ch in ['a', 'b', 'c'] {
            s.handle(Mode::Insert, Key::Char(ch), &mut no_keys()).unwrap();
        }
        for _ in 0..3 {
            s.handle(Mode::Normal, Key::Char('h'), &mut no_keys()).unwrap();
        }
        for _ in 0..3 {
            s.handle(Mode::Normal, Key::Char('d'), &mut no_keys()).unwrap();
        }
        assert_eq!(s.line_count(), 1);
        assert!(s.line(0).is_empty_line());
        assert!(s.is_modified());
        assert_invariants(&s);
    }

    #[test]
    fn scenario_insert_enter_insert() {
        let mut s = screen("");
        s.handle(Mode::Insert, Key::Char('x'), &mut no_keys()).unwrap();
        s.handle(Mode::Insert, Key::Enter, &mut no_keys()).unwrap();
        s.handle(Mode::Insert, Key::Char('y'), &mut no_keys()).unwrap();
        assert_eq!(texts(&s), ["x", "y"]);
        assert_eq!(s.cursors().len(), 1);
        assert_eq!(main_pos(&s), (1, 1));
    }

    #[test]
    fn scenario_multi_cursor_spread_and_type() {
        let content = "0123456789\n".repeat(20);
        let mut s = screen(&content);
        s.goto_line(11);
        for _ in 0..3 {
            s.handle(Mode::Normal, Key::Char('C'), &mut no_keys()).unwrap();
        }
        assert_eq!(s.cursors().len(), 4);
        s.handle(Mode::Insert, Key::Char('X'), &mut no_keys()).unwrap();
        for y in 10..14 {
            assert!(s.line(y).text().starts_with('X'), "line {y}");
        }
        assert_invariants(&s);
    }

    // -- Highlighting -------------------------------------------------------

    #[test]
    fn incremental_rescan_touches_minimal_range() {
        let mut s = screen_named("/*\n*/\nx := 1\n", "main.go");
        s.rehighlight();
        s.lines_to_render.clear();
        s.hl_updated.clear();

        // Prefix line 0 with '/' so it becomes a line comment.
        s.insert_chars(&[Character::new('/')]);
        s.rehighlight();
        // exactly lines 0 and 1: line 1's carry flags match again there
        assert_eq!(s.hl_updated, [0, 1]);
        assert!(!s.attrs[1].carry.in_block_comment());
    }

    #[test]
    fn incremental_rescan_matches_full_rescan() {
        let mut s = screen_named("a := 1\n/*\nmid\n*/\nb := `raw\nend`\n", "main.go");
        s.rehighlight();
        s.lines_to_render.clear();
        s.hl_updated.clear();

        // A sequence of edits across the comment and string regions.
        s.move_cursors(Direction::Down, 1);
        s.insert_chars(&[Character::new('x')]);
        s.rehighlight();
        s.lines_to_render.clear();
        s.hl_updated.clear();

        s.move_cursors(Direction::Down, 3);
        s.delete_current_chars();
        s.rehighlight();
        s.lines_to_render.clear();
        s.hl_updated.clear();

        // Full rescan from line 0 must agree with the incremental state.
        let hl = TokenHighlighter::new(&GO, DORAEMON);
        let mut carry = Carry::none();
        for (y, line) in s.lines.iter().enumerate() {
            let attr = hl.highlight_line(&line.content_chars(), &carry);
            carry = attr.carry.clone();
            assert_eq!(attr, s.attrs[y], "line {y} diverged");
        }
    }

    #[test]
    fn attribute_parity_after_every_edit() {
        let mut s = screen_named("package main\n\nfunc main() {}\n", "main.go");
        s.insert_line_below_cursors();
        assert_eq!(s.attrs.len(), s.lines.len());
        s.split_lines_at_cursors();
        assert_eq!(s.attrs.len(), s.lines.len());
        s.join_lines(0, 1);
        assert_eq!(s.attrs.len(), s.lines.len());
        s.delete_current_chars();
        assert_eq!(s.attrs.len(), s.lines.len());
    }

    // -- Viewport -----------------------------------------------------------

    #[test]
    fn render_scrolls_viewport_to_cursor() {
        let content = "line\n".repeat(100);
        let mut s = screen(&content);
        s.goto_line(60);
        let mut out = OutputBuffer::new();
        s.render(&mut out, true).unwrap();
        // cursor row must be inside the text area
        assert!(s.yoffset <= 59);
        assert!(59 < s.yoffset + s.height - 1);
        // with soft padding honored
        assert!(59 - s.yoffset >= YPAD);
    }

    #[test]
    fn render_scrolls_horizontally_with_padding() {
        let long = "x".repeat(200);
        let mut s = screen(&format!("{long}\n"));
        s.move_cursors(Direction::Right, 150);
        let mut out = OutputBuffer::new();
        s.render(&mut out, true).unwrap();
        let inner = s.inner_width();
        assert!(s.xoffset <= 150);
        assert!(150 < s.xoffset + inner);
    }

    #[test]
    fn render_clears_dirty_sets() {
        let mut s = screen("a\nb\n");
        s.insert_chars(&[Character::new('z')]);
        assert!(!s.lines_to_render.is_empty());
        let mut out = OutputBuffer::new();
        s.render(&mut out, false).unwrap();
        assert!(s.lines_to_render.is_empty());
        assert!(s.hl_updated.is_empty());
        assert!(!s.scrolled);
    }

    #[test]
    fn render_emits_gutter_numbers() {
        let mut s = screen("hello\n");
        let mut out = OutputBuffer::new();
        s.render(&mut out, true).unwrap();
        let frame = String::from_utf8(out.as_bytes().to_vec()).unwrap();
        assert!(frame.contains("\x1b[38;5;243m1\x1b[0m"), "gutter number missing");
        assert!(frame.contains("hello"));
        assert!(frame.contains(" test.txt"), "status line missing");
    }

    #[test]
    fn render_reverse_videos_the_cursor() {
        let mut s = screen("hello\n");
        let mut out = OutputBuffer::new();
        s.render(&mut out, true).unwrap();
        let frame = String::from_utf8(out.as_bytes().to_vec()).unwrap();
        assert!(frame.contains("\x1b[7mh\x1b[27m"));
    }

    // -- Persistence --------------------------------------------------------

    #[test]
    fn content_round_trips_utf8_tabs_and_newlines() {
        let s = screen("a\tb\n漢字\n");
        assert_eq!(s.content(), "a\tb\n漢字\n".as_bytes());
    }

    #[test]
    fn save_then_reload_is_identical() {
        let mut s = screen("one\ntwo\tthree\nあ\n");
        let before = s.content();
        s.insert_chars(&[Character::new('!')]);
        s.delete_prev_chars();
        s.save().unwrap();
        assert!(!s.is_modified());

        // Reload through a fresh screen sharing the same file.
        let mut f = s.file.try_clone().unwrap();
        f.seek(SeekFrom::Start(0)).unwrap();
        let s2 = Screen::new(0, 0, 80, 24, f, "re".into(), Box::new(NoopHighlighter)).unwrap();
        assert_eq!(s2.content(), before);
    }

    #[test]
    fn missing_trailing_newline_is_normalized() {
        let s = screen("foo\nbar");
        assert_eq!(s.content(), b"foo\nbar\n");
    }
}
