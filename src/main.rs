// SPDX-License-Identifier: MIT
//
// turtle (`tt`) — a modal terminal text editor.
//
// This is the binary that wires the crates together:
//
//   tt-term   → raw terminal control, frame output, key decoding
//   tt-editor → character/line model, screens, the window tree
//   tt-syntax → incremental tokenizer, highlighters, themes
//
// The Editor owns the window tree and the mode state. Each keypress flows
// through:
//
//   stdin → KeyReader → Editor (mode dispatch) → active Screen.handle
//   → line/cursor mutation → incremental rehighlight → render → one flush
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ window tree                  │  ← h - 1 rows (gutter + text +
//   │   (splits, gutters, status)  │     per-screen status line)
//   ├──────────────────────────────┤
//   │ command / message line       │  ← 1 row (managed by Editor)
//   └──────────────────────────────┘
//
// The whole editor is single-threaded and cooperative: one blocking read
// on stdin, then a full dispatch + highlight + render cycle, then the next
// read. Every frame reflects every effect of every key before it.

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use log::debug;

use tt_editor::character::Character;
use tt_editor::line::Line;
use tt_editor::mode::Mode;
use tt_editor::screen::Screen;
use tt_editor::window::{SplitDir, Window};
use tt_editor::Direction;
use tt_syntax::highlighter_for;
use tt_syntax::theme::{builtin_theme, Theme};
use tt_term::ansi;
use tt_term::key::Key;
use tt_term::output::OutputBuffer;
use tt_term::reader::KeyReader;
use tt_term::terminal::Terminal;

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The editor: window tree, active leaf, mode state, and the command line.
struct Editor {
    root: Window,
    /// Path of the active leaf in the window tree.
    active: Vec<usize>,
    /// Set when the window layout changed; forces a full-tree redraw.
    window_changed: bool,

    width: usize,
    height: usize,

    mode: Mode,
    /// The `:` prompt's buffer (without the leading colon).
    cmdline: Line,
    /// Display column of the command-line cursor.
    cmdx: usize,
    /// Transient message shown instead of the command line. Cleared on the
    /// next keystroke.
    msg: Line,

    theme: &'static Theme,
}

impl Editor {
    fn new(root: Window, width: usize, height: usize, theme: &'static Theme) -> Self {
        Self {
            root,
            active: Vec::new(),
            window_changed: false,
            width,
            height,
            mode: Mode::Normal,
            cmdline: Line::empty(),
            cmdx: 0,
            msg: Line::empty(),
            theme,
        }
    }

    fn active_screen(&self) -> &Screen {
        self.root.screen_at(&self.active)
    }

    fn active_screen_mut(&mut self) -> &mut Screen {
        self.root.screen_at_mut(&self.active)
    }

    fn set_message(&mut self, msg: &str) {
        self.msg = Line::from_str(msg);
    }

    // ── Key dispatch ────────────────────────────────────────────────────

    /// Process one key. Returns `true` when the editor should exit.
    fn handle_key<R: Read>(&mut self, key: Key, keys: &mut KeyReader<R>) -> io::Result<bool> {
        match self.mode {
            Mode::Command => self.handle_command_key(key),

            Mode::Normal => match key {
                Key::Ctrl('w') => {
                    match keys.read_key()? {
                        Key::Char('h') | Key::Ctrl('h') | Key::Left => self.jump(Direction::Left),
                        Key::Char('j') | Key::Ctrl('j') | Key::Down => self.jump(Direction::Down),
                        Key::Char('k') | Key::Ctrl('k') | Key::Up => self.jump(Direction::Up),
                        Key::Char('l') | Key::Ctrl('l') | Key::Right => self.jump(Direction::Right),
                        _ => {}
                    }
                    Ok(false)
                }
                Key::Char(':') => {
                    self.mode = Mode::Command;
                    Ok(false)
                }
                Key::Char('i') => {
                    self.mode = Mode::Insert;
                    Ok(false)
                }
                _ => self.forward_to_screen(key, keys),
            },

            Mode::Insert => {
                if key == Key::Esc {
                    self.mode = Mode::Normal;
                    return Ok(false);
                }
                self.forward_to_screen(key, keys)
            }
        }
    }

    fn forward_to_screen<R: Read>(
        &mut self,
        key: Key,
        keys: &mut KeyReader<R>,
    ) -> io::Result<bool> {
        let mode = self.mode;
        if let Some(next) = self.root.screen_at_mut(&self.active).handle(mode, key, keys)? {
            self.mode = next;
        }
        Ok(false)
    }

    // ── Command mode ────────────────────────────────────────────────────

    fn handle_command_key(&mut self, key: Key) -> io::Result<bool> {
        match key {
            Key::Left => self.move_cmd_cursor(Direction::Left),
            Key::Right => self.move_cmd_cursor(Direction::Right),

            Key::Esc => {
                self.reset_cmd();
                self.mode = Mode::Normal;
            }

            Key::Backspace => {
                if self.cmdx > 0 {
                    self.move_cmd_cursor(Direction::Left);
                    let idx = self.cmd_xidx();
                    self.cmdline.delete_char(idx);
                }
            }

            Key::Enter => return self.execute_command(),

            Key::Char(c) => {
                let idx = self.cmd_xidx();
                self.cmdline.insert_chars(idx, &[Character::new(c)]);
                self.move_cmd_cursor(Direction::Right);
            }

            _ => {}
        }
        Ok(false)
    }

    fn cmd_xidx(&self) -> usize {
        self.cmdline.char_index(self.cmdx, 0)
    }

    fn move_cmd_cursor(&mut self, dir: Direction) {
        match dir {
            Direction::Left => {
                let idx = self.cmd_xidx().saturating_sub(1);
                self.cmdx = self.cmdline.width_to(idx);
            }
            Direction::Right => {
                let idx = (self.cmd_xidx() + 1).min(self.cmdline.length() - 1);
                self.cmdx = self.cmdline.width_to(idx);
            }
            Direction::Up | Direction::Down => {}
        }
    }

    fn reset_cmd(&mut self) {
        self.cmdline = Line::empty();
        self.cmdx = 0;
    }

    /// Execute the command line. Returns `true` when the editor should
    /// exit.
    fn execute_command(&mut self) -> io::Result<bool> {
        let text = self.cmdline.text();

        match text.as_str() {
            "q" => {
                self.reset_cmd();
                self.mode = Mode::Normal;
                return Ok(self.close_window(false));
            }
            "q!" => {
                self.reset_cmd();
                self.mode = Mode::Normal;
                return Ok(self.close_window(true));
            }
            "w" => {
                self.active_screen_mut().save()?;
                self.set_message("saved!");
                self.reset_cmd();
                self.mode = Mode::Normal;
            }
            "wq" => {
                self.active_screen_mut().save()?;
                self.reset_cmd();
                return Ok(true);
            }
            _ => {
                if let Some(rest) = text.strip_prefix("vs ") {
                    let name = rest.trim().to_string();
                    self.split_window(&name, SplitDir::Right);
                } else if let Some(rest) = text.strip_prefix("hs ") {
                    let name = rest.trim().to_string();
                    self.split_window(&name, SplitDir::Down);
                } else {
                    self.set_message("unknown command!");
                }
                self.reset_cmd();
                self.mode = Mode::Normal;
            }
        }

        Ok(false)
    }

    // ── Window commands ─────────────────────────────────────────────────

    /// Close the active window. Returns `true` when the last window closed
    /// and the editor should exit.
    fn close_window(&mut self, force: bool) -> bool {
        if !force && self.active_screen().is_modified() {
            let msg = format!("unsaved change remaining: '{}'", self.active_screen().name());
            self.set_message(&msg);
            return false;
        }

        match self.root.close(&self.active) {
            Some(next) => {
                self.active = next;
                self.window_changed = true;
                false
            }
            None => true,
        }
    }

    /// Open `filename` in a new split next to the active window. The file
    /// must already exist.
    fn split_window(&mut self, filename: &str, dir: SplitDir) {
        if fs::metadata(filename).is_err() {
            self.set_message(&format!("file not found: '{filename}'"));
            self.mode = Mode::Normal;
            return;
        }

        let file = match open_rw(filename) {
            Ok(f) => f,
            Err(_) => {
                self.set_message(&format!("cannot open: '{filename}'"));
                self.mode = Mode::Normal;
                return;
            }
        };

        let hl = highlighter_for(filename, *self.theme);
        let screen = match Screen::new(0, 0, 0, 0, file, filename.to_string(), hl) {
            Ok(s) => s,
            Err(_) => {
                self.set_message(&format!("cannot open: '{filename}'"));
                self.mode = Mode::Normal;
                return;
            }
        };

        self.active = self.root.split(&self.active, dir, screen);
        self.window_changed = true;
    }

    fn jump(&mut self, dir: Direction) {
        if let Some(next) = self.root.jump_target(&self.active, dir) {
            self.active = next;
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&mut self, out: &mut OutputBuffer, first: bool) -> io::Result<()> {
        // Bottom row: transient message, or the `:` prompt in command mode.
        ansi::cursor_to(out, 0, self.height - 1)?;
        write!(out, "{:w$}", "", w = self.width)?;
        ansi::cursor_to(out, 0, self.height - 1)?;
        if !self.msg.is_empty_line() {
            let s: String = self.msg.text().chars().take(self.width).collect();
            write!(out, "{s}")?;
        } else if self.mode == Mode::Command {
            let s: String = format!(":{}", self.cmdline.text())
                .chars()
                .take(self.width)
                .collect();
            write!(out, "{s}")?;
        }

        if self.window_changed || first {
            self.root.render(out, true)?;
            // Render the active screen last so its cursor position wins.
            self.root.screen_at_mut(&self.active).render(out, true)?;
        } else {
            self.root.get_mut(&self.active).render(out, false)?;
        }

        if self.mode == Mode::Command {
            ansi::cursor_to(out, self.cmdx + 1, self.height - 1)?;
        }

        self.window_changed = false;
        Ok(())
    }

    fn log_state(&self) {
        debug!(
            "mode: {}, active: {:?} '{}', windows: {}, cmdline: '{}', cmdx: {}, msg: '{}'",
            self.mode,
            self.active,
            self.active_screen().name(),
            self.root.leaves().len(),
            self.cmdline.text(),
            self.cmdx,
            self.msg.text(),
        );
    }
}

// ─── Main loop ──────────────────────────────────────────────────────────────

fn run<R: Read>(
    editor: &mut Editor,
    keys: &mut KeyReader<R>,
    out: &mut OutputBuffer,
) -> io::Result<()> {
    ansi::cursor_hide(out)?;
    editor.render(out, true)?;
    ansi::cursor_show(out)?;
    out.flush_stdout()?;

    loop {
        // The message survives exactly until the next input.
        editor.msg = Line::empty();

        let key = keys.read_key()?;
        if editor.handle_key(key, keys)? {
            return Ok(());
        }

        ansi::cursor_hide(out)?;
        editor.render(out, false)?;
        ansi::cursor_show(out)?;
        out.flush_stdout()?;
        editor.log_state();
    }
}

// ─── Startup ────────────────────────────────────────────────────────────────

#[cfg(unix)]
fn open_rw(path: &str) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .mode(0o644)
        .open(path)
}

#[cfg(not(unix))]
fn open_rw(path: &str) -> io::Result<File> {
    OpenOptions::new().read(true).write(true).create(true).open(path)
}

fn init_logging() {
    let level = env::var("TURTLE_DEBUG")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(0);
    let filter = match level {
        0 => log::LevelFilter::Off,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(filter)
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() {
    init_logging();

    // ── Arguments: tt [--theme <name>] [FILE] ──────────────────────
    let mut theme_name = String::from("doraemon");
    let mut files: Vec<String> = Vec::new();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--theme" {
            match args.next() {
                Some(name) => theme_name = name,
                None => {
                    eprintln!("tt: --theme requires a value");
                    process::exit(1);
                }
            }
        } else {
            files.push(arg);
        }
    }

    if files.len() > 1 {
        eprintln!("tt: more than 2 args are passed");
        process::exit(1);
    }

    let Some(theme) = builtin_theme(&theme_name) else {
        eprintln!("tt: unknown theme: '{theme_name}'");
        process::exit(1);
    };

    let filename = files.pop().map_or_else(
        || {
            let mut p: PathBuf = env::temp_dir();
            p.push("__scratch__");
            p.to_string_lossy().into_owned()
        },
        |f| f,
    );

    let file = open_rw(&filename).unwrap_or_else(|e| {
        eprintln!("tt: {filename}: {e}");
        process::exit(1);
    });

    // ── Terminal ───────────────────────────────────────────────────
    let mut term = Terminal::new().unwrap_or_else(|e| {
        eprintln!("tt: failed to initialize terminal: {e}");
        process::exit(1);
    });
    if let Err(e) = term.enter() {
        eprintln!("tt: failed to enter raw mode: {e}");
        process::exit(1);
    }
    let size = term.size();

    // ── Editor ─────────────────────────────────────────────────────
    // The bottom row belongs to the command line; the window tree gets
    // the rest.
    let hl = highlighter_for(&filename, *theme);
    let screen = match Screen::new(0, 0, size.cols, size.rows - 1, file, filename, hl) {
        Ok(s) => s,
        Err(e) => {
            let _ = term.leave();
            eprintln!("tt: {e}");
            process::exit(1);
        }
    };
    let root = Window::leaf(screen, 0, 0, size.cols, size.rows - 1);
    let mut editor = Editor::new(root, size.cols, size.rows, theme);

    let stdin = io::stdin();
    let mut keys = KeyReader::new(stdin.lock());
    let mut out = OutputBuffer::new();

    if let Err(e) = run(&mut editor, &mut keys, &mut out) {
        let _ = term.leave();
        eprintln!("tt: {e}");
        process::exit(1);
    }
    // `term` restores the terminal on drop.
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Seek;

    fn make_editor(content: &str, name: &str) -> Editor {
        let mut f = tempfile::tempfile().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.seek(io::SeekFrom::Start(0)).unwrap();
        let theme = builtin_theme("doraemon").unwrap();
        let hl = highlighter_for(name, *theme);
        let screen = Screen::new(0, 0, 80, 23, f, name.to_string(), hl).unwrap();
        let root = Window::leaf(screen, 0, 0, 80, 23);
        Editor::new(root, 80, 24, theme)
    }

    /// Feed a byte script through the full key → dispatch → render cycle.
    /// Returns `true` if the editor decided to exit.
    fn process(editor: &mut Editor, script: &[u8]) -> bool {
        let mut keys = KeyReader::new(script);
        let mut out = OutputBuffer::new();
        editor.render(&mut out, true).unwrap();
        out.clear();
        loop {
            let Ok(key) = keys.read_key() else {
                return false;
            };
            editor.msg = Line::empty();
            if editor.handle_key(key, &mut keys).unwrap() {
                return true;
            }
            editor.render(&mut out, false).unwrap();
            out.clear();
        }
    }

    // -- Mode transitions ---------------------------------------------------

    #[test]
    fn insert_and_escape() {
        let mut e = make_editor("", "t.txt");
        process(&mut e, b"iabc\x1b");
        assert_eq!(e.mode, Mode::Normal);
        assert_eq!(e.active_screen().line(0).text(), "abc");
        assert!(e.active_screen().is_modified());
    }

    #[test]
    fn colon_enters_command_mode() {
        let mut e = make_editor("", "t.txt");
        process(&mut e, b":");
        assert_eq!(e.mode, Mode::Command);
        process(&mut e, b"\x1b");
        assert_eq!(e.mode, Mode::Normal);
    }

    // -- Command execution --------------------------------------------------

    #[test]
    fn unknown_command_sets_message() {
        let mut e = make_editor("", "t.txt");
        process(&mut e, b":frobnicate\r");
        assert_eq!(e.msg.text(), "unknown command!");
        assert_eq!(e.mode, Mode::Normal);
    }

    #[test]
    fn quit_on_clean_buffer_exits() {
        let mut e = make_editor("x\n", "t.txt");
        assert!(process(&mut e, b":q\r"));
    }

    #[test]
    fn quit_on_dirty_buffer_is_blocked() {
        let mut e = make_editor("x\n", "t.txt");
        process(&mut e, b"ia\x1b");
        assert!(!process(&mut e, b":q\r"));
        assert!(e.msg.text().starts_with("unsaved change remaining:"));
    }

    #[test]
    fn force_quit_ignores_dirty_buffer() {
        let mut e = make_editor("x\n", "t.txt");
        process(&mut e, b"ia\x1b");
        assert!(process(&mut e, b":q!\r"));
    }

    #[test]
    fn write_saves_and_reports() {
        let mut e = make_editor("x\n", "t.txt");
        process(&mut e, b"ia\x1b");
        assert!(!process(&mut e, b":w\r"));
        assert_eq!(e.msg.text(), "saved!");
        assert!(!e.active_screen().is_modified());
    }

    #[test]
    fn command_line_backspace_edits() {
        let mut e = make_editor("", "t.txt");
        process(&mut e, b":wx\x7f\r");
        // "wx" minus the x executes as "w"
        assert_eq!(e.msg.text(), "saved!");
    }

    #[test]
    fn vs_with_missing_file_sets_message() {
        let mut e = make_editor("", "t.txt");
        process(&mut e, b":vs /no/such/file\r");
        assert_eq!(e.msg.text(), "file not found: '/no/such/file'");
        assert_eq!(e.root.leaves().len(), 1);
    }

    // -- Splits and window navigation ---------------------------------------

    #[test]
    fn vs_splits_and_ctrl_w_moves_back() {
        let other = tempfile::NamedTempFile::new().unwrap();
        let path = other.path().to_string_lossy().into_owned();

        let mut e = make_editor("left\n", "t.txt");
        let script = format!(":vs {path}\r");
        process(&mut e, script.as_bytes());
        assert_eq!(e.root.leaves().len(), 2);
        assert_eq!(e.active_screen().name(), path);

        // Jump back left and type into the left buffer only.
        process(&mut e, b"\x17hiz\x1b");
        assert_eq!(e.active_screen().name(), "t.txt");
        assert_eq!(e.active_screen().line(0).text(), "zleft");
        assert_eq!(e.root.screen_at(&[1]).line(0).text(), "");
    }

    #[test]
    fn closing_one_of_two_windows_continues() {
        let other = tempfile::NamedTempFile::new().unwrap();
        let path = other.path().to_string_lossy().into_owned();

        let mut e = make_editor("x\n", "t.txt");
        let script = format!(":vs {path}\r:q\r");
        assert!(!process(&mut e, script.as_bytes()));
        assert_eq!(e.root.leaves().len(), 1);
        assert_eq!(e.active_screen().name(), "t.txt");
    }

    // -- Count dispatch through the editor ----------------------------------

    #[test]
    fn counted_motion_via_editor() {
        let mut e = make_editor("abcdef\n", "t.txt");
        process(&mut e, b"3l");
        let main = e.active_screen().cursors().last().copied().unwrap();
        assert_eq!(main.x, 3);
    }

    #[test]
    fn scenario_edit_move_delete() {
        let mut e = make_editor("", "t.txt");
        process(&mut e, b"iabc\x1bhhhddd");
        assert_eq!(e.active_screen().line_count(), 1);
        assert!(e.active_screen().line(0).is_empty_line());
        assert!(e.active_screen().is_modified());
    }
}
