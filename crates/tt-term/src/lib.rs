// SPDX-License-Identifier: MIT
//
// tt-term — terminal backend for turtle.
//
// Direct VT100 control, no curses and no TUI framework: raw termios via
// libc, escape sequences written by hand, and a frame buffer that turns a
// whole render into a single write() syscall. The input side decodes stdin
// bytes into keys, resolving the classic ESC-versus-escape-sequence
// ambiguity by looking at what arrived in the same read burst.

pub mod ansi;
pub mod key;
pub mod output;
pub mod reader;
pub mod terminal;
