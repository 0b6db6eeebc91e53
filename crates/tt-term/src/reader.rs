// SPDX-License-Identifier: MIT
//
// Blocking key reader.
//
// Turns raw stdin bytes into Keys. Reads arrive in bursts: with VMIN=1 a
// single read() returns every byte the terminal delivered at once, so a
// lone ESC byte with nothing behind it in the burst is the Escape key,
// while ESC with `[A` behind it is an arrow. That buffered-burst check is
// the whole disambiguation strategy — no timers involved.
//
// Grammar:
//   0x0D → Enter, 0x09 → Tab, 0x7F → Backspace
//   0x01..=0x1A (minus CR/TAB) → Ctrl-a..Ctrl-z
//   ESC, nothing buffered → Esc
//   ESC [ A|B|C|D → arrows; ESC [ H|F → Home/End
//   ESC [ 2|3|5|6 ~ → Insert/Delete/PageUp/PageDown
//   anything else → one UTF-8 rune (1–4 bytes)

use std::io::{self, Read};

use log::debug;

use crate::key::Key;

/// Blocking reader that decodes keys from any byte source.
///
/// Generic over `Read` so tests can feed byte slices and the editor can
/// feed stdin.
pub struct KeyReader<R: Read> {
    inner: R,
    buf: Vec<u8>,
    pos: usize,
}

impl<R: Read> KeyReader<R> {
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(64),
            pos: 0,
        }
    }

    /// Block until a key can be decoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying source fails or reaches EOF.
    pub fn read_key(&mut self) -> io::Result<Key> {
        let first = self.next_byte()?;

        if first == 0x1b {
            // A lone ESC in the burst is the Escape key itself.
            if !self.has_buffered() {
                return Ok(Key::Esc);
            }
            return self.read_escape_sequence();
        }

        Ok(match first {
            0x0d => Key::Enter,
            0x09 => Key::Tab,
            0x7f => Key::Backspace,
            b @ 0x01..=0x1a => Key::Ctrl((b'a' + b - 1) as char),
            b if b < 0x20 => Key::Unknown,
            b => self.read_utf8(b)?,
        })
    }

    /// Decode the remainder of a CSI sequence after the leading ESC.
    fn read_escape_sequence(&mut self) -> io::Result<Key> {
        let second = self.next_byte()?;
        if second != b'[' {
            debug!("unhandled escape introducer: 0x{second:02x}");
            return Ok(Key::Unknown);
        }

        let key = match self.next_byte()? {
            b'A' => Key::Up,
            b'B' => Key::Down,
            b'C' => Key::Right,
            b'D' => Key::Left,
            b'H' => Key::Home,
            b'F' => Key::End,
            b @ (b'2' | b'3' | b'5' | b'6') => {
                if self.next_byte()? != b'~' {
                    return Ok(Key::Unknown);
                }
                match b {
                    b'2' => Key::Insert,
                    b'3' => Key::Delete,
                    b'5' => Key::PageUp,
                    _ => Key::PageDown,
                }
            }
            other => {
                debug!("unhandled CSI final byte: 0x{other:02x}");
                Key::Unknown
            }
        };

        Ok(key)
    }

    /// Decode a UTF-8 rune whose first byte is `first`.
    fn read_utf8(&mut self, first: u8) -> io::Result<Key> {
        let len = match first {
            b if b < 0x80 => 1,
            b if b & 0xe0 == 0xc0 => 2,
            b if b & 0xf0 == 0xe0 => 3,
            b if b & 0xf8 == 0xf0 => 4,
            _ => return Ok(Key::Unknown),
        };

        let mut bytes = [first, 0, 0, 0];
        for slot in bytes.iter_mut().take(len).skip(1) {
            *slot = self.next_byte()?;
        }

        match std::str::from_utf8(&bytes[..len]) {
            Ok(s) => Ok(s.chars().next().map_or(Key::Unknown, Key::Char)),
            Err(_) => Ok(Key::Unknown),
        }
    }

    /// Are undecoded bytes left over from the current burst?
    #[must_use]
    pub fn has_buffered(&self) -> bool {
        self.pos < self.buf.len()
    }

    /// Next byte, refilling from the source (blocking) when the burst is
    /// exhausted.
    fn next_byte(&mut self) -> io::Result<u8> {
        if !self.has_buffered() {
            self.fill()?;
        }
        let b = self.buf[self.pos];
        self.pos += 1;
        Ok(b)
    }

    fn fill(&mut self) -> io::Result<()> {
        let mut chunk = [0u8; 64];
        let n = self.inner.read(&mut chunk)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input source closed",
            ));
        }
        self.buf.clear();
        self.pos = 0;
        self.buf.extend_from_slice(&chunk[..n]);
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(input: &[u8]) -> Vec<Key> {
        let mut reader = KeyReader::new(input);
        let mut out = Vec::new();
        while let Ok(key) = reader.read_key() {
            out.push(key);
        }
        out
    }

    #[test]
    fn plain_ascii() {
        assert_eq!(keys(b"ab"), [Key::Char('a'), Key::Char('b')]);
    }

    #[test]
    fn named_control_bytes() {
        assert_eq!(keys(b"\r"), [Key::Enter]);
        assert_eq!(keys(b"\t"), [Key::Tab]);
        assert_eq!(keys(b"\x7f"), [Key::Backspace]);
    }

    #[test]
    fn ctrl_letters() {
        assert_eq!(keys(b"\x01"), [Key::Ctrl('a')]);
        assert_eq!(keys(b"\x15"), [Key::Ctrl('u')]);
        assert_eq!(keys(b"\x04"), [Key::Ctrl('d')]);
        assert_eq!(keys(b"\x17"), [Key::Ctrl('w')]);
        assert_eq!(keys(b"\x1a"), [Key::Ctrl('z')]);
    }

    #[test]
    fn lone_esc_is_escape() {
        assert_eq!(keys(b"\x1b"), [Key::Esc]);
    }

    #[test]
    fn arrows() {
        assert_eq!(keys(b"\x1b[A"), [Key::Up]);
        assert_eq!(keys(b"\x1b[B"), [Key::Down]);
        assert_eq!(keys(b"\x1b[C"), [Key::Right]);
        assert_eq!(keys(b"\x1b[D"), [Key::Left]);
    }

    #[test]
    fn home_end() {
        assert_eq!(keys(b"\x1b[H"), [Key::Home]);
        assert_eq!(keys(b"\x1b[F"), [Key::End]);
    }

    #[test]
    fn tilde_sequences() {
        assert_eq!(keys(b"\x1b[2~"), [Key::Insert]);
        assert_eq!(keys(b"\x1b[3~"), [Key::Delete]);
        assert_eq!(keys(b"\x1b[5~"), [Key::PageUp]);
        assert_eq!(keys(b"\x1b[6~"), [Key::PageDown]);
    }

    #[test]
    fn unknown_csi_is_ignored_kind() {
        assert_eq!(keys(b"\x1b[Z"), [Key::Unknown]);
    }

    #[test]
    fn utf8_runes() {
        assert_eq!(keys("é".as_bytes()), [Key::Char('é')]);
        assert_eq!(keys("あ".as_bytes()), [Key::Char('あ')]);
        assert_eq!(keys("🐢".as_bytes()), [Key::Char('🐢')]);
    }

    #[test]
    fn burst_of_multiple_keys() {
        assert_eq!(
            keys(b"3j\x1b[A"),
            [Key::Char('3'), Key::Char('j'), Key::Up]
        );
    }

    #[test]
    fn eof_is_an_error() {
        let mut reader = KeyReader::new(&b""[..]);
        assert!(reader.read_key().is_err());
    }
}
