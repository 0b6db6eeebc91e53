//! The configurable single-pass tokenizer.
//!
//! One [`Tokenizer`] per language, parameterized entirely by a
//! [`LanguageSpec`] table. The scanner walks a single line of characters
//! (the line's content, without its terminal newline) and produces tokens
//! that tile the content, plus the [`Carry`] state the line leaves for its
//! successor: whether it ends inside a block comment or a multi-line
//! string, and for the latter which quote pair is open.
//!
//! Dispatch order at each position:
//!
//! 1. whitespace run
//! 2. line comment → rest of line
//! 3. block comment → to the close sequence, possibly carrying
//! 4. multi-line string start (longest configured start wins) → to its
//!    paired close, possibly carrying
//! 5. string start (longest wins) → to its paired close, escape-aware
//! 6. raw string start → same, never escape-aware
//! 7. number
//! 8. identifier → keyword / operator-word retag
//! 9. operators (3-char, then 2, then 1), then symbols, else unknown

use bitflags::bitflags;

use crate::language::{LanguageSpec, StringDelims};
use crate::token::{Token, TokenKind};

// ---------------------------------------------------------------------------
// Carry
// ---------------------------------------------------------------------------

bitflags! {
    /// The cross-line flag pair. The incremental rescan stops when a line's
    /// recomputed flags match the flags it had before the edit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct CarryFlags: u8 {
        const IN_BLOCK_COMMENT = 0b01;
        const IN_MULTILINE_STRING = 0b10;
    }
}

/// Residual tokenizer state at the end of a line.
///
/// When `flags` contains `IN_MULTILINE_STRING`, `string_open` holds the
/// `(start, end)` quote pair of the enclosing literal, so mixed quote
/// styles (`"""` vs `'''`) close correctly on a later line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Carry {
    pub flags: CarryFlags,
    pub string_open: Option<(String, String)>,
}

impl Carry {
    /// The state outside any multi-line construct.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub const fn in_block_comment(&self) -> bool {
        self.flags.contains(CarryFlags::IN_BLOCK_COMMENT)
    }

    #[inline]
    #[must_use]
    pub const fn in_multiline_string(&self) -> bool {
        self.flags.contains(CarryFlags::IN_MULTILINE_STRING)
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// A single-pass scanner for one language.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    spec: &'static LanguageSpec,
}

impl Tokenizer {
    #[must_use]
    pub const fn new(spec: &'static LanguageSpec) -> Self {
        Self { spec }
    }

    /// The language table this tokenizer was built from.
    #[must_use]
    pub const fn spec(&self) -> &'static LanguageSpec {
        self.spec
    }

    /// Tokenize one line of content (no terminal newline included).
    ///
    /// Returns the tokens tiling `[0, chars.len())` followed by a synthetic
    /// [`Newline`](TokenKind::Newline) token, and the carry state for the
    /// next line. If no multi-line boundary is crossed on this line, the
    /// returned carry equals `prev`.
    #[must_use]
    pub fn tokenize(&self, chars: &[char], prev: &Carry) -> (Vec<Token>, Carry) {
        let n = chars.len();
        let mut tokens = Vec::new();
        let mut carry = Carry::none();
        let mut i = 0;

        // Resume a construct left open by the previous line.
        if prev.in_block_comment() {
            if let Some((_, close)) = self.spec.block_comment {
                let (end, terminated) = scan_to(chars, 0, close);
                tokens.push(Token {
                    kind: TokenKind::BlockComment,
                    start: 0,
                    end,
                    terminated,
                });
                if !terminated {
                    carry.flags.insert(CarryFlags::IN_BLOCK_COMMENT);
                }
                i = end;
            }
        } else if prev.in_multiline_string() {
            if let Some((_, close)) = &prev.string_open {
                let (end, terminated) = scan_to(chars, 0, close);
                tokens.push(Token {
                    kind: TokenKind::MultilineStr,
                    start: 0,
                    end,
                    terminated,
                });
                if !terminated {
                    carry = prev.clone();
                }
                i = end;
            }
        }

        while i < n {
            let c = chars[i];

            // 1. Whitespace run.
            if c == '\t' || c.is_whitespace() {
                let start = i;
                while i < n && (chars[i] == '\t' || chars[i].is_whitespace()) {
                    i += 1;
                }
                tokens.push(Token::new(TokenKind::Whitespace, start, i));
                continue;
            }

            // 2. Line comment consumes the rest of the line.
            if let Some(lc) = self.spec.line_comment {
                if matches_at(chars, i, lc) {
                    tokens.push(Token::new(TokenKind::LineComment, i, n));
                    i = n;
                    continue;
                }
            }

            // 3. Block comment.
            if let Some((open, close)) = self.spec.block_comment {
                if matches_at(chars, i, open) {
                    let (end, terminated) = scan_to(chars, i + char_len(open), close);
                    tokens.push(Token {
                        kind: TokenKind::BlockComment,
                        start: i,
                        end,
                        terminated,
                    });
                    if !terminated {
                        carry.flags.insert(CarryFlags::IN_BLOCK_COMMENT);
                    }
                    i = end;
                    continue;
                }
            }

            // 4. Multi-line string, longest configured start first.
            if let Some((open, close)) = longest_pair_match(self.spec.multiline_strings, chars, i)
            {
                let (end, terminated) = scan_to(chars, i + char_len(open), close);
                tokens.push(Token {
                    kind: TokenKind::MultilineStr,
                    start: i,
                    end,
                    terminated,
                });
                if !terminated {
                    carry.flags.insert(CarryFlags::IN_MULTILINE_STRING);
                    carry.string_open = Some((open.to_string(), close.to_string()));
                }
                i = end;
                continue;
            }

            // 5. String, longest configured start first.
            if let Some(sd) = longest_string_match(self.spec.strings, chars, i) {
                let end = scan_string(chars, i + char_len(sd.start), sd.end, sd.escapes);
                tokens.push(Token::new(TokenKind::Str, i, end));
                i = end;
                continue;
            }

            // 6. Raw string, never escape-aware.
            if let Some(sd) = longest_string_match(self.spec.raw_strings, chars, i) {
                let end = scan_string(chars, i + char_len(sd.start), sd.end, false);
                tokens.push(Token::new(TokenKind::Str, i, end));
                i = end;
                continue;
            }

            // 7. Number: a digit, or a dot directly followed by one.
            if c.is_ascii_digit()
                || (c == '.' && chars.get(i + 1).is_some_and(char::is_ascii_digit))
            {
                let end = scan_number(chars, i);
                tokens.push(Token::new(TokenKind::Number, i, end));
                i = end;
                continue;
            }

            // 8. Identifier, retagged from the keyword / operator-word tables.
            if c.is_alphabetic() || c == '_' {
                let start = i;
                while i < n && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let kind = if self.spec.is_keyword(&word) {
                    TokenKind::Keyword
                } else if self.spec.is_word_operator(&word) {
                    TokenKind::Operator
                } else {
                    TokenKind::Ident
                };
                tokens.push(Token::new(kind, start, i));
                continue;
            }

            // 9. Operators by decreasing length, then symbols, else unknown.
            if let Some(len) = self.match_operator(chars, i) {
                tokens.push(Token::new(TokenKind::Operator, i, i + len));
                i += len;
            } else if self.spec.symbols.contains(&c) {
                tokens.push(Token::new(TokenKind::Symbol, i, i + 1));
                i += 1;
            } else {
                tokens.push(Token::new(TokenKind::Unknown, i, i + 1));
                i += 1;
            }
        }

        tokens.push(Token::new(TokenKind::Newline, n, n + 1));
        (tokens, carry)
    }

    /// Try the 3-, 2-, and 1-character operator tables in that order.
    fn match_operator(&self, chars: &[char], at: usize) -> Option<usize> {
        for op in self.spec.operators3 {
            if matches_at(chars, at, op) {
                return Some(3);
            }
        }
        for op in self.spec.operators2 {
            if matches_at(chars, at, op) {
                return Some(2);
            }
        }
        if self.spec.operators1.contains(&chars[at]) {
            return Some(1);
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Scanning helpers
// ---------------------------------------------------------------------------

/// Character count of a delimiter string (delimiters are 1–3 characters).
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Does `pat` occur at character position `at`?
fn matches_at(chars: &[char], at: usize, pat: &str) -> bool {
    let mut j = at;
    for pc in pat.chars() {
        if chars.get(j) != Some(&pc) {
            return false;
        }
        j += 1;
    }
    true
}

/// Scan from `from` to just past the first occurrence of `close`.
///
/// Returns `(end, terminated)`; when `close` never occurs, `end` is the
/// line length and `terminated` is false.
fn scan_to(chars: &[char], from: usize, close: &str) -> (usize, bool) {
    let mut j = from;
    while j < chars.len() {
        if matches_at(chars, j, close) {
            return (j + char_len(close), true);
        }
        j += 1;
    }
    (chars.len(), false)
}

/// Scan a single-line string body from `from` to just past `close`,
/// honoring backslash escapes when asked. An unterminated string runs to
/// the end of the line.
fn scan_string(chars: &[char], from: usize, close: &str, escapes: bool) -> usize {
    let n = chars.len();
    let mut j = from;
    while j < n {
        if escapes && chars[j] == '\\' {
            j = (j + 2).min(n);
            continue;
        }
        if matches_at(chars, j, close) {
            return j + char_len(close);
        }
        j += 1;
    }
    n
}

/// Scan a numeric literal: digit run with `_` separators, optional
/// fraction, optional exponent with sign.
fn scan_number(chars: &[char], from: usize) -> usize {
    let n = chars.len();
    let mut j = from;

    while j < n && (chars[j].is_ascii_digit() || chars[j] == '_') {
        j += 1;
    }

    if j < n && chars[j] == '.' && chars.get(j + 1).is_some_and(char::is_ascii_digit) {
        j += 1;
        while j < n && (chars[j].is_ascii_digit() || chars[j] == '_') {
            j += 1;
        }
    }

    if j < n && (chars[j] == 'e' || chars[j] == 'E') {
        let mut k = j + 1;
        if k < n && (chars[k] == '+' || chars[k] == '-') {
            k += 1;
        }
        if k < n && chars[k].is_ascii_digit() {
            j = k;
            while j < n && (chars[j].is_ascii_digit() || chars[j] == '_') {
                j += 1;
            }
        }
    }

    j
}

fn longest_string_match<'a>(
    kinds: &'a [StringDelims],
    chars: &[char],
    at: usize,
) -> Option<&'a StringDelims> {
    kinds
        .iter()
        .filter(|k| matches_at(chars, at, k.start))
        .max_by_key(|k| char_len(k.start))
}

fn longest_pair_match(
    pairs: &[(&'static str, &'static str)],
    chars: &[char],
    at: usize,
) -> Option<(&'static str, &'static str)> {
    pairs
        .iter()
        .filter(|(start, _)| matches_at(chars, at, start))
        .max_by_key(|(start, _)| char_len(start))
        .copied()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{GO, PYTHON};

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn go(line: &str) -> (Vec<Token>, Carry) {
        Tokenizer::new(&GO).tokenize(&chars(line), &Carry::none())
    }

    fn py(line: &str) -> (Vec<Token>, Carry) {
        Tokenizer::new(&PYTHON).tokenize(&chars(line), &Carry::none())
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    /// Tokens must tile `[0, n)` without gaps and end in a newline token.
    fn assert_tiles(tokens: &[Token], n: usize) {
        let mut pos = 0;
        for t in &tokens[..tokens.len() - 1] {
            assert_eq!(t.start, pos, "gap before {t:?}");
            assert!(t.end > t.start, "empty token {t:?}");
            pos = t.end;
        }
        assert_eq!(pos, n);
        let nl = tokens.last().unwrap();
        assert_eq!(nl.kind, TokenKind::Newline);
        assert_eq!((nl.start, nl.end), (n, n + 1));
    }

    // -- Dispatch -----------------------------------------------------------

    #[test]
    fn empty_line_yields_only_newline() {
        let (tokens, carry) = go("");
        assert_eq!(kinds(&tokens), [TokenKind::Newline]);
        assert_eq!(carry, Carry::none());
    }

    #[test]
    fn keywords_and_idents() {
        let (tokens, _) = go("func turtle");
        assert_eq!(
            kinds(&tokens),
            [
                TokenKind::Keyword,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::Newline,
            ]
        );
        assert_tiles(&tokens, 11);
    }

    #[test]
    fn line_comment_consumes_rest() {
        let (tokens, _) = go("x // y := 1");
        assert_eq!(
            kinds(&tokens),
            [
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::LineComment,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn numbers() {
        for line in ["42", "1_000", "3.25", ".5", "1e9", "6.02e+23", "1E-3"] {
            let (tokens, _) = go(line);
            assert_eq!(tokens[0].kind, TokenKind::Number, "{line}");
            assert_eq!(tokens[0].end, line.chars().count(), "{line}");
        }
    }

    #[test]
    fn dot_without_digit_is_a_symbol() {
        let (tokens, _) = go("a.b");
        assert_eq!(
            kinds(&tokens),
            [
                TokenKind::Ident,
                TokenKind::Symbol,
                TokenKind::Ident,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn operators_prefer_longest() {
        let (tokens, _) = go("a <<= 1");
        assert_eq!(tokens[2].kind, TokenKind::Operator);
        assert_eq!(tokens[2].len(), 3);

        let (tokens, _) = go("a << 1");
        assert_eq!(tokens[2].len(), 2);

        let (tokens, _) = go("a < 1");
        assert_eq!(tokens[2].len(), 1);
    }

    #[test]
    fn unknown_advances_one() {
        let (tokens, _) = go("a?b");
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!((tokens[1].start, tokens[1].end), (1, 2));
    }

    #[test]
    fn tab_is_whitespace() {
        let (tokens, _) = go("\tx");
        assert_eq!(tokens[0].kind, TokenKind::Whitespace);
    }

    // -- Strings ------------------------------------------------------------

    #[test]
    fn string_with_escape() {
        let (tokens, _) = go(r#""a\"b" x"#);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].end, 6);
    }

    #[test]
    fn unterminated_string_runs_to_eol() {
        let (tokens, carry) = go("\"abc");
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].end, 4);
        assert_eq!(carry, Carry::none());
    }

    #[test]
    fn trailing_backslash_does_not_overrun() {
        let (tokens, _) = go("\"a\\");
        assert_eq!(tokens[0].end, 3);
    }

    #[test]
    fn python_prefixed_strings() {
        let (tokens, _) = py(r#"b"x" + f'y'"#);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].end, 4);
        assert_eq!(tokens[4].kind, TokenKind::Str);
    }

    #[test]
    fn python_raw_string_ignores_escapes() {
        // The backslash before the closing quote is literal in r"…".
        let (tokens, _) = py(r#"r"a\" x"#);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].end, 5);
    }

    // -- Block comments and carry -------------------------------------------

    #[test]
    fn block_comment_same_line() {
        let (tokens, carry) = go("a /* b */ c");
        assert_eq!(tokens[2].kind, TokenKind::BlockComment);
        assert!(tokens[2].terminated);
        assert_eq!(carry, Carry::none());
    }

    #[test]
    fn block_comment_carries_forward() {
        let (tokens, carry) = go("a /* b");
        let bc = tokens[2];
        assert_eq!(bc.kind, TokenKind::BlockComment);
        assert!(!bc.terminated);
        assert_eq!(bc.end, 6);
        assert!(carry.in_block_comment());

        let (tokens, carry) = Tokenizer::new(&GO).tokenize(&chars("still */ x"), &carry);
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert!(tokens[0].terminated);
        assert_eq!(tokens[0].end, 8);
        assert_eq!(tokens[2].kind, TokenKind::Ident);
        assert_eq!(carry, Carry::none());
    }

    #[test]
    fn block_comment_spanning_three_lines() {
        let tk = Tokenizer::new(&GO);
        let (_, c1) = tk.tokenize(&chars("/* open"), &Carry::none());
        let (tokens, c2) = tk.tokenize(&chars("middle"), &c1);
        assert_eq!(kinds(&tokens), [TokenKind::BlockComment, TokenKind::Newline]);
        assert!(c2.in_block_comment());
        let (_, c3) = tk.tokenize(&chars("done */"), &c2);
        assert_eq!(c3, Carry::none());
    }

    // -- Multi-line strings --------------------------------------------------

    #[test]
    fn go_backtick_string_carries() {
        let tk = Tokenizer::new(&GO);
        let (tokens, carry) = tk.tokenize(&chars("s := `raw"), &Carry::none());
        let mls = tokens.iter().find(|t| t.kind == TokenKind::MultilineStr).unwrap();
        assert!(!mls.terminated);
        assert!(carry.in_multiline_string());
        assert_eq!(
            carry.string_open,
            Some(("`".to_string(), "`".to_string()))
        );

        let (tokens, carry) = tk.tokenize(&chars("end` + x"), &carry);
        assert_eq!(tokens[0].kind, TokenKind::MultilineStr);
        assert!(tokens[0].terminated);
        assert_eq!(tokens[0].end, 4);
        assert_eq!(carry, Carry::none());
    }

    #[test]
    fn python_triple_quote_styles_do_not_mix() {
        let tk = Tokenizer::new(&PYTHON);
        let (_, carry) = tk.tokenize(&chars("s = '''doc"), &Carry::none());
        assert!(carry.in_multiline_string());

        // A """ inside an open ''' literal does not close it.
        let (tokens, carry) = tk.tokenize(&chars("has \"\"\" inside"), &carry);
        assert_eq!(kinds(&tokens), [TokenKind::MultilineStr, TokenKind::Newline]);
        assert!(carry.in_multiline_string());

        let (tokens, carry) = tk.tokenize(&chars("done'''"), &carry);
        assert!(tokens[0].terminated);
        assert_eq!(carry, Carry::none());
    }

    #[test]
    fn triple_quote_closed_same_line() {
        let (tokens, carry) = py(r#"x = """ok""" + 1"#);
        let mls = tokens.iter().find(|t| t.kind == TokenKind::MultilineStr).unwrap();
        assert!(mls.terminated);
        assert_eq!(mls.len(), 8);
        assert_eq!(carry, Carry::none());
    }

    #[test]
    fn python_word_operators_tokenize_as_operators() {
        let (tokens, _) = py("a is not b");
        assert_eq!(
            kinds(&tokens),
            [
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::Operator,
                TokenKind::Whitespace,
                TokenKind::Operator,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::Newline,
            ]
        );
    }

    // -- Tiling invariant ----------------------------------------------------

    #[test]
    fn tokens_tile_every_line() {
        let lines = [
            "func main() { fmt.Println(\"hi\") }",
            "\tx := []int{1, 2, 3} // trailing",
            "a /* b */ c `start",
            "if x <= 10_000 && y != .5e3 {",
            "???",
            "",
        ];
        for line in lines {
            let cs = chars(line);
            let (tokens, _) = Tokenizer::new(&GO).tokenize(&cs, &Carry::none());
            assert_tiles(&tokens, cs.len());
        }
    }

    #[test]
    fn carry_flags_equality_drives_rescan() {
        let a = Carry {
            flags: CarryFlags::IN_MULTILINE_STRING,
            string_open: Some(("'''".into(), "'''".into())),
        };
        let b = Carry {
            flags: CarryFlags::IN_MULTILINE_STRING,
            string_open: Some(("\"\"\"".into(), "\"\"\"".into())),
        };
        // Same flags, different quote pairs: the flag comparison alone
        // treats them alike.
        assert_eq!(a.flags, b.flags);
        assert_ne!(a, b);
    }
}
