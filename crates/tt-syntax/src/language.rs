//! Language tables for the configurable tokenizer.
//!
//! Each supported language is one static [`LanguageSpec`]. The tokenizer
//! itself knows nothing about Go or Python — it only consults these tables.
//! Adding a language means adding a table, not touching the scanner.

/// Delimiters of a single-line string kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringDelims {
    /// Opening sequence, 1–3 characters (`"`, `b"`, `f'`, …).
    pub start: &'static str,
    /// Closing sequence, 1–3 characters.
    pub end: &'static str,
    /// When true, `\x` inside the literal skips both characters.
    pub escapes: bool,
}

/// Static description of one language's lexical surface.
#[derive(Debug, Clone, Copy)]
pub struct LanguageSpec {
    pub name: &'static str,
    /// Comment running to end of line (`//`, `#`).
    pub line_comment: Option<&'static str>,
    /// Block comment open/close pair (`/*`, `*/`).
    pub block_comment: Option<(&'static str, &'static str)>,
    /// Single-line string kinds, escape-aware per entry.
    pub strings: &'static [StringDelims],
    /// Single-line string kinds that never honor escapes (`r"…"`).
    pub raw_strings: &'static [StringDelims],
    /// Multi-line string open/close pairs, 1–3 characters each.
    pub multiline_strings: &'static [(&'static str, &'static str)],
    /// Identifiers highlighted as keywords. Sorted roughly by category for
    /// readability; lookup is a linear scan.
    pub keywords: &'static [&'static str],
    /// Identifiers emitted as operators instead of keywords or plain
    /// identifiers (`and`, `is`, …).
    pub word_operators: &'static [&'static str],
    /// Single-character punctuation.
    pub symbols: &'static [char],
    /// Three-character operators, tried first.
    pub operators3: &'static [&'static str],
    /// Two-character operators.
    pub operators2: &'static [&'static str],
    /// One-character operators, tried after the longer tables.
    pub operators1: &'static [char],
}

impl LanguageSpec {
    /// True if `word` is in the keyword table.
    #[must_use]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(&word)
    }

    /// True if `word` is an operator word (`and`, `in`, …).
    #[must_use]
    pub fn is_word_operator(&self, word: &str) -> bool {
        self.word_operators.contains(&word)
    }
}

// ---------------------------------------------------------------------------
// Go
// ---------------------------------------------------------------------------

/// Go. Keywords cover the language proper, the builtin functions and types,
/// and the common standard-library package names, all highlighted alike.
pub static GO: LanguageSpec = LanguageSpec {
    name: "go",
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    strings: &[
        StringDelims { start: "\"", end: "\"", escapes: true },
        StringDelims { start: "'", end: "'", escapes: true },
    ],
    raw_strings: &[],
    // Backtick strings span lines and ignore escapes.
    multiline_strings: &[("`", "`")],
    keywords: &[
        // language
        "break", "case", "chan", "const", "continue", "default", "defer",
        "else", "fallthrough", "for", "func", "go", "goto", "if", "import",
        "interface", "map", "package", "range", "return", "select", "struct",
        "switch", "type", "var",
        // builtin functions
        "append", "cap", "clear", "close", "complex", "copy", "delete",
        "imag", "len", "make", "max", "min", "new", "panic", "print",
        "println", "real", "recover",
        // builtin types and constants
        "any", "bool", "byte", "comparable", "complex128", "complex64",
        "error", "false", "float32", "float64", "int", "int16", "int32",
        "int64", "int8", "iota", "nil", "rune", "string", "true", "uint",
        "uint16", "uint32", "uint64", "uint8", "uintptr",
        // standard-library packages
        "bufio", "bytes", "cmp", "context", "errors", "flag", "fmt", "io",
        "math", "net", "os", "path", "reflect", "regexp", "runtime",
        "slices", "sort", "strconv", "strings", "sync", "testing", "time",
        "unicode", "utf8",
    ],
    word_operators: &[],
    symbols: &['(', ')', '[', ']', '{', '}', ',', ';', '.'],
    operators3: &["<<=", ">>=", "&^=", "..."],
    operators2: &[
        ":=", "==", "!=", "<=", ">=", "&&", "||", "<-", "++", "--", "+=",
        "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^",
    ],
    operators1: &['+', '-', '*', '/', '%', '&', '|', '^', '<', '>', '=', '!', ':'],
};

// ---------------------------------------------------------------------------
// Python
// ---------------------------------------------------------------------------

/// Python. `and or not is in` live in the operator-word table, so they
/// render as operators like their symbolic counterparts. Triple-quoted
/// strings of both quote styles carry across lines; `b`/`f` prefixes give
/// the two-character string starts, `r` prefixes the raw ones.
pub static PYTHON: LanguageSpec = LanguageSpec {
    name: "python",
    line_comment: Some("#"),
    block_comment: None,
    strings: &[
        StringDelims { start: "\"", end: "\"", escapes: true },
        StringDelims { start: "'", end: "'", escapes: true },
        StringDelims { start: "b\"", end: "\"", escapes: true },
        StringDelims { start: "b'", end: "'", escapes: true },
        StringDelims { start: "f\"", end: "\"", escapes: true },
        StringDelims { start: "f'", end: "'", escapes: true },
    ],
    raw_strings: &[
        StringDelims { start: "r\"", end: "\"", escapes: false },
        StringDelims { start: "r'", end: "'", escapes: false },
    ],
    multiline_strings: &[("\"\"\"", "\"\"\""), ("'''", "'''")],
    keywords: &[
        // language
        "False", "None", "True", "as", "assert", "async", "await", "break",
        "class", "continue", "def", "del", "elif", "else", "except",
        "finally", "for", "from", "global", "if", "import", "lambda",
        "nonlocal", "pass", "raise", "return", "try", "while", "with",
        "yield",
        // builtins
        "abs", "bool", "bytes", "dict", "enumerate", "float", "frozenset",
        "int", "isinstance", "len", "list", "max", "min", "object", "open",
        "print", "range", "repr", "set", "sorted", "str", "sum", "super",
        "tuple", "type", "zip",
    ],
    word_operators: &["and", "or", "not", "is", "in"],
    symbols: &['(', ')', '[', ']', '{', '}', ',', ';', '.', '@'],
    operators3: &["**=", "//=", ">>=", "<<="],
    operators2: &[
        "**", "//", "==", "!=", "<=", ">=", "+=", "-=", "*=", "/=", "%=",
        "&=", "|=", "^=", "->", ":=", ">>", "<<",
    ],
    operators1: &['+', '-', '*', '/', '%', '&', '|', '^', '<', '>', '=', '~', ':'],
};
