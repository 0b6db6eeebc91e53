//! Theme palettes — 256-color assignments per token kind.
//!
//! Five builtin palettes, named after the Doraemon cast. Each maps token
//! kinds to `Option<u8>` palette indices; `None` means the terminal's
//! default foreground. Plain identifiers are uncolored in every theme so
//! prose-heavy code stays readable.

use crate::token::TokenKind;

/// A fixed color table for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub ident: Option<u8>,
    pub keyword: Option<u8>,
    pub operator: Option<u8>,
    pub symbol: Option<u8>,
    pub string: Option<u8>,
    pub multiline_string: Option<u8>,
    pub number: Option<u8>,
    pub line_comment: Option<u8>,
    pub block_comment: Option<u8>,
}

impl Theme {
    /// The color assigned to a token kind. Whitespace, newlines, and
    /// unclassified characters are never colored.
    #[must_use]
    pub const fn token_color(&self, kind: TokenKind) -> Option<u8> {
        match kind {
            TokenKind::Ident => self.ident,
            TokenKind::Keyword => self.keyword,
            TokenKind::Operator => self.operator,
            TokenKind::Symbol => self.symbol,
            TokenKind::Str => self.string,
            TokenKind::MultilineStr => self.multiline_string,
            TokenKind::Number => self.number,
            TokenKind::LineComment => self.line_comment,
            TokenKind::BlockComment => self.block_comment,
            TokenKind::Unknown | TokenKind::Whitespace | TokenKind::Newline => None,
        }
    }
}

/// The muted gutter color shared by every theme.
pub const LINE_NUMBER_COLOR: u8 = 243;

// ---------------------------------------------------------------------------
// Builtin palettes
// ---------------------------------------------------------------------------

/// Blue, gadget-forward. The default.
pub static DORAEMON: Theme = Theme {
    name: "doraemon",
    ident: None,
    keyword: Some(39),
    operator: Some(38),
    symbol: Some(67),
    string: Some(220),
    multiline_string: Some(214),
    number: Some(203),
    line_comment: Some(247),
    block_comment: Some(247),
};

/// Warm yellows.
pub static NOBITA: Theme = Theme {
    name: "nobita",
    ident: None,
    keyword: Some(178),
    operator: Some(172),
    symbol: Some(137),
    string: Some(107),
    multiline_string: Some(108),
    number: Some(75),
    line_comment: Some(245),
    block_comment: Some(245),
};

/// Soft pinks.
pub static SHIZUKA: Theme = Theme {
    name: "shizuka",
    ident: None,
    keyword: Some(175),
    operator: Some(168),
    symbol: Some(132),
    string: Some(114),
    multiline_string: Some(115),
    number: Some(111),
    line_comment: Some(246),
    block_comment: Some(246),
};

/// Teal with sand accents.
pub static SUNEO: Theme = Theme {
    name: "suneo",
    ident: None,
    keyword: Some(80),
    operator: Some(44),
    symbol: Some(30),
    string: Some(186),
    multiline_string: Some(187),
    number: Some(141),
    line_comment: Some(244),
    block_comment: Some(244),
};

/// Loud orange.
pub static GIAN: Theme = Theme {
    name: "gian",
    ident: None,
    keyword: Some(208),
    operator: Some(203),
    symbol: Some(130),
    string: Some(112),
    multiline_string: Some(113),
    number: Some(81),
    line_comment: Some(240),
    block_comment: Some(240),
};

/// Look up a builtin theme by name or alias.
///
/// Returns `None` if the name is not recognized.
#[must_use]
pub fn builtin_theme(name: &str) -> Option<&'static Theme> {
    match name {
        "doraemon" => Some(&DORAEMON),
        "noby" | "nobita" => Some(&NOBITA),
        "sue" | "shizuka" => Some(&SHIZUKA),
        "sneech" | "suneo" => Some(&SUNEO),
        "big-g" | "gian" => Some(&GIAN),
        _ => None,
    }
}

/// Every accepted `--theme` argument.
#[must_use]
pub const fn builtin_names() -> &'static [&'static str] {
    &[
        "doraemon", "noby", "nobita", "sue", "shizuka", "sneech", "suneo", "big-g", "gian",
    ]
}
