//! Token kinds, the token record and the operator precedence table.
//!
//! `TokenKind` is ordered: keywords form one contiguous block bounded by
//! [`KEYWORD_LOW`] and [`KEYWORD_HIGH`], and [`TokenKind::is_keyword`] is a
//! range check on the discriminant. The keyword block is laid out in the same
//! order as the interner's reserved keyword ids, so `id + 2` is the
//! discriminant of the keyword's kind.

use crate::interner::{Ident, KEYWORD_ID_HIGH, KEYWORD_ID_LOW, OPERATOR_ID_HIGH, OPERATOR_ID_LOW};
use std::borrow::Cow;
use std::fmt;

/// Token classification.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TokenKind {
    #[default]
    Invalid,
    Eof,
    Symbol,

    // === Keywords (contiguous, alphabetical) ===
    Addr,
    And,
    As,
    Asm,
    Bind,
    Block,
    Break,
    Case,
    Cast,
    Concept,
    Const,
    Continue,
    Converter,
    Defer,
    Discard,
    Distinct,
    Div,
    Do,
    Elif,
    Else,
    End,
    Enum,
    Except,
    Export,
    Finally,
    For,
    From,
    Func,
    If,
    Import,
    In,
    Include,
    Interface,
    Is,
    Isnot,
    Iterator,
    Let,
    Macro,
    Method,
    Mixin,
    Mod,
    Nil,
    Not,
    Notin,
    Object,
    Of,
    Or,
    Out,
    Proc,
    Ptr,
    Raise,
    Ref,
    Return,
    Shl,
    Shr,
    Static,
    Template,
    Try,
    Tuple,
    Type,
    Using,
    Var,
    When,
    While,
    Xor,
    Yield,

    // === Literals ===
    IntLit,
    Int8Lit,
    Int16Lit,
    Int32Lit,
    Int64Lit,
    UIntLit,
    UInt8Lit,
    UInt16Lit,
    UInt32Lit,
    UInt64Lit,
    FloatLit,
    Float32Lit,
    Float64Lit,
    Float128Lit,
    StrLit,
    RStrLit,
    TripleStrLit,
    GStrLit,
    GTripleStrLit,
    CharLit,

    // === Punctuation ===
    ParLe,
    ParRi,
    BracketLe,
    BracketRi,
    CurlyLe,
    CurlyRi,
    /// `[.`
    BracketDotLe,
    /// `.]`
    BracketDotRi,
    /// `{.`
    CurlyDotLe,
    /// `.}`
    CurlyDotRi,
    /// `(.`
    ParDotLe,
    /// `.)`
    ParDotRi,
    Comma,
    SemiColon,
    Colon,
    ColonColon,
    Equals,
    Dot,
    DotDot,
    /// `[:`
    BracketLeColon,

    /// Any operator without a dedicated kind.
    Opr,
    Comment,
    /// `` ` ``
    Accent,

    // === Formatting pseudo-tokens, never produced by the lexer ===
    Spaces,
    InfixOpr,
    PrefixOpr,
    PostfixOpr,
}

/// First keyword kind.
pub const KEYWORD_LOW: TokenKind = TokenKind::Addr;
/// Last keyword kind.
pub const KEYWORD_HIGH: TokenKind = TokenKind::Yield;

/// Keyword kinds and their spelling, in discriminant order.
pub const KEYWORDS: [(TokenKind, &str); 66] = [
    (TokenKind::Addr, "addr"),
    (TokenKind::And, "and"),
    (TokenKind::As, "as"),
    (TokenKind::Asm, "asm"),
    (TokenKind::Bind, "bind"),
    (TokenKind::Block, "block"),
    (TokenKind::Break, "break"),
    (TokenKind::Case, "case"),
    (TokenKind::Cast, "cast"),
    (TokenKind::Concept, "concept"),
    (TokenKind::Const, "const"),
    (TokenKind::Continue, "continue"),
    (TokenKind::Converter, "converter"),
    (TokenKind::Defer, "defer"),
    (TokenKind::Discard, "discard"),
    (TokenKind::Distinct, "distinct"),
    (TokenKind::Div, "div"),
    (TokenKind::Do, "do"),
    (TokenKind::Elif, "elif"),
    (TokenKind::Else, "else"),
    (TokenKind::End, "end"),
    (TokenKind::Enum, "enum"),
    (TokenKind::Except, "except"),
    (TokenKind::Export, "export"),
    (TokenKind::Finally, "finally"),
    (TokenKind::For, "for"),
    (TokenKind::From, "from"),
    (TokenKind::Func, "func"),
    (TokenKind::If, "if"),
    (TokenKind::Import, "import"),
    (TokenKind::In, "in"),
    (TokenKind::Include, "include"),
    (TokenKind::Interface, "interface"),
    (TokenKind::Is, "is"),
    (TokenKind::Isnot, "isnot"),
    (TokenKind::Iterator, "iterator"),
    (TokenKind::Let, "let"),
    (TokenKind::Macro, "macro"),
    (TokenKind::Method, "method"),
    (TokenKind::Mixin, "mixin"),
    (TokenKind::Mod, "mod"),
    (TokenKind::Nil, "nil"),
    (TokenKind::Not, "not"),
    (TokenKind::Notin, "notin"),
    (TokenKind::Object, "object"),
    (TokenKind::Of, "of"),
    (TokenKind::Or, "or"),
    (TokenKind::Out, "out"),
    (TokenKind::Proc, "proc"),
    (TokenKind::Ptr, "ptr"),
    (TokenKind::Raise, "raise"),
    (TokenKind::Ref, "ref"),
    (TokenKind::Return, "return"),
    (TokenKind::Shl, "shl"),
    (TokenKind::Shr, "shr"),
    (TokenKind::Static, "static"),
    (TokenKind::Template, "template"),
    (TokenKind::Try, "try"),
    (TokenKind::Tuple, "tuple"),
    (TokenKind::Type, "type"),
    (TokenKind::Using, "using"),
    (TokenKind::Var, "var"),
    (TokenKind::When, "when"),
    (TokenKind::While, "while"),
    (TokenKind::Xor, "xor"),
    (TokenKind::Yield, "yield"),
];

/// Operators with a dedicated kind, in interner id order.
pub const PUNCT_OPERATORS: [(TokenKind, &str); 5] = [
    (TokenKind::Colon, ":"),
    (TokenKind::ColonColon, "::"),
    (TokenKind::Equals, "="),
    (TokenKind::Dot, "."),
    (TokenKind::DotDot, ".."),
];

impl TokenKind {
    /// Range check against the keyword block.
    #[inline]
    pub const fn is_keyword(self) -> bool {
        let k = self as u8;
        k >= KEYWORD_LOW as u8 && k <= KEYWORD_HIGH as u8
    }

    /// Tokens after which the parser may relax layout rules.
    pub const fn is_weak(self) -> bool {
        matches!(
            self,
            TokenKind::Comma
                | TokenKind::SemiColon
                | TokenKind::Colon
                | TokenKind::ParRi
                | TokenKind::ParDotRi
                | TokenKind::BracketRi
                | TokenKind::BracketDotRi
                | TokenKind::CurlyRi
        )
    }

    #[inline]
    pub const fn is_int_literal(self) -> bool {
        let k = self as u8;
        k >= TokenKind::IntLit as u8 && k <= TokenKind::UInt64Lit as u8
    }

    #[inline]
    pub const fn is_unsigned_literal(self) -> bool {
        let k = self as u8;
        k >= TokenKind::UIntLit as u8 && k <= TokenKind::UInt64Lit as u8
    }

    #[inline]
    pub const fn is_float_literal(self) -> bool {
        let k = self as u8;
        k >= TokenKind::FloatLit as u8 && k <= TokenKind::Float128Lit as u8
    }

    #[inline]
    pub const fn is_string_literal(self) -> bool {
        let k = self as u8;
        k >= TokenKind::StrLit as u8 && k <= TokenKind::GTripleStrLit as u8
    }

    /// Keyword kind for an interned identifier id, if the id is reserved.
    pub fn from_ident_id(id: u32) -> Option<TokenKind> {
        if (KEYWORD_ID_LOW..=KEYWORD_ID_HIGH).contains(&id) {
            Some(KEYWORDS[(id - KEYWORD_ID_LOW) as usize].0)
        } else {
            None
        }
    }

    /// Punctuation kind for an interned operator id, if the id is reserved.
    pub fn from_operator_id(id: u32) -> Option<TokenKind> {
        if (OPERATOR_ID_LOW..=OPERATOR_ID_HIGH).contains(&id) {
            Some(PUNCT_OPERATORS[(id - OPERATOR_ID_LOW) as usize].0)
        } else {
            None
        }
    }

    /// Precedence of the word operators and `..`.
    pub const fn word_precedence(self) -> Option<i32> {
        match self {
            TokenKind::Div | TokenKind::Mod | TokenKind::Shl | TokenKind::Shr => Some(9),
            TokenKind::In
            | TokenKind::Notin
            | TokenKind::Is
            | TokenKind::Isnot
            | TokenKind::Not
            | TokenKind::Of
            | TokenKind::As => Some(5),
            TokenKind::DotDot => Some(6),
            TokenKind::And => Some(4),
            TokenKind::Or | TokenKind::Xor | TokenKind::Ptr | TokenKind::Ref => Some(3),
            _ => None,
        }
    }

    /// Spelling for keywords and punctuation, a short name otherwise.
    pub fn display_name(self) -> &'static str {
        if self.is_keyword() {
            return KEYWORDS[(self as u8 - KEYWORD_LOW as u8) as usize].1;
        }
        match self {
            TokenKind::Invalid => "invalid",
            TokenKind::Eof => "[EOF]",
            TokenKind::Symbol => "identifier",
            TokenKind::IntLit => "int literal",
            TokenKind::Int8Lit => "int8 literal",
            TokenKind::Int16Lit => "int16 literal",
            TokenKind::Int32Lit => "int32 literal",
            TokenKind::Int64Lit => "int64 literal",
            TokenKind::UIntLit => "uint literal",
            TokenKind::UInt8Lit => "uint8 literal",
            TokenKind::UInt16Lit => "uint16 literal",
            TokenKind::UInt32Lit => "uint32 literal",
            TokenKind::UInt64Lit => "uint64 literal",
            TokenKind::FloatLit => "float literal",
            TokenKind::Float32Lit => "float32 literal",
            TokenKind::Float64Lit => "float64 literal",
            TokenKind::Float128Lit => "float128 literal",
            TokenKind::StrLit => "string literal",
            TokenKind::RStrLit => "raw string literal",
            TokenKind::TripleStrLit => "triple-quoted string literal",
            TokenKind::GStrLit => "generalized string literal",
            TokenKind::GTripleStrLit => "generalized triple-quoted string literal",
            TokenKind::CharLit => "character literal",
            TokenKind::ParLe => "(",
            TokenKind::ParRi => ")",
            TokenKind::BracketLe => "[",
            TokenKind::BracketRi => "]",
            TokenKind::CurlyLe => "{",
            TokenKind::CurlyRi => "}",
            TokenKind::BracketDotLe => "[.",
            TokenKind::BracketDotRi => ".]",
            TokenKind::CurlyDotLe => "{.",
            TokenKind::CurlyDotRi => ".}",
            TokenKind::ParDotLe => "(.",
            TokenKind::ParDotRi => ".)",
            TokenKind::Comma => ",",
            TokenKind::SemiColon => ";",
            TokenKind::Colon => ":",
            TokenKind::ColonColon => "::",
            TokenKind::Equals => "=",
            TokenKind::Dot => ".",
            TokenKind::DotDot => "..",
            TokenKind::BracketLeColon => "[:",
            TokenKind::Opr => "operator",
            TokenKind::Comment => "comment",
            TokenKind::Accent => "`",
            TokenKind::Spaces => "spaces",
            TokenKind::InfixOpr => "infix operator",
            TokenKind::PrefixOpr => "prefix operator",
            TokenKind::PostfixOpr => "postfix operator",
            // Keywords handled above.
            _ => "keyword",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Radix a numeric literal was written in.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum NumericalBase {
    #[default]
    Base10,
    Base2,
    Base8,
    Base16,
}

/// Characters that make up operators.
pub const OPERATOR_CHARS: &[u8] = b"+-*/\\<>!?^.|=%&$@~:";

#[inline]
pub const fn is_operator_char(b: u8) -> bool {
    matches!(
        b,
        b'+' | b'-'
            | b'*'
            | b'/'
            | b'\\'
            | b'<'
            | b'>'
            | b'!'
            | b'?'
            | b'^'
            | b'.'
            | b'|'
            | b'='
            | b'%'
            | b'&'
            | b'$'
            | b'@'
            | b'~'
            | b':'
    )
}

/// Letters and bytes of multi-byte UTF-8 sequences.
#[inline]
pub const fn is_symbol_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b >= 0x80
}

/// Symbol start characters plus digits. `_` is handled separately.
#[inline]
pub const fn is_symbol_char(b: u8) -> bool {
    is_symbol_start(b) || b.is_ascii_digit()
}

/// Whether `text` is a well-formed identifier: a symbol start character
/// followed by symbol characters, with underscores only between two symbol
/// characters.
pub fn is_identifier(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(&b) if is_symbol_start(b) => {}
        _ => return false,
    }
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == b'_' {
            i += 1;
        }
        if i >= bytes.len() || !is_symbol_char(bytes[i]) {
            return false;
        }
        i += 1;
    }
    true
}

/// Precedence of a generic operator from its spelling, in `1..=10`.
///
/// Arrow-like operators (`->`, `~>`, `=>`) bind loosest. Operators ending in
/// `=` are assignment-like and also get 1, unless their first character
/// makes them a comparison.
pub fn operator_precedence(text: &str) -> i32 {
    let bytes = text.as_bytes();
    let (Some(&first), Some(&last)) = (bytes.first(), bytes.last()) else {
        return 2;
    };
    let len = bytes.len();
    if len > 1 && last == b'>' && matches!(bytes[len - 2], b'-' | b'~' | b'=') {
        return 1;
    }
    let assign = |value: i32| if len > 1 && last == b'=' { 1 } else { value };
    match first {
        b'$' | b'^' => assign(10),
        b'*' | b'%' | b'/' | b'\\' => assign(9),
        b'~' => 8,
        b'+' | b'-' | b'|' => assign(8),
        b'&' => assign(7),
        b'=' | b'<' | b'>' | b'!' => 5,
        b'.' => assign(6),
        b'?' => 2,
        _ => assign(2),
    }
}

/// Precedence of a bare identifier, strong spaces off. Keyword and
/// punctuation operator ids use their dedicated kind, anything else is
/// treated as a generic operator.
pub fn precedence_of_ident(ident: Ident) -> i32 {
    let mut tok = Token::new();
    tok.kind = TokenKind::from_ident_id(ident.id())
        .or_else(|| TokenKind::from_operator_id(ident.id()))
        .unwrap_or(TokenKind::Opr);
    tok.ident = Some(ident);
    tok.precedence(false)
}

/// One lexed token.
///
/// Filled in place by the lexer; the caller may reuse one record across
/// calls via [`Token::reset`].
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Indentation of the line when this is its first token.
    pub indent: Option<u32>,
    /// Interned text of symbols, keywords and operators.
    pub ident: Option<Ident>,
    /// Integer value. Doc comments store their merged line count here.
    pub int_value: i64,
    pub float_value: f64,
    pub base: NumericalBase,
    /// Decoded string/char contents, comment text, or the raw text of a
    /// numeric or invalid token.
    pub literal: Vec<u8>,
    pub line: u32,
    pub col: u32,
    /// Spaces directly before the token on the same line.
    pub strong_space_a: u8,
    /// Spaces after an operator; `None` when a line end or the end of
    /// input follows.
    pub strong_space_b: Option<u8>,
}

impl Token {
    pub fn new() -> Self {
        Token {
            kind: TokenKind::Invalid,
            indent: None,
            ident: None,
            int_value: 0,
            float_value: 0.0,
            base: NumericalBase::Base10,
            literal: Vec::new(),
            line: 0,
            col: 0,
            strong_space_a: 0,
            strong_space_b: Some(0),
        }
    }

    /// Return to the freshly constructed state, keeping the literal's
    /// allocation.
    pub fn reset(&mut self) {
        self.kind = TokenKind::Invalid;
        self.indent = None;
        self.ident = None;
        self.int_value = 0;
        self.float_value = 0.0;
        self.base = NumericalBase::Base10;
        self.literal.clear();
        self.line = 0;
        self.col = 0;
        self.strong_space_a = 0;
        self.strong_space_b = Some(0);
    }

    /// The literal as text, replacing invalid UTF-8.
    pub fn literal_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.literal)
    }

    /// Text of the interned identifier, or `""`.
    pub fn ident_str(&self) -> &'static str {
        self.ident.map_or("", Ident::as_str)
    }

    /// Like `Display`, but keywords read as `keyword <name>`.
    pub fn pretty(&self) -> String {
        if self.kind.is_keyword() {
            format!("keyword {}", self.kind.display_name())
        } else {
            self.to_string()
        }
    }

    /// Binding strength for the parser: 1..=10 for operators, -10 for
    /// anything that is not one.
    ///
    /// With `strong_spaces` on, the result becomes
    /// `100 - 10 * spaces + base` for up to nine preceding spaces, so a
    /// tightly written operator binds stronger than a spaced one.
    pub fn precedence(&self, strong_spaces: bool) -> i32 {
        let base = if self.kind == TokenKind::Opr {
            operator_precedence(self.ident_str())
        } else {
            match self.kind.word_precedence() {
                Some(p) => p,
                None => return -10,
            }
        };
        if strong_spaces {
            100 - 10 * i32::from(self.strong_space_a.min(9)) + base
        } else {
            base
        }
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind;
        if kind.is_unsigned_literal() {
            #[allow(
                clippy::cast_sign_loss,
                reason = "unsigned literals store their bit pattern in int_value"
            )]
            let value = self.int_value as u64;
            write!(f, "{value}")
        } else if kind.is_int_literal() {
            write!(f, "{}", self.int_value)
        } else if kind.is_float_literal() {
            write!(f, "{}", self.float_value)
        } else if matches!(kind, TokenKind::Invalid | TokenKind::Comment)
            || kind.is_string_literal()
            || kind == TokenKind::CharLit
        {
            f.write_str(&self.literal_str())
        } else if (kind >= TokenKind::ParLe && kind <= TokenKind::Colon)
            || matches!(kind, TokenKind::Eof | TokenKind::Accent)
        {
            f.write_str(kind.display_name())
        } else {
            f.write_str(self.ident_str())
        }
    }
}
