//! Lexer diagnostics and the sink they are reported to.
//!
//! The lexer never fails: malformed input produces a [`Diagnostic`] and a
//! best-effort token, and scanning resumes. Diagnostics go to a caller
//! supplied [`DiagnosticSink`] as soon as they are found.

use quill_ir::Position;
use std::fmt;

/// How serious a diagnostic is.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Severity {
    /// Style only, e.g. an overlong line.
    Hint,
    /// Deprecated spellings; the token is still produced normally.
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Hint => "hint",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// Everything the lexer can complain about.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum LexMessage {
    // === Numbers ===
    #[error("invalid number: '{0}'")]
    InvalidNumber(String),
    #[error("number out of range: '{0}'")]
    NumberOutOfRange(String),
    #[error("{0} will soon be invalid for oct literals; use '0o' for octals")]
    DeprecatedOctalPrefix(String),
    #[error("{0} is an invalid int literal; for octal literals use the '0o' prefix")]
    InvalidOctalPrefix(String),
    #[error(
        "only single underscores may occur in a token and token may not end with an \
         underscore: e.g. '1__1' and '1_' are invalid"
    )]
    UnderscoreGrouping,
    #[error("invalid token: no whitespace between number and identifier")]
    NumberFollowedByIdent,

    // === Symbols and stray characters ===
    #[error("invalid token: trailing underscore")]
    TrailingUnderscore,
    #[error("invalid token: {ch} (\\{byte})")]
    InvalidToken { ch: char, byte: u8 },

    // === Strings and characters ===
    #[error("closing \"\"\" expected, but end of file reached")]
    UnterminatedTripleString,
    #[error("closing \" expected")]
    UnterminatedString,
    #[error("invalid character literal")]
    InvalidCharLiteral,
    #[error("missing closing ' for character literal")]
    UnterminatedChar,

    // === Escapes ===
    #[error("\\{0} not allowed in character literal")]
    EscapeNotAllowedInChar(char),
    #[error("expected a hex digit, but found: {0}; maybe prepend with 0")]
    ExpectedHexDigit(char),
    #[error("Unicode codepoint cannot be empty")]
    EmptyCodePoint,
    #[error("Unicode codepoint must be lower than 0x10FFFF, but was: {0}")]
    CodePointTooLarge(String),
    #[error("invalid character constant")]
    InvalidCharConstant,
    #[error("octal escape sequences do not exist; leading zero is ignored")]
    OctalEscape,

    // === Layout ===
    #[error("end of multiline comment expected")]
    UnterminatedComment,
    #[error("tabulators are not allowed")]
    TabsNotAllowed,
    #[error("line too long")]
    LineTooLong,
}

impl LexMessage {
    pub fn severity(&self) -> Severity {
        match self {
            LexMessage::LineTooLong => Severity::Hint,
            LexMessage::DeprecatedOctalPrefix(_) | LexMessage::OctalEscape => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A located lexer message.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Diagnostic {
    pub severity: Severity,
    pub position: Position,
    pub message: LexMessage,
}

impl Diagnostic {
    pub fn new(position: Position, message: LexMessage) -> Self {
        Diagnostic {
            severity: message.severity(),
            position,
            message,
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.position, self.severity, self.message)
    }
}

/// Receiver for diagnostics. Reporting is fire-and-forget.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Drops everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
