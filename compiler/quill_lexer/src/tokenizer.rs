//! The main scanning loop and the symbol and operator sub-scanners.
//!
//! Numbers, strings, escapes and comments have their own submodules; each
//! adds methods to [`Lexer`].
//!
//! All scanning works on positions into the reader's current window. A
//! position is only valid until the next line terminator is handed to
//! [`Lexer::handle_crlf`], which may refill the window.

mod comment;
mod escape;
mod literal;
mod number;

use std::borrow::Cow;
use std::io::Read;

use quill_ir::{
    ident_hash, is_operator_char, is_symbol_char, is_symbol_start, FileId, Ident, IdentHasher,
    Interner, Position, Token, TokenKind,
};
use quill_lexer_core::{SourceReader, CR, EOF, LF};
use tracing::{debug, trace};

use crate::lex_error::{Diagnostic, DiagnosticSink, LexMessage};
use crate::options::LexerOptions;
use comment::BlockStyle;
use literal::StringMode;

/// Pull-based tokenizer over one input stream.
///
/// ```
/// use quill_ir::{FileId, IdentCache, TokenKind};
/// use quill_lexer::{Diagnostic, Lexer, LexerOptions};
///
/// let mut idents = IdentCache::new();
/// let mut diagnostics: Vec<Diagnostic> = Vec::new();
/// let mut lexer = Lexer::open(
///     FileId(0),
///     &b"let x = 0x1F"[..],
///     &mut idents,
///     &mut diagnostics,
///     LexerOptions::default(),
/// );
/// assert_eq!(lexer.next().kind, TokenKind::Let);
/// assert_eq!(lexer.next().kind, TokenKind::Symbol);
/// assert_eq!(lexer.next().kind, TokenKind::Equals);
/// assert_eq!(lexer.next().int_value, 31);
/// assert_eq!(lexer.next().kind, TokenKind::Eof);
/// ```
pub struct Lexer<'a, R> {
    reader: SourceReader<R>,
    file: FileId,
    interner: &'a mut dyn Interner,
    sink: &'a mut dyn DiagnosticSink,
    options: LexerOptions,
    /// Indentation of the line after a doc comment, consumed by the next
    /// token.
    indent_ahead: Option<u32>,
    curr_line_indent: u32,
}

impl<'a, R: Read> Lexer<'a, R> {
    /// Start lexing `stream`.
    ///
    /// # Panics
    ///
    /// If `options.buffer_size` is zero.
    pub fn open(
        file: FileId,
        stream: R,
        interner: &'a mut dyn Interner,
        sink: &'a mut dyn DiagnosticSink,
        options: LexerOptions,
    ) -> Self {
        let mut reader = SourceReader::open(stream, options.buffer_size);
        reader.set_line_number(reader.line_number() + options.line_offset);
        debug!(
            file = file.0,
            buffer_size = options.buffer_size,
            "lexer opened"
        );
        Lexer {
            reader,
            file,
            interner,
            sink,
            options,
            indent_ahead: None,
            curr_line_indent: 0,
        }
    }

    /// Finish lexing and hand the stream back.
    pub fn close(self) -> R {
        debug!(
            file = self.file.0,
            lines = self.reader.line_number(),
            "lexer closed"
        );
        self.reader.close()
    }

    /// Scan the next token. Returns `Eof` forever once the input is used up.
    #[allow(
        clippy::should_implement_trait,
        reason = "never returns None; Eof repeats at end of input"
    )]
    pub fn next(&mut self) -> Token {
        let mut tok = Token::new();
        self.next_into(&mut tok);
        tok
    }

    /// Scan the next token into `tok`, reusing its literal buffer.
    pub fn next_into(&mut self, tok: &mut Token) {
        tok.reset();
        if let Some(indent) = self.indent_ahead.take() {
            tok.indent = Some(indent);
            self.curr_line_indent = indent;
        }
        self.skip(tok);

        let pos = self.reader.bufpos();
        tok.line = self.reader.line_number();
        tok.col = self.reader.column_of(pos);
        let c = self.byte(pos);

        if is_symbol_start(c) && !matches!(c, b'r' | b'R') {
            self.get_symbol(tok);
        } else {
            match c {
                b'#' => self.scan_comment(tok),
                // `var v*: int` is `*` followed by `:`.
                b'*' if self.byte(pos + 1) == b':' && !is_operator_char(self.byte(pos + 2)) => {
                    let mut hasher = IdentHasher::new();
                    hasher.push(b'*');
                    self.end_operator(tok, pos, pos + 1, hasher);
                }
                b',' => self.punct(tok, TokenKind::Comma, 1),
                b';' => self.punct(tok, TokenKind::SemiColon, 1),
                b'`' => self.punct(tok, TokenKind::Accent, 1),
                b')' => self.punct(tok, TokenKind::ParRi, 1),
                b']' => self.punct(tok, TokenKind::BracketRi, 1),
                b'}' => self.punct(tok, TokenKind::CurlyRi, 1),
                b'(' => {
                    if self.dot_bracket(pos) {
                        self.punct(tok, TokenKind::ParDotLe, 2);
                    } else {
                        self.punct(tok, TokenKind::ParLe, 1);
                    }
                }
                b'[' => {
                    if self.dot_bracket(pos) {
                        self.punct(tok, TokenKind::BracketDotLe, 2);
                    } else if self.byte(pos + 1) == b':' {
                        self.punct(tok, TokenKind::BracketLeColon, 2);
                    } else {
                        self.punct(tok, TokenKind::BracketLe, 1);
                    }
                }
                b'{' => {
                    if self.dot_bracket(pos) {
                        self.punct(tok, TokenKind::CurlyDotLe, 2);
                    } else {
                        self.punct(tok, TokenKind::CurlyLe, 1);
                    }
                }
                b'.' => match self.byte(pos + 1) {
                    b']' => self.punct(tok, TokenKind::BracketDotRi, 2),
                    b'}' => self.punct(tok, TokenKind::CurlyDotRi, 2),
                    b')' => self.punct(tok, TokenKind::ParDotRi, 2),
                    _ => self.get_operator(tok),
                },
                b'r' | b'R' => {
                    if self.byte(pos + 1) == b'"' {
                        self.reader.set_bufpos(pos + 1);
                        self.get_string(tok, StringMode::Raw);
                    } else {
                        self.get_symbol(tok);
                    }
                }
                b'_' => {
                    let next = self.byte(pos + 1);
                    if is_symbol_char(next) || next == b'_' {
                        self.invalid_token(tok, pos);
                    } else {
                        tok.kind = TokenKind::Symbol;
                        tok.ident = Some(self.interner.intern("_", ident_hash("_")));
                        self.reader.set_bufpos(pos + 1);
                    }
                }
                b'"' => {
                    let generalized =
                        pos > self.reader.line_start() && is_symbol_char(self.byte(pos - 1));
                    if generalized {
                        self.get_string(tok, StringMode::Generalized);
                        tok.kind = match tok.kind {
                            TokenKind::TripleStrLit => TokenKind::GTripleStrLit,
                            _ => TokenKind::GStrLit,
                        };
                    } else {
                        self.get_string(tok, StringMode::Normal);
                    }
                }
                b'\'' => self.get_character(tok),
                b'0'..=b'9' => {
                    self.get_number(tok);
                    let after = self.reader.bufpos();
                    let next = self.byte(after);
                    if is_symbol_char(next) || next == b'_' {
                        self.report_at(after, LexMessage::NumberFollowedByIdent);
                    }
                }
                c if is_operator_char(c) => self.get_operator(tok),
                EOF if self.reader.is_eof(pos) => {
                    tok.kind = TokenKind::Eof;
                    tok.indent = Some(0);
                }
                _ => self.invalid_token(tok, pos),
            }
        }

        trace!(
            kind = %tok.kind,
            line = tok.line,
            col = tok.col,
            indent = ?tok.indent,
            "token"
        );
    }

    /// Precedence of `tok` under this lexer's strong-spaces setting.
    pub fn precedence(&self, tok: &Token) -> i32 {
        tok.precedence(self.options.strong_spaces)
    }

    /// Where the next token scan starts.
    pub fn current_position(&self) -> Position {
        Position::new(
            self.file,
            self.reader.line_number(),
            self.reader.column_of(self.reader.bufpos()),
        )
    }

    /// Text of the line being scanned, optionally with a caret under the
    /// cursor.
    pub fn current_line(&self, marker: bool) -> String {
        self.reader.current_line(marker)
    }

    /// Indentation recorded by a doc comment for the line after it, not yet
    /// handed to a token.
    pub fn indent_ahead(&self) -> Option<u32> {
        self.indent_ahead
    }

    /// Indentation of the most recent line that started with a token.
    pub fn current_line_indent(&self) -> u32 {
        self.curr_line_indent
    }

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    // === Scanning helpers ===

    #[inline]
    fn byte(&self, pos: usize) -> u8 {
        self.reader.at(pos)
    }

    fn punct(&mut self, tok: &mut Token, kind: TokenKind, len: usize) {
        tok.kind = kind;
        self.reader.set_bufpos(self.reader.bufpos() + len);
    }

    /// `(.`, `[.` and `{.`, but not when the dot starts `..`.
    fn dot_bracket(&self, pos: usize) -> bool {
        self.byte(pos + 1) == b'.' && self.byte(pos + 2) != b'.'
    }

    fn invalid_token(&mut self, tok: &mut Token, pos: usize) {
        let c = self.byte(pos);
        tok.kind = TokenKind::Invalid;
        tok.literal.push(c);
        self.report_at(
            pos,
            LexMessage::InvalidToken {
                ch: char::from(c),
                byte: c,
            },
        );
        self.reader.set_bufpos(pos + 1);
    }

    /// Step over the CR or LF at `pos`, if there is one. Every line
    /// terminator the scanners meet goes through here.
    fn handle_crlf(&mut self, pos: usize) -> usize {
        let c = self.byte(pos);
        if c != CR && c != LF {
            return pos;
        }
        if self.reader.column_of(pos) > self.options.max_line_length {
            self.report_at(pos, LexMessage::LineTooLong);
        }
        if c == CR {
            self.reader.handle_cr(pos)
        } else {
            self.reader.handle_lf(pos)
        }
    }

    fn report_at(&mut self, pos: usize, message: LexMessage) {
        let position = Position::new(
            self.file,
            self.reader.line_number(),
            self.reader.column_of(pos),
        );
        self.report(position, message);
    }

    fn report(&mut self, position: Position, message: LexMessage) {
        let diagnostic = Diagnostic::new(position, message);
        debug!(%diagnostic, "lex diagnostic");
        self.sink.report(diagnostic);
    }

    // === Whitespace and indentation ===

    /// Skip spaces, line breaks and discarded comments, recording the
    /// indentation of a new line and the spaces in front of the token.
    fn skip(&mut self, tok: &mut Token) {
        let mut pos = self.reader.bufpos();
        tok.strong_space_a = 0;
        loop {
            match self.byte(pos) {
                b' ' => {
                    pos += 1;
                    tok.strong_space_a = tok.strong_space_a.saturating_add(1);
                }
                b'\t' => {
                    if !self.options.allow_tabs {
                        self.report_at(pos, LexMessage::TabsNotAllowed);
                    }
                    pos += 1;
                }
                CR | LF => {
                    pos = self.handle_crlf(pos);
                    let mut indent = 0u32;
                    loop {
                        let c = self.byte(pos);
                        if c == b' ' {
                            pos += 1;
                            indent += 1;
                        } else if c == b'#'
                            && self.byte(pos + 1) == b'['
                            && !self.options.retain_comments
                        {
                            pos = self.block_comment(tok, pos + 2, BlockStyle::Skipped);
                        } else {
                            break;
                        }
                    }
                    tok.strong_space_a = 0;
                    let c = self.byte(pos);
                    if c > b' '
                        && (c != b'#'
                            || self.byte(pos + 1) == b'#'
                            || self.options.retain_comments)
                    {
                        tok.indent = Some(indent);
                        self.curr_line_indent = indent;
                        break;
                    }
                }
                b'#' => {
                    // Doc comments are tokens.
                    if self.byte(pos + 1) == b'#' || self.options.retain_comments {
                        break;
                    }
                    if self.byte(pos + 1) == b'[' {
                        pos = self.block_comment(tok, pos + 2, BlockStyle::Skipped);
                    } else {
                        while !matches!(self.byte(pos), CR | LF) && !self.reader.is_eof(pos) {
                            pos += 1;
                        }
                    }
                }
                _ => break,
            }
        }
        self.reader.set_bufpos(pos);
    }

    // === Symbols and operators ===

    fn get_symbol(&mut self, tok: &mut Token) {
        let mut pos = self.reader.bufpos();
        let mut hasher = IdentHasher::new();
        // The literal doubles as scratch space for the folded text.
        loop {
            let c = self.byte(pos);
            match c {
                b'a'..=b'z' | b'0'..=b'9' | 0x80..=0xFF => {
                    hasher.push(c);
                    tok.literal.push(c);
                }
                b'A'..=b'Z' => {
                    let lower = c.to_ascii_lowercase();
                    hasher.push(lower);
                    tok.literal.push(lower);
                }
                b'_' => {
                    if !is_symbol_char(self.byte(pos + 1)) {
                        self.report_at(pos, LexMessage::TrailingUnderscore);
                        break;
                    }
                    tok.literal.push(c);
                }
                _ => break,
            }
            pos += 1;
        }
        let ident = intern_bytes(&mut *self.interner, &tok.literal, hasher.finish());
        tok.literal.clear();
        tok.kind = TokenKind::from_ident_id(ident.id()).unwrap_or(TokenKind::Symbol);
        tok.ident = Some(ident);
        self.reader.set_bufpos(pos);
    }

    fn get_operator(&mut self, tok: &mut Token) {
        let start = self.reader.bufpos();
        let mut pos = start;
        let mut hasher = IdentHasher::new();
        loop {
            let c = self.byte(pos);
            if !is_operator_char(c) {
                break;
            }
            hasher.push(c);
            pos += 1;
        }
        self.end_operator(tok, start, pos, hasher);

        // Count the trailing spaces without committing them, so the next
        // token still sees them as its leading spaces.
        let mut spaces = 0u8;
        while self.byte(pos) == b' ' {
            pos += 1;
            spaces = spaces.saturating_add(1);
        }
        tok.strong_space_b = if matches!(self.byte(pos), CR | LF) || self.reader.is_eof(pos) {
            None
        } else {
            Some(spaces)
        };
    }

    fn end_operator(&mut self, tok: &mut Token, start: usize, end: usize, hasher: IdentHasher) {
        let ident = intern_bytes(
            &mut *self.interner,
            self.reader.slice(start, end),
            hasher.finish(),
        );
        tok.kind = TokenKind::from_operator_id(ident.id()).unwrap_or(TokenKind::Opr);
        tok.ident = Some(ident);
        self.reader.set_bufpos(end);
    }
}

/// Intern scanned bytes. Bytes that are not valid UTF-8 are interned in
/// their lossy form, rehashed to match.
fn intern_bytes(interner: &mut dyn Interner, bytes: &[u8], hash: u32) -> Ident {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => interner.intern(text, hash),
        Cow::Owned(text) => interner.intern(&text, ident_hash(&text)),
    }
}

/// Indentation width used by a source file: the indent of the first
/// indented line that follows `:`, `=` or a section keyword (`type`,
/// `const`, `let`, `var`, `using`). 0 when there is none.
pub fn indent_width<R: Read>(
    file: FileId,
    stream: R,
    interner: &mut dyn Interner,
    sink: &mut dyn DiagnosticSink,
    options: LexerOptions,
) -> u32 {
    let mut lexer = Lexer::open(file, stream, interner, sink, options);
    let mut tok = Token::new();
    let mut prev = TokenKind::Eof;
    let mut width = 0;
    loop {
        lexer.next_into(&mut tok);
        if tok.kind == TokenKind::Eof {
            break;
        }
        if let Some(indent) = tok.indent {
            let opens_block = matches!(
                prev,
                TokenKind::Colon
                    | TokenKind::Equals
                    | TokenKind::Type
                    | TokenKind::Const
                    | TokenKind::Let
                    | TokenKind::Var
                    | TokenKind::Using
            );
            if indent > 0 && opens_block {
                width = indent;
                break;
            }
        }
        prev = tok.kind;
    }
    lexer.close();
    width
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
