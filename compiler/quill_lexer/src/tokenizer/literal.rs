//! String and character literals.

use std::io::Read;

use quill_ir::{Position, Token, TokenKind};
use quill_lexer_core::{CR, LF};

use super::Lexer;
use crate::lex_error::LexMessage;

/// How backslashes and doubled quotes are treated.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) enum StringMode {
    /// `"..."`: backslash escapes.
    Normal,
    /// `r"..."`: no escapes, `""` is a quote.
    Raw,
    /// `ident"..."`: like raw.
    Generalized,
}

impl<R: Read> Lexer<'_, R> {
    /// Scan a string starting at the opening quote under the cursor.
    pub(super) fn get_string(&mut self, tok: &mut Token, mode: StringMode) {
        let mut pos = self.reader.bufpos() + 1;
        if self.byte(pos) == b'"' && self.byte(pos + 1) == b'"' {
            tok.kind = TokenKind::TripleStrLit;
            pos += 2;
            // A first line holding only whitespace is not part of the text.
            if matches!(self.byte(pos), b' ' | b'\t') {
                let mut probe = pos + 1;
                while matches!(self.byte(probe), b' ' | b'\t') {
                    probe += 1;
                }
                if matches!(self.byte(probe), CR | LF) {
                    pos = probe;
                }
            }
            pos = self.handle_crlf(pos);
            loop {
                match self.byte(pos) {
                    b'"' => {
                        if self.byte(pos + 1) == b'"'
                            && self.byte(pos + 2) == b'"'
                            && self.byte(pos + 3) != b'"'
                        {
                            pos += 3;
                            break;
                        }
                        tok.literal.push(b'"');
                        pos += 1;
                    }
                    CR | LF => {
                        pos = self.handle_crlf(pos);
                        tok.literal.push(LF);
                    }
                    _ if self.reader.is_eof(pos) => {
                        // Blame the line the literal started on.
                        let start = Position::new(self.file, tok.line, tok.col);
                        self.report(start, LexMessage::UnterminatedTripleString);
                        break;
                    }
                    c => {
                        tok.literal.push(c);
                        pos += 1;
                    }
                }
            }
        } else {
            tok.kind = if mode == StringMode::Normal {
                TokenKind::StrLit
            } else {
                TokenKind::RStrLit
            };
            loop {
                let c = self.byte(pos);
                if c == b'"' {
                    if mode != StringMode::Normal && self.byte(pos + 1) == b'"' {
                        tok.literal.push(b'"');
                        pos += 2;
                    } else {
                        pos += 1;
                        break;
                    }
                } else if matches!(c, CR | LF) || self.reader.is_eof(pos) {
                    self.report_at(pos, LexMessage::UnterminatedString);
                    break;
                } else if c == b'\\' && mode == StringMode::Normal {
                    pos = self.get_escaped_char(tok, pos);
                } else {
                    tok.literal.push(c);
                    pos += 1;
                }
            }
        }
        self.reader.set_bufpos(pos);
    }

    /// Scan `'c'` or `'\e'` starting at the opening quote.
    pub(super) fn get_character(&mut self, tok: &mut Token) {
        tok.kind = TokenKind::CharLit;
        let mut pos = self.reader.bufpos() + 1;
        let c = self.byte(pos);
        if c < b' ' || c == b'\'' {
            self.report_at(pos, LexMessage::InvalidCharLiteral);
            // Step over a stray control byte so the closing quote still
            // pairs with this literal.
            if c != b'\'' && !matches!(c, CR | LF) && !self.reader.is_eof(pos) {
                pos += 1;
            }
        } else if c == b'\\' {
            pos = self.get_escaped_char(tok, pos);
        } else {
            tok.literal.push(c);
            pos += 1;
        }
        if self.byte(pos) == b'\'' {
            pos += 1;
        } else {
            self.report_at(pos, LexMessage::UnterminatedChar);
        }
        self.reader.set_bufpos(pos);
    }
}
