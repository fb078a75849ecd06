//! Line, block and documentation comments.
//!
//! Plain comments are normally discarded by `skip`; this module scans the
//! ones that become tokens: `##` doc comments, `##[ ]##` doc blocks, and
//! everything when comments are retained.

use std::io::Read;

use quill_ir::{Token, TokenKind};
use quill_lexer_core::{CR, LF};

use super::Lexer;
use crate::lex_error::LexMessage;

/// What a block comment contributes to the token.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) enum BlockStyle {
    /// `#[ ]#` being skipped as whitespace.
    Skipped,
    /// `#[ ]#` kept verbatim, delimiters included.
    Retained,
    /// `##[ ]##`: contents only, with leading indentation stripped.
    Doc,
}

impl<R: Read> Lexer<'_, R> {
    /// Scan the comment under the cursor into a `Comment` token.
    pub(super) fn scan_comment(&mut self, tok: &mut Token) {
        let start = self.reader.bufpos();
        tok.kind = TokenKind::Comment;
        tok.int_value = 0;

        if self.byte(start + 1) != b'#' {
            if self.byte(start + 1) == b'[' {
                tok.literal.extend_from_slice(b"#[");
                self.block_comment(tok, start + 2, BlockStyle::Retained);
            } else {
                let mut pos = start;
                while !matches!(self.byte(pos), CR | LF) && !self.reader.is_eof(pos) {
                    tok.literal.push(self.byte(pos));
                    pos += 1;
                }
                self.reader.set_bufpos(pos);
            }
            return;
        }
        if self.byte(start + 2) == b'[' {
            self.block_comment(tok, start + 3, BlockStyle::Doc);
            return;
        }

        let mut pos = start + 2;
        let mut to_strip = 0u32;
        while self.byte(pos) == b' ' {
            pos += 1;
            to_strip += 1;
        }
        loop {
            while !matches!(self.byte(pos), CR | LF) && !self.reader.is_eof(pos) {
                tok.literal.push(self.byte(pos));
                pos += 1;
            }
            pos = self.handle_crlf(pos);
            let mut indent = 0u32;
            while self.byte(pos) == b' ' {
                pos += 1;
                indent += 1;
            }
            if self.byte(pos) == b'#' && self.byte(pos + 1) == b'#' {
                // Consecutive `##` lines merge into one token.
                tok.literal.push(LF);
                tok.int_value += 1;
                pos = self.strip_spaces(pos + 2, to_strip);
            } else {
                if self.byte(pos) > b' ' {
                    self.indent_ahead = Some(indent);
                }
                break;
            }
        }
        self.reader.set_bufpos(pos);
    }

    /// Scan a possibly nested block comment whose opener ends just before
    /// `start`. Returns the position after the closer and commits it.
    pub(super) fn block_comment(
        &mut self,
        tok: &mut Token,
        start: usize,
        style: BlockStyle,
    ) -> usize {
        let doc = style == BlockStyle::Doc;
        let keep = style != BlockStyle::Skipped;
        let mut pos = start;
        let mut to_strip = 0u32;
        if doc {
            to_strip = self.reader.column_of(pos);
            while self.byte(pos) == b' ' {
                pos += 1;
            }
            if matches!(self.byte(pos), CR | LF) {
                pos = self.handle_crlf(pos);
                to_strip = 0;
                while self.byte(pos) == b' ' {
                    pos += 1;
                    to_strip += 1;
                }
            }
        }

        let mut nesting = 0u32;
        loop {
            let c = self.byte(pos);
            match c {
                b'#' => {
                    let opens = if doc {
                        self.byte(pos + 1) == b'#' && self.byte(pos + 2) == b'['
                    } else {
                        self.byte(pos + 1) == b'['
                    };
                    if opens {
                        nesting += 1;
                    }
                    if keep {
                        tok.literal.push(c);
                    }
                    pos += 1;
                }
                b']' => {
                    let closes = if doc {
                        self.byte(pos + 1) == b'#' && self.byte(pos + 2) == b'#'
                    } else {
                        self.byte(pos + 1) == b'#'
                    };
                    if closes {
                        if nesting == 0 {
                            if style == BlockStyle::Retained {
                                tok.literal.extend_from_slice(b"]#");
                            }
                            pos += if doc { 3 } else { 2 };
                            break;
                        }
                        nesting -= 1;
                    }
                    if keep {
                        tok.literal.push(c);
                    }
                    pos += 1;
                }
                CR | LF => {
                    pos = self.handle_crlf(pos);
                    if keep {
                        tok.literal.push(LF);
                        tok.int_value += 1;
                    }
                    if doc {
                        pos = self.strip_spaces(pos, to_strip);
                    }
                }
                _ if self.reader.is_eof(pos) => {
                    self.report_at(pos, LexMessage::UnterminatedComment);
                    break;
                }
                _ => {
                    if keep {
                        tok.literal.push(c);
                    }
                    pos += 1;
                }
            }
        }
        self.reader.set_bufpos(pos);
        pos
    }

    /// Skip at most `count` spaces.
    fn strip_spaces(&self, mut pos: usize, count: u32) -> usize {
        let mut left = count;
        while left > 0 && self.byte(pos) == b' ' {
            pos += 1;
            left -= 1;
        }
        pos
    }
}
