//! Backslash escapes in plain strings and character literals.

use std::io::Read;

use quill_ir::{Token, TokenKind};
use quill_lexer_core::{CR, LF};

use super::Lexer;
use crate::lex_error::LexMessage;

#[cfg(windows)]
const PLATFORM_NEWLINE: &[u8] = b"\r\n";
#[cfg(not(windows))]
const PLATFORM_NEWLINE: &[u8] = b"\n";

const FORM_FEED: u8 = 0x0C;
const ESCAPE: u8 = 0x1B;
const BACKSPACE: u8 = 0x08;

/// Largest value `\u{...}` accepts.
const MAX_CODE_POINT: u32 = 0x10_FFFF;

impl<R: Read> Lexer<'_, R> {
    /// Decode the escape whose backslash is at `backslash`, appending the
    /// result to `tok.literal`. Returns the position after the escape.
    pub(super) fn get_escaped_char(&mut self, tok: &mut Token, backslash: usize) -> usize {
        let mut pos = backslash + 1;
        let in_char = tok.kind == TokenKind::CharLit;
        let c = self.byte(pos);
        let simple = match c {
            b'r' | b'R' | b'c' | b'C' => Some(CR),
            b'l' | b'L' => Some(LF),
            b'f' | b'F' | b'a' | b'A' | b'v' | b'V' => Some(FORM_FEED),
            b'e' | b'E' => Some(ESCAPE),
            b'b' | b'B' => Some(BACKSPACE),
            b't' | b'T' => Some(b'\t'),
            b'\'' | b'"' | b'\\' => Some(c),
            _ => None,
        };
        if let Some(byte) = simple {
            tok.literal.push(byte);
            return pos + 1;
        }

        match c {
            b'n' | b'N' => {
                if self.options.legacy_newline_escape {
                    if in_char {
                        self.report_at(pos, LexMessage::EscapeNotAllowedInChar('n'));
                    }
                    tok.literal.extend_from_slice(PLATFORM_NEWLINE);
                } else {
                    tok.literal.push(LF);
                }
                pos += 1;
            }
            b'p' | b'P' => {
                if in_char {
                    self.report_at(pos, LexMessage::EscapeNotAllowedInChar('p'));
                }
                tok.literal.extend_from_slice(PLATFORM_NEWLINE);
                pos += 1;
            }
            b'x' | b'X' => {
                pos += 1;
                let mut xi = 0;
                pos = self.hex_digit(pos, &mut xi);
                pos = self.hex_digit(pos, &mut xi);
                tok.literal.push(u8::try_from(xi).unwrap_or(u8::MAX));
            }
            b'u' | b'U' => {
                if in_char {
                    self.report_at(pos, LexMessage::EscapeNotAllowedInChar('u'));
                }
                pos += 1;
                if self.byte(pos) == b'{' {
                    let (next, code_point) = self.braced_code_point(pos + 1);
                    pos = next;
                    if let Some(i) = code_point {
                        push_code_point(&mut tok.literal, i);
                    }
                } else {
                    let mut xi = 0;
                    for _ in 0..4 {
                        pos = self.hex_digit(pos, &mut xi);
                    }
                    push_code_point(&mut tok.literal, xi);
                }
            }
            b'0'..=b'9' => {
                if c == b'0' && self.byte(pos + 1).is_ascii_digit() {
                    self.report_at(pos, LexMessage::OctalEscape);
                }
                let mut value = 0u32;
                let mut digits = 0;
                while digits < 3 && self.byte(pos).is_ascii_digit() {
                    value = value * 10 + u32::from(self.byte(pos) - b'0');
                    pos += 1;
                    digits += 1;
                }
                match u8::try_from(value) {
                    Ok(byte) => tok.literal.push(byte),
                    Err(_) => self.report_at(pos, LexMessage::InvalidCharConstant),
                }
            }
            _ => self.report_at(pos, LexMessage::InvalidCharConstant),
        }
        pos
    }

    /// Digits of `\u{...}` starting after the brace. Returns the position
    /// after the closing brace, and the code point unless the body is empty.
    fn braced_code_point(&mut self, start: usize) -> (usize, Option<u32>) {
        let mut pos = start;
        let mut xi = 0;
        loop {
            let c = self.byte(pos);
            if c == b'}' {
                break;
            }
            if matches!(c, b'"' | b'\'' | CR | LF) || self.reader.is_eof(pos) {
                self.report_at(pos, LexMessage::ExpectedHexDigit(char::from(c)));
                break;
            }
            pos = self.hex_digit(pos, &mut xi);
        }
        let end = pos;
        if self.byte(pos) == b'}' {
            pos += 1;
        }
        if end == start {
            self.report_at(end, LexMessage::EmptyCodePoint);
            return (pos, None);
        }
        if xi > MAX_CODE_POINT {
            let text = String::from_utf8_lossy(self.reader.slice(start, end)).into_owned();
            self.report_at(start, LexMessage::CodePointTooLarge(text));
        }
        (pos, Some(xi))
    }

    /// Accumulate one hex digit at `pos` into `xi`. A non-digit is reported
    /// and skipped, unless it would end the literal.
    fn hex_digit(&mut self, pos: usize, xi: &mut u32) -> usize {
        let c = self.byte(pos);
        if let Some(digit) = char::from(c).to_digit(16) {
            *xi = xi.saturating_mul(16).saturating_add(digit);
            return pos + 1;
        }
        self.report_at(pos, LexMessage::ExpectedHexDigit(char::from(c)));
        if matches!(c, b'"' | b'\'' | CR | LF) || self.reader.is_eof(pos) {
            pos
        } else {
            pos + 1
        }
    }
}

#[allow(clippy::cast_possible_truncation, reason = "masked to six bits")]
fn continuation(bits: u32) -> u8 {
    0x80 | (bits & 0x3F) as u8
}

/// Append `i` in the extended, up to six byte UTF-8 form. Values above
/// `0x7FFF_FFFF` append nothing.
#[allow(
    clippy::cast_possible_truncation,
    reason = "every lead byte is shifted below 0x100"
)]
fn push_code_point(out: &mut Vec<u8>, i: u32) {
    match i {
        0..=0x7F => out.push(i as u8),
        0x80..=0x7FF => out.extend_from_slice(&[0xC0 | (i >> 6) as u8, continuation(i)]),
        0x800..=0xFFFF => out.extend_from_slice(&[
            0xE0 | (i >> 12) as u8,
            continuation(i >> 6),
            continuation(i),
        ]),
        0x1_0000..=0x1F_FFFF => out.extend_from_slice(&[
            0xF0 | (i >> 18) as u8,
            continuation(i >> 12),
            continuation(i >> 6),
            continuation(i),
        ]),
        0x20_0000..=0x3FF_FFFF => out.extend_from_slice(&[
            0xF8 | (i >> 24) as u8,
            continuation(i >> 18),
            continuation(i >> 12),
            continuation(i >> 6),
            continuation(i),
        ]),
        0x400_0000..=0x7FFF_FFFF => out.extend_from_slice(&[
            0xFC | (i >> 30) as u8,
            continuation(i >> 24),
            continuation(i >> 18),
            continuation(i >> 12),
            continuation(i >> 6),
            continuation(i),
        ]),
        _ => {}
    }
}
