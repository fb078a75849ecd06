//! Numeric literal scanning.
//!
//! Three stages:
//! 1. Prefix and digits. The literal text is collected into `tok.literal`
//!    with the prefix normalized to `0x`, `0o` or `0b`.
//! 2. Type suffix (`'i8`, `u`, `f32`, `d`, ...), which picks the token kind.
//! 3. Value extraction from the collected text.
//!
//! Non-decimal literals only need to fit the *unsigned* width of their kind
//! (`0x80'i8` is -128); decimal literals must fit the kind's real range.

use std::io::Read;

use quill_ir::{NumericalBase, Token, TokenKind};

use super::Lexer;
use crate::lex_error::LexMessage;

/// Value decoded from a literal's text.
#[derive(Copy, Clone, Debug, PartialEq)]
struct NumberValue {
    kind: TokenKind,
    int: i64,
    float: f64,
}

impl NumberValue {
    fn new(kind: TokenKind) -> Self {
        NumberValue {
            kind,
            int: 0,
            float: 0.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum NumberError {
    /// The text is not a number of its kind.
    Invalid,
    /// The text is a number, but too large for its kind. Carries the
    /// truncated value.
    OutOfRange(NumberValue),
}

fn is_octal(b: u8) -> bool {
    matches!(b, b'0'..=b'7')
}

fn is_binary(b: u8) -> bool {
    matches!(b, b'0' | b'1')
}

fn is_decimal(b: u8) -> bool {
    b.is_ascii_digit()
}

fn is_hex(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

/// Characters that may not directly follow a complete literal.
fn is_literalish(b: u8) -> bool {
    b.is_ascii_hexdigit()
        || matches!(
            b,
            b'X' | b'x' | b'o' | b'b' | b'B' | b'c' | b'C' | b'_' | b'\''
        )
}

/// Characters echoed back in number diagnostics.
fn is_message_char(b: u8) -> bool {
    b.is_ascii_hexdigit()
        || matches!(
            b,
            b'X' | b'x' | b'o' | b'O' | b'c' | b'C' | b'_' | b'.' | b'\'' | b'd' | b'i' | b'u'
        )
}

impl<R: Read> Lexer<'_, R> {
    pub(super) fn get_number(&mut self, tok: &mut Token) {
        let start = self.reader.bufpos();
        let mut pos = start;
        let mut invalid = false;
        let mut radix = None;
        let mut bad_prefix = false;
        tok.kind = TokenKind::IntLit;

        // Stage 1: prefix and digits.
        let code = self.byte(pos + 1);
        if self.byte(pos) == b'0'
            && matches!(code, b'x' | b'X' | b'o' | b'O' | b'b' | b'B' | b'c' | b'C')
        {
            tok.literal.push(b'0');
            pos += 2;
            let digits = match code {
                b'x' | b'X' => {
                    tok.literal.push(b'x');
                    radix = Some(NumericalBase::Base16);
                    self.match_underscore_chars(tok, &mut pos, is_hex)
                }
                b'b' | b'B' => {
                    tok.literal.push(b'b');
                    radix = Some(NumericalBase::Base2);
                    self.match_underscore_chars(tok, &mut pos, is_binary)
                }
                b'O' => {
                    let text = self.literal_text(start);
                    self.report_at(start, LexMessage::InvalidOctalPrefix(text));
                    tok.literal.push(b'O');
                    bad_prefix = true;
                    radix = Some(NumericalBase::Base8);
                    self.match_underscore_chars(tok, &mut pos, is_octal)
                }
                _ => {
                    if matches!(code, b'c' | b'C') {
                        let text = self.literal_text(start);
                        self.report_at(start, LexMessage::DeprecatedOctalPrefix(text));
                    }
                    tok.literal.push(b'o');
                    radix = Some(NumericalBase::Base8);
                    self.match_underscore_chars(tok, &mut pos, is_octal)
                }
            };
            if digits == 0 {
                self.invalid_number(start, &mut invalid);
            }
        } else {
            self.match_underscore_chars(tok, &mut pos, is_decimal);
            if self.byte(pos) == b'.' && self.byte(pos + 1).is_ascii_digit() {
                tok.kind = TokenKind::FloatLit;
                tok.literal.push(b'.');
                pos += 1;
                self.match_underscore_chars(tok, &mut pos, is_decimal);
            }
            if matches!(self.byte(pos), b'e' | b'E') {
                tok.kind = TokenKind::FloatLit;
                tok.literal.push(b'e');
                pos += 1;
                if matches!(self.byte(pos), b'+' | b'-') {
                    tok.literal.push(self.byte(pos));
                    pos += 1;
                }
                self.match_underscore_chars(tok, &mut pos, is_decimal);
            }
        }

        // Stage 2: suffix.
        let mut post = pos;
        if matches!(
            self.byte(post),
            b'\'' | b'f' | b'F' | b'd' | b'D' | b'i' | b'I' | b'u' | b'U'
        ) {
            if self.byte(post) == b'\'' {
                post += 1;
            }
            match self.byte(post) {
                b'f' | b'F' => {
                    post += 1;
                    tok.kind = if self.follows(post, b"32") {
                        post += 2;
                        TokenKind::Float32Lit
                    } else if self.follows(post, b"64") {
                        post += 2;
                        TokenKind::Float64Lit
                    } else if self.follows(post, b"128") {
                        post += 3;
                        TokenKind::Float128Lit
                    } else {
                        TokenKind::FloatLit
                    };
                }
                b'd' | b'D' => {
                    post += 1;
                    tok.kind = TokenKind::Float64Lit;
                }
                b'i' | b'I' => {
                    post += 1;
                    match self.int_width(post) {
                        Some((64, len)) => {
                            post += len;
                            tok.kind = TokenKind::Int64Lit;
                        }
                        Some((32, len)) => {
                            post += len;
                            tok.kind = TokenKind::Int32Lit;
                        }
                        Some((16, len)) => {
                            post += len;
                            tok.kind = TokenKind::Int16Lit;
                        }
                        Some((_, len)) => {
                            post += len;
                            tok.kind = TokenKind::Int8Lit;
                        }
                        None => self.invalid_number(start, &mut invalid),
                    }
                }
                b'u' | b'U' => {
                    post += 1;
                    tok.kind = match self.int_width(post) {
                        Some((width, len)) => {
                            post += len;
                            match width {
                                64 => TokenKind::UInt64Lit,
                                32 => TokenKind::UInt32Lit,
                                16 => TokenKind::UInt16Lit,
                                _ => TokenKind::UInt8Lit,
                            }
                        }
                        None => TokenKind::UIntLit,
                    };
                }
                _ => self.invalid_number(start, &mut invalid),
            }
        }

        let next = self.byte(post);
        if is_literalish(next) || (next == b'.' && self.byte(post + 1).is_ascii_digit()) {
            self.invalid_number(start, &mut invalid);
        }

        // Stage 3: value.
        if bad_prefix {
            tok.kind = TokenKind::Invalid;
        } else {
            tok.base = radix.unwrap_or_default();
            let decoded = match radix {
                Some(base) => {
                    let digits = tok.literal.get(2..).unwrap_or_default();
                    decode_radix(tok.kind, radix_bits(base), digits)
                }
                None => decode_decimal(tok.kind, &tok.literal),
            };
            match decoded {
                Ok(value) => apply(tok, value),
                Err(NumberError::OutOfRange(value)) => {
                    apply(tok, value);
                    if !invalid {
                        let text = self.literal_text(start);
                        self.report_at(start, LexMessage::NumberOutOfRange(text));
                    }
                }
                Err(NumberError::Invalid) => self.invalid_number(start, &mut invalid),
            }
        }
        self.reader.set_bufpos(post);
    }

    /// Consume a run of `accept` characters with single underscores between
    /// them. Returns the number of digits consumed.
    fn match_underscore_chars(
        &mut self,
        tok: &mut Token,
        pos: &mut usize,
        accept: fn(u8) -> bool,
    ) -> usize {
        let mut count = 0;
        loop {
            let c = self.byte(*pos);
            if !accept(c) {
                break;
            }
            tok.literal.push(c);
            *pos += 1;
            count += 1;
            if self.byte(*pos) == b'_' {
                if !accept(self.byte(*pos + 1)) {
                    self.report_at(*pos, LexMessage::UnderscoreGrouping);
                    break;
                }
                tok.literal.push(b'_');
                *pos += 1;
            }
        }
        count
    }

    fn follows(&self, pos: usize, text: &[u8]) -> bool {
        text.iter()
            .enumerate()
            .all(|(i, &b)| self.byte(pos + i) == b)
    }

    /// Width digits after an `i`/`u` suffix, with their length.
    fn int_width(&self, pos: usize) -> Option<(u8, usize)> {
        if self.follows(pos, b"64") {
            Some((64, 2))
        } else if self.follows(pos, b"32") {
            Some((32, 2))
        } else if self.follows(pos, b"16") {
            Some((16, 2))
        } else if self.byte(pos) == b'8' {
            Some((8, 1))
        } else {
            None
        }
    }

    /// Report "invalid number" once per literal.
    fn invalid_number(&mut self, start: usize, reported: &mut bool) {
        if *reported {
            return;
        }
        *reported = true;
        let text = self.literal_text(start);
        self.report_at(start, LexMessage::InvalidNumber(text));
    }

    /// The literal as written, suffix included, for diagnostics.
    fn literal_text(&self, start: usize) -> String {
        let mut pos = start;
        let mut text = Vec::new();
        self.take_while(&mut pos, &mut text, is_message_char);
        if matches!(self.byte(pos), b'+' | b'-')
            && pos > start
            && matches!(self.byte(pos - 1), b'e' | b'E')
        {
            text.push(self.byte(pos));
            pos += 1;
            self.take_while(&mut pos, &mut text, is_message_char);
        }
        if matches!(
            self.byte(pos),
            b'\'' | b'f' | b'F' | b'd' | b'D' | b'i' | b'I' | b'u' | b'U'
        ) {
            text.push(self.byte(pos));
            pos += 1;
            self.take_while(&mut pos, &mut text, is_decimal);
        }
        String::from_utf8_lossy(&text).into_owned()
    }

    fn take_while(&self, pos: &mut usize, text: &mut Vec<u8>, accept: fn(u8) -> bool) {
        while accept(self.byte(*pos)) {
            text.push(self.byte(*pos));
            *pos += 1;
        }
    }
}

fn apply(tok: &mut Token, value: NumberValue) {
    tok.kind = value.kind;
    tok.int_value = value.int;
    tok.float_value = value.float;
}

fn radix_bits(base: NumericalBase) -> u32 {
    match base {
        NumericalBase::Base2 => 1,
        NumericalBase::Base8 => 3,
        NumericalBase::Base16 | NumericalBase::Base10 => 4,
    }
}

/// Shift-accumulate the digits of a `0x`/`0o`/`0b` literal and
/// reinterpret the bit pattern for `kind`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    reason = "non-decimal literals keep their bit pattern"
)]
fn decode_radix(kind: TokenKind, bits: u32, digits: &[u8]) -> Result<NumberValue, NumberError> {
    let mut value: u64 = 0;
    let mut out_of_range = false;
    for &b in digits.iter().filter(|&&b| b != b'_') {
        let digit = char::from(b).to_digit(16).ok_or(NumberError::Invalid)?;
        if value >> (64 - bits) != 0 {
            out_of_range = true;
        }
        value = (value << bits) | u64::from(digit);
    }

    let mut out = NumberValue::new(kind);
    match kind {
        TokenKind::Float32Lit => {
            out_of_range |= value > u64::from(u32::MAX);
            out.float = f64::from(f32::from_bits(value as u32));
        }
        TokenKind::FloatLit | TokenKind::Float64Lit | TokenKind::Float128Lit => {
            out.float = f64::from_bits(value);
        }
        TokenKind::Int8Lit => {
            out_of_range |= value > u64::from(u8::MAX);
            out.int = i64::from(value as u8 as i8);
        }
        TokenKind::Int16Lit => {
            out_of_range |= value > u64::from(u16::MAX);
            out.int = i64::from(value as u16 as i16);
        }
        TokenKind::Int32Lit => {
            out_of_range |= value > u64::from(u32::MAX);
            out.int = i64::from(value as u32 as i32);
        }
        TokenKind::UInt8Lit => {
            out_of_range |= value > u64::from(u8::MAX);
            out.int = i64::from(value as u8);
        }
        TokenKind::UInt16Lit => {
            out_of_range |= value > u64::from(u16::MAX);
            out.int = i64::from(value as u16);
        }
        TokenKind::UInt32Lit => {
            out_of_range |= value > u64::from(u32::MAX);
            out.int = i64::from(value as u32);
        }
        _ => out.int = value as i64,
    }

    if out_of_range {
        Err(NumberError::OutOfRange(out))
    } else {
        Ok(out)
    }
}

/// Decode a decimal literal. Unsuffixed integers beyond 32 bits become
/// `Int64Lit`.
#[allow(
    clippy::cast_possible_wrap,
    reason = "unsigned literals store their bit pattern in int_value"
)]
fn decode_decimal(kind: TokenKind, literal: &[u8]) -> Result<NumberValue, NumberError> {
    let text: String = literal
        .iter()
        .filter(|&&b| b != b'_')
        .map(|&b| char::from(b))
        .collect();
    let mut out = NumberValue::new(kind);

    if kind.is_float_literal() {
        out.float = text.parse::<f64>().map_err(|_| NumberError::Invalid)?;
        return Ok(out);
    }

    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumberError::Invalid);
    }
    let mut value: u64 = 0;
    let mut overflow = false;
    for b in text.bytes() {
        let (next, carry) = value.overflowing_mul(10);
        let (next, carry2) = next.overflowing_add(u64::from(b - b'0'));
        overflow |= carry || carry2;
        value = next;
    }
    out.int = value as i64;

    let out_of_range = overflow
        || match kind {
            TokenKind::UIntLit | TokenKind::UInt64Lit => false,
            TokenKind::Int8Lit => value > u64::from(i8::MAX.unsigned_abs()),
            TokenKind::Int16Lit => value > u64::from(i16::MAX.unsigned_abs()),
            TokenKind::Int32Lit => value > u64::from(i32::MAX.unsigned_abs()),
            TokenKind::UInt8Lit => value > u64::from(u8::MAX),
            TokenKind::UInt16Lit => value > u64::from(u16::MAX),
            TokenKind::UInt32Lit => value > u64::from(u32::MAX),
            _ => value > i64::MAX.unsigned_abs(),
        };

    if kind == TokenKind::IntLit && value > u64::from(i32::MAX.unsigned_abs()) {
        out.kind = TokenKind::Int64Lit;
    }

    if out_of_range {
        Err(NumberError::OutOfRange(out))
    } else {
        Ok(out)
    }
}
