//! Sliding, growable, sentinel-terminated read buffer.
//!
//! # Layout
//!
//! ```text
//! [ line ... \n line ... \n partial-next-line ]
//!  ^         ^             ^               ^
//!  0    line_start    sentinel (last       buf.len()
//!                     terminator)
//! ```
//!
//! Every byte up to and including `sentinel` is valid until the next refill.
//! While the stream has data, `sentinel` sits on the last CR or LF of the
//! window, so refills only ever happen when the scanner steps over a line
//! terminator and never split a token. Bytes after the sentinel belong to
//! the next line and are moved to the front on refill.
//!
//! Once the stream is exhausted, `sentinel` marks the first slot past the
//! input and everything from there on is `0x00` ([`EOF`]).

use std::io::{ErrorKind, Read};
use tracing::{debug, trace};

/// End-of-input sentinel byte.
pub const EOF: u8 = 0;
pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';
/// Initial window size used when the caller has no preference.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Buffered reader over a byte stream with line bookkeeping.
///
/// The scanner owns the cursor: it reads bytes with [`at`](Self::at),
/// advances a local position freely within the line, and hands every CR or
/// LF it meets to [`handle_cr`](Self::handle_cr) /
/// [`handle_lf`](Self::handle_lf), which return the position of the next
/// line's first byte. Positions are indices into the current window and are
/// invalidated by those two calls.
pub struct SourceReader<R> {
    buf: Vec<u8>,
    /// Scan cursor, committed by the scanner between tokens.
    bufpos: usize,
    sentinel: usize,
    line_start: usize,
    line_number: u32,
    /// Bytes dropped from the front of the window by earlier refills.
    offset_base: usize,
    exhausted: bool,
    stream: R,
}

impl<R: Read> SourceReader<R> {
    /// Allocate a `buf_size` window, perform the first fill and skip a
    /// leading UTF-8 byte order mark.
    ///
    /// # Panics
    ///
    /// If `buf_size` is zero.
    pub fn open(stream: R, buf_size: usize) -> Self {
        assert!(buf_size > 0, "source reader buffer size must be positive");
        let mut reader = SourceReader {
            buf: vec![EOF; buf_size],
            bufpos: 0,
            sentinel: buf_size - 1,
            line_start: 0,
            line_number: 1,
            offset_base: 0,
            exhausted: false,
            stream,
        };
        reader.fill_buffer();
        if reader.sentinel >= UTF8_BOM.len() && reader.buf.starts_with(&UTF8_BOM) {
            reader.bufpos = UTF8_BOM.len();
            reader.line_start = UTF8_BOM.len();
        }
        reader
    }

    /// Move the unread tail to the front and top the window up from the
    /// stream.
    fn fill_buffer(&mut self) {
        let len = self.buf.len();
        let to_copy = len - self.sentinel - 1;
        if to_copy > 0 {
            self.buf.copy_within(self.sentinel + 1.., 0);
        }
        let wanted = self.sentinel + 1;
        let read = self.read_into(to_copy, len);
        if read < wanted {
            self.mark_end(to_copy + read);
            return;
        }
        if let Some(last) = memchr::memrchr2(CR, LF, &self.buf) {
            self.sentinel = last;
            return;
        }

        // No terminator in the whole window: an abnormally long line.
        // Double until one shows up or the stream ends.
        loop {
            let old_len = self.buf.len();
            let new_len = old_len * 2;
            debug!(old_len, new_len, "growing source buffer for long line");
            self.buf.resize(new_len, EOF);
            let read = self.read_into(old_len, new_len);
            if read < old_len {
                self.mark_end(old_len + read);
                return;
            }
            if let Some(last) = memchr::memrchr2(CR, LF, &self.buf[old_len..]) {
                self.sentinel = old_len + last;
                return;
            }
        }
    }

    /// Read until `buf[start..end]` is full or the stream ends. Read errors
    /// count as the end of the stream.
    fn read_into(&mut self, start: usize, end: usize) -> usize {
        let mut filled = start;
        while filled < end {
            match self.stream.read(&mut self.buf[filled..end]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    debug!(error = %e, "source read failed, treating as end of input");
                    break;
                }
            }
        }
        trace!(requested = end - start, read = filled - start, "refill");
        filled - start
    }

    fn mark_end(&mut self, at: usize) {
        self.buf[at..].fill(EOF);
        self.sentinel = at;
        self.exhausted = true;
        trace!(sentinel = at, "source exhausted");
    }

    /// Step past the terminator at `pos`, refilling when it is the last one
    /// in the window.
    fn advance_line(&mut self, pos: usize) -> usize {
        debug_assert!(pos <= self.sentinel);
        let next = if pos < self.sentinel || self.exhausted {
            pos + 1
        } else {
            self.fill_buffer();
            self.offset_base += pos + 1;
            self.bufpos = 0;
            0
        };
        self.line_start = next;
        next
    }

    /// Consume the CR at `pos`, plus an LF right after it, as one line
    /// terminator. Returns the position of the next line.
    pub fn handle_cr(&mut self, pos: usize) -> usize {
        debug_assert_eq!(self.at(pos), CR);
        self.line_number += 1;
        let next = self.advance_line(pos);
        if self.at(next) == LF {
            self.advance_line(next)
        } else {
            next
        }
    }

    /// Consume the LF at `pos`. Returns the position of the next line.
    pub fn handle_lf(&mut self, pos: usize) -> usize {
        debug_assert_eq!(self.at(pos), LF);
        self.line_number += 1;
        self.advance_line(pos)
    }

    /// Byte at `pos`; [`EOF`] past the end of the window.
    #[inline]
    pub fn at(&self, pos: usize) -> u8 {
        self.buf.get(pos).copied().unwrap_or(EOF)
    }

    /// Whether `pos` is the end-of-input sentinel rather than a NUL byte
    /// inside the source.
    #[inline]
    pub fn is_eof(&self, pos: usize) -> bool {
        self.exhausted && pos >= self.sentinel && self.at(pos) == EOF
    }

    #[inline]
    pub fn bufpos(&self) -> usize {
        self.bufpos
    }

    #[inline]
    pub fn set_bufpos(&mut self, pos: usize) {
        self.bufpos = pos;
    }

    #[inline]
    pub fn line_start(&self) -> usize {
        self.line_start
    }

    #[inline]
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    #[inline]
    pub fn set_line_number(&mut self, line: u32) {
        self.line_number = line;
    }

    /// 0-based byte column of `pos` in the current line.
    #[inline]
    pub fn column_of(&self, pos: usize) -> u32 {
        u32::try_from(pos.abs_diff(self.line_start)).unwrap_or(u32::MAX)
    }

    /// Absolute byte offset of `pos` from the start of the stream.
    #[inline]
    pub fn offset_of(&self, pos: usize) -> usize {
        self.offset_base + pos
    }

    #[inline]
    pub fn sentinel(&self) -> usize {
        self.sentinel
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Bytes `start..end` of the window, clamped to its bounds.
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &[u8] {
        let end = end.min(self.buf.len());
        &self.buf[start.min(end)..end]
    }

    /// Current window size; grows past the initial size for long lines.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Text of the current line, for diagnostics. With `marker`, a second
    /// line with a caret under the scan cursor is appended.
    pub fn current_line(&self, marker: bool) -> String {
        let start = self.line_start.min(self.buf.len());
        let mut end = start;
        while end < self.buf.len() && !matches!(self.buf[end], CR | LF) && !self.is_eof(end) {
            end += 1;
        }
        let mut line = String::from_utf8_lossy(&self.buf[start..end]).into_owned();
        if marker {
            line.push('\n');
            line.push_str(&" ".repeat(self.column_of(self.bufpos) as usize));
            line.push('^');
        }
        line
    }

    /// Release the buffer and hand the stream back.
    pub fn close(self) -> R {
        self.stream
    }
}
