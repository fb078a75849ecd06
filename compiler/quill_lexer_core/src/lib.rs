//! Low-level input layer for the Quill lexer.
//!
//! [`SourceReader`] keeps a sliding window over any [`std::io::Read`]
//! stream. The window always ends on a line terminator (or on the
//! end-of-input sentinel once the stream is exhausted), so a scanner can walk
//! a whole line without bounds checks and only has to cooperate with the
//! reader when it steps over a CR or LF.

mod source_reader;

pub use source_reader::{SourceReader, CR, DEFAULT_BUFFER_SIZE, EOF, LF, UTF8_BOM};
