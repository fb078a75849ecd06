//! Tokenizer for Quill.
//!
//! Turns a byte stream into [`Token`](quill_ir::Token)s, one per call.
//!
//! # Architecture
//!
//! ```text
//! Read → SourceReader (quill_lexer_core) → Lexer → Token
//!                                            ├─ Interner        (symbols, operators)
//!                                            └─ DiagnosticSink  (everything malformed)
//! ```
//!
//! The [`Lexer`] drives a sentinel-terminated [`SourceReader`] directly and
//! dispatches on the first byte of each token to a sub-scanner:
//! - **Symbols**: case-folded, hashed while scanning, resolved to keywords by
//!   interner id range
//! - **Numbers**: prefix and suffix detection, then value extraction with
//!   per-base overflow rules
//! - **Strings/chars**: plain, raw, triple-quoted and generalized forms,
//!   backslash escapes
//! - **Operators**: maximal runs of operator characters
//! - **Comments**: skipped, or kept as tokens for doc comments and when
//!   [`LexerOptions::retain_comments`] is set
//!
//! Nothing is fatal. Malformed input is reported to the sink and produces a
//! best-effort token; lexing continues with the next byte.
//!
//! [`SourceReader`]: quill_lexer_core::SourceReader

mod lex_error;
mod options;
mod tokenizer;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod test_helpers;

pub use lex_error::{Diagnostic, DiagnosticSink, LexMessage, NullSink, Severity};
pub use options::LexerOptions;
pub use tokenizer::{indent_width, Lexer};
