//! Quill IR - shared lexical types
//!
//! This crate contains the data structures the lexer hands to the parser:
//! - `FileId` and `Position` for source locations
//! - `Ident` handles produced by an identifier interner
//! - `TokenKind`, `Token` and the operator precedence table
//!
//! # Identifier Ids
//!
//! The default interner reserves a fixed block of ids at construction time:
//! id 0 is the empty string, ids `1..=66` are the keywords in `TokenKind`
//! order and ids `67..=71` are the builtin punctuation operators. The lexer
//! maps an interned symbol or operator to its token kind with a range check
//! on these ids, so any custom [`Interner`] must preserve the block.

mod interner;
mod position;
mod token;

pub use interner::{
    ident_hash, Ident, IdentCache, IdentHasher, Interner, SharedIdentCache, KEYWORD_ID_HIGH,
    KEYWORD_ID_LOW, OPERATOR_ID_HIGH, OPERATOR_ID_LOW,
};
pub use position::{FileId, Position};
pub use token::{
    is_identifier, is_operator_char, is_symbol_char, is_symbol_start, operator_precedence,
    precedence_of_ident, NumericalBase, Token, TokenKind, KEYWORDS, KEYWORD_HIGH, KEYWORD_LOW,
    OPERATOR_CHARS, PUNCT_OPERATORS,
};
