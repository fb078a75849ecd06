//! Shared helpers for lexer unit tests.

use quill_ir::{FileId, IdentCache, Token, TokenKind};

use crate::{Diagnostic, LexMessage, Lexer, LexerOptions};

/// Lex `src` to the end, returning every token (the final `Eof` included)
/// and every diagnostic.
pub(crate) fn lex_with(src: &str, options: LexerOptions) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut idents = IdentCache::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut tokens = Vec::new();
    {
        let mut lexer = Lexer::open(
            FileId(0),
            src.as_bytes(),
            &mut idents,
            &mut diagnostics,
            options,
        );
        loop {
            let tok = lexer.next();
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
    }
    (tokens, diagnostics)
}

pub(crate) fn lex_all(src: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    lex_with(src, LexerOptions::default())
}

/// The first token of `src` and all diagnostics.
pub(crate) fn lex_one(src: &str) -> (Token, Vec<Diagnostic>) {
    let (mut tokens, diagnostics) = lex_all(src);
    (tokens.swap_remove(0), diagnostics)
}

/// Token kinds without the trailing `Eof`.
pub(crate) fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens
        .iter()
        .map(|t| t.kind)
        .filter(|&k| k != TokenKind::Eof)
        .collect()
}

pub(crate) fn messages(diagnostics: &[Diagnostic]) -> Vec<LexMessage> {
    diagnostics.iter().map(|d| d.message.clone()).collect()
}
