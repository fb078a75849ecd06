use super::*;
use crate::lex_error::{NullSink, Severity};
use crate::test_helpers::{kinds, lex_all, lex_one, lex_with, messages};
use pretty_assertions::assert_eq;
use quill_ir::{IdentCache, SharedIdentCache};

fn open<'a>(
    src: &'a str,
    idents: &'a mut dyn Interner,
    sink: &'a mut dyn DiagnosticSink,
) -> Lexer<'a, &'a [u8]> {
    Lexer::open(
        FileId(3),
        src.as_bytes(),
        idents,
        sink,
        LexerOptions::default(),
    )
}

// === Dispatch ===

#[test]
fn simple_declaration() {
    let (tokens, diagnostics) = lex_all("let x = 0x1F");
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Let,
            TokenKind::Symbol,
            TokenKind::Equals,
            TokenKind::IntLit
        ]
    );
    assert_eq!(tokens[1].ident_str(), "x");
    assert_eq!(tokens[3].int_value, 31);
    assert!(diagnostics.is_empty());
}

#[test]
fn empty_input_is_eof() {
    let (tokens, diagnostics) = lex_all("");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!(tokens[0].indent, Some(0));
    assert!(diagnostics.is_empty());
}

#[test]
fn eof_repeats() {
    let mut idents = IdentCache::new();
    let mut sink = NullSink;
    let mut lexer = open("a", &mut idents, &mut sink);
    assert_eq!(lexer.next().kind, TokenKind::Symbol);
    for _ in 0..3 {
        assert_eq!(lexer.next().kind, TokenKind::Eof);
    }
}

#[test]
fn punctuation() {
    let (tokens, diagnostics) = lex_all("( ) [ ] { } , ; ` (. .) [. .] {. .} [:");
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::ParLe,
            TokenKind::ParRi,
            TokenKind::BracketLe,
            TokenKind::BracketRi,
            TokenKind::CurlyLe,
            TokenKind::CurlyRi,
            TokenKind::Comma,
            TokenKind::SemiColon,
            TokenKind::Accent,
            TokenKind::ParDotLe,
            TokenKind::ParDotRi,
            TokenKind::BracketDotLe,
            TokenKind::BracketDotRi,
            TokenKind::CurlyDotLe,
            TokenKind::CurlyDotRi,
            TokenKind::BracketLeColon,
        ]
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn bracket_before_range_is_plain() {
    let (tokens, _) = lex_all("(..)");
    assert_eq!(
        kinds(&tokens),
        vec![TokenKind::ParLe, TokenKind::DotDot, TokenKind::ParRi]
    );
}

#[test]
fn columns_and_lines() {
    let (tokens, _) = lex_all("ab cd\n  ef");
    let at: Vec<(u32, u32)> = tokens.iter().map(|t| (t.line, t.col)).collect();
    assert_eq!(at, vec![(1, 0), (1, 3), (2, 2), (2, 4)]);
}

// === Symbols ===

#[test]
fn symbols_are_case_folded() {
    let (tokens, _) = lex_all("FooBar WHILE a_b");
    assert_eq!(tokens[0].kind, TokenKind::Symbol);
    assert_eq!(tokens[0].ident_str(), "foobar");
    assert_eq!(tokens[1].kind, TokenKind::While);
    assert_eq!(tokens[2].ident_str(), "a_b");
    assert!(tokens[0].literal.is_empty());
}

#[test]
fn non_ascii_symbol() {
    let (tok, diagnostics) = lex_one("héllo");
    assert_eq!(tok.kind, TokenKind::Symbol);
    assert_eq!(tok.ident_str(), "héllo");
    assert!(diagnostics.is_empty());
}

#[test]
fn trailing_underscore() {
    let (tokens, diagnostics) = lex_all("a_");
    assert_eq!(kinds(&tokens), vec![TokenKind::Symbol, TokenKind::Symbol]);
    assert_eq!(tokens[0].ident_str(), "a");
    assert_eq!(tokens[1].ident_str(), "_");
    assert_eq!(messages(&diagnostics), vec![LexMessage::TrailingUnderscore]);
}

#[test]
fn lone_underscore_is_a_symbol() {
    let (tokens, diagnostics) = lex_all("for _ in x");
    assert_eq!(tokens[1].kind, TokenKind::Symbol);
    assert_eq!(tokens[1].ident_str(), "_");
    assert_eq!(tokens[2].kind, TokenKind::In);
    assert!(diagnostics.is_empty());
}

#[test]
fn leading_underscore_is_invalid() {
    let (tokens, diagnostics) = lex_all("__x");
    assert_eq!(
        kinds(&tokens),
        vec![TokenKind::Invalid, TokenKind::Invalid, TokenKind::Symbol]
    );
    assert_eq!(diagnostics.len(), 2);
}

#[test]
fn same_text_same_ident() {
    let (tokens, _) = lex_all("foo Foo f_oo");
    let ids: Vec<_> = tokens[..2].iter().map(|t| t.ident).collect();
    assert_eq!(ids[0], ids[1]);
    assert_ne!(tokens[0].ident, tokens[2].ident);
}

// === Operators ===

#[test]
fn operators() {
    let (tokens, _) = lex_all("a :: b += c . d : e = f");
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Symbol,
            TokenKind::ColonColon,
            TokenKind::Symbol,
            TokenKind::Opr,
            TokenKind::Symbol,
            TokenKind::Dot,
            TokenKind::Symbol,
            TokenKind::Colon,
            TokenKind::Symbol,
            TokenKind::Equals,
            TokenKind::Symbol,
        ]
    );
    assert_eq!(tokens[3].ident_str(), "+=");
}

#[test]
fn export_marker_before_colon() {
    let (tokens, _) = lex_all("var v*: int");
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Var,
            TokenKind::Symbol,
            TokenKind::Opr,
            TokenKind::Colon,
            TokenKind::Symbol
        ]
    );
    assert_eq!(tokens[2].ident_str(), "*");
}

#[test]
fn star_colon_operator() {
    let (tokens, _) = lex_all("a *:= b");
    assert_eq!(tokens[1].kind, TokenKind::Opr);
    assert_eq!(tokens[1].ident_str(), "*:=");
}

#[test]
fn strong_spaces_around_operators() {
    let (tokens, _) = lex_all("a +b\nc+  d\ne -\nf");
    assert_eq!(tokens[1].strong_space_a, 1);
    assert_eq!(tokens[1].strong_space_b, Some(0));
    assert_eq!(tokens[4].strong_space_a, 0);
    assert_eq!(tokens[4].strong_space_b, Some(2));
    assert_eq!(tokens[5].strong_space_a, 2);
    assert_eq!(tokens[7].ident_str(), "-");
    assert_eq!(tokens[7].strong_space_b, None);
}

#[test]
fn operator_at_end_of_input() {
    let (tokens, _) = lex_all("a +");
    assert_eq!(tokens[1].strong_space_b, None);
}

#[test]
fn precedence_through_lexer() {
    let mut idents = IdentCache::new();
    let mut sink = NullSink;
    let mut lexer = Lexer::open(
        FileId(0),
        &b"a +b * c"[..],
        &mut idents,
        &mut sink,
        LexerOptions::default().with_strong_spaces(true),
    );
    lexer.next();
    let plus = lexer.next();
    lexer.next();
    let star = lexer.next();
    assert_eq!(lexer.precedence(&plus), 98);
    assert_eq!(lexer.precedence(&star), 99);
    assert_eq!(plus.precedence(false), 8);
}

// === Invalid input ===

#[test]
fn control_character_is_invalid() {
    let (tokens, diagnostics) = lex_all("\u{1}");
    assert_eq!(kinds(&tokens), vec![TokenKind::Invalid]);
    assert_eq!(tokens[0].literal, vec![1]);
    assert_eq!(
        messages(&diagnostics),
        vec![LexMessage::InvalidToken { ch: '\u{1}', byte: 1 }]
    );
}

#[test]
fn interior_nul_is_invalid() {
    let (tokens, diagnostics) = lex_all("a\0b");
    assert_eq!(
        kinds(&tokens),
        vec![TokenKind::Symbol, TokenKind::Invalid, TokenKind::Symbol]
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].position, Position::new(FileId(0), 1, 1));
}

#[test]
fn tabs_are_reported_unless_allowed() {
    let (_, diagnostics) = lex_all("a\tb");
    assert_eq!(messages(&diagnostics), vec![LexMessage::TabsNotAllowed]);

    let (tokens, diagnostics) = lex_with("a\tb", LexerOptions::default().with_allow_tabs(true));
    assert_eq!(kinds(&tokens), vec![TokenKind::Symbol, TokenKind::Symbol]);
    assert!(diagnostics.is_empty());
}

#[test]
fn long_line_hint() {
    let options = LexerOptions::default().with_max_line_length(5);
    let (_, diagnostics) = lex_with("abcdefgh\nx\n", options);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, LexMessage::LineTooLong);
    assert_eq!(diagnostics[0].severity, Severity::Hint);
    assert_eq!(diagnostics[0].position, Position::new(FileId(0), 1, 8));
}

// === Indentation ===

#[test]
fn indentation_of_first_tokens() {
    let (tokens, _) = lex_all("a\n  b c\nd");
    let indents: Vec<_> = tokens.iter().map(|t| t.indent).collect();
    assert_eq!(indents, vec![None, Some(2), None, Some(0), Some(0)]);
}

#[test]
fn blank_and_comment_lines_do_not_count() {
    let (tokens, _) = lex_all("a\n\n   # note\n  b");
    assert_eq!(tokens[1].ident_str(), "b");
    assert_eq!(tokens[1].indent, Some(2));
    assert_eq!(tokens[1].line, 4);
}

#[test]
fn block_comment_in_indentation() {
    let (tokens, _) = lex_all("a\n  #[ c ]# b");
    assert_eq!(kinds(&tokens), vec![TokenKind::Symbol, TokenKind::Symbol]);
    assert_eq!(tokens[1].indent, Some(3));
}

#[test]
fn current_line_indent_tracks_lines() {
    let mut idents = IdentCache::new();
    let mut sink = NullSink;
    let mut lexer = open("a\n    b\n  c", &mut idents, &mut sink);
    lexer.next();
    assert_eq!(lexer.current_line_indent(), 0);
    lexer.next();
    assert_eq!(lexer.current_line_indent(), 4);
    lexer.next();
    assert_eq!(lexer.current_line_indent(), 2);
}

#[test]
fn crlf_line_endings() {
    let (tokens, _) = lex_all("a\r\n  b\rc");
    assert_eq!(tokens[1].line, 2);
    assert_eq!(tokens[1].indent, Some(2));
    assert_eq!(tokens[2].line, 3);
    assert_eq!(tokens[2].indent, Some(0));
}

// === Lexer state ===

#[test]
fn line_offset_shifts_lines() {
    let options = LexerOptions::default().with_line_offset(10);
    let (tokens, _) = lex_with("a\nb", options);
    assert_eq!(tokens[0].line, 11);
    assert_eq!(tokens[1].line, 12);
}

#[test]
fn current_position_follows_cursor() {
    let mut idents = IdentCache::new();
    let mut sink = NullSink;
    let mut lexer = open("ab cd", &mut idents, &mut sink);
    lexer.next();
    assert_eq!(lexer.current_position(), Position::new(FileId(3), 1, 2));
    assert!(lexer.current_line(false).contains("ab cd"));
    assert_eq!(lexer.file(), FileId(3));
}

#[test]
fn next_into_resets_the_record() {
    let mut idents = IdentCache::new();
    let mut sink = NullSink;
    let mut lexer = open("\"abc\" x", &mut idents, &mut sink);
    let mut tok = Token::new();
    lexer.next_into(&mut tok);
    assert_eq!(tok.kind, TokenKind::StrLit);
    assert_eq!(tok.literal_str(), "abc");
    lexer.next_into(&mut tok);
    assert_eq!(tok.kind, TokenKind::Symbol);
    assert!(tok.literal.is_empty());
    assert_eq!(tok.ident_str(), "x");
}

#[test]
fn close_returns_the_stream() {
    let mut idents = IdentCache::new();
    let mut sink = NullSink;
    let mut lexer = open("a b", &mut idents, &mut sink);
    while lexer.next().kind != TokenKind::Eof {}
    let rest = lexer.close();
    assert!(rest.is_empty());
}

#[test]
fn shared_cache_across_lexers() {
    let shared = SharedIdentCache::new();
    let mut first = shared.clone();
    let mut second = shared.clone();
    let mut sink = NullSink;
    let a = open("lexeme", &mut first, &mut sink).next();
    let mut sink = NullSink;
    let b = open("LEXEME", &mut second, &mut sink).next();
    assert_eq!(a.ident, b.ident);
    let id = a.ident.map(Ident::id).unwrap();
    assert_eq!(shared.get(id), a.ident);
}

#[test]
fn diagnostics_carry_the_file() {
    let mut idents = IdentCache::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    {
        let mut lexer = open("\u{2}", &mut idents, &mut diagnostics);
        lexer.next();
    }
    assert_eq!(diagnostics[0].position.file, FileId(3));
}

// === Indentation width ===

fn width_of(src: &str) -> u32 {
    let mut idents = IdentCache::new();
    let mut sink = NullSink;
    indent_width(
        FileId(0),
        src.as_bytes(),
        &mut idents,
        &mut sink,
        LexerOptions::default(),
    )
}

#[test]
fn indent_width_after_block_opener() {
    assert_eq!(width_of("proc f() =\n    discard\n"), 4);
    assert_eq!(width_of("type\n  T = int\n"), 2);
    assert_eq!(width_of("if x:\n   y\n"), 3);
}

#[test]
fn indent_width_without_block() {
    assert_eq!(width_of("a\nb\n"), 0);
    assert_eq!(width_of(""), 0);
}

#[test]
fn indent_width_skips_continuation_lines() {
    assert_eq!(width_of("foo(a,\n      b)\nlet\n  x = 1\n"), 2);
}
