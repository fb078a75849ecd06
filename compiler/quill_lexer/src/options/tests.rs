use super::*;
use pretty_assertions::assert_eq;

#[test]
fn defaults() {
    let options = LexerOptions::default();
    assert_eq!(options.buffer_size, 8192);
    assert!(!options.allow_tabs);
    assert!(!options.legacy_newline_escape);
    assert!(!options.strong_spaces);
    assert!(!options.retain_comments);
    assert_eq!(options.max_line_length, 80);
    assert_eq!(options.line_offset, 0);
}

#[test]
fn builders_set_one_field_each() {
    let options = LexerOptions::default()
        .with_buffer_size(64)
        .with_allow_tabs(true)
        .with_line_offset(10);
    assert_eq!(
        options,
        LexerOptions {
            buffer_size: 64,
            allow_tabs: true,
            line_offset: 10,
            ..LexerOptions::default()
        }
    );
}

#[test]
fn remaining_builders() {
    let options = LexerOptions::default()
        .with_legacy_newline_escape(true)
        .with_strong_spaces(true)
        .with_retain_comments(true)
        .with_max_line_length(120);
    assert!(options.legacy_newline_escape);
    assert!(options.strong_spaces);
    assert!(options.retain_comments);
    assert_eq!(options.max_line_length, 120);
}
