//! Lexer configuration.

use quill_lexer_core::DEFAULT_BUFFER_SIZE;

/// Switches that change how source text is tokenized.
///
/// Built with `LexerOptions::default()` and the `with_*` methods:
///
/// ```
/// use quill_lexer::LexerOptions;
///
/// let options = LexerOptions::default()
///     .with_strong_spaces(true)
///     .with_retain_comments(true);
/// assert!(options.strong_spaces);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LexerOptions {
    /// Initial size of the read window. Grows on demand for long lines.
    pub buffer_size: usize,
    /// Accept tab characters as whitespace instead of reporting them.
    pub allow_tabs: bool,
    /// Treat `\n` as the platform newline and reject it in character
    /// literals.
    pub legacy_newline_escape: bool,
    /// Make operator precedence depend on the spaces in front of it.
    pub strong_spaces: bool,
    /// Emit `#` and `#[ ]#` comments as tokens instead of skipping them.
    pub retain_comments: bool,
    /// Lines longer than this get a hint.
    pub max_line_length: u32,
    /// Added to every reported line number.
    pub line_offset: u32,
}

impl Default for LexerOptions {
    fn default() -> Self {
        LexerOptions {
            buffer_size: DEFAULT_BUFFER_SIZE,
            allow_tabs: false,
            legacy_newline_escape: false,
            strong_spaces: false,
            retain_comments: false,
            max_line_length: 80,
            line_offset: 0,
        }
    }
}

impl LexerOptions {
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    #[must_use]
    pub fn with_allow_tabs(mut self, allow: bool) -> Self {
        self.allow_tabs = allow;
        self
    }

    #[must_use]
    pub fn with_legacy_newline_escape(mut self, legacy: bool) -> Self {
        self.legacy_newline_escape = legacy;
        self
    }

    #[must_use]
    pub fn with_strong_spaces(mut self, on: bool) -> Self {
        self.strong_spaces = on;
        self
    }

    #[must_use]
    pub fn with_retain_comments(mut self, retain: bool) -> Self {
        self.retain_comments = retain;
        self
    }

    #[must_use]
    pub fn with_max_line_length(mut self, len: u32) -> Self {
        self.max_line_length = len;
        self
    }

    #[must_use]
    pub fn with_line_offset(mut self, offset: u32) -> Self {
        self.line_offset = offset;
        self
    }
}

#[cfg(test)]
mod tests;
