//! Cached, theme-aware highlighting over a whole document.
//!
//! The cache is indexed by line number and stores the tokens together with the carry state the
//! line was tokenized with and the exact line text. A cached entry is reused only when all of
//! these still match, so a stale entry can cost time but never change the output.

use crate::error::HighlightError;
use crate::theme::{Theme, TokenStyle};
use crate::token::{Token, TokenKind};
use crate::tokenizer::{CarryState, Tokenizer};
use coral_core_lang::{BuiltinLanguage, LanguageDefinition, LanguageRegistry};
use std::borrow::Cow;
use std::ops::Range;

/// Read access to a line-addressed document.
pub trait LineSource {
    /// Number of lines.
    fn line_count(&self) -> usize;
    /// Text of `line`, or an empty string when out of range.
    fn line_text(&self, line: usize) -> Cow<'_, str>;
}

impl<S: AsRef<str>> LineSource for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_text(&self, line: usize) -> Cow<'_, str> {
        self.get(line)
            .map(|s| Cow::Borrowed(s.as_ref()))
            .unwrap_or(Cow::Borrowed(""))
    }
}

impl<S: AsRef<str>> LineSource for Vec<S> {
    fn line_count(&self) -> usize {
        self.as_slice().line_count()
    }

    fn line_text(&self, line: usize) -> Cow<'_, str> {
        self.as_slice().line_text(line)
    }
}

/// A token with its resolved style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    /// Covered text.
    pub text: String,
    /// Lexical class.
    pub kind: TokenKind,
    /// Start column (inclusive).
    pub start: usize,
    /// End column (exclusive).
    pub end: usize,
    /// Color and font flags from the active theme.
    pub style: TokenStyle,
}

/// Styled spans of one document line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedLine {
    /// Zero-based line number.
    pub line: usize,
    /// Spans covering the line left to right.
    pub spans: Vec<StyledSpan>,
}

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lines served from the cache.
    pub hits: usize,
    /// Lines that had to be tokenized.
    pub misses: usize,
    /// Lines currently cached.
    pub cached_lines: usize,
}

#[derive(Debug, Clone)]
struct CachedLine {
    text: String,
    entry: CarryState,
    tokens: Vec<Token>,
    exit: CarryState,
}

/// Tokenizer plus theme plus a per-line token cache.
#[derive(Debug, Clone)]
pub struct SyntaxHighlighter {
    registry: LanguageRegistry,
    tokenizer: Tokenizer,
    theme: Theme,
    cache: Vec<Option<CachedLine>>,
    hits: usize,
    misses: usize,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    /// Plain text, dark theme, built-in languages.
    pub fn new() -> Self {
        Self::with_registry(LanguageRegistry::with_builtins())
    }

    /// Use a custom registry. The initial language is plain text.
    pub fn with_registry(registry: LanguageRegistry) -> Self {
        Self {
            registry,
            tokenizer: Tokenizer::new(BuiltinLanguage::PlainText.definition()),
            theme: Theme::dark(),
            cache: Vec::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// The language registry.
    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Mutable access to the registry, e.g. to load YAML definitions.
    pub fn registry_mut(&mut self) -> &mut LanguageRegistry {
        &mut self.registry
    }

    /// The active language.
    pub fn language(&self) -> &LanguageDefinition {
        self.tokenizer.language()
    }

    /// The active theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Select a registered language by name (case-insensitive). Clears the cache.
    pub fn set_language(&mut self, name: &str) -> Result<(), HighlightError> {
        let definition = self
            .registry
            .by_name(name)
            .cloned()
            .ok_or_else(|| HighlightError::UnknownLanguage(name.to_string()))?;
        self.apply_language(definition);
        Ok(())
    }

    /// Select a registered language by file extension. Clears the cache.
    pub fn set_language_by_extension(&mut self, ext: &str) -> Result<(), HighlightError> {
        let definition = self
            .registry
            .by_extension(ext)
            .cloned()
            .ok_or_else(|| HighlightError::UnknownExtension(ext.to_string()))?;
        self.apply_language(definition);
        Ok(())
    }

    fn apply_language(&mut self, definition: LanguageDefinition) {
        tracing::info!(language = %definition.name, "highlighter language changed");
        self.tokenizer.set_language(definition);
        self.clear_cache();
    }

    /// Select a built-in theme by name.
    ///
    /// Tokens do not depend on the theme, so the cache is kept.
    pub fn set_theme(&mut self, name: &str) -> Result<(), HighlightError> {
        let theme =
            Theme::by_name(name).ok_or_else(|| HighlightError::UnknownTheme(name.to_string()))?;
        self.set_custom_theme(theme);
        Ok(())
    }

    /// Install an arbitrary theme.
    pub fn set_custom_theme(&mut self, theme: Theme) {
        tracing::info!(theme = %theme.name, "highlighter theme changed");
        self.theme = theme;
    }

    /// Tokenize one line without touching the cache.
    pub fn tokenize_line(&self, line: &str, carry: &CarryState) -> (Vec<Token>, CarryState) {
        self.tokenizer.tokenize_line(line, carry)
    }

    /// Tokenize and style one line without touching the cache.
    pub fn highlight_line(&self, line: &str, carry: &CarryState) -> (Vec<StyledSpan>, CarryState) {
        let (tokens, next) = self.tokenizer.tokenize_line(line, carry);
        (self.style_tokens(&tokens), next)
    }

    /// Highlight `range` of `source`.
    ///
    /// Carry state is threaded from line 0, so lines before `range.start` are tokenized (or
    /// served from the cache) as well. The range is clamped to the document.
    pub fn highlight_lines<L>(&mut self, source: &L, range: Range<usize>) -> Vec<HighlightedLine>
    where
        L: LineSource + ?Sized,
    {
        let line_count = source.line_count();
        if self.cache.len() > line_count {
            self.cache.truncate(line_count);
        }

        let end = range.end.min(line_count);
        let start = range.start.min(end);
        let mut out = Vec::with_capacity(end - start);
        let mut carry = CarryState::new();

        for line in 0..end {
            let text = source.line_text(line);
            let cached = self
                .cache
                .get(line)
                .and_then(Option::as_ref)
                .filter(|c| c.entry == carry && c.text == text.as_ref());

            let (tokens, exit) = match cached {
                Some(c) => {
                    self.hits += 1;
                    let tokens = if line >= start {
                        Some(c.tokens.clone())
                    } else {
                        None
                    };
                    (tokens, c.exit.clone())
                }
                None => {
                    self.misses += 1;
                    let (tokens, exit) = self.tokenizer.tokenize_line(&text, &carry);
                    let entry = CachedLine {
                        text: text.into_owned(),
                        entry: carry.clone(),
                        tokens: tokens.clone(),
                        exit: exit.clone(),
                    };
                    if self.cache.len() <= line {
                        self.cache.resize(line + 1, None);
                    }
                    self.cache[line] = Some(entry);
                    (Some(tokens), exit)
                }
            };

            if line >= start
                && let Some(tokens) = tokens
            {
                out.push(HighlightedLine {
                    line,
                    spans: self.style_tokens(&tokens),
                });
            }
            carry = exit;
        }

        out
    }

    /// Drop the cached tokens of `line`.
    pub fn mark_line_dirty(&mut self, line: usize) {
        if let Some(slot) = self.cache.get_mut(line) {
            tracing::trace!(line, "highlight cache line invalidated");
            *slot = None;
        }
    }

    /// Drop the cached tokens of `line` and every line after it.
    pub fn mark_lines_dirty_from(&mut self, line: usize) {
        if line < self.cache.len() {
            tracing::trace!(from = line, "highlight cache truncated");
            self.cache.truncate(line);
        }
    }

    /// Drop the whole cache.
    pub fn clear_cache(&mut self) {
        tracing::trace!("highlight cache cleared");
        self.cache.clear();
    }

    /// Whether `line` currently has a cached entry.
    pub fn is_cached(&self, line: usize) -> bool {
        self.cache.get(line).is_some_and(Option::is_some)
    }

    /// Hit/miss counters.
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            cached_lines: self.cache.iter().filter(|c| c.is_some()).count(),
        }
    }

    fn style_tokens(&self, tokens: &[Token]) -> Vec<StyledSpan> {
        tokens
            .iter()
            .map(|t| StyledSpan {
                text: t.text.clone(),
                kind: t.kind,
                start: t.start,
                end: t.end,
                style: self.theme.style_for(t.kind),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Vec<&'static str> {
        vec!["int a = 1;", "/* open", "still", "close */ b", "c"]
    }

    #[test]
    fn test_second_pass_hits_cache() {
        let mut hl = SyntaxHighlighter::new();
        hl.set_language("C").unwrap();
        let source = doc();
        let first = hl.highlight_lines(&source, 0..5);
        let stats = hl.cache_stats();
        assert_eq!(stats.misses, 5);
        assert_eq!(stats.cached_lines, 5);

        let second = hl.highlight_lines(&source, 0..5);
        assert_eq!(first, second);
        assert_eq!(hl.cache_stats().hits, 5);
    }

    #[test]
    fn test_dirty_line_is_retokenized() {
        let mut hl = SyntaxHighlighter::new();
        hl.set_language("C").unwrap();
        let mut source = doc();
        hl.highlight_lines(&source, 0..5);

        source[1] = "// no longer open";
        hl.mark_line_dirty(1);
        assert!(!hl.is_cached(1));

        let lines = hl.highlight_lines(&source, 2..5);
        assert_eq!(lines[0].line, 2);
        assert_eq!(lines[0].spans[0].kind, TokenKind::Identifier);
        assert_eq!(lines[1].spans[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_stale_text_is_never_served() {
        let mut hl = SyntaxHighlighter::new();
        hl.set_language("C").unwrap();
        let mut source = doc();
        hl.highlight_lines(&source, 0..5);

        // Edited without marking dirty: the text check still catches it.
        source[0] = "\"str\"";
        let lines = hl.highlight_lines(&source, 0..1);
        assert_eq!(lines[0].spans[0].kind, TokenKind::String);
    }

    #[test]
    fn test_range_is_clamped() {
        let mut hl = SyntaxHighlighter::new();
        let source = vec!["a", "b"];
        let lines = hl.highlight_lines(&source, 1..10);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line, 1);
        assert!(hl.highlight_lines(&source, 5..9).is_empty());
    }

    #[test]
    fn test_language_switch_clears_cache() {
        let mut hl = SyntaxHighlighter::new();
        hl.highlight_lines(&doc(), 0..5);
        assert!(hl.is_cached(0));
        hl.set_language_by_extension("py").unwrap();
        assert_eq!(hl.language().name, "Python");
        assert!(!hl.is_cached(0));
    }

    #[test]
    fn test_unknown_language_and_theme() {
        let mut hl = SyntaxHighlighter::new();
        assert!(matches!(
            hl.set_language("Brainfuck"),
            Err(HighlightError::UnknownLanguage(_))
        ));
        assert!(matches!(
            hl.set_language_by_extension("bf"),
            Err(HighlightError::UnknownExtension(_))
        ));
        assert!(matches!(
            hl.set_theme("neon"),
            Err(HighlightError::UnknownTheme(_))
        ));
        assert_eq!(hl.language().name, "Plain Text");
        assert_eq!(hl.theme().name, "dark");
    }

    #[test]
    fn test_theme_switch_restyles_without_retokenizing() {
        let mut hl = SyntaxHighlighter::new();
        hl.set_language("Rust").unwrap();
        let source = vec!["fn main() {}"];
        hl.highlight_lines(&source, 0..1);
        hl.set_theme("monokai").unwrap();
        let lines = hl.highlight_lines(&source, 0..1);
        assert_eq!(hl.cache_stats().misses, 1);
        assert_eq!(lines[0].spans[0].style, Theme::monokai().keyword);
    }
}
