//! Find and replace over a [`TextBuffer`].
//!
//! A [`SearchQuery`] compiles once (plain text is escaped into a regex) and then runs against the
//! document text joined with `'\n'`. Matches come back as document [`Position`]s, so a match may
//! span lines when a regex asks for it.
//!
//! Internally all offsets are **characters**, never bytes; they are converted only at the regex
//! boundary.

use crate::buffer::TextBuffer;
use crate::position::Position;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a query is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Distinguish upper and lower case.
    pub case_sensitive: bool,
    /// Only match runs not touching other word characters (alphanumeric or `_`).
    pub whole_word: bool,
    /// Treat the query as a regex pattern.
    pub regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
            regex: false,
        }
    }
}

#[derive(Debug, Error)]
/// Search errors.
pub enum SearchError {
    #[error("invalid regex: {0}")]
    /// The pattern did not compile.
    InvalidRegex(#[from] regex::Error),

    #[error("search query is empty")]
    /// An empty query was given where a match is required.
    EmptyQuery,
}

/// A match in the document, as a half-open position range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchMatch {
    /// First matched position.
    pub start: Position,
    /// Position just past the match.
    pub end: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CharRange {
    start: usize,
    end: usize,
}

impl CharRange {
    fn is_empty(self) -> bool {
        self.start >= self.end
    }
}

/// Char-to-byte lookup table for one string.
#[derive(Debug)]
pub(crate) struct CharIndex {
    char_to_byte: Vec<usize>,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self { char_to_byte }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.char_to_byte.len() - 1
    }

    pub(crate) fn char_to_byte(&self, offset: usize) -> usize {
        self.char_to_byte[offset.min(self.char_count())]
    }

    pub(crate) fn byte_to_char(&self, byte: usize) -> usize {
        match self.char_to_byte.binary_search(&byte) {
            Ok(i) | Err(i) => i,
        }
    }

    fn char_at(&self, text: &str, offset: usize) -> Option<char> {
        if offset >= self.char_count() {
            return None;
        }
        text[self.char_to_byte[offset]..].chars().next()
    }
}

/// The document text plus its index, built once per query call.
struct Haystack {
    text: String,
    index: CharIndex,
}

impl Haystack {
    fn of(buffer: &TextBuffer) -> Self {
        let text = buffer.to_string();
        let index = CharIndex::new(&text);
        Self { text, index }
    }

    fn to_match(&self, buffer: &TextBuffer, range: CharRange) -> SearchMatch {
        SearchMatch {
            start: buffer.char_to_position(range.start),
            end: buffer.char_to_position(range.end),
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

/// A compiled query.
///
/// # Example
///
/// ```rust
/// use coral_core::{Position, SearchOptions, SearchQuery, TextBuffer};
///
/// let buffer = TextBuffer::from_string("let a = 1;\nlet b = a;");
/// let query = SearchQuery::new("a", SearchOptions { whole_word: true, ..Default::default() })
///     .unwrap();
/// let all = query.find_all(&buffer);
/// assert_eq!(all.len(), 2);
/// assert_eq!(all[1].start, Position::new(1, 8));
/// ```
#[derive(Debug, Clone)]
pub struct SearchQuery {
    regex: Regex,
    options: SearchOptions,
}

impl SearchQuery {
    /// Compile `query` under `options`.
    pub fn new(query: &str, options: SearchOptions) -> Result<Self, SearchError> {
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let pattern = if options.regex {
            query.to_string()
        } else {
            regex::escape(query)
        };
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!options.case_sensitive)
            .multi_line(true)
            .build()?;
        Ok(Self { regex, options })
    }

    /// Options the query was compiled with.
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// First match starting at or after `from`.
    pub fn find_next(&self, buffer: &TextBuffer, from: Position) -> Option<SearchMatch> {
        let hay = Haystack::of(buffer);
        let from = buffer.position_to_char(from);
        self.next_in(&hay, from).map(|r| hay.to_match(buffer, r))
    }

    /// Last match ending at or before `before`.
    pub fn find_prev(&self, buffer: &TextBuffer, before: Position) -> Option<SearchMatch> {
        let hay = Haystack::of(buffer);
        let limit = buffer.position_to_char(before);
        self.prev_in(&hay, limit).map(|r| hay.to_match(buffer, r))
    }

    /// Every non-overlapping match, in document order.
    pub fn find_all(&self, buffer: &TextBuffer) -> Vec<SearchMatch> {
        let hay = Haystack::of(buffer);
        self.ranges_in(&hay, hay.index.char_count())
            .into_iter()
            .map(|r| hay.to_match(buffer, r))
            .collect()
    }

    /// Returns `true` if a match occupies exactly `start..end`.
    pub fn is_match_at(&self, buffer: &TextBuffer, start: Position, end: Position) -> bool {
        let hay = Haystack::of(buffer);
        let range = CharRange {
            start: buffer.position_to_char(start),
            end: buffer.position_to_char(end),
        };
        !range.is_empty() && self.next_in(&hay, range.start) == Some(range)
    }

    /// Replacement text for `m`: `$n` / `${name}` groups are expanded in regex mode, plain
    /// queries use `replacement` as is.
    pub fn expand(&self, buffer: &TextBuffer, m: &SearchMatch, replacement: &str) -> String {
        if !self.options.regex {
            return replacement.to_string();
        }
        let hay = Haystack::of(buffer);
        self.expand_at(&hay, buffer.position_to_char(m.start), replacement)
    }

    /// Every match paired with its expanded replacement, in document order.
    ///
    /// All expansions are computed against the unmodified document, so the caller can apply
    /// them back to front.
    pub fn plan_replacements(
        &self,
        buffer: &TextBuffer,
        replacement: &str,
    ) -> Vec<(SearchMatch, String)> {
        let hay = Haystack::of(buffer);
        self.ranges_in(&hay, hay.index.char_count())
            .into_iter()
            .map(|range| {
                let text = if self.options.regex {
                    self.expand_at(&hay, range.start, replacement)
                } else {
                    replacement.to_string()
                };
                (hay.to_match(buffer, range), text)
            })
            .collect()
    }

    fn expand_at(&self, hay: &Haystack, start: usize, replacement: &str) -> String {
        let mut out = String::new();
        match self.regex.captures_at(&hay.text, hay.index.char_to_byte(start)) {
            Some(caps) => caps.expand(replacement, &mut out),
            None => out.push_str(replacement),
        }
        out
    }

    fn accept(&self, hay: &Haystack, range: CharRange) -> bool {
        if range.is_empty() {
            return false;
        }
        if !self.options.whole_word {
            return true;
        }
        let before = range
            .start
            .checked_sub(1)
            .and_then(|i| hay.index.char_at(&hay.text, i));
        let after = hay.index.char_at(&hay.text, range.end);
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    }

    fn next_in(&self, hay: &Haystack, from: usize) -> Option<CharRange> {
        let mut at = from.min(hay.index.char_count());
        loop {
            let m = self.regex.find_at(&hay.text, hay.index.char_to_byte(at))?;
            let range = CharRange {
                start: hay.index.byte_to_char(m.start()),
                end: hay.index.byte_to_char(m.end()),
            };
            if self.accept(hay, range) {
                return Some(range);
            }
            if range.end >= hay.index.char_count() {
                return None;
            }
            at = if range.is_empty() {
                range.end + 1
            } else {
                range.start + 1
            };
        }
    }

    fn prev_in(&self, hay: &Haystack, limit: usize) -> Option<CharRange> {
        self.ranges_in(hay, limit).pop()
    }

    /// Accepted matches ending at or before char offset `limit`.
    ///
    /// The regex always sees the whole document so anchors and word boundaries keep their
    /// meaning near `limit`.
    fn ranges_in(&self, hay: &Haystack, limit: usize) -> Vec<CharRange> {
        self.regex
            .find_iter(&hay.text)
            .map(|m| CharRange {
                start: hay.index.byte_to_char(m.start()),
                end: hay.index.byte_to_char(m.end()),
            })
            .take_while(|range| range.end <= limit)
            .filter(|&range| self.accept(hay, range))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> SearchOptions {
        SearchOptions::default()
    }

    #[test]
    fn test_empty_query_rejected() {
        assert!(matches!(
            SearchQuery::new("", plain()),
            Err(SearchError::EmptyQuery)
        ));
    }

    #[test]
    fn test_invalid_regex() {
        let opts = SearchOptions {
            regex: true,
            ..plain()
        };
        assert!(matches!(
            SearchQuery::new("(", opts),
            Err(SearchError::InvalidRegex(_))
        ));
    }

    #[test]
    fn test_find_next_and_prev() {
        let buffer = TextBuffer::from_string("foo bar\nbar foo");
        let q = SearchQuery::new("foo", plain()).unwrap();
        let m = q.find_next(&buffer, Position::new(0, 1)).unwrap();
        assert_eq!(m.start, Position::new(1, 4));
        assert_eq!(m.end, Position::new(1, 7));
        assert!(q.find_next(&buffer, Position::new(1, 5)).is_none());

        let p = q.find_prev(&buffer, Position::new(1, 6)).unwrap();
        assert_eq!(p.start, Position::new(0, 0));
    }

    #[test]
    fn test_case_insensitive_and_unicode_columns() {
        let buffer = TextBuffer::from_string("héllo HÉLLO");
        let q = SearchQuery::new(
            "héllo",
            SearchOptions {
                case_sensitive: false,
                ..plain()
            },
        )
        .unwrap();
        let all = q.find_all(&buffer);
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].start, Position::new(0, 6));
        assert_eq!(all[1].end, Position::new(0, 11));
    }

    #[test]
    fn test_whole_word_skips_embedded() {
        let buffer = TextBuffer::from_string("cat concat cat_ cat");
        let q = SearchQuery::new(
            "cat",
            SearchOptions {
                whole_word: true,
                ..plain()
            },
        )
        .unwrap();
        let starts: Vec<usize> = q.find_all(&buffer).iter().map(|m| m.start.column).collect();
        assert_eq!(starts, vec![0, 16]);
        assert_eq!(
            q.find_next(&buffer, Position::new(0, 1)).map(|m| m.start.column),
            Some(16)
        );
    }

    #[test]
    fn test_regex_expand_and_exact_match() {
        let buffer = TextBuffer::from_string("x=1, y=22");
        let opts = SearchOptions {
            regex: true,
            ..plain()
        };
        let q = SearchQuery::new(r"(\w)=(\d+)", opts).unwrap();
        let all = q.find_all(&buffer);
        assert_eq!(all.len(), 2);
        assert_eq!(q.expand(&buffer, &all[1], "$2:$1"), "22:y");
        assert!(q.is_match_at(&buffer, all[0].start, all[0].end));
        assert!(!q.is_match_at(&buffer, Position::new(0, 1), all[0].end));

        let plan = q.plan_replacements(&buffer, "${1}:=$2");
        let texts: Vec<&str> = plan.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["x:=1", "y:=22"]);
    }

    #[test]
    fn test_regex_can_span_lines() {
        let buffer = TextBuffer::from_string("ab\ncd");
        let opts = SearchOptions {
            regex: true,
            ..plain()
        };
        let q = SearchQuery::new(r"b\nc", opts).unwrap();
        let m = q.find_next(&buffer, Position::default()).unwrap();
        assert_eq!((m.start, m.end), (Position::new(0, 1), Position::new(1, 1)));
    }

    #[test]
    fn test_find_prev_keeps_anchors_of_whole_document() {
        let buffer = TextBuffer::from_string("abcd
abc");
        let opts = SearchOptions {
            regex: true,
            ..plain()
        };
        let q = SearchQuery::new("abc$", opts).unwrap();
        assert_eq!(q.find_all(&buffer).len(), 1);
        assert!(q.find_prev(&buffer, Position::new(0, 3)).is_none());
        let m = q.find_prev(&buffer, Position::new(1, 3)).unwrap();
        assert_eq!(m.start, Position::new(1, 0));

        let q = SearchQuery::new(r"ab\b", opts).unwrap();
        assert!(q.find_prev(&buffer, Position::new(0, 2)).is_none());
    }
}
