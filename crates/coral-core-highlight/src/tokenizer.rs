//! Single-line lexical scanner.
//!
//! The scanner knows nothing about a particular language: keywords, comment markers, string
//! delimiters and operators all come from a [`LanguageDefinition`]. The only state that flows
//! between lines is [`CarryState`], which records an unterminated block comment.

use crate::token::{Token, TokenKind};
use coral_core_lang::{BlockComment, LanguageDefinition};

/// Tokenizer state carried from the end of one line to the start of the next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CarryState {
    /// Terminator of the block comment still open at end of line, if any.
    pub block_comment_end: Option<String>,
}

impl CarryState {
    /// State at the start of a document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the next line starts inside a block comment.
    pub fn in_block_comment(&self) -> bool {
        self.block_comment_end.is_some()
    }
}

/// A comment marker recognised at the current scan position.
enum CommentStart<'a> {
    Line,
    Block(&'a BlockComment),
}

/// Language-driven line tokenizer.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    language: LanguageDefinition,
}

impl Tokenizer {
    /// Create a tokenizer for `language`.
    pub fn new(language: LanguageDefinition) -> Self {
        Self { language }
    }

    /// The active language.
    pub fn language(&self) -> &LanguageDefinition {
        &self.language
    }

    /// Replace the active language.
    pub fn set_language(&mut self, language: LanguageDefinition) {
        self.language = language;
    }

    /// Tokenize one line.
    ///
    /// The returned tokens are contiguous and cover the whole line, so concatenating their text
    /// reproduces `line`. The returned [`CarryState`] is the input for the following line.
    pub fn tokenize_line(&self, line: &str, carry: &CarryState) -> (Vec<Token>, CarryState) {
        let chars: Vec<char> = line.chars().collect();
        let len = chars.len();
        let mut tokens = Vec::new();
        let mut pos = 0;

        if let Some(terminator) = &carry.block_comment_end {
            match find_marker(&chars, 0, terminator) {
                Some(idx) => {
                    pos = idx + terminator.chars().count();
                    tokens.push(Token::from_chars(&chars, 0, pos, TokenKind::Comment));
                }
                None => {
                    if len > 0 {
                        tokens.push(Token::from_chars(&chars, 0, len, TokenKind::Comment));
                    }
                    return (tokens, carry.clone());
                }
            }
        }

        let mut next = CarryState::default();

        while pos < len {
            let ch = chars[pos];

            match self.comment_start_at(&chars, pos) {
                Some(CommentStart::Line) => {
                    tokens.push(Token::from_chars(&chars, pos, len, TokenKind::Comment));
                    break;
                }
                Some(CommentStart::Block(block)) => {
                    let body = pos + block.start.chars().count();
                    match find_marker(&chars, body, &block.end) {
                        Some(idx) => {
                            let stop = idx + block.end.chars().count();
                            tokens.push(Token::from_chars(&chars, pos, stop, TokenKind::Comment));
                            pos = stop;
                            continue;
                        }
                        None => {
                            tokens.push(Token::from_chars(&chars, pos, len, TokenKind::Comment));
                            next.block_comment_end = Some(block.end.clone());
                            break;
                        }
                    }
                }
                None => {}
            }

            if self.language.is_string_delimiter(ch) {
                let stop = scan_string(&chars, pos, ch);
                tokens.push(Token::from_chars(&chars, pos, stop, TokenKind::String));
                pos = stop;
                continue;
            }

            if ch.is_whitespace() {
                let stop = run_end(&chars, pos, |c| c.is_whitespace());
                tokens.push(Token::from_chars(&chars, pos, stop, TokenKind::Whitespace));
                pos = stop;
                continue;
            }

            if is_word_char(ch) {
                let (stop, kind) = self.scan_word(&chars, pos);
                tokens.push(Token::from_chars(&chars, pos, stop, kind));
                pos = stop;
                continue;
            }

            let kind = if self.language.is_operator(ch) {
                TokenKind::Operator
            } else {
                TokenKind::Unknown
            };
            tokens.push(Token::from_chars(&chars, pos, pos + 1, kind));
            pos += 1;
        }

        (tokens, next)
    }

    /// Find the longest comment marker starting at `pos`. On a tie the line marker wins.
    fn comment_start_at(&self, chars: &[char], pos: usize) -> Option<CommentStart<'_>> {
        let mut best: Option<(usize, CommentStart<'_>)> = None;

        for marker in self.language.line_comment_markers() {
            let n = marker.chars().count();
            if starts_with_at(chars, pos, marker) && best.as_ref().is_none_or(|(len, _)| n > *len)
            {
                best = Some((n, CommentStart::Line));
            }
        }
        for block in self.language.block_comment_pairs() {
            let n = block.start.chars().count();
            if starts_with_at(chars, pos, &block.start)
                && best.as_ref().is_none_or(|(len, _)| n > *len)
            {
                best = Some((n, CommentStart::Block(block)));
            }
        }

        best.map(|(_, start)| start)
    }

    fn scan_word(&self, chars: &[char], start: usize) -> (usize, TokenKind) {
        let numeric = chars[start].is_ascii_digit();
        let mut end = start;
        while end < chars.len() {
            let c = chars[end];
            if is_word_char(c) {
                end += 1;
            } else if numeric
                && c == '.'
                && chars.get(end + 1).is_some_and(|n| n.is_ascii_digit())
            {
                end += 2;
            } else {
                break;
            }
        }

        let kind = if numeric {
            TokenKind::Number
        } else {
            let word: String = chars[start..end].iter().collect();
            if self.language.is_keyword(&word) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            }
        };
        (end, kind)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn run_end(chars: &[char], start: usize, pred: impl Fn(char) -> bool) -> usize {
    let mut end = start;
    while end < chars.len() && pred(chars[end]) {
        end += 1;
    }
    end
}

fn starts_with_at(chars: &[char], pos: usize, marker: &str) -> bool {
    let mut idx = pos;
    for m in marker.chars() {
        if chars.get(idx) != Some(&m) {
            return false;
        }
        idx += 1;
    }
    true
}

fn find_marker(chars: &[char], from: usize, marker: &str) -> Option<usize> {
    (from..chars.len()).find(|&i| starts_with_at(chars, i, marker))
}

/// Scan a string literal opened at `start`; returns the exclusive end column.
///
/// A backslash escapes the following character. An unterminated literal runs to end of line.
fn scan_string(chars: &[char], start: usize, quote: char) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}
