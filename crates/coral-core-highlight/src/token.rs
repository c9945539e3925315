use serde::{Deserialize, Serialize};

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Reserved word of the active language.
    Keyword,
    /// String literal, including its quotes.
    String,
    /// Line or block comment, including its markers.
    Comment,
    /// Numeric literal.
    Number,
    /// Single operator or punctuation character.
    Operator,
    /// Any other word.
    Identifier,
    /// Run of whitespace.
    Whitespace,
    /// A character outside every other class.
    Unknown,
}

impl TokenKind {
    /// Every kind, in declaration order.
    pub const ALL: [TokenKind; 8] = [
        TokenKind::Keyword,
        TokenKind::String,
        TokenKind::Comment,
        TokenKind::Number,
        TokenKind::Operator,
        TokenKind::Identifier,
        TokenKind::Whitespace,
        TokenKind::Unknown,
    ];

    /// Lower-case name, as used in theme files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::String => "string",
            Self::Comment => "comment",
            Self::Number => "number",
            Self::Operator => "operator",
            Self::Identifier => "identifier",
            Self::Whitespace => "whitespace",
            Self::Unknown => "unknown",
        }
    }
}

/// A classified span of one line.
///
/// `start` and `end` are character columns (`end` exclusive), so `end - start` equals the char
/// count of `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The covered text.
    pub text: String,
    /// Lexical class.
    pub kind: TokenKind,
    /// Start column (inclusive).
    pub start: usize,
    /// End column (exclusive).
    pub end: usize,
}

impl Token {
    /// Build a token from a char slice of the line.
    pub(crate) fn from_chars(chars: &[char], start: usize, end: usize, kind: TokenKind) -> Self {
        Self {
            text: chars[start..end].iter().collect(),
            kind,
            start,
            end,
        }
    }

    /// Width in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for a zero-width token.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
