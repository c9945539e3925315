use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Block comment delimiters (e.g. `/*` and `*/`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockComment {
    /// Opening marker.
    pub start: String,
    /// Closing marker.
    pub end: String,
}

impl BlockComment {
    /// Create a block comment pair.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Both markers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.start.is_empty() && !self.end.is_empty()
    }
}

/// Lexical description of a language.
///
/// Definitions are usually taken from [`crate::BuiltinLanguage`], but any YAML document of the
/// following shape deserializes into one:
///
/// ```yaml
/// name: Lua
/// extensions: [lua]
/// keywords: [local, function, end, if, then, else, return]
/// line_comments: ["--"]
/// block_comments:
///   - { start: "--[[", end: "]]" }
/// string_delimiters: ['"', "'"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDefinition {
    /// Display name, also used for lookup (case-insensitive).
    pub name: String,

    #[serde(default)]
    /// File extensions without the leading dot.
    pub extensions: Vec<String>,

    #[serde(default)]
    /// Reserved words highlighted as keywords.
    pub keywords: BTreeSet<String>,

    #[serde(default)]
    /// Markers that turn the rest of the line into a comment.
    pub line_comments: Vec<String>,

    #[serde(default)]
    /// Block comment pairs; a block may span lines.
    pub block_comments: Vec<BlockComment>,

    #[serde(default = "default_string_delimiters")]
    /// Characters that open (and close) a string literal.
    pub string_delimiters: Vec<char>,

    #[serde(default = "default_operators")]
    /// Characters classified as operators. Any other punctuation is `Unknown`.
    pub operators: Vec<char>,

    #[serde(default = "default_case_sensitive")]
    /// Whether keyword matching is case-sensitive.
    pub case_sensitive: bool,
}

fn default_string_delimiters() -> Vec<char> {
    vec!['"', '\'']
}

fn default_case_sensitive() -> bool {
    true
}

pub(crate) const DEFAULT_OPERATORS: &str = "+-*/%=<>!&|^~?:;,.(){}[]#@$\\";

fn default_operators() -> Vec<char> {
    DEFAULT_OPERATORS.chars().collect()
}

impl LanguageDefinition {
    /// Create a definition with no keywords, comments or strings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extensions: Vec::new(),
            keywords: BTreeSet::new(),
            line_comments: Vec::new(),
            block_comments: Vec::new(),
            string_delimiters: Vec::new(),
            operators: default_operators(),
            case_sensitive: true,
        }
    }

    /// Builder: set the reserved word set.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set the file extensions.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: add a line comment marker.
    pub fn with_line_comment(mut self, marker: impl Into<String>) -> Self {
        self.line_comments.push(marker.into());
        self
    }

    /// Builder: add a block comment pair.
    pub fn with_block_comment(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.block_comments.push(BlockComment::new(start, end));
        self
    }

    /// Builder: set the string delimiters.
    pub fn with_string_delimiters(mut self, delimiters: &[char]) -> Self {
        self.string_delimiters = delimiters.to_vec();
        self
    }

    /// Builder: set keyword case sensitivity.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Returns `true` if `word` is a reserved word of this language.
    pub fn is_keyword(&self, word: &str) -> bool {
        if self.case_sensitive {
            self.keywords.contains(word)
        } else {
            self.keywords.iter().any(|k| k.eq_ignore_ascii_case(word))
        }
    }

    /// Returns `true` if `ch` opens a string literal.
    pub fn is_string_delimiter(&self, ch: char) -> bool {
        self.string_delimiters.contains(&ch)
    }

    /// Returns `true` if `ch` is in the operator alphabet.
    pub fn is_operator(&self, ch: char) -> bool {
        self.operators.contains(&ch)
    }

    /// Returns `true` if `ext` (with or without a leading dot) belongs to this language.
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.');
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Line comment markers that are non-empty.
    pub fn line_comment_markers(&self) -> impl Iterator<Item = &str> {
        self.line_comments
            .iter()
            .map(String::as_str)
            .filter(|m| !m.is_empty())
    }

    /// Block comment pairs with both markers present.
    pub fn block_comment_pairs(&self) -> impl Iterator<Item = &BlockComment> {
        self.block_comments.iter().filter(|b| b.is_valid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_case_sensitivity() {
        let lang = LanguageDefinition::new("Test").with_keywords(["Begin", "end"]);
        assert!(lang.is_keyword("Begin"));
        assert!(!lang.is_keyword("begin"));

        let lang = lang.case_sensitive(false);
        assert!(lang.is_keyword("begin"));
        assert!(lang.is_keyword("END"));
    }

    #[test]
    fn test_extension_matching_ignores_dot_and_case() {
        let lang = LanguageDefinition::new("Test").with_extensions(["cpp", "hpp"]);
        assert!(lang.matches_extension("cpp"));
        assert!(lang.matches_extension(".HPP"));
        assert!(!lang.matches_extension("c"));
    }

    #[test]
    fn test_yaml_defaults() {
        let yaml = "name: Minimal\n";
        let lang: LanguageDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(lang.name, "Minimal");
        assert!(lang.case_sensitive);
        assert_eq!(lang.string_delimiters, vec!['"', '\'']);
        assert!(lang.is_operator('='));
        assert!(lang.keywords.is_empty());
    }

    #[test]
    fn test_invalid_block_pairs_are_skipped() {
        let lang = LanguageDefinition::new("Test")
            .with_block_comment("/*", "*/")
            .with_block_comment("", "*/");
        assert_eq!(lang.block_comment_pairs().count(), 1);
    }
}
