//! Tokenizer coverage checks.
//!
//! For every line, the emitted tokens must be contiguous, start at column 0, end at the line's
//! char length, and their concatenated text must equal the input.

use coral_core_highlight::{BuiltinLanguage, CarryState, Token, TokenKind, Tokenizer};
use pretty_assertions::assert_eq;
use rand::Rng;
use rand::seq::SliceRandom;

const FRAGMENTS: &[&str] = &[
    "int", "fn", "x", "_y2", "42", "3.14", " ", "\t", "  ", "\"", "'", "\\", "//", "/*", "*/",
    "#", "=", "+", "(", ")", "{", "}", ";", ".", "你好", "é", "👋", "§", "`",
];

fn assert_covers(line: &str, tokens: &[Token]) {
    let mut col = 0;
    for token in tokens {
        assert_eq!(token.start, col, "gap before {token:?} in {line:?}");
        assert_eq!(token.len(), token.text.chars().count());
        assert!(!token.is_empty(), "empty token in {line:?}");
        col = token.end;
    }
    assert_eq!(col, line.chars().count());
    let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(joined, line);
}

#[test]
fn test_random_lines_are_fully_covered() {
    let mut rng = rand::thread_rng();

    for lang in BuiltinLanguage::ALL {
        let tokenizer = Tokenizer::new(lang.definition());
        let mut carry = CarryState::new();

        for _ in 0..300 {
            let pieces = rng.gen_range(0..12);
            let line: String = (0..pieces)
                .map(|_| *FRAGMENTS.choose(&mut rng).unwrap())
                .collect();

            let (tokens, next) = tokenizer.tokenize_line(&line, &carry);
            assert_covers(&line, &tokens);
            carry = next;
        }
    }
}

#[test]
fn test_unterminated_string_scenario() {
    let tokenizer = Tokenizer::new(BuiltinLanguage::C.definition());
    let (tokens, _) = tokenizer.tokenize_line("x = \"unterminated", &CarryState::new());

    let summary: Vec<(TokenKind, &str)> =
        tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
    assert_eq!(
        summary,
        vec![
            (TokenKind::Identifier, "x"),
            (TokenKind::Whitespace, " "),
            (TokenKind::Operator, "="),
            (TokenKind::Whitespace, " "),
            (TokenKind::String, "\"unterminated"),
        ]
    );
}

#[test]
fn test_python_keywords_and_comments() {
    let tokenizer = Tokenizer::new(BuiltinLanguage::Python.definition());
    let (tokens, carry) = tokenizer.tokenize_line("def f(): # /* not a block", &CarryState::new());

    assert_eq!(tokens[0].kind, TokenKind::Keyword);
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Comment);
    assert!(!carry.in_block_comment());
}

#[test]
fn test_rust_lifetime_quote_is_not_a_string() {
    let tokenizer = Tokenizer::new(BuiltinLanguage::Rust.definition());
    let (tokens, _) = tokenizer.tokenize_line("fn f<'a>(x: &'a str)", &CarryState::new());
    assert!(tokens.iter().all(|t| t.kind != TokenKind::String));
}

#[test]
fn test_multi_line_block_comment_document() {
    let tokenizer = Tokenizer::new(BuiltinLanguage::Java.definition());
    let lines = ["/**", " * Docs with \"quotes\"", " */", "class A {}"];
    let mut carry = CarryState::new();
    let mut first_kinds = Vec::new();

    for line in lines {
        let (tokens, next) = tokenizer.tokenize_line(line, &carry);
        assert_covers(line, &tokens);
        first_kinds.push(tokens[0].kind);
        carry = next;
    }

    assert_eq!(
        first_kinds,
        vec![
            TokenKind::Comment,
            TokenKind::Comment,
            TokenKind::Comment,
            TokenKind::Keyword
        ]
    );
    assert!(!carry.in_block_comment());
}
