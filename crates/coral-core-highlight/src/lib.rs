#![warn(missing_docs)]
//! `coral-core-highlight` - lexical highlighting for `coral-core`.
//!
//! # Overview
//!
//! - [`Tokenizer`] classifies one line at a time, threading a [`CarryState`] across lines so that
//!   block comments can span them.
//! - [`Theme`] maps each [`TokenKind`] to a [`TokenStyle`] (color plus bold/italic).
//! - [`SyntaxHighlighter`] combines both with a per-line cache keyed by line index.
//!
//! Tokenization always covers the whole line: joining the text of the emitted tokens gives back
//! the input, which lets a renderer draw colored fragments without re-scanning.
//!
//! # Example
//!
//! ```rust
//! use coral_core_highlight::{CarryState, SyntaxHighlighter, TokenKind};
//!
//! let mut highlighter = SyntaxHighlighter::new();
//! highlighter.set_language("C++").unwrap();
//!
//! let (tokens, carry) = highlighter.tokenize_line("int x = 42; /* note", &CarryState::new());
//! assert_eq!(tokens[0].kind, TokenKind::Keyword);
//! assert!(carry.in_block_comment());
//!
//! let text: String = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(text, "int x = 42; /* note");
//! ```

mod error;
mod highlighter;
mod theme;
mod token;
mod tokenizer;

pub use error::HighlightError;
pub use highlighter::{CacheStats, HighlightedLine, LineSource, StyledSpan, SyntaxHighlighter};
pub use theme::{BUILTIN_THEMES, Theme, TokenColor, TokenStyle, UiColors};
pub use token::{Token, TokenKind};
pub use tokenizer::{CarryState, Tokenizer};

pub use coral_core_lang::{BuiltinLanguage, LanguageDefinition, LanguageRegistry};
