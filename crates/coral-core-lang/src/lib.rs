#![warn(missing_docs)]
//! `coral-core-lang` - data-driven language definitions for `coral-core`.
//!
//! A language is a plain record: a reserved-word set, comment markers, string delimiters and
//! an operator alphabet. The tokenizer in `coral-core-highlight` is driven entirely by this
//! record, so adding a language never means writing new scanning code.
//!
//! # Example
//!
//! ```rust
//! use coral_core_lang::LanguageRegistry;
//!
//! let registry = LanguageRegistry::with_builtins();
//! let rust = registry.by_extension("rs").unwrap();
//! assert_eq!(rust.name, "Rust");
//! assert!(rust.is_keyword("fn"));
//! assert!(!rust.is_keyword("Fn"));
//! ```

mod builtin;
mod definition;
mod error;
mod registry;

pub use builtin::BuiltinLanguage;
pub use definition::{BlockComment, LanguageDefinition};
pub use error::LanguageError;
pub use registry::LanguageRegistry;
