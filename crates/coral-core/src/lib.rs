#![warn(missing_docs)]
//! Coral Core - a headless text-editing engine
//!
//! # Overview
//!
//! `coral-core` holds the complete state of one editing session and never draws anything. A host
//! (GUI, terminal, test harness) decodes its input into [`Command`]s, hands them to
//! [`Editor::execute`], and paints whatever [`Editor::render_frame`] returns.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Editor (command dispatch)                  │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  RenderFrame (fragments, rects, status)     │  ← Rendering Data
//! ├─────────────────────────────────────────────┤
//! │  Viewport │ Selection │ Search │ Clipboard  │  ← Interaction
//! ├─────────────────────────────────────────────┤
//! │  UndoRedoManager (whole-document snapshots) │  ← History
//! ├─────────────────────────────────────────────┤
//! │  TextBuffer (rope of lines)                 │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Highlighting lives in `coral-core-highlight` and language definitions in `coral-core-lang`;
//! the types a host needs from both are re-exported here.
//!
//! # Quick Start
//!
//! ```rust
//! use coral_core::{CommandResult, CursorCommand, EditCommand, Editor, SearchOptions, ViewCommand};
//!
//! let mut editor = Editor::new();
//! editor.execute(ViewCommand::SetLanguage("Rust".into())).unwrap();
//! editor
//!     .execute(EditCommand::InsertText("fn main() {\n    let x = 1;\n}".into()))
//!     .unwrap();
//! assert_eq!(editor.buffer().line_count(), 3);
//!
//! let found = editor
//!     .execute(CursorCommand::FindNext {
//!         query: "let".into(),
//!         options: SearchOptions::default(),
//!     })
//!     .unwrap();
//! assert!(matches!(found, CommandResult::SearchMatch { .. }));
//!
//! let frame = editor.render_frame();
//! assert_eq!(frame.lines.len(), 3);
//! assert_eq!(frame.status.language, "Rust");
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - Line-oriented document storage
//! - [`history`] - Snapshot undo/redo with compound brackets and optional typing coalescence
//! - [`selection`] - Two-anchor selection, normalization and range extraction
//! - [`viewport`] - Scroll offsets and pixel/cell conversion
//! - [`search`] - Plain, whole-word and regex search
//! - [`clipboard`] - Clipboard seam and an in-memory implementation
//! - [`config`] - YAML configuration
//! - [`commands`] - Command vocabulary and results
//! - [`editor`] - The session orchestrator
//! - [`render`] - Render frame types
//!
//! # Unicode Support
//!
//! Columns count Unicode scalar values. Caret movement and single-character deletion step over
//! whole grapheme clusters, so combining marks and emoji sequences are never split.

pub mod buffer;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod editor;
pub mod history;
pub mod line_ending;
pub mod position;
pub mod render;
pub mod search;
pub mod selection;
mod text;
pub mod viewport;

pub use buffer::{BufferError, TextBuffer};
pub use clipboard::{ClipboardFormat, ClipboardService, MemoryClipboard};
pub use commands::{
    Command, CommandError, CommandResult, CursorCommand, EditCommand, ViewCommand,
};
pub use config::{ConfigError, EditorConfig, HistoryConfig, TabKeyBehavior};
pub use editor::Editor;
pub use history::{EditorSnapshot, OperationKind, UndoRedoManager};
pub use line_ending::LineEnding;
pub use position::Position;
pub use render::{
    Fragment, RenderFrame, RenderLine, ScreenPoint, ScrollbarState, SelectionRect, StatusInfo,
};
pub use search::{SearchError, SearchMatch, SearchOptions, SearchQuery};
pub use selection::{LineLengths, Selection, SelectionBounds};
pub use viewport::{ScreenRegion, Viewport, ViewportMetrics};

pub use coral_core_highlight::{
    BUILTIN_THEMES, CarryState, HighlightError, HighlightedLine, LanguageDefinition,
    LanguageRegistry, StyledSpan, SyntaxHighlighter, Theme, TokenColor, TokenKind, TokenStyle,
    UiColors,
};
