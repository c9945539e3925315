//! Command surface consumed by the input collaborator.
//!
//! Commands are plain data: the host decodes keys, mouse events and menu actions into a
//! [`Command`] and hands it to [`crate::Editor::execute`]. Each command is applied atomically.

use crate::buffer::BufferError;
use crate::config::{ConfigError, TabKeyBehavior};
use crate::position::Position;
use crate::search::{SearchError, SearchOptions};
use crate::viewport::ViewportMetrics;
use thiserror::Error;

/// Commands that change the document (or its history).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Type one character. `'\n'` splits the line; other control characters except `'\t'` are
    /// ignored.
    InsertChar(char),
    /// Type a string, which may span lines.
    InsertText(String),
    /// Insert a tab or spaces up to the next tab stop, per [`TabKeyBehavior`].
    InsertTab,
    /// Backspace.
    DeleteBackward,
    /// Delete key.
    DeleteForward,
    /// Break the line at the caret.
    SplitLine,
    /// Join the caret line onto the line above.
    MergeUp,
    /// Restore the previous snapshot.
    Undo,
    /// Re-apply the last undone snapshot.
    Redo,
    /// Copy the selection to the clipboard and delete it.
    Cut,
    /// Insert the given text, replacing the selection.
    Paste(String),
    /// Insert the clipboard content, replacing the selection.
    PasteFromClipboard,
    /// Open a compound bracket: edits until [`EditCommand::EndCompound`] undo as one step.
    BeginCompound(String),
    /// Close the innermost compound bracket.
    EndCompound,
    /// Replace the selected match of `query`, or the next one after the caret.
    ReplaceCurrent {
        /// Search query.
        query: String,
        /// Replacement text; `$1`-style groups expand in regex mode.
        replacement: String,
        /// Search options.
        options: SearchOptions,
    },
    /// Replace every match of `query` as one undo step.
    ReplaceAll {
        /// Search query.
        query: String,
        /// Replacement text; `$1`-style groups expand in regex mode.
        replacement: String,
        /// Search options.
        options: SearchOptions,
    },
}

/// Caret and selection commands.
#[derive(Debug, Clone, PartialEq)]
pub enum CursorCommand {
    /// Move the caret by whole lines, then by grapheme clusters (wrapping at line ends).
    MoveBy(isize, isize),
    /// Place the caret. The line must exist; the column is clamped.
    SetCursor(usize, usize),
    /// Caret to column 0.
    LineStart,
    /// Caret to end of line.
    LineEnd,
    /// Caret to (0, 0).
    DocumentStart,
    /// Caret to the end of the last line.
    DocumentEnd,
    /// Anchor a selection at the caret.
    StartSelection,
    /// Move the selection's moving anchor (and the caret) to a clamped position.
    UpdateSelection(usize, usize),
    /// Drop the selection.
    ClearSelection,
    /// Select the whole document.
    SelectAll,
    /// Copy the selection to the clipboard.
    Copy,
    /// Select the next match after the selection or caret, wrapping at the end.
    FindNext {
        /// Search query.
        query: String,
        /// Search options.
        options: SearchOptions,
    },
    /// Select the previous match before the selection or caret, wrapping at the start.
    FindPrev {
        /// Search query.
        query: String,
        /// Search options.
        options: SearchOptions,
    },
    /// Mouse press at window pixel coordinates.
    ///
    /// In the text area this places the caret and anchors a selection; on a scrollbar it
    /// scrolls to the pressed track position. The gutter and status bar ignore it.
    Click {
        /// X in pixels.
        x: f32,
        /// Y in pixels.
        y: f32,
    },
    /// Mouse drag at window pixel coordinates, continuing whatever the last press started:
    /// extending the selection or dragging a scrollbar.
    Drag {
        /// X in pixels.
        x: f32,
        /// Y in pixels.
        y: f32,
    },
}

/// Scrolling, metrics and presentation commands.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    /// Scroll by lines and columns without moving the caret.
    ScrollBy(isize, isize),
    /// Put a line at the top without moving the caret.
    ScrollToLine(usize),
    /// Scroll up one screen; the caret goes to the first visible line.
    PageUp,
    /// Scroll down one screen; the caret goes to the last visible line.
    PageDown,
    /// Jump by `n` times the configured fast-scroll distance; the caret is pinned to the new
    /// top line.
    FastScroll(isize),
    /// Replace all pixel metrics.
    SetViewportMetrics(ViewportMetrics),
    /// Resize the window. Sizes must be finite and non-negative.
    Resize(f32, f32),
    /// Switch language by name.
    SetLanguage(String),
    /// Switch theme by name.
    SetTheme(String),
    /// Change the tab stop width.
    SetTabSize(usize),
    /// Change what the Tab key inserts.
    SetTabBehavior(TabKeyBehavior),
}

/// Any command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Document edits.
    Edit(EditCommand),
    /// Caret and selection.
    Cursor(CursorCommand),
    /// Viewport and presentation.
    View(ViewCommand),
}

impl From<EditCommand> for Command {
    fn from(command: EditCommand) -> Self {
        Self::Edit(command)
    }
}

impl From<CursorCommand> for Command {
    fn from(command: CursorCommand) -> Self {
        Self::Cursor(command)
    }
}

impl From<ViewCommand> for Command {
    fn from(command: ViewCommand) -> Self {
        Self::View(command)
    }
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Done, nothing to report.
    Success,
    /// Done, with text (copied or cut).
    Text(String),
    /// Undo/redo had nothing to do.
    HistoryEmpty,
    /// Done, the caret is here.
    Position(Position),
    /// A match was found and selected.
    SearchMatch {
        /// First matched position.
        start: Position,
        /// Position just past the match.
        end: Position,
    },
    /// No match.
    SearchNotFound,
    /// Replacements made.
    Replaced {
        /// Number of matches replaced.
        count: usize,
    },
}

#[derive(Debug, Error)]
/// Command failures.
pub enum CommandError {
    #[error(transparent)]
    /// A buffer operation failed.
    Buffer(#[from] BufferError),

    #[error("invalid position: line {line}, column {column}")]
    /// The addressed line does not exist.
    InvalidPosition {
        /// Requested line.
        line: usize,
        /// Requested column.
        column: usize,
    },

    #[error(transparent)]
    /// The search query was rejected.
    Search(#[from] SearchError),

    #[error("unknown language: {0}")]
    /// No registered language has this name.
    UnknownLanguage(String),

    #[error("unknown theme: {0}")]
    /// No built-in theme has this name.
    UnknownTheme(String),

    #[error("invalid argument: {0}")]
    /// A command argument is out of range.
    InvalidArgument(String),

    #[error(transparent)]
    /// The configuration was rejected.
    Config(#[from] ConfigError),
}
