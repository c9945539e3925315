//! The editor orchestrator.
//!
//! [`Editor`] owns one session: the buffer, caret, selection, undo history, viewport,
//! highlighter, clipboard and configuration. Hosts drive it exclusively through
//! [`Editor::execute`] and read it back through accessors and [`Editor::render_frame`].
//!
//! Every command that is about to change the document first records the current state with
//! [`UndoRedoManager::save_state`]. After every command the caret is clamped into the document,
//! kept visible (except for the pure scroll commands) and the scroll offsets are clamped.

use crate::buffer::TextBuffer;
use crate::clipboard::{ClipboardService, MemoryClipboard};
use crate::commands::{
    Command, CommandError, CommandResult, CursorCommand, EditCommand, ViewCommand,
};
use crate::config::{EditorConfig, TabKeyBehavior};
use crate::history::{OperationKind, UndoRedoManager};
use crate::position::Position;
use crate::search::{SearchMatch, SearchOptions, SearchQuery};
use crate::selection::{self, Selection, SelectionBounds};
use crate::text::{grapheme_len_at, grapheme_len_before};
use crate::viewport::{ScreenRegion, Viewport, ViewportMetrics};
use coral_core_highlight::{HighlightError, SyntaxHighlighter};

/// A headless editing session.
///
/// # Example
///
/// ```rust
/// use coral_core::{CursorCommand, EditCommand, Editor, Position};
///
/// let mut editor = Editor::from_text("abc");
/// editor.execute(CursorCommand::LineEnd).unwrap();
/// editor.execute(EditCommand::SplitLine).unwrap();
/// assert_eq!(editor.lines(), vec!["abc", ""]);
/// assert_eq!(editor.cursor(), Position::new(1, 0));
///
/// editor.execute(EditCommand::Undo).unwrap();
/// assert_eq!(editor.text(), "abc");
/// ```
#[derive(Debug)]
pub struct Editor<C: ClipboardService = MemoryClipboard> {
    pub(crate) buffer: TextBuffer,
    pub(crate) cursor: Position,
    pub(crate) selection: Selection,
    pub(crate) history: UndoRedoManager,
    pub(crate) viewport: Viewport,
    pub(crate) highlighter: SyntaxHighlighter,
    pub(crate) clipboard: C,
    pub(crate) config: EditorConfig,
    saved: TextBuffer,
    /// Region the last mouse press landed in; drags continue it.
    pressed: Option<ScreenRegion>,
}

impl Default for Editor<MemoryClipboard> {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor<MemoryClipboard> {
    /// Empty document with the default configuration.
    pub fn new() -> Self {
        let config = EditorConfig::default();
        let clipboard = MemoryClipboard::new(config.clipboard_history);
        Self::assemble(config, clipboard, SyntaxHighlighter::new())
    }

    /// Default configuration, document loaded from `text`.
    pub fn from_text(text: &str) -> Self {
        let mut editor = Self::new();
        editor.load_text(text);
        editor
    }

    /// Empty document with `config` and an in-memory clipboard.
    pub fn from_config(config: EditorConfig) -> Result<Self, CommandError> {
        let clipboard = MemoryClipboard::new(config.clipboard_history);
        Self::with_clipboard(config, clipboard)
    }
}

impl<C: ClipboardService> Editor<C> {
    /// Empty document with `config` and a host-provided clipboard.
    pub fn with_clipboard(config: EditorConfig, clipboard: C) -> Result<Self, CommandError> {
        config.validate()?;
        let mut highlighter = SyntaxHighlighter::new();
        highlighter
            .set_language(&config.language)
            .map_err(highlight_error)?;
        highlighter.set_theme(&config.theme).map_err(highlight_error)?;
        Ok(Self::assemble(config, clipboard, highlighter))
    }

    fn assemble(config: EditorConfig, clipboard: C, highlighter: SyntaxHighlighter) -> Self {
        Self {
            buffer: TextBuffer::new(),
            cursor: Position::default(),
            selection: Selection::default(),
            history: UndoRedoManager::from_config(&config.history),
            viewport: Viewport::new(config.viewport),
            highlighter,
            clipboard,
            config,
            saved: TextBuffer::new(),
            pressed: None,
        }
    }

    /// Replace the document, resetting caret, selection, scroll and history.
    ///
    /// The loaded text counts as saved.
    pub fn load_text(&mut self, text: &str) {
        self.buffer = TextBuffer::from_string(text);
        self.saved = self.buffer.clone();
        self.cursor = Position::default();
        self.selection = Selection::default();
        self.history.clear();
        self.highlighter.clear_cache();
        self.viewport.set_scroll_position(0, 0);
        self.pressed = None;
        tracing::debug!(lines = self.buffer.line_count(), "document loaded");
    }

    /// Document text, lines joined with `'\n'`.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Document lines.
    pub fn lines(&self) -> Vec<String> {
        self.buffer.lines()
    }

    /// The document.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Caret position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Selection anchors.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected text, if anything non-empty is selected.
    pub fn selected_text(&self) -> Option<String> {
        let bounds = self.selected_bounds()?;
        selection::extract_text(&self.buffer, &bounds).ok()
    }

    /// Undo history.
    pub fn history(&self) -> &UndoRedoManager {
        &self.history
    }

    /// Scroll state and metrics.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The highlighter.
    pub fn highlighter(&self) -> &SyntaxHighlighter {
        &self.highlighter
    }

    /// Mutable highlighter access, e.g. to register languages.
    pub fn highlighter_mut(&mut self) -> &mut SyntaxHighlighter {
        &mut self.highlighter
    }

    /// The clipboard.
    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Mutable clipboard access.
    pub fn clipboard_mut(&mut self) -> &mut C {
        &mut self.clipboard
    }

    /// Current configuration (kept in sync by view commands).
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Whether the document differs from the last saved or loaded state.
    pub fn is_modified(&self) -> bool {
        self.buffer != self.saved
    }

    /// Record the current document as saved.
    pub fn mark_saved(&mut self) {
        self.saved = self.buffer.clone();
    }

    /// Whether undo is possible.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo is possible.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Select a language by file extension.
    pub fn set_language_by_extension(&mut self, ext: &str) -> Result<(), CommandError> {
        self.highlighter
            .set_language_by_extension(ext)
            .map_err(highlight_error)?;
        self.config.language = self.highlighter.language().name.clone();
        Ok(())
    }

    /// Apply one command.
    pub fn execute(&mut self, command: impl Into<Command>) -> Result<CommandResult, CommandError> {
        let command = command.into();
        tracing::trace!(?command, "execute");

        if !matches!(command, Command::Edit(_)) {
            self.history.break_group();
        }
        let follow_cursor = match &command {
            Command::View(ViewCommand::ScrollBy(..) | ViewCommand::ScrollToLine(_)) => false,
            Command::Cursor(CursorCommand::Click { x, y }) => {
                self.viewport.hit_test(*x, *y) == ScreenRegion::Text
            }
            Command::Cursor(CursorCommand::Drag { x, y }) => {
                self.drag_region(*x, *y) == ScreenRegion::Text
            }
            _ => true,
        };
        if !matches!(
            command,
            Command::Cursor(CursorCommand::Click { .. } | CursorCommand::Drag { .. })
        ) {
            self.pressed = None;
        }

        let result = match command {
            Command::Edit(command) => self.execute_edit(command),
            Command::Cursor(command) => self.execute_cursor(command),
            Command::View(command) => self.execute_view(command),
        };
        self.settle(follow_cursor);
        result
    }

    /// Apply commands in order, stopping at the first failure.
    pub fn execute_batch<I>(&mut self, commands: I) -> Result<Vec<CommandResult>, CommandError>
    where
        I: IntoIterator,
        I::Item: Into<Command>,
    {
        commands
            .into_iter()
            .map(|command| self.execute(command))
            .collect()
    }

    fn settle(&mut self, follow_cursor: bool) {
        self.cursor = self.buffer.clamp_position(self.cursor);
        let total = self.buffer.line_count();
        if follow_cursor {
            self.viewport
                .ensure_cursor_visible(self.cursor.line, self.cursor.column, total);
        }
        // One extra column keeps the end-of-line caret slot reachable.
        self.viewport
            .clamp_scroll(total, self.buffer.max_line_len() + 1);
    }

    // ---- edits ----

    fn execute_edit(&mut self, command: EditCommand) -> Result<CommandResult, CommandError> {
        let keeps_selection = matches!(
            command,
            EditCommand::BeginCompound(_)
                | EditCommand::EndCompound
                | EditCommand::ReplaceCurrent { .. }
        );

        let result = match command {
            EditCommand::InsertChar('\n') => self.split_line(),
            EditCommand::InsertChar(ch) if ch.is_control() && ch != '\t' => {
                Ok(CommandResult::Success)
            }
            EditCommand::InsertChar(ch) => self.insert_char(ch),
            EditCommand::InsertText(text) => self.insert_replacing_selection(&text, "Insert text"),
            EditCommand::InsertTab => {
                let text = self.tab_text();
                self.insert_replacing_selection(&text, "Insert tab")
            }
            EditCommand::DeleteBackward => self.delete_backward(),
            EditCommand::DeleteForward => self.delete_forward(),
            EditCommand::SplitLine => self.split_line(),
            EditCommand::MergeUp => self.merge_up(),
            EditCommand::Undo => self.undo(),
            EditCommand::Redo => self.redo(),
            EditCommand::Cut => self.cut(),
            EditCommand::Paste(text) => self.insert_replacing_selection(&text, "Paste"),
            EditCommand::PasteFromClipboard => {
                let text = self.clipboard.text();
                self.insert_replacing_selection(&text, "Paste")
            }
            EditCommand::BeginCompound(description) => {
                self.history.begin_compound_operation(description);
                Ok(CommandResult::Success)
            }
            EditCommand::EndCompound => {
                if self.history.end_compound_operation() {
                    Ok(CommandResult::Success)
                } else {
                    Err(CommandError::InvalidArgument(
                        "no compound operation is open".to_string(),
                    ))
                }
            }
            EditCommand::ReplaceCurrent {
                query,
                replacement,
                options,
            } => self.replace_current(&query, &replacement, options),
            EditCommand::ReplaceAll {
                query,
                replacement,
                options,
            } => self.replace_all(&query, &replacement, options),
        }?;

        if !keeps_selection {
            self.selection.clear();
        }
        Ok(result)
    }

    fn save_state(&mut self, kind: OperationKind, description: impl Into<String>) {
        self.history
            .save_state(&self.buffer, self.cursor, kind, description);
    }

    /// Non-empty selection bounds, clamped to the document.
    fn selected_bounds(&self) -> Option<SelectionBounds> {
        if !self.selection.has_selection() {
            return None;
        }
        self.selection
            .bounds(&self.buffer)
            .filter(|bounds| !bounds.is_empty())
    }

    /// Delete the selection without recording history. Returns `false` if nothing was selected.
    fn delete_selection(&mut self) -> Result<bool, CommandError> {
        let Some(bounds) = self.selected_bounds() else {
            return Ok(false);
        };
        self.cursor = selection::delete_range(&mut self.buffer, &bounds)?;
        self.selection.clear();
        self.mark_dirty(bounds.min_line, !bounds.is_single_line());
        Ok(true)
    }

    fn mark_dirty(&mut self, line: usize, lines_shifted: bool) {
        if lines_shifted {
            self.highlighter.mark_lines_dirty_from(line);
        } else {
            self.highlighter.mark_line_dirty(line);
        }
    }

    fn insert_at_cursor(&mut self, text: &str) -> Result<(), CommandError> {
        let line = self.cursor.line;
        if text.contains(['\n', '\r']) {
            self.cursor = self.buffer.insert_multiline(self.cursor, text)?;
            self.mark_dirty(line, true);
        } else {
            self.buffer.insert_text(line, self.cursor.column, text)?;
            self.cursor.column += text.chars().count();
            self.mark_dirty(line, false);
        }
        Ok(())
    }

    fn insert_char(&mut self, ch: char) -> Result<CommandResult, CommandError> {
        let kind = if self.selected_bounds().is_some() {
            OperationKind::Replace
        } else {
            OperationKind::Insert
        };
        self.save_state(kind, format!("Insert '{ch}'"));
        self.delete_selection()?;
        self.buffer
            .insert_char(self.cursor.line, self.cursor.column, ch)?;
        self.cursor.column += 1;
        self.mark_dirty(self.cursor.line, false);
        Ok(CommandResult::Success)
    }

    fn insert_replacing_selection(
        &mut self,
        text: &str,
        description: &str,
    ) -> Result<CommandResult, CommandError> {
        if text.is_empty() {
            return Ok(CommandResult::Success);
        }
        let kind = if self.selected_bounds().is_some() {
            OperationKind::Replace
        } else {
            OperationKind::Insert
        };
        self.save_state(kind, description);
        self.delete_selection()?;
        self.insert_at_cursor(text)?;
        Ok(CommandResult::Success)
    }

    fn tab_text(&self) -> String {
        match self.config.tab_behavior {
            TabKeyBehavior::Tab => "\t".to_string(),
            TabKeyBehavior::Spaces => {
                let tab = self.config.tab_size.max(1);
                " ".repeat(tab - self.cursor.column % tab)
            }
        }
    }

    fn delete_backward(&mut self) -> Result<CommandResult, CommandError> {
        if self.selected_bounds().is_some() {
            self.save_state(OperationKind::Delete, "Delete selection");
            self.delete_selection()?;
            return Ok(CommandResult::Success);
        }

        let Position { line, column } = self.cursor;
        if column > 0 {
            let width = grapheme_len_before(&self.buffer.line(line), column);
            self.save_state(OperationKind::Delete, "Delete backward");
            self.buffer.delete_range(line, column - width, width)?;
            self.cursor.column -= width;
            self.mark_dirty(line, false);
        } else if line > 0 {
            self.save_state(OperationKind::Delete, "Join lines");
            let prev_len = self.buffer.line_len(line - 1);
            self.buffer.merge_line(line - 1)?;
            self.cursor = Position::new(line - 1, prev_len);
            self.mark_dirty(line - 1, true);
        }
        Ok(CommandResult::Success)
    }

    fn delete_forward(&mut self) -> Result<CommandResult, CommandError> {
        if self.selected_bounds().is_some() {
            self.save_state(OperationKind::Delete, "Delete selection");
            self.delete_selection()?;
            return Ok(CommandResult::Success);
        }

        let Position { line, column } = self.cursor;
        if column < self.buffer.line_len(line) {
            let width = grapheme_len_at(&self.buffer.line(line), column).max(1);
            self.save_state(OperationKind::Delete, "Delete forward");
            self.buffer.delete_range(line, column, width)?;
            self.mark_dirty(line, false);
        } else if line + 1 < self.buffer.line_count() {
            self.save_state(OperationKind::Delete, "Join lines");
            self.buffer.merge_line(line)?;
            self.mark_dirty(line, true);
        }
        Ok(CommandResult::Success)
    }

    fn split_line(&mut self) -> Result<CommandResult, CommandError> {
        self.save_state(OperationKind::Insert, "New line");
        self.history.break_group();
        self.delete_selection()?;
        let Position { line, column } = self.cursor;
        self.buffer.split_line(line, column)?;
        self.cursor = Position::new(line + 1, 0);
        self.mark_dirty(line, true);
        Ok(CommandResult::Success)
    }

    fn merge_up(&mut self) -> Result<CommandResult, CommandError> {
        let line = self.cursor.line;
        if line == 0 {
            return Ok(CommandResult::Success);
        }
        self.save_state(OperationKind::Delete, "Merge lines");
        let prev_len = self.buffer.line_len(line - 1);
        self.buffer.merge_line(line - 1)?;
        self.cursor = Position::new(line - 1, prev_len);
        self.mark_dirty(line - 1, true);
        Ok(CommandResult::Success)
    }

    fn undo(&mut self) -> Result<CommandResult, CommandError> {
        let before = self.buffer.clone();
        if !self.history.undo(&mut self.buffer, &mut self.cursor) {
            return Ok(CommandResult::HistoryEmpty);
        }
        self.invalidate_changed_lines(&before);
        Ok(CommandResult::Success)
    }

    fn redo(&mut self) -> Result<CommandResult, CommandError> {
        let before = self.buffer.clone();
        if !self.history.redo(&mut self.buffer, &mut self.cursor) {
            return Ok(CommandResult::HistoryEmpty);
        }
        self.invalidate_changed_lines(&before);
        Ok(CommandResult::Success)
    }

    fn invalidate_changed_lines(&mut self, before: &TextBuffer) {
        if let Some(line) = before.first_difference(&self.buffer) {
            self.highlighter.mark_lines_dirty_from(line);
        }
    }

    fn cut(&mut self) -> Result<CommandResult, CommandError> {
        let Some(bounds) = self.selected_bounds() else {
            return Ok(CommandResult::Success);
        };
        let text = selection::extract_text(&self.buffer, &bounds)?;
        self.clipboard.set_text(&text);
        self.save_state(OperationKind::Delete, "Cut");
        self.delete_selection()?;
        Ok(CommandResult::Text(text))
    }

    /// Replace `m` with `text`; returns the position just past the inserted text.
    fn replace_range(&mut self, m: SearchMatch, text: &str) -> Result<Position, CommandError> {
        let bounds = selection::normalize(m.start.line, m.start.column, m.end.line, m.end.column);
        let start = selection::delete_range(&mut self.buffer, &bounds)?;
        let end = self.buffer.insert_multiline(start, text)?;
        self.mark_dirty(start.line, true);
        Ok(end)
    }

    fn replace_current(
        &mut self,
        query: &str,
        replacement: &str,
        options: SearchOptions,
    ) -> Result<CommandResult, CommandError> {
        let query = SearchQuery::new(query, options)?;
        let selected = self
            .selected_bounds()
            .filter(|b| query.is_match_at(&self.buffer, b.start(), b.end()))
            .map(|b| SearchMatch {
                start: b.start(),
                end: b.end(),
            });
        let target = selected.or_else(|| self.find_forward(&query, self.cursor));
        let Some(target) = target else {
            return Ok(CommandResult::SearchNotFound);
        };

        let text = query.expand(&self.buffer, &target, replacement);
        self.save_state(OperationKind::Replace, "Replace");
        let end = self.replace_range(target, &text)?;
        self.selection = Selection::new(target.start, end);
        self.cursor = end;
        Ok(CommandResult::Replaced { count: 1 })
    }

    fn replace_all(
        &mut self,
        query: &str,
        replacement: &str,
        options: SearchOptions,
    ) -> Result<CommandResult, CommandError> {
        let query = SearchQuery::new(query, options)?;
        let plan = query.plan_replacements(&self.buffer, replacement);
        if plan.is_empty() {
            return Ok(CommandResult::Replaced { count: 0 });
        }

        self.save_state(OperationKind::Replace, format!("Replace all ({})", plan.len()));
        for (m, text) in plan.iter().rev() {
            self.replace_range(*m, text)?;
        }
        tracing::debug!(count = plan.len(), "replace all");
        Ok(CommandResult::Replaced { count: plan.len() })
    }

    // ---- caret and selection ----

    fn execute_cursor(&mut self, command: CursorCommand) -> Result<CommandResult, CommandError> {
        match command {
            CursorCommand::MoveBy(delta_line, delta_col) => {
                self.move_by(delta_line, delta_col);
                self.selection.clear();
            }
            CursorCommand::SetCursor(line, column) => {
                if line >= self.buffer.line_count() {
                    return Err(CommandError::InvalidPosition { line, column });
                }
                self.cursor = self.buffer.clamp_position(Position::new(line, column));
                self.selection.clear();
            }
            CursorCommand::LineStart => {
                self.cursor.column = 0;
                self.selection.clear();
            }
            CursorCommand::LineEnd => {
                self.cursor.column = self.buffer.line_len(self.cursor.line);
                self.selection.clear();
            }
            CursorCommand::DocumentStart => {
                self.cursor = Position::default();
                self.selection.clear();
            }
            CursorCommand::DocumentEnd => {
                let last = self.buffer.line_count() - 1;
                self.cursor = Position::new(last, self.buffer.line_len(last));
                self.selection.clear();
            }
            CursorCommand::StartSelection => {
                self.selection = Selection::caret(self.cursor);
            }
            CursorCommand::UpdateSelection(line, column) => {
                let pos = self.buffer.clamp_position(Position::new(line, column));
                self.extend_selection(pos);
            }
            CursorCommand::ClearSelection => self.selection.clear(),
            CursorCommand::SelectAll => {
                self.selection = Selection::select_all(&self.buffer);
                self.cursor = self.selection.end;
            }
            CursorCommand::Copy => {
                let Some(text) = self.selected_text() else {
                    return Ok(CommandResult::Success);
                };
                self.clipboard.set_text(&text);
                return Ok(CommandResult::Text(text));
            }
            CursorCommand::FindNext { query, options } => {
                return self.find(&query, options, true);
            }
            CursorCommand::FindPrev { query, options } => {
                return self.find(&query, options, false);
            }
            CursorCommand::Click { x, y } => return Ok(self.press(x, y)),
            CursorCommand::Drag { x, y } => return Ok(self.drag(x, y)),
        }
        Ok(CommandResult::Success)
    }

    fn press(&mut self, x: f32, y: f32) -> CommandResult {
        let region = self.viewport.hit_test(x, y);
        self.pressed = Some(region);
        match region {
            ScreenRegion::Text => {
                let pos = self.buffer.clamp_position(self.viewport.screen_to_text(x, y));
                self.cursor = pos;
                self.selection = Selection::caret(pos);
                CommandResult::Position(pos)
            }
            ScreenRegion::VerticalScrollbar | ScreenRegion::HorizontalScrollbar => {
                self.scroll_to_pointer(region, x, y);
                CommandResult::Success
            }
            ScreenRegion::Gutter | ScreenRegion::Corner | ScreenRegion::StatusBar => {
                CommandResult::Success
            }
        }
    }

    fn drag(&mut self, x: f32, y: f32) -> CommandResult {
        match self.drag_region(x, y) {
            ScreenRegion::Text => {
                let pos = self.buffer.clamp_position(self.viewport.screen_to_text(x, y));
                self.extend_selection(pos);
                CommandResult::Position(pos)
            }
            region @ (ScreenRegion::VerticalScrollbar | ScreenRegion::HorizontalScrollbar) => {
                self.scroll_to_pointer(region, x, y);
                CommandResult::Success
            }
            ScreenRegion::Gutter | ScreenRegion::Corner | ScreenRegion::StatusBar => {
                CommandResult::Success
            }
        }
    }

    /// A drag without a preceding press acts on whatever lies under the pointer.
    fn drag_region(&self, x: f32, y: f32) -> ScreenRegion {
        self.pressed.unwrap_or_else(|| self.viewport.hit_test(x, y))
    }

    fn scroll_to_pointer(&mut self, region: ScreenRegion, x: f32, y: f32) {
        if region == ScreenRegion::VerticalScrollbar {
            let ratio = self.viewport.vertical_track_ratio(y);
            self.viewport
                .scroll_to_vertical_ratio(ratio, self.buffer.line_count());
        } else {
            let ratio = self.viewport.horizontal_track_ratio(x);
            self.viewport
                .scroll_to_horizontal_ratio(ratio, self.buffer.max_line_len() + 1);
        }
        tracing::trace!(
            line = self.viewport.scroll_line(),
            col = self.viewport.scroll_col(),
            "scrollbar"
        );
    }

    fn extend_selection(&mut self, pos: Position) {
        if !self.selection.is_active() {
            self.selection = Selection::caret(self.cursor);
        }
        self.selection.extend_to(pos);
        self.cursor = pos;
    }

    fn move_by(&mut self, delta_line: isize, delta_col: isize) {
        let last = self.buffer.line_count() - 1;
        let line = self.cursor.line.saturating_add_signed(delta_line).min(last);
        let mut pos = Position::new(line, self.cursor.column.min(self.buffer.line_len(line)));
        for _ in 0..delta_col.unsigned_abs() {
            let next = if delta_col < 0 {
                self.step_left(pos)
            } else {
                self.step_right(pos)
            };
            if next == pos {
                break;
            }
            pos = next;
        }
        self.cursor = pos;
    }

    fn step_left(&self, pos: Position) -> Position {
        if pos.column > 0 {
            let width = grapheme_len_before(&self.buffer.line(pos.line), pos.column);
            Position::new(pos.line, pos.column - width)
        } else if pos.line > 0 {
            Position::new(pos.line - 1, self.buffer.line_len(pos.line - 1))
        } else {
            pos
        }
    }

    fn step_right(&self, pos: Position) -> Position {
        if pos.column < self.buffer.line_len(pos.line) {
            let width = grapheme_len_at(&self.buffer.line(pos.line), pos.column).max(1);
            Position::new(pos.line, pos.column + width)
        } else if pos.line + 1 < self.buffer.line_count() {
            Position::new(pos.line + 1, 0)
        } else {
            pos
        }
    }

    fn find_forward(&self, query: &SearchQuery, from: Position) -> Option<SearchMatch> {
        query
            .find_next(&self.buffer, from)
            .or_else(|| query.find_next(&self.buffer, Position::default()))
    }

    fn find(
        &mut self,
        query: &str,
        options: SearchOptions,
        forward: bool,
    ) -> Result<CommandResult, CommandError> {
        if query.is_empty() {
            return Ok(CommandResult::SearchNotFound);
        }
        let query = SearchQuery::new(query, options)?;
        let bounds = self.selected_bounds();

        let found = if forward {
            let from = bounds.map_or(self.cursor, |b| b.end());
            self.find_forward(&query, from)
        } else {
            let before = bounds.map_or(self.cursor, |b| b.start());
            let last = self.buffer.line_count() - 1;
            let doc_end = Position::new(last, self.buffer.line_len(last));
            query
                .find_prev(&self.buffer, before)
                .or_else(|| query.find_prev(&self.buffer, doc_end))
        };

        let Some(m) = found else {
            return Ok(CommandResult::SearchNotFound);
        };
        self.selection = Selection::new(m.start, m.end);
        self.cursor = m.end;
        Ok(CommandResult::SearchMatch {
            start: m.start,
            end: m.end,
        })
    }

    // ---- view ----

    fn execute_view(&mut self, command: ViewCommand) -> Result<CommandResult, CommandError> {
        let total = self.buffer.line_count();
        match command {
            ViewCommand::ScrollBy(delta_line, delta_col) => {
                let width = self.buffer.max_line_len() + 1;
                self.viewport.scroll_by(delta_line, delta_col, total, width);
            }
            ViewCommand::ScrollToLine(line) => self.viewport.scroll_to_line(line, total),
            ViewCommand::PageUp => {
                self.viewport.page_up();
                self.cursor = Position::new(self.viewport.scroll_line(), 0);
                self.selection.clear();
            }
            ViewCommand::PageDown => {
                self.viewport.page_down(total);
                let rows = self.viewport.visible_line_count().max(1);
                let line = (self.viewport.scroll_line() + rows - 1).min(total - 1);
                self.cursor = Position::new(line, 0);
                self.selection.clear();
            }
            ViewCommand::FastScroll(steps) => {
                let lines = isize::try_from(self.config.fast_scroll_lines).unwrap_or(isize::MAX);
                self.viewport.fast_scroll(steps.saturating_mul(lines), total);
                let line = self.viewport.scroll_line();
                let column = self.cursor.column.min(self.buffer.line_len(line));
                self.cursor = Position::new(line, column);
                self.selection.clear();
            }
            ViewCommand::SetViewportMetrics(metrics) => {
                check_metrics(&metrics)?;
                self.viewport.set_metrics(metrics);
                self.config.viewport = metrics;
            }
            ViewCommand::Resize(width, height) => {
                let metrics = ViewportMetrics {
                    window_width: width,
                    window_height: height,
                    ..*self.viewport.metrics()
                };
                check_metrics(&metrics)?;
                self.viewport.set_metrics(metrics);
                self.config.viewport = metrics;
            }
            ViewCommand::SetLanguage(name) => {
                self.highlighter
                    .set_language(&name)
                    .map_err(highlight_error)?;
                self.config.language = self.highlighter.language().name.clone();
            }
            ViewCommand::SetTheme(name) => {
                self.highlighter.set_theme(&name).map_err(highlight_error)?;
                self.config.theme = self.highlighter.theme().name.clone();
            }
            ViewCommand::SetTabSize(size) => {
                if size == 0 {
                    return Err(CommandError::InvalidArgument(
                        "tab size must be at least 1".to_string(),
                    ));
                }
                self.config.tab_size = size;
            }
            ViewCommand::SetTabBehavior(behavior) => self.config.tab_behavior = behavior,
        }
        Ok(CommandResult::Success)
    }
}

fn check_metrics(metrics: &ViewportMetrics) -> Result<(), CommandError> {
    match metrics.problem() {
        None => Ok(()),
        Some(reason) => Err(CommandError::InvalidArgument(reason.to_string())),
    }
}

fn highlight_error(err: HighlightError) -> CommandError {
    match err {
        HighlightError::UnknownLanguage(name) | HighlightError::UnknownExtension(name) => {
            CommandError::UnknownLanguage(name)
        }
        HighlightError::UnknownTheme(name) => CommandError::UnknownTheme(name),
        other => CommandError::InvalidArgument(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(text: &str) -> Editor {
        Editor::from_text(text)
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut ed = editor("");
        for ch in "hi!".chars() {
            ed.execute(EditCommand::InsertChar(ch)).unwrap();
        }
        ed.execute(EditCommand::DeleteBackward).unwrap();
        assert_eq!(ed.text(), "hi");
        assert_eq!(ed.cursor(), Position::new(0, 2));
        assert_eq!(ed.history().undo_count(), 4);
    }

    #[test]
    fn test_control_chars_are_ignored() {
        let mut ed = editor("a");
        ed.execute(EditCommand::InsertChar('\r')).unwrap();
        ed.execute(EditCommand::InsertChar('\u{8}')).unwrap();
        assert_eq!(ed.text(), "a");
        assert!(!ed.can_undo());
    }

    #[test]
    fn test_no_op_edits_do_not_save_state() {
        let mut ed = editor("ab");
        ed.execute(EditCommand::DeleteBackward).unwrap();
        ed.execute(EditCommand::MergeUp).unwrap();
        ed.execute(CursorCommand::DocumentEnd).unwrap();
        ed.execute(EditCommand::DeleteForward).unwrap();
        assert!(!ed.can_undo());
        assert_eq!(
            ed.execute(EditCommand::Undo).unwrap(),
            CommandResult::HistoryEmpty
        );
    }

    #[test]
    fn test_backspace_removes_grapheme_cluster() {
        let mut ed = editor("xe\u{301}");
        ed.execute(CursorCommand::LineEnd).unwrap();
        ed.execute(EditCommand::DeleteBackward).unwrap();
        assert_eq!(ed.text(), "x");
        assert_eq!(ed.cursor(), Position::new(0, 1));
    }

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut ed = editor("ab\ncd");
        ed.execute(CursorCommand::LineEnd).unwrap();
        ed.execute(EditCommand::DeleteForward).unwrap();
        assert_eq!(ed.lines(), vec!["abcd"]);
        assert_eq!(ed.cursor(), Position::new(0, 2));
    }

    #[test]
    fn test_set_cursor_rejects_missing_line() {
        let mut ed = editor("one\ntwo");
        assert!(matches!(
            ed.execute(CursorCommand::SetCursor(5, 0)),
            Err(CommandError::InvalidPosition { line: 5, column: 0 })
        ));
        ed.execute(CursorCommand::SetCursor(1, 99)).unwrap();
        assert_eq!(ed.cursor(), Position::new(1, 3));
    }

    #[test]
    fn test_move_by_wraps_lines() {
        let mut ed = editor("ab\ncd");
        ed.execute(CursorCommand::SetCursor(1, 0)).unwrap();
        ed.execute(CursorCommand::MoveBy(0, -1)).unwrap();
        assert_eq!(ed.cursor(), Position::new(0, 2));
        ed.execute(CursorCommand::MoveBy(0, 2)).unwrap();
        assert_eq!(ed.cursor(), Position::new(1, 1));
        ed.execute(CursorCommand::MoveBy(-5, 100)).unwrap();
        assert_eq!(ed.cursor(), Position::new(1, 2));
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut ed = editor("hello world");
        ed.execute(CursorCommand::SetCursor(0, 0)).unwrap();
        ed.execute(CursorCommand::StartSelection).unwrap();
        ed.execute(CursorCommand::UpdateSelection(0, 5)).unwrap();
        ed.execute(EditCommand::InsertChar('J')).unwrap();
        assert_eq!(ed.text(), "J world");
        assert!(!ed.selection().is_active());
        ed.execute(EditCommand::Undo).unwrap();
        assert_eq!(ed.text(), "hello world");
    }

    #[test]
    fn test_insert_tab_spaces_to_next_stop() {
        let mut ed = editor("ab");
        ed.execute(CursorCommand::LineEnd).unwrap();
        ed.execute(EditCommand::InsertTab).unwrap();
        assert_eq!(ed.text(), "ab  ");
        ed.execute(ViewCommand::SetTabBehavior(TabKeyBehavior::Tab))
            .unwrap();
        ed.execute(EditCommand::InsertTab).unwrap();
        assert_eq!(ed.text(), "ab  \t");
    }

    #[test]
    fn test_end_compound_without_begin_fails() {
        let mut ed = editor("");
        assert!(matches!(
            ed.execute(EditCommand::EndCompound),
            Err(CommandError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unknown_language_and_theme() {
        let mut ed = editor("");
        assert!(matches!(
            ed.execute(ViewCommand::SetLanguage("Cobol".into())),
            Err(CommandError::UnknownLanguage(_))
        ));
        assert!(matches!(
            ed.execute(ViewCommand::SetTheme("neon".into())),
            Err(CommandError::UnknownTheme(_))
        ));
        ed.execute(ViewCommand::SetLanguage("rust".into())).unwrap();
        assert_eq!(ed.config().language, "Rust");
    }

    #[test]
    fn test_modified_tracking() {
        let mut ed = editor("x");
        assert!(!ed.is_modified());
        ed.execute(EditCommand::InsertChar('y')).unwrap();
        assert!(ed.is_modified());
        ed.execute(EditCommand::Undo).unwrap();
        assert!(!ed.is_modified());
        ed.execute(EditCommand::Redo).unwrap();
        ed.mark_saved();
        assert!(!ed.is_modified());
    }
}
