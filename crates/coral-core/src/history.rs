//! Snapshot-based undo/redo.
//!
//! # Overview
//!
//! Every entry is a full [`EditorSnapshot`]: a clone of the [`TextBuffer`] plus the caret. Rope
//! clones share structure, so a snapshot costs a reference count and a stored snapshot can never
//! observe later live edits.
//!
//! The owner calls [`UndoRedoManager::save_state`] *before* each mutating command, so undo always
//! restores the pre-command state. Both stacks are bounded; the oldest entries are evicted first.
//!
//! # Grouping
//!
//! - A compound bracket ([`UndoRedoManager::begin_compound_operation`] /
//!   [`UndoRedoManager::end_compound_operation`]) keeps only the first snapshot taken inside it,
//!   so one undo reverts the whole block. Brackets nest.
//! - Optional typing coalescing: when a group window is set, consecutive
//!   [`OperationKind::Insert`] saves that arrive within the window are folded into the previous
//!   entry, up to `max_group_size` saves per entry.
//!
//! # Example
//!
//! ```rust
//! use coral_core::{OperationKind, Position, TextBuffer, UndoRedoManager};
//!
//! let mut history = UndoRedoManager::new(100);
//! let mut buffer = TextBuffer::new();
//! let mut cursor = Position::new(0, 0);
//!
//! history.save_state(&buffer, cursor, OperationKind::Insert, "type a");
//! buffer.insert_char(0, 0, 'a').unwrap();
//! cursor.column = 1;
//!
//! assert!(history.undo(&mut buffer, &mut cursor));
//! assert_eq!(buffer.to_string(), "");
//! assert_eq!(cursor, Position::new(0, 0));
//!
//! assert!(history.redo(&mut buffer, &mut cursor));
//! assert_eq!(buffer.to_string(), "a");
//! ```

use crate::buffer::TextBuffer;
use crate::config::HistoryConfig;
use crate::position::Position;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// What kind of edit produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Text was typed or pasted.
    Insert,
    /// Text was removed.
    Delete,
    /// Text was replaced (find/replace, typing over a selection).
    Replace,
    /// A bracketed group of edits.
    Compound,
}

/// One undo/redo unit.
#[derive(Debug, Clone)]
pub struct EditorSnapshot {
    buffer: TextBuffer,
    cursor: Position,
    kind: OperationKind,
    description: String,
    timestamp: Instant,
}

impl EditorSnapshot {
    fn capture(
        buffer: &TextBuffer,
        cursor: Position,
        kind: OperationKind,
        description: String,
    ) -> Self {
        Self {
            buffer: buffer.clone(),
            cursor,
            kind,
            description,
            timestamp: Instant::now(),
        }
    }

    /// Document at this point.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Caret at this point.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Operation kind.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Human-readable description ("Insert 'a'", "Paste", ...).
    pub fn description(&self) -> &str {
        &self.description
    }

    /// When the snapshot was taken.
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    fn same_state(&self, other: &Self) -> bool {
        self.cursor == other.cursor && self.buffer == other.buffer
    }

    fn approx_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.buffer.byte_len() + self.description.len()
    }
}

/// Bounded undo and redo stacks owned by one editor session.
#[derive(Debug, Clone)]
pub struct UndoRedoManager {
    undo: VecDeque<EditorSnapshot>,
    redo: VecDeque<EditorSnapshot>,
    max_history_size: usize,

    compound_depth: usize,
    compound_description: String,
    compound_saved: bool,

    group_window: Option<Duration>,
    max_group_size: usize,
    group_len: usize,
    last_save: Option<Instant>,
}

impl Default for UndoRedoManager {
    fn default() -> Self {
        Self::from_config(&HistoryConfig::default())
    }
}

impl UndoRedoManager {
    /// Create a manager holding at most `max_history_size` entries per stack.
    pub fn new(max_history_size: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            max_history_size: max_history_size.max(1),
            compound_depth: 0,
            compound_description: String::new(),
            compound_saved: false,
            group_window: None,
            max_group_size: 50,
            group_len: 0,
            last_save: None,
        }
    }

    /// Create a manager from configuration.
    pub fn from_config(config: &HistoryConfig) -> Self {
        let mut manager = Self::new(config.max_size);
        manager.group_window = config.group_window_ms.map(Duration::from_millis);
        manager.max_group_size = config.max_group_size.max(1);
        manager
    }

    /// Record the state *before* an edit. Clears the redo stack.
    pub fn save_state(
        &mut self,
        buffer: &TextBuffer,
        cursor: Position,
        kind: OperationKind,
        description: impl Into<String>,
    ) {
        let now = Instant::now();

        if self.compound_depth > 0 {
            if self.compound_saved {
                tracing::trace!("save inside compound operation suppressed");
                self.clear_redo();
                return;
            }
            let description = self.compound_description.clone();
            self.push_undo(EditorSnapshot::capture(
                buffer,
                cursor,
                OperationKind::Compound,
                description,
            ));
            self.compound_saved = true;
            self.group_len = 0;
            self.last_save = Some(now);
            return;
        }

        if self.should_coalesce(kind, now) {
            self.group_len += 1;
            self.last_save = Some(now);
            self.clear_redo();
            tracing::trace!(group_len = self.group_len, "insert coalesced into previous entry");
            return;
        }

        let snapshot = EditorSnapshot::capture(buffer, cursor, kind, description.into());
        tracing::trace!(description = %snapshot.description, "history state saved");
        self.push_undo(snapshot);
        self.group_len = usize::from(kind == OperationKind::Insert);
        self.last_save = Some(now);
    }

    fn should_coalesce(&self, kind: OperationKind, now: Instant) -> bool {
        let Some(window) = self.group_window else {
            return false;
        };
        kind == OperationKind::Insert
            && self.group_len > 0
            && self.group_len < self.max_group_size
            && self
                .undo
                .back()
                .is_some_and(|top| top.kind == OperationKind::Insert)
            && self
                .last_save
                .is_some_and(|last| now.duration_since(last) <= window)
    }

    fn push_undo(&mut self, snapshot: EditorSnapshot) {
        self.clear_redo();
        self.undo.push_back(snapshot);
        Self::evict(&mut self.undo, self.max_history_size, "undo");
    }

    fn clear_redo(&mut self) {
        if !self.redo.is_empty() {
            tracing::trace!(dropped = self.redo.len(), "redo history cleared");
            self.redo.clear();
        }
    }

    fn evict(stack: &mut VecDeque<EditorSnapshot>, max: usize, which: &'static str) {
        while stack.len() > max {
            if let Some(old) = stack.pop_front() {
                tracing::debug!(stack = which, description = %old.description, "history entry evicted");
            }
        }
    }

    /// Restore the most recent snapshot. Returns `false` if there is nothing to undo.
    ///
    /// The live state is pushed onto the redo stack first, and the restored caret is clamped to
    /// the restored document.
    pub fn undo(&mut self, buffer: &mut TextBuffer, cursor: &mut Position) -> bool {
        let Some(snapshot) = self.undo.pop_back() else {
            return false;
        };
        tracing::debug!(description = %snapshot.description, "undo");

        let live = EditorSnapshot::capture(
            buffer,
            *cursor,
            snapshot.kind,
            snapshot.description.clone(),
        );
        self.redo.push_back(live);
        Self::evict(&mut self.redo, self.max_history_size, "redo");

        self.restore(snapshot, buffer, cursor);
        true
    }

    /// Re-apply the most recently undone state. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self, buffer: &mut TextBuffer, cursor: &mut Position) -> bool {
        let Some(snapshot) = self.redo.pop_back() else {
            return false;
        };
        tracing::debug!(description = %snapshot.description, "redo");

        let live = EditorSnapshot::capture(
            buffer,
            *cursor,
            snapshot.kind,
            snapshot.description.clone(),
        );
        self.undo.push_back(live);
        Self::evict(&mut self.undo, self.max_history_size, "undo");

        self.restore(snapshot, buffer, cursor);
        true
    }

    fn restore(
        &mut self,
        snapshot: EditorSnapshot,
        buffer: &mut TextBuffer,
        cursor: &mut Position,
    ) {
        *buffer = snapshot.buffer;
        *cursor = buffer.clamp_position(snapshot.cursor);
        self.group_len = 0;
        self.last_save = None;
        self.compound_saved = false;
    }

    /// Open a compound bracket. Nested brackets join the outermost one.
    pub fn begin_compound_operation(&mut self, description: impl Into<String>) {
        self.compound_depth += 1;
        if self.compound_depth == 1 {
            self.compound_description = description.into();
            self.compound_saved = false;
            tracing::debug!(description = %self.compound_description, "compound operation opened");
        }
    }

    /// Close the innermost bracket. Returns `false` if none was open.
    pub fn end_compound_operation(&mut self) -> bool {
        if self.compound_depth == 0 {
            tracing::warn!("end_compound_operation without matching begin");
            return false;
        }
        self.compound_depth -= 1;
        if self.compound_depth == 0 {
            tracing::debug!(description = %self.compound_description, "compound operation closed");
            self.compound_description.clear();
            self.compound_saved = false;
            self.group_len = 0;
        }
        true
    }

    /// Whether a compound bracket is open.
    pub fn is_in_compound_operation(&self) -> bool {
        self.compound_depth > 0
    }

    /// Stop coalescing into the current entry; the next save starts a new one.
    pub fn break_group(&mut self) {
        self.group_len = 0;
    }

    /// Whether undo is possible.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether redo is possible.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Entries on the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    /// Entries on the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }

    /// Description of the next undo.
    pub fn undo_description(&self) -> Option<&str> {
        self.undo.back().map(EditorSnapshot::description)
    }

    /// Description of the next redo.
    pub fn redo_description(&self) -> Option<&str> {
        self.redo.back().map(EditorSnapshot::description)
    }

    /// Undo descriptions, oldest first.
    pub fn history_descriptions(&self) -> Vec<String> {
        self.undo.iter().map(|s| s.description.clone()).collect()
    }

    /// Most recent undo entry.
    pub fn peek_undo(&self) -> Option<&EditorSnapshot> {
        self.undo.back()
    }

    /// Capacity of each stack.
    pub fn max_history_size(&self) -> usize {
        self.max_history_size
    }

    /// Change the capacity, evicting the oldest entries if needed.
    pub fn set_max_history_size(&mut self, size: usize) {
        self.max_history_size = size.max(1);
        Self::evict(&mut self.undo, self.max_history_size, "undo");
        Self::evict(&mut self.redo, self.max_history_size, "redo");
    }

    /// Enable (`Some`) or disable (`None`) typing coalescing.
    pub fn set_group_window(&mut self, window: Option<Duration>) {
        self.group_window = window;
        self.group_len = 0;
    }

    /// Maximum saves folded into one coalesced entry.
    pub fn set_max_group_size(&mut self, size: usize) {
        self.max_group_size = size.max(1);
    }

    /// Drop both stacks and any open bracket.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.compound_depth = 0;
        self.compound_description.clear();
        self.compound_saved = false;
        self.group_len = 0;
        self.last_save = None;
        tracing::debug!("history cleared");
    }

    /// Remove undo entries identical to the entry below them. Returns how many were removed.
    pub fn compact(&mut self) -> usize {
        let before = self.undo.len();
        let mut kept: VecDeque<EditorSnapshot> = VecDeque::with_capacity(before);
        for snapshot in self.undo.drain(..) {
            if kept.back().is_some_and(|prev| prev.same_state(&snapshot)) {
                continue;
            }
            kept.push_back(snapshot);
        }
        self.undo = kept;
        before - self.undo.len()
    }

    /// Approximate memory held by both stacks, in bytes.
    pub fn memory_usage(&self) -> usize {
        self.undo
            .iter()
            .chain(self.redo.iter())
            .map(EditorSnapshot::approx_size)
            .sum()
    }
}
