//! Render snapshots.
//!
//! [`Editor::render_frame`] flattens the session into plain data a host can paint without
//! touching the editor again: colored text fragments for the visible window, selection
//! rectangles, the caret, scrollbar geometry and the status line. All coordinates are window
//! pixels, computed with the same [`crate::Viewport`] arithmetic that maps clicks back to cells.

use crate::clipboard::ClipboardService;
use crate::editor::Editor;
use coral_core_highlight::{TokenColor, UiColors};

/// A pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// X in pixels.
    pub x: f32,
    /// Y in pixels.
    pub y: f32,
}

/// A run of identically styled characters on one row.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Visible text (already clipped to the window).
    pub text: String,
    /// Document column of the first character.
    pub column: usize,
    /// X of the first character.
    pub x: f32,
    /// Foreground color.
    pub color: TokenColor,
    /// Bold face.
    pub bold: bool,
    /// Italic face.
    pub italic: bool,
}

/// One visible document line.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderLine {
    /// Zero-based line index.
    pub line_index: usize,
    /// One-based number for the gutter.
    pub line_number: usize,
    /// Y of the row's top edge.
    pub y: f32,
    /// Fragments, left to right.
    pub fragments: Vec<Fragment>,
}

/// A filled selection rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// Scrollbar visibility and thumb geometry, as fractions of the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollbarState {
    /// Show the vertical bar.
    pub show_vertical: bool,
    /// Show the horizontal bar.
    pub show_horizontal: bool,
    /// Vertical thumb offset in `[0, 1]`.
    pub vertical_ratio: f32,
    /// Horizontal thumb offset in `[0, 1]`.
    pub horizontal_ratio: f32,
    /// Vertical thumb length.
    pub vertical_thumb: f32,
    /// Horizontal thumb length.
    pub horizontal_thumb: f32,
}

/// Status bar content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    /// One-based caret line.
    pub line: usize,
    /// One-based caret column.
    pub column: usize,
    /// Lines in the document.
    pub line_count: usize,
    /// Characters on the caret line.
    pub line_chars: usize,
    /// Lines touched by the selection (0 without a selection).
    pub selected_lines: usize,
    /// Selected characters, line breaks included.
    pub selected_chars: usize,
    /// Active language.
    pub language: String,
    /// Active theme.
    pub theme: String,
    /// Unsaved changes.
    pub modified: bool,
}

impl StatusInfo {
    /// The status line as text, e.g. `Ln 3, Col 7 | 120 lines | Rust`.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Ln {}, Col {} | {} lines | {} chars",
            self.line, self.column, self.line_count, self.line_chars
        );
        if self.selected_chars > 0 {
            out.push_str(&format!(
                " | Sel {} lines, {} chars",
                self.selected_lines, self.selected_chars
            ));
        }
        out.push_str(" | ");
        out.push_str(&self.language);
        if self.modified {
            out.push_str(" *");
        }
        out
    }
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    /// Visible lines, top to bottom.
    pub lines: Vec<RenderLine>,
    /// Caret's top-left corner, if the caret is inside the text area.
    pub cursor: Option<ScreenPoint>,
    /// Selection rectangles, one per visible selected row.
    pub selection_rects: Vec<SelectionRect>,
    /// Scrollbars.
    pub scrollbars: ScrollbarState,
    /// Status bar.
    pub status: StatusInfo,
    /// Chrome colors of the active theme.
    pub ui: UiColors,
}

impl<C: ClipboardService> Editor<C> {
    /// Snapshot the visible window.
    ///
    /// Takes `&mut self` only to fill the highlighter's line cache.
    pub fn render_frame(&mut self) -> RenderFrame {
        let total = self.buffer.line_count();
        let first = self.viewport.first_visible_line().min(total);
        let last = (first + self.viewport.visible_line_count()).min(total);
        let col_start = self.viewport.first_visible_column();
        let col_end = col_start + self.viewport.visible_column_count();

        let highlighted = self.highlighter.highlight_lines(&self.buffer, first..last);
        let lines = highlighted
            .into_iter()
            .map(|hl| {
                let (_, y) = self.viewport.text_to_screen(hl.line, col_start);
                let fragments = hl
                    .spans
                    .iter()
                    .filter_map(|span| {
                        let lo = span.start.max(col_start);
                        let hi = span.end.min(col_end);
                        if lo >= hi {
                            return None;
                        }
                        let text: String = span
                            .text
                            .chars()
                            .skip(lo - span.start)
                            .take(hi - lo)
                            .collect();
                        let (x, _) = self.viewport.text_to_screen(hl.line, lo);
                        Some(Fragment {
                            text,
                            column: lo,
                            x,
                            color: span.style.color,
                            bold: span.style.bold,
                            italic: span.style.italic,
                        })
                    })
                    .collect();
                RenderLine {
                    line_index: hl.line,
                    line_number: hl.line + 1,
                    y,
                    fragments,
                }
            })
            .collect();

        RenderFrame {
            lines,
            cursor: self.cursor_point(first, last, col_start, col_end),
            selection_rects: self.selection_rects(first, last),
            scrollbars: self.scrollbar_state(),
            status: self.status_info(),
            ui: self.highlighter.theme().ui,
        }
    }

    /// Status bar content for the current state.
    pub fn status_info(&self) -> StatusInfo {
        let (selected_lines, selected_chars) = match self.selection.bounds(&self.buffer) {
            Some(b) if self.selection.has_selection() && !b.is_empty() => {
                let chars = (b.min_line..=b.max_line)
                    .filter_map(|line| b.columns_on_line(line, self.buffer.line_len(line)))
                    .map(|(lo, hi)| hi - lo)
                    .sum::<usize>()
                    + (b.max_line - b.min_line);
                (b.max_line - b.min_line + 1, chars)
            }
            _ => (0, 0),
        };

        StatusInfo {
            line: self.cursor.line + 1,
            column: self.cursor.column + 1,
            line_count: self.buffer.line_count(),
            line_chars: self.buffer.line_len(self.cursor.line),
            selected_lines,
            selected_chars,
            language: self.highlighter.language().name.clone(),
            theme: self.highlighter.theme().name.clone(),
            modified: self.is_modified(),
        }
    }

    fn cursor_point(
        &self,
        first: usize,
        last: usize,
        col_start: usize,
        col_end: usize,
    ) -> Option<ScreenPoint> {
        let pos = self.cursor;
        let visible = (first..last).contains(&pos.line) && (col_start..col_end).contains(&pos.column);
        visible.then(|| {
            let (x, y) = self.viewport.text_to_screen(pos.line, pos.column);
            ScreenPoint { x, y }
        })
    }

    fn selection_rects(&self, first: usize, last: usize) -> Vec<SelectionRect> {
        if first >= last || !self.selection.has_selection() {
            return Vec::new();
        }
        let Some(bounds) = self.selection.bounds(&self.buffer) else {
            return Vec::new();
        };
        if bounds.is_empty() {
            return Vec::new();
        }

        let metrics = self.viewport.metrics();
        let text_left = self.viewport.text_left();
        let right_edge = text_left + self.viewport.text_area_width();

        (bounds.min_line.max(first)..=bounds.max_line.min(last.saturating_sub(1)))
            .filter_map(|line| {
                let (lo, hi) = bounds.columns_on_line(line, self.buffer.line_len(line))?;
                // The line break of a fully crossed row is drawn as one cell.
                let hi = if hi == lo && line < bounds.max_line {
                    hi + 1
                } else {
                    hi
                };
                let (x0, y) = self.viewport.text_to_screen(line, lo);
                let (x1, _) = self.viewport.text_to_screen(line, hi);
                let x0 = x0.max(text_left);
                let x1 = x1.min(right_edge);
                (x1 > x0).then_some(SelectionRect {
                    x: x0,
                    y,
                    width: x1 - x0,
                    height: metrics.line_height,
                })
            })
            .collect()
    }

    fn scrollbar_state(&self) -> ScrollbarState {
        let total = self.buffer.line_count();
        let width = self.buffer.max_line_len() + 1;
        let rows = self.viewport.visible_line_count();
        let cols = self.viewport.visible_column_count();
        ScrollbarState {
            show_vertical: rows > 0 && total > rows,
            show_horizontal: cols > 0 && width > cols,
            vertical_ratio: self.viewport.vertical_scroll_ratio(total),
            horizontal_ratio: self.viewport.horizontal_scroll_ratio(width),
            vertical_thumb: self.viewport.vertical_thumb_ratio(total),
            horizontal_thumb: self.viewport.horizontal_thumb_ratio(width),
        }
    }
}
