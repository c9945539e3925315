//! Scroll position and window arithmetic.
//!
//! [`Viewport`] is pure numeric state: two scroll offsets plus pixel metrics. It never looks at
//! the document; callers pass line counts and lengths in.
//!
//! Screen coordinates are pixels relative to the window's top-left corner. The text area starts
//! at `x = gutter_width + gutter_padding` and `y = text_top`, and every character occupies a
//! fixed `char_width x line_height` cell.

use crate::position::Position;
use serde::{Deserialize, Serialize};

/// Slack added before flooring pixel-to-cell divisions so that a coordinate produced by
/// [`Viewport::text_to_screen`] maps back to the same cell despite float error.
const CELL_EPSILON: f32 = 1e-3;

/// Window size, character cell size and chrome dimensions, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportMetrics {
    /// Window width.
    pub window_width: f32,
    /// Window height.
    pub window_height: f32,
    /// Width of one character cell.
    pub char_width: f32,
    /// Height of one line.
    pub line_height: f32,
    /// Line-number gutter width.
    pub gutter_width: f32,
    /// Gap between gutter and text.
    pub gutter_padding: f32,
    /// Y of the first text row.
    pub text_top: f32,
    /// Status bar height.
    pub status_bar_height: f32,
    /// Vertical scrollbar width.
    pub scrollbar_width: f32,
    /// Horizontal scrollbar height.
    pub scrollbar_height: f32,
}

impl Default for ViewportMetrics {
    fn default() -> Self {
        Self {
            window_width: 1000.0,
            window_height: 700.0,
            char_width: 9.6,
            line_height: 24.0,
            gutter_width: 50.0,
            gutter_padding: 5.0,
            text_top: 20.0,
            status_bar_height: 25.0,
            scrollbar_width: 15.0,
            scrollbar_height: 15.0,
        }
    }
}

impl ViewportMetrics {
    /// Why these metrics cannot lay out a window, if they cannot.
    ///
    /// Every field must be finite and non-negative; cell sizes must be positive.
    pub fn problem(&self) -> Option<&'static str> {
        let fields = [
            self.window_width,
            self.window_height,
            self.char_width,
            self.line_height,
            self.gutter_width,
            self.gutter_padding,
            self.text_top,
            self.status_bar_height,
            self.scrollbar_width,
            self.scrollbar_height,
        ];
        if fields.iter().any(|v| !v.is_finite() || *v < 0.0) {
            Some("metrics must be finite and non-negative")
        } else if !(self.char_width > 0.0 && self.line_height > 0.0) {
            Some("char_width and line_height must be positive")
        } else {
            None
        }
    }
}

/// Window region under a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenRegion {
    /// Text cells.
    Text,
    /// Line-number gutter left of the text.
    Gutter,
    /// Vertical scrollbar track along the right edge.
    VerticalScrollbar,
    /// Horizontal scrollbar track above the status bar.
    HorizontalScrollbar,
    /// Square where the two scrollbars meet.
    Corner,
    /// Status bar along the bottom edge.
    StatusBar,
}

/// Scroll offsets plus metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    scroll_line: usize,
    scroll_col: usize,
    metrics: ViewportMetrics,
}

impl Viewport {
    /// Viewport at the top-left of the document.
    pub fn new(metrics: ViewportMetrics) -> Self {
        Self {
            scroll_line: 0,
            scroll_col: 0,
            metrics,
        }
    }

    /// Current metrics.
    pub fn metrics(&self) -> &ViewportMetrics {
        &self.metrics
    }

    /// Replace all metrics.
    pub fn set_metrics(&mut self, metrics: ViewportMetrics) {
        self.metrics = metrics;
    }

    /// Resize the window.
    pub fn set_window_size(&mut self, width: f32, height: f32) {
        self.metrics.window_width = width.max(0.0);
        self.metrics.window_height = height.max(0.0);
    }

    /// Set the character cell size.
    pub fn set_character_metrics(&mut self, char_width: f32, line_height: f32) {
        self.metrics.char_width = char_width;
        self.metrics.line_height = line_height;
    }

    /// First visible line.
    pub fn scroll_line(&self) -> usize {
        self.scroll_line
    }

    /// First visible column.
    pub fn scroll_col(&self) -> usize {
        self.scroll_col
    }

    /// Set both offsets without clamping.
    pub fn set_scroll_position(&mut self, line: usize, col: usize) {
        self.scroll_line = line;
        self.scroll_col = col;
    }

    /// Height available for text rows.
    pub fn text_area_height(&self) -> f32 {
        let m = &self.metrics;
        (m.window_height - m.status_bar_height - m.scrollbar_height).max(0.0)
    }

    /// Width available for text columns.
    pub fn text_area_width(&self) -> f32 {
        let m = &self.metrics;
        (m.window_width - m.gutter_width - m.gutter_padding - m.scrollbar_width).max(0.0)
    }

    /// X of the first text column.
    pub fn text_left(&self) -> f32 {
        self.metrics.gutter_width + self.metrics.gutter_padding
    }

    /// Number of whole lines that fit.
    pub fn visible_line_count(&self) -> usize {
        cells_in(self.text_area_height(), self.metrics.line_height)
    }

    /// Number of whole columns that fit.
    pub fn visible_column_count(&self) -> usize {
        cells_in(self.text_area_width(), self.metrics.char_width)
    }

    /// First visible line.
    pub fn first_visible_line(&self) -> usize {
        self.scroll_line
    }

    /// Last visible line, limited to the document.
    pub fn last_visible_line(&self, total_lines: usize) -> usize {
        (self.scroll_line + self.visible_line_count().max(1))
            .min(total_lines)
            .saturating_sub(1)
    }

    /// First visible column.
    pub fn first_visible_column(&self) -> usize {
        self.scroll_col
    }

    /// Last visible column.
    pub fn last_visible_column(&self) -> usize {
        (self.scroll_col + self.visible_column_count()).saturating_sub(1)
    }

    /// Scroll the minimum amount that brings the caret into view.
    pub fn ensure_cursor_visible(&mut self, line: usize, col: usize, total_lines: usize) {
        let rows = self.visible_line_count();
        if line < self.scroll_line {
            self.scroll_line = line;
        } else if rows > 0 && line >= self.scroll_line + rows {
            self.scroll_line = line + 1 - rows;
        }
        self.scroll_line = self.scroll_line.min(total_lines.saturating_sub(1));

        let cols = self.visible_column_count();
        if col < self.scroll_col {
            self.scroll_col = col;
        } else if cols > 0 && col >= self.scroll_col + cols {
            self.scroll_col = col + 1 - cols;
        }
    }

    /// Clamp both offsets to the document. Idempotent.
    pub fn clamp_scroll(&mut self, total_lines: usize, max_line_len: usize) {
        self.scroll_line = self.scroll_line.min(self.max_scroll_line(total_lines));
        self.scroll_col = self.scroll_col.min(self.max_scroll_col(max_line_len));
    }

    fn max_scroll_line(&self, total_lines: usize) -> usize {
        total_lines.saturating_sub(self.visible_line_count())
    }

    fn max_scroll_col(&self, max_line_len: usize) -> usize {
        max_line_len.saturating_sub(self.visible_column_count())
    }

    /// Classify a window pixel.
    ///
    /// The status bar spans the full width at the bottom. Above it, the horizontal scrollbar
    /// row runs from the gutter to the vertical scrollbar, which covers the right edge down to
    /// that row.
    pub fn hit_test(&self, x: f32, y: f32) -> ScreenRegion {
        let m = &self.metrics;
        let status_top = (m.window_height - m.status_bar_height).max(0.0);
        let bars_top = self.text_area_height();
        let right = (m.window_width - m.scrollbar_width).max(0.0);

        if y >= status_top {
            ScreenRegion::StatusBar
        } else if x >= right {
            if y >= bars_top {
                ScreenRegion::Corner
            } else {
                ScreenRegion::VerticalScrollbar
            }
        } else if x < self.text_left() {
            ScreenRegion::Gutter
        } else if y >= bars_top {
            ScreenRegion::HorizontalScrollbar
        } else {
            ScreenRegion::Text
        }
    }

    /// Position of window `y` along the vertical track, in `[0, 1]`.
    pub fn vertical_track_ratio(&self, y: f32) -> f32 {
        track_ratio(y, self.text_area_height())
    }

    /// Position of window `x` along the horizontal track, in `[0, 1]`.
    pub fn horizontal_track_ratio(&self, x: f32) -> f32 {
        track_ratio(x - self.text_left(), self.text_area_width())
    }

    /// Scroll so that `ratio` of the scrollable line range lies above the view.
    pub fn scroll_to_vertical_ratio(&mut self, ratio: f32, total_lines: usize) {
        self.scroll_line = scaled(ratio, self.max_scroll_line(total_lines));
    }

    /// Scroll so that `ratio` of the scrollable column range lies left of the view.
    pub fn scroll_to_horizontal_ratio(&mut self, ratio: f32, max_line_len: usize) {
        self.scroll_col = scaled(ratio, self.max_scroll_col(max_line_len));
    }

    /// Pixel position to document cell, relative to the current scroll.
    ///
    /// Points left of or above the text area map to the first visible column or line. The result
    /// is not clamped to the document.
    pub fn screen_to_text(&self, x: f32, y: f32) -> Position {
        let col = floor_cells(x - self.text_left(), self.metrics.char_width);
        let line = floor_cells(y - self.metrics.text_top, self.metrics.line_height);
        Position::new(self.scroll_line + line, self.scroll_col + col)
    }

    /// Top-left pixel of a document cell. Cells scrolled out of view give negative coordinates.
    pub fn text_to_screen(&self, line: usize, col: usize) -> (f32, f32) {
        let dx = col as f32 - self.scroll_col as f32;
        let dy = line as f32 - self.scroll_line as f32;
        (
            self.text_left() + dx * self.metrics.char_width,
            self.metrics.text_top + dy * self.metrics.line_height,
        )
    }

    /// Scroll by a relative amount, clamped to the document.
    pub fn scroll_by(
        &mut self,
        delta_lines: isize,
        delta_cols: isize,
        total_lines: usize,
        max_line_len: usize,
    ) {
        self.scroll_line = self.scroll_line.saturating_add_signed(delta_lines);
        self.scroll_col = self.scroll_col.saturating_add_signed(delta_cols);
        self.clamp_scroll(total_lines, max_line_len);
    }

    /// Put `line` at the top (as far as the document allows).
    pub fn scroll_to_line(&mut self, line: usize, total_lines: usize) {
        self.scroll_line = line.min(self.max_scroll_line(total_lines));
    }

    /// Scroll to the first line.
    pub fn scroll_to_top(&mut self) {
        self.scroll_line = 0;
    }

    /// Scroll so the last line is at the bottom.
    pub fn scroll_to_bottom(&mut self, total_lines: usize) {
        self.scroll_line = self.max_scroll_line(total_lines);
    }

    /// Scroll up one screen.
    pub fn page_up(&mut self) {
        self.scroll_line = self
            .scroll_line
            .saturating_sub(self.visible_line_count().max(1));
    }

    /// Scroll down one screen, stopping where the last line reaches the bottom.
    pub fn page_down(&mut self, total_lines: usize) {
        let rows = self.visible_line_count().max(1);
        self.scroll_line = (self.scroll_line + rows).min(self.max_scroll_line(total_lines));
    }

    /// Jump by `delta` lines, clamped to the document.
    pub fn fast_scroll(&mut self, delta: isize, total_lines: usize) {
        self.scroll_line = self
            .scroll_line
            .saturating_add_signed(delta)
            .min(self.max_scroll_line(total_lines));
    }

    /// Whether scrolling up is possible.
    pub fn can_scroll_up(&self) -> bool {
        self.scroll_line > 0
    }

    /// Whether scrolling down is possible.
    pub fn can_scroll_down(&self, total_lines: usize) -> bool {
        self.scroll_line + self.visible_line_count() < total_lines
    }

    /// Whether scrolling left is possible.
    pub fn can_scroll_left(&self) -> bool {
        self.scroll_col > 0
    }

    /// Whether scrolling right is possible.
    pub fn can_scroll_right(&self, max_line_len: usize) -> bool {
        self.scroll_col + self.visible_column_count() < max_line_len
    }

    /// Vertical thumb position in `[0, 1]`.
    pub fn vertical_scroll_ratio(&self, total_lines: usize) -> f32 {
        ratio(self.scroll_line, total_lines, self.visible_line_count())
    }

    /// Horizontal thumb position in `[0, 1]`.
    pub fn horizontal_scroll_ratio(&self, max_line_len: usize) -> f32 {
        ratio(self.scroll_col, max_line_len, self.visible_column_count())
    }

    /// Vertical thumb length as a fraction of the track.
    pub fn vertical_thumb_ratio(&self, total_lines: usize) -> f32 {
        thumb(self.visible_line_count(), total_lines)
    }

    /// Horizontal thumb length as a fraction of the track.
    pub fn horizontal_thumb_ratio(&self, max_line_len: usize) -> f32 {
        thumb(self.visible_column_count(), max_line_len)
    }
}

fn cells_in(extent: f32, cell: f32) -> usize {
    if cell <= 0.0 || extent <= 0.0 {
        return 0;
    }
    (extent / cell + CELL_EPSILON).floor() as usize
}

fn floor_cells(offset: f32, cell: f32) -> usize {
    if cell <= 0.0 || offset <= 0.0 {
        return 0;
    }
    (offset / cell + CELL_EPSILON).floor() as usize
}

fn track_ratio(offset: f32, extent: f32) -> f32 {
    if extent <= 0.0 || extent.is_nan() || offset.is_nan() {
        return 0.0;
    }
    (offset / extent).clamp(0.0, 1.0)
}

/// `ratio * max`, rounded down and kept within `0..=max`.
fn scaled(ratio: f32, max: usize) -> usize {
    if ratio.is_nan() {
        return 0;
    }
    ((ratio.clamp(0.0, 1.0) * max as f32) as usize).min(max)
}

fn ratio(offset: usize, total: usize, visible: usize) -> f32 {
    if total <= visible {
        return 0.0;
    }
    (offset as f32 / (total - visible) as f32).clamp(0.0, 1.0)
}

fn thumb(visible: usize, total: usize) -> f32 {
    if total == 0 || visible >= total {
        return 1.0;
    }
    visible as f32 / total as f32
}
