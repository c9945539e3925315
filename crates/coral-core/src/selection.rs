//! Selection model.
//!
//! A [`Selection`] stores its two anchors exactly as the user produced them, so `start` may come
//! after `end`. Everything that needs document order goes through [`SelectionBounds`], which is
//! always derived and never stored.

use crate::buffer::{BufferError, TextBuffer};
use crate::position::Position;

/// Line-length queries needed to clamp selection anchors.
pub trait LineLengths {
    /// Number of lines.
    fn line_count(&self) -> usize;
    /// Char length of `line` (0 when out of range).
    fn line_len(&self, line: usize) -> usize;
}

impl<S: AsRef<str>> LineLengths for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_len(&self, line: usize) -> usize {
        self.get(line).map_or(0, |l| l.as_ref().chars().count())
    }
}

/// Selection bounds in document order.
///
/// For a single-line selection `lo_col <= hi_col`. For a multi-line one `lo_col` belongs to
/// `min_line` and `hi_col` to `max_line`, so `lo_col` may exceed `hi_col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionBounds {
    /// First selected line.
    pub min_line: usize,
    /// Last selected line.
    pub max_line: usize,
    /// Start column on `min_line`.
    pub lo_col: usize,
    /// End column on `max_line` (exclusive).
    pub hi_col: usize,
}

impl SelectionBounds {
    /// Start position.
    pub fn start(&self) -> Position {
        Position::new(self.min_line, self.lo_col)
    }

    /// End position.
    pub fn end(&self) -> Position {
        Position::new(self.max_line, self.hi_col)
    }

    /// Returns `true` if start and end coincide.
    pub fn is_empty(&self) -> bool {
        self.start() == self.end()
    }

    /// Returns `true` if the selection stays on one line.
    pub fn is_single_line(&self) -> bool {
        self.min_line == self.max_line
    }

    /// Selected column range on `line`, with `line_len` used for lines that run to their end.
    ///
    /// Returns `None` if `line` is outside the selection.
    pub fn columns_on_line(&self, line: usize, line_len: usize) -> Option<(usize, usize)> {
        if line < self.min_line || line > self.max_line {
            return None;
        }
        let from = if line == self.min_line { self.lo_col } else { 0 };
        let to = if line == self.max_line {
            self.hi_col
        } else {
            line_len
        };
        Some((from.min(line_len), to.min(line_len).max(from.min(line_len))))
    }
}

/// Order two anchors into [`SelectionBounds`].
///
/// - Same line: columns are ordered by min/max.
/// - Start line before end line: columns are taken as given.
/// - Start line after end line: anchors are swapped.
pub fn normalize(
    start_line: usize,
    start_col: usize,
    end_line: usize,
    end_col: usize,
) -> SelectionBounds {
    if start_line == end_line {
        SelectionBounds {
            min_line: start_line,
            max_line: start_line,
            lo_col: start_col.min(end_col),
            hi_col: start_col.max(end_col),
        }
    } else if start_line < end_line {
        SelectionBounds {
            min_line: start_line,
            max_line: end_line,
            lo_col: start_col,
            hi_col: end_col,
        }
    } else {
        SelectionBounds {
            min_line: end_line,
            max_line: start_line,
            lo_col: end_col,
            hi_col: start_col,
        }
    }
}

/// Two anchors plus an active flag.
///
/// An inactive selection has no anchors in effect. An active selection whose anchors coincide is
/// *empty* but still active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Anchor where the selection started.
    pub start: Position,
    /// Moving anchor.
    pub end: Position,
    /// Whether the anchors are in effect.
    pub active: bool,
}

impl Selection {
    /// An active selection between two anchors.
    pub fn new(start: Position, end: Position) -> Self {
        Self {
            start,
            end,
            active: true,
        }
    }

    /// An active, empty selection anchored at `pos`.
    pub fn caret(pos: Position) -> Self {
        Self::new(pos, pos)
    }

    /// Whether the selection is active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the anchors coincide (regardless of `active`).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Active and non-empty: something is highlighted.
    pub fn has_selection(&self) -> bool {
        self.active && !self.is_empty()
    }

    /// Deactivate.
    pub fn clear(&mut self) {
        self.active = false;
    }

    /// Move the moving anchor.
    pub fn extend_to(&mut self, pos: Position) {
        self.end = pos;
    }

    /// Returns `true` if `end` precedes `start` in document order.
    pub fn is_backward(&self) -> bool {
        self.end < self.start
    }

    /// Anchors clamped to `doc`, then normalized. `None` when inactive.
    pub fn bounds<L: LineLengths + ?Sized>(&self, doc: &L) -> Option<SelectionBounds> {
        if !self.active {
            return None;
        }
        let start = clamp_to(doc, self.start);
        let end = clamp_to(doc, self.end);
        Some(normalize(start.line, start.column, end.line, end.column))
    }

    /// Selection spanning the whole document.
    pub fn select_all<L: LineLengths + ?Sized>(doc: &L) -> Self {
        let last = doc.line_count().saturating_sub(1);
        Self::new(Position::new(0, 0), Position::new(last, doc.line_len(last)))
    }
}

fn clamp_to<L: LineLengths + ?Sized>(doc: &L, pos: Position) -> Position {
    let line = pos.line.min(doc.line_count().saturating_sub(1));
    Position::new(line, pos.column.min(doc.line_len(line)))
}

fn check_bounds(buffer: &TextBuffer, bounds: &SelectionBounds) -> Result<(), BufferError> {
    let line_count = buffer.line_count();
    if bounds.max_line >= line_count {
        return Err(BufferError::LineOutOfRange {
            line: bounds.max_line,
            line_count,
        });
    }
    Ok(())
}

/// Text covered by `bounds`; lines are joined with `'\n'`.
pub fn extract_text(buffer: &TextBuffer, bounds: &SelectionBounds) -> Result<String, BufferError> {
    check_bounds(buffer, bounds)?;

    if bounds.is_single_line() {
        let line = buffer.line(bounds.min_line);
        let (lo, hi) = (bounds.lo_col, bounds.hi_col.max(bounds.lo_col));
        return Ok(line.chars().skip(lo).take(hi - lo).collect());
    }

    let mut out: String = buffer.line(bounds.min_line).chars().skip(bounds.lo_col).collect();
    for line in bounds.min_line + 1..bounds.max_line {
        out.push('\n');
        out.push_str(&buffer.line(line));
    }
    out.push('\n');
    out.extend(buffer.line(bounds.max_line).chars().take(bounds.hi_col));
    Ok(out)
}

/// Remove the text covered by `bounds`, joining the first and last lines.
///
/// Returns the position where the selection started (the new caret slot).
pub fn delete_range(
    buffer: &mut TextBuffer,
    bounds: &SelectionBounds,
) -> Result<Position, BufferError> {
    check_bounds(buffer, bounds)?;

    if bounds.is_single_line() {
        let (lo, hi) = (bounds.lo_col, bounds.hi_col.max(bounds.lo_col));
        buffer.delete_range(bounds.min_line, lo, hi - lo)?;
        return Ok(buffer.clamp_position(Position::new(bounds.min_line, lo)));
    }

    for _ in bounds.min_line + 1..bounds.max_line {
        buffer.delete_line(bounds.min_line + 1)?;
    }
    let last = bounds.min_line + 1;
    buffer.delete_range(last, 0, bounds.hi_col)?;
    let first_len = buffer.line_len(bounds.min_line);
    buffer.delete_range(bounds.min_line, bounds.lo_col, first_len)?;
    buffer.merge_line(bounds.min_line)?;

    Ok(buffer.clamp_position(Position::new(bounds.min_line, bounds.lo_col)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_three_cases() {
        assert_eq!(
            normalize(0, 3, 0, 1),
            SelectionBounds {
                min_line: 0,
                max_line: 0,
                lo_col: 1,
                hi_col: 3
            }
        );
        assert_eq!(
            normalize(0, 4, 2, 1),
            SelectionBounds {
                min_line: 0,
                max_line: 2,
                lo_col: 4,
                hi_col: 1
            }
        );
        assert_eq!(
            normalize(2, 5, 0, 1),
            SelectionBounds {
                min_line: 0,
                max_line: 2,
                lo_col: 1,
                hi_col: 5
            }
        );
    }

    #[test]
    fn test_empty_is_not_inactive() {
        let mut sel = Selection::caret(Position::new(0, 2));
        assert!(sel.is_active());
        assert!(sel.is_empty());
        assert!(!sel.has_selection());
        assert!(sel.bounds(&["abcd"][..]).is_some());

        sel.clear();
        assert!(sel.bounds(&["abcd"][..]).is_none());
    }

    #[test]
    fn test_bounds_clamp_to_document() {
        let sel = Selection::new(Position::new(0, 1), Position::new(9, 9));
        let bounds = sel.bounds(&["hello", "wo"][..]).unwrap();
        assert_eq!(bounds.end(), Position::new(1, 2));
    }

    #[test]
    fn test_extract_multi_line() {
        let buffer = TextBuffer::from_string("hello\nbig\nworld");
        let bounds = normalize(2, 3, 0, 2);
        assert_eq!(extract_text(&buffer, &bounds).unwrap(), "llo\nbig\nwor");
    }

    #[test]
    fn test_delete_multi_line() {
        let mut buffer = TextBuffer::from_string("hello\nbig\nworld\ntail");
        let bounds = normalize(0, 2, 2, 3);
        let caret = delete_range(&mut buffer, &bounds).unwrap();
        assert_eq!(buffer.lines(), vec!["held", "tail"]);
        assert_eq!(caret, Position::new(0, 2));
    }

    #[test]
    fn test_delete_two_adjacent_lines() {
        let mut buffer = TextBuffer::from_string("abc\ndef");
        let caret = delete_range(&mut buffer, &normalize(0, 3, 1, 0)).unwrap();
        assert_eq!(buffer.lines(), vec!["abcdef"]);
        assert_eq!(caret, Position::new(0, 3));
    }

    #[test]
    fn test_out_of_range_bounds_fail() {
        let mut buffer = TextBuffer::from_string("one");
        let bounds = normalize(0, 0, 3, 0);
        assert!(extract_text(&buffer, &bounds).is_err());
        assert!(delete_range(&mut buffer, &bounds).is_err());
        assert_eq!(buffer.line(0), "one");
    }

    #[test]
    fn test_columns_on_line() {
        let bounds = normalize(1, 2, 3, 4);
        assert_eq!(bounds.columns_on_line(0, 10), None);
        assert_eq!(bounds.columns_on_line(1, 10), Some((2, 10)));
        assert_eq!(bounds.columns_on_line(2, 6), Some((0, 6)));
        assert_eq!(bounds.columns_on_line(3, 10), Some((0, 4)));
    }

    #[test]
    fn test_select_all() {
        let sel = Selection::select_all(&["ab", "cde"][..]);
        assert_eq!(sel.start, Position::new(0, 0));
        assert_eq!(sel.end, Position::new(1, 3));
    }
}
