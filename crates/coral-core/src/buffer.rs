//! Line-addressed document storage.
//!
//! [`TextBuffer`] keeps the document in a [`ropey::Rope`] built without Unicode line-break
//! support, so `'\n'` is the only line separator and every other character (including a lone
//! `'\r'`) is ordinary line content.
//!
//! # Addressing
//!
//! - Columns are clamped: a column past the end of a line means "end of line".
//! - A line index past the end fails with [`BufferError::LineOutOfRange`] on every mutation.
//! - Read accessors never fail: an out-of-range line reads as empty.
//!
//! The buffer always holds at least one line; an empty document is a single empty line.

use crate::line_ending::LineEnding;
use crate::position::Position;
use crate::selection::LineLengths;
use crate::text::{normalize_line_endings, split_lines_preserve_trailing};
use coral_core_highlight::LineSource;
use ropey::Rope;
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Buffer mutation errors.
pub enum BufferError {
    #[error("line {line} out of range (document has {line_count} lines)")]
    /// The addressed line does not exist.
    LineOutOfRange {
        /// Requested line.
        line: usize,
        /// Lines in the document.
        line_count: usize,
    },

    #[error("text inserted into a single line must not contain a line break")]
    /// Single-line insertion was given text containing `'\n'`.
    EmbeddedLineBreak,
}

/// The document: an ordered, never-empty sequence of lines.
///
/// Cloning is cheap (the rope shares its nodes), which is what makes full snapshots in the
/// undo history affordable.
///
/// # Example
///
/// ```rust
/// use coral_core::TextBuffer;
///
/// let mut buffer = TextBuffer::from_string("hello\nworld");
/// buffer.split_line(0, 2).unwrap();
/// assert_eq!(buffer.to_string(), "he\nllo\nworld");
/// buffer.merge_line(0).unwrap();
/// assert_eq!(buffer.line(0), "hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
    line_ending: LineEnding,
}

impl PartialEq for TextBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.rope == other.rope
    }
}

impl Eq for TextBuffer {}

impl TextBuffer {
    /// A document with one empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `content`, splitting on `'\n'`. CRLF is normalized and remembered.
    pub fn from_string(content: &str) -> Self {
        let line_ending = LineEnding::detect_in_text(content);
        let lines = split_lines_preserve_trailing(content);
        Self {
            rope: Rope::from_str(&lines.join("\n")),
            line_ending,
        }
    }

    /// Build a document from lines. An empty iterator gives one empty line.
    ///
    /// A `'\n'` inside an item starts a new line.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rope = Rope::new();
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                rope.insert_char(rope.len_chars(), '\n');
            }
            rope.insert(rope.len_chars(), line.as_ref());
        }
        Self {
            rope,
            line_ending: LineEnding::Lf,
        }
    }

    /// Line ending detected on load (used by [`TextBuffer::to_string_with_line_ending`]).
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Override the line ending used for saving.
    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    /// Document text with the remembered line ending.
    pub fn to_string_with_line_ending(&self) -> String {
        self.line_ending.apply_to_text(&self.to_string())
    }

    /// Number of lines (always at least 1).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of `line` without its separator, or `""` when out of range.
    pub fn line(&self, line: usize) -> String {
        if line >= self.line_count() {
            return String::new();
        }
        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        text
    }

    /// Char length of `line`, or 0 when out of range.
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.line_count() {
            return 0;
        }
        let slice = self.rope.line(line);
        let n = slice.len_chars();
        if n > 0 && slice.char(n - 1) == '\n' {
            n - 1
        } else {
            n
        }
    }

    /// All lines, in order.
    pub fn lines(&self) -> Vec<String> {
        self.get_lines(0, self.line_count())
    }

    /// Lines `start..end`, clamped to the document.
    pub fn get_lines(&self, start: usize, end: usize) -> Vec<String> {
        let end = end.min(self.line_count());
        (start.min(end)..end).map(|i| self.line(i)).collect()
    }

    /// Length of the longest line.
    pub fn max_line_len(&self) -> usize {
        (0..self.line_count())
            .map(|i| self.line_len(i))
            .max()
            .unwrap_or(0)
    }

    /// Characters in all lines, separators excluded.
    pub fn total_chars(&self) -> usize {
        self.rope.len_chars() - (self.line_count() - 1)
    }

    /// Returns `true` for a single empty line.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns `true` if `pos` addresses an existing caret slot.
    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.line < self.line_count() && pos.column <= self.line_len(pos.line)
    }

    /// Clamp `pos` into the document.
    pub fn clamp_position(&self, pos: Position) -> Position {
        let line = pos.line.min(self.line_count() - 1);
        Position::new(line, pos.column.min(self.line_len(line)))
    }

    /// Insert `text` into `line` at `col` (clamped). `text` must not contain `'\n'`.
    pub fn insert_text(&mut self, line: usize, col: usize, text: &str) -> Result<(), BufferError> {
        self.check_line(line)?;
        if text.contains('\n') {
            return Err(BufferError::EmbeddedLineBreak);
        }
        let offset = self.char_offset(line, col);
        self.rope.insert(offset, text);
        Ok(())
    }

    /// Insert text that may span several lines at `pos` (column clamped).
    ///
    /// CRLF and lone CR in `text` become line breaks. Returns the position just past the
    /// inserted text.
    pub fn insert_multiline(&mut self, pos: Position, text: &str) -> Result<Position, BufferError> {
        self.check_line(pos.line)?;
        let text = normalize_line_endings(text);
        let offset = self.char_offset(pos.line, pos.column);
        self.rope.insert(offset, &text);
        Ok(self.char_to_position(offset + text.chars().count()))
    }

    /// Absolute char offset of `pos` (clamped), counting `'\n'` separators.
    pub fn position_to_char(&self, pos: Position) -> usize {
        let pos = self.clamp_position(pos);
        self.char_offset(pos.line, pos.column)
    }

    /// Position of an absolute char offset (clamped to the end of the document).
    pub fn char_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        Position::new(line, offset - self.rope.line_to_char(line))
    }

    /// Insert one char into `line` at `col` (clamped). `'\n'` is rejected.
    pub fn insert_char(&mut self, line: usize, col: usize, ch: char) -> Result<(), BufferError> {
        self.check_line(line)?;
        if ch == '\n' {
            return Err(BufferError::EmbeddedLineBreak);
        }
        let offset = self.char_offset(line, col);
        self.rope.insert_char(offset, ch);
        Ok(())
    }

    /// Remove up to `length` chars from `col`, never crossing the end of the line.
    ///
    /// Returns the removed text.
    pub fn delete_range(
        &mut self,
        line: usize,
        col: usize,
        length: usize,
    ) -> Result<String, BufferError> {
        self.check_line(line)?;
        let line_len = self.line_len(line);
        let col = col.min(line_len);
        let end = col.saturating_add(length).min(line_len);
        if col == end {
            return Ok(String::new());
        }
        let base = self.rope.line_to_char(line);
        let removed = self.rope.slice(base + col..base + end).to_string();
        self.rope.remove(base + col..base + end);
        Ok(removed)
    }

    /// Truncate `line` at `col` (clamped); the tail becomes line `line + 1`.
    pub fn split_line(&mut self, line: usize, col: usize) -> Result<(), BufferError> {
        self.check_line(line)?;
        let offset = self.char_offset(line, col);
        self.rope.insert_char(offset, '\n');
        Ok(())
    }

    /// Append line `line + 1` to `line` and remove it.
    ///
    /// Returns `false` (and does nothing) when `line` is the last line.
    pub fn merge_line(&mut self, line: usize) -> Result<bool, BufferError> {
        self.check_line(line)?;
        if line + 1 >= self.line_count() {
            return Ok(false);
        }
        let separator = self.rope.line_to_char(line) + self.line_len(line);
        self.rope.remove(separator..separator + 1);
        Ok(true)
    }

    /// Insert a new line with `content` before `line`; `line == line_count()` appends.
    pub fn insert_line(&mut self, line: usize, content: &str) -> Result<(), BufferError> {
        let line_count = self.line_count();
        if line > line_count {
            return Err(BufferError::LineOutOfRange { line, line_count });
        }
        if content.contains('\n') {
            return Err(BufferError::EmbeddedLineBreak);
        }
        if line == line_count {
            let end = self.rope.len_chars();
            self.rope.insert_char(end, '\n');
            self.rope.insert(end + 1, content);
        } else {
            let start = self.rope.line_to_char(line);
            self.rope.insert_char(start, '\n');
            self.rope.insert(start, content);
        }
        Ok(())
    }

    /// Remove `line` and return its content. Removing the only line leaves one empty line.
    pub fn delete_line(&mut self, line: usize) -> Result<String, BufferError> {
        self.check_line(line)?;
        let removed = self.line(line);
        let line_count = self.line_count();
        let start = self.rope.line_to_char(line);

        if line_count == 1 {
            self.rope = Rope::new();
        } else if line + 1 == line_count {
            // Last line: take the preceding separator with it.
            self.rope.remove(start - 1..self.rope.len_chars());
        } else {
            let next = self.rope.line_to_char(line + 1);
            self.rope.remove(start..next);
        }
        Ok(removed)
    }

    /// Overwrite lines starting at `start` with `lines`, appending any that run past the end.
    pub fn replace_lines<S: AsRef<str>>(
        &mut self,
        start: usize,
        lines: &[S],
    ) -> Result<(), BufferError> {
        let line_count = self.line_count();
        if start > line_count {
            return Err(BufferError::LineOutOfRange {
                line: start,
                line_count,
            });
        }
        if lines.iter().any(|l| l.as_ref().contains('\n')) {
            return Err(BufferError::EmbeddedLineBreak);
        }

        for (i, content) in lines.iter().enumerate() {
            let target = start + i;
            if target < self.line_count() {
                let base = self.rope.line_to_char(target);
                let len = self.line_len(target);
                self.rope.remove(base..base + len);
                self.rope.insert(base, content.as_ref());
            } else {
                self.insert_line(target, content.as_ref())?;
            }
        }
        Ok(())
    }

    /// Replace the whole document, keeping the remembered line ending of `content`.
    pub fn set_text(&mut self, content: &str) {
        *self = Self::from_string(content);
    }

    /// First line where `self` and `other` differ, or `None` if the documents are equal.
    pub fn first_difference(&self, other: &TextBuffer) -> Option<usize> {
        if self.rope == other.rope {
            return None;
        }
        let same = self
            .rope
            .lines()
            .zip(other.rope.lines())
            .take_while(|(a, b)| a == b)
            .count();
        Some(same)
    }

    /// Approximate heap size of the text in bytes.
    pub fn byte_len(&self) -> usize {
        self.rope.len_bytes()
    }

    fn check_line(&self, line: usize) -> Result<(), BufferError> {
        let line_count = self.line_count();
        if line >= line_count {
            return Err(BufferError::LineOutOfRange { line, line_count });
        }
        Ok(())
    }

    fn char_offset(&self, line: usize, col: usize) -> usize {
        self.rope.line_to_char(line) + col.min(self.line_len(line))
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl LineLengths for TextBuffer {
    fn line_count(&self) -> usize {
        TextBuffer::line_count(self)
    }

    fn line_len(&self, line: usize) -> usize {
        TextBuffer::line_len(self, line)
    }
}

impl LineSource for TextBuffer {
    fn line_count(&self) -> usize {
        TextBuffer::line_count(self)
    }

    fn line_text(&self, line: usize) -> Cow<'_, str> {
        Cow::Owned(self.line(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_one_empty_line() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line(0), "");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_only_lf_breaks_lines() {
        let buffer = TextBuffer::from_lines(["a\rb", "c\u{2028}d"]);
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line_len(0), 3);
        assert_eq!(buffer.line_len(1), 3);
    }

    #[test]
    fn test_crlf_is_normalized_and_remembered() {
        let buffer = TextBuffer::from_string("a\r\nb\r\n");
        assert_eq!(buffer.lines(), vec!["a", "b", ""]);
        assert_eq!(buffer.line_ending(), LineEnding::Crlf);
        assert_eq!(buffer.to_string(), "a\nb\n");
        assert_eq!(buffer.to_string_with_line_ending(), "a\r\nb\r\n");
    }

    #[test]
    fn test_columns_clamp() {
        let mut buffer = TextBuffer::from_string("abc");
        buffer.insert_text(0, 99, "!").unwrap();
        assert_eq!(buffer.line(0), "abc!");
        assert_eq!(buffer.delete_range(0, 2, 99).unwrap(), "c!");
        assert_eq!(buffer.line(0), "ab");
        assert_eq!(buffer.delete_range(0, 10, 1).unwrap(), "");
    }

    #[test]
    fn test_out_of_range_line_fails() {
        let mut buffer = TextBuffer::from_string("abc");
        let err = buffer.insert_char(3, 0, 'x').unwrap_err();
        assert_eq!(
            err,
            BufferError::LineOutOfRange {
                line: 3,
                line_count: 1
            }
        );
        assert!(buffer.split_line(1, 0).is_err());
        assert!(buffer.merge_line(1).is_err());
        assert_eq!(buffer.line(7), "");
        assert_eq!(buffer.line_len(7), 0);
    }

    #[test]
    fn test_embedded_line_break_rejected() {
        let mut buffer = TextBuffer::new();
        assert_eq!(
            buffer.insert_text(0, 0, "a\nb"),
            Err(BufferError::EmbeddedLineBreak)
        );
        assert_eq!(
            buffer.insert_char(0, 0, '\n'),
            Err(BufferError::EmbeddedLineBreak)
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_split_and_merge() {
        let mut buffer = TextBuffer::from_string("abc");
        buffer.split_line(0, 3).unwrap();
        assert_eq!(buffer.lines(), vec!["abc", ""]);
        buffer.split_line(0, 1).unwrap();
        assert_eq!(buffer.lines(), vec!["a", "bc", ""]);
        assert!(buffer.merge_line(0).unwrap());
        assert_eq!(buffer.lines(), vec!["abc", ""]);
        assert!(!buffer.merge_line(1).unwrap());
    }

    #[test]
    fn test_insert_and_delete_lines() {
        let mut buffer = TextBuffer::from_string("b");
        buffer.insert_line(0, "a").unwrap();
        buffer.insert_line(2, "c").unwrap();
        assert_eq!(buffer.lines(), vec!["a", "b", "c"]);
        assert!(buffer.insert_line(4, "x").is_err());

        assert_eq!(buffer.delete_line(2).unwrap(), "c");
        assert_eq!(buffer.delete_line(0).unwrap(), "a");
        assert_eq!(buffer.lines(), vec!["b"]);
        assert_eq!(buffer.delete_line(0).unwrap(), "b");
        assert_eq!(buffer.line_count(), 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_replace_lines_overwrites_and_appends() {
        let mut buffer = TextBuffer::from_string("1\n2\n3");
        buffer.replace_lines(1, &["two", "three", "four"]).unwrap();
        assert_eq!(buffer.lines(), vec!["1", "two", "three", "four"]);
        assert!(buffer.replace_lines(9, &["x"]).is_err());
    }

    #[test]
    fn test_statistics() {
        let buffer = TextBuffer::from_string("ab\n\nwxyz");
        assert_eq!(buffer.total_chars(), 6);
        assert_eq!(buffer.max_line_len(), 4);
        assert_eq!(buffer.get_lines(1, 10), vec!["", "wxyz"]);
        assert!(buffer.get_lines(5, 2).is_empty());
    }

    #[test]
    fn test_insert_multiline_and_offsets() {
        let mut buffer = TextBuffer::from_string("head tail");
        let end = buffer
            .insert_multiline(Position::new(0, 5), "one\r\ntwo\n")
            .unwrap();
        assert_eq!(buffer.lines(), vec!["head one", "two", "tail"]);
        assert_eq!(end, Position::new(2, 0));

        assert_eq!(buffer.position_to_char(Position::new(1, 1)), 10);
        assert_eq!(buffer.char_to_position(10), Position::new(1, 1));
        assert_eq!(buffer.char_to_position(999), Position::new(2, 4));
    }

    #[test]
    fn test_first_difference() {
        let a = TextBuffer::from_string("one\ntwo\nthree");
        let mut b = a.clone();
        assert_eq!(a.first_difference(&b), None);
        b.insert_char(2, 0, '3').unwrap();
        assert_eq!(a.first_difference(&b), Some(2));
        b.split_line(0, 1).unwrap();
        assert_eq!(a.first_difference(&b), Some(0));
    }

    #[test]
    fn test_clamp_position() {
        let buffer = TextBuffer::from_string("ab\nc");
        assert_eq!(
            buffer.clamp_position(Position::new(5, 5)),
            Position::new(1, 1)
        );
        assert_eq!(
            buffer.clamp_position(Position::new(0, 9)),
            Position::new(0, 2)
        );
        assert!(buffer.is_valid_position(Position::new(0, 2)));
        assert!(!buffer.is_valid_position(Position::new(0, 3)));
    }
}
