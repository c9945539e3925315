//! Clipboard seam and an in-memory implementation.
//!
//! The editor only ever talks to a [`ClipboardService`]; hosts wire it to the OS clipboard.
//! [`MemoryClipboard`] is the default and keeps a most-recent-first history of copied text.

use crate::text::normalize_line_endings as to_lf;
use std::collections::VecDeque;

/// Plain-text clipboard collaborator.
pub trait ClipboardService {
    /// Replace the clipboard content.
    fn set_text(&mut self, text: &str);

    /// Current clipboard content (empty when nothing was copied).
    fn text(&self) -> String;

    /// Whether there is anything to paste.
    fn has_text(&self) -> bool {
        !self.text().is_empty()
    }
}

/// Coarse shape of clipboard text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipboardFormat {
    /// Nothing.
    Empty,
    /// A single line.
    PlainText,
    /// Two or more lines.
    MultiLine,
}

/// Classify `text` by line count. Any line break style counts.
pub fn detect_format(text: &str) -> ClipboardFormat {
    if text.is_empty() {
        ClipboardFormat::Empty
    } else if text.contains(['\n', '\r']) {
        ClipboardFormat::MultiLine
    } else {
        ClipboardFormat::PlainText
    }
}

/// Convert CRLF and lone CR to LF.
pub fn normalize_line_endings(text: &str) -> String {
    to_lf(text)
}

/// Expand each `'\t'` to spaces up to the next multiple of `tab_size`.
pub fn convert_tabs_to_spaces(text: &str, tab_size: usize) -> String {
    let tab_size = tab_size.max(1);
    let mut out = String::with_capacity(text.len());
    let mut col = 0usize;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let pad = tab_size - col % tab_size;
                out.extend(std::iter::repeat_n(' ', pad));
                col += pad;
            }
            '\n' => {
                out.push(ch);
                col = 0;
            }
            _ => {
                out.push(ch);
                col += 1;
            }
        }
    }
    out
}

/// Replace each full run of `tab_size` leading spaces with a `'\t'`, line by line.
///
/// Only indentation is touched; spaces after the first non-space character stay.
pub fn convert_spaces_to_tabs(text: &str, tab_size: usize) -> String {
    let tab_size = tab_size.max(1);
    text.split('\n')
        .map(|line| {
            let indent = line.len() - line.trim_start_matches(' ').len();
            let tabs = indent / tab_size;
            let mut out = "\t".repeat(tabs);
            out.push_str(&line[tabs * tab_size..]);
            out
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// In-process clipboard with bounded history.
#[derive(Debug, Clone)]
pub struct MemoryClipboard {
    current: String,
    history: VecDeque<String>,
    history_size: usize,
    history_enabled: bool,
}

impl Default for MemoryClipboard {
    fn default() -> Self {
        Self::new(10)
    }
}

impl MemoryClipboard {
    /// Create an empty clipboard remembering up to `history_size` entries.
    pub fn new(history_size: usize) -> Self {
        Self {
            current: String::new(),
            history: VecDeque::new(),
            history_size,
            history_enabled: history_size > 0,
        }
    }

    /// Store `lines` joined with `'\n'`.
    pub fn set_lines<S: AsRef<str>>(&mut self, lines: &[S]) {
        let joined: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();
        self.set_text(&joined.join("\n"));
    }

    /// Current content split into lines. Empty content gives no lines.
    pub fn lines(&self) -> Vec<String> {
        if self.current.is_empty() {
            return Vec::new();
        }
        self.current.split('\n').map(str::to_string).collect()
    }

    /// Turn history recording on or off. Turning it off drops the recorded entries.
    pub fn enable_history(&mut self, enabled: bool) {
        self.history_enabled = enabled;
        if !enabled {
            self.history.clear();
        }
    }

    /// Whether history is being recorded.
    pub fn is_history_enabled(&self) -> bool {
        self.history_enabled
    }

    /// Change the history bound, dropping the oldest entries if needed.
    pub fn set_history_size(&mut self, size: usize) {
        self.history_size = size;
        self.history.truncate(size);
    }

    /// History bound.
    pub fn history_size(&self) -> usize {
        self.history_size
    }

    /// Recorded entries, most recent first.
    pub fn history(&self) -> Vec<String> {
        self.history.iter().cloned().collect()
    }

    /// Entry `index` (0 is the most recent).
    pub fn history_item(&self, index: usize) -> Option<&str> {
        self.history.get(index).map(String::as_str)
    }

    /// Forget all history entries.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn record(&mut self, text: &str) {
        if !self.history_enabled || self.history_size == 0 || text.is_empty() {
            return;
        }
        if let Some(pos) = self.history.iter().position(|h| h == text) {
            self.history.remove(pos);
        }
        self.history.push_front(text.to_string());
        self.history.truncate(self.history_size);
    }
}

impl ClipboardService for MemoryClipboard {
    fn set_text(&mut self, text: &str) {
        let text = to_lf(text);
        tracing::trace!(chars = text.chars().count(), "clipboard set");
        self.record(&text);
        self.current = text;
    }

    fn text(&self) -> String {
        self.current.clone()
    }
}
