use unicode_segmentation::UnicodeSegmentation;

/// Split on `'\n'`, dropping one trailing `'\r'` per line.
///
/// N newlines give N+1 lines, so a trailing newline yields a final empty line.
pub(crate) fn split_lines_preserve_trailing(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Replace CRLF and lone CR with LF.
pub(crate) fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Char width of the grapheme cluster that ends at char column `col`.
pub(crate) fn grapheme_len_before(line: &str, col: usize) -> usize {
    let mut width = 0;
    let mut seen = 0;
    for g in line.graphemes(true) {
        let n = g.chars().count();
        if seen + n > col {
            break;
        }
        width = n;
        seen += n;
        if seen == col {
            return width;
        }
    }
    if col == 0 { 0 } else { width.max(1) }
}

/// Char width of the grapheme cluster that starts at char column `col`.
pub(crate) fn grapheme_len_at(line: &str, col: usize) -> usize {
    let mut seen = 0;
    for g in line.graphemes(true) {
        let n = g.chars().count();
        if seen == col {
            return n;
        }
        seen += n;
        if seen > col {
            return 1;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines_preserve_trailing("a\r\nb\n"), vec!["a", "b", ""]);
        assert_eq!(split_lines_preserve_trailing(""), vec![""]);
    }

    #[test]
    fn test_grapheme_widths() {
        // "e" + combining acute accent is one cluster of two chars.
        let line = "ae\u{301}b";
        assert_eq!(grapheme_len_before(line, 3), 2);
        assert_eq!(grapheme_len_before(line, 4), 1);
        assert_eq!(grapheme_len_before(line, 0), 0);
        assert_eq!(grapheme_len_at(line, 1), 2);
        assert_eq!(grapheme_len_at(line, 0), 1);
        assert_eq!(grapheme_len_at(line, 4), 0);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_line_endings("a\r\nb\rc"), "a\nb\nc");
    }
}
