//! Line ending helpers.
//!
//! [`crate::TextBuffer`] stores text with LF (`'\n'`) separators only. CRLF input is normalized on
//! load and the detected style is remembered so the document can be written back unchanged.

use serde::{Deserialize, Serialize};

/// The newline sequence used when producing text for saving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    #[default]
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
}

impl LineEnding {
    /// Detect the line ending of `text`: any CRLF makes it [`LineEnding::Crlf`].
    pub fn detect_in_text(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    /// The separator itself.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }

    /// Convert LF-normalized text to this line ending.
    pub fn apply_to_text(self, text: &str) -> String {
        match self {
            Self::Lf => text.to_string(),
            Self::Crlf => text.replace('\n', "\r\n"),
        }
    }
}
