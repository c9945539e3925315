use crate::error::HighlightError;
use crate::token::TokenKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Names of the built-in themes.
pub const BUILTIN_THEMES: [&str; 3] = ["dark", "light", "monokai"];

/// RGBA color (0-255 per channel).
///
/// Serialized as `"#RRGGBB"` or `"#RRGGBBAA"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenColor {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl TokenColor {
    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `"#RRGGBB"` or `"#RRGGBBAA"` (the `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self, HighlightError> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || HighlightError::InvalidColor(s.to_string());
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(invalid()),
        }
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for TokenColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for TokenColor {
    type Error = HighlightError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<TokenColor> for String {
    fn from(color: TokenColor) -> Self {
        color.to_hex()
    }
}

/// Color plus font flags for one token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStyle {
    /// Foreground color.
    pub color: TokenColor,
    #[serde(default)]
    /// Bold face.
    pub bold: bool,
    #[serde(default)]
    /// Italic face.
    pub italic: bool,
}

impl TokenStyle {
    /// Plain style in `color`.
    pub const fn plain(color: TokenColor) -> Self {
        Self {
            color,
            bold: false,
            italic: false,
        }
    }

    /// Builder: bold.
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Builder: italic.
    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

/// Colors of the editor chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiColors {
    /// Text area background.
    pub background: TokenColor,
    /// Caret.
    pub cursor: TokenColor,
    /// Gutter line numbers.
    pub line_numbers: TokenColor,
    /// Selection fill (translucent).
    pub selection: TokenColor,
    /// Status bar background.
    pub status_bar: TokenColor,
    /// Status bar text.
    pub status_text: TokenColor,
    /// Scrollbar track.
    pub scrollbar: TokenColor,
    /// Scrollbar thumb.
    pub scrollbar_thumb: TokenColor,
}

impl Default for UiColors {
    fn default() -> Self {
        Self {
            background: TokenColor::rgb(25, 25, 25),
            cursor: TokenColor::rgb(255, 255, 0),
            line_numbers: TokenColor::rgb(100, 100, 100),
            selection: TokenColor::rgba(70, 130, 180, 100),
            status_bar: TokenColor::rgb(40, 40, 40),
            status_text: TokenColor::rgb(200, 200, 200),
            scrollbar: TokenColor::rgb(60, 60, 60),
            scrollbar_thumb: TokenColor::rgb(120, 120, 120),
        }
    }
}

/// Token styles plus chrome colors.
///
/// `Identifier`, `Whitespace` and `Unknown` tokens share the `default` style.
///
/// ```yaml
/// name: solarized
/// keyword: { color: "#268BD2", bold: true }
/// string: { color: "#2AA198" }
/// comment: { color: "#93A1A1", italic: true }
/// number: { color: "#D33682" }
/// operator: { color: "#657B83" }
/// default: { color: "#586E75" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme name.
    pub name: String,
    /// Keyword style.
    pub keyword: TokenStyle,
    /// String literal style.
    pub string: TokenStyle,
    /// Comment style.
    pub comment: TokenStyle,
    /// Number style.
    pub number: TokenStyle,
    /// Operator style.
    pub operator: TokenStyle,
    /// Everything else.
    pub default: TokenStyle,
    #[serde(default)]
    /// Chrome colors.
    pub ui: UiColors,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (the default).
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            keyword: TokenStyle::plain(TokenColor::rgb(120, 180, 255)).bold(),
            string: TokenStyle::plain(TokenColor::rgb(255, 200, 150)),
            comment: TokenStyle::plain(TokenColor::rgb(120, 200, 120)).italic(),
            number: TokenStyle::plain(TokenColor::rgb(200, 230, 200)),
            operator: TokenStyle::plain(TokenColor::rgb(200, 200, 200)),
            default: TokenStyle::plain(TokenColor::rgb(240, 240, 240)),
            ui: UiColors::default(),
        }
    }

    /// Light theme.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            keyword: TokenStyle::plain(TokenColor::rgb(0, 0, 255)).bold(),
            string: TokenStyle::plain(TokenColor::rgb(163, 21, 21)),
            comment: TokenStyle::plain(TokenColor::rgb(0, 128, 0)).italic(),
            number: TokenStyle::plain(TokenColor::rgb(0, 0, 128)),
            operator: TokenStyle::plain(TokenColor::rgb(0, 0, 0)),
            default: TokenStyle::plain(TokenColor::rgb(0, 0, 0)),
            ui: UiColors {
                background: TokenColor::rgb(250, 250, 250),
                cursor: TokenColor::rgb(0, 0, 0),
                line_numbers: TokenColor::rgb(150, 150, 150),
                selection: TokenColor::rgba(70, 130, 180, 80),
                status_bar: TokenColor::rgb(225, 225, 225),
                status_text: TokenColor::rgb(40, 40, 40),
                scrollbar: TokenColor::rgb(220, 220, 220),
                scrollbar_thumb: TokenColor::rgb(160, 160, 160),
            },
        }
    }

    /// Monokai theme.
    pub fn monokai() -> Self {
        Self {
            name: "monokai".to_string(),
            keyword: TokenStyle::plain(TokenColor::rgb(249, 38, 114)).bold(),
            string: TokenStyle::plain(TokenColor::rgb(230, 219, 116)),
            comment: TokenStyle::plain(TokenColor::rgb(117, 113, 94)).italic(),
            number: TokenStyle::plain(TokenColor::rgb(174, 129, 255)),
            operator: TokenStyle::plain(TokenColor::rgb(249, 38, 114)),
            default: TokenStyle::plain(TokenColor::rgb(248, 248, 242)),
            ui: UiColors {
                background: TokenColor::rgb(39, 40, 34),
                ..UiColors::default()
            },
        }
    }

    /// Look up a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "monokai" => Some(Self::monokai()),
            _ => None,
        }
    }

    /// Parse a theme from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, HighlightError> {
        let theme: Theme = serde_yaml::from_str(yaml)?;
        Ok(theme)
    }

    /// Style for a token kind.
    pub fn style_for(&self, kind: TokenKind) -> TokenStyle {
        match kind {
            TokenKind::Keyword => self.keyword,
            TokenKind::String => self.string,
            TokenKind::Comment => self.comment,
            TokenKind::Number => self.number,
            TokenKind::Operator => self.operator,
            TokenKind::Identifier | TokenKind::Whitespace | TokenKind::Unknown => self.default,
        }
    }
}
