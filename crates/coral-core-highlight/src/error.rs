use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by the highlighter and theme loading.
pub enum HighlightError {
    #[error("unknown language: {0}")]
    /// No registered language has this name.
    UnknownLanguage(String),

    #[error("no language registered for extension: {0}")]
    /// No registered language claims this file extension.
    UnknownExtension(String),

    #[error("unknown theme: {0}")]
    /// No built-in theme has this name.
    UnknownTheme(String),

    #[error("invalid color: {0}")]
    /// A color string is not `#RRGGBB` or `#RRGGBBAA`.
    InvalidColor(String),

    #[error("YAML parse error: {0}")]
    /// Theme YAML failed to parse.
    Yaml(#[from] serde_yaml::Error),
}
