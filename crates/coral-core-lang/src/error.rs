use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading or registering language definitions.
pub enum LanguageError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// Reading a definition file failed.
    Io(#[from] std::io::Error),

    #[error("missing required field: {0}")]
    /// A required field was empty.
    MissingField(&'static str),
}
