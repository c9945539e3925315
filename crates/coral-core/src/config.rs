//! Editor configuration.
//!
//! Every field has a default, so a YAML document only needs the keys it wants to change:
//!
//! ```rust
//! use coral_core::{EditorConfig, TabKeyBehavior};
//!
//! let config = EditorConfig::from_yaml_str("tab_size: 2\ntheme: monokai\n").unwrap();
//! assert_eq!(config.tab_size, 2);
//! assert_eq!(config.theme, "monokai");
//! assert_eq!(config.tab_behavior, TabKeyBehavior::Spaces);
//! assert_eq!(config.history.max_size, 100);
//! ```

use crate::viewport::ViewportMetrics;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
/// Configuration loading errors.
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    /// The YAML did not match [`EditorConfig`].
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read config: {0}")]
    /// The file could not be read.
    Io(#[from] std::io::Error),

    #[error("invalid value for `{field}`: {reason}")]
    /// A value parsed but is out of range.
    Invalid {
        /// Offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// What the Tab key inserts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabKeyBehavior {
    /// A literal `'\t'`.
    Tab,
    /// Spaces up to the next tab stop.
    #[default]
    Spaces,
}

/// Undo history limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Entries kept on each stack.
    pub max_size: usize,
    /// Coalesce consecutive typing saved within this many milliseconds. `None` disables it.
    pub group_window_ms: Option<u64>,
    /// Saves folded into one coalesced entry at most.
    pub max_group_size: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: 100,
            group_window_ms: None,
            max_group_size: 50,
        }
    }
}

/// Everything an [`crate::Editor`] is configured with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Undo history limits.
    pub history: HistoryConfig,
    /// Window and chrome metrics.
    pub viewport: ViewportMetrics,
    /// Tab stop width in columns.
    pub tab_size: usize,
    /// What the Tab key inserts.
    pub tab_behavior: TabKeyBehavior,
    /// Theme name.
    pub theme: String,
    /// Language name.
    pub language: String,
    /// Clipboard history entries.
    pub clipboard_history: usize,
    /// Lines moved by a fast scroll.
    pub fast_scroll_lines: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            viewport: ViewportMetrics::default(),
            tab_size: 4,
            tab_behavior: TabKeyBehavior::default(),
            theme: "dark".to_string(),
            language: "Plain Text".to_string(),
            clipboard_history: 10,
            fast_scroll_lines: 10,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the editor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tab_size == 0 {
            return Err(ConfigError::Invalid {
                field: "tab_size",
                reason: "must be at least 1",
            });
        }
        if self.history.max_size == 0 {
            return Err(ConfigError::Invalid {
                field: "history.max_size",
                reason: "must be at least 1",
            });
        }
        if let Some(reason) = self.viewport.problem() {
            return Err(ConfigError::Invalid {
                field: "viewport",
                reason,
            });
        }
        Ok(())
    }
}
